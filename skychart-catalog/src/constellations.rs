//! Constellation stick figures and boundaries.
//!
//! Both files share one format, a segment per line in degrees:
//!
//! ```text
//! ORI 88.7929 7.4071 81.2828 6.3497
//! ```

use std::path::Path;

use skychart_core::SkyPoint;

use crate::error::{CatalogError, CatalogResult};
use crate::text::{data_lines, parse_dec_deg, parse_finite, read_text};

/// A great-circle segment belonging to one constellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: SkyPoint,
    pub end: SkyPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationSegments {
    pub constellation: String,
    pub segments: Vec<Segment>,
}

pub fn read_segments(path: &Path) -> CatalogResult<Vec<ConstellationSegments>> {
    let text = read_text(path)?;
    parse_segments(path, &text)
}

/// Groups segments by constellation code, in order of first appearance.
pub fn parse_segments(path: &Path, text: &str) -> CatalogResult<Vec<ConstellationSegments>> {
    let mut groups: Vec<ConstellationSegments> = Vec::new();
    for (line, content) in data_lines(text) {
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() != 5 {
            return Err(CatalogError::at_line(
                path,
                line,
                format!("expected 5 columns, found {}", parts.len()),
            ));
        }
        let code = parts[0].to_ascii_uppercase();
        let ra1 = parse_finite(path, line, "right ascension", parts[1])?;
        let dec1 = parse_dec_deg(path, line, parts[2])?;
        let ra2 = parse_finite(path, line, "right ascension", parts[3])?;
        let dec2 = parse_dec_deg(path, line, parts[4])?;
        let segment = Segment {
            start: SkyPoint::from_degrees(ra1, dec1),
            end: SkyPoint::from_degrees(ra2, dec2),
        };
        match groups.iter_mut().find(|g| g.constellation == code) {
            Some(group) => group.segments.push(segment),
            None => groups.push(ConstellationSegments {
                constellation: code,
                segments: vec![segment],
            }),
        }
    }
    Ok(groups)
}

/// Replaces every base group whose code appears in `overrides` and appends
/// the override groups after the surviving base groups.
pub fn merge_segments(
    base: Vec<ConstellationSegments>,
    overrides: Vec<ConstellationSegments>,
) -> Vec<ConstellationSegments> {
    let mut merged: Vec<ConstellationSegments> = base
        .into_iter()
        .filter(|b| !overrides.iter().any(|o| o.constellation == b.constellation))
        .collect();
    merged.extend(overrides);
    merged
}
