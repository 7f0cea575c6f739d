//! Milky Way contour polygons (`milkyway.txt`).
//!
//! One vertex per line, `polygon_id level ra_deg dec_deg`. Consecutive lines
//! with the same id form one closed contour; `level` is the brightness step,
//! starting at 1 for the faintest outline.

use std::path::Path;

use skychart_core::SkyPoint;

use crate::error::{CatalogError, CatalogResult};
use crate::text::{data_lines, parse_dec_deg, parse_finite, read_text};

#[derive(Debug, Clone, PartialEq)]
pub struct MilkyWayContour {
    pub id: u32,
    pub level: u32,
    pub vertices: Vec<SkyPoint>,
}

pub fn read_milky_way(path: &Path) -> CatalogResult<Vec<MilkyWayContour>> {
    let text = read_text(path)?;
    parse_milky_way(path, &text)
}

pub fn parse_milky_way(path: &Path, text: &str) -> CatalogResult<Vec<MilkyWayContour>> {
    let mut contours: Vec<MilkyWayContour> = Vec::new();
    for (line, content) in data_lines(text) {
        let parts: Vec<&str> = content.split_whitespace().collect();
        if parts.len() != 4 {
            return Err(CatalogError::at_line(
                path,
                line,
                format!("expected 4 columns, found {}", parts.len()),
            ));
        }
        let id: u32 = parts[0]
            .parse()
            .map_err(|_| CatalogError::at_line(path, line, format!("invalid polygon id '{}'", parts[0])))?;
        let level = parts[1]
            .parse::<u32>()
            .ok()
            .filter(|&l| l >= 1)
            .ok_or_else(|| CatalogError::at_line(path, line, format!("invalid level '{}'", parts[1])))?;
        let ra = parse_finite(path, line, "right ascension", parts[2])?;
        let dec = parse_dec_deg(path, line, parts[3])?;
        let vertex = SkyPoint::from_degrees(ra, dec);

        match contours.last_mut() {
            Some(current) if current.id == id => {
                if current.level != level {
                    return Err(CatalogError::at_line(
                        path,
                        line,
                        format!("polygon {id} changes level from {} to {level}", current.level),
                    ));
                }
                current.vertices.push(vertex);
            }
            _ => contours.push(MilkyWayContour {
                id,
                level,
                vertices: vec![vertex],
            }),
        }
    }
    Ok(contours)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_vertices_form_contours() {
        let text = "1 1 10 0\n1 1 11 0\n1 1 11 1\n2 3 20 5\n2 3 21 5\n";
        let contours = parse_milky_way(Path::new("mw.txt"), text).unwrap();
        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0].vertices.len(), 3);
        assert_eq!(contours[1].level, 3);
    }

    #[test]
    fn test_rejects_bad_level() {
        assert!(parse_milky_way(Path::new("mw.txt"), "1 0 10 0\n").is_err());
        let err = parse_milky_way(Path::new("mw.txt"), "1 1 10 0\n1 2 11 0\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
