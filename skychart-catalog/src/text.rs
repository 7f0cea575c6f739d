//! Line-oriented helpers shared by the text catalog parsers.

use std::path::Path;

use crate::error::{CatalogError, CatalogResult};

pub(crate) fn read_text(path: &Path) -> CatalogResult<String> {
    std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))
}

/// Non-blank, non-comment lines with their 1-based line numbers.
pub(crate) fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parses a finite float, naming the field on failure.
pub(crate) fn parse_finite(path: &Path, line: usize, field: &str, value: &str) -> CatalogResult<f64> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| CatalogError::at_line(path, line, format!("invalid {field} '{value}'")))?;
    if !parsed.is_finite() {
        return Err(CatalogError::at_line(
            path,
            line,
            format!("non-finite {field} '{value}'"),
        ));
    }
    Ok(parsed)
}

/// Like [`parse_finite`] but empty or `-` means no value.
pub(crate) fn parse_optional(
    path: &Path,
    line: usize,
    field: &str,
    value: &str,
) -> CatalogResult<Option<f64>> {
    match value.trim() {
        "" | "-" => Ok(None),
        v => parse_finite(path, line, field, v).map(Some),
    }
}

/// Parses a declination in degrees and checks it is on the sphere.
pub(crate) fn parse_dec_deg(path: &Path, line: usize, value: &str) -> CatalogResult<f64> {
    let dec = parse_finite(path, line, "declination", value)?;
    if dec.abs() > 90.0 {
        return Err(CatalogError::at_line(
            path,
            line,
            format!("declination {dec} outside [-90, 90]"),
        ));
    }
    Ok(dec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_lines_skip_blank_and_comments() {
        let text = "# header\n\nA 1\n  # indented comment\n B 2 \n";
        let lines: Vec<_> = data_lines(text).collect();
        assert_eq!(lines, vec![(3, "A 1"), (5, "B 2")]);
    }

    #[test]
    fn test_parse_optional() {
        let p = Path::new("t.txt");
        assert_eq!(parse_optional(p, 1, "mag", "").unwrap(), None);
        assert_eq!(parse_optional(p, 1, "mag", " - ").unwrap(), None);
        assert_eq!(parse_optional(p, 1, "mag", "8.4").unwrap(), Some(8.4));
        assert!(parse_optional(p, 1, "mag", "NaN").is_err());
        assert!(parse_optional(p, 1, "mag", "bright").is_err());
    }

    #[test]
    fn test_parse_dec_range() {
        let p = Path::new("t.txt");
        assert!(parse_dec_deg(p, 1, "-90").is_ok());
        assert!(parse_dec_deg(p, 1, "90.5").is_err());
    }
}
