//! Bayer designations for bright stars (`star_names.txt`).
//!
//! `star_id;constellation;bayer`, e.g. `32349;CMA;alp`.

use std::path::Path;

use crate::error::{CatalogError, CatalogResult};
use crate::text::{data_lines, read_text};

const GREEK_LETTERS: [(&str, char); 24] = [
    ("alp", 'α'),
    ("bet", 'β'),
    ("gam", 'γ'),
    ("del", 'δ'),
    ("eps", 'ε'),
    ("zet", 'ζ'),
    ("eta", 'η'),
    ("the", 'θ'),
    ("iot", 'ι'),
    ("kap", 'κ'),
    ("lam", 'λ'),
    ("mu", 'μ'),
    ("nu", 'ν'),
    ("xi", 'ξ'),
    ("omi", 'ο'),
    ("pi", 'π'),
    ("rho", 'ρ'),
    ("sig", 'σ'),
    ("tau", 'τ'),
    ("ups", 'υ'),
    ("phi", 'φ'),
    ("chi", 'χ'),
    ("psi", 'ψ'),
    ("ome", 'ω'),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarName {
    pub star_id: u64,
    pub constellation: String,
    pub bayer: String,
}

impl StarName {
    /// The chart label: a Greek letter, keeping any numeric suffix
    /// (`alp2` → `α2`). Unknown abbreviations are returned as written.
    pub fn label(&self) -> String {
        greek_label(&self.bayer)
    }
}

pub fn greek_label(bayer: &str) -> String {
    let lower = bayer.to_ascii_lowercase();
    let stem_len = lower
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(lower.len());
    let (stem, suffix) = lower.split_at(stem_len);
    match GREEK_LETTERS.iter().find(|(abbr, _)| *abbr == stem) {
        Some((_, letter)) => format!("{letter}{suffix}"),
        None => bayer.to_string(),
    }
}

pub fn read_star_names(path: &Path) -> CatalogResult<Vec<StarName>> {
    let text = read_text(path)?;
    parse_star_names(path, &text)
}

pub fn parse_star_names(path: &Path, text: &str) -> CatalogResult<Vec<StarName>> {
    data_lines(text)
        .map(|(line, content)| {
            let fields: Vec<&str> = content.split(';').map(str::trim).collect();
            if fields.len() != 3 || fields[2].is_empty() {
                return Err(CatalogError::at_line(
                    path,
                    line,
                    "expected 'star_id;constellation;bayer'",
                ));
            }
            let star_id = fields[0].parse().map_err(|_| {
                CatalogError::at_line(path, line, format!("invalid star id '{}'", fields[0]))
            })?;
            Ok(StarName {
                star_id,
                constellation: fields[1].to_ascii_uppercase(),
                bayer: fields[2].to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greek_label() {
        assert_eq!(greek_label("alp"), "α");
        assert_eq!(greek_label("Ome"), "ω");
        assert_eq!(greek_label("alp2"), "α2");
        assert_eq!(greek_label("zzz"), "zzz");
    }

    #[test]
    fn test_parse_names() {
        let names = parse_star_names(Path::new("n.txt"), "32349;cma;alp\n# x\n27989;ORI;alp\n").unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[0].constellation, "CMA");
        assert_eq!(names[0].label(), "α");
        assert!(parse_star_names(Path::new("n.txt"), "x;ORI;alp\n").is_err());
        assert!(parse_star_names(Path::new("n.txt"), "1;ORI\n").is_err());
    }
}
