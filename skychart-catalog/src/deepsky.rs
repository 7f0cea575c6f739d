//! Deep-sky catalog (`deepsky.txt`) and master-object linking.
//!
//! One object per line, `;`-separated:
//!
//! ```text
//! catalog;name;type;ra;dec;constellation;mag;major;minor;pa;master
//! NGC;224;G;00:42:44.3;+41:16:09;AND;3.4;190;60;35;
//! M;31;G;00:42:44.3;+41:16:09;AND;3.4;190;60;35;NGC 224
//! ```
//!
//! `major`/`minor` are diameters in arcminutes, `pa` is in degrees. An empty
//! or `-` magnitude means unknown. `master` names the record this one is an
//! alias of.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use skychart_core::angle::{parse_dms, parse_hms};
use skychart_core::constants::{ARCMIN_TO_RAD, DEG_TO_RAD};
use skychart_core::SkyPoint;

use crate::error::{CatalogError, CatalogResult};
use crate::text::{data_lines, parse_optional, read_text};

const FIELD_COUNT: usize = 11;

/// Index of a deep-sky record inside a [`CatalogStore`](crate::CatalogStore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeepSkyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeepSkyType {
    Galaxy,
    PartOfGalaxy,
    GalaxyCluster,
    OpenCluster,
    GlobularCluster,
    Asterism,
    PlanetaryNebula,
    Nebula,
    SupernovaRemnant,
    Unknown,
}

impl DeepSkyType {
    pub const ALL: [DeepSkyType; 10] = [
        Self::Galaxy,
        Self::PartOfGalaxy,
        Self::GalaxyCluster,
        Self::OpenCluster,
        Self::GlobularCluster,
        Self::Asterism,
        Self::PlanetaryNebula,
        Self::Nebula,
        Self::SupernovaRemnant,
        Self::Unknown,
    ];

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "G" => Self::Galaxy,
            "PG" => Self::PartOfGalaxy,
            "GALCL" => Self::GalaxyCluster,
            "OCL" => Self::OpenCluster,
            "GCL" => Self::GlobularCluster,
            "AST" => Self::Asterism,
            "PN" => Self::PlanetaryNebula,
            "N" => Self::Nebula,
            "SNR" => Self::SupernovaRemnant,
            _ => Self::Unknown,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Galaxy => "G",
            Self::PartOfGalaxy => "PG",
            Self::GalaxyCluster => "GALCL",
            Self::OpenCluster => "OCL",
            Self::GlobularCluster => "GCL",
            Self::Asterism => "AST",
            Self::PlanetaryNebula => "PN",
            Self::Nebula => "N",
            Self::SupernovaRemnant => "SNR",
            Self::Unknown => "?",
        }
    }
}

impl fmt::Display for DeepSkyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One deep-sky catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepSkyObject {
    pub catalog: String,
    pub name: String,
    pub kind: DeepSkyType,
    pub position: SkyPoint,
    pub constellation: String,
    /// `None` when the catalog has no magnitude for the object.
    pub mag: Option<f64>,
    /// Major axis diameter, radians.
    pub major_axis: Option<f64>,
    /// Minor axis diameter, radians.
    pub minor_axis: Option<f64>,
    /// Position angle, radians east of north.
    pub position_angle: Option<f64>,
    /// Canonical record when this one is an alias; `None` for canonical records.
    pub master: Option<DeepSkyId>,
}

impl DeepSkyObject {
    /// `"{catalog} {name}"`, e.g. `NGC 224`.
    pub fn designation(&self) -> String {
        format!("{} {}", self.catalog, self.name)
    }

    pub fn is_messier(&self) -> bool {
        self.catalog.eq_ignore_ascii_case("M")
    }

    pub fn messier_number(&self) -> Option<u32> {
        if self.is_messier() {
            self.name.trim().parse().ok()
        } else {
            None
        }
    }
}

/// Lookup key for a designation: upper case with whitespace removed, so
/// `m31`, `M 31` and `M31` are the same object.
pub fn normalize_designation(designation: &str) -> String {
    designation
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// A parsed line: the object plus its unresolved master designation.
#[derive(Debug, Clone)]
pub struct DeepSkyEntry {
    pub object: DeepSkyObject,
    pub master: Option<String>,
}

impl DeepSkyEntry {
    pub fn key(&self) -> String {
        normalize_designation(&self.object.designation())
    }
}

pub fn read_deepsky(path: &Path) -> CatalogResult<Vec<DeepSkyEntry>> {
    let text = read_text(path)?;
    parse_deepsky(path, &text)
}

pub fn parse_deepsky(path: &Path, text: &str) -> CatalogResult<Vec<DeepSkyEntry>> {
    data_lines(text)
        .map(|(line, content)| parse_entry(path, line, content))
        .collect()
}

fn parse_entry(path: &Path, line: usize, content: &str) -> CatalogResult<DeepSkyEntry> {
    let fields: Vec<&str> = content.split(';').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(CatalogError::at_line(
            path,
            line,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    }
    let (catalog, name) = (fields[0], fields[1]);
    if catalog.is_empty() || name.is_empty() {
        return Err(CatalogError::at_line(path, line, "empty catalog or name"));
    }

    let ra = parse_hms(fields[3]).map_err(|e| CatalogError::at_line(path, line, e.to_string()))?;
    let dec = parse_dms(fields[4]).map_err(|e| CatalogError::at_line(path, line, e.to_string()))?;

    let mag = parse_optional(path, line, "magnitude", fields[6])?;
    let major = parse_optional(path, line, "major axis", fields[7])?;
    let minor = parse_optional(path, line, "minor axis", fields[8])?;
    let pa = parse_optional(path, line, "position angle", fields[9])?;

    let master = match fields[10] {
        "" => None,
        m => Some(m.to_string()),
    };

    Ok(DeepSkyEntry {
        object: DeepSkyObject {
            catalog: catalog.to_string(),
            name: name.to_string(),
            kind: DeepSkyType::from_code(fields[2]),
            position: SkyPoint::new(ra, dec),
            constellation: fields[5].to_ascii_uppercase(),
            mag,
            major_axis: major.map(|a| a * ARCMIN_TO_RAD),
            minor_axis: minor.map(|a| a * ARCMIN_TO_RAD),
            position_angle: pa.map(|a| a * DEG_TO_RAD),
            master: None,
        },
        master,
    })
}

/// Resolves master designations into a flat canonical table.
///
/// Returns `canonical[i]`, the ultimate master of record `i` (itself for
/// canonical records), and sets `object.master` on every alias. Chains are
/// followed to the end so every alias points directly at its canonical
/// record. A master designation that names no record is logged and the
/// record stays canonical.
///
/// # Errors
/// [`CatalogError::ReferenceCycle`] when master references form a loop.
pub fn link_masters(path: &Path, entries: &mut [DeepSkyEntry]) -> CatalogResult<Vec<DeepSkyId>> {
    let by_key: HashMap<String, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.key(), i))
        .collect();

    let direct: Vec<Option<usize>> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let target = e.master.as_deref()?;
            match by_key.get(&normalize_designation(target)) {
                Some(&j) if j == i => None,
                Some(&j) => Some(j),
                None => {
                    log::warn!(
                        "{}: {} names unknown master '{}'; treating it as canonical",
                        path.display(),
                        e.object.designation(),
                        target
                    );
                    None
                }
            }
        })
        .collect();

    const UNVISITED: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![UNVISITED; entries.len()];
    let mut canonical: Vec<usize> = (0..entries.len()).collect();

    for start in 0..entries.len() {
        if state[start] == DONE {
            continue;
        }
        let mut chain = Vec::new();
        let mut current = start;
        let root = loop {
            match state[current] {
                DONE => break canonical[current],
                ON_PATH => {
                    let from = chain.iter().position(|&c| c == current).unwrap_or(0);
                    let mut names: Vec<String> = chain[from..]
                        .iter()
                        .map(|&c: &usize| entries[c].object.designation())
                        .collect();
                    names.push(entries[current].object.designation());
                    return Err(CatalogError::reference_cycle(path, names));
                }
                _ => {}
            }
            state[current] = ON_PATH;
            chain.push(current);
            match direct[current] {
                Some(next) => current = next,
                None => break current,
            }
        };
        for &c in &chain {
            canonical[c] = root;
            state[c] = DONE;
        }
    }

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.object.master = (canonical[i] != i).then_some(DeepSkyId(canonical[i]));
    }
    Ok(canonical.into_iter().map(DeepSkyId).collect())
}
