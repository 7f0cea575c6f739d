//! The loaded catalog set shared by every chart of a run.
//!
//! [`CatalogStore::load`] reads a data directory, merges an optional override
//! directory over it, links deep-sky aliases to their canonical records and
//! builds the field indexes. The store is immutable afterwards and can be
//! shared across threads by reference.

use std::collections::HashMap;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use skychart_core::{angular_separation, SkyPoint};

use crate::constellations::{merge_segments, read_segments, ConstellationSegments};
use crate::deepsky::{link_masters, normalize_designation, read_deepsky, DeepSkyEntry, DeepSkyId, DeepSkyObject};
use crate::error::{CatalogError, CatalogResult};
use crate::index::SkyIndex;
use crate::milkyway::{read_milky_way, MilkyWayContour};
use crate::names::{read_star_names, StarName};
use crate::stars::{read_star_catalog, StarRecord};

pub const STARS_FILE: &str = "stars.bin";
pub const DEEPSKY_FILE: &str = "deepsky.txt";
pub const CONSTELLATION_LINES_FILE: &str = "constellation_lines.txt";
pub const CONSTELLATION_BOUNDARIES_FILE: &str = "constellation_boundaries.txt";
pub const MILKY_WAY_FILE: &str = "milkyway.txt";
pub const STAR_NAMES_FILE: &str = "star_names.txt";

/// Extra search radius for stars when propagating proper motion, radians.
const PROPER_MOTION_MARGIN: f64 = 1.0 * skychart_core::constants::DEG_TO_RAD;

/// Where to find catalog files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPaths {
    pub data_dir: PathBuf,
    /// Entries here win over `data_dir` on identifier collision.
    pub override_dir: Option<PathBuf>,
}

impl CatalogPaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            override_dir: None,
        }
    }

    pub fn with_override(mut self, dir: impl Into<PathBuf>) -> Self {
        self.override_dir = Some(dir.into());
        self
    }

    fn base(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn overlay(&self, file: &str) -> Option<PathBuf> {
        self.override_dir
            .as_ref()
            .map(|d| d.join(file))
            .filter(|p| p.is_file())
    }
}

/// Already-parsed catalog content, for building a store without files.
#[derive(Debug, Clone, Default)]
pub struct CatalogParts {
    pub stars: Vec<StarRecord>,
    pub deepsky: Vec<DeepSkyEntry>,
    pub constellation_lines: Vec<ConstellationSegments>,
    pub constellation_boundaries: Vec<ConstellationSegments>,
    pub milky_way: Vec<MilkyWayContour>,
    pub star_names: Vec<StarName>,
}

/// A star found in a field, at the epoch the query asked for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStar<'a> {
    pub star: &'a StarRecord,
    pub position: SkyPoint,
}

#[derive(Debug)]
pub struct CatalogStore {
    stars: Vec<StarRecord>,
    star_index: SkyIndex,
    deepsky: Vec<DeepSkyObject>,
    deepsky_index: SkyIndex,
    canonical: Vec<DeepSkyId>,
    members: Vec<Vec<DeepSkyId>>,
    by_designation: HashMap<String, DeepSkyId>,
    constellation_lines: Vec<ConstellationSegments>,
    constellation_boundaries: Vec<ConstellationSegments>,
    milky_way: Vec<MilkyWayContour>,
    star_names: Vec<StarName>,
    names_by_star: HashMap<u64, usize>,
}

/// Keeps base order, replaces colliding entries in place, appends new ones.
fn merge_by_key<T, K: Eq + Hash>(base: Vec<T>, overrides: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut merged = base;
    let mut position: HashMap<K, usize> = merged.iter().enumerate().map(|(i, t)| (key(t), i)).collect();
    for item in overrides {
        match position.get(&key(&item)) {
            Some(&i) => merged[i] = item,
            None => {
                position.insert(key(&item), merged.len());
                merged.push(item);
            }
        }
    }
    merged
}

/// Reads a file from the base directory and, when present, the override
/// directory. A missing required file is an error only if neither has it.
fn read_layered<T>(
    paths: &CatalogPaths,
    file: &str,
    required: bool,
    read: impl Fn(&Path) -> CatalogResult<T>,
) -> CatalogResult<(Option<T>, Option<T>, PathBuf)> {
    let base_path = paths.base(file);
    let overlay_path = paths.overlay(file);
    let base = if base_path.is_file() {
        Some(read(&base_path)?)
    } else if required && overlay_path.is_none() {
        return Err(CatalogError::not_found(base_path));
    } else {
        None
    };
    let overlay = match &overlay_path {
        Some(p) => Some(read(p)?),
        None => None,
    };
    Ok((base, overlay, overlay_path.unwrap_or(base_path)))
}

impl CatalogStore {
    /// Loads every catalog file under `paths`.
    ///
    /// # Errors
    /// [`CatalogError::NotFound`] when `stars.bin` or `deepsky.txt` is
    /// missing, [`CatalogError::Format`] or [`CatalogError::ReferenceCycle`]
    /// for malformed content. Optional files may be absent.
    pub fn load(paths: &CatalogPaths) -> CatalogResult<Self> {
        let (base, overlay, _) = read_layered(paths, STARS_FILE, true, |p| {
            read_star_catalog(p).map(|(_, stars)| stars)
        })?;
        let stars = merge_by_key(base.unwrap_or_default(), overlay.unwrap_or_default(), |s| s.id);

        let (base, overlay, deepsky_path) = read_layered(paths, DEEPSKY_FILE, true, read_deepsky)?;
        let mut deepsky = merge_by_key(
            base.unwrap_or_default(),
            overlay.unwrap_or_default(),
            DeepSkyEntry::key,
        );
        let canonical = link_masters(&deepsky_path, &mut deepsky)?;

        let (base, overlay, _) = read_layered(paths, CONSTELLATION_LINES_FILE, false, read_segments)?;
        let constellation_lines = merge_segments(base.unwrap_or_default(), overlay.unwrap_or_default());

        let (base, overlay, _) =
            read_layered(paths, CONSTELLATION_BOUNDARIES_FILE, false, read_segments)?;
        let constellation_boundaries =
            merge_segments(base.unwrap_or_default(), overlay.unwrap_or_default());

        let (base, overlay, _) = read_layered(paths, MILKY_WAY_FILE, false, read_milky_way)?;
        let milky_way = merge_by_key(base.unwrap_or_default(), overlay.unwrap_or_default(), |c| c.id);

        let (base, overlay, _) = read_layered(paths, STAR_NAMES_FILE, false, read_star_names)?;
        let star_names = merge_by_key(base.unwrap_or_default(), overlay.unwrap_or_default(), |n| {
            n.star_id
        });

        let store = Self::assemble(
            stars,
            deepsky,
            canonical,
            constellation_lines,
            constellation_boundaries,
            milky_way,
            star_names,
        );
        log::info!(
            "Loaded catalogs from {}: {} stars, {} deep-sky objects ({} canonical), {} Milky Way contours",
            paths.data_dir.display(),
            store.stars.len(),
            store.deepsky.len(),
            store.canonical_count(),
            store.milky_way.len()
        );
        Ok(store)
    }

    /// Builds a store from parsed content. Deep-sky aliases are linked the
    /// same way as in [`CatalogStore::load`].
    pub fn from_parts(parts: CatalogParts) -> CatalogResult<Self> {
        let mut deepsky = parts.deepsky;
        let canonical = link_masters(Path::new(DEEPSKY_FILE), &mut deepsky)?;
        Ok(Self::assemble(
            parts.stars,
            deepsky,
            canonical,
            parts.constellation_lines,
            parts.constellation_boundaries,
            parts.milky_way,
            parts.star_names,
        ))
    }

    fn assemble(
        stars: Vec<StarRecord>,
        deepsky: Vec<DeepSkyEntry>,
        canonical: Vec<DeepSkyId>,
        constellation_lines: Vec<ConstellationSegments>,
        constellation_boundaries: Vec<ConstellationSegments>,
        milky_way: Vec<MilkyWayContour>,
        star_names: Vec<StarName>,
    ) -> Self {
        let deepsky: Vec<DeepSkyObject> = deepsky.into_iter().map(|e| e.object).collect();

        let mut members = vec![Vec::new(); deepsky.len()];
        for (i, root) in canonical.iter().enumerate() {
            members[root.0].push(DeepSkyId(i));
        }
        for (i, group) in members.iter_mut().enumerate() {
            // canonical record first, aliases in catalog order
            group.sort_by_key(|id| (id.0 != i, id.0));
        }

        let by_designation = deepsky
            .iter()
            .enumerate()
            .map(|(i, o)| (normalize_designation(&o.designation()), DeepSkyId(i)))
            .collect();
        let names_by_star = star_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.star_id, i))
            .collect();

        Self {
            star_index: SkyIndex::build(stars.iter().map(|s| (s.position(), Some(s.mag)))),
            deepsky_index: SkyIndex::build(deepsky.iter().map(|o| (o.position, o.mag))),
            stars,
            deepsky,
            canonical,
            members,
            by_designation,
            constellation_lines,
            constellation_boundaries,
            milky_way,
            star_names,
            names_by_star,
        }
    }

    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    pub fn deepsky(&self) -> &[DeepSkyObject] {
        &self.deepsky
    }

    pub fn deepsky_object(&self, id: DeepSkyId) -> &DeepSkyObject {
        &self.deepsky[id.0]
    }

    pub fn constellation_lines(&self) -> &[ConstellationSegments] {
        &self.constellation_lines
    }

    pub fn constellation_boundaries(&self) -> &[ConstellationSegments] {
        &self.constellation_boundaries
    }

    pub fn milky_way(&self) -> &[MilkyWayContour] {
        &self.milky_way
    }

    pub fn star_names(&self) -> &[StarName] {
        &self.star_names
    }

    pub fn star_name(&self, star_id: u64) -> Option<&StarName> {
        self.names_by_star.get(&star_id).map(|&i| &self.star_names[i])
    }

    /// Stars within `radius` of `center` and no fainter than `mag_limit`,
    /// brightest first (ties by identifier).
    ///
    /// With `epoch` (Julian year) positions are propagated from J2000.0
    /// before the distance test and returned at that epoch.
    pub fn stars_in_field(
        &self,
        center: SkyPoint,
        radius: f64,
        mag_limit: Option<f64>,
        epoch: Option<f64>,
    ) -> Vec<FieldStar<'_>> {
        let search_radius = if epoch.is_some() {
            radius + PROPER_MOTION_MARGIN
        } else {
            radius
        };
        let mut found: Vec<FieldStar<'_>> = self
            .star_index
            .candidates(center, search_radius, mag_limit)
            .into_iter()
            .filter_map(|i| {
                let star = &self.stars[i];
                let position = epoch.map_or(star.position(), |e| star.position_at(e));
                (angular_separation(center, position) <= radius).then_some(FieldStar { star, position })
            })
            .collect();
        found.sort_by(|a, b| a.star.mag.total_cmp(&b.star.mag).then(a.star.id.cmp(&b.star.id)));
        found
    }

    /// Deep-sky records (aliases included) within `radius` of `center`, in
    /// catalog order.
    pub fn deepsky_in_field(&self, center: SkyPoint, radius: f64) -> Vec<DeepSkyId> {
        self.deepsky_index
            .query(center, radius, None)
            .into_iter()
            .map(DeepSkyId)
            .collect()
    }

    /// Finds a record by designation, ignoring case and spaces.
    pub fn lookup(&self, designation: &str) -> Option<DeepSkyId> {
        self.by_designation.get(&normalize_designation(designation)).copied()
    }

    /// The canonical record `id` resolves to (itself when canonical).
    pub fn canonical(&self, id: DeepSkyId) -> DeepSkyId {
        self.canonical[id.0]
    }

    /// Every record that resolves to the same canonical object as `id`,
    /// canonical first.
    pub fn members(&self, id: DeepSkyId) -> &[DeepSkyId] {
        &self.members[self.canonical(id).0]
    }

    pub fn canonical_count(&self) -> usize {
        self.canonical.iter().enumerate().filter(|(i, c)| c.0 == *i).count()
    }

    /// Messier records sorted by number; each number appears once.
    pub fn messier_objects(&self) -> Vec<DeepSkyId> {
        let mut found: Vec<(u32, DeepSkyId)> = self
            .deepsky
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.messier_number().map(|n| (n, DeepSkyId(i))))
            .collect();
        found.sort();
        found.dedup_by_key(|(n, _)| *n);
        found.into_iter().map(|(_, id)| id).collect()
    }
}
