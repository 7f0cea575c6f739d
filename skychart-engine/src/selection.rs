//! Which catalog entries end up on a chart.
//!
//! A deep-sky record passes when its catalog is allowed and one of these
//! holds, checked in order:
//!
//! 1. its magnitude is known and no fainter than `deepsky_mag_limit`
//! 2. it is a Messier record and `force_messier` is set
//! 3. it is an asterism and `force_asterisms` is set, or it is a Messier asterism
//! 4. its magnitude is unknown and `force_unknown_mag` is set
//!
//! Passing records are mapped to their canonical record, so an NGC object and
//! its Messier alias appear once, carrying both designations. The result is
//! sorted (known magnitudes brightest first, then unknown, ties by
//! designation) and does not depend on catalog iteration order.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use skychart_catalog::{
    CatalogStore, ConstellationSegments, DeepSkyId, DeepSkyObject, DeepSkyType, MilkyWayContour,
    Segment, StarRecord,
};
use skychart_core::{angular_separation, Field, SkyPoint};

/// Catalogs selected without being asked for.
pub const DEFAULT_CATALOGS: [&str; 3] = ["NGC", "IC", "M"];

/// Filters for one chart request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionParams {
    pub deepsky_mag_limit: f64,
    pub star_mag_limit: f64,
    pub force_messier: bool,
    pub force_asterisms: bool,
    pub force_unknown_mag: bool,
    /// Catalog codes allowed on top of [`DEFAULT_CATALOGS`].
    pub extra_catalogs: Vec<String>,
    /// Julian year to propagate stellar proper motion to.
    pub epoch: Option<f64>,
}

impl Default for SelectionParams {
    fn default() -> Self {
        Self {
            deepsky_mag_limit: 12.5,
            star_mag_limit: 13.8,
            force_messier: false,
            force_asterisms: false,
            force_unknown_mag: false,
            extra_catalogs: Vec::new(),
            epoch: None,
        }
    }
}

impl SelectionParams {
    pub fn allows_catalog(&self, catalog: &str) -> bool {
        DEFAULT_CATALOGS
            .iter()
            .copied()
            .chain(self.extra_catalogs.iter().map(String::as_str))
            .any(|c| c.eq_ignore_ascii_case(catalog))
    }

    /// The pass rule for a single deep-sky record, aliases included.
    pub fn passes(&self, object: &DeepSkyObject) -> bool {
        if !self.allows_catalog(&object.catalog) {
            return false;
        }
        let messier = object.is_messier();
        match object.mag {
            Some(mag) if mag <= self.deepsky_mag_limit => true,
            _ if messier && self.force_messier => true,
            _ if object.kind == DeepSkyType::Asterism && (self.force_asterisms || messier) => true,
            None => self.force_unknown_mag,
            Some(_) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedStar<'a> {
    pub star: &'a StarRecord,
    /// Position at the requested epoch.
    pub position: SkyPoint,
    /// Greek Bayer label, at most once per constellation and letter.
    pub label: Option<String>,
}

/// One canonical deep-sky object with every designation that refers to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedDeepSky<'a> {
    pub id: DeepSkyId,
    pub object: &'a DeepSkyObject,
    /// Canonical designation first, then aliases in catalog order.
    pub designations: Vec<String>,
    pub messier_number: Option<u32>,
    /// Canonical magnitude, or the first alias magnitude when it has none.
    pub mag: Option<f64>,
}

impl SelectedDeepSky<'_> {
    /// Chart label: `M n` for Messier objects, the canonical designation otherwise.
    pub fn label(&self) -> String {
        match self.messier_number {
            Some(n) => format!("M {n}"),
            None => self.object.designation(),
        }
    }

    /// Whether `designation` (in any spelling) names this object.
    pub fn answers_to(&self, designation: &str) -> bool {
        let wanted = skychart_catalog::normalize_designation(designation);
        self.designations
            .iter()
            .any(|d| skychart_catalog::normalize_designation(d) == wanted)
    }
}

/// A user-supplied position drawn with the unknown-object symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraMarker {
    pub position: SkyPoint,
    pub label: String,
}

/// Everything one chart draws, in drawing order per kind.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub stars: Vec<SelectedStar<'a>>,
    pub deepsky: Vec<SelectedDeepSky<'a>>,
    pub constellation_lines: Vec<Segment>,
    pub constellation_boundaries: Vec<Segment>,
    pub milky_way: Vec<&'a MilkyWayContour>,
    pub extra_markers: Vec<ExtraMarker>,
    /// Limit the star symbols are sized against.
    pub star_mag_limit: f64,
}

impl Selection<'_> {
    /// The selected object `designation` belongs to, if any.
    pub fn find_deepsky(&self, designation: &str) -> Option<&SelectedDeepSky<'_>> {
        self.deepsky.iter().find(|d| d.answers_to(designation))
    }
}

/// Selection over the whole sky.
pub fn select<'a>(store: &'a CatalogStore, params: &SelectionParams) -> Selection<'a> {
    let stars = store
        .stars()
        .iter()
        .filter(|s| s.mag <= params.star_mag_limit)
        .map(|s| (s, params.epoch.map_or(s.position(), |e| s.position_at(e))));
    let mut stars: Vec<(&StarRecord, SkyPoint)> = stars.collect();
    stars.sort_by(|a, b| a.0.mag.total_cmp(&b.0.mag).then(a.0.id.cmp(&b.0.id)));

    let records = (0..store.deepsky().len()).map(DeepSkyId);
    Selection {
        stars: label_stars(store, stars),
        deepsky: select_deepsky(store, params, records),
        constellation_lines: all_segments(store.constellation_lines()),
        constellation_boundaries: all_segments(store.constellation_boundaries()),
        milky_way: store.milky_way().iter().collect(),
        extra_markers: Vec::new(),
        star_mag_limit: params.star_mag_limit,
    }
}

/// Selection restricted to `field`. Overlays keep every segment that can
/// reach the field; the layout clips them.
pub fn select_in_field<'a>(store: &'a CatalogStore, params: &SelectionParams, field: &Field) -> Selection<'a> {
    let (center, radius) = (field.center(), field.radius());
    let stars = store
        .stars_in_field(center, radius, Some(params.star_mag_limit), params.epoch)
        .into_iter()
        .map(|f| (f.star, f.position))
        .collect();
    let records = store.deepsky_in_field(center, radius);

    let reaches = |s: &Segment| angular_separation(center, s.start) <= radius + angular_separation(s.start, s.end);
    let in_field = |groups: &[ConstellationSegments]| -> Vec<Segment> {
        groups
            .iter()
            .flat_map(|g| g.segments.iter())
            .filter(|s| reaches(s))
            .copied()
            .collect()
    };

    let selection = Selection {
        stars: label_stars(store, stars),
        deepsky: select_deepsky(store, params, records.into_iter()),
        constellation_lines: in_field(store.constellation_lines()),
        constellation_boundaries: in_field(store.constellation_boundaries()),
        milky_way: store.milky_way().iter().collect(),
        extra_markers: Vec::new(),
        star_mag_limit: params.star_mag_limit,
    };
    log::debug!(
        "selected {} stars, {} deep-sky objects, {} constellation segments",
        selection.stars.len(),
        selection.deepsky.len(),
        selection.constellation_lines.len()
    );
    selection
}

fn all_segments(groups: &[ConstellationSegments]) -> Vec<Segment> {
    groups.iter().flat_map(|g| g.segments.iter().copied()).collect()
}

/// Attaches Bayer labels; expects stars brightest first so the brightest
/// star keeps a letter shared by several records.
fn label_stars<'a>(store: &'a CatalogStore, stars: Vec<(&'a StarRecord, SkyPoint)>) -> Vec<SelectedStar<'a>> {
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    stars
        .into_iter()
        .map(|(star, position)| {
            let label = store
                .star_name(star.id)
                .filter(|n| seen.insert((n.constellation.as_str(), n.bayer.as_str())))
                .map(|n| n.label());
            SelectedStar { star, position, label }
        })
        .collect()
}

fn select_deepsky<'a>(
    store: &'a CatalogStore,
    params: &SelectionParams,
    records: impl Iterator<Item = DeepSkyId>,
) -> Vec<SelectedDeepSky<'a>> {
    let canonical: BTreeSet<DeepSkyId> = records
        .filter(|&id| params.passes(store.deepsky_object(id)))
        .map(|id| store.canonical(id))
        .collect();

    let mut selected: Vec<SelectedDeepSky<'a>> = canonical
        .into_iter()
        .map(|id| {
            let members = store.members(id);
            let objects = members.iter().map(|&m| store.deepsky_object(m));
            let object = store.deepsky_object(id);
            SelectedDeepSky {
                id,
                object,
                designations: objects.clone().map(DeepSkyObject::designation).collect(),
                messier_number: objects.clone().find_map(DeepSkyObject::messier_number),
                mag: object.mag.or_else(|| objects.clone().find_map(|o| o.mag)),
            }
        })
        .collect();

    selected.sort_by(|a, b| {
        let by_mag = match (a.mag, b.mag) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        by_mag
            .then_with(|| a.object.designation().cmp(&b.object.designation()))
            .then(a.id.cmp(&b.id))
    });
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use skychart_catalog::deepsky::parse_deepsky;
    use skychart_catalog::{CatalogParts, StarName};
    use std::path::Path;

    fn star(id: u64, ra_deg: f64, dec_deg: f64, mag: f64) -> StarRecord {
        let p = SkyPoint::from_degrees(ra_deg, dec_deg);
        StarRecord {
            id,
            ra: p.ra,
            dec: p.dec,
            mag,
            pmra: 0.0,
            pmdec: 0.0,
            spectral_class: None,
            flags: 0,
        }
    }

    const ORION: &str = "NGC;1976;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;\n\
                         M;42;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;NGC 1976\n\
                         NGC;1981;OCL;05:35:09.0;-04:25:54;ORI;4.2;25;;;\n\
                         NGC;1980;OCL;05:35:24.0;-05:54:54;ORI;;14;;;\n\
                         M;73;AST;20:58:54.0;-12:38:08;AQR;;2.8;;;\n\
                         NGC;7772;AST;23:51:46.0;+16:14:54;PEG;13.5;1.5;;;\n\
                         UGC;3273;G;05:30:00.0;-05:00:00;ORI;13.0;1;0.5;30;\n\
                         M;99;G;12:18:49.6;+14:24:59;COM;13.0;5.4;4.7;;\n";

    fn orion_store(stars: Vec<StarRecord>, names: Vec<StarName>) -> CatalogStore {
        CatalogStore::from_parts(CatalogParts {
            stars,
            deepsky: parse_deepsky(Path::new("deepsky.txt"), ORION).unwrap(),
            star_names: names,
            ..CatalogParts::default()
        })
        .unwrap()
    }

    fn labels(selection: &Selection<'_>) -> Vec<String> {
        selection.deepsky.iter().map(SelectedDeepSky::label).collect()
    }

    #[test]
    fn test_star_limit() {
        let store = orion_store(vec![star(1, 0.0, 0.0, 5.0)], vec![]);
        let bright = SelectionParams {
            star_mag_limit: 6.0,
            ..SelectionParams::default()
        };
        assert_eq!(select(&store, &bright).stars.len(), 1);
        let faint = SelectionParams {
            star_mag_limit: 4.0,
            ..SelectionParams::default()
        };
        assert!(select(&store, &faint).stars.is_empty());
    }

    #[test]
    fn test_alias_selected_once_with_both_designations() {
        let store = orion_store(vec![], vec![]);
        let selection = select(&store, &SelectionParams::default());
        let m42: Vec<_> = selection
            .deepsky
            .iter()
            .filter(|d| d.answers_to("M 42"))
            .collect();
        assert_eq!(m42.len(), 1);
        assert_eq!(m42[0].designations, vec!["NGC 1976", "M 42"]);
        assert_eq!(m42[0].label(), "M 42");
        assert!(selection.find_deepsky("ngc1976").is_some());
    }

    #[test]
    fn test_pass_rules() {
        let store = orion_store(vec![], vec![]);

        let plain = SelectionParams {
            deepsky_mag_limit: 10.0,
            ..SelectionParams::default()
        };
        // M 73 passes as a Messier asterism without a magnitude
        assert_eq!(labels(&select(&store, &plain)), vec!["M 42", "NGC 1981", "M 73"]);

        let forced = SelectionParams {
            deepsky_mag_limit: 10.0,
            force_messier: true,
            force_asterisms: true,
            force_unknown_mag: true,
            ..SelectionParams::default()
        };
        assert_eq!(
            labels(&select(&store, &forced)),
            vec!["M 42", "NGC 1981", "M 99", "NGC 7772", "M 73", "NGC 1980"]
        );
    }

    #[test]
    fn test_extra_catalogs() {
        let store = orion_store(vec![], vec![]);
        let params = SelectionParams::default();
        assert!(select(&store, &params).find_deepsky("UGC 3273").is_none());
        let params = SelectionParams {
            extra_catalogs: vec!["ugc".to_string()],
            ..SelectionParams::default()
        };
        assert!(select(&store, &params).find_deepsky("UGC 3273").is_some());
    }

    #[test]
    fn test_selection_is_idempotent() {
        let store = orion_store(vec![star(2, 83.8, -5.4, 7.0), star(1, 83.9, -5.3, 7.0)], vec![]);
        let params = SelectionParams {
            force_unknown_mag: true,
            ..SelectionParams::default()
        };
        let a = select(&store, &params);
        let b = select(&store, &params);
        assert_eq!(a.deepsky, b.deepsky);
        assert_eq!(a.stars, b.stars);
        let ids: Vec<u64> = a.stars.iter().map(|s| s.star.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_select_in_field() {
        let store = orion_store(vec![star(1, 83.82, -5.39, 6.0), star(2, 120.0, 10.0, 3.0)], vec![]);
        let m42 = store.deepsky_object(store.lookup("M42").unwrap()).position;
        let field = Field::new(m42.ra, m42.dec, 2.0f64.to_radians()).unwrap();
        let selection = select_in_field(&store, &SelectionParams::default(), &field);
        assert_eq!(selection.stars.len(), 1);
        assert_eq!(labels(&selection), vec!["M 42", "NGC 1981"]);
    }

    #[test]
    fn test_star_labels_once_per_letter() {
        let name = |id: u64| StarName {
            star_id: id,
            constellation: "ORI".to_string(),
            bayer: "the1".to_string(),
        };
        let store = orion_store(
            vec![star(1, 83.82, -5.39, 6.7), star(2, 83.81, -5.38, 5.1)],
            vec![name(1), name(2)],
        );
        let selection = select(&store, &SelectionParams::default());
        let labelled: Vec<(u64, Option<&str>)> = selection
            .stars
            .iter()
            .map(|s| (s.star.id, s.label.as_deref()))
            .collect();
        assert_eq!(labelled, vec![(2, Some("θ1")), (1, None)]);
    }
}
