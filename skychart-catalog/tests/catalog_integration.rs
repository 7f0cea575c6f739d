use std::fs;
use std::path::Path;

use skychart_catalog::{
    write_star_catalog, CatalogError, CatalogPaths, CatalogStore, DeepSkyType, StarRecord,
};
use skychart_core::constants::DEG_TO_RAD;
use skychart_core::SkyPoint;
use tempfile::TempDir;

fn star(id: u64, ra_deg: f64, dec_deg: f64, mag: f64) -> StarRecord {
    let p = SkyPoint::from_degrees(ra_deg, dec_deg);
    StarRecord {
        id,
        ra: p.ra,
        dec: p.dec,
        mag,
        pmra: 0.0,
        pmdec: 0.0,
        spectral_class: Some('G'),
        flags: 0,
    }
}

const DEEPSKY: &str = "\
# catalog;name;type;ra;dec;constellation;mag;major;minor;pa;master
NGC;1976;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;
M;42;N;05:35:17.3;-05:23:28;ORI;4.0;85;60;;NGC 1976
NGC;1982;N;05:35:31;-05:16:03;ORI;9.0;20;15;;
M;43;N;05:35:31;-05:16:03;ORI;9.0;20;15;;NGC 1982
NGC;1981;OCL;05:35:09;-04:25:54;ORI;4.2;25;;;
";

fn write_data_dir(dir: &Path) {
    write_star_catalog(
        &dir.join("stars.bin"),
        &[
            star(1, 83.82, -5.39, 6.7),
            star(2, 83.86, -5.40, 5.1),
            star(3, 84.05, -1.20, 1.7),
        ],
    )
    .unwrap();
    fs::write(dir.join("deepsky.txt"), DEEPSKY).unwrap();
    fs::write(
        dir.join("constellation_lines.txt"),
        "ORI 83.0 -0.3 84.05 -1.20\nORI 84.05 -1.20 85.19 -1.94\nTAU 84.41 21.14 81.57 28.61\n",
    )
    .unwrap();
    fs::write(dir.join("milkyway.txt"), "1 1 80 -10\n1 1 90 -10\n1 1 90 0\n1 1 80 0\n").unwrap();
    fs::write(dir.join("star_names.txt"), "3;ORI;eps\n").unwrap();
}

#[test]
fn test_load_full_directory() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());

    let store = CatalogStore::load(&CatalogPaths::new(dir.path())).unwrap();
    assert_eq!(store.stars().len(), 3);
    assert_eq!(store.deepsky().len(), 5);
    assert_eq!(store.canonical_count(), 3);
    assert_eq!(store.constellation_lines().len(), 2);
    assert!(store.constellation_boundaries().is_empty());
    assert_eq!(store.milky_way()[0].vertices.len(), 4);
    assert_eq!(store.star_name(3).unwrap().label(), "ε");

    let m42 = store.lookup("m42").unwrap();
    let ngc1976 = store.lookup("NGC 1976").unwrap();
    assert_eq!(store.canonical(m42), ngc1976);
    assert_eq!(store.deepsky_object(m42).kind, DeepSkyType::Nebula);
}

#[test]
fn test_field_query_around_orion_nebula() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    let store = CatalogStore::load(&CatalogPaths::new(dir.path())).unwrap();

    let m42 = store.lookup("M 42").unwrap();
    let center = store.deepsky_object(m42).position;
    let stars = store.stars_in_field(center, 0.5 * DEG_TO_RAD, None, None);
    let ids: Vec<u64> = stars.iter().map(|f| f.star.id).collect();
    assert_eq!(ids, vec![2, 1]);

    let objects = store.deepsky_in_field(center, 0.5 * DEG_TO_RAD);
    assert_eq!(objects.len(), 4);
}

#[test]
fn test_override_directory_wins() {
    let base = TempDir::new().unwrap();
    let over = TempDir::new().unwrap();
    write_data_dir(base.path());

    write_star_catalog(&over.path().join("stars.bin"), &[star(2, 83.86, -5.40, 3.3), star(9, 10.0, 10.0, 4.0)])
        .unwrap();
    fs::write(
        over.path().join("deepsky.txt"),
        "NGC;1981;OCL;05:35:09;-04:25:54;ORI;4.6;25;;;\n",
    )
    .unwrap();
    fs::write(over.path().join("constellation_lines.txt"), "ORI 80 0 81 1\n").unwrap();

    let paths = CatalogPaths::new(base.path()).with_override(over.path());
    let store = CatalogStore::load(&paths).unwrap();

    assert_eq!(store.stars().len(), 4);
    let replaced = store.stars().iter().find(|s| s.id == 2).unwrap();
    assert!((replaced.mag - 3.3).abs() < 1e-6);

    let ngc1981 = store.lookup("NGC 1981").unwrap();
    assert_eq!(store.deepsky_object(ngc1981).mag, Some(4.6));
    assert_eq!(store.deepsky().len(), 5);

    let orion = store
        .constellation_lines()
        .iter()
        .find(|c| c.constellation == "ORI")
        .unwrap();
    assert_eq!(orion.segments.len(), 1);
}

#[test]
fn test_missing_required_file() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    fs::remove_file(dir.path().join("deepsky.txt")).unwrap();

    let err = CatalogStore::load(&CatalogPaths::new(dir.path())).unwrap_err();
    match err {
        CatalogError::NotFound { path } => assert!(path.ends_with("deepsky.txt")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_corrupt_star_catalog_is_fatal() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    let path = dir.path().join("stars.bin");
    let mut bytes = fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 3);
    fs::write(&path, bytes).unwrap();

    let err = CatalogStore::load(&CatalogPaths::new(dir.path())).unwrap_err();
    assert!(matches!(err, CatalogError::Format { .. }), "{err}");
    assert!(err.to_string().contains("stars.bin"));
}

#[test]
fn test_reference_cycle_rejected() {
    let dir = TempDir::new().unwrap();
    write_data_dir(dir.path());
    fs::write(
        dir.path().join("deepsky.txt"),
        "NGC;1;G;00:00:00;+00:00:00;PSC;12;;;;NGC 2\nNGC;2;G;00:00:00;+00:00:00;PSC;12;;;;NGC 1\n",
    )
    .unwrap();
    let err = CatalogStore::load(&CatalogPaths::new(dir.path())).unwrap_err();
    assert!(matches!(err, CatalogError::ReferenceCycle { .. }), "{err}");
}
