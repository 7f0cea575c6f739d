use skychart_catalog::{CatalogPaths, CatalogStore};
use skychart_core::constants::{DEG_TO_RAD, RAD_TO_DEG};
use skychart_core::format::format_magnitude;

fn main() -> anyhow::Result<()> {
    let data_dir = std::env::args()
        .nth(1)
        .expect("Usage: field_query <data_dir> [designation]");
    let designation = std::env::args().nth(2).unwrap_or_else(|| "M 42".to_string());

    let store = CatalogStore::load(&CatalogPaths::new(&data_dir))?;
    let id = store
        .lookup(&designation)
        .ok_or_else(|| anyhow::anyhow!("{designation} not in catalog"))?;
    let object = store.deepsky_object(id);
    let radius = 0.5 * DEG_TO_RAD;

    let stars = store.stars_in_field(object.position, radius, Some(10.0), None);
    println!(
        "\n{} stars brighter than 10 within 0.5° of {}:\n",
        stars.len(),
        object.designation()
    );
    for f in stars.iter().take(20) {
        println!(
            "  {:>12}  RA {:.6}°  Dec {:+.6}°  mag {}",
            f.star.id,
            f.position.ra * RAD_TO_DEG,
            f.position.dec * RAD_TO_DEG,
            format_magnitude(f.star.mag),
        );
    }

    println!("\nDeep-sky objects:");
    for id in store.deepsky_in_field(object.position, radius) {
        let aliases: Vec<String> = store
            .members(id)
            .iter()
            .map(|&m| store.deepsky_object(m).designation())
            .collect();
        println!("  {}", aliases.join(" = "));
    }

    Ok(())
}
