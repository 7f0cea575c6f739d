//! Chart text dictionaries.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skychart_catalog::DeepSkyType;
use skychart_core::format::RaUnits;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Nl,
}

impl Language {
    /// Unit suffixes for right ascension; Dutch writes hours as `u`.
    pub fn ra_units(self) -> RaUnits {
        match self {
            Language::En => RaUnits::HMS,
            Language::Nl => RaUnits {
                hours: "u",
                minutes: "m",
                seconds: "s",
            },
        }
    }

    /// Object type name for the deep-sky symbol legend.
    pub fn type_name(self, kind: DeepSkyType) -> &'static str {
        use DeepSkyType::*;
        match (self, kind) {
            (Language::En, Galaxy) => "Galaxy",
            (Language::En, PartOfGalaxy) => "Part of galaxy",
            (Language::En, GalaxyCluster) => "Galaxy cluster",
            (Language::En, OpenCluster) => "Open cluster",
            (Language::En, GlobularCluster) => "Globular cluster",
            (Language::En, Asterism) => "Asterism",
            (Language::En, PlanetaryNebula) => "Planetary nebula",
            (Language::En, Nebula) => "Diffuse nebula",
            (Language::En, SupernovaRemnant) => "Supernova remnant",
            (Language::En, Unknown) => "Unknown object",
            (Language::Nl, Galaxy) => "Melkwegstelsel",
            (Language::Nl, PartOfGalaxy) => "Deel van sterrenstelsel",
            (Language::Nl, GalaxyCluster) => "Cluster van sterrenstelsels",
            (Language::Nl, OpenCluster) => "Open sterrenhoop",
            (Language::Nl, GlobularCluster) => "Bolhoop",
            (Language::Nl, Asterism) => "Groepje sterren",
            (Language::Nl, PlanetaryNebula) => "Planetaire nevel",
            (Language::Nl, Nebula) => "Diffuse emissienevel",
            (Language::Nl, SupernovaRemnant) => "Supernovarest",
            (Language::Nl, Unknown) => "Onbekend",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "nl" => Ok(Language::Nl),
            other => Err(format!("unknown language '{other}', expected 'en' or 'nl'")),
        }
    }
}
