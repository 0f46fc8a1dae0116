use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::DatasetError;

static SUBURBS_JSON: &str = include_str!("../../data/suburbs.json");

/// Geographic centre of a suburb, used for map rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lng: f64,
}

/// Citation attached to a suburb data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceNote {
    pub label: String,
    pub url: String,
}

/// Price range for the suburb's active stock, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBand {
    pub min: u64,
    pub max: u64,
    pub currency: String,
}

/// Structured market facts rendered on a suburb page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoints {
    pub price_band: PriceBand,
    pub property_types: Vec<String>,
    pub commute_anchors: Vec<String>,
    pub lifestyle_tags: Vec<String>,
    pub schools_note: String,
    pub safety_note: String,
    pub walkability: String,
    pub investment_potential: String,
    pub source_notes: Vec<SourceNote>,
}

/// Counts and metadata for the illustrative imagery a suburb page expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePlan {
    pub hero: HeroImage,
    pub snapshot_tiles: Vec<String>,
    pub lifestyle_gallery_count: u8,
    pub amenities: AmenityCounts,
    pub transport_gallery_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    pub alt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityCounts {
    pub schools: u8,
    pub clinics: u8,
    pub shopping: u8,
}

/// A covered suburb and everything the marketing pages know about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suburb {
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub centroid: Centroid,
    pub data_points: DataPoints,
    pub image_plan: ImagePlan,
    pub related_suburbs: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SuburbsFile {
    city: String,
    province: String,
    suburbs: Vec<Suburb>,
}

/// Read-only lookup over the covered suburbs, built once at startup.
#[derive(Debug, Clone)]
pub struct SuburbDirectory {
    city: String,
    province: String,
    suburbs: Vec<Suburb>,
    by_slug: HashMap<String, usize>,
}

impl SuburbDirectory {
    /// Parse the dataset compiled into the binary.
    pub fn load_embedded() -> Result<Self, DatasetError> {
        let file: SuburbsFile =
            serde_json::from_str(SUBURBS_JSON).map_err(|source| DatasetError::Parse {
                name: "suburbs",
                source,
            })?;
        Ok(Self::from_parts(file.city, file.province, file.suburbs))
    }

    /// Build a directory from an explicit suburb list. Used by tests.
    pub fn from_suburbs(suburbs: Vec<Suburb>) -> Self {
        Self::from_parts("Sandton".to_string(), "Gauteng".to_string(), suburbs)
    }

    fn from_parts(city: String, province: String, suburbs: Vec<Suburb>) -> Self {
        let by_slug = suburbs
            .iter()
            .enumerate()
            .map(|(index, suburb)| (suburb.slug.clone(), index))
            .collect();
        Self {
            city,
            province,
            suburbs,
            by_slug,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn province(&self) -> &str {
        &self.province
    }

    pub fn all(&self) -> &[Suburb] {
        &self.suburbs
    }

    pub fn by_slug(&self, slug: &str) -> Option<&Suburb> {
        self.by_slug.get(slug).map(|index| &self.suburbs[*index])
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.by_slug.contains_key(slug)
    }

    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.suburbs.iter().map(|suburb| suburb.slug.as_str())
    }
}

/// Render a rand amount the way the marketing pages do: `R3.2M` / `R950K`.
pub fn format_price(amount: u64) -> String {
    if amount >= 1_000_000 {
        format!("R{:.1}M", amount as f64 / 1_000_000.0)
    } else {
        format!("R{:.0}K", amount as f64 / 1_000.0)
    }
}

pub fn format_price_band(band: &PriceBand) -> String {
    format!("{} - {}", format_price(band.min), format_price(band.max))
}
