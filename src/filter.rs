use crate::location::{normalize_name, ParsedPlace};

/// Admits places whose province contains the target province name
/// (case-insensitive substring, so "Cebu Province" matches "cebu").
#[derive(Debug, Clone)]
pub struct ProvinceFilter {
    target: String,
}

impl ProvinceFilter {
    pub fn new(target_province: &str) -> Self {
        Self {
            target: normalize_name(target_province),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn admits(&self, place: &ParsedPlace) -> bool {
        !place.province.is_empty() && place.province.contains(&self.target)
    }
}
