//! Registry of the real origin hubs the network ships from.
//!
//! Destinations are open-ended labels and are not placed here.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HubLocation {
    pub lat: f64,
    pub lon: f64,
}

static KNOWN_HUBS: Lazy<BTreeMap<&'static str, HubLocation>> = Lazy::new(|| {
    BTreeMap::from([
        ("São Paulo", HubLocation { lat: -23.55, lon: -46.63 }),
        ("Curitiba", HubLocation { lat: -25.43, lon: -49.27 }),
        ("Belo Horizonte", HubLocation { lat: -19.92, lon: -43.93 }),
        ("Salvador", HubLocation { lat: -12.97, lon: -38.51 }),
        ("Recife", HubLocation { lat: -8.05, lon: -34.88 }),
    ])
});

pub fn hub_location(name: &str) -> Option<HubLocation> {
    KNOWN_HUBS.get(name).copied()
}

pub fn is_known_hub(name: &str) -> bool {
    KNOWN_HUBS.contains_key(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_hubs_only() {
        let sp = hub_location("São Paulo").unwrap();
        assert_eq!(sp.lat, -23.55);
        assert!(is_known_hub("Recife"));
        assert!(!is_known_hub("Atlantis"));
        assert_eq!(hub_location("recife"), None);
    }
}
