//! Static map data: station bindings, gyms, label regions, overlay
//! layers and the registered asset catalog. The JSON files are the
//! targets of the admin export flow, so their shapes match the export
//! structs exactly.

use crate::model::{
    Gym, GymsByStation, LabelRegion, LayerFile, MapAsset, RegionFile, STATION_RADIUS,
    StationBinding,
};
use serde::Deserialize;

/// Station coordinates on the map artwork, in viewbox units.
/// Ids must match the keys of data/gyms.json.
pub fn station_bindings() -> Vec<StationBinding> {
    const RAW: &[(&str, f64, f64)] = &[
        ("港墘站", 4160.0, 3185.0),
        ("明德站", 2307.0, 2431.0),
        ("芝山站", 2299.0, 2799.0),
        ("劍潭站", 2290.0, 3325.0),
        ("雙連站", 2316.0, 4270.0),
        ("忠孝新生站", 2938.0, 4875.0),
        ("龍山寺站", 1335.0, 5339.0),
        ("昆陽站", 4770.0, 4685.0),
        ("南港站", 5111.0, 4694.0),
        ("南港展覽館站", 5628.0, 4589.0),
        ("頭前庄站", 914.0, 5015.0),
        ("中和站", 1677.0, 6750.0),
        ("七張站", 3157.0, 7321.0),
    ];
    RAW.iter()
        .map(|(id, x, y)| StationBinding {
            id: (*id).to_string(),
            name: (*id).to_string(),
            x: *x,
            y: *y,
            r: STATION_RADIUS,
        })
        .collect()
}

/// Images an admin may place as overlay layers. Files live under
/// assets/map-assets/; registering here is what makes them addable.
pub fn map_assets() -> Vec<MapAsset> {
    vec![
        MapAsset {
            id: "circular-line-ext".to_string(),
            src: "assets/map-assets/circular-line-ext.png".to_string(),
            label: "環狀線延伸段".to_string(),
        },
        MapAsset {
            id: "wanda-line".to_string(),
            src: "assets/map-assets/wanda-line.png".to_string(),
            label: "萬大線".to_string(),
        },
    ]
}

#[derive(Debug, Default, Deserialize)]
struct GymsFile {
    #[serde(default)]
    stations: GymsByStation,
}

fn parse_gyms(raw: &str) -> GymsByStation {
    serde_json::from_str::<GymsFile>(raw)
        .unwrap_or_default()
        .stations
}

fn parse_regions(raw: &str) -> Vec<LabelRegion> {
    serde_json::from_str::<RegionFile>(raw)
        .unwrap_or_default()
        .areas
}

fn parse_layers(raw: &str) -> LayerFile {
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn load_gyms() -> GymsByStation {
    parse_gyms(include_str!("../data/gyms.json"))
}

/// Empty when the file is missing entries or malformed; `MapState`
/// then synthesizes default regions.
pub fn load_label_regions() -> Vec<LabelRegion> {
    parse_regions(include_str!("../data/gym_label_areas.json"))
}

pub fn load_map_layers() -> LayerFile {
    parse_layers(include_str!("../data/map_layers.json"))
}

/// Gym search across gym names (case-insensitive) and station names
/// (substring of the raw query).
pub fn search_gyms<'a>(
    gyms: &'a GymsByStation,
    bindings: &'a [StationBinding],
    query: &str,
) -> Vec<(&'a StationBinding, &'a Gym)> {
    let raw = query.trim();
    if raw.is_empty() {
        return Vec::new();
    }
    let lower = raw.to_lowercase();
    let mut results = Vec::new();
    for b in bindings {
        let Some(list) = gyms.get(&b.id) else { continue };
        for gym in list {
            if gym.name.to_lowercase().contains(&lower) || b.name.contains(raw) {
                results.push((b, gym));
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_gyms_parse_and_match_bindings() {
        let gyms = load_gyms();
        assert!(!gyms.is_empty());
        let bindings = station_bindings();
        for station_id in gyms.keys() {
            assert!(
                bindings.iter().any(|b| &b.id == station_id),
                "gym data references unknown station {station_id}"
            );
        }
    }

    #[test]
    fn embedded_regions_resolve_to_gyms() {
        let gyms = load_gyms();
        let regions = load_label_regions();
        assert!(!regions.is_empty());
        for r in &regions {
            assert!(
                crate::model::resolve_region(&gyms, r).is_some(),
                "region {} has no gym",
                r.key()
            );
        }
    }

    #[test]
    fn embedded_layers_parse() {
        let layers = load_map_layers();
        assert!(layers.texts.iter().all(|t| !t.content.is_empty()));
    }

    #[test]
    fn malformed_data_falls_back_to_empty() {
        assert!(parse_gyms("{broken").is_empty());
        assert!(parse_regions("[]").is_empty());
        let layers = parse_layers("not json");
        assert!(layers.images.is_empty() && layers.texts.is_empty());
    }

    #[test]
    fn search_matches_gym_and_station_names() {
        let gyms = load_gyms();
        let bindings = station_bindings();
        let by_gym = search_gyms(&gyms, &bindings, "原岩");
        assert_eq!(by_gym.len(), 2);
        let by_station = search_gyms(&gyms, &bindings, "七張");
        assert_eq!(by_station.len(), 1);
        assert_eq!(by_station[0].1.name, "攀吶攀岩館");
        assert!(search_gyms(&gyms, &bindings, "  ").is_empty());
    }
}
