use anyhow::{Context, Result};
use geojson::{GeoJson, Value};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::map::{Country, CountryMap};

/// One row of the tournament statistics resource. Field names follow
/// the JSON resource; immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Team")]
    pub team: String,
    #[serde(rename = "Participations")]
    pub participations: u32,
    #[serde(rename = "Played")]
    pub played: u32,
    #[serde(rename = "Win")]
    pub win: u32,
    #[serde(rename = "Draw")]
    pub draw: u32,
    #[serde(rename = "Loss")]
    pub loss: u32,
    #[serde(rename = "Goal_For")]
    pub goal_for: u32,
    #[serde(rename = "Goal_Against")]
    pub goal_against: u32,
    #[serde(rename = "Points")]
    pub points: u32,
    #[serde(rename = "Pointsmatch")]
    pub points_per_match: f64,
}

/// Everything the app needs, loaded once at startup and read-only
/// afterwards.
pub struct LoadedData {
    pub teams: Vec<TeamRecord>,
    pub countries: CountryMap,
}

/// Load both static resources from the data directory. Each resource
/// degrades independently: a missing or malformed statistics file
/// leaves the team list empty (the map renders, nothing is selectable);
/// missing boundary data falls back to the built-in rough outlines.
pub fn load(data_dir: &Path) -> LoadedData {
    let teams = match load_teams(&data_dir.join("euro_cup_teams.json")) {
        Ok(teams) => teams,
        Err(e) => {
            eprintln!("Warning: failed to load team statistics: {e:#}");
            Vec::new()
        }
    };

    let countries = match load_countries(&data_dir.join("countries.json")) {
        Ok(map) if map.has_data() => map,
        Ok(_) => {
            eprintln!("Warning: boundary data contained no named features, using built-in outlines");
            fallback_europe()
        }
        Err(e) => {
            eprintln!("Warning: failed to load boundary data ({e:#}), using built-in outlines");
            fallback_europe()
        }
    };

    LoadedData { teams, countries }
}

/// Parse the statistics array with simd-json into typed records
fn load_teams(path: &Path) -> Result<Vec<TeamRecord>> {
    let mut bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let teams: Vec<TeamRecord> =
        simd_json::from_slice(&mut bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(teams)
}

/// Parse the boundary FeatureCollection, keeping each feature's `name`
/// property and exterior polygon rings
fn load_countries(path: &Path) -> Result<CountryMap> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;

    let mut countries = Vec::new();
    if let GeoJson::FeatureCollection(fc) = geojson {
        for feature in fc.features {
            let Some(name) = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("name"))
                .and_then(|v| v.as_str())
            else {
                continue;
            };
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let rings = exterior_rings(&geometry.value);
            if !rings.is_empty() {
                countries.push(Country::new(name, rings));
            }
        }
    }

    Ok(CountryMap::new(countries))
}

/// Extract exterior rings from polygon geometry
fn exterior_rings(value: &Value) -> Vec<Vec<(f64, f64)>> {
    let ring_coords = |ring: &Vec<Vec<f64>>| -> Vec<(f64, f64)> {
        ring.iter().map(|c| (c[0], c[1])).collect()
    };
    match value {
        Value::Polygon(rings) => rings.first().map(ring_coords).into_iter().collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| rings.first().map(ring_coords))
            .collect(),
        _ => Vec::new(),
    }
}

/// Rough hand-drawn outlines for when no boundary file is available.
/// Coarse but recognizable; names match the statistics resource's
/// Country values so the choropleth and hit testing still work.
pub fn fallback_europe() -> CountryMap {
    let countries = vec![
        Country::new(
            "Portugal",
            vec![vec![(-9.5, 37.0), (-6.2, 37.1), (-6.2, 41.9), (-8.9, 42.0)]],
        ),
        Country::new(
            "Spain",
            vec![vec![
                (-9.2, 36.1), (-5.5, 36.0), (-0.5, 37.6), (0.5, 40.5), (3.2, 42.3),
                (-1.8, 43.4), (-8.8, 43.7), (-9.2, 38.7),
            ]],
        ),
        Country::new(
            "France",
            vec![vec![
                (-4.6, 48.5), (-1.8, 43.4), (3.0, 42.4), (7.5, 43.7), (7.6, 47.6),
                (8.2, 48.9), (4.8, 49.9), (2.5, 51.0), (-1.9, 49.7),
            ]],
        ),
        Country::new(
            "United Kingdom",
            vec![vec![
                (-5.7, 50.0), (1.7, 51.1), (0.5, 52.9), (-1.8, 55.6), (-2.0, 57.7),
                (-5.0, 58.6), (-6.2, 56.0), (-4.8, 54.0), (-3.0, 53.0), (-5.3, 51.7),
            ]],
        ),
        Country::new(
            "Ireland",
            vec![vec![(-10.0, 51.6), (-6.2, 52.2), (-6.0, 54.0), (-8.2, 55.3), (-10.0, 54.3)]],
        ),
        Country::new(
            "Netherlands",
            vec![vec![(3.4, 51.3), (7.0, 51.4), (7.2, 53.4), (4.7, 53.5)]],
        ),
        Country::new(
            "Belgium",
            vec![vec![(2.5, 51.1), (6.4, 50.3), (5.8, 49.5), (2.8, 50.7)]],
        ),
        Country::new(
            "Germany",
            vec![vec![
                (6.0, 47.6), (13.8, 48.7), (15.0, 51.1), (14.2, 53.9), (8.6, 54.9),
                (7.0, 53.3), (6.0, 51.8),
            ]],
        ),
        Country::new(
            "Switzerland",
            vec![vec![(6.0, 46.2), (10.4, 46.6), (9.5, 47.6), (6.8, 47.3)]],
        ),
        Country::new(
            "Italy",
            vec![vec![
                (7.6, 44.1), (13.7, 45.6), (12.3, 41.9), (18.5, 40.1), (16.1, 37.9),
                (12.4, 41.5), (8.9, 44.4),
            ]],
        ),
        Country::new(
            "Austria",
            vec![vec![(9.6, 47.1), (17.0, 48.0), (16.9, 48.7), (12.8, 48.6), (9.6, 47.5)]],
        ),
        Country::new(
            "Czech Republic",
            vec![vec![(12.2, 50.3), (18.8, 49.5), (17.2, 48.9), (13.8, 48.6), (12.2, 49.5)]],
        ),
        Country::new(
            "Poland",
            vec![vec![(14.2, 53.9), (23.5, 54.0), (24.0, 50.5), (19.0, 49.4), (14.8, 50.9)]],
        ),
        Country::new(
            "Denmark",
            vec![vec![(8.1, 54.9), (10.9, 54.8), (10.6, 57.7), (8.1, 56.8)]],
        ),
        Country::new(
            "Norway",
            vec![vec![
                (4.9, 58.0), (10.5, 59.0), (12.5, 61.0), (14.0, 64.0), (20.0, 69.5),
                (28.0, 71.0), (24.0, 68.5), (12.0, 65.0), (7.8, 61.0),
            ]],
        ),
        Country::new(
            "Sweden",
            vec![vec![
                (11.1, 58.9), (12.5, 56.3), (14.4, 55.4), (16.5, 57.0), (19.0, 60.0),
                (21.5, 65.0), (23.5, 66.0), (17.0, 63.0), (12.5, 61.0),
            ]],
        ),
        Country::new(
            "Russia",
            vec![vec![
                (28.0, 60.0), (33.0, 55.0), (40.0, 50.0), (45.0, 55.0), (40.0, 62.0),
                (31.0, 62.5),
            ]],
        ),
        Country::new(
            "Ukraine",
            vec![vec![
                (24.0, 50.5), (33.0, 52.0), (38.0, 49.5), (35.0, 46.5), (29.5, 45.5),
                (24.0, 48.0),
            ]],
        ),
        Country::new(
            "Hungary",
            vec![vec![(16.2, 46.9), (22.5, 47.8), (22.0, 48.5), (17.0, 48.2)]],
        ),
        Country::new(
            "Romania",
            vec![vec![(21.5, 46.0), (27.0, 48.0), (29.5, 45.5), (23.0, 44.0)]],
        ),
        Country::new(
            "Croatia",
            vec![vec![(13.6, 45.5), (19.0, 45.9), (16.5, 43.0), (15.2, 44.2)]],
        ),
        Country::new(
            "Greece",
            vec![vec![(20.0, 42.0), (26.0, 41.5), (26.5, 40.5), (23.0, 36.5), (21.0, 38.0)]],
        ),
    ];
    CountryMap::new(countries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_record_field_renames() {
        let mut raw = br#"[{
            "Country": "France", "Team": "France", "Participations": 9,
            "Played": 18, "Win": 10, "Draw": 5, "Loss": 3,
            "Goal_For": 40, "Goal_Against": 20, "Points": 35, "Pointsmatch": 1.9
        }]"#
        .to_vec();
        let teams: Vec<TeamRecord> = simd_json::from_slice(&mut raw).unwrap();
        assert_eq!(teams.len(), 1);
        let france = &teams[0];
        assert_eq!(france.goal_for, 40);
        assert_eq!(france.goal_against, 20);
        assert_eq!(france.points_per_match, 1.9);
        assert_eq!(france.win + france.draw + france.loss, france.played);
    }

    #[test]
    fn test_missing_resources_degrade_silently() {
        let data = load(Path::new("/nonexistent"));
        assert!(data.teams.is_empty());
        // Boundary fallback keeps the map usable
        assert!(data.countries.has_data());
    }

    #[test]
    fn test_fallback_contains_join_keys() {
        let map = fallback_europe();
        for name in ["France", "United Kingdom", "Spain", "Italy"] {
            assert!(
                map.countries().iter().any(|c| c.name == name),
                "missing {name}"
            );
        }
    }

    #[test]
    fn test_fallback_hit_test() {
        let map = fallback_europe();
        // Paris is in France
        assert_eq!(
            map.hit_test(2.3, 48.9).map(|c| c.name.as_str()),
            Some("France")
        );
        // The North Sea is nowhere
        assert!(map.hit_test(2.5, 55.5).is_none());
    }

    #[test]
    fn test_exterior_rings_multipolygon() {
        let value = Value::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]],
            vec![vec![vec![5.0, 5.0], vec![6.0, 5.0], vec![6.0, 6.0]]],
        ]);
        let rings = exterior_rings(&value);
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0][1], (1.0, 0.0));
    }
}
