//! Maps bundled with the binary and loading of map files.

use std::{fs, io, path::PathBuf};

use led_defence_core::{MapDefinition, WorldPoint};

/// Errors raised while resolving a map argument.
#[derive(Debug, thiserror::Error)]
pub(crate) enum MapError {
    /// The map file could not be read.
    #[error("failed to read map file {path}")]
    Read {
        /// Location that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The map file is not valid map JSON.
    #[error("failed to parse map file {path}")]
    Parse {
        /// Location that was parsed.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// Enemies need at least a start and an exit.
    #[error("map {name:?} needs at least two path waypoints")]
    ShortPath {
        /// Name of the rejected map.
        name: String,
    },
}

/// Resolves a bundled map name, falling back to reading a JSON map file.
pub(crate) fn load(argument: &str) -> Result<MapDefinition, MapError> {
    let map = match builtin(argument) {
        Some(map) => map,
        None => {
            let path = PathBuf::from(argument);
            let text = fs::read_to_string(&path).map_err(|source| MapError::Read {
                path: path.clone(),
                source,
            })?;
            parse(&text).map_err(|source| MapError::Parse { path, source })?
        }
    };

    if map.path.len() < 2 {
        return Err(MapError::ShortPath { name: map.name });
    }
    Ok(map)
}

fn parse(text: &str) -> Result<MapDefinition, serde_json::Error> {
    serde_json::from_str(text)
}

/// Looks up a bundled map by name, ignoring case and separators.
pub(crate) fn builtin(name: &str) -> Option<MapDefinition> {
    let key: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match key.as_str() {
        "forestpath" | "forest" => Some(forest_path()),
        "desertstraight" | "desert" => Some(desert_straight()),
        _ => None,
    }
}

fn points(coords: &[(f32, f32)]) -> Vec<WorldPoint> {
    coords.iter().copied().map(WorldPoint::from).collect()
}

fn forest_path() -> MapDefinition {
    MapDefinition {
        name: String::from("Forest Path"),
        width: 64,
        height: 32,
        path: points(&[
            (63.0, 15.0),
            (50.0, 15.0),
            (50.0, 25.0),
            (30.0, 25.0),
            (30.0, 10.0),
            (15.0, 10.0),
            (15.0, 20.0),
            (0.0, 20.0),
        ]),
        tower_slots: points(&[
            (55.0, 8.0),
            (55.0, 22.0),
            (38.0, 18.0),
            (20.0, 6.0),
            (20.0, 28.0),
        ]),
        waves: vec![5, 8, 10, 12, 15, 20],
        background_color: [0, 50, 0],
    }
}

fn desert_straight() -> MapDefinition {
    MapDefinition {
        name: String::from("Desert Straight"),
        width: 64,
        height: 32,
        path: points(&[(63.0, 16.0), (0.0, 16.0)]),
        tower_slots: points(&[
            (53.0, 8.0),
            (53.0, 24.0),
            (32.0, 8.0),
            (32.0, 24.0),
            (11.0, 8.0),
            (11.0, 24.0),
        ]),
        waves: vec![3, 5, 8, 12, 15],
        background_color: [80, 60, 20],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_resolve() {
        for name in ["forest-path", "desert-straight", "DESERT"] {
            assert!(builtin(name).is_some(), "{name}");
        }
        assert_eq!(
            builtin("Forest Path").map(|map| map.path.len()),
            Some(8)
        );
        assert!(builtin("swamp").is_none());
    }

    #[test]
    fn json_maps_ignore_cosmetic_fields() {
        let map = parse(
            r#"{
                "name": "Canyon",
                "path": [[63, 4], [0, 4]],
                "towers": [[30, 10]],
                "spawn": [63, 4],
                "end": [0, 4],
                "decorations": [{"type": "rock", "x": 5, "y": 5}]
            }"#,
        )
        .expect("valid map");

        assert_eq!(map.name, "Canyon");
        assert_eq!(map.tower_slots, vec![WorldPoint::new(30.0, 10.0)]);
        assert_eq!(map.waves, vec![5, 8, 12]);
        assert_eq!(map.background_color, [0, 50, 0]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = load("no/such/map.json").expect_err("file does not exist");

        assert!(matches!(error, MapError::Read { .. }));
        assert!(error.to_string().contains("no/such/map.json"));
    }

    #[test]
    fn single_waypoint_maps_are_rejected() {
        let dir = std::env::temp_dir().join("led-defence-map-test");
        fs::create_dir_all(&dir).expect("create temp dir");
        let file = dir.join("point.json");
        fs::write(&file, r#"{"name": "Dot", "path": [[1, 1]]}"#).expect("write map");

        let error = load(&file.to_string_lossy()).expect_err("path too short");

        assert!(matches!(error, MapError::ShortPath { ref name } if name == "Dot"));
    }
}
