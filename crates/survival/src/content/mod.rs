use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

mod definitions;

pub use definitions::{
    AbilityDefinition, AbilityKind, AbilityParams, MapNode, ScenarioDefinition, SpecialDefinition,
    SpecialKind, SpecialRoster, StageDefinition, StageTrigger,
};

pub const DEFAULT_SCENARIO_FILE: &str = "dead_center_hotel.json";
pub const SPECIALS_FILE: &str = "special_infected.json";

const BUILTIN_SCENARIO_JSON: &str = include_str!("../../../../data/dead_center_hotel.json");
const BUILTIN_SPECIALS_JSON: &str = include_str!("../../../../data/special_infected.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {what} json{location}: {source}")]
    Parse {
        what: &'static str,
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario {scenario_id} has no stages")]
    EmptyScenario { scenario_id: String },
    #[error("stage {stage_id} references unknown node {node_id}")]
    UnknownNode { stage_id: String, node_id: String },
    #[error("stage {stage_id} has non-positive duration {duration_ms}")]
    NonPositiveDuration { stage_id: String, duration_ms: f64 },
    #[error("stage {stage_id} has inverted common range [{min}, {max}]")]
    InvertedCommonRange { stage_id: String, min: u32, max: u32 },
    #[error("stage {stage_id} summons {special} which has no definition")]
    UnknownSpecial {
        stage_id: String,
        special: SpecialKind,
    },
    #[error("special {special} is defined more than once")]
    DuplicateSpecial { special: SpecialKind },
    #[error("special {special} has invalid {field}: {value}")]
    InvalidSpecialField {
        special: SpecialKind,
        field: &'static str,
        value: f64,
    },
}

/// Validated scenario plus the special definitions it summons.
#[derive(Debug, Clone)]
pub struct ContentBundle {
    pub scenario: ScenarioDefinition,
    pub specials: SpecialRoster,
}

impl ContentBundle {
    pub fn new(
        scenario: ScenarioDefinition,
        specials: SpecialRoster,
    ) -> Result<Self, ContentError> {
        validate_scenario(&scenario)?;
        validate_roster(&specials)?;
        for stage in &scenario.stages {
            for special in stage.summoned_specials() {
                if !specials.contains(special) {
                    return Err(ContentError::UnknownSpecial {
                        stage_id: stage.id.clone(),
                        special,
                    });
                }
            }
        }
        Ok(Self { scenario, specials })
    }

    pub fn builtin() -> Result<Self, ContentError> {
        Self::new(builtin_scenario()?, builtin_special_roster()?)
    }

    /// Loads `scenario_file` from `data_dir`. The special roster comes from the same directory
    /// when present, otherwise from the built-in copy.
    pub fn load_from_dir(data_dir: &Path, scenario_file: &str) -> Result<Self, ContentError> {
        let scenario = load_scenario_file(&data_dir.join(scenario_file))?;
        let specials_path = data_dir.join(SPECIALS_FILE);
        let specials = if specials_path.is_file() {
            load_special_roster_file(&specials_path)?
        } else {
            builtin_special_roster()?
        };
        let bundle = Self::new(scenario, specials)?;
        info!(
            scenario = %bundle.scenario.id,
            stage_count = bundle.scenario.stages.len(),
            special_count = bundle.specials.specials.len(),
            data_dir = %data_dir.display(),
            "content_loaded"
        );
        Ok(bundle)
    }
}

pub fn builtin_scenario() -> Result<ScenarioDefinition, ContentError> {
    parse_scenario_json(BUILTIN_SCENARIO_JSON)
}

pub fn builtin_special_roster() -> Result<SpecialRoster, ContentError> {
    parse_special_roster_json(BUILTIN_SPECIALS_JSON)
}

pub fn parse_scenario_json(raw: &str) -> Result<ScenarioDefinition, ContentError> {
    let scenario: ScenarioDefinition = parse_json("scenario", raw)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn parse_special_roster_json(raw: &str) -> Result<SpecialRoster, ContentError> {
    let roster: SpecialRoster = parse_json("special roster", raw)?;
    validate_roster(&roster)?;
    Ok(roster)
}

pub fn load_scenario_file(path: &Path) -> Result<ScenarioDefinition, ContentError> {
    parse_scenario_json(&read_content_file(path)?)
}

pub fn load_special_roster_file(path: &Path) -> Result<SpecialRoster, ContentError> {
    parse_special_roster_json(&read_content_file(path)?)
}

fn read_content_file(path: &Path) -> Result<String, ContentError> {
    fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_json<T: DeserializeOwned>(what: &'static str, raw: &str) -> Result<T, ContentError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, T>(&mut deserializer).map_err(|error| {
        let path = error.path().to_string();
        let location = if path.is_empty() || path == "." {
            String::new()
        } else {
            format!(" at {path}")
        };
        ContentError::Parse {
            what,
            location,
            source: error.into_inner(),
        }
    })
}

fn validate_scenario(scenario: &ScenarioDefinition) -> Result<(), ContentError> {
    if scenario.stages.is_empty() {
        return Err(ContentError::EmptyScenario {
            scenario_id: scenario.id.clone(),
        });
    }
    for stage in &scenario.stages {
        if scenario.node(&stage.node_id).is_none() {
            return Err(ContentError::UnknownNode {
                stage_id: stage.id.clone(),
                node_id: stage.node_id.clone(),
            });
        }
        if stage.duration_ms.is_nan() || stage.duration_ms <= 0.0 {
            return Err(ContentError::NonPositiveDuration {
                stage_id: stage.id.clone(),
                duration_ms: stage.duration_ms,
            });
        }
        let [min, max] = stage.common_range;
        if min > max {
            return Err(ContentError::InvertedCommonRange {
                stage_id: stage.id.clone(),
                min,
                max,
            });
        }
    }
    Ok(())
}

fn validate_roster(roster: &SpecialRoster) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for definition in &roster.specials {
        let special = definition.id;
        if !seen.insert(special) {
            return Err(ContentError::DuplicateSpecial { special });
        }
        let params = &definition.ability.params;
        let checks: [(&'static str, f64, bool); 5] = [
            (
                "health",
                f64::from(definition.health),
                definition.health > 0.0,
            ),
            (
                "movement_speed",
                f64::from(definition.movement_speed),
                definition.movement_speed >= 0.0,
            ),
            ("cooldown_ms", params.cooldown_ms, params.cooldown_ms >= 0.0),
            ("range", f64::from(params.range), params.range > 0.0),
            (
                "duration_ms",
                params.duration_ms.unwrap_or(1.0),
                params.duration_ms.map_or(true, |duration| duration > 0.0),
            ),
        ];
        for (field, value, valid) in checks {
            if !valid {
                return Err(ContentError::InvalidSpecialField {
                    special,
                    field,
                    value,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal_scenario() -> serde_json::Value {
        json!({
            "id": "test",
            "name": "Test",
            "nodes": [
                { "id": "a", "label": "A", "position": { "x": 0, "y": 0 } },
                { "id": "b", "label": "B", "position": { "x": 100, "y": 50 } }
            ],
            "stages": [
                {
                    "id": "stage-a",
                    "label": "A",
                    "node_id": "a",
                    "duration_ms": 30000,
                    "trigger": "auto",
                    "common_range": [0, 5]
                },
                {
                    "id": "stage-b",
                    "label": "B",
                    "node_id": "b",
                    "duration_ms": 90000,
                    "trigger": "enter-node",
                    "special_combos": [["boomer"]],
                    "common_range": [10, 15]
                }
            ]
        })
    }

    #[test]
    fn builtin_content_is_valid() {
        let bundle = ContentBundle::builtin().expect("builtin content");
        assert_eq!(bundle.scenario.id, "dead-center-hotel");
        assert_eq!(bundle.scenario.stages.len(), 8);
        assert_eq!(bundle.scenario.nodes.len(), 8);
        for kind in SpecialKind::ALL {
            assert!(bundle.specials.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn builtin_hunter_matches_tuning() {
        let roster = builtin_special_roster().expect("roster");
        let hunter = roster.get(SpecialKind::Hunter).expect("hunter");
        assert_eq!(hunter.health, 250.0);
        assert_eq!(hunter.movement_speed, 300.0);
        assert_eq!(hunter.ability.params.kind, AbilityKind::Pounce);
        assert_eq!(hunter.ability.params.cooldown_ms, 6000.0);
        assert_eq!(hunter.ability.params.range, 480.0);
        assert_eq!(hunter.ability.params.special_speed, Some(720.0));
    }

    #[test]
    fn builtin_stage_combos_and_triggers() {
        let scenario = builtin_scenario().expect("scenario");
        let safehouse = &scenario.stages[0];
        assert_eq!(safehouse.trigger, StageTrigger::Auto);
        assert!(safehouse.special_combos.is_empty());

        let rooftop = &scenario.stages[6];
        assert_eq!(rooftop.id, "stage-rooftop");
        let summoned: Vec<SpecialKind> = rooftop.summoned_specials().collect();
        assert_eq!(
            summoned,
            vec![
                SpecialKind::Boomer,
                SpecialKind::Spitter,
                SpecialKind::Charger,
                SpecialKind::Jockey,
                SpecialKind::Smoker
            ]
        );
    }

    #[test]
    fn parse_error_reports_json_path() {
        let mut value = minimal_scenario();
        value["stages"][1]["trigger"] = json!("teleport");

        let error = parse_scenario_json(&value.to_string()).expect_err("bad trigger");
        let message = error.to_string();
        assert!(message.contains("stages[1].trigger"), "{message}");
    }

    #[test]
    fn unknown_special_id_is_rejected_at_parse() {
        let mut value = minimal_scenario();
        value["stages"][1]["special_combos"] = json!([["bruiser"]]);

        let error = parse_scenario_json(&value.to_string()).expect_err("bad special");
        assert!(matches!(error, ContentError::Parse { .. }));
    }

    #[test]
    fn stage_with_missing_node_is_rejected() {
        let mut value = minimal_scenario();
        value["stages"][0]["node_id"] = json!("nowhere");

        let error = parse_scenario_json(&value.to_string()).expect_err("missing node");
        assert!(matches!(error, ContentError::UnknownNode { .. }));
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        let mut value = minimal_scenario();
        value["stages"][1]["duration_ms"] = json!(0);

        let error = parse_scenario_json(&value.to_string()).expect_err("zero duration");
        assert!(matches!(error, ContentError::NonPositiveDuration { .. }));
    }

    #[test]
    fn inverted_common_range_is_rejected() {
        let mut value = minimal_scenario();
        value["stages"][0]["common_range"] = json!([9, 3]);

        let error = parse_scenario_json(&value.to_string()).expect_err("inverted range");
        assert!(matches!(
            error,
            ContentError::InvertedCommonRange { min: 9, max: 3, .. }
        ));
    }

    #[test]
    fn empty_stage_list_is_rejected() {
        let mut value = minimal_scenario();
        value["stages"] = json!([]);

        let error = parse_scenario_json(&value.to_string()).expect_err("no stages");
        assert!(matches!(error, ContentError::EmptyScenario { .. }));
    }

    #[test]
    fn bundle_rejects_combo_without_definition() {
        let scenario = parse_scenario_json(&minimal_scenario().to_string()).expect("scenario");
        let mut roster = builtin_special_roster().expect("roster");
        roster
            .specials
            .retain(|definition| definition.id != SpecialKind::Boomer);

        let error = ContentBundle::new(scenario, roster).expect_err("boomer missing");
        assert!(matches!(
            error,
            ContentError::UnknownSpecial {
                special: SpecialKind::Boomer,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_special_is_rejected() {
        let mut roster = builtin_special_roster().expect("roster");
        let tank = roster.get(SpecialKind::Tank).cloned().expect("tank");
        roster.specials.push(tank);

        let error = validate_roster(&roster).expect_err("duplicate");
        assert!(matches!(
            error,
            ContentError::DuplicateSpecial {
                special: SpecialKind::Tank
            }
        ));
    }

    #[test]
    fn load_from_dir_reads_scenario_and_falls_back_for_specials() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("short.json"), minimal_scenario().to_string())
            .expect("write scenario");

        let bundle = ContentBundle::load_from_dir(dir.path(), "short.json").expect("bundle");
        assert_eq!(bundle.scenario.id, "test");
        assert!(bundle.specials.contains(SpecialKind::Witch));
    }

    #[test]
    fn load_from_dir_reports_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let error =
            ContentBundle::load_from_dir(dir.path(), "absent.json").expect_err("missing file");
        assert!(matches!(error, ContentError::Io { .. }));
    }
}
