use engine::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    Boomer,
    Hunter,
    Smoker,
    Jockey,
    Charger,
    Spitter,
    Tank,
    Witch,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 8] = [
        SpecialKind::Boomer,
        SpecialKind::Hunter,
        SpecialKind::Smoker,
        SpecialKind::Jockey,
        SpecialKind::Charger,
        SpecialKind::Spitter,
        SpecialKind::Tank,
        SpecialKind::Witch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SpecialKind::Boomer => "boomer",
            SpecialKind::Hunter => "hunter",
            SpecialKind::Smoker => "smoker",
            SpecialKind::Jockey => "jockey",
            SpecialKind::Charger => "charger",
            SpecialKind::Spitter => "spitter",
            SpecialKind::Tank => "tank",
            SpecialKind::Witch => "witch",
        }
    }
}

impl std::fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    Vomit,
    Pounce,
    Tongue,
    Ride,
    Charge,
    Acid,
    Rock,
    Enrage,
}

impl AbilityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AbilityKind::Vomit => "vomit",
            AbilityKind::Pounce => "pounce",
            AbilityKind::Tongue => "tongue",
            AbilityKind::Ride => "ride",
            AbilityKind::Charge => "charge",
            AbilityKind::Acid => "acid",
            AbilityKind::Rock => "rock",
            AbilityKind::Enrage => "enrage",
        }
    }
}

/// Numeric ability tuning. Optional fields fall back to per-ability defaults at resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityParams {
    pub kind: AbilityKind,
    pub cooldown_ms: f64,
    pub range: f32,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub damage: Option<f32>,
    #[serde(default)]
    pub knockback: Option<f32>,
    #[serde(default)]
    pub area_radius: Option<f32>,
    #[serde(default)]
    pub projectile_speed: Option<f32>,
    #[serde(default)]
    pub special_speed: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub params: AbilityParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDefinition {
    pub id: SpecialKind,
    pub display_name: String,
    #[serde(default)]
    pub tactical_role: String,
    pub health: f32,
    pub movement_speed: f32,
    #[serde(default)]
    pub sprint_speed: Option<f32>,
    #[serde(default)]
    pub armor: Option<f32>,
    pub ability: AbilityDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialRoster {
    pub specials: Vec<SpecialDefinition>,
}

impl SpecialRoster {
    pub fn get(&self, kind: SpecialKind) -> Option<&SpecialDefinition> {
        self.specials.iter().find(|definition| definition.id == kind)
    }

    pub fn contains(&self, kind: SpecialKind) -> bool {
        self.get(kind).is_some()
    }
}

/// Declared stage trigger. Kept as data; stages advance on elapsed time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageTrigger {
    Auto,
    EnterNode,
    Time,
    Interaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapNode {
    pub id: String,
    pub label: String,
    pub position: Vec2,
    #[serde(default)]
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub id: String,
    pub label: String,
    pub node_id: String,
    pub duration_ms: f64,
    #[serde(default)]
    pub description: String,
    pub trigger: StageTrigger,
    #[serde(default)]
    pub special_combos: Vec<Vec<SpecialKind>>,
    pub common_range: [u32; 2],
}

impl StageDefinition {
    pub fn summoned_specials(&self) -> impl Iterator<Item = SpecialKind> + '_ {
        self.special_combos.iter().flatten().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    pub id: String,
    pub name: String,
    pub nodes: Vec<MapNode>,
    pub stages: Vec<StageDefinition>,
}

impl ScenarioDefinition {
    pub fn node(&self, node_id: &str) -> Option<&MapNode> {
        self.nodes.iter().find(|node| node.id == node_id)
    }
}
