use std::collections::VecDeque;

use engine::Vec2;
use serde::Serialize;

use crate::actors::Faction;
use crate::combat::{ReloadProgress, WeaponSummary};

pub const MAX_SMART_MESSAGES: usize = 4;
/// Undrained flashes past this are dropped oldest first.
pub const MAX_PENDING_FLASHES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShootMode {
    #[default]
    Fire,
    HealSelf,
    Throw,
}

/// Transient full-screen tint for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayFlash {
    pub color: u32,
    pub duration_ms: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageHud {
    pub id: String,
    pub label: String,
    pub duration_ms: f64,
    pub started_at_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ShoveCooldown {
    pub duration_ms: f64,
    pub remaining_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InventoryCounts {
    pub heal_items: u32,
    pub molotovs: u32,
    pub shocks: u32,
}

/// Read-only projection of combat state for presentation.
///
/// The scene is the only writer; everything here is rebuilt or appended during its tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HudState {
    pub weapon: WeaponSummary,
    pub reload: ReloadProgress,
    pub shove: ShoveCooldown,
    pub shoot_mode: ShootMode,
    pub shoot_enabled: bool,
    pub stage: Option<StageHud>,
    pub health: f32,
    pub max_health: f32,
    pub position: Vec2,
    pub faction: Faction,
    pub inventory: InventoryCounts,
    pub paused: bool,
    pub kills: u32,
    pub bile_covered: bool,
    messages: VecDeque<String>,
    flashes: Vec<OverlayFlash>,
}

impl HudState {
    /// Newest first; the oldest message falls off past the cap.
    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push_front(message.into());
        self.messages.truncate(MAX_SMART_MESSAGES);
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(String::as_str)
    }

    pub fn latest_message(&self) -> Option<&str> {
        self.messages.front().map(String::as_str)
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn flash(&mut self, color: u32, duration_ms: f64, label: impl Into<String>) {
        if self.flashes.len() >= MAX_PENDING_FLASHES {
            self.flashes.remove(0);
        }
        self.flashes.push(OverlayFlash {
            color,
            duration_ms,
            label: label.into(),
        });
    }

    pub fn pending_flashes(&self) -> &[OverlayFlash] {
        &self.flashes
    }

    pub fn drain_flashes(&mut self) -> Vec<OverlayFlash> {
        std::mem::take(&mut self.flashes)
    }

    pub fn set_stage(&mut self, stage: StageHud) {
        self.stage = Some(stage);
    }

    pub fn stage_id(&self) -> Option<&str> {
        self.stage.as_ref().map(|stage| stage.id.as_str())
    }
}
