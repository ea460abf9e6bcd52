#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

mod convert;

/// A 2D point in world coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        libm::sqrtf(dx * dx + dy * dy)
    }
}

/// Movement and flocking parameters, camelCase on the wire to match the
/// control panel ids
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TunableSettings {
    pub jump_speed: f32,
    pub jump_height: f32,
    pub move_speed: f32,
    pub breath_speed: f32,
    pub breath_scale: f32,
    pub cohesion_force: f32,
    pub separation_force: f32,
    pub alignment_force: f32,
    pub vision_range: f32,
}

impl Default for TunableSettings {
    fn default() -> Self {
        Self {
            jump_speed: 0.15,
            jump_height: 4.0,
            move_speed: 1.0,
            breath_speed: 0.05,
            breath_scale: 0.2,
            cohesion_force: 0.02,
            separation_force: 0.0,
            alignment_force: 0.1,
            vision_range: 200.0,
        }
    }
}

/// Battlefield layout. Missing bases are derived from the viewport size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BattleSettings {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub player_base: Option<Position>,
    pub enemy_base: Option<Position>,
    pub base_radius: f32,
    pub enemy_health: i32,
    pub max_units: usize,
    pub spawn_interval_secs: f32,
    pub order_snap_radius: f32,
    pub formation_spacing: f32,
    pub hit_tolerance: f32,
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            player_base: None,
            enemy_base: None,
            base_radius: 30.0,
            enemy_health: 100,
            max_units: 20,
            spawn_interval_secs: 3.0,
            order_snap_radius: 50.0,
            formation_spacing: 20.0,
            hit_tolerance: 2.0,
        }
    }
}

/// Tunables plus battlefield, as stored in a scenario file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScenarioSettings {
    pub tunables: TunableSettings,
    pub battle: BattleSettings,
}

/// Change a single tunable by name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TunableUpdate {
    pub name: String,
    pub value: f32,
}

/// Order the listed units towards a point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoveOrder {
    pub unit_ids: Vec<u32>,
    pub x: f32,
    pub y: f32,
}

/// Per-unit state the presentation layer draws
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct UnitSnapshot {
    pub id: u32,
    pub position: Position,
    pub scale: f32,
    pub selected: bool,
}

/// Battle-wide counters for the HUD
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BattleStatus {
    pub unit_count: usize,
    pub max_units: usize,
    pub enemy_health: i32,
    pub victory: bool,
    pub tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0);
        let p2 = Position::new(3.0, 4.0);
        assert_eq!(p1.distance_to(&p2), 5.0);
    }

    #[test]
    fn test_tunables_use_control_panel_names() {
        let json = serde_json::to_value(TunableSettings::default()).unwrap();
        assert_eq!(json["jumpSpeed"], serde_json::json!(0.15f32));
        assert_eq!(json["visionRange"], serde_json::json!(200.0));
    }

    #[test]
    fn test_partial_scenario_falls_back_to_defaults() {
        let scenario: ScenarioSettings = serde_json::from_str(
            r#"{ "tunables": { "moveSpeed": 2.5 }, "battle": { "enemyHealth": 5 } }"#,
        )
        .unwrap();
        assert_eq!(scenario.tunables.move_speed, 2.5);
        assert_eq!(scenario.tunables.jump_height, 4.0);
        assert_eq!(scenario.battle.enemy_health, 5);
        assert_eq!(scenario.battle.max_units, 20);
        assert_eq!(scenario.battle.enemy_base, None);
    }

    #[test]
    fn test_move_order_wire_format() {
        let order: MoveOrder =
            serde_json::from_str(r#"{ "unitIds": [1, 4], "x": 10.0, "y": -2.0 }"#).unwrap();
        assert_eq!(order.unit_ids, vec![1, 4]);
        assert_eq!(order.y, -2.0);
    }
}
