//! Conversions between wire types and the simulation's own types.

use skirmish_core::{BattleConfig, Tunables, UnitView, Vector2D};

use crate::{BattleSettings, Position, TunableSettings, UnitSnapshot};

impl From<Position> for Vector2D {
    fn from(position: Position) -> Self {
        Vector2D::new(position.x, position.y)
    }
}

impl From<Vector2D> for Position {
    fn from(vector: Vector2D) -> Self {
        Position::new(vector.x, vector.y)
    }
}

impl From<&TunableSettings> for Tunables {
    fn from(settings: &TunableSettings) -> Self {
        Tunables {
            jump_speed: settings.jump_speed,
            jump_height: settings.jump_height,
            move_speed: settings.move_speed,
            breath_speed: settings.breath_speed,
            breath_scale: settings.breath_scale,
            cohesion_force: settings.cohesion_force,
            separation_force: settings.separation_force,
            alignment_force: settings.alignment_force,
            vision_range: settings.vision_range,
        }
    }
}

impl From<&Tunables> for TunableSettings {
    fn from(tunables: &Tunables) -> Self {
        TunableSettings {
            jump_speed: tunables.jump_speed,
            jump_height: tunables.jump_height,
            move_speed: tunables.move_speed,
            breath_speed: tunables.breath_speed,
            breath_scale: tunables.breath_scale,
            cohesion_force: tunables.cohesion_force,
            separation_force: tunables.separation_force,
            alignment_force: tunables.alignment_force,
            vision_range: tunables.vision_range,
        }
    }
}

impl From<&BattleSettings> for BattleConfig {
    fn from(settings: &BattleSettings) -> Self {
        let layout = BattleConfig::for_viewport(settings.viewport_width, settings.viewport_height);
        BattleConfig {
            player_base: settings.player_base.map_or(layout.player_base, Into::into),
            enemy_base: settings.enemy_base.map_or(layout.enemy_base, Into::into),
            base_radius: settings.base_radius,
            enemy_health: settings.enemy_health,
            max_units: settings.max_units,
            spawn_interval: settings.spawn_interval_secs,
            order_snap_radius: settings.order_snap_radius,
            formation_spacing: settings.formation_spacing,
            hit_tolerance: settings.hit_tolerance,
        }
    }
}

impl From<UnitView> for UnitSnapshot {
    fn from(view: UnitView) -> Self {
        UnitSnapshot {
            id: view.id.0,
            position: view.position.into(),
            scale: view.scale,
            selected: view.selected,
        }
    }
}
