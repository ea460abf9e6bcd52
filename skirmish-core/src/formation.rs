//! Destination slots for a move order.
//!
//! Orders aimed near the enemy base spread units evenly on a ring just inside
//! the base, one slot per unit. Anything else lays units out on a square-ish
//! grid centred on the clicked point. Slots are computed per index so no
//! allocation is needed.

use core::f32::consts::TAU;

use crate::battle::BattleConfig;
use crate::{ceil, sqrt, Vector2D};

/// Slot `index` of `count` for an order aimed at `target`.
///
/// `count` must be non-zero and `index < count`.
pub fn formation_slot(index: usize, count: usize, target: Vector2D, config: &BattleConfig) -> Vector2D {
    debug_assert!(index < count);

    if target.distance(&config.enemy_base) <= config.order_snap_radius {
        ring_slot(index, count, config)
    } else {
        grid_slot(index, count, target, config.formation_spacing)
    }
}

fn ring_slot(index: usize, count: usize, config: &BattleConfig) -> Vector2D {
    let angle_step = TAU / count as f32;
    let radius = config.base_radius - 1.0;
    config.enemy_base + Vector2D::from_angle(angle_step * index as f32, radius)
}

fn grid_slot(index: usize, count: usize, target: Vector2D, spacing: f32) -> Vector2D {
    let cols = (ceil(sqrt(count as f32)) as usize).max(1);
    let row = index / cols;
    let col = index % cols;
    let full_rows = count / cols;

    let offset_x = (col as f32 - cols as f32 / 2.0) * spacing;
    let offset_y = (row as f32 - full_rows as f32 / 2.0) * spacing;
    Vector2D::new(target.x + offset_x, target.y + offset_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f32::consts::{FRAC_PI_2, PI};

    fn config() -> BattleConfig {
        BattleConfig {
            enemy_base: Vector2D::new(400.0, 500.0),
            base_radius: 30.0,
            ..BattleConfig::default()
        }
    }

    fn close(a: Vector2D, b: Vector2D) -> bool {
        a.distance(&b) < 1e-3
    }

    #[test]
    fn test_ring_around_enemy_base() {
        let config = config();
        let target = Vector2D::new(420.0, 520.0);
        let centre = config.enemy_base;

        for (index, angle) in [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2].iter().enumerate() {
            let slot = formation_slot(index, 4, target, &config);
            let expected = centre + Vector2D::from_angle(*angle, 29.0);
            assert!(close(slot, expected), "slot {} was {:?}", index, slot);
            assert!((slot.distance(&centre) - 29.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_ring_boundary_is_inclusive() {
        let config = config();
        let target = config.enemy_base + Vector2D::new(50.0, 0.0);
        let slot = formation_slot(0, 1, target, &config);
        assert!(close(slot, config.enemy_base + Vector2D::new(29.0, 0.0)));
    }

    #[test]
    fn test_grid_layout() {
        let config = config();
        let target = Vector2D::new(100.0, 100.0);

        // 5 units -> 3 columns, 1 full row
        let slots: Vec<_> = (0..5).map(|i| formation_slot(i, 5, target, &config)).collect();
        assert!(close(slots[0], Vector2D::new(70.0, 90.0)));
        assert!(close(slots[2], Vector2D::new(110.0, 90.0)));
        assert!(close(slots[3], Vector2D::new(70.0, 110.0)));
        assert!(close(slots[4], Vector2D::new(90.0, 110.0)));
    }

    #[test]
    fn test_single_unit_grid() {
        let config = config();
        let slot = formation_slot(0, 1, Vector2D::new(10.0, 10.0), &config);
        assert!(close(slot, Vector2D::new(0.0, 0.0)));
    }

    #[test]
    fn test_slots_are_unique() {
        let config = config();
        for target in [Vector2D::new(100.0, 100.0), config.enemy_base] {
            for count in 1..=20 {
                let slots: Vec<_> = (0..count)
                    .map(|i| formation_slot(i, count, target, &config))
                    .collect();
                for a in 0..count {
                    for b in (a + 1)..count {
                        assert!(slots[a].distance(&slots[b]) > 1.0);
                    }
                }
            }
        }
    }
}
