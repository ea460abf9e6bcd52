//! A single autonomous soldier.
//!
//! An idle unit orbits its spawn anchor with a sine bob. Once given a goal it
//! walks towards it at `move_speed`, steered by [`flocking_force`], with a
//! bob layered on top as a per-tick delta. The two bob formulas differ on
//! purpose: idle position is recomputed from scratch every tick, while a
//! seeking unit's position is integrated.

use core::f32::consts::TAU;

use rand::Rng;

use crate::flocking::flocking_force;
use crate::tunables::Tunables;
use crate::{sin, Vector2D};

/// Wander angle advance per tick, in radians
pub const WANDER_ANGLE_STEP: f32 = 0.02;
/// Orbit radius around the wander anchor
pub const WANDER_RADIUS: f32 = 50.0;
/// A seeking unit within this distance of its target snaps onto it
pub const ARRIVAL_DISTANCE: f32 = 1.0;

/// Driver-assigned handle, never reused within one battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u32);

/// Movement mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Orbiting the wander anchor
    Idle,
    /// Walking towards `target`; stays here after arrival
    Seeking { target: Vector2D },
}

/// Starting phases of the periodic animations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnPhases {
    pub wander_angle: f32,
    pub jump_phase: f32,
    pub breath_phase: f32,
}

impl SpawnPhases {
    /// Independent uniform phases in `[0, 2π)` so freshly spawned units do
    /// not move in lockstep
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            wander_angle: rng.gen_range(0.0..TAU),
            jump_phase: rng.gen_range(0.0..TAU),
            breath_phase: rng.gen_range(0.0..TAU),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub selected: bool,
    pub mode: Mode,
    pub anchor: Vector2D,
    pub wander_angle: f32,
    pub wander_radius: f32,
    pub jump_phase: f32,
    pub breath_phase: f32,
    pub base_scale: f32,
    /// Visual scale after breathing, for the presentation layer
    pub scale: f32,
}

impl Unit {
    pub fn new(id: UnitId, anchor: Vector2D, phases: SpawnPhases) -> Self {
        Self {
            id,
            position: anchor,
            velocity: Vector2D::zero(),
            selected: false,
            mode: Mode::Idle,
            anchor,
            wander_angle: phases.wander_angle,
            wander_radius: WANDER_RADIUS,
            jump_phase: phases.jump_phase,
            breath_phase: phases.breath_phase,
            base_scale: 1.0,
            scale: 1.0,
        }
    }

    /// Start walking towards `(x, y)`. Calling again retargets.
    pub fn set_goal(&mut self, x: f32, y: f32) {
        self.mode = Mode::Seeking {
            target: Vector2D::new(x, y),
        };
    }

    pub fn is_seeking(&self) -> bool {
        matches!(self.mode, Mode::Seeking { .. })
    }

    pub fn target(&self) -> Option<Vector2D> {
        match self.mode {
            Mode::Seeking { target } => Some(target),
            Mode::Idle => None,
        }
    }

    pub fn distance_to_target(&self) -> Option<f32> {
        self.target().map(|target| self.position.distance(&target))
    }

    /// Advance one tick. `neighbors` may include this unit itself; flocking
    /// skips it by id.
    pub fn step<'a, I>(&mut self, neighbors: I, tunables: &Tunables)
    where
        I: IntoIterator<Item = &'a Unit>,
    {
        self.breathe(tunables);

        match self.mode {
            Mode::Seeking { target } => self.seek(target, neighbors, tunables),
            Mode::Idle => self.wander(tunables),
        }
    }

    fn breathe(&mut self, tunables: &Tunables) {
        self.breath_phase += tunables.breath_speed;
        self.scale = self.base_scale + sin(self.breath_phase) * tunables.breath_scale;
    }

    fn seek<'a, I>(&mut self, target: Vector2D, neighbors: I, tunables: &Tunables)
    where
        I: IntoIterator<Item = &'a Unit>,
    {
        let offset = target - self.position;
        let distance = offset.magnitude();

        if distance > ARRIVAL_DISTANCE {
            let desired = offset / distance * tunables.move_speed;
            let flocking = flocking_force(self, neighbors, tunables);

            self.velocity = (desired + flocking).limit(tunables.move_speed);
            self.position += self.velocity;

            // Bob as the change in sin(phase) since last tick
            self.jump_phase += tunables.jump_speed;
            self.position.y += sin(self.jump_phase) * tunables.jump_height
                - sin(self.jump_phase - tunables.jump_speed) * tunables.jump_height;
        } else {
            self.position = target;
            self.velocity = Vector2D::zero();
        }
    }

    fn wander(&mut self, tunables: &Tunables) {
        self.wander_angle += WANDER_ANGLE_STEP;
        self.jump_phase += tunables.jump_speed;

        let orbit = self.anchor + Vector2D::from_angle(self.wander_angle, self.wander_radius);
        self.position = Vector2D::new(
            orbit.x,
            orbit.y + sin(self.jump_phase) * tunables.jump_height,
        );
        self.velocity = Vector2D::zero();
    }
}
