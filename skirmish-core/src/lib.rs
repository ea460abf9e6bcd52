#![cfg_attr(not(feature = "std"), no_std)]

pub mod battle;
pub mod flocking;
pub mod formation;
pub mod input;
pub mod tunables;
pub mod unit;

pub use battle::{Battle, BattleConfig, BattleState, TickReport, UnitView};
pub use flocking::flocking_force;
pub use formation::formation_slot;
pub use input::{PointerButton, PointerController, PointerOutcome, SelectionRect};
pub use tunables::{Tunable, Tunables, UnknownTunable};
pub use unit::{Mode, SpawnPhases, Unit, UnitId};

#[cfg(feature = "std")]
pub use battle::StdBattle;

/// Default live-unit cap, also the default heapless capacity
pub const MAX_UNITS: usize = 20;

pub(crate) fn sqrt(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrtf(value)
    }
}

pub(crate) fn sin(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.sin()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sinf(value)
    }
}

pub(crate) fn cos(value: f32) -> f32 {
    #[cfg(feature = "std")]
    {
        value.cos()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::cosf(value)
    }
}

pub(crate) fn ceil(value: f32) -> f32 {
    libm::ceilf(value)
}

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing at `angle` radians, scaled by `length`
    pub fn from_angle(angle: f32, length: f32) -> Self {
        Self {
            x: cos(angle) * length,
            y: sin(angle) * length,
        }
    }

    pub fn magnitude(&self) -> f32 {
        sqrt(self.x * self.x + self.y * self.y)
    }

    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self {
                x: self.x / mag,
                y: self.y / mag,
            }
        } else {
            Self::zero()
        }
    }

    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            Self {
                x: self.x / mag * max,
                y: self.y / mag * max,
            }
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::SubAssign for Vector2D {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}
