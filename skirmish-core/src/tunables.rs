//! Runtime-tunable movement parameters shared by every unit.
//!
//! The driver owns a single [`Tunables`] value and hands a reference to each
//! unit on every tick, so a configuration surface can change any parameter
//! between two ticks. No range checking is done: negative forces and zero
//! speeds are accepted and simply produce odd motion.

use core::fmt;
use core::str::FromStr;

/// Movement, animation and flocking parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tunables {
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

impl Default for Tunables {
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

/// Name of a single tunable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tunable {
    JumpSpeed,
    JumpHeight,
    MoveSpeed,
    BreathSpeed,
    BreathScale,
    CohesionForce,
    SeparationForce,
    AlignmentForce,
    VisionRange,
}

impl Tunable {
    /// Every parameter, in control panel order
    pub const ALL: [Tunable; 9] = [
        Tunable::JumpSpeed,
        Tunable::JumpHeight,
        Tunable::MoveSpeed,
        Tunable::BreathSpeed,
        Tunable::BreathScale,
        Tunable::CohesionForce,
        Tunable::SeparationForce,
        Tunable::AlignmentForce,
        Tunable::VisionRange,
    ];

    /// The camelCase name used by configuration front ends
    pub fn name(&self) -> &'static str {
        match self {
            Tunable::JumpSpeed => "jumpSpeed",
            Tunable::JumpHeight => "jumpHeight",
            Tunable::MoveSpeed => "moveSpeed",
            Tunable::BreathSpeed => "breathSpeed",
            Tunable::BreathScale => "breathScale",
            Tunable::CohesionForce => "cohesionForce",
            Tunable::SeparationForce => "separationForce",
            Tunable::AlignmentForce => "alignmentForce",
            Tunable::VisionRange => "visionRange",
        }
    }

    fn snake_name(&self) -> &'static str {
        match self {
            Tunable::JumpSpeed => "jump_speed",
            Tunable::JumpHeight => "jump_height",
            Tunable::MoveSpeed => "move_speed",
            Tunable::BreathSpeed => "breath_speed",
            Tunable::BreathScale => "breath_scale",
            Tunable::CohesionForce => "cohesion_force",
            Tunable::SeparationForce => "separation_force",
            Tunable::AlignmentForce => "alignment_force",
            Tunable::VisionRange => "vision_range",
        }
    }
}

impl fmt::Display for Tunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a parameter name matches no [`Tunable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownTunable;

impl fmt::Display for UnknownTunable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown tunable parameter")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnknownTunable {}

impl FromStr for Tunable {
    type Err = UnknownTunable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tunable::ALL
            .iter()
            .copied()
            .find(|tunable| tunable.name() == s || tunable.snake_name() == s)
            .ok_or(UnknownTunable)
    }
}

impl Tunables {
    pub fn get(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::JumpSpeed => self.jump_speed,
            Tunable::JumpHeight => self.jump_height,
            Tunable::MoveSpeed => self.move_speed,
            Tunable::BreathSpeed => self.breath_speed,
            Tunable::BreathScale => self.breath_scale,
            Tunable::CohesionForce => self.cohesion_force,
            Tunable::SeparationForce => self.separation_force,
            Tunable::AlignmentForce => self.alignment_force,
            Tunable::VisionRange => self.vision_range,
        }
    }

    pub fn set(&mut self, tunable: Tunable, value: f32) {
        let slot = match tunable {
            Tunable::JumpSpeed => &mut self.jump_speed,
            Tunable::JumpHeight => &mut self.jump_height,
            Tunable::MoveSpeed => &mut self.move_speed,
            Tunable::BreathSpeed => &mut self.breath_speed,
            Tunable::BreathScale => &mut self.breath_scale,
            Tunable::CohesionForce => &mut self.cohesion_force,
            Tunable::SeparationForce => &mut self.separation_force,
            Tunable::AlignmentForce => &mut self.alignment_force,
            Tunable::VisionRange => &mut self.vision_range,
        };
        *slot = value;
    }

    /// Set a parameter by its camelCase or snake_case name
    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<(), UnknownTunable> {
        let tunable: Tunable = name.parse()?;
        self.set(tunable, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let tunables = Tunables::default();
        assert_eq!(tunables.move_speed, 1.0);
        assert_eq!(tunables.separation_force, 0.0);
        assert_eq!(tunables.vision_range, 200.0);
    }

    #[test]
    fn test_parse_both_spellings() {
        assert_eq!("cohesionForce".parse::<Tunable>(), Ok(Tunable::CohesionForce));
        assert_eq!("cohesion_force".parse::<Tunable>(), Ok(Tunable::CohesionForce));
        assert_eq!("cohesion".parse::<Tunable>(), Err(UnknownTunable));
    }

    #[test]
    fn test_set_by_name_accepts_out_of_range() {
        let mut tunables = Tunables::default();
        tunables.set_by_name("separationForce", -3.5).unwrap();
        assert_eq!(tunables.get(Tunable::SeparationForce), -3.5);
        assert!(tunables.set_by_name("warpSpeed", 9.0).is_err());
    }

    #[test]
    fn test_get_set_cover_every_parameter() {
        let mut tunables = Tunables::default();
        for (i, tunable) in Tunable::ALL.iter().enumerate() {
            tunables.set(*tunable, i as f32 + 0.5);
        }
        for (i, tunable) in Tunable::ALL.iter().enumerate() {
            assert_eq!(tunables.get(*tunable), i as f32 + 0.5, "{}", tunable);
        }
    }
}
