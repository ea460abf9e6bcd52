//! Cohesion, separation and alignment between moving units.

use crate::tunables::Tunables;
use crate::unit::Unit;
use crate::Vector2D;

/// Steering contribution for `unit` from its neighbors.
///
/// Only neighbors that are seeking, share the unit's selection state and sit
/// strictly inside `(0, vision_range)` count. Cohesion pulls towards their
/// mean position, alignment towards their mean velocity, and separation
/// pushes away along each offset divided by its distance. The separation
/// weight is applied once to the accumulated sum.
pub fn flocking_force<'a, I>(unit: &Unit, neighbors: I, tunables: &Tunables) -> Vector2D
where
    I: IntoIterator<Item = &'a Unit>,
{
    let mut cohesion = Vector2D::zero();
    let mut separation = Vector2D::zero();
    let mut alignment = Vector2D::zero();
    let mut count = 0;

    for other in neighbors {
        if other.id == unit.id || !other.is_seeking() || other.selected != unit.selected {
            continue;
        }

        let offset = other.position - unit.position;
        let distance = offset.magnitude();
        if distance > 0.0 && distance < tunables.vision_range {
            cohesion += other.position;
            separation -= offset / distance;
            alignment += other.velocity;
            count += 1;
        }
    }

    if count > 0 {
        let count = count as f32;
        cohesion = (cohesion / count - unit.position) * tunables.cohesion_force;
        alignment = alignment / count * tunables.alignment_force;
    }

    cohesion + separation * tunables.separation_force + alignment
}
