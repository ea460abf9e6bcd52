//! Per-tick driver: spawning, stepping, hits and the victory transition.

use rand::RngCore;

use crate::formation::formation_slot;
use crate::input::SelectionRect;
use crate::tunables::{Tunables, UnknownTunable};
use crate::unit::{SpawnPhases, Unit, UnitId};
use crate::{Vector2D, MAX_UNITS};

/// Battlefield layout and rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattleConfig {
    pub player_base: Vector2D,
    pub enemy_base: Vector2D,
    pub base_radius: f32,
    pub enemy_health: i32,
    pub max_units: usize,
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Orders within this distance of the enemy base become an assault ring
    pub order_snap_radius: f32,
    pub formation_spacing: f32,
    /// How close to its own slot a unit inside the enemy base must be to hit
    pub hit_tolerance: f32,
}

impl BattleConfig {
    /// Bases centred horizontally, player at the top and enemy at the bottom
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let base_radius = 30.0;
        let gap = 50.0 + base_radius;
        Self {
            player_base: Vector2D::new(width / 2.0, gap),
            enemy_base: Vector2D::new(width / 2.0, height - gap),
            base_radius,
            enemy_health: 100,
            max_units: MAX_UNITS,
            spawn_interval: 3.0,
            order_snap_radius: 50.0,
            formation_spacing: 20.0,
            hit_tolerance: 2.0,
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::for_viewport(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    InProgress,
    Victory,
}

/// What happened during one [`Battle::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub spawned: usize,
    pub hits: u32,
    /// Set only on the tick enemy health first drops to zero
    pub victory: bool,
}

/// Read-only view of a unit for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitView {
    pub id: UnitId,
    pub position: Vector2D,
    pub scale: f32,
    pub selected: bool,
}

/// A skirmish with at most `N` live units
pub struct Battle<R, const N: usize> {
    units: heapless::Vec<Unit, N>,
    config: BattleConfig,
    tunables: Tunables,
    enemy_health: i32,
    state: BattleState,
    spawn_timer: f32,
    next_id: u32,
    ticks: u64,
    rng: R,
}

#[cfg(feature = "std")]
pub type StdBattle = Battle<rand::rngs::StdRng, MAX_UNITS>;

#[cfg(feature = "std")]
impl<const N: usize> Battle<rand::rngs::StdRng, N> {
    pub fn from_entropy(config: BattleConfig, tunables: Tunables) -> Self {
        use rand::SeedableRng;
        Self::new(config, tunables, rand::rngs::StdRng::from_entropy())
    }

    pub fn seeded(config: BattleConfig, tunables: Tunables, seed: u64) -> Self {
        use rand::SeedableRng;
        Self::new(config, tunables, rand::rngs::StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore, const N: usize> Battle<R, N> {
    pub fn new(config: BattleConfig, tunables: Tunables, rng: R) -> Self {
        Self {
            units: heapless::Vec::new(),
            enemy_health: config.enemy_health,
            config,
            tunables,
            state: BattleState::InProgress,
            spawn_timer: 0.0,
            next_id: 0,
            ticks: 0,
            rng,
        }
    }

    /// Advance the battle by `dt` seconds of game time
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let mut report = TickReport::default();
        self.ticks += 1;

        // NaN, infinite or negative frame times advance no game time
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.spawn_timer = (self.spawn_timer + dt).min(f32::MAX);

        let interval = self.config.spawn_interval;
        if interval > 0.0 {
            if self.spawn_timer >= interval {
                let due = (self.spawn_timer / interval) as usize;
                self.spawn_timer %= interval;
                for _ in 0..due.min(self.capacity()) {
                    if self.spawn_tick().is_some() {
                        report.spawned += 1;
                    }
                }
            }
        } else if self.spawn_tick().is_some() {
            report.spawned += 1;
        }

        self.step_units();
        report.hits = self.resolve_hits();

        if self.state == BattleState::InProgress && self.enemy_health <= 0 {
            self.state = BattleState::Victory;
            report.victory = true;
        }

        report
    }

    /// Spawn one unit at the player base unless the cap is reached
    pub fn spawn_tick(&mut self) -> Option<UnitId> {
        if self.units.len() >= self.capacity() {
            return None;
        }

        let id = UnitId(self.next_id);
        let phases = SpawnPhases::random(&mut self.rng);
        self.units
            .push(Unit::new(id, self.config.player_base, phases))
            .ok()?;
        self.next_id += 1;
        Some(id)
    }

    /// Step every unit in order. Each sees the whole collection, including
    /// units already advanced this tick.
    pub fn step_units(&mut self) {
        for i in 0..self.units.len() {
            let mut unit = self.units[i].clone();
            unit.step(self.units.iter(), &self.tunables);
            self.units[i] = unit;
        }
    }

    /// Remove units that reached their slot inside the enemy base, charging
    /// one point of enemy health each
    pub fn resolve_hits(&mut self) -> u32 {
        let enemy_base = self.config.enemy_base;
        let base_radius = self.config.base_radius;
        let tolerance = self.config.hit_tolerance;

        let before = self.units.len();
        self.units.retain(|unit| match unit.distance_to_target() {
            Some(to_target) => {
                unit.position.distance(&enemy_base) > base_radius || to_target > tolerance
            }
            None => true,
        });

        let hits = (before - self.units.len()) as u32;
        self.enemy_health -= hits as i32;
        hits
    }

    /// Send the listed units towards `target`, each to its own slot.
    /// Unknown ids are ignored; returns how many units were ordered.
    pub fn issue_move_order(&mut self, ids: &[UnitId], target: Vector2D) -> usize {
        self.order_matching(|unit| ids.contains(&unit.id), target)
    }

    /// Send every selected unit towards `target`
    pub fn order_selected(&mut self, target: Vector2D) -> usize {
        self.order_matching(|unit| unit.selected, target)
    }

    fn order_matching<F>(&mut self, matches: F, target: Vector2D) -> usize
    where
        F: Fn(&Unit) -> bool,
    {
        let count = self.units.iter().filter(|unit| matches(unit)).count();
        if count == 0 {
            return 0;
        }

        let selected = self.units.iter_mut().filter(|unit| matches(&**unit));
        for (index, unit) in selected.enumerate() {
            let slot = formation_slot(index, count, target, &self.config);
            unit.set_goal(slot.x, slot.y);
        }
        count
    }

    /// Returns false if no unit has this id
    pub fn toggle_selection(&mut self, id: UnitId, selected: bool) -> bool {
        match self.units.iter_mut().find(|unit| unit.id == id) {
            Some(unit) => {
                unit.selected = selected;
                true
            }
            None => false,
        }
    }

    /// Select units inside `rect`. Units outside are deselected unless
    /// `additive`. Returns the number of selected units afterwards.
    pub fn select_in_rect(&mut self, rect: &SelectionRect, additive: bool) -> usize {
        for unit in self.units.iter_mut() {
            if rect.contains(unit.position) {
                unit.selected = true;
            } else if !additive {
                unit.selected = false;
            }
        }
        self.selected_count()
    }

    pub fn clear_selection(&mut self) {
        for unit in self.units.iter_mut() {
            unit.selected = false;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.units.iter().filter(|unit| unit.selected).count()
    }

    pub fn set_tunable(&mut self, name: &str, value: f32) -> Result<(), UnknownTunable> {
        self.tunables.set_by_name(name, value)
    }

    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    pub fn tunables_mut(&mut self) -> &mut Tunables {
        &mut self.tunables
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    pub fn snapshot(&self) -> impl Iterator<Item = UnitView> + '_ {
        self.units.iter().map(|unit| UnitView {
            id: unit.id,
            position: unit.position,
            scale: unit.scale,
            selected: unit.selected,
        })
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Effective live-unit cap
    pub fn capacity(&self) -> usize {
        self.config.max_units.min(N)
    }

    pub fn enemy_health(&self) -> i32 {
        self.enemy_health
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn is_victory(&self) -> bool {
        self.state == BattleState::Victory
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::unit::Mode;

    fn calm() -> Tunables {
        Tunables {
            jump_height: 0.0,
            cohesion_force: 0.0,
            separation_force: 0.0,
            alignment_force: 0.0,
            ..Tunables::default()
        }
    }

    fn battle(config: BattleConfig) -> StdBattle {
        StdBattle::seeded(config, calm(), 7)
    }

    fn place(battle: &mut StdBattle, id: UnitId, position: Vector2D, target: Vector2D) {
        let unit = battle
            .units
            .iter_mut()
            .find(|unit| unit.id == id)
            .unwrap();
        unit.position = position;
        unit.set_goal(target.x, target.y);
    }

    #[test]
    fn test_for_viewport_layout() {
        let config = BattleConfig::for_viewport(1000.0, 700.0);
        assert_eq!(config.player_base, Vector2D::new(500.0, 80.0));
        assert_eq!(config.enemy_base, Vector2D::new(500.0, 620.0));
    }

    #[test]
    fn test_spawns_on_interval() {
        let mut battle = battle(BattleConfig::default());
        let dt = 1.0 / 60.0;

        let spawned: usize = (0..179).map(|_| battle.tick(dt).spawned).sum();
        assert_eq!(spawned, 0);

        let mut report = battle.tick(dt);
        // float accumulation may land the boundary one tick late
        if report.spawned == 0 {
            report = battle.tick(dt);
        }
        assert_eq!(report.spawned, 1);
        assert_eq!(battle.unit_count(), 1);
        assert_eq!(battle.units()[0].mode, Mode::Idle);
    }

    #[test]
    fn test_nan_frame_time_does_not_stall_spawning() {
        let mut battle = battle(BattleConfig::default());
        let report = battle.tick(f32::NAN);
        assert_eq!(report.spawned, 0);

        for _ in 0..600 {
            battle.tick(1.0 / 60.0);
        }
        assert!(battle.unit_count() >= 3);
    }

    #[test]
    fn test_infinite_frame_time_returns() {
        let mut battle = battle(BattleConfig::default());
        battle.tick(f32::INFINITY);
        battle.tick(-5.0);
        assert_eq!(battle.unit_count(), 0);

        battle.tick(3.0);
        assert_eq!(battle.unit_count(), 1);
    }

    #[test]
    fn test_huge_frame_time_spawns_up_to_cap() {
        let mut battle = battle(BattleConfig::default());
        let report = battle.tick(f32::MAX);
        assert_eq!(report.spawned, 20);
        assert_eq!(battle.unit_count(), 20);

        battle.tick(f32::MAX);
        assert_eq!(battle.unit_count(), 20);
    }

    #[test]
    fn test_units_see_neighbors_already_stepped_this_tick() {
        let tunables = Tunables {
            jump_height: 0.0,
            cohesion_force: 0.0,
            separation_force: 0.0,
            alignment_force: 1.0,
            ..Tunables::default()
        };
        let mut battle = StdBattle::seeded(BattleConfig::default(), tunables, 7);
        let first = battle.spawn_tick().unwrap();
        let second = battle.spawn_tick().unwrap();
        place(&mut battle, first, Vector2D::new(100.0, 100.0), Vector2D::new(500.0, 100.0));
        place(&mut battle, second, Vector2D::new(100.0, 110.0), Vector2D::new(100.0, 500.0));

        battle.step_units();

        // the first unit saw a still neighbor and heads straight along +x
        let lead = battle.unit(first).unwrap().velocity;
        assert!((lead.x - 1.0).abs() < 1e-5);
        assert!(lead.y.abs() < 1e-5);

        // the second unit aligns with the first unit's new velocity
        let follower = battle.unit(second).unwrap().velocity;
        let half = core::f32::consts::FRAC_1_SQRT_2;
        assert!((follower.x - half).abs() < 1e-4);
        assert!((follower.y - half).abs() < 1e-4);
    }

    #[test]
    fn test_spawn_skipped_at_cap() {
        let mut battle = battle(BattleConfig::default());
        for _ in 0..20 {
            assert!(battle.spawn_tick().is_some());
        }
        assert_eq!(battle.spawn_tick(), None);

        let report = battle.tick(3.0);
        assert_eq!(report.spawned, 0);
        assert_eq!(battle.unit_count(), 20);
    }

    #[test]
    fn test_config_cap_below_capacity() {
        let config = BattleConfig {
            max_units: 3,
            ..BattleConfig::default()
        };
        let mut battle = battle(config);
        battle.tick(30.0);
        assert_eq!(battle.unit_count(), 3);
        assert_eq!(battle.capacity(), 3);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut battle = battle(BattleConfig::default());
        let first = battle.spawn_tick().unwrap();
        let enemy = battle.config.enemy_base;
        place(&mut battle, first, enemy, enemy);
        assert_eq!(battle.resolve_hits(), 1);

        let second = battle.spawn_tick().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hit_decrements_health_and_removes_unit() {
        let mut battle = battle(BattleConfig::default());
        let a = battle.spawn_tick().unwrap();
        let b = battle.spawn_tick().unwrap();
        let enemy = battle.config.enemy_base;

        let slot = enemy + Vector2D::new(29.0, 0.0);
        place(&mut battle, a, slot + Vector2D::new(1.5, 0.0), slot);

        assert_eq!(battle.resolve_hits(), 1);
        assert_eq!(battle.enemy_health(), 99);
        assert_eq!(battle.unit_count(), 1);
        assert!(battle.unit(a).is_none());
        assert!(battle.unit(b).is_some());
    }

    #[test]
    fn test_no_hit_inside_base_but_off_slot() {
        let mut battle = battle(BattleConfig::default());
        let a = battle.spawn_tick().unwrap();
        let enemy = battle.config.enemy_base;

        place(&mut battle, a, enemy, enemy + Vector2D::new(0.0, 29.0));
        assert_eq!(battle.resolve_hits(), 0);

        // at its slot but the slot is outside the base
        let outside = enemy + Vector2D::new(60.0, 0.0);
        place(&mut battle, a, outside, outside);
        assert_eq!(battle.resolve_hits(), 0);
        assert_eq!(battle.enemy_health(), 100);
    }

    #[test]
    fn test_idle_units_never_hit() {
        let mut battle = battle(BattleConfig::default());
        let a = battle.spawn_tick().unwrap();
        battle.units[0].position = battle.config.enemy_base;
        assert_eq!(battle.resolve_hits(), 0);
        assert!(battle.unit(a).is_some());
    }

    #[test]
    fn test_assault_to_victory() {
        let config = BattleConfig {
            enemy_health: 4,
            ..BattleConfig::default()
        };
        let mut battle = battle(config);
        let ids: Vec<_> = (0..4).map(|_| battle.spawn_tick().unwrap()).collect();

        let ordered = battle.issue_move_order(&ids, config.enemy_base + Vector2D::new(10.0, 10.0));
        assert_eq!(ordered, 4);

        let mut victories = 0;
        let mut hits = 0;
        for _ in 0..2000 {
            let report = battle.tick(0.0);
            hits += report.hits;
            if report.victory {
                victories += 1;
            }
        }

        assert_eq!(hits, 4);
        assert_eq!(victories, 1);
        assert_eq!(battle.enemy_health(), 0);
        assert_eq!(battle.state(), BattleState::Victory);
        assert_eq!(battle.unit_count(), 0);
    }

    #[test]
    fn test_move_order_without_units_is_noop() {
        let mut battle = battle(BattleConfig::default());
        battle.spawn_tick();
        assert_eq!(battle.order_selected(Vector2D::new(10.0, 10.0)), 0);
        assert_eq!(battle.issue_move_order(&[UnitId(99)], Vector2D::zero()), 0);
        assert!(!battle.units()[0].is_seeking());
    }

    #[test]
    fn test_order_selected_assigns_unique_slots() {
        let mut battle = battle(BattleConfig::default());
        for _ in 0..6 {
            battle.spawn_tick();
        }
        for id in [UnitId(0), UnitId(2), UnitId(4)] {
            assert!(battle.toggle_selection(id, true));
        }
        assert!(!battle.toggle_selection(UnitId(42), true));

        assert_eq!(battle.order_selected(Vector2D::new(200.0, 300.0)), 3);

        let targets: Vec<_> = battle.units().iter().filter_map(Unit::target).collect();
        assert_eq!(targets.len(), 3);
        assert!(targets[0] != targets[1] && targets[1] != targets[2] && targets[0] != targets[2]);
        assert!(battle.units().iter().filter(|u| !u.selected).all(|u| !u.is_seeking()));
    }

    #[test]
    fn test_select_in_rect() {
        let mut battle = battle(BattleConfig::default());
        for _ in 0..3 {
            battle.spawn_tick();
        }
        battle.units[0].position = Vector2D::new(10.0, 10.0);
        battle.units[1].position = Vector2D::new(50.0, 50.0);
        battle.units[2].position = Vector2D::new(90.0, 90.0);
        battle.units[2].selected = true;

        let rect = SelectionRect::from_corners(Vector2D::new(60.0, 60.0), Vector2D::new(0.0, 0.0));
        assert_eq!(battle.select_in_rect(&rect, false), 2);
        assert!(!battle.units[2].selected);

        battle.units[2].selected = true;
        assert_eq!(battle.select_in_rect(&rect, true), 3);

        battle.clear_selection();
        assert_eq!(battle.selected_count(), 0);
    }

    #[test]
    fn test_snapshot_and_tunables() {
        let mut battle = battle(BattleConfig::default());
        battle.spawn_tick();
        battle.tick(0.0);

        let views: Vec<_> = battle.snapshot().collect();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].position, battle.units()[0].position);

        battle.set_tunable("moveSpeed", 3.0).unwrap();
        assert_eq!(battle.tunables().move_speed, 3.0);
        assert!(battle.set_tunable("nope", 1.0).is_err());
    }
}
