//! Headless skirmish runner.
//!
//! Drives a battle at a fixed frame rate without any rendering, optionally
//! sending every idle unit at the enemy base on a fixed cadence, and reports
//! the final status. Used by the `skirmish` binary and by integration tests.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use skirmish_core::{BattleConfig, StdBattle, Tunables, UnitId};
use skirmish_shared::{BattleStatus, ScenarioSettings, UnitSnapshot};

/// How to drive a scenario
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Upper bound on simulated frames
    pub ticks: u64,
    pub fps: f32,
    /// Fixed seed for reproducible spawn phases
    pub seed: Option<u64>,
    /// Every this many ticks, order all idle units onto the enemy base; 0 disables
    pub assault_every: u64,
    /// `name=value` tunable overrides applied after the scenario file
    pub overrides: Vec<(String, f32)>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            ticks: 36_000,
            fps: 60.0,
            seed: None,
            assault_every: 180,
            overrides: Vec::new(),
        }
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub status: BattleStatus,
    pub spawned: usize,
    pub hits: u32,
    pub orders: usize,
    /// Game time simulated, in seconds
    pub elapsed_secs: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitSnapshot>,
}

/// Read a JSON scenario file
pub fn load_scenario(path: &Path) -> Result<ScenarioSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse scenario {}", path.display()))
}

/// Parse a `name=value` tunable override
pub fn parse_override(raw: &str) -> Result<(String, f32)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("Expected name=value, got '{}'", raw);
    };
    let value: f32 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}", name))?;
    Ok((name.trim().to_string(), value))
}

fn build_battle(scenario: &ScenarioSettings, options: &RunOptions) -> Result<StdBattle> {
    let config = BattleConfig::from(&scenario.battle);
    let tunables = Tunables::from(&scenario.tunables);

    let mut battle = match options.seed {
        Some(seed) => StdBattle::seeded(config, tunables, seed),
        None => StdBattle::from_entropy(config, tunables),
    };

    for (name, value) in &options.overrides {
        battle
            .set_tunable(name, *value)
            .with_context(|| format!("Cannot override '{}'", name))?;
        log::debug!("Tunable {} = {}", name, value);
    }

    Ok(battle)
}

/// Send every idle unit to the enemy base
fn assault(battle: &mut StdBattle) -> usize {
    let idle: Vec<UnitId> = battle
        .units()
        .iter()
        .filter(|unit| !unit.is_seeking())
        .map(|unit| unit.id)
        .collect();
    let target = battle.config().enemy_base;
    battle.issue_move_order(&idle, target)
}

/// Run until victory or the tick budget runs out
pub fn run_scenario(
    scenario: &ScenarioSettings,
    options: &RunOptions,
    with_units: bool,
) -> Result<RunSummary> {
    if options.fps <= 0.0 {
        bail!("fps must be positive, got {}", options.fps);
    }

    let mut battle = build_battle(scenario, options)?;
    let dt = 1.0 / options.fps;

    log::info!(
        "Enemy base at ({:.0}, {:.0}) with {} health, up to {} units",
        battle.config().enemy_base.x,
        battle.config().enemy_base.y,
        battle.enemy_health(),
        battle.capacity()
    );

    let mut spawned = 0;
    let mut hits = 0;
    let mut orders = 0;

    for tick in 1..=options.ticks {
        let report = battle.tick(dt);
        spawned += report.spawned;
        hits += report.hits;

        if report.spawned > 0 {
            log::debug!(
                "Tick {}: units {}/{}",
                tick,
                battle.unit_count(),
                battle.capacity()
            );
        }
        if report.hits > 0 {
            log::info!(
                "Tick {}: {} hit(s), enemy health {}",
                tick,
                report.hits,
                battle.enemy_health()
            );
        }
        if report.victory {
            log::info!("Victory at tick {}", tick);
            break;
        }

        if options.assault_every > 0 && tick % options.assault_every == 0 {
            let ordered = assault(&mut battle);
            if ordered > 0 {
                log::debug!("Tick {}: {} unit(s) sent at the enemy base", tick, ordered);
                orders += ordered;
            }
        }
    }

    if !battle.is_victory() {
        log::warn!(
            "Tick budget exhausted with enemy health {}",
            battle.enemy_health()
        );
    }

    let units = if with_units {
        battle.snapshot().map(UnitSnapshot::from).collect()
    } else {
        Vec::new()
    };

    Ok(RunSummary {
        status: BattleStatus {
            unit_count: battle.unit_count(),
            max_units: battle.capacity(),
            enemy_health: battle.enemy_health(),
            victory: battle.is_victory(),
            tick: battle.ticks(),
        },
        spawned,
        hits,
        orders,
        elapsed_secs: battle.ticks() as f32 * dt,
        units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("moveSpeed=2.5").unwrap(),
            ("moveSpeed".to_string(), 2.5)
        );
        assert_eq!(
            parse_override(" jump_height = -1 ").unwrap(),
            ("jump_height".to_string(), -1.0)
        );
        assert!(parse_override("moveSpeed").is_err());
        assert!(parse_override("moveSpeed=fast").is_err());
    }

    #[test]
    fn test_unknown_override_is_rejected() {
        let options = RunOptions {
            ticks: 1,
            overrides: vec![("warp".to_string(), 1.0)],
            ..RunOptions::default()
        };
        let err = run_scenario(&ScenarioSettings::default(), &options, false).unwrap_err();
        assert!(format!("{:#}", err).contains("warp"));
    }

    #[test]
    fn test_rejects_non_positive_fps() {
        let options = RunOptions {
            fps: 0.0,
            ..RunOptions::default()
        };
        assert!(run_scenario(&ScenarioSettings::default(), &options, false).is_err());
    }

    #[test]
    fn test_assault_orders_only_idle_units() {
        let mut battle = build_battle(&ScenarioSettings::default(), &RunOptions::default()).unwrap();
        battle.spawn_tick();
        battle.spawn_tick();
        assert_eq!(assault(&mut battle), 2);
        assert_eq!(assault(&mut battle), 0);
    }
}
