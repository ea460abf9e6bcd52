use skirmish_core::{
    BattleConfig, PointerButton, PointerController, PointerOutcome, StdBattle, Tunable, Tunables,
    UnitId, Vector2D,
};
use skirmish_shared::{
    BattleStatus, MoveOrder, ScenarioSettings, TunableSettings, TunableUpdate, UnitSnapshot,
};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[cfg(not(target_arch = "wasm32"))]
fn log(s: &str) {
    println!("{}", s);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

/// Floats per unit in [`Skirmish::unit_buffer`]: x, y, scale, selected
pub const UNIT_STRIDE: usize = 4;

/// Browser handle on a running skirmish. The page's animation frame calls
/// `tick`, forwards pointer events and draws from `unit_buffer`.
#[wasm_bindgen]
pub struct Skirmish {
    battle: StdBattle,
    pointer: PointerController,
}

#[wasm_bindgen]
impl Skirmish {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Skirmish {
        console_log!("Starting skirmish on a {}x{} field", width, height);
        Self::with_config(BattleConfig::for_viewport(width, height), Tunables::default())
    }

    /// Build from a JSON scenario (`{ "tunables": {..}, "battle": {..} }`)
    pub fn from_scenario(json: &str) -> Result<Skirmish, JsValue> {
        let scenario: ScenarioSettings = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid scenario: {}", e)))?;
        console_log!("Loaded scenario: {:?}", scenario.battle);
        Ok(Self::with_config(
            BattleConfig::from(&scenario.battle),
            Tunables::from(&scenario.tunables),
        ))
    }

    /// Advance by `dt_ms` milliseconds. Returns true on the tick the enemy
    /// base falls.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        let report = self.battle.tick(dt_ms / 1000.0);
        if report.hits > 0 {
            console_log!(
                "{} hit(s), enemy health {}",
                report.hits,
                self.battle.enemy_health()
            );
        }
        if report.victory {
            console_log!("Victory after {} ticks", self.battle.ticks());
        }
        report.victory
    }

    pub fn spawn_tick(&mut self) -> Option<u32> {
        self.battle.spawn_tick().map(|id| id.0)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, secondary: bool, shift: bool) {
        let button = if secondary {
            PointerButton::Secondary
        } else {
            PointerButton::Primary
        };
        let outcome = self
            .pointer
            .pointer_down(&mut self.battle, Vector2D::new(x, y), button, shift);
        if let PointerOutcome::Ordered { units } = outcome {
            console_log!("Ordered {} unit(s) to ({}, {})", units, x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, shift: bool) {
        self.pointer
            .pointer_move(&mut self.battle, Vector2D::new(x, y), shift);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.pointer_up(&mut self.battle);
    }

    /// `[x, y, width, height]` of the drag rectangle, if dragging
    pub fn selection_rect(&self) -> Option<Vec<f32>> {
        self.pointer
            .selection_rect()
            .map(|rect| vec![rect.min.x, rect.min.y, rect.width(), rect.height()])
    }

    pub fn awaiting_target(&self) -> bool {
        self.pointer.awaiting_target()
    }

    pub fn issue_move_order(&mut self, unit_ids: Vec<u32>, x: f32, y: f32) -> usize {
        let ids: Vec<UnitId> = unit_ids.into_iter().map(UnitId).collect();
        self.battle.issue_move_order(&ids, Vector2D::new(x, y))
    }

    /// Same as `issue_move_order`, taking a JSON [`MoveOrder`]
    pub fn issue_move_order_json(&mut self, json: &str) -> Result<usize, JsValue> {
        let order: MoveOrder = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid move order: {}", e)))?;
        Ok(self.issue_move_order(order.unit_ids, order.x, order.y))
    }

    pub fn toggle_selection(&mut self, id: u32, selected: bool) -> bool {
        self.battle.toggle_selection(UnitId(id), selected)
    }

    pub fn set_tunable(&mut self, name: &str, value: f32) -> Result<(), JsValue> {
        self.battle
            .set_tunable(name, value)
            .map_err(|e| JsValue::from_str(&format!("{}: {}", e, name)))
    }

    /// Apply a JSON [`TunableUpdate`] (`{ "name": "moveSpeed", "value": 2 }`)
    pub fn set_tunable_json(&mut self, json: &str) -> Result<(), JsValue> {
        let update: TunableUpdate = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid tunable update: {}", e)))?;
        self.set_tunable(&update.name, update.value)
    }

    /// Replace every tunable from a JSON [`TunableSettings`]; missing fields
    /// take their defaults
    pub fn set_tunables_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: TunableSettings = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("invalid tunables: {}", e)))?;
        *self.battle.tunables_mut() = Tunables::from(&settings);
        Ok(())
    }

    pub fn tunable(&self, name: &str) -> Result<f32, JsValue> {
        let tunable: Tunable = name
            .parse()
            .map_err(|e| JsValue::from_str(&format!("{}: {}", e, name)))?;
        Ok(self.battle.tunables().get(tunable))
    }

    pub fn tunable_names() -> Vec<String> {
        Tunable::ALL.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn tunables_json(&self) -> String {
        let settings = TunableSettings::from(self.battle.tunables());
        serde_json::to_string(&settings).unwrap_or_default()
    }

    /// Flat `[x, y, scale, selected]` per unit for cheap transfer to JS
    pub fn unit_buffer(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.battle.unit_count() * UNIT_STRIDE);
        for view in self.battle.snapshot() {
            buffer.push(view.position.x);
            buffer.push(view.position.y);
            buffer.push(view.scale);
            buffer.push(if view.selected { 1.0 } else { 0.0 });
        }
        buffer
    }

    pub fn snapshot_json(&self) -> String {
        let units: Vec<UnitSnapshot> = self.battle.snapshot().map(UnitSnapshot::from).collect();
        serde_json::to_string(&units).unwrap_or_default()
    }

    pub fn status_json(&self) -> String {
        serde_json::to_string(&self.status()).unwrap_or_default()
    }

    /// `[x, y, radius]`
    pub fn player_base(&self) -> Vec<f32> {
        let config = self.battle.config();
        vec![config.player_base.x, config.player_base.y, config.base_radius]
    }

    /// `[x, y, radius]`
    pub fn enemy_base(&self) -> Vec<f32> {
        let config = self.battle.config();
        vec![config.enemy_base.x, config.enemy_base.y, config.base_radius]
    }

    pub fn unit_count(&self) -> usize {
        self.battle.unit_count()
    }

    pub fn max_units(&self) -> usize {
        self.battle.capacity()
    }

    pub fn enemy_health(&self) -> i32 {
        self.battle.enemy_health()
    }

    pub fn is_victory(&self) -> bool {
        self.battle.is_victory()
    }
}

impl Skirmish {
    fn with_config(config: BattleConfig, tunables: Tunables) -> Skirmish {
        Skirmish {
            battle: StdBattle::from_entropy(config, tunables),
            pointer: PointerController::new(),
        }
    }

    pub fn status(&self) -> BattleStatus {
        BattleStatus {
            unit_count: self.battle.unit_count(),
            max_units: self.battle.capacity(),
            enemy_health: self.battle.enemy_health(),
            victory: self.battle.is_victory(),
            tick: self.battle.ticks(),
        }
    }
}
