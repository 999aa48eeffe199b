//! Sweet Shooter entry point
//!
//! On the web this exports a `WasmGame` handle the page script drives once
//! per animation frame. Natively it plays a headless run with an
//! auto-aiming bot and logs how far it got.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use glam::Vec2;
    use wasm_bindgen::prelude::*;

    use sweet_shooter::{Game, Settings, Tuning};

    fn js_err(err: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&err.to_string())
    }

    /// Game handle exported to JavaScript
    #[wasm_bindgen]
    pub struct WasmGame {
        game: Game,
    }

    #[wasm_bindgen]
    impl WasmGame {
        /// Optional `tuning_json` overrides the default balance
        #[wasm_bindgen(constructor)]
        pub fn new(tuning_json: Option<String>) -> Result<WasmGame, JsValue> {
            let tuning = match tuning_json {
                Some(json) => Tuning::from_json(&json).map_err(js_err)?,
                None => Tuning::default(),
            };
            let seed = js_sys::Date::now() as u64;
            let game = Game::new(seed, tuning, Settings::load()).map_err(js_err)?;
            log::info!("Game initialized with seed: {}", seed);
            Ok(WasmGame { game })
        }

        pub fn start(&mut self) {
            self.game.start();
        }

        pub fn pause(&mut self) {
            self.game.pause();
        }

        pub fn resume(&mut self) {
            self.game.resume();
        }

        pub fn toggle_pause(&mut self) {
            self.game.toggle_pause();
        }

        pub fn restart(&mut self) {
            self.game.restart();
        }

        pub fn aim(&mut self, x: f32, y: f32) {
            self.game.on_aim(Vec2::new(x, y));
        }

        pub fn fire(&mut self, x: f32, y: f32) -> usize {
            self.game.on_fire(Vec2::new(x, y))
        }

        /// Returns false when there was nothing to claim
        pub fn claim_upgrade(&mut self) -> bool {
            self.game.on_claim_upgrade().is_some()
        }

        pub fn set_focused(&mut self, focused: bool) {
            self.game.set_focused(focused);
        }

        pub fn set_muted(&mut self, muted: bool) {
            let settings = Settings {
                muted,
                ..*self.game.settings()
            };
            settings.save();
            self.game.set_settings(settings);
        }

        /// Advance one frame; returns the snapshot as JSON
        pub fn tick(&mut self) -> Result<String, JsValue> {
            self.game.tick().to_json().map_err(js_err)
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Sweet Shooter (wasm) loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use glam::Vec2;
    use sweet_shooter::consts::TICKS_PER_SECOND;
    use sweet_shooter::sim::{GameEvent, SweetKind};
    use sweet_shooter::{Game, Settings, Tuning, ticks_to_secs};

    /// Frames between bot trigger pulls
    const FIRE_EVERY: u64 = 8;
    /// Give up after this much simulated time
    const MAX_SECONDS: u32 = 300;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    log::info!("Sweet Shooter (native) headless run, seed {}", seed);

    let mut game = Game::new(seed, tuning, Settings::load())?;
    game.start();

    let mut destroyed = 0usize;
    let mut explosions = 0usize;
    let mut snapshot = game.tick();
    for frame in 1..=(MAX_SECONDS * TICKS_PER_SECOND) as u64 {
        if snapshot.game_over {
            break;
        }
        for event in &snapshot.events {
            match event {
                GameEvent::SweetDestroyed { .. } => destroyed += 1,
                GameEvent::DynamiteExploded { .. } => explosions += 1,
                GameEvent::WaveStarted(wave) => log::info!("Wave {} begins", wave),
                _ => {}
            }
        }

        // Lowest sweet is the most urgent; dynamite first, it clears the field
        let target = snapshot
            .sweets
            .iter()
            .filter(|s| s.pos.y > 0.0)
            .max_by(|a, b| {
                let urgency = |s: &sweet_shooter::sim::Sweet| {
                    s.pos.y + if s.kind == SweetKind::Dynamite { 1000.0 } else { 0.0 }
                };
                urgency(a).total_cmp(&urgency(b))
            })
            .map(|s| s.pos);
        if let Some(target) = target {
            game.on_aim(target);
            if frame % FIRE_EVERY == 0 {
                game.on_fire(target + Vec2::new(0.0, 10.0));
            }
        }
        if snapshot.upgrade_available {
            game.on_claim_upgrade();
        }

        snapshot = game.tick();
    }

    let elapsed = u32::try_from(snapshot.tick).unwrap_or(u32::MAX);
    log::info!(
        "Run ended after {:.1}s: score {}, wave {}, lives {}, {} sweets popped, {} explosions",
        ticks_to_secs(elapsed),
        snapshot.score,
        snapshot.wave,
        snapshot.lives,
        destroyed,
        explosions
    );
    println!("{}", snapshot.to_json()?);
    Ok(())
}
