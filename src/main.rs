//! Translocator entry point
//!
//! On wasm32 this wires the browser (keyboard, pointer lock, overlay, audio)
//! to the fixed-step simulation. Natively it runs the simulation headless
//! with the autopilot at the controls.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use translocator::audio::{AudioManager, SoundEffect};
    use translocator::consts::*;
    use translocator::platform::web::DomOverlay;
    use translocator::platform::{Key, KeyboardState};
    use translocator::sim::{GameState, tick};
    use translocator::ui::Hud;
    use translocator::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        keys: KeyboardState,
        look_delta: Vec2,
        accumulator: f32,
        last_time: f64,
        overlay: Option<DomOverlay>,
        audio: AudioManager,
        pointer_locked: bool,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let audio = AudioManager::new(&settings);
            Self {
                state: GameState::new(Tuning::default()),
                settings,
                keys: KeyboardState::new(),
                look_delta: Vec2::ZERO,
                accumulator: 0.0,
                last_time: 0.0,
                overlay: None,
                audio,
                pointer_locked: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let step = self.state.world.dt();
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                let look = self.settings.scale_look(std::mem::take(&mut self.look_delta));
                let input = self.keys.take_input(look);
                tick(&mut self.state, &input);
                self.accumulator -= step;
                substeps += 1;
            }

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        fn update_hud(&mut self) {
            let hud = Hud::from_state(&self.state);
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.apply(&hud);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("Translocator starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        let game = Rc::new(RefCell::new(Game::new(Settings::load())));
        game.borrow_mut().overlay = Some(DomOverlay::new(document.clone()));

        setup_input_handlers(&window, &document, &canvas, game.clone());
        request_animation_frame(&window, game);

        log::info!("Translocator running!");
    }

    fn setup_input_handlers(
        window: &web_sys::Window,
        document: &web_sys::Document,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let locked = document_clone.pointer_lock_element().is_some();
                log::debug!("Pointer lock {}", if locked { "acquired" } else { "released" });
                game.borrow_mut().pointer_locked = locked;
            });
            let _ = document
                .add_event_listener_with_callback("pointerlockchange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let g = game.borrow();
                g.audio.resume();
                if !g.pointer_locked {
                    canvas_clone.request_pointer_lock();
                }
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.pointer_locked {
                    g.look_delta += Vec2::new(event.movement_x() as f32, event.movement_y() as f32);
                }
            });
            let _ = document.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    if key == Key::Jump {
                        event.prevent_default();
                    }
                    game.borrow_mut().keys.key_down(key, event.repeat());
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    game.borrow_mut().keys.key_up(key);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never send keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keys.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.update_hud();
        }

        if let Some(window) = web_sys::window() {
            request_animation_frame(&window, game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use translocator::Tuning;
    use translocator::sim::{Autopilot, GameEvent, GameState, LevelId, tick};

    /// Headless translocator run driven by the autopilot
    #[derive(Parser)]
    #[command(name = "translocator")]
    #[command(about = "Run the translocator simulation headless")]
    struct Cli {
        /// Number of fixed-step frames to simulate
        #[arg(long, default_value_t = 3600)]
        frames: u64,

        /// Tuning overrides (JSON)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Level to start on: 0 = title, 1-5 = stages, 6 = ending
        #[arg(long, default_value_t = 0)]
        start_level: u8,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path).with_context(|| format!("Failed to load tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let start = LevelId::from_index(cli.start_level).context("Invalid --start-level")?;

        log::info!("Translocator (native) starting on {start} for {} frames", cli.frames);

        let mut state = GameState::starting_at(tuning, start);
        let mut pilot = Autopilot::new();
        let mut deaths = 0u32;

        for _ in 0..cli.frames {
            let input = pilot.next_input(&state);
            tick(&mut state, &input);

            for event in state.drain_events() {
                match event {
                    GameEvent::GameOver => deaths += 1,
                    GameEvent::TeleportMarked(at) => log::debug!("Marked {at}"),
                    GameEvent::Teleported { from, to } => log::debug!("Teleported {from} -> {to}"),
                    _ => {}
                }
            }
            if state.level() == LevelId::Ending {
                break;
            }
        }

        log::info!(
            "Finished on {} after {} frames ({:.1}s simulated, {} game overs)",
            state.level(),
            state.time_ticks,
            state.time,
            deaths
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}
