//! Parcel Run entry point
//!
//! The browser build drives the game from requestAnimationFrame and draws to
//! a canvas. The native build runs a headless autopilot round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use parcel_run::GameConfig;
    use parcel_run::audio::WebAudio;
    use parcel_run::platform::{FrameDriver, KeyCommand, KeyState};
    use parcel_run::renderer::CanvasRenderer;
    use parcel_run::sim::{Game, RunState};

    /// Everything the browser callbacks share
    struct App {
        game: Game,
        driver: FrameDriver,
        renderer: CanvasRenderer,
        audio: WebAudio,
        keys: KeyState,
    }

    impl App {
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(1280.0);
            let h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(720.0);
            self.renderer.resize(w as u32, h as u32);
            self.game.resize(w as f32, h as f32);
        }

        fn on_key_down(&mut self, event: &KeyboardEvent) {
            self.audio.resume();
            match self.keys.key_down(&event.code(), event.repeat()) {
                Some(KeyCommand::TogglePause) => self.driver.toggle_pause(&mut self.game),
                Some(KeyCommand::Restart) if self.game.is_over() => {
                    self.keys.clear();
                    self.driver.restart(&mut self.game);
                }
                _ => {}
            }
            self.game.set_input(self.keys.axis());
        }

        fn on_key_up(&mut self, event: &KeyboardEvent) {
            self.keys.key_up(&event.code());
            self.game.set_input(self.keys.axis());
        }

        fn on_hidden(&mut self) {
            self.keys.clear();
            self.game.set_input(self.keys.axis());
            if self.game.run_state == RunState::Running {
                self.game.pause();
                log::info!("Auto-paused");
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Parcel Run starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;

        let renderer =
            CanvasRenderer::new(canvas).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}", seed);
        let app = Rc::new(RefCell::new(App {
            game: Game::new(GameConfig::load(), seed),
            driver: FrameDriver::new(),
            renderer,
            audio: WebAudio::new(),
            keys: KeyState::default(),
        }));
        {
            let mut a = app.borrow_mut();
            a.fit_to_window();
            a.game.start();
        }

        setup_input_handlers(&window, &document, app.clone());
        request_animation_frame(app);
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, document: &web_sys::Document, app: Rc<RefCell<App>>) {
        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().on_key_down(&event);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().on_key_up(&event);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().fit_to_window();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().on_hidden();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur drops held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().on_hidden();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            let App {
                game,
                driver,
                renderer,
                audio,
                ..
            } = &mut *a;
            driver.frame(game, time, renderer, audio);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use parcel_run::GameConfig;
    use parcel_run::audio::NullAudio;
    use parcel_run::consts::NOMINAL_FRAME_MS;
    use parcel_run::platform::FrameDriver;
    use parcel_run::renderer::HeadlessRenderer;
    use parcel_run::sim::{Game, InputAxis};

    /// Frames before giving up (an hour at 60 fps)
    const MAX_FRAMES: u32 = 60 * 60 * 60;

    /// Steer straight at the objective
    fn steer(game: &Game) -> InputAxis {
        let Some(target) = game.objective.get() else {
            return InputAxis::default();
        };
        let dir = (target.pos - game.player.center_m()).normalize_or_zero();
        InputAxis::new(dir.x, dir.y)
    }

    pub fn run(seed: u64) {
        let mut game = Game::new(GameConfig::load(), seed);
        let mut driver = FrameDriver::new();
        let mut renderer = HeadlessRenderer::default();
        let mut audio = NullAudio;

        game.start();
        let mut now = 0.0f64;
        let mut frames = 0;
        while !game.is_over() && frames < MAX_FRAMES {
            let axis = steer(&game);
            game.set_input(axis);
            driver.frame(&mut game, now, &mut renderer, &mut audio);
            now += NOMINAL_FRAME_MS as f64;
            frames += 1;
        }

        let snap = renderer.last.as_ref();
        log::info!(
            "Autopilot finished: {:?} after {:.1}s, {} deliveries, {} coins, {:.0} hp, difficulty step {}",
            game.game_over,
            game.elapsed_ms() / 1000.0,
            game.deliveries,
            game.player.coins,
            game.player.hp,
            snap.map(|s| s.difficulty_step).unwrap_or(0)
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Parcel Run (native) starting...");
    log::info!("Native mode runs a headless autopilot round - build for wasm32 to play");

    let seed = std::env::var("PARCEL_RUN_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    autopilot::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
