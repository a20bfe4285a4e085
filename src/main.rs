//! Archery Range entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window,
    };

    use archery_range::Settings;
    use archery_range::audio::AudioManager;
    use archery_range::renderer::CanvasRenderer;
    use archery_range::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        /// Input accumulated since the last animation frame
        input: TickInput,
        canvas: HtmlCanvasElement,
        document: Document,
        last_score: Option<u32>,
    }

    impl Game {
        /// Advance one animation frame and forward what happened
        fn frame(&mut self, time: f64) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, time);

            for event in self.state.drain_events() {
                match &event {
                    GameEvent::StandardExhausted => log::info!("Standard round complete"),
                    GameEvent::Restarted { mode } => log::info!("Restarted in {} mode", mode.as_str()),
                    _ => {}
                }
                self.audio.handle(&event);
            }

            if self.last_score != Some(self.state.score) {
                self.last_score = Some(self.state.score);
                set_text(&self.document, "score", &self.state.score.to_string());
            }

            if let Err(e) = self.renderer.render(&self.state) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Match the canvas to the window and tell the simulation
        fn fit_to_window(&mut self, window: &Window) {
            let (w, h) = window_size(window);
            self.canvas.set_width(w as u32);
            self.canvas.set_height(h as u32);
            self.state.resize(w, h);
        }

        /// Pointer position relative to the canvas
        fn canvas_point(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                event.client_x() as f32 - rect.left() as f32,
                event.client_y() as f32 - rect.top() as f32,
            )
        }

        fn auto_pause(&mut self, reason: &str) {
            if self.state.phase == GamePhase::Playing && !self.input.pause {
                self.input.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn window_size(window: &Window) -> (f32, f32) {
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
        (w as f32, h as f32)
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let query = window.location().search().unwrap_or_default();
        let settings = Settings::from_query(&query);
        if let Some(level) = settings.log_filter().to_level() {
            let _ = console_log::init_with_level(level);
        }

        log::info!("Archery Range starting...");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no #game canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let (width, height) = window_size(&window);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        set_text(&document, "mode", settings.mode.label());
        set_text(&document, "score", "0");

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        // Animation frame timestamps share the performance clock's origin
        let now = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let state = GameState::new(settings.mode, width, height, seed, now);
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            renderer: CanvasRenderer::new(ctx),
            audio: AudioManager::new(&settings),
            input: TickInput::default(),
            canvas: canvas.clone(),
            document: document.clone(),
            last_score: None,
        }));
        GAME.with(|g| *g.borrow_mut() = Some(game.clone()));

        setup_input_handlers(&window, &canvas, game.clone())?;
        setup_auto_pause(&window, &document, game.clone())?;

        request_animation_frame(game);

        log::info!("Archery Range running!");
        Ok(())
    }

    fn setup_input_handlers(
        window: &Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if let Some(window) = web_sys::window() {
                    game.borrow_mut().fit_to_window(&window);
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move - aim
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let p = g.canvas_point(&event);
                g.input.pointer = Some(p);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse down - start drawing
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() != 0 {
                    return;
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                let p = g.canvas_point(&event);
                g.input.pointer = Some(p);
                g.input.press = true;
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up - loose. Listened on the window so a release off-canvas still fires.
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.button() == 0 {
                    game.borrow_mut().input.release = true;
                }
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.audio.resume();
                        g.input.quick_shot = true;
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "r" | "R" => g.input.restart = true,
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_auto_pause(
        window: &Window,
        document: &Document,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    /// Current game state as JSON
    pub fn snapshot() -> String {
        GAME.with(|g| {
            g.borrow()
                .as_ref()
                .and_then(|game| serde_json::to_string(&game.borrow().state).ok())
                .unwrap_or_else(|| "null".to_string())
        })
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

/// Dump the live game state for inspection from the devtools console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn snapshot_json() -> String {
    wasm_game::snapshot()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session: aim at the nearest target and quick-shoot on a fixed
/// cadence, then report the score. Takes an optional query string argument,
/// e.g. `archery-range "mode=standard&seed=7"`.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use archery_range::Settings;
    use archery_range::consts::REFERENCE_FRAME_MS;
    use archery_range::sim::{GameEvent, GameState, TickInput, tick};

    let query = std::env::args().nth(1).unwrap_or_default();
    let settings = Settings::from_query(&query);
    env_logger::Builder::new()
        .filter_level(settings.log_filter())
        .parse_default_env()
        .init();

    let seed = settings.seed.unwrap_or(42);
    log::info!("Archery Range (headless) starting, seed {}", seed);

    let mut state = GameState::new(settings.mode, 1280.0, 720.0, seed, 0.0);
    let (mut hits, mut shots) = (0u32, 0u32);

    for frame in 1..=3600u32 {
        let now = frame as f64 * REFERENCE_FRAME_MS;
        let origin = state.release_origin();
        let aim = state
            .targets
            .iter()
            .map(|t| t.pos())
            .min_by(|a, b| a.distance(origin).total_cmp(&b.distance(origin)));

        let input = TickInput {
            pointer: aim,
            quick_shot: aim.is_some() && frame % 30 == 0,
            ..Default::default()
        };
        tick(&mut state, &input, now);

        for event in state.drain_events() {
            match event {
                GameEvent::ArrowFired { .. } => shots += 1,
                GameEvent::TargetHit { .. } => hits += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Session over: {} hits from {} shots, score {} ({:?})",
        hits,
        shots,
        state.score,
        state.phase
    );
}
