//! Safari Drive entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use safari_drive::Settings;
    use safari_drive::platform::InputMapper;
    use safari_drive::renderer::render;
    use safari_drive::sim::{GameState, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        input: InputMapper,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                state: GameState::new(seed, settings),
                ctx,
                input: InputMapper::new(),
            }
        }

        /// Advance one fixed frame
        fn update(&mut self) {
            let input = self.input.tick_input();
            tick(&mut self.state, &input);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Err(e) = render(&mut self.ctx, &self.state) {
                log::warn!("Render error: {:?}", e);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Safari Drive starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let settings = Settings::load();

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(settings.viewport_width as u32);
        canvas.set_height(settings.viewport_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings, ctx)));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&window, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("Safari Drive running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let speed = g.state.player.speed;
                if g.input.key_down(&event.key(), speed) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let speed = g.state.player.speed;
                g.input.key_up(&event.key(), speed);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur drops held keys (the keyup never arrives)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.clear();
                log::debug!("Input cleared (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window; game loop stopped");
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Safari Drive (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    drive_headless(1, 3_000);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold the right key for `frames` frames, rendering into a recorder
#[cfg(not(target_arch = "wasm32"))]
fn drive_headless(seed: u64, frames: u64) {
    use safari_drive::Settings;
    use safari_drive::platform::InputMapper;
    use safari_drive::renderer::{RecordingCanvas, render};
    use safari_drive::sim::{GameState, tick};

    let mut state = GameState::new(seed, Settings::load());
    let mut input = InputMapper::new();
    input.key_down("ArrowRight", state.player.speed);
    let mut canvas = RecordingCanvas::new();

    let mut blocked_frames = 0u64;
    for frame in 0..frames {
        tick(&mut state, &input.tick_input());
        canvas.clear();
        let Ok(()) = render(&mut canvas, &state);

        if !state.player.can_move() {
            blocked_frames += 1;
        }
        if frame % 500 == 0 {
            log::info!(
                "frame {}: x={} obstacles={} roadblocks={} draw calls={}",
                frame,
                state.world.offset.x,
                state.obstacles.len(),
                state.roadblocks.len(),
                canvas.commands.len()
            );
        }
    }

    log::info!(
        "Drove to x={} in {} frames ({} spent at roadblocks)",
        state.world.offset.x,
        frames,
        blocked_frames
    );
}
