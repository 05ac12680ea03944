//! Red Light entry point
//!
//! Browser: WebGPU canvas, keyboard input and the animation-frame loop.
//! Native: one headless round played by a scripted player.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, Window};

    use red_light::audio::{AudioManager, SoundEffect};
    use red_light::platform::{self, Command, key_command};
    use red_light::renderer::{Camera, RenderState, Scene};
    use red_light::sim::{Round, RoundEvent};
    use red_light::{GameError, RoundConfig, Settings, asset, ui};

    /// Game instance holding all state
    struct Game {
        round: Round,
        config: RoundConfig,
        scene: Scene,
        camera: Camera,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        fps: ui::FpsCounter,
        // Last HUD text written, to skip redundant DOM updates
        banner: String,
        hint: Option<&'static str>,
    }

    impl Game {
        fn new(config: RoundConfig, settings: Settings, aspect: f32) -> Result<Self, GameError> {
            let round = Round::new(config.clone(), platform::round_seed())?;
            Ok(Self {
                round,
                scene: Scene::new(config.start_position),
                config,
                camera: Camera::new(aspect),
                render_state: None,
                audio: AudioManager::new(settings.volume()),
                settings,
                fps: ui::FpsCounter::new(),
                banner: String::new(),
                hint: None,
            })
        }

        fn command(&mut self, command: Command) {
            match command {
                Command::MoveBegin => {
                    self.audio.resume();
                    self.round.press_forward();
                }
                Command::MoveEnd => {
                    self.round.release_forward();
                }
                Command::Restart if self.round.is_over() => self.restart(),
                Command::Restart => {}
            }
        }

        /// Replace the finished round; the next frame begins it
        fn restart(&mut self) {
            match Round::new(self.config.clone(), platform::round_seed()) {
                Ok(round) => {
                    log::info!("Restarting with seed {}", round.seed());
                    self.round = round;
                }
                Err(e) => log::error!("Cannot restart: {e}"),
            }
        }

        fn update(&mut self, time: f64) {
            if !self.round.has_begun() {
                self.round.begin(time);
            }
            self.round.frame(time);

            for event in self.round.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if let RoundEvent::Finished(outcome) = event {
                    log::info!("{} after {} frames", outcome.message(), self.round.frames());
                }
            }

            self.fps.record(time);
            self.scene.sync(&self.round);
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.scene, &self.camera) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let banner = ui::banner_text(&self.round);
            if banner != self.banner {
                if let Some(el) = document.query_selector(".text").ok().flatten() {
                    el.set_text_content(Some(&banner));
                }
                self.banner = banner;
            }

            let hint = ui::hint_text(&self.round);
            if hint != self.hint {
                if let Some(el) = document.get_element_by_id("hint") {
                    el.set_text_content(hint);
                }
                self.hint = hint;
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("fps") {
                    el.set_text_content(Some(&format!("{} fps", self.fps.fps())));
                }
            }
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.camera.set_viewport(width, height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }
    }

    /// Canvas backing size in device pixels
    fn canvas_size(window: &Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    pub async fn run() -> Result<(), GameError> {
        log::info!("Red Light starting...");

        let window = web_sys::window().ok_or(GameError::NoWindow)?;
        let document = window.document().ok_or(GameError::NoWindow)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(GameError::MissingElement("canvas"))?;

        let (width, height) = canvas_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        // Rewrite so newly added fields show up with their defaults
        settings.save();

        let config = RoundConfig::default();
        config.validate()?;

        let model_path = settings.model_path.clone();
        let game = Rc::new(RefCell::new(Game::new(
            config,
            settings,
            width as f32 / height as f32,
        )?));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;
        game.borrow_mut().render_state = Some(render_state);

        load_doll(game.clone(), model_path);
        setup_input_handlers(&window, game.clone());
        setup_resize_handler(&window, canvas, game.clone());

        request_animation_frame(game);

        log::info!("Red Light running!");
        Ok(())
    }

    /// Fetch the doll in the background; the round runs without it meanwhile
    fn load_doll(game: Rc<RefCell<Game>>, path: String) {
        wasm_bindgen_futures::spawn_local(async move {
            match asset::load_model(&path).await {
                Ok(mesh) => game.borrow_mut().scene.set_doll_model(mesh),
                Err(e) => log::warn!("Doll model unavailable ({path}): {e}"),
            }
        });
    }

    fn setup_input_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = key_command(&event.key(), pressed) {
                    // Keep the arrow key from scrolling the page
                    event.prevent_default();
                    game.borrow_mut().command(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur swallows the keyup
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().command(Command::MoveEnd);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = canvas_size(&window_clone, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            game.borrow_mut().resize(width, height);
            log::debug!("Resized to {width}x{height}");
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Red Light failed to start: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Red Light (native) starting...");
    log::info!("The game renders in the browser - run with `trunk serve`; playing a headless round");

    let settings = red_light::Settings::load();
    // Page-relative on the web, working-directory-relative here
    let model_path = settings.model_path.trim_start_matches('/');
    match red_light::asset::load_model_file(model_path) {
        Ok(mesh) => log::info!("Doll model: {} vertices", mesh.vertex_count()),
        Err(e) => log::warn!("Doll model unavailable ({model_path}): {e}"),
    }

    if let Err(e) = headless::play_round(red_light::platform::round_seed()) {
        log::error!("Headless round failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use red_light::sim::{Doll, DollOrientation, Outcome, Round};
    use red_light::{GameError, RoundConfig};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play one round at 60 fps, moving only while the doll is settled facing away
    pub fn play_round(seed: u64) -> Result<Outcome, GameError> {
        let mut round = Round::new(RoundConfig::default(), seed)?;
        let mut now = 0.0;
        let mut pressed = false;

        round.begin(now);
        loop {
            now += FRAME_MS;
            round.frame(now);

            for event in round.drain_events() {
                log::info!("[{:>6.0}ms] {:?}", now, event);
            }

            if let Some(outcome) = round.outcome() {
                log::info!(
                    "{} at x={:.2} with {:.1}s left",
                    outcome.message(),
                    round.player().position,
                    round.time_remaining_ms() / 1000.0
                );
                return Ok(outcome);
            }

            let safe = safe_to_move(round.doll());
            if safe && !pressed {
                pressed = round.press_forward();
            } else if !safe && pressed {
                round.release_forward();
                pressed = false;
            }
        }
    }

    /// Facing away with no turn toward the player in flight
    fn safe_to_move(doll: &Doll) -> bool {
        doll.orientation() == DollOrientation::FacingAway && !doll.is_unsettled()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_autopilot_waits_out_turns() {
            let mut doll = Doll::new();
            // Logically away but visually still facing the player
            assert!(!safe_to_move(&doll));

            doll.begin_turn(DollOrientation::FacingAway, 300.0);
            doll.settle(DollOrientation::FacingAway);
            assert!(safe_to_move(&doll));

            // Turning back toward the player before it takes effect
            doll.begin_turn(DollOrientation::FacingPlayer, 300.0);
            assert_eq!(doll.orientation(), DollOrientation::FacingAway);
            assert!(!safe_to_move(&doll));
        }

        #[test]
        fn test_autopilot_is_never_caught() {
            for seed in [1, 42, 7_777] {
                assert_ne!(play_round(seed).unwrap(), Outcome::Lost);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
