//! Sky Hopper entry point
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
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use sky_hopper::audio::{AudioManager, SoundEffect};
    use sky_hopper::persistence::LocalStorage;
    use sky_hopper::platform::FrameDriver;
    use sky_hopper::renderer::{RenderState, shapes};
    use sky_hopper::sim::TickOutcome;
    use sky_hopper::ui::{self, Label, Letterbox, Screen, TextSize};
    use sky_hopper::{Command, Game, GamePhase, ProfileStore, Settings};

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStorage>,
        driver: FrameDriver,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        settings_storage: LocalStorage,
        canvas: HtmlCanvasElement,
        overlay: Option<Element>,
        /// Labels currently in the overlay
        shown: Vec<Label>,
        /// Pending requestAnimationFrame id
        raf_handle: Option<i32>,
    }

    impl App {
        fn letterbox(&self) -> Letterbox {
            Letterbox::fit(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Queue a command, with click feedback for menu actions
        fn input(&mut self, cmd: Command) {
            match (self.game.phase(), cmd) {
                (GamePhase::Playing, Command::Press) => self.audio.play(SoundEffect::Flap),
                (_, Command::TypeChar(_) | Command::Backspace) => {}
                _ => self.audio.play(SoundEffect::MenuSelect),
            }
            self.game.handle_input(cmd);
        }

        fn pointer(&mut self, client_x: f32, client_y: f32) {
            self.audio.resume();
            let rect = self.canvas.get_bounding_client_rect();
            let host = Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32);
            let p = self.letterbox().to_playfield(host);
            let cmd = ui::pointer_command(&Screen::of(&self.game), p);
            if let Some(cmd) = cmd {
                self.input(cmd);
            }
        }

        /// One display refresh. Returns false once the driver has stopped.
        fn frame(&mut self, timestamp: f64) -> bool {
            let Some(outcome) = self.driver.frame(&mut self.game, timestamp) else {
                return false;
            };
            if let Some(outcome) = outcome {
                self.play_outcome(&outcome);
            }
            self.remember_difficulty();
            self.render();
            self.sync_overlay();
            true
        }

        fn play_outcome(&self, outcome: &TickOutcome) {
            if outcome.scored > 0 {
                self.audio.play(SoundEffect::Score);
            }
            if outcome.is_terminal() {
                match self.game.phase() {
                    GamePhase::GameOver { new_best: true, .. } => {
                        self.audio.play(SoundEffect::HighScore)
                    }
                    _ => self.audio.play(SoundEffect::Crash),
                }
            }
        }

        fn remember_difficulty(&mut self) {
            let difficulty = self.game.sim().difficulty;
            if self.game.phase().is_playing() && self.settings.last_difficulty != difficulty {
                self.settings.last_difficulty = difficulty;
                if let Err(e) = self.settings.save(&mut self.settings_storage) {
                    log::warn!("Settings not saved: {}", e);
                }
            }
        }

        fn render(&mut self) {
            let vertices = shapes::scene(&Screen::of(&self.game));
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Drop the pending animation frame, if any
        fn cancel_frame(&mut self) {
            if let Some(handle) = self.raf_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }

        /// Match the backing store, surface and overlay to the canvas's CSS size
        fn resize(&mut self) {
            let (width, height) = backing_size(&self.canvas);
            if (width, height) != (self.canvas.width(), self.canvas.height()) {
                log::info!("Canvas resized to {}x{}", width, height);
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                if let Some(ref mut render_state) = self.render_state {
                    render_state.resize(width, height);
                }
            }
            if let Some(overlay) = &self.overlay {
                place_overlay(overlay, &self.canvas);
            }
            // Label positions depend on the letterbox
            self.shown.clear();
        }

        /// Rebuild the text overlay when the label set changes
        fn sync_overlay(&mut self) {
            let mut labels = ui::labels(&Screen::of(&self.game));
            let fps = self.driver.fps();
            if self.settings.show_fps {
                labels.push(Label {
                    text: format!("{} fps", fps),
                    pos: Vec2::new(290.0, 12.0),
                    size: TextSize::Small,
                });
            }
            if labels == self.shown {
                return;
            }

            let Some(overlay) = &self.overlay else { return };
            let Some(document) = overlay.owner_document() else {
                return;
            };
            let lb = self.letterbox();
            overlay.set_inner_html("");
            for label in &labels {
                if let Some(el) = label_element(&document, label, &lb) {
                    let _ = overlay.append_child(&el);
                }
            }
            self.shown = labels;
        }
    }

    fn font_px(size: TextSize) -> f32 {
        match size {
            TextSize::Title => 36.0,
            TextSize::Large => 28.0,
            TextSize::Medium => 20.0,
            TextSize::Small => 14.0,
        }
    }

    fn label_element(document: &Document, label: &Label, lb: &Letterbox) -> Option<Element> {
        let el = document.create_element("div").ok()?;
        let pos = lb.to_host(label.pos);
        let style = format!(
            "position:absolute;left:{:.1}px;top:{:.1}px;transform:translate(-50%,-50%);\
             font:bold {:.1}px sans-serif;color:#fff;text-shadow:0 1px 2px #000;\
             white-space:pre;pointer-events:none",
            pos.x,
            pos.y,
            font_px(label.size) * lb.scale,
        );
        el.set_attribute("style", &style).ok()?;
        el.set_text_content(Some(&label.text));
        Some(el)
    }

    /// Canvas CSS size in device pixels
    fn backing_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        (
            (canvas.client_width() as f64 * dpr) as u32,
            (canvas.client_height() as f64 * dpr) as u32,
        )
    }

    /// Cover the canvas with the overlay
    fn place_overlay(overlay: &Element, canvas: &HtmlCanvasElement) {
        let style = format!(
            "position:absolute;left:{}px;top:{}px;width:{}px;height:{}px;\
             pointer-events:none;overflow:hidden",
            canvas.offset_left(),
            canvas.offset_top(),
            canvas.client_width(),
            canvas.client_height(),
        );
        let _ = overlay.set_attribute("style", &style);
    }

    /// Absolutely positioned layer over the canvas for text
    fn create_overlay(document: &Document, canvas: &HtmlCanvasElement) -> Option<Element> {
        let overlay = document.create_element("div").ok()?;
        overlay.set_id("overlay");
        place_overlay(&overlay, canvas);
        canvas.parent_element()?.append_child(&overlay).ok()?;
        Some(overlay)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Sky Hopper starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let (width, height) = backing_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings_storage = LocalStorage::open();
        let settings = Settings::load(&settings_storage);
        let store = ProfileStore::load(LocalStorage::open());

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, store, settings.profiles_enabled)
            .with_difficulty(settings.last_difficulty);
        log::info!("Game initialized with seed: {}", seed);

        let render_state = init_renderer(&canvas, width, height).await;
        let overlay = create_overlay(&document, &canvas);

        let app = Rc::new(RefCell::new(App {
            game,
            driver: FrameDriver::new(),
            render_state,
            audio: AudioManager::new(&settings),
            settings,
            settings_storage,
            canvas: canvas.clone(),
            overlay,
            shown: Vec::new(),
            raf_handle: None,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_lifecycle(app.clone());

        // Start game loop
        app.borrow_mut().driver.start();
        request_animation_frame(app);

        log::info!("Sky Hopper running!");
    }

    async fn init_renderer(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => Some(state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };

        // Mouse down - buttons, or jump while playing
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut()
                    .pointer(event.client_x() as f32, event.client_y() as f32);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut()
                        .pointer(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                let key = event.key();
                let Some(cmd) = ui::key_command(a.game.phase(), &key) else {
                    return;
                };
                // Keep space/backspace from scrolling or navigating
                if matches!(key.as_str(), " " | "Backspace" | "ArrowUp") {
                    event.prevent_default();
                }
                a.input(cmd);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Stop the loop when the page goes away or is hidden, follow window resizes
    fn setup_lifecycle(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Page hide (navigation, bfcache) - cancel the pending callback
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PageTransitionEvent| {
                let mut a = app.borrow_mut();
                a.driver.stop();
                a.cancel_frame();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                // At most one pending callback, so the loop never runs twice per refresh
                let restart = {
                    let mut a = app.borrow_mut();
                    if hidden {
                        a.driver.stop();
                        a.cancel_frame();
                        false
                    } else {
                        if !a.driver.is_running() {
                            a.driver.start();
                        }
                        a.raf_handle.is_none()
                    }
                };
                if restart {
                    request_animation_frame(app.clone());
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window resize / rotation
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let app_clone = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(app_clone, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        app.borrow_mut().raf_handle = handle;
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.raf_handle = None;
            a.frame(time)
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use sky_hopper::consts::*;
    use sky_hopper::persistence::Storage;
    use sky_hopper::sim::{Difficulty, SimState};
    use sky_hopper::{Command, Game, GamePhase};

    /// Display refresh period the autopilot pretends to run at
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up on a run after this many frames (five minutes)
    pub const MAX_FRAMES: u32 = 60 * 300;

    pub const PLAYER: &str = "Autopilot";

    /// Jump when falling below the next gap's lower lip
    fn wants_jump(sim: &SimState) -> bool {
        let target = sim
            .obstacles
            .iter()
            .find(|ob| ob.right() >= BODY_X)
            .map(|ob| ob.gap_bottom() - 10.0)
            .unwrap_or(PLAYFIELD_HEIGHT / 2.0 + 40.0);
        sim.body.vel >= 0.0 && sim.body.bottom() > target
    }

    /// Get from the menus to the start screen with the autopilot profile active
    pub fn enter_as_player<S: Storage>(game: &mut Game<S>, now: &mut f64) {
        let existing = game.store().list().iter().position(|p| p.name == PLAYER);
        match existing {
            Some(index) => {
                game.handle_input(Command::OpenSelectProfile);
                game.handle_input(Command::ChooseProfile(index));
            }
            None => {
                game.handle_input(Command::OpenCreateProfile);
                for c in PLAYER.chars() {
                    game.handle_input(Command::TypeChar(c));
                }
                game.handle_input(Command::SubmitName);
            }
        }
        *now += FRAME_MS;
        game.tick(*now);
    }

    /// Play one session; returns the final score
    pub fn play<S: Storage>(game: &mut Game<S>, difficulty: Difficulty, now: &mut f64) -> u32 {
        game.handle_input(Command::ChooseDifficulty(difficulty));
        for _ in 0..MAX_FRAMES {
            if game.phase().is_playing() && wants_jump(game.sim()) {
                game.handle_input(Command::Press);
            }
            *now += FRAME_MS;
            game.tick(*now);
            if let GamePhase::GameOver { final_score, .. } = game.phase() {
                return *final_score;
            }
        }
        log::info!("Run capped after {} frames", MAX_FRAMES);
        game.sim().score
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use sky_hopper::persistence::{FileStorage, MemoryStorage, Storage};
    use sky_hopper::sim::Difficulty;
    use sky_hopper::{Command, Game, ProfileStore};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Sky Hopper (native) starting...");
    log::info!("Interactive play needs the web build - run with `trunk serve`");

    fn run<S: Storage>(storage: S) {
        let mut game = Game::new(0x5EED, ProfileStore::load(storage), true);
        let mut now = 0.0;
        autopilot::enter_as_player(&mut game, &mut now);

        for difficulty in Difficulty::ALL {
            let score = autopilot::play(&mut game, difficulty, &mut now);
            log::info!("{}: scored {}", difficulty.as_str(), score);
            // Back through the menus for the next difficulty
            game.handle_input(Command::MainMenu);
            autopilot::enter_as_player(&mut game, &mut now);
        }

        for (rank, profile) in game.store().leaderboard().iter().enumerate() {
            log::info!("#{} {} {}", rank + 1, profile.name, profile.high_score);
        }
    }

    // Optional directory for persistent profiles
    match std::env::args().nth(1) {
        Some(dir) => run(FileStorage::new(dir)),
        None => run(MemoryStorage::new()),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
