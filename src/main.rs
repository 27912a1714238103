//! Rose Quest entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use rose_quest::consts::*;
    use rose_quest::renderer::RenderState;
    use rose_quest::{Control, FrameDriver, GameObserver, Settings};

    /// Mirrors game notifications into the DOM HUD
    struct DomHud {
        document: Document,
        show_progress: bool,
    }

    impl DomHud {
        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }
    }

    impl GameObserver for DomHud {
        fn on_score_changed(&mut self, score: u32) {
            self.set_text("#hud-score .hud-value", &score.to_string());
        }

        fn on_lives_changed(&mut self, lives: u8) {
            self.set_text("#hud-lives .hud-value", &lives.to_string());
        }

        fn on_progress(&mut self, percent: f32) {
            if !self.show_progress {
                return;
            }
            let fill = self
                .document
                .get_element_by_id("hud-progress-fill")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(fill) = fill {
                let _ = fill.style().set_property("width", &format!("{:.1}%", percent));
            }
        }

        fn on_win(&mut self, final_score: u32) {
            self.set_text("#final-score", &final_score.to_string());
            self.set_hidden("win-screen", false);
        }
    }

    /// Game instance shared between DOM callbacks
    struct App {
        driver: FrameDriver<DomHud>,
        last_time: f64,
        /// Pending requestAnimationFrame handle
        frame_request: Option<i32>,
    }

    type SharedApp = Rc<RefCell<App>>;

    fn js_err(msg: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&msg.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rose Quest starting...");

        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| js_err("no canvas"))?
            .dyn_into()?;

        // Backing store at device resolution, logical size stays 900x500
        let dpr = window.device_pixel_ratio();
        let width = (SURFACE_WIDTH as f64 * dpr) as u32;
        let height = (SURFACE_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let hud = DomHud {
            document: document.clone(),
            show_progress: settings.show_progress,
        };
        if !settings.show_progress {
            hud.set_hidden("hud-progress", true);
        }

        let seed = js_sys::Date::now() as u64;
        let mut driver = FrameDriver::new(seed, settings, hud);
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(js_err)?;
        driver.attach_surface(Box::new(render_state));

        // Idle frame behind the start screen
        driver.frame(0.0);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let app = Rc::new(RefCell::new(App {
            driver,
            last_time: 0.0,
            frame_request: None,
        }));

        setup_keyboard(app.clone())?;
        setup_focus_loss(app.clone(), &document)?;
        setup_button(&document, "start-btn", app.clone(), start_game)?;
        setup_button(&document, "restart-btn", app.clone(), restart_game)?;

        log::info!("Rose Quest ready");
        Ok(())
    }

    fn setup_keyboard(app: SharedApp) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().driver.key_down(&event.key()) {
                    // Keep space and arrows from scrolling the page
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().driver.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Release held controls when the page loses focus so keys never stick
    fn setup_focus_loss(app: SharedApp, document: &Document) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                release_all(&app);
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    release_all(&app);
                    // Resync the clock so the hidden time is not simulated
                    app.borrow_mut().last_time = 0.0;
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn release_all(app: &SharedApp) {
        let mut app = app.borrow_mut();
        for control in [Control::Left, Control::Right, Control::Jump] {
            app.driver.release(control);
        }
    }

    fn setup_button(
        document: &Document,
        id: &str,
        app: SharedApp,
        action: fn(&SharedApp),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{} button", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            action(&app);
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn start_game(app: &SharedApp) {
        {
            let mut a = app.borrow_mut();
            if !a.driver.start() {
                return;
            }
            a.last_time = 0.0;
        }
        set_hidden("start-screen", true);
        set_hidden("hud", false);
        request_animation_frame(app.clone());
    }

    fn restart_game(app: &SharedApp) {
        {
            let mut a = app.borrow_mut();
            cancel_animation_frame(&mut a);
            a.driver.stop();
            a.driver.frame(0.0);
        }
        set_hidden("win-screen", true);
        start_game(app);
    }

    fn request_animation_frame(app: SharedApp) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let callback = {
            let app = app.clone();
            Closure::once_into_js(move |time: f64| game_loop(app, time))
        };
        match window.request_animation_frame(callback.unchecked_ref()) {
            Ok(id) => app.borrow_mut().frame_request = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_animation_frame(app: &mut App) {
        if let Some(id) = app.frame_request.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    fn game_loop(app: SharedApp, time: f64) {
        let keep_running = {
            let mut a = app.borrow_mut();
            a.frame_request = None;

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.driver.frame(dt);
            a.driver.is_running()
        };

        // The loop ends on a win; restart schedules a new one
        if keep_running {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rose_quest::consts::SIM_DT;
    use rose_quest::sim::GamePhase;
    use rose_quest::{Control, FrameDriver, GameObserver, Settings};

    /// Seconds of play in the scripted run
    const RUN_SECONDS: u32 = 60;

    /// Logs every notification
    #[derive(Debug, Default)]
    struct LogObserver {
        final_score: Option<u32>,
    }

    impl GameObserver for LogObserver {
        fn on_score_changed(&mut self, score: u32) {
            log::info!("Score: {}", score);
        }

        fn on_lives_changed(&mut self, lives: u8) {
            log::info!("Lives: {}", lives);
        }

        fn on_progress(&mut self, percent: f32) {
            log::debug!("Progress: {:.1}%", percent);
        }

        fn on_win(&mut self, final_score: u32) {
            log::info!("Won with score {}", final_score);
            self.final_score = Some(final_score);
        }
    }

    /// Run right the whole time, jumping in regular bursts
    pub fn run() {
        let settings = Settings::load();
        let mut driver = FrameDriver::new(42, settings, LogObserver::default());
        driver.start();
        driver.press(Control::Right);

        let frames = RUN_SECONDS * 60;
        for frame in 0..frames {
            if frame % 40 == 0 {
                driver.press(Control::Jump);
            } else if frame % 40 == 12 {
                driver.release(Control::Jump);
            }
            driver.frame(SIM_DT);
            if driver.state().phase == GamePhase::Won {
                break;
            }
        }

        let state = driver.state();
        log::info!(
            "Scripted run finished after {} ticks: phase {:?}, score {}, lives {}, progress {:.1}%, x {:.0}",
            state.time_ticks,
            state.phase,
            state.score,
            state.lives,
            state.progress,
            state.player.pos.x
        );
        if let Some(score) = driver.observer().final_score {
            log::info!("Final score: {}", score);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rose Quest (native) starting...");
    log::info!("Native mode runs a headless scripted session - run with `trunk serve` for the web version");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
