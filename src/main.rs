//! Leila's Game entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, DeviceOrientationEvent, HtmlCanvasElement, HtmlImageElement,
        KeyboardEvent, Response, TouchEvent,
    };

    use leilas_game::{QualityPreset, Tuning, cap_frame_dt, query_param};
    use leilas_game::render::{DrawCommand, Frame, build_frame};
    use leilas_game::sim::level::{BUNDLED_LEVEL, pick_level_path};
    use leilas_game::sim::manifest::find_character;
    use leilas_game::sim::{InputState, Registry, Session, tick};

    const DEFAULT_HERO: &str = "fertle";

    /// Images by asset path. Unloaded entries draw their fallback.
    #[derive(Default)]
    struct ImageCache {
        images: HashMap<String, HtmlImageElement>,
    }

    impl ImageCache {
        fn ready(&mut self, path: &str) -> Option<&HtmlImageElement> {
            if !self.images.contains_key(path) {
                let img = HtmlImageElement::new().ok()?;
                img.set_src(path);
                self.images.insert(path.to_string(), img);
            }
            self.images
                .get(path)
                .filter(|img| img.complete() && img.natural_width() > 0)
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        input: InputState,
        ctx: CanvasRenderingContext2d,
        canvas: HtmlCanvasElement,
        images: ImageCache,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, dt: f32) {
            let (w, h) = (self.canvas.width() as f32, self.canvas.height() as f32);
            self.session.set_viewport(w, h);
            let input = self.input.snapshot();
            if let Some(transition) = tick(&mut self.session, &input, dt) {
                log::info!("transition: {:?}", transition);
                self.input.release_all();
            }
        }

        fn render(&mut self) {
            let frame = build_frame(&self.session);
            let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
            if let Err(e) = paint(&self.ctx, &frame, &mut self.images, w, h) {
                log::error!("paint failed: {:?}", e);
            }
        }

        /// Viewport-relative position of every active touch
        fn touch_points(&self, event: &TouchEvent) -> Vec<Vec2> {
            let rect = self.canvas.get_bounding_client_rect();
            let list = event.touches();
            (0..list.length())
                .filter_map(|i| list.get(i))
                .map(|t| {
                    Vec2::new(
                        (t.client_x() as f64 - rect.left()) as f32,
                        (t.client_y() as f64 - rect.top()) as f32,
                    )
                })
                .collect()
        }
    }

    fn paint(
        ctx: &CanvasRenderingContext2d,
        frame: &Frame,
        images: &mut ImageCache,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        match frame.background {
            Some(bg) => {
                ctx.set_fill_style_str(&bg.to_css());
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            None => ctx.clear_rect(0.0, 0.0, width, height),
        }

        ctx.save();
        ctx.translate(-frame.camera.x as f64, -frame.camera.y as f64)?;
        for cmd in &frame.world {
            draw(ctx, cmd, images)?;
        }
        ctx.restore();

        for cmd in &frame.hud {
            draw(ctx, cmd, images)?;
        }
        Ok(())
    }

    fn draw(
        ctx: &CanvasRenderingContext2d,
        cmd: &DrawCommand,
        images: &mut ImageCache,
    ) -> Result<(), JsValue> {
        match cmd {
            DrawCommand::Fill { rect, color } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
            }
            DrawCommand::Tile {
                rect,
                image,
                fallback,
            } => {
                let (x, y, w, h) = (rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
                match images.ready(image) {
                    Some(img) => ctx.draw_image_with_html_image_element_and_dw_and_dh(img, x, y, w, h)?,
                    None => {
                        ctx.set_fill_style_str(&fallback.to_css());
                        ctx.fill_rect(x, y, w, h);
                    }
                }
            }
            DrawCommand::Sprite {
                image,
                rect,
                flip,
                lighten,
            } => {
                let (w, h) = (rect.w as f64, rect.h as f64);
                ctx.save();
                ctx.translate(rect.x as f64 + w / 2.0, rect.y as f64 + h)?;
                if *flip {
                    ctx.scale(-1.0, 1.0)?;
                }
                if *lighten {
                    ctx.set_global_composite_operation("lighter")?;
                }
                match images.ready(image) {
                    Some(img) => {
                        ctx.draw_image_with_html_image_element_and_dw_and_dh(img, -w / 2.0, -h, w, h)?
                    }
                    None => {
                        ctx.set_fill_style_str(if *lighten { "#ffffff" } else { "#ff00ff" });
                        ctx.fill_rect(-w / 2.0, -h, w, h);
                    }
                }
                ctx.restore();
            }
            DrawCommand::Pulse { image, rect, scale } => {
                let (w, h) = (rect.w as f64, rect.h as f64);
                ctx.save();
                ctx.translate(rect.x as f64 + w / 2.0, rect.y as f64 + h / 2.0)?;
                ctx.scale(*scale as f64, *scale as f64)?;
                match images.ready(image) {
                    Some(img) => ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        -w / 2.0,
                        -h / 2.0,
                        w,
                        h,
                    )?,
                    None => {
                        ctx.set_fill_style_str("#ffd700");
                        ctx.begin_path();
                        ctx.arc(0.0, 0.0, w / 2.0, 0.0, std::f64::consts::TAU)?;
                        ctx.fill();
                    }
                }
                ctx.restore();
            }
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.begin_path();
                ctx.arc(
                    center.x as f64,
                    center.y as f64,
                    radius.max(0.0) as f64,
                    0.0,
                    std::f64::consts::TAU,
                )?;
                ctx.fill();
            }
            DrawCommand::Text {
                text,
                pos,
                size,
                color,
            } => {
                ctx.set_font(&format!("{}px Poppins, sans-serif", size));
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_text(text, pos.x as f64, pos.y as f64)?;
            }
        }
        Ok(())
    }

    /// `?hero=<id>&quality=<low|medium|high>` from the page URL
    fn settings_from_query(window: &web_sys::Window) -> (Option<String>, Tuning) {
        let search = window.location().search().unwrap_or_default();
        let hero = query_param(&search, "hero").map(str::to_string);
        let mut tuning = Tuning::default();
        if let Some(quality) = query_param(&search, "quality").and_then(QualityPreset::parse) {
            tuning.quality = quality;
        }
        (hero, tuning)
    }

    async fn fetch_text(window: &web_sys::Window, path: &str) -> Result<String, JsValue> {
        let resp: Response = JsFuture::from(window.fetch_with_str(path)).await?.dyn_into()?;
        if !resp.ok() {
            return Err(JsValue::from_str(&format!("HTTP {} for {}", resp.status(), path)));
        }
        JsFuture::from(resp.text()?)
            .await?
            .as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }
        log::info!("Leila's Game starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let (hero, tuning) = settings_from_query(&window);
        let hero_id = hero.unwrap_or_else(|| DEFAULT_HERO.to_string());
        let character = find_character(&hero_id)
            .or_else(|| find_character(DEFAULT_HERO))
            .ok_or("no playable character")?;
        let habitat = character.habitat;

        let seed = js_sys::Date::now() as u64;
        let mut rng = Pcg32::seed_from_u64(seed);
        let path = pick_level_path(habitat, &mut rng);
        let registry = Registry::builtin();

        let fetched = match fetch_text(&window, &path).await {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("level fetch failed ({:?}), using bundled level", e);
                None
            }
        };
        let session = match fetched.as_deref().map(|json| {
            Session::from_json(json, character.clone(), &registry, tuning.clone(), seed)
        }) {
            Some(Ok(session)) => session,
            Some(Err(e)) => {
                log::warn!("{} is invalid ({}), using bundled level", path, e);
                bundled_session(character, &registry, tuning, seed)?
            }
            None => bundled_session(character, &registry, tuning, seed)?,
        };
        log::info!(
            "playing {} as {} ({} quality)",
            path,
            hero_id,
            session.tuning.quality.as_str()
        );

        let game = Rc::new(RefCell::new(Game {
            input: InputState::new(habitat),
            session,
            ctx,
            canvas: canvas.clone(),
            images: ImageCache::default(),
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_auto_release(game.clone());
        request_animation_frame(game);
        Ok(())
    }

    fn bundled_session(
        character: leilas_game::sim::CharacterManifest,
        registry: &Registry,
        tuning: Tuning,
        seed: u64,
    ) -> Result<Session, JsValue> {
        Session::from_json(BUNDLED_LEVEL, character, registry, tuning, seed)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        for (event_name, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if matches!(
                    code.as_str(),
                    "ArrowLeft" | "ArrowRight" | "ArrowUp" | "ArrowDown" | "Space"
                ) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                if g.input.key(&code, down) {
                    g.session.attack();
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: every change re-reads the full touch list
        for event_name in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let points = g.touch_points(&event);
                let viewport = g.session.viewport;
                if g.input.touches(&points, viewport) {
                    g.session.attack();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tilt
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceOrientationEvent| {
                let beta = event.beta().unwrap_or(0.0) as f32;
                let gamma = event.gamma().unwrap_or(0.0) as f32;
                game.borrow_mut().input.tilt(beta, gamma);
            });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    /// Drop held keys when the page loses focus so the hero doesn't keep walking
    fn setup_auto_release(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().input.release_all();
            log::debug!("input released (window blur)");
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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

            let max_dt = g.session.tuning.max_frame_dt;
            let dt = if g.last_time > 0.0 {
                cap_frame_dt(((time - g.last_time) / 1000.0) as f32, max_dt)
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Leila's Game (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    if let Err(e) = headless_demo() {
        log::error!("demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play the bundled level with scripted input: run right, hop every second,
/// punch twice a second.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() -> Result<(), leilas_game::sim::LevelError> {
    use leilas_game::Tuning;
    use leilas_game::cap_frame_dt;
    use leilas_game::sim::level::BUNDLED_LEVEL;
    use leilas_game::sim::manifest::find_character;
    use leilas_game::sim::{InputState, Registry, Session, tick};

    const FRAMES: u32 = 60 * 120;

    let Some(character) = find_character("fertle") else {
        log::error!("default hero missing from roster");
        return Ok(());
    };
    let tuning = Tuning::default();
    let max_dt = tuning.max_frame_dt;
    let mut input = InputState::new(character.habitat);
    let mut session = Session::from_json(BUNDLED_LEVEL, character, &Registry::builtin(), tuning, 42)?;

    input.key("ArrowRight", true);
    for frame in 0..FRAMES {
        input.key("Space", frame % 60 < 10);
        if input.key("KeyB", frame % 30 == 0) {
            session.attack();
        }

        let dt = cap_frame_dt(1.0 / 60.0, max_dt);
        if let Some(transition) = tick(&mut session, &input.snapshot(), dt) {
            log::info!("frame {}: {:?}", frame, transition);
            break;
        }
    }

    println!(
        "coins {}/{}  score {}  lives {}  x {:.0}  boss {}",
        session.coins_collected,
        session.coins_total,
        session.score,
        session.player.lives().max(0),
        session.player.body.pos.x,
        if session.boss_spawned() { "spawned" } else { "waiting" },
    );
    Ok(())
}
