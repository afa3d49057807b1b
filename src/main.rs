//! Spin Wheel entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};

    use spin_wheel::audio::{AudioManager, SoundEffect};
    use spin_wheel::history::format_relative;
    use spin_wheel::persistence::BrowserStore;
    use spin_wheel::presenter::{DomPresenter, PresenterAction};
    use spin_wheel::renderer::{CanvasSurface, WheelLayout, draw_wheel};
    use spin_wheel::{EntryStore, FrameEvent, StoreError, WheelApp};

    /// App instance holding all state
    struct App {
        wheel: WheelApp<BrowserStore>,
        document: Document,
        surface: CanvasSurface,
        layout: WheelLayout,
        presenter: DomPresenter,
        audio: AudioManager,
        /// An animation frame callback is scheduled
        frame_pending: bool,
    }

    impl App {
        fn redraw(&mut self) {
            draw_wheel(
                &mut self.surface,
                &self.layout,
                self.wheel.rotation(),
                self.wheel.entries(),
            );
        }

        /// Refit the canvas after a viewport change
        fn resize(&mut self) {
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let (w, h) = self.surface.resize_to_display(dpr);
            self.layout = WheelLayout::from_viewport(w, h);
            self.redraw();
        }

        /// Put the stored list back into the text box (after shuffle/sort/remove)
        fn refresh_textarea(&self) {
            if let Some(el) = self.entries_input() {
                el.set_value(&self.wheel.entry_store().to_text());
            }
        }

        fn entries_input(&self) -> Option<HtmlTextAreaElement> {
            self.document
                .get_element_by_id("entries")
                .and_then(|e| e.dyn_into::<HtmlTextAreaElement>().ok())
        }

        /// Update counters, buttons, modal and history in the DOM
        fn update_dom(&mut self) {
            if let Some(el) = self.document.get_element_by_id("entry-count") {
                el.set_text_content(Some(&self.wheel.entries().len().to_string()));
            }

            if let Some(btn) = self.document.get_element_by_id("spin-btn") {
                if self.wheel.can_spin() {
                    let _ = btn.remove_attribute("disabled");
                } else {
                    let _ = btn.set_attribute("disabled", "");
                }
            }

            if let Some(el) = self.entries_input() {
                el.set_read_only(self.wheel.engine().is_busy());
            }

            self.presenter.sync(self.wheel.presenter());
            self.update_history();
        }

        fn update_history(&self) {
            let Some(list) = self.document.get_element_by_id("history") else {
                return;
            };
            list.set_inner_html("");
            let now = js_sys::Date::now();
            for record in &self.wheel.history().records {
                if let Ok(li) = self.document.create_element("li") {
                    li.set_text_content(Some(&format!(
                        "{} · {}",
                        record.name,
                        format_relative(now, record.timestamp)
                    )));
                    let _ = list.append_child(&li);
                }
            }
        }

        fn input(&self, id: &str) -> Option<HtmlInputElement> {
            self.document
                .get_element_by_id(id)
                .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        }

        /// Show the current settings in the settings controls
        fn refresh_settings_controls(&self) {
            let settings = self.wheel.settings();
            if let Some(el) = self.input("sound-toggle") {
                el.set_checked(settings.sound);
            }
            if let Some(el) = self.input("confetti-toggle") {
                el.set_checked(settings.confetti);
            }
            if let Some(el) = self.input("volume") {
                el.set_value(&format!("{}", (settings.volume * 100.0).round()));
            }
        }

        /// Read the settings controls, then save and apply them
        fn settings_changed(&mut self) {
            let mut settings = self.wheel.settings().clone();
            if let Some(el) = self.input("sound-toggle") {
                settings.sound = el.checked();
            }
            if let Some(el) = self.input("confetti-toggle") {
                settings.confetti = el.checked();
            }
            if let Some(el) = self.input("volume") {
                if let Ok(percent) = el.value().parse::<f32>() {
                    settings.volume = percent / 100.0;
                }
            }
            self.wheel.update_settings(settings);
            self.audio.set_volume(self.wheel.settings().effective_volume());
        }

        fn report(&self, result: Result<Option<usize>, StoreError>) {
            match result {
                Ok(Some(count)) => log::info!("{} entries", count),
                Ok(None) => {}
                Err(e) => log::error!("Failed to save entries: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Spin Wheel starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("wheel")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let surface = CanvasSurface::new(canvas).expect("no 2D context");

        let store = BrowserStore::open();
        let seed = js_sys::Date::now() as u64;
        let wheel = match WheelApp::new(store.clone(), seed) {
            Ok(wheel) => wheel,
            Err(e) => {
                log::error!("Saved entries unreadable ({}), starting from defaults", e);
                WheelApp::with_entries(EntryStore::with_defaults(store.clone()), store, seed)
            }
        };

        let audio = AudioManager::new(wheel.settings().effective_volume());
        let presenter = DomPresenter::new(&document);

        let app = Rc::new(RefCell::new(App {
            wheel,
            document: document.clone(),
            surface,
            layout: WheelLayout::from_viewport(1.0, 1.0),
            presenter,
            audio,
            frame_pending: false,
        }));

        {
            let mut a = app.borrow_mut();
            a.refresh_textarea();
            a.refresh_settings_controls();
            a.resize();
            a.update_dom();
        }

        setup_entry_handlers(&document, app.clone());
        setup_modal_buttons(&document, app.clone());
        setup_settings(&document, app.clone());
        setup_keyboard(app.clone());
        setup_resize(app.clone());

        log::info!("Spin Wheel running!");
    }

    /// Attach a click handler to the element with `id`, if present
    fn on_click(document: &Document, id: &str, app: Rc<RefCell<App>>, f: fn(&Rc<RefCell<App>>)) {
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("#{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            f(&app);
        });
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_entry_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // Text box edits replace the whole list
        if let Some(input) = document.get_element_by_id("entries") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let Some(text) = a.entries_input().map(|el| el.value()) else {
                    return;
                };
                let result = a.wheel.set_entries_text(&text);
                a.report(result);
                a.redraw();
                a.update_dom();
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click(document, "spin-btn", app.clone(), start_spin);

        on_click(document, "shuffle-btn", app.clone(), |app| {
            let mut a = app.borrow_mut();
            let result = a.wheel.shuffle();
            a.report(result);
            a.refresh_textarea();
            a.redraw();
            a.update_dom();
        });

        on_click(document, "sort-btn", app, |app| {
            let mut a = app.borrow_mut();
            let result = a.wheel.sort();
            a.report(result);
            a.refresh_textarea();
            a.redraw();
            a.update_dom();
        });
    }

    fn setup_modal_buttons(document: &Document, app: Rc<RefCell<App>>) {
        on_click(document, "close-btn", app.clone(), |app| {
            let mut a = app.borrow_mut();
            if let Err(e) = a.wheel.apply(PresenterAction::Dismiss) {
                log::error!("{}", e);
            }
            a.update_dom();
        });

        on_click(document, "remove-btn", app.clone(), |app| {
            let mut a = app.borrow_mut();
            let result = a.wheel.remove_winner();
            if matches!(result, Ok(Some(_))) {
                a.audio.play(SoundEffect::Remove);
            }
            a.report(result);
            a.refresh_textarea();
            a.redraw();
            a.update_dom();
        });

        on_click(document, "spin-again-btn", app, start_spin);
    }

    fn setup_settings(document: &Document, app: Rc<RefCell<App>>) {
        for id in ["sound-toggle", "confetti-toggle", "volume"] {
            let Some(el) = document.get_element_by_id(id) else {
                log::warn!("#{} not found", id);
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().settings_changed();
            });
            let _ = el.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        on_click(document, "clear-history-btn", app, |app| {
            let mut a = app.borrow_mut();
            a.wheel.clear_history();
            a.update_dom();
        });
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Let the text box have its own keys
            let typing = app
                .borrow()
                .document
                .active_element()
                .is_some_and(|el| el.id() == "entries");
            if typing {
                return;
            }
            match event.key().as_str() {
                " " | "Enter" => {
                    event.prevent_default();
                    start_spin(&app);
                }
                "Escape" => {
                    let mut a = app.borrow_mut();
                    a.wheel.dismiss();
                    a.update_dom();
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn start_spin(app: &Rc<RefCell<App>>) {
        let started = {
            let mut a = app.borrow_mut();
            let started = a.wheel.spin();
            a.update_dom();
            started
        };
        if started {
            request_animation_frame(app.clone());
        }
    }

    /// Schedule one frame; never more than one pending
    fn request_animation_frame(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.frame_pending {
                return;
            }
            a.frame_pending = true;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            frame_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>) {
        let keep_going = {
            let mut a = app.borrow_mut();
            a.frame_pending = false;

            match a.wheel.frame(js_sys::Date::now()) {
                FrameEvent::Idle => false,
                FrameEvent::Spinning { crossed } => {
                    a.redraw();
                    if crossed > 0 {
                        a.audio.play(SoundEffect::Tick);
                    }
                    true
                }
                FrameEvent::Winner { name, .. } => {
                    a.redraw();
                    a.audio.play(SoundEffect::Winner);
                    a.update_dom();
                    log::info!("The wheel picked {}", name);
                    false
                }
            }
        };

        if keep_going {
            request_animation_frame(app);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spin Wheel (native) starting...");
    log::info!("Native mode runs a headless spin - use `trunk serve` for the web version");

    if let Err(e) = headless_spin() {
        log::error!("Headless spin failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Spin the default wheel once without a display
#[cfg(not(target_arch = "wasm32"))]
fn headless_spin() -> Result<(), spin_wheel::StoreError> {
    use spin_wheel::renderer::{RecordingSurface, WheelLayout, draw_wheel};
    use spin_wheel::{FrameEvent, MemoryStore, WheelApp};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let mut app = WheelApp::new(MemoryStore::new(), seed)?;

    if !app.spin() {
        log::warn!("Not enough entries to spin");
        return Ok(());
    }

    let mut frames = 0u32;
    let winner = loop {
        frames += 1;
        if let FrameEvent::Winner { name, .. } = app.frame(frames as f64 * 1000.0 / 60.0) {
            break name;
        }
    };

    let mut surface = RecordingSurface::new();
    draw_wheel(
        &mut surface,
        &WheelLayout::from_viewport(800.0, 800.0),
        app.rotation(),
        app.entries(),
    );

    log::info!(
        "Stopped after {} frames at {:.3} rad ({} draw calls)",
        frames,
        app.rotation(),
        surface.commands.len()
    );
    println!("Winner: {}", winner);
    Ok(())
}
