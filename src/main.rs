//! Flap Emonad entry point
//!
//! The browser build runs the game from `requestAnimationFrame`. The native
//! build plays one headless round on autopilot and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use flap_emonad::audio::web::WebAudioOutput;
    use flap_emonad::audio::{Sequencer, SoundCue, TrackId, route_events};
    use flap_emonad::render::FramePlan;
    use flap_emonad::render::canvas::CanvasPresenter;
    use flap_emonad::sim::{FrameClock, GameEvent, GamePhase, GameState, TickInput, tick};
    use flap_emonad::{HighScores, Settings, Tuning};

    /// Leaderboard rows shown on the start screen
    const TOP_SCORES_PREVIEW: usize = 3;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        settings: Settings,
        high_scores: HighScores,
        sequencer: Sequencer<WebAudioOutput>,
        presenter: Option<CanvasPresenter>,
        /// The first gesture unlocks audio and starts the menu theme
        entered: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let high_scores = HighScores::load();
            let state = GameState::new(seed, Tuning::default())
                .with_epoch(js_sys::Date::now())
                .with_best_score(high_scores.best().unwrap_or(0));
            let sequencer = Sequencer::new(WebAudioOutput::new(settings.to_mix()));
            Self {
                state,
                clock: FrameClock::new(),
                input: TickInput::default(),
                settings,
                high_scores,
                sequencer,
                presenter: None,
                entered: false,
            }
        }

        /// Handle a tap/click/key press
        ///
        /// The very first gesture only dismisses the loading overlay.
        fn gesture(&mut self) {
            if !self.entered {
                self.enter();
                return;
            }
            self.input.tap = true;
        }

        fn enter(&mut self) {
            self.entered = true;
            self.sequencer.output().unlock();
            self.sequencer.play_track(TrackId::MENU);
            set_hidden("loading", true);
            log::info!("Audio unlocked, entering start screen");
        }

        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.sequencer.set_mix(&self.settings.to_mix());
            self.settings.save();
            if let Some(btn) = document().and_then(|d| d.get_element_by_id("sound-btn")) {
                btn.set_text_content(Some(if muted { "🔇" } else { "🔊" }));
            }
            log::info!("Muted: {muted}");
        }

        /// Advance one display frame
        fn update(&mut self, time: f64) {
            let delta = self.clock.advance(time);
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, delta);

            let events = self.state.drain_events();
            route_events(&events, &mut self.sequencer);
            for event in &events {
                match event {
                    GameEvent::RunFinished(run) => {
                        if self.high_scores.record(run).is_some() {
                            self.high_scores.save();
                        }
                    }
                    GameEvent::ShowScore { score } => {
                        set_text("final-score", &score.to_string());
                        let best = self.high_scores.best().unwrap_or(0).max(*score);
                        set_text("best-score", &best.to_string());
                    }
                    _ => {}
                }
            }
        }

        fn render(&self) {
            let Some(presenter) = &self.presenter else { return };
            let plan = FramePlan::build(&self.state, &self.settings);
            let top: Vec<u32> = self
                .high_scores
                .entries
                .iter()
                .take(TOP_SCORES_PREVIEW)
                .map(|e| e.score)
                .collect();
            if let Err(e) = presenter.draw(&plan, &self.state.effects, &top) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn update_hud(&self) {
            set_hidden("game-over", self.state.phase != GamePhase::GameOver);
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    /// Hand the sequencer's pending timers to `setTimeout`
    ///
    /// A woken timer may queue the next loop pass, so each callback
    /// reschedules.
    fn schedule_timers(game: &Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let timers = game.borrow_mut().sequencer.drain_timers();
        for request in timers {
            let game = game.clone();
            let closure = Closure::once(move || {
                let woke = game.borrow_mut().sequencer.wake(request);
                if woke {
                    schedule_timers(&game);
                }
            });
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                request.delay_ms as i32,
            );
            closure.forget();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flap Emonad starting...");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        match CanvasPresenter::new("canvas") {
            Ok(presenter) => game.borrow_mut().presenter = Some(presenter),
            Err(e) => log::error!("Canvas unavailable: {:?}", e),
        }

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_visibility(game.clone());

        request_animation_frame(game);
        log::info!("Flap Emonad running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(canvas) = document().and_then(|d| d.get_element_by_id("canvas")) else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.code().as_str() {
                    "Space" | "Enter" | "ArrowUp" => {
                        event.prevent_default();
                        game.borrow_mut().gesture();
                    }
                    "KeyM" => game.borrow_mut().toggle_mute(),
                    _ => return,
                }
                schedule_timers(&game);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().gesture();
                schedule_timers(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().gesture();
                schedule_timers(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        let buttons: [(&str, fn(&mut Game)); 4] = [
            ("play-btn", |g| {
                if !g.entered {
                    g.enter();
                }
            }),
            ("restart-btn", |g| g.input.restart = true),
            ("home-btn", |g| g.input.home = true),
            ("sound-btn", |g| {
                g.sequencer.play_cue(SoundCue::Click);
                g.toggle_mute();
            }),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the click from reaching the canvas as a tap
                event.stop_propagation();
                action(&mut game.borrow_mut());
                schedule_timers(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_visibility(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                // The first frame back would otherwise see the whole hidden interval
                game.borrow_mut().clock.resync();
                log::info!("Resumed, frame clock resynced");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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
        schedule_timers(&game);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| flap_emonad::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => flap_emonad::Tuning::default(),
    };

    log::info!("Flap Emonad (native) starting, seed {seed}");
    log::info!("Native mode runs a headless autopilot round - build for wasm32 to play");
    autopilot::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use flap_emonad::HighScores;
    use flap_emonad::Tuning;
    use flap_emonad::consts::TARGET_FRAME_MS;
    use flap_emonad::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Give up after two simulated minutes
    const MAX_FRAMES: usize = 60 * 120;
    /// Aim slightly below the middle of the gap; gravity pulls the player down
    /// between flaps
    const AIM: f32 = 0.6;

    /// Flap whenever the player sinks below the aim point of the next gap
    fn wants_flap(state: &GameState) -> bool {
        let player = &state.player;
        let center = player.center();
        let aim = state
            .razors
            .iter()
            .find(|r| r.right_edge() >= player.x)
            .map(|r| r.gap_y + state.tuning.razor_gap * AIM)
            .unwrap_or(flap_emonad::consts::GAME_HEIGHT / 2.0);
        center.y > aim && player.velocity >= 0.0
    }

    pub fn run(seed: u64, tuning: Tuning) {
        let mut state = GameState::new(seed, tuning);
        let mut high_scores = HighScores::new();
        let mut input = TickInput {
            start: true,
            ..TickInput::default()
        };

        for frame in 0..MAX_FRAMES {
            if state.phase == GamePhase::Playing {
                input.flap = wants_flap(&state);
            }
            tick(&mut state, &input, TARGET_FRAME_MS);
            input = TickInput::default();

            for event in state.drain_events() {
                match event {
                    GameEvent::Cue(cue) => log::debug!("frame {frame}: cue {cue:?}"),
                    GameEvent::PlayTrack(track) => log::debug!("frame {frame}: track {track:?}"),
                    GameEvent::StopMusic => log::debug!("frame {frame}: music stopped"),
                    GameEvent::ShowScore { score } => log::info!("Game over, score {score}"),
                    GameEvent::RunFinished(run) => {
                        high_scores.record(&run);
                    }
                }
            }

            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        match state.death_certificate() {
            Some(cert) => log::info!(
                "Run ended by {} with {} points",
                cert.death_type.as_str(),
                cert.final_score
            ),
            None => log::info!("Autopilot survived with {} points", state.score),
        }
        if let Some(best) = high_scores.best() {
            log::info!("Best score this session: {best}");
        }
    }
}
