//! Per-frame simulation tick
//!
//! Intents are applied first, then physics, razors and collisions for the
//! active phase, then cosmetic effects. Every increment is scaled by the
//! normalized frame delta so the game plays the same at any refresh rate.

use rand::Rng;

use super::collision::{Collision, Playfield, resolve_collision};
use super::state::{
    DeathCertificate, DeathType, GameEvent, GamePhase, GameState, Razor, ScoreSubmission,
};
use super::timing::time_scale;
use crate::audio::{SoundCue, TrackId};
use crate::consts::*;

/// Discrete player intents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Generic tap/click/space; meaning depends on the phase
    Tap,
    /// Flap (only while playing)
    Flap,
    /// Leave the start screen
    Start,
    /// Restart button on the game over screen
    Restart,
    /// Home button on the game over screen
    Home,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Tap,
        Intent::Flap,
        Intent::Start,
        Intent::Restart,
        Intent::Home,
    ];
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub tap: bool,
    pub flap: bool,
    pub start: bool,
    pub restart: bool,
    pub home: bool,
}

impl TickInput {
    /// Intents raised this tick, in the order they are applied
    pub fn intents(&self) -> impl Iterator<Item = Intent> {
        [
            (self.home, Intent::Home),
            (self.restart, Intent::Restart),
            (self.start, Intent::Start),
            (self.flap, Intent::Flap),
            (self.tap, Intent::Tap),
        ]
        .into_iter()
        .filter_map(|(set, intent)| set.then_some(intent))
    }
}

/// Advance the game by one frame of `delta_ms` normalized milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, delta_ms: f32) {
    for intent in input.intents() {
        state.handle(intent);
    }

    let effective_ms = state.effects.begin_frame(delta_ms, state.phase);

    match state.phase {
        GamePhase::Playing => {
            state.update_player(delta_ms);
            let center = state.player.center();
            state.effects.trail.record(center, state.player.rotation);
            state.update_razors(delta_ms);
            state.check_collisions();
        }
        GamePhase::Dying => state.update_dying(effective_ms),
        GamePhase::Ready | GamePhase::GameOver => {}
    }

    state.effects.update(delta_ms, effective_ms, state.phase);
    state.elapsed_ms += delta_ms as f64;
    state.update_game_over_music(delta_ms);
}

impl GameState {
    /// Apply an intent. Returns false when the current phase ignores it.
    pub fn handle(&mut self, intent: Intent) -> bool {
        match (self.phase, intent) {
            (GamePhase::Ready, Intent::Tap | Intent::Start) => {
                self.start_game();
                true
            }
            (GamePhase::Playing, Intent::Tap | Intent::Flap) => {
                self.flap();
                true
            }
            (GamePhase::GameOver, Intent::Tap) => {
                self.reset_game();
                true
            }
            (GamePhase::GameOver, Intent::Restart) => {
                self.emit(GameEvent::Cue(SoundCue::Click));
                self.reset_game();
                true
            }
            (GamePhase::GameOver, Intent::Home) => {
                self.emit(GameEvent::Cue(SoundCue::Click));
                self.go_home();
                true
            }
            _ => false,
        }
    }

    /// READY → PLAYING with a zero score and a random gameplay track
    pub fn start_game(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        log::info!("Run started");
        self.phase = GamePhase::Playing;
        self.score = 0;
        // First razor spawns on the first tick
        self.spawn_timer = self.tuning.razor_spawn_interval_ms;
        self.run_started_at = self.now();
        self.certificate = None;
        self.effects.start_transition();

        let track = TrackId::GAMEPLAY[self.rng.random_range(0..TrackId::GAMEPLAY.len())];
        self.emit(GameEvent::PlayTrack(track));
    }

    /// Snap the player upward. Ignored outside PLAYING.
    pub fn flap(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.player.flap(&self.tuning);
        self.emit(GameEvent::Cue(SoundCue::Flap));
    }

    /// PLAYING → DYING, recording how the run ended
    ///
    /// The certificate is written once per run; calls outside PLAYING are
    /// ignored.
    pub fn die(&mut self, death_type: DeathType, killer: Option<Razor>) {
        if self.phase != GamePhase::Playing {
            return;
        }
        log::info!("Died: {} at score {}", death_type.as_str(), self.score);
        self.phase = GamePhase::Dying;
        self.player.start_death_animation();
        self.certificate = Some(DeathCertificate {
            killer_razor: killer,
            death_type,
            final_score: self.score,
            timestamp: self.now(),
        });
        self.effects.trigger_death();
        self.emit(GameEvent::StopMusic);
        self.emit(GameEvent::Cue(SoundCue::Death));
    }

    /// DYING → GAME_OVER
    pub(crate) fn show_game_over(&mut self) {
        log::info!("Game over with score {}", self.score);
        self.phase = GamePhase::GameOver;
        self.emit(GameEvent::ShowScore { score: self.score });
        self.emit(GameEvent::RunFinished(ScoreSubmission {
            score: self.score,
            started_at: self.run_started_at,
            ended_at: self.now(),
        }));
        if self.score > self.best_score {
            self.best_score = self.score;
            self.emit(GameEvent::Cue(SoundCue::HighScore));
        }
        self.game_over_music_timer = Some(self.tuning.game_over_music_delay_ms);
    }

    /// GAME_OVER → PLAYING with a fresh player and razor set
    pub fn reset_game(&mut self) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        self.clear_run();
        self.effects.reset();
        self.phase = GamePhase::Ready;
        self.start_game();
    }

    /// GAME_OVER → READY, back to the start screen with the menu theme
    pub fn go_home(&mut self) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        log::info!("Returning to start screen");
        self.clear_run();
        self.effects.reset();
        self.phase = GamePhase::Ready;
        self.emit(GameEvent::StopMusic);
        self.emit(GameEvent::PlayTrack(TrackId::MENU));
    }

    fn update_player(&mut self, delta_ms: f32) {
        let ts = time_scale(delta_ms);
        self.player.apply_gravity(ts, &self.tuning);
        self.player.update_rotation(ts, &self.tuning);
        self.player.advance_flap_animation(delta_ms, &self.tuning);
    }

    fn update_razors(&mut self, delta_ms: f32) {
        self.spawn_timer += delta_ms;
        if self.spawn_timer >= self.tuning.razor_spawn_interval_ms {
            self.spawn_razor();
            self.spawn_timer = 0.0;
        }

        let step = self.tuning.razor_speed * time_scale(delta_ms);
        let player_x = self.player.x;
        let mut passed = 0;
        for razor in &mut self.razors {
            razor.x -= step;
            if !razor.scored && razor.right_edge() < player_x {
                razor.scored = true;
                passed += 1;
            }
        }
        self.razors.retain(|r| !r.is_offscreen());

        for _ in 0..passed {
            self.score += 1;
            self.effects.spawn_score_burst();
            self.emit(GameEvent::Cue(SoundCue::Score));
        }
    }

    fn spawn_razor(&mut self) {
        let min = self.tuning.min_razor_y;
        let max = self.tuning.max_razor_y;
        let gap_y = min + self.rng.random::<f32>() * (max - min);
        let id = self.next_razor_id();
        log::debug!("Spawned razor {id} with gap at {gap_y:.0}");
        self.razors.push(Razor {
            id,
            x: GAME_WIDTH,
            gap_y,
            scored: false,
        });
    }

    fn check_collisions(&mut self) {
        let padding = self.tuning.hitbox_padding;
        let playfield = Playfield::default();
        let hitbox = self.player.hitbox(padding);

        // Clamp at the ceiling even when a blade is hit in the same frame
        if hitbox.top <= 0.0 {
            self.player.y = -padding;
            self.player.velocity = 0.0;
        }

        match resolve_collision(&hitbox, &self.razors, &playfield, &self.tuning) {
            Collision::None | Collision::Ceiling => {}
            Collision::Floor => {
                self.player.y = playfield.height - PLAYER_HEIGHT + padding;
                self.die(DeathType::Floor, None);
            }
            Collision::RazorTop(razor) => self.die(DeathType::RazorTop, Some(razor)),
            Collision::RazorBottom(razor) => self.die(DeathType::RazorBottom, Some(razor)),
        }
    }

    /// Fall in slow motion; game over needs both the landing and the last
    /// death frame
    fn update_dying(&mut self, delta_ms: f32) {
        let ts = time_scale(delta_ms);
        self.player.apply_gravity(ts, &self.tuning);
        self.player.update_rotation(ts, &self.tuning);
        self.player.advance_death_animation(delta_ms, &self.tuning);

        let floor_y = GAME_HEIGHT - PLAYER_HEIGHT;
        if self.player.y >= floor_y {
            self.player.y = floor_y;
            self.player.velocity = 0.0;
            if self.player.death_animation_complete {
                self.show_game_over();
            }
        }
    }

    fn update_game_over_music(&mut self, delta_ms: f32) {
        let Some(remaining) = self.game_over_music_timer else {
            return;
        };
        let remaining = remaining - delta_ms;
        if remaining <= 0.0 {
            self.game_over_music_timer = None;
            self.emit(GameEvent::PlayTrack(TrackId::GameOver));
        } else {
            self.game_over_music_timer = Some(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::trail::TRAIL_LENGTH;
    use crate::tuning::Tuning;

    const DT: f32 = TARGET_FRAME_MS;

    fn new_state() -> GameState {
        GameState::new(12345, Tuning::default())
    }

    fn state_in(phase: GamePhase) -> GameState {
        let mut state = new_state();
        if phase == GamePhase::Ready {
            return state;
        }
        state.start_game();
        if phase == GamePhase::Playing {
            return state;
        }
        state.die(DeathType::Floor, None);
        if phase == GamePhase::Dying {
            return state;
        }
        state.show_game_over();
        state
    }

    fn run_until(state: &mut GameState, phase: GamePhase, max_ticks: usize) {
        let input = TickInput::default();
        for _ in 0..max_ticks {
            if state.phase == phase {
                return;
            }
            tick(state, &input, DT);
        }
        assert_eq!(state.phase, phase, "not reached within {max_ticks} ticks");
    }

    fn count_cues(events: &[GameEvent], cue: SoundCue) -> usize {
        events
            .iter()
            .filter(|e| **e == GameEvent::Cue(cue))
            .count()
    }

    #[test]
    fn test_tap_starts_from_ready() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.razors.is_empty());

        let input = TickInput {
            tap: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert_eq!(state.phase, GamePhase::Playing);
        // Spawn timer was pre-seeded
        assert_eq!(state.razors.len(), 1);
        assert_eq!(state.razors[0].x, GAME_WIDTH - RAZOR_SPEED);

        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [GameEvent::PlayTrack(track)] if TrackId::GAMEPLAY.contains(track)
        ));
    }

    #[test]
    fn test_state_machine_completeness() {
        use GamePhase::*;
        let expected = [
            (Ready, [Playing, Ready, Playing, Ready, Ready]),
            (Playing, [Playing, Playing, Playing, Playing, Playing]),
            (Dying, [Dying, Dying, Dying, Dying, Dying]),
            (GameOver, [Playing, GameOver, GameOver, Playing, Ready]),
        ];
        for (from, targets) in expected {
            for (intent, to) in Intent::ALL.into_iter().zip(targets) {
                let mut state = state_in(from);
                state.handle(intent);
                assert_eq!(state.phase, to, "{from:?} + {intent:?}");
            }
        }
    }

    #[test]
    fn test_ignored_intents_are_noops() {
        let mut state = state_in(GamePhase::Dying);
        state.drain_events();
        let velocity = state.player.velocity;
        for intent in Intent::ALL {
            assert!(!state.handle(intent));
        }
        assert!(state.drain_events().is_empty());
        assert_eq!(state.player.velocity, velocity);

        let mut ready = new_state();
        ready.flap();
        assert_eq!(ready.player.velocity, 0.0);
        assert!(ready.drain_events().is_empty());
    }

    #[test]
    fn test_start_game_outside_ready_is_ignored() {
        for phase in [GamePhase::Playing, GamePhase::Dying, GamePhase::GameOver] {
            let mut state = state_in(phase);
            for _ in 0..5 {
                tick(&mut state, &TickInput::default(), DT);
            }
            state.score = 3;
            state.drain_events();
            let razors = state.razors.clone();
            let cert = state.death_certificate().cloned();

            state.start_game();
            assert_eq!(state.phase, phase);
            assert_eq!(state.score, 3, "{phase:?}");
            assert_eq!(state.razors, razors);
            assert_eq!(state.death_certificate().cloned(), cert);
            assert!(state.drain_events().is_empty(), "{phase:?}");
        }
    }

    #[test]
    fn test_reset_game_outside_game_over_is_ignored() {
        for phase in [GamePhase::Ready, GamePhase::Playing, GamePhase::Dying] {
            let mut state = state_in(phase);
            state.score = 2;
            state.drain_events();
            let cert = state.death_certificate().cloned();

            state.reset_game();
            assert_eq!(state.phase, phase);
            assert_eq!(state.score, 2, "{phase:?}");
            assert_eq!(state.death_certificate().cloned(), cert);
            assert!(state.drain_events().is_empty(), "{phase:?}");
        }

        // A razor death stays on record until the game-over screen
        let mut state = state_in(GamePhase::Playing);
        state.die(DeathType::RazorTop, None);
        state.reset_game();
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(
            state.death_certificate().map(|c| c.death_type),
            Some(DeathType::RazorTop)
        );
    }

    #[test]
    fn test_flap_emits_cue() {
        let mut state = state_in(GamePhase::Playing);
        state.drain_events();
        let input = TickInput {
            flap: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        let events = state.drain_events();
        assert_eq!(count_cues(&events, SoundCue::Flap), 1);
        // Flap set the velocity, then one tick of gravity
        assert_eq!(state.player.velocity, JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_fall_to_floor_scenario() {
        let mut state = state_in(GamePhase::Playing);
        run_until(&mut state, GamePhase::Dying, 600);

        let cert = state.death_certificate().cloned().unwrap();
        assert_eq!(cert.death_type, DeathType::Floor);
        assert!(cert.killer_razor.is_none());
        assert_eq!(cert.final_score, 0);
        assert_eq!(state.player.y, GAME_HEIGHT - PLAYER_HEIGHT + HITBOX_PADDING);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::StopMusic));
        assert_eq!(count_cues(&events, SoundCue::Death), 1);

        run_until(&mut state, GamePhase::GameOver, 2000);
        assert!(state.player.death_animation_complete);
        assert_eq!(state.player.y, GAME_HEIGHT - PLAYER_HEIGHT);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::ShowScore { score: 0 }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::RunFinished(s) if s.score == 0))
        );
    }

    #[test]
    fn test_game_over_waits_for_animation() {
        let mut state = state_in(GamePhase::Playing);
        state.player.y = GAME_HEIGHT - PLAYER_HEIGHT;
        state.die(DeathType::Floor, None);
        // Already on the floor, but the animation needs three frames
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.player.y, GAME_HEIGHT - PLAYER_HEIGHT);
        assert_eq!(state.phase, GamePhase::Dying);

        run_until(&mut state, GamePhase::GameOver, 2000);
        assert!(state.player.death_animation_complete);
    }

    #[test]
    fn test_passing_a_razor_scores_once() {
        let mut state = state_in(GamePhase::Playing);
        // Blades are already clear of the hitbox horizontally
        state.razors.push(Razor {
            id: 99,
            x: 150.0,
            gap_y: 1000.0,
            scored: false,
        });

        for _ in 0..16 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 1);
        assert_eq!(count_cues(&state.drain_events(), SoundCue::Score), 1);
        assert!(!state.effects.score_particles.is_empty());
    }

    #[test]
    fn test_spawned_razor_is_passed_through_its_gap() {
        // Every gap at 550..1020; flapping below y=890 keeps the hitbox inside it
        let tuning = Tuning {
            min_razor_y: 550.0,
            max_razor_y: 550.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(12345, tuning);
        state.start_game();

        for _ in 0..125 {
            let input = TickInput {
                flap: state.player.center().y > 890.0 && state.player.velocity >= 0.0,
                ..Default::default()
            };
            tick(&mut state, &input, DT);
            assert_eq!(state.phase, GamePhase::Playing);
        }
        assert!(state.razors.iter().any(|r| r.scored));
        assert_eq!(state.score, 1);
        assert_eq!(count_cues(&state.drain_events(), SoundCue::Score), 1);
    }

    #[test]
    fn test_scored_razor_never_rescores() {
        let mut state = state_in(GamePhase::Playing);
        state.razors.push(Razor {
            id: 7,
            x: 50.0,
            gap_y: 1000.0,
            scored: true,
        });
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_offscreen_razors_are_removed() {
        let mut state = state_in(GamePhase::Playing);
        state.razors.push(Razor {
            id: 5,
            x: -RAZOR_WIDTH + 1.0,
            gap_y: 800.0,
            scored: true,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.razors.iter().all(|r| r.id != 5));
    }

    #[test]
    fn test_razor_death_records_killer() {
        let mut state = state_in(GamePhase::Playing);
        let razor = Razor {
            id: 3,
            x: 400.0,
            gap_y: 300.0,
            scored: false,
        };
        state.die(DeathType::RazorTop, Some(razor));
        let cert = state.death_certificate().cloned().unwrap();
        assert_eq!(cert.death_type, DeathType::RazorTop);
        assert_eq!(cert.killer_razor, Some(razor));

        // Later deaths and ticks leave the certificate alone
        state.die(DeathType::Floor, None);
        run_until(&mut state, GamePhase::GameOver, 2000);
        assert_eq!(state.death_certificate(), Some(&cert));
    }

    #[test]
    fn test_razor_collision_through_tick() {
        let mut state = state_in(GamePhase::Playing);
        state.spawn_timer = 0.0;
        // Gap far below the player, blade right on top of the hitbox
        state.razors.push(Razor {
            id: 42,
            x: 350.0,
            gap_y: 1200.0,
            scored: false,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Dying);
        let cert = state.death_certificate().unwrap();
        assert_eq!(cert.death_type, DeathType::RazorTop);
        assert_eq!(cert.killer_razor.map(|r| r.id), Some(42));
    }

    #[test]
    fn test_ceiling_is_a_soft_stop() {
        let mut state = state_in(GamePhase::Playing);
        state.player.y = -100.0;
        state.player.velocity = JUMP_VELOCITY;
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.y, -HITBOX_PADDING);
        assert_eq!(state.player.velocity, 0.0);
    }

    #[test]
    fn test_ceiling_clamp_applies_on_a_blade_hit() {
        let mut state = state_in(GamePhase::Playing);
        state.player.y = -100.0;
        state.player.velocity = JUMP_VELOCITY;
        state.razors.push(Razor {
            id: 8,
            x: 350.0,
            gap_y: 1200.0,
            scored: false,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.player.y, -HITBOX_PADDING);
        assert_eq!(state.player.velocity, 0.0);
        assert_eq!(
            state.death_certificate().map(|c| c.death_type),
            Some(DeathType::RazorTop)
        );
    }

    #[test]
    fn test_game_over_music_is_delayed() {
        let mut state = state_in(GamePhase::GameOver);
        state.drain_events();
        let input = TickInput::default();
        for _ in 0..30 {
            tick(&mut state, &input, 16.0);
        }
        assert!(state.drain_events().is_empty());
        for _ in 0..10 {
            tick(&mut state, &input, 16.0);
        }
        let events = state.drain_events();
        assert_eq!(events, vec![GameEvent::PlayTrack(TrackId::GameOver)]);
    }

    #[test]
    fn test_restart_before_music_cancels_it() {
        let mut state = state_in(GamePhase::GameOver);
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        state.drain_events();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(
            !state
                .drain_events()
                .contains(&GameEvent::PlayTrack(TrackId::GameOver))
        );
    }

    #[test]
    fn test_high_score_cue_only_on_new_best() {
        let mut state = state_in(GamePhase::Playing);
        state.score = 3;
        state.die(DeathType::Floor, None);
        state.show_game_over();
        assert_eq!(count_cues(&state.drain_events(), SoundCue::HighScore), 1);
        assert_eq!(state.best_score, 3);

        let mut state = GameState::new(1, Tuning::default()).with_best_score(10);
        state.start_game();
        state.score = 3;
        state.die(DeathType::Floor, None);
        state.show_game_over();
        assert_eq!(count_cues(&state.drain_events(), SoundCue::HighScore), 0);
        assert_eq!(state.best_score, 10);

        // A zero-score run is never a best
        let mut state = state_in(GamePhase::GameOver);
        assert_eq!(count_cues(&state.drain_events(), SoundCue::HighScore), 0);
    }

    #[test]
    fn test_reset_clears_the_run() {
        let mut state = state_in(GamePhase::GameOver);
        state.score = 9;
        state.player.y = 1234.0;
        state.handle(Intent::Restart);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.y, PLAYER_START_Y);
        assert!(state.razors.is_empty());
        assert!(state.death_certificate().is_none());
        assert!(state.effects.trail.is_empty());
        assert!(state.effects.transition.is_active());
    }

    #[test]
    fn test_home_plays_menu_theme() {
        let mut state = state_in(GamePhase::GameOver);
        state.drain_events();
        state.handle(Intent::Home);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Cue(SoundCue::Click),
                GameEvent::StopMusic,
                GameEvent::PlayTrack(TrackId::MENU),
            ]
        );
        assert_eq!(state.player.y, PLAYER_START_Y);
    }

    #[test]
    fn test_trail_follows_player() {
        let mut state = state_in(GamePhase::Playing);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert_eq!(state.effects.trail.len(), TRAIL_LENGTH);
        let newest = state.effects.trail.points().next().unwrap();
        assert_eq!(newest.center, state.player.center());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let deltas = [16.0, 16.7, 15.9, 17.2, 16.4];
        for i in 0..300 {
            let input = TickInput {
                tap: i % 22 == 0,
                ..Default::default()
            };
            let dt = deltas[i % deltas.len()];
            tick(&mut state1, &input, dt);
            tick(&mut state2, &input, dt);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.player.y, state2.player.y);
        assert_eq!(state1.player.velocity, state2.player.velocity);
        assert_eq!(state1.player.rotation, state2.player.rotation);
        assert_eq!(state1.razors, state2.razors);
        assert_eq!(state1.drain_events(), state2.drain_events());
    }

    #[test]
    fn test_frame_rate_independent_motion() {
        let mut at_60 = state_in(GamePhase::Playing);
        let mut at_120 = state_in(GamePhase::Playing);
        for _ in 0..10 {
            tick(&mut at_60, &TickInput::default(), DT);
        }
        for _ in 0..20 {
            tick(&mut at_120, &TickInput::default(), DT / 2.0);
        }
        assert!((at_60.player.velocity - at_120.player.velocity).abs() < 1e-3);
        // Position integration drifts slightly with step size
        assert!((at_60.player.y - at_120.player.y).abs() < 10.0);
        assert!((at_60.razors[0].x - at_120.razors[0].x).abs() < 1e-2);
    }
}
