//! Fixed timestep simulation tick
//!
//! Advances a running session by exactly one frame. Phases run in a fixed
//! order and every outward change is reported as a `GameEvent`.

use glam::Vec2;

use super::collision::landing_platform;
use super::particles::BurstDef;
use super::state::{Facing, GameEvent, GamePhase, GameState, progress_for};
use crate::consts::*;

/// Controls held during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Advance the game state by one tick
///
/// Outside `GamePhase::Running` this does nothing and returns no events.
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running {
        return events;
    }

    state.time_ticks += 1;
    state.player.anim_phase += 1.0;

    // Delayed full respawn after the last life went to a hazard
    if let Some(remaining) = state.pending_reset {
        if remaining <= 1 {
            let had_score = state.score != 0;
            state.respawn_from_start();
            log::info!("Respawned at level start");
            events.push(GameEvent::LivesChanged(state.lives));
            if had_score {
                events.push(GameEvent::ScoreChanged(state.score));
            }
        } else {
            state.pending_reset = Some(remaining - 1);
        }
    }

    if state.player.invulnerable > 0 {
        state.player.invulnerable -= 1;
    }

    apply_controls(state, input);
    integrate(state);
    resolve_platforms(state);
    collect_gummies(state, &mut events);
    check_hazards(state, &mut events);
    collect_rose(state);
    check_win(state, &mut events);
    check_pitfall(state, &mut events);

    state.camera.follow(state.player.pos.x);

    let progress = progress_for(state.player.pos.x);
    if progress != state.progress {
        state.progress = progress;
        events.push(GameEvent::ProgressChanged(progress));
    }

    state.particles.advance();
    state.age_decorations();

    events
}

/// Run, brake and jump from held controls
fn apply_controls(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;

    // Left wins when both directions are held
    if input.left {
        player.vel.x = (player.vel.x - RUN_ACCEL).max(-MAX_RUN_SPEED);
        player.facing = Facing::Left;
    } else if input.right {
        player.vel.x = (player.vel.x + RUN_ACCEL).min(MAX_RUN_SPEED);
        player.facing = Facing::Right;
    } else {
        player.vel.x *= RUN_DAMPING;
    }

    if input.jump && player.grounded {
        player.vel.y = JUMP_IMPULSE;
        player.jumping = true;
        player.grounded = false;

        let feet = Vec2::new(player.center().x, player.rect().bottom());
        state.particles.burst(&mut state.rng, feet, &BurstDef::jump_dust());
    }

    // Releasing jump while rising cuts the arc short
    if !input.jump && state.player.vel.y < 0.0 {
        state.player.vel.y *= JUMP_CUT;
    }
}

/// Gravity, then position (semi-implicit Euler)
fn integrate(state: &mut GameState) {
    let player = &mut state.player;
    player.vel.y = (player.vel.y + GRAVITY).min(TERMINAL_VELOCITY);
    player.sanitize_velocity();
    player.pos += player.vel;
}

fn resolve_platforms(state: &mut GameState) {
    let player = &mut state.player;
    player.grounded = false;

    if let Some(platform) = landing_platform(&player.rect(), player.vel.y, &state.platforms) {
        player.pos.y = platform.rect.top() - player.size.y;
        player.vel.y = 0.0;
        player.grounded = true;
        player.jumping = false;
    }
}

fn collect_gummies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_rect = state.player.rect();

    for gummy in &mut state.gummies {
        if gummy.collected || !player_rect.overlaps(&gummy.rect()) {
            continue;
        }
        gummy.collected = true;
        gummy.sparkles.clear();
        state.score += GUMMY_SCORE;
        state
            .particles
            .burst(&mut state.rng, gummy.rect().center(), &BurstDef::candy());
        log::debug!("Gummy cluster at {} collected, score {}", gummy.pos, state.score);
        events.push(GameEvent::ScoreChanged(state.score));
    }
}

/// At most one hazard hit per tick, and none while invulnerable
fn check_hazards(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.invulnerable > 0 {
        return;
    }

    let player_rect = state.player.rect();
    let Some(bottle_x) = state
        .bottles
        .iter()
        .find(|b| player_rect.overlaps(&b.rect()))
        .map(|b| b.pos.x)
    else {
        return;
    };

    state.lives = state.lives.saturating_sub(1);
    state.player.invulnerable = HAZARD_INVULNERABILITY;
    let center = state.player.center();
    state.particles.burst(&mut state.rng, center, &BurstDef::damage());

    // Knock away from the bottle
    state.player.vel.x = if bottle_x > state.player.pos.x {
        -KNOCKBACK_X
    } else {
        KNOCKBACK_X
    };
    state.player.vel.y = KNOCKBACK_Y;

    log::debug!("Hair gel hit, {} lives left", state.lives);
    events.push(GameEvent::LivesChanged(state.lives));

    if state.lives == 0 && state.pending_reset.is_none() {
        log::info!("Out of lives, respawning in {} ticks", RESET_DELAY_TICKS);
        state.pending_reset = Some(RESET_DELAY_TICKS);
    }
}

fn collect_rose(state: &mut GameState) {
    if state.rose.collected || !state.player.rect().overlaps(&state.rose.rect) {
        return;
    }
    state.rose.collected = true;
    state.rose.sparkles.clear();
    let center = state.rose.rect.center();
    state.particles.burst(&mut state.rng, center, &BurstDef::petals());
    log::info!("Rose collected");
}

fn check_win(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let owner_x = state.owner.left();
    let x = state.player.pos.x;
    let at_owner = x >= owner_x - WIN_WINDOW_BEHIND && x <= owner_x + WIN_WINDOW_AHEAD;
    if !state.rose.collected || !at_owner {
        return;
    }

    state.phase = GamePhase::Won;
    let center = state.player.center();
    state.particles.burst(&mut state.rng, center, &BurstDef::celebration());
    log::info!("Rose delivered! Final score {}", state.score);
    events.push(GameEvent::Won {
        final_score: state.score,
    });
}

/// Falling out of the level costs one life and respawns near the camera
fn check_pitfall(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.player.pos.y <= PITFALL_Y {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    state.player.invulnerable = PITFALL_INVULNERABILITY;

    if state.lives == 0 {
        log::info!("Fell with no lives left, starting over");
        let had_score = state.score != 0;
        state.lives = STARTING_LIVES;
        state.score = 0;
        state.reset_collectibles();
        state.pending_reset = None;
        if had_score {
            events.push(GameEvent::ScoreChanged(0));
        }
    }
    events.push(GameEvent::LivesChanged(state.lives));

    let respawn = Vec2::new(state.camera.x.max(RESPAWN_MIN_X), RESPAWN_Y);
    state.player.respawn_at(respawn);
    log::debug!("Pitfall, respawned at {}", respawn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::level::{Level, Platform, SurfaceKind};
    use proptest::prelude::*;

    const RIGHT: TickInput = TickInput {
        left: false,
        right: true,
        jump: false,
    };
    const JUMP: TickInput = TickInput {
        left: false,
        right: false,
        jump: true,
    };
    const IDLE: TickInput = TickInput {
        left: false,
        right: false,
        jump: false,
    };

    /// One endless floor with nothing on it; player resting on it at x=0
    fn flat_level() -> Level {
        Level {
            player_start: Vec2::new(0.0, 345.0),
            owner: Rect::new(-5000.0, 290.0, 45.0, 70.0),
            rose: Rect::new(90_000.0, 250.0, 35.0, 45.0),
            platforms: vec![Platform::new(-1000.0, 400.0, 100_000.0, 100.0, SurfaceKind::Grass)],
            gummies: Vec::new(),
            bottles: Vec::new(),
            clouds: Vec::new(),
        }
    }

    fn running(level: Level) -> GameState {
        let mut state = GameState::with_level(level, 7);
        state.phase = GamePhase::Running;
        state
    }

    fn lives_events(events: &[GameEvent]) -> Vec<u8> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::LivesChanged(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = GameState::new(1);
        let events = tick(&mut state, &RIGHT);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.pos, Vec2::new(100.0, 300.0));
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut state = running(flat_level());
        tick(&mut state, &IDLE);
        assert!(state.player.grounded);
        assert_eq!(state.player.pos.y, 345.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_running_reaches_speed_cap() {
        let mut state = running(flat_level());
        for _ in 0..10 {
            tick(&mut state, &RIGHT);
        }
        assert_eq!(state.player.vel.x, MAX_RUN_SPEED);
        assert_eq!(state.player.facing, Facing::Right);

        for _ in 10..60 {
            tick(&mut state, &RIGHT);
            assert!(state.player.vel.x <= MAX_RUN_SPEED);
        }
        assert!(state.player.pos.x > 300.0);
    }

    #[test]
    fn test_release_decays_without_reversing() {
        let mut state = running(flat_level());
        for _ in 0..20 {
            tick(&mut state, &RIGHT);
        }
        let mut last = state.player.vel.x;
        for _ in 0..200 {
            tick(&mut state, &IDLE);
            let v = state.player.vel.x;
            assert!(v >= 0.0);
            assert!(v <= last);
            last = v;
        }
        assert!(last < 0.01);
    }

    #[test]
    fn test_left_wins_over_right() {
        let mut state = running(flat_level());
        let both = TickInput {
            left: true,
            right: true,
            jump: false,
        };
        tick(&mut state, &both);
        assert!(state.player.vel.x < 0.0);
        assert_eq!(state.player.facing, Facing::Left);
    }

    #[test]
    fn test_jump_impulse_from_ground() {
        let mut state = running(flat_level());
        tick(&mut state, &IDLE);
        assert!(state.player.grounded);

        tick(&mut state, &JUMP);
        assert!(!state.player.grounded);
        assert!(state.player.jumping);
        // Impulse plus one tick of gravity
        assert!((state.player.vel.y - (JUMP_IMPULSE + GRAVITY)).abs() < 1e-5);
        assert!(state.player.pos.y < 345.0);
        // Dust at the feet
        assert_eq!(state.particles.len(), 8);
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let mut state = running(flat_level());
        state.player.pos.y = 100.0;
        tick(&mut state, &JUMP);
        assert!(state.player.vel.y > 0.0);
    }

    #[test]
    fn test_releasing_jump_shortens_arc() {
        let apex = |hold_ticks: usize| {
            let mut state = running(flat_level());
            tick(&mut state, &IDLE);
            let mut top = state.player.pos.y;
            for i in 0..30 {
                let input = if i < hold_ticks { JUMP } else { IDLE };
                tick(&mut state, &input);
                top = top.min(state.player.pos.y);
            }
            top
        };
        let full = apex(30);
        let short = apex(1);
        assert!(short > full + 50.0, "short hop {short} vs full jump {full}");
    }

    #[test]
    fn test_gummy_pickup_is_idempotent() {
        let mut level = flat_level();
        level.gummies.push(Vec2::new(30.0, 360.0));
        let mut state = running(level);

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.score, GUMMY_SCORE);
        assert!(state.gummies[0].collected);
        assert!(events.contains(&GameEvent::ScoreChanged(10)));
        assert_eq!(state.particles.len(), 15);

        // Still overlapping, already collected
        let events = tick(&mut state, &IDLE);
        assert_eq!(state.score, GUMMY_SCORE);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreChanged(_))));
    }

    #[test]
    fn test_hazard_hit_grants_invulnerability() {
        let mut level = flat_level();
        level.bottles.push(Vec2::new(60.0, 370.0));
        let mut state = running(level);

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.invulnerable, HAZARD_INVULNERABILITY);
        assert_eq!(lives_events(&events), vec![2]);
        // Bottle is to the right, so knocked left and up
        assert_eq!(state.player.vel, Vec2::new(-KNOCKBACK_X, KNOCKBACK_Y));

        // Still touching the bottle next tick
        let events = tick(&mut state, &IDLE);
        assert!(state.player.rect().overlaps(&state.bottles[0].rect()));
        assert_eq!(state.lives, 2);
        assert_eq!(state.player.invulnerable, HAZARD_INVULNERABILITY - 1);
        assert!(lives_events(&events).is_empty());
    }

    #[test]
    fn test_knockback_pushes_right_when_bottle_is_left() {
        let mut level = flat_level();
        level.bottles.push(Vec2::new(-10.0, 370.0));
        let mut state = running(level);
        tick(&mut state, &IDLE);
        assert_eq!(state.player.vel.x, KNOCKBACK_X);
    }

    #[test]
    fn test_overlapping_bottles_cost_one_life() {
        let mut level = flat_level();
        level.bottles.push(Vec2::new(10.0, 370.0));
        level.bottles.push(Vec2::new(30.0, 370.0));
        let mut state = running(level);
        tick(&mut state, &IDLE);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_to_hazard_resets_after_delay() {
        let mut level = flat_level();
        level.bottles.push(Vec2::new(500.0, 370.0));
        level.gummies.push(Vec2::new(2000.0, 360.0));
        let mut state = running(level);
        state.lives = 1;
        state.score = 20;
        state.gummies[0].collected = true;
        state.player.pos.x = 450.0;

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, 0);
        assert_eq!(lives_events(&events), vec![0]);
        assert_eq!(state.pending_reset, Some(RESET_DELAY_TICKS));

        for _ in 1..RESET_DELAY_TICKS {
            tick(&mut state, &IDLE);
            assert_eq!(state.lives, 0);
            assert_eq!(state.score, 20);
        }

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert!(!state.gummies[0].collected);
        assert_eq!(state.player.pos, Vec2::new(0.0, 345.0));
        assert_eq!(state.player.invulnerable, 0);
        assert_eq!(state.camera.x, 0.0);
        assert!(state.particles.is_empty());
        assert_eq!(state.pending_reset, None);
        assert!(events.contains(&GameEvent::LivesChanged(3)));
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_pitfall_costs_exactly_one_life() {
        let mut level = flat_level();
        level.platforms.clear();
        let mut state = running(level);
        state.player.pos = Vec2::new(600.0, 549.5);
        state.player.vel.y = 1.0;

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, 2);
        assert_eq!(lives_events(&events), vec![2]);
        assert_eq!(state.player.pos, Vec2::new(RESPAWN_MIN_X, RESPAWN_Y));
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.invulnerable, PITFALL_INVULNERABILITY);

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, 2);
        assert!(lives_events(&events).is_empty());
    }

    #[test]
    fn test_pitfall_respawns_at_camera() {
        let mut level = flat_level();
        level.platforms.clear();
        let mut state = running(level);
        state.camera.x = 800.0;
        state.player.pos = Vec2::new(1100.0, 560.0);

        tick(&mut state, &IDLE);
        assert_eq!(state.player.pos, Vec2::new(800.0, RESPAWN_Y));
    }

    #[test]
    fn test_pitfall_on_last_life_starts_over() {
        let mut level = flat_level();
        level.platforms.clear();
        level.gummies.push(Vec2::new(2000.0, 360.0));
        let mut state = running(level);
        state.lives = 1;
        state.score = 30;
        state.gummies[0].collected = true;
        state.rose.collected = true;
        state.player.pos.y = 560.0;

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert!(!state.gummies[0].collected);
        assert!(!state.rose.collected);
        assert_eq!(lives_events(&events), vec![3]);
        assert!(events.contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_pitfall_cancels_delayed_hazard_reset() {
        let mut level = flat_level();
        level.bottles.push(Vec2::new(500.0, 370.0));
        let mut state = running(level);
        state.lives = 1;
        state.score = 20;
        state.player.pos.x = 450.0;

        tick(&mut state, &IDLE);
        assert_eq!(state.lives, 0);
        assert_eq!(state.pending_reset, Some(RESET_DELAY_TICKS));

        for _ in 0..10 {
            tick(&mut state, &IDLE);
        }
        state.player.pos.y = 560.0;

        let events = tick(&mut state, &IDLE);
        assert_eq!(state.pending_reset, None);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.score, 0);
        assert_eq!(lives_events(&events), vec![3]);
        assert!(events.contains(&GameEvent::ScoreChanged(0)));

        // The cancelled reset never fires
        for _ in 0..RESET_DELAY_TICKS * 2 {
            let events = tick(&mut state, &IDLE);
            assert!(lives_events(&events).is_empty());
            assert!(!events.contains(&GameEvent::ScoreChanged(0)));
            assert_eq!(state.pending_reset, None);
        }
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_rose_pickup() {
        let mut level = flat_level();
        level.rose = Rect::new(40.0, 330.0, 35.0, 45.0);
        let mut state = running(level);
        tick(&mut state, &IDLE);
        assert!(state.rose.collected);
        assert_eq!(state.particles.len(), 30);
        // Far from the owner: no win
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_win_needs_rose_and_owner() {
        // At the owner without the rose
        let mut level = flat_level();
        level.owner = Rect::new(0.0, 290.0, 45.0, 70.0);
        let mut state = running(level.clone());
        for _ in 0..10 {
            tick(&mut state, &IDLE);
        }
        assert_eq!(state.phase, GamePhase::Running);

        // With the rose, away from the owner
        let mut state = running(flat_level());
        state.rose.collected = true;
        for _ in 0..10 {
            tick(&mut state, &IDLE);
        }
        assert_eq!(state.phase, GamePhase::Running);

        // Both
        let mut state = running(level);
        state.rose.collected = true;
        state.score = 40;
        let events = tick(&mut state, &IDLE);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(events.contains(&GameEvent::Won { final_score: 40 }));
        assert_eq!(state.particles.len(), 50);
    }

    #[test]
    fn test_win_window_edges() {
        for (x, wins) in [(-50.0, true), (100.0, true), (-50.5, false), (100.5, false)] {
            let mut level = flat_level();
            level.owner = Rect::new(0.0, 290.0, 45.0, 70.0);
            level.player_start = Vec2::new(x, 345.0);
            let mut state = running(level);
            state.rose.collected = true;
            tick(&mut state, &IDLE);
            assert_eq!(state.phase == GamePhase::Won, wins, "player x {x}");
        }
    }

    #[test]
    fn test_won_state_is_frozen() {
        let mut level = flat_level();
        level.owner = Rect::new(0.0, 290.0, 45.0, 70.0);
        let mut state = running(level);
        state.rose.collected = true;
        tick(&mut state, &IDLE);
        assert_eq!(state.phase, GamePhase::Won);

        let pos = state.player.pos;
        let ticks = state.time_ticks;
        let particles = state.particles.len();
        let camera = state.camera;
        for _ in 0..30 {
            let events = tick(&mut state, &RIGHT);
            assert!(events.is_empty());
        }
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.particles.len(), particles);
        assert_eq!(state.camera, camera);
    }

    #[test]
    fn test_camera_and_progress_follow_player() {
        let mut state = running(flat_level());
        state.player.pos.x = 1600.0;
        let events = tick(&mut state, &IDLE);
        assert!((state.progress - 50.0).abs() < 0.01);
        assert!(events.iter().any(|e| matches!(e, GameEvent::ProgressChanged(_))));
        assert!((state.camera.x - 130.0).abs() < 0.01);

        // Standing still: no repeated progress notification
        let events = tick(&mut state, &IDLE);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ProgressChanged(_))));
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99);
        let mut b = GameState::new(99);
        a.phase = GamePhase::Running;
        b.phase = GamePhase::Running;

        for i in 0..300 {
            let input = TickInput {
                left: i % 97 > 80,
                right: i % 7 != 0,
                jump: i % 40 < 12,
            };
            assert_eq!(tick(&mut a, &input), tick(&mut b, &input));
        }
        assert_eq!(a.player, b.player);
        assert_eq!(a.score, b.score);
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.rose, b.rose);
    }

    proptest! {
        #[test]
        fn prop_session_counters_stay_valid(
            inputs in proptest::collection::vec(any::<(bool, bool, bool)>(), 1..600)
        ) {
            let mut state = GameState::new(5);
            state.phase = GamePhase::Running;
            let mut last_score = state.score;

            for (left, right, jump) in inputs {
                tick(&mut state, &TickInput { left, right, jump });

                prop_assert!(state.lives <= STARTING_LIVES);
                prop_assert_eq!(state.score % GUMMY_SCORE, 0);
                prop_assert!(state.score <= GUMMY_SCORE * state.gummies.len() as u32);
                if state.score < last_score {
                    // Only a full reset may take score away
                    prop_assert_eq!(state.score, 0);
                    prop_assert_eq!(state.lives, STARTING_LIVES);
                }
                prop_assert!((0.0..=100.0).contains(&state.progress));
                prop_assert!((0.0..=CAMERA_MAX_X).contains(&state.camera.x));
                prop_assert!(state.player.vel.is_finite());
                last_score = state.score;
            }
        }
    }
}
