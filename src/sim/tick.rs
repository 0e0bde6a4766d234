//! Fixed timestep simulation tick
//!
//! The per-frame orchestrator. The update ordering is load-bearing:
//! obstacles are repositioned and gated before any collision test runs,
//! so the geometry tested is exactly the geometry drawn this frame, and
//! the hazard check runs before the platform check so a frame with both
//! contacts deterministically registers death.

use glam::Vec2;

use crate::consts::{CELL_SIZE, GROUND_Y};
use crate::sim::camera::{screen_rect, viewport, FollowCamera, ScrollCamera};
use crate::sim::collider::{overlaps, Rect};
use crate::sim::state::{Obstacle, RunOutcome, SessionPhase, SessionState};
use crate::tuning::Tuning;

/// Input snapshot for a single tick. `*_pressed` fields are
/// edge-triggered (true for the one frame the key went down), `*_down`
/// level-triggered.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub jump_pressed: bool,
    pub jump_down: bool,
    pub pause_pressed: bool,
    pub reset_pressed: bool,
    pub menu_pressed: bool,
}

/// Advance the session by one fixed-rate frame.
pub fn tick(state: &mut SessionState, input: &FrameInput, tuning: &Tuning) {
    if input.pause_pressed {
        match state.phase {
            SessionPhase::Running => {
                state.phase = SessionPhase::Paused;
                return;
            }
            SessionPhase::Paused => state.phase = SessionPhase::Running,
            _ => {}
        }
    }

    match state.phase {
        SessionPhase::Paused | SessionPhase::Complete => return,
        _ => {}
    }

    state.frames += 1;

    match state.phase {
        SessionPhase::Running => run_frame(state, input, tuning),
        SessionPhase::FadingOut => {
            advance_death_effects(state);
            state.fade_alpha += tuning.fade_step;
            if state.fade_alpha >= 1.0 {
                state.fade_alpha = 1.0;
                state.reset_attempt();
                state.phase = SessionPhase::FadingIn;
            }
        }
        SessionPhase::FadingIn => {
            state.fade_alpha -= tuning.fade_step;
            if state.fade_alpha <= 0.0 {
                state.fade_alpha = 0.0;
                state.phase = SessionPhase::Running;
            }
        }
        SessionPhase::Paused | SessionPhase::Complete => {}
    }
}

fn run_frame(state: &mut SessionState, input: &FrameInput, tuning: &Tuning) {
    if input.menu_pressed {
        state.outcome = Some(RunOutcome::Abandoned);
        state.phase = SessionPhase::Complete;
        log::info!("run abandoned after {} attempts", state.attempts);
        return;
    }
    if input.reset_pressed {
        state.phase = SessionPhase::FadingOut;
        return;
    }

    // 1. Cameras
    state.scroll.tick();
    state
        .follow
        .tick(state.player.transform.position.y, &tuning.follow);

    // 2. Obstacles: reposition, cull, proximity-gate. Must precede the
    //    collision checks below.
    let gate = player_gate(state, tuning);
    let scroll = state.scroll;
    let follow = state.follow;
    for obstacle in state
        .hazards
        .iter_mut()
        .chain(state.platforms.iter_mut())
    {
        update_obstacle(obstacle, &gate, &scroll, &follow);
    }

    // 3. Player input edge + integration
    if input.jump_pressed || input.jump_down {
        state.player.try_jump();
    }
    state.player.integrate();

    // 4. Ground contact
    if state.player.bottom() >= GROUND_Y && state.player.body.velocity.y >= 0.0 {
        state.player.land(GROUND_Y);
    }
    state.player.collider.set_center(state.player.transform.position);

    // 5. Hazards before platforms: simultaneous contacts resolve to death
    check_hazard_collisions(state);

    // 6. Platform landing / illegal-angle check
    if state.player.alive {
        check_platform_collisions(state);
    }

    // 7. Emitters
    let anchor = state.player.transform.position;
    state.player.trail.tick(anchor, &mut state.rng);
    state.player.burst.tick(anchor, &mut state.rng);

    // 8. Progress and phase sequencing
    state.progress = (state.scroll.position.x / state.level_width).clamp(0.0, 1.0);
    if !state.player.alive {
        state.phase = SessionPhase::FadingOut;
    } else if state.scroll.position.x >= state.level_width {
        state.outcome = Some(RunOutcome::Completed);
        state.phase = SessionPhase::Complete;
        log::info!(
            "level complete: attempt {}, {} frames",
            state.attempts,
            state.frames
        );
    }
}

/// Inflated player rectangle for the collision-activation gate.
fn player_gate(state: &SessionState, tuning: &Tuning) -> Rect {
    let margin = Vec2::splat(tuning.activation_margin);
    let half = Vec2::splat(state.player.half());
    Rect::from_center_half(state.player.transform.position, half + margin)
}

fn update_obstacle(
    obstacle: &mut Obstacle,
    gate: &Rect,
    scroll: &ScrollCamera,
    follow: &FollowCamera,
) {
    if !obstacle.states.active {
        return;
    }

    // Camera-relative position, recomputed from the fixed source so
    // there is no per-frame accumulation drift
    let on_screen = obstacle.source_position - scroll.position;
    obstacle.transform.position = on_screen;
    obstacle.collider.set_center(on_screen);

    let rect = screen_rect(
        obstacle.source_position,
        Vec2::splat(CELL_SIZE / 2.0),
        scroll,
        follow,
    );

    // One-directional scroll: off the left edge means gone for good
    if rect.max.x < 0.0 {
        obstacle.states.active = false;
        obstacle.collider.active = false;
        return;
    }
    if !obstacle.states.in_screen && rect.intersects(&viewport()) {
        obstacle.states.in_screen = true;
    }

    // Rectangle-intersection proximity gate (accounts for vertical
    // separation, unlike a horizontal-offset-only cut)
    obstacle.collider.active = obstacle.collider.bounds().intersects(gate);
}

fn check_hazard_collisions(state: &mut SessionState) {
    let player_poly = &state.player.collider.polygon;
    let mut hit = false;
    for hazard in &state.hazards {
        if !hazard.states.active || !hazard.collider.active {
            continue;
        }
        if overlaps(player_poly, &hazard.collider.polygon) {
            hit = true;
            break;
        }
    }
    if hit {
        state.player.kill();
    }
}

fn check_platform_collisions(state: &mut SessionState) {
    // Deferred resolution: scan first, then mutate the player
    let mut landing: Option<f32> = None;
    let mut fatal = false;
    let prev_bottom = state.player.prev_bottom();
    let player_poly = &state.player.collider.polygon;

    for platform in &state.platforms {
        if !platform.states.active || !platform.collider.active {
            continue;
        }
        if !overlaps(player_poly, &platform.collider.polygon) {
            continue;
        }
        let top = platform.collider.center().y - platform.collider.half.y;
        if prev_bottom <= top {
            // Clean landing: the player's bottom edge was above the
            // platform top last frame
            landing = Some(top);
        } else {
            // Side or underside contact
            fatal = true;
            break;
        }
    }

    if fatal {
        state.player.kill();
    } else if let Some(top) = landing {
        state.player.land(top);
    }
}

fn advance_death_effects(state: &mut SessionState) {
    // Death burst and scale-out keep animating while the overlay fades
    let anchor = state.player.transform.position;
    state.player.burst.tick(anchor, &mut state.rng);
    if !state.player.alive {
        state.player.transform.scale = state.player.death_ease.step();
    }
}

/// Number of frames the level keeps scrolling before the run completes.
pub fn frames_to_complete(level_width: f32, scroll_speed: f32) -> u64 {
    (level_width / scroll_speed).ceil() as u64
}
