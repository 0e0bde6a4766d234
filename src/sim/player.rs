//! Player physics and state machine
//!
//! The player is a box on rails: the world scrolls past while the
//! player only ever moves vertically, driven by a jump impulse and a
//! two-entry gravity table. Grounded/jumping/falling are mutually
//! exclusive outside a single-frame transition window; `grounded` is
//! recomputed to false at the start of every integration step and only
//! re-asserted by an explicit contact check.

use glam::Vec2;

use crate::consts::{BURST_POOL, GROUND_Y, PLAYER_SIZE, PLAYER_X, TRAIL_POOL};
use crate::sim::collider::Collider;
use crate::sim::easing::EaseOut;
use crate::sim::particles::{EmissionMode, Emitter};
use crate::sim::state::Transform2D;
use crate::tuning::Tuning;

/// A directed constant force: unit direction × magnitude, with the
/// product cached since both parts are fixed at tuning time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityForce {
    pub direction: Vec2,
    pub magnitude: f32,
    pub force: Vec2,
}

impl GravityForce {
    pub fn new(direction: Vec2, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
            force: direction * magnitude,
        }
    }
}

/// Integration state for a moving entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicObject {
    pub prev_position: Vec2,
    /// Jump impulse direction (unit vector)
    pub direction: Vec2,
    /// Per-axis impulse magnitude
    pub speed: Vec2,
    pub velocity: Vec2,
    pub grounded: bool,
    pub jumping: bool,
    pub falling: bool,
}

/// The player entity. Created once per session and repositioned, never
/// recreated, on respawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub transform: Transform2D,
    pub body: DynamicObject,
    pub collider: Collider,
    pub rotation_ease: EaseOut,
    pub death_ease: EaseOut,
    pub alive: bool,
    /// Ambient trail while running
    pub trail: Emitter,
    /// One-shot burst on death
    pub burst: Emitter,
    /// [ascent/neutral, falling] — indexed by the `falling` flag
    gravity: [GravityForce; 2],
    jump_rotation_frames: f32,
    fall_rotation_frames: f32,
    death_scale_change: f32,
    death_scale_frames: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let spawn = spawn_position();
        let down = Vec2::new(0.0, 1.0);
        let mut trail = Emitter::new(
            TRAIL_POOL,
            tuning.trail_template.clone(),
            EmissionMode::Continuous,
            tuning.trail_rate,
        );
        trail.active = true;
        let burst = Emitter::new(
            BURST_POOL,
            tuning.burst_template.clone(),
            EmissionMode::Burst,
            0.0,
        );

        Self {
            transform: Transform2D::new(spawn),
            body: DynamicObject {
                prev_position: spawn,
                direction: Vec2::new(0.0, -1.0),
                speed: Vec2::new(0.0, tuning.jump_speed),
                velocity: Vec2::ZERO,
                grounded: true,
                jumping: false,
                falling: false,
            },
            collider: active_box(spawn),
            rotation_ease: EaseOut::done_at(0.0),
            death_ease: EaseOut::done_at(1.0),
            alive: true,
            trail,
            burst,
            gravity: [
                GravityForce::new(down, tuning.gravity_up),
                GravityForce::new(down, tuning.gravity_fall),
            ],
            jump_rotation_frames: tuning.jump_rotation_frames,
            fall_rotation_frames: tuning.fall_rotation_frames,
            death_scale_change: tuning.death_scale_change,
            death_scale_frames: tuning.death_scale_frames,
        }
    }

    /// Half-extent of the collision box.
    pub fn half(&self) -> f32 {
        PLAYER_SIZE / 2.0
    }

    /// World y of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.transform.position.y + self.half()
    }

    /// Bottom edge on the previous frame, used by the landing-angle check.
    pub fn prev_bottom(&self) -> f32 {
        self.body.prev_position.y + self.half()
    }

    /// Jump if grounded: the impulse overwrites vertical velocity
    /// outright and the flip animation starts over.
    pub fn try_jump(&mut self) -> bool {
        if !self.alive || !self.body.grounded {
            return false;
        }
        self.body.grounded = false;
        self.body.jumping = true;
        self.body.velocity.y = self.body.direction.y * self.body.speed.y;
        self.rotation_ease.restart(
            self.transform.rotation,
            180.0,
            self.jump_rotation_frames,
        );
        true
    }

    /// One integration step: clear `grounded`, resolve the falling
    /// transition, accumulate gravity, move, animate rotation.
    pub fn integrate(&mut self) {
        if !self.alive {
            return;
        }
        self.body.prev_position = self.transform.position;

        let was_grounded = self.body.grounded;
        self.body.grounded = false;

        // Walked off an edge without jumping
        if !was_grounded && !self.body.jumping && !self.body.falling {
            self.body.falling = true;
            self.rotation_ease.restart(
                self.transform.rotation,
                90.0,
                self.fall_rotation_frames,
            );
        }

        let gravity = self.gravity[self.body.falling as usize];
        self.body.velocity += gravity.force;
        self.transform.position += self.body.velocity;

        // Past the apex the descent counts as falling (heavier gravity
        // from the next frame on); the flip animation keeps running.
        if self.body.jumping && self.body.velocity.y >= 0.0 {
            self.body.jumping = false;
            self.body.falling = true;
        }

        if self.body.jumping || self.body.falling {
            self.transform.rotation = self.rotation_ease.step();
        }
    }

    /// Ground or platform contact: zero vertical velocity, snap the box
    /// bottom onto the surface, and finish the flip on a clean angle.
    pub fn land(&mut self, surface_y: f32) {
        if !self.rotation_ease.finished {
            // Snap to a multiple of the in-flight animation's step:
            // 180° for a jump flip, 90° for a fall tilt
            let step = self.rotation_ease.c;
            self.transform.rotation = (self.transform.rotation / step).round() * step;
            self.rotation_ease = EaseOut::done_at(self.transform.rotation);
        }

        self.body.velocity.y = 0.0;
        self.transform.position.y = surface_y - self.half();
        self.body.grounded = true;
        self.body.jumping = false;
        self.body.falling = false;
    }

    /// Fatal contact. Idempotent: a second call while already dead does
    /// not re-trigger the burst or restart the death animation.
    pub fn kill(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.trail.active = false;
        self.burst.rearm();
        self.burst.active = true;
        self.death_ease
            .restart(1.0, self.death_scale_change, self.death_scale_frames);
        log::debug!(
            "player died at x={:.1} y={:.1}",
            self.transform.position.x,
            self.transform.position.y
        );
    }

    /// Reposition for a fresh attempt. The entity (and its pools) are
    /// reused, not recreated.
    pub fn respawn(&mut self) {
        let spawn = spawn_position();
        self.transform = Transform2D::new(spawn);
        self.body.prev_position = spawn;
        self.body.velocity = Vec2::ZERO;
        self.body.grounded = true;
        self.body.jumping = false;
        self.body.falling = false;
        self.collider.set_center(spawn);
        self.rotation_ease = EaseOut::done_at(0.0);
        self.death_ease = EaseOut::done_at(1.0);
        self.alive = true;
        self.trail.rearm();
        self.trail.active = true;
        self.burst.rearm();
    }
}

fn spawn_position() -> Vec2 {
    Vec2::new(PLAYER_X, GROUND_Y - PLAYER_SIZE / 2.0)
}

fn active_box(center: Vec2) -> Collider {
    let mut c = Collider::rect(center, Vec2::splat(PLAYER_SIZE / 2.0));
    c.active = true;
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&Tuning::default())
    }

    /// Drive a player against flat ground for one frame.
    fn step(p: &mut Player, jump: bool) {
        if jump {
            p.try_jump();
        }
        p.integrate();
        if p.bottom() >= GROUND_Y && p.body.velocity.y >= 0.0 {
            p.land(GROUND_Y);
        }
        p.collider.set_center(p.transform.position);
    }

    #[test]
    fn jump_overwrites_vertical_velocity() {
        let mut p = player();
        let jump_speed = p.body.speed.y;
        p.body.velocity.y = 42.0;
        assert!(p.try_jump());
        assert_eq!(p.body.velocity.y, -jump_speed);
        assert!(p.body.jumping && !p.body.grounded && !p.body.falling);
    }

    #[test]
    fn cannot_jump_airborne() {
        let mut p = player();
        p.try_jump();
        p.integrate();
        assert!(!p.try_jump());
    }

    #[test]
    fn jump_arc_returns_to_ground_with_zero_velocity() {
        let mut p = player();
        step(&mut p, true);
        assert!(p.bottom() < GROUND_Y);
        let mut frames = 0;
        while !p.body.grounded {
            step(&mut p, false);
            frames += 1;
            assert!(frames < 300, "jump never landed");
        }
        assert_eq!(p.body.velocity.y, 0.0);
        assert_eq!(p.bottom(), GROUND_Y);
        assert!(!p.body.jumping && !p.body.falling);
    }

    #[test]
    fn landing_snaps_rotation_to_step_multiple() {
        let mut p = player();
        step(&mut p, true);
        while !p.body.grounded {
            step(&mut p, false);
        }
        let rot = p.transform.rotation;
        assert_eq!(rot % 90.0, 0.0, "rotation {rot} not snapped");
        assert!(p.rotation_ease.finished);
    }

    #[test]
    fn walking_off_edge_starts_falling() {
        let mut p = player();
        // No ground re-assertion: first integrate clears grounded, the
        // next one observes the airborne state and starts the fall.
        p.integrate();
        assert!(!p.body.falling);
        p.integrate();
        assert!(p.body.falling && !p.body.jumping && !p.body.grounded);
    }

    #[test]
    fn falling_gravity_is_heavier() {
        let t = Tuning::default();
        assert!(t.gravity_fall > t.gravity_up);

        let mut jumper = player();
        jumper.try_jump();
        jumper.integrate();
        let ascent_dv = jumper.body.velocity.y + jumper.body.speed.y;
        assert!((ascent_dv - t.gravity_up).abs() < 1e-4);

        // One neutral frame, then two falling frames
        let mut faller = player();
        faller.integrate();
        faller.integrate();
        faller.integrate();
        let fall_v = faller.body.velocity.y;
        assert!((fall_v - (t.gravity_up + 2.0 * t.gravity_fall)).abs() < 1e-4);
    }

    #[test]
    fn kill_is_idempotent() {
        let mut p = player();
        p.kill();
        assert!(!p.alive);
        assert!(p.burst.active);
        let ease_after_first = p.death_ease;
        let mut p2 = p.clone();
        p2.kill();
        assert_eq!(p2.death_ease, ease_after_first);
        assert_eq!(p2.alive, p.alive);
    }

    #[test]
    fn respawn_repositions_and_revives() {
        let mut p = player();
        step(&mut p, true);
        step(&mut p, false);
        p.kill();
        p.respawn();
        assert!(p.alive);
        assert!(p.body.grounded);
        assert_eq!(p.bottom(), GROUND_Y);
        assert_eq!(p.body.velocity, Vec2::ZERO);
        assert_eq!(p.transform.rotation, 0.0);
        assert_eq!(p.burst.active_count(), 0);
    }

    #[test]
    fn trajectory_is_deterministic() {
        let script = |frame: u64| frame == 3 || frame == 40 || frame == 90;
        let mut a = player();
        let mut b = player();
        for frame in 0..200u64 {
            step(&mut a, script(frame));
            step(&mut b, script(frame));
            assert_eq!(a.transform, b.transform);
            assert_eq!(a.body, b.body);
        }
    }
}
