//! Scroll and follow cameras
//!
//! Two independent offsets: the scroll camera drives world geometry
//! left at constant speed for the whole run, the follow camera frames
//! the player vertically with smoothed catch-up so the view never
//! snaps. Obstacle screen positions project through both.

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::lerp;
use crate::sim::collider::Rect;
use crate::tuning::FollowTuning;

/// Constant-rate world scroll. `position` only ever grows while the
/// session is running; obstacles subtract it to get camera-relative
/// positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCamera {
    pub position: Vec2,
    pub direction: Vec2,
    pub speed: Vec2,
    pub moving: bool,
}

impl ScrollCamera {
    pub fn new(speed: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::new(1.0, 0.0),
            speed: Vec2::new(speed, 0.0),
            moving: true,
        }
    }

    pub fn tick(&mut self) {
        if self.moving {
            self.position += self.direction * self.speed;
        }
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.moving = true;
    }
}

/// Vertical-follow camera with three-zone speed ramping.
///
/// The tracking speed (not the position) is the smoothed quantity:
/// far from the target it ramps toward the catch-up speed, close to it
/// it eases back toward the baseline rate, and inside the dead zone it
/// settles to rest. `position.y` is clamped to never exceed 0, so the
/// view never drops below the level's original framing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec2,
    speed: f32,
}

impl FollowCamera {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            speed: 0.0,
        }
    }

    pub fn reset(&mut self) {
        self.position = Vec2::ZERO;
        self.speed = 0.0;
    }

    pub fn tick(&mut self, player_y: f32, tuning: &FollowTuning) {
        // Player above the anchor line pulls the camera up (negative y)
        let target_y = (player_y - tuning.anchor_y).min(0.0);
        let delta = target_y - self.position.y;
        let distance = delta.abs();

        let target_speed = if distance > tuning.far_distance {
            tuning.catch_up_speed
        } else if distance > tuning.dead_zone {
            tuning.base_speed
        } else {
            0.0
        };
        self.speed = lerp(self.speed, target_speed, tuning.ramp_rate);

        if distance > f32::EPSILON {
            let step = self.speed.min(distance);
            self.position.y += delta.signum() * step;
        }
        self.position.y = self.position.y.min(0.0);
    }
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self::new()
    }
}

/// Project a world-space rectangle through both cameras into screen
/// space.
pub fn screen_rect(source: Vec2, half: Vec2, scroll: &ScrollCamera, follow: &FollowCamera) -> Rect {
    let center = source - scroll.position - follow.position;
    Rect::from_center_half(center, half)
}

/// Viewport bounds for visibility tests.
pub fn viewport() -> Rect {
    Rect::new(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn follow_tuning() -> FollowTuning {
        FollowTuning {
            anchor_y: 400.0,
            far_distance: 150.0,
            dead_zone: 8.0,
            catch_up_speed: 7.0,
            base_speed: 2.5,
            ramp_rate: 0.15,
        }
    }

    #[test]
    fn scroll_advances_by_speed_every_tick() {
        let mut cam = ScrollCamera::new(6.5);
        cam.tick();
        cam.tick();
        assert_eq!(cam.position, Vec2::new(13.0, 0.0));
    }

    #[test]
    fn scroll_holds_when_not_moving() {
        let mut cam = ScrollCamera::new(6.5);
        cam.moving = false;
        cam.tick();
        assert_eq!(cam.position, Vec2::ZERO);
    }

    #[test]
    fn follow_moves_toward_high_player_without_snapping() {
        let t = follow_tuning();
        let mut cam = FollowCamera::new();
        // Player far above the anchor line
        cam.tick(100.0, &t);
        let first = cam.position.y;
        assert!(first < 0.0 && first > -300.0, "smoothed, not snapped: {first}");
        for _ in 0..400 {
            cam.tick(100.0, &t);
        }
        assert!((cam.position.y - (-300.0)).abs() < 1.0);
    }

    #[test]
    fn follow_never_exceeds_baseline() {
        let t = follow_tuning();
        let mut cam = FollowCamera::new();
        // Player at or below the anchor keeps the camera at 0
        for _ in 0..100 {
            cam.tick(500.0, &t);
            assert!(cam.position.y <= 0.0);
        }
        assert_eq!(cam.position.y, 0.0);
    }

    #[test]
    fn follow_returns_to_baseline_after_descent() {
        let t = follow_tuning();
        let mut cam = FollowCamera::new();
        for _ in 0..400 {
            cam.tick(100.0, &t);
        }
        assert!(cam.position.y < -100.0);
        for _ in 0..600 {
            cam.tick(450.0, &t);
        }
        assert!(cam.position.y.abs() < 1.0);
    }

    #[test]
    fn screen_rect_projects_through_both_cameras() {
        let mut scroll = ScrollCamera::new(10.0);
        scroll.tick();
        let mut follow = FollowCamera::new();
        follow.position.y = -50.0;
        let r = screen_rect(Vec2::new(100.0, 200.0), Vec2::splat(16.0), &scroll, &follow);
        assert_eq!(r.min, Vec2::new(74.0, 234.0));
        assert_eq!(r.max, Vec2::new(106.0, 266.0));
    }
}
