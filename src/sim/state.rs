//! Session state and core simulation types
//!
//! Everything one gameplay session owns lives here: obstacles, player,
//! cameras, RNG, and the phase machine driving the death/reset fade.
//! Nothing is process-global, so multiple sessions can coexist and
//! tests never need a process-wide reset.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::CELL_SIZE;
use crate::sim::camera::{FollowCamera, ScrollCamera};
use crate::sim::collider::{Collider, Shape};
use crate::sim::level::MapData;
use crate::sim::player::Player;
use crate::tuning::Tuning;

/// Position, rotation (degrees) and uniform scale of a game entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
}

impl Transform2D {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: 1.0,
        }
    }
}

/// Per-obstacle lifecycle flags, toggled by the visibility pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectStates {
    /// Still part of the run; cleared permanently once the obstacle
    /// scrolls off the left edge
    pub active: bool,
    /// Has entered the viewport (one-way: scroll never backs up)
    pub in_screen: bool,
    /// Decoded from the upper half of the map; drawn hanging
    pub is_up: bool,
}

/// A level obstacle: hazard triangle or platform box.
///
/// `source_position` is the fixed pre-scroll world position; the
/// camera-relative position is recomputed from it every frame so
/// repeated projection never drifts.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub transform: Transform2D,
    pub collider: Collider,
    pub states: ObjectStates,
    pub source_position: Vec2,
}

impl Obstacle {
    pub fn hazard(center: Vec2, is_up: bool) -> Self {
        Self::new(Collider::hazard_tri(center, Vec2::splat(CELL_SIZE / 2.0)), center, is_up)
    }

    pub fn platform(center: Vec2, is_up: bool) -> Self {
        Self::new(Collider::rect(center, Vec2::splat(CELL_SIZE / 2.0)), center, is_up)
    }

    fn new(collider: Collider, center: Vec2, is_up: bool) -> Self {
        Self {
            transform: Transform2D::new(center),
            collider,
            states: ObjectStates {
                active: true,
                in_screen: false,
                is_up,
            },
            source_position: center,
        }
    }

    pub fn is_hazard(&self) -> bool {
        self.collider.shape == Shape::Triangle
    }

    /// Restore load-time state for a fresh attempt.
    pub fn reset(&mut self) {
        self.states.active = true;
        self.states.in_screen = false;
        self.collider.active = false;
        self.collider.set_center(self.source_position);
        self.transform.position = self.source_position;
    }
}

/// Why the session wants to leave the gameplay screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The scroll camera covered the whole level
    Completed,
    /// The player backed out to the menu
    Abandoned,
}

/// Session phase machine. Fades are frame-counter state advancement,
/// not concurrency: one phase per tick, always terminating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Update suspended, draw unaffected
    Paused,
    /// Death or manual reset: overlay alpha rising to 1
    FadingOut,
    /// Attempt restarted: overlay alpha falling back to 0
    FadingIn,
    /// Finish signal raised; waiting for the screen layer
    Complete,
}

/// Complete per-session state, owned exclusively by the orchestrator's
/// single update pass.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: SessionPhase,
    /// 1-based: the first run is attempt 1
    pub attempts: u32,
    pub frames: u64,
    /// Death/reset overlay opacity in [0, 1]
    pub fade_alpha: f32,
    /// Scroll progress through the level in [0, 1]
    pub progress: f32,
    pub outcome: Option<RunOutcome>,
    pub player: Player,
    pub scroll: ScrollCamera,
    pub follow: FollowCamera,
    pub hazards: Vec<Obstacle>,
    pub platforms: Vec<Obstacle>,
    pub level_width: f32,
}

impl SessionState {
    pub fn new(seed: u64, map: MapData, tuning: &Tuning) -> Self {
        log::info!(
            "session start: seed={seed}, {} hazards, {} platforms, level width {:.0}px",
            map.hazards.len(),
            map.platforms.len(),
            map.width_px
        );
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Running,
            attempts: 1,
            frames: 0,
            fade_alpha: 0.0,
            progress: 0.0,
            outcome: None,
            player: Player::new(tuning),
            scroll: ScrollCamera::new(tuning.scroll_speed),
            follow: FollowCamera::new(),
            hazards: map.hazards,
            platforms: map.platforms,
            level_width: map.width_px,
        }
    }

    /// Restart the attempt in place: obstacles back to load-time flags,
    /// cameras re-zeroed, player repositioned, counter bumped.
    pub fn reset_attempt(&mut self) {
        for obstacle in self.hazards.iter_mut().chain(self.platforms.iter_mut()) {
            obstacle.reset();
        }
        self.scroll.reset();
        self.follow.reset();
        self.player.respawn();
        self.progress = 0.0;
        self.attempts += 1;
        log::info!("attempt {}", self.attempts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_map() -> MapData {
        MapData {
            hazards: vec![Obstacle::hazard(Vec2::new(400.0, 560.0), false)],
            platforms: vec![Obstacle::platform(Vec2::new(600.0, 560.0), false)],
            width_px: 1024.0,
        }
    }

    #[test]
    fn reset_attempt_restores_flags_and_bumps_counter() {
        let tuning = Tuning::default();
        let mut state = SessionState::new(7, tiny_map(), &tuning);

        state.hazards[0].states.active = false;
        state.hazards[0].states.in_screen = true;
        state.platforms[0].collider.active = true;
        state.scroll.position.x = 500.0;
        state.player.kill();

        state.reset_attempt();

        assert_eq!(state.attempts, 2);
        assert!(state.hazards[0].states.active);
        assert!(!state.hazards[0].states.in_screen);
        assert!(!state.platforms[0].collider.active);
        assert_eq!(state.scroll.position, Vec2::ZERO);
        assert!(state.player.alive);
    }

    #[test]
    fn obstacle_reset_reprojects_collider_to_source() {
        let mut obstacle = Obstacle::platform(Vec2::new(100.0, 100.0), false);
        obstacle.collider.set_center(Vec2::new(-50.0, 100.0));
        obstacle.reset();
        assert_eq!(obstacle.collider.center(), Vec2::new(100.0, 100.0));
        assert_eq!(
            obstacle.collider.polygon.bounds(),
            obstacle.collider.bounds()
        );
    }
}
