//! Prism Run - an auto-scrolling tap-to-jump platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, SAT collisions, cameras, particles)
//! - `platform`: Narrow interface to the rendering/input collaborator
//! - `screen`: Gameplay screen lifecycle (Init/Update/Draw/Unload/Finish)
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod screen;
pub mod sim;
pub mod tuning;

pub use screen::{GameplayScreen, ScreenExit};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (ticks per second); physics constants are
    /// tuned per-frame at this rate and are not delta-time scaled.
    pub const TICK_RATE: u32 = 60;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 576.0;

    /// Map grid cell size in world pixels
    pub const CELL_SIZE: f32 = 32.0;

    /// World y of the ground line (player and bottom map row rest here)
    pub const GROUND_Y: f32 = SCREEN_HEIGHT;

    /// Player collision box edge length
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Fixed screen-space x of the player center
    pub const PLAYER_X: f32 = 200.0;

    /// Particle pool capacities
    pub const TRAIL_POOL: usize = 64;
    pub const BURST_POOL: usize = 32;
}

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
