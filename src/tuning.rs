//! Data-driven game balance
//!
//! Every number that shapes how a run feels lives in `Tuning`, loadable
//! from JSON so balance passes don't need a recompile. Values are
//! per-frame at the fixed tick rate, not per-second.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::sim::particles::ParticleTemplate;

/// Vertical-follow camera behavior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowTuning {
    /// World y the camera considers "framed"; a player above it pulls
    /// the view up
    pub anchor_y: f32,
    /// Distance beyond which the camera ramps to catch-up speed
    pub far_distance: f32,
    /// Distance inside which the camera settles to rest
    pub dead_zone: f32,
    pub catch_up_speed: f32,
    pub base_speed: f32,
    /// Lerp factor blending current speed toward the zone target
    pub ramp_rate: f32,
}

/// Complete balance data for a gameplay session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// World scroll per frame
    pub scroll_speed: f32,
    /// Jump impulse magnitude (overwrites vertical velocity)
    pub jump_speed: f32,
    /// Gravity per frame during ascent/neutral
    pub gravity_up: f32,
    /// Gravity per frame while falling (post-apex or off an edge)
    pub gravity_fall: f32,
    /// Flip animation length for a jump (180° change)
    pub jump_rotation_frames: f32,
    /// Flip animation length for a fall (90° change)
    pub fall_rotation_frames: f32,
    /// Death-circle scale growth and length
    pub death_scale_change: f32,
    pub death_scale_frames: f32,
    /// Per-frame opacity step of the death/reset fade
    pub fade_step: f32,
    /// Extra reach of the collision-activation rectangle around the player
    pub activation_margin: f32,
    /// Trail emission rate, particles per frame (fractional rates carry)
    pub trail_rate: f32,
    pub follow: FollowTuning,
    pub trail_template: ParticleTemplate,
    pub burst_template: ParticleTemplate,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scroll_speed: 6.5,
            jump_speed: 13.5,
            gravity_up: 0.86,
            gravity_fall: 1.2,
            jump_rotation_frames: 24.0,
            fall_rotation_frames: 16.0,
            death_scale_change: 2.0,
            death_scale_frames: 20.0,
            fade_step: 0.05,
            activation_margin: 64.0,
            trail_rate: 0.7,
            follow: FollowTuning {
                anchor_y: 400.0,
                far_distance: 150.0,
                dead_zone: 8.0,
                catch_up_speed: 7.0,
                base_speed: 2.5,
                ramp_rate: 0.15,
            },
            trail_template: ParticleTemplate {
                direction: Vec2::new(-1.0, 0.0),
                spread: [-0.35, 0.35],
                speed: [1.0, 2.5],
                rotation: [0.0, 360.0],
                rotation_speed: [-3.0, 3.0],
                scale: [0.4, 0.8],
                scale_speed: [-0.02, -0.01],
                lifetime: [18, 30],
                spawn_radius: 6.0,
                force: Vec2::new(0.0, 0.04),
                color: [250, 250, 250, 200],
            },
            burst_template: ParticleTemplate {
                direction: Vec2::new(1.0, 0.0),
                spread: [-std::f32::consts::PI, std::f32::consts::PI],
                speed: [2.0, 7.0],
                rotation: [0.0, 360.0],
                rotation_speed: [-8.0, 8.0],
                scale: [0.6, 1.2],
                scale_speed: [-0.015, -0.008],
                lifetime: [30, 55],
                spawn_radius: 10.0,
                force: Vec2::new(0.0, 0.12),
                color: [235, 90, 54, 255],
            },
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults (with a
    /// warning) when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("loaded tuning from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("bad tuning file {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no tuning file at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
