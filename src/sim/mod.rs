//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (load order of the obstacle lists)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collider;
pub mod easing;
pub mod level;
pub mod particles;
pub mod player;
pub mod state;
pub mod tick;

pub use camera::{FollowCamera, ScrollCamera};
pub use collider::{overlaps, Collider, Polygon, Rect, Shape};
pub use easing::{cubic_ease_out, EaseOut};
pub use level::{decode_map, load_map, LevelError, MapData};
pub use particles::{EmissionMode, Emitter, Particle, ParticleTemplate};
pub use player::{DynamicObject, GravityForce, Player};
pub use state::{Obstacle, ObjectStates, RunOutcome, SessionPhase, SessionState, Transform2D};
pub use tick::{tick, FrameInput};
