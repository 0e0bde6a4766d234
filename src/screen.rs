//! Gameplay screen lifecycle
//!
//! The object the screen/transition layer above the core drives once
//! per frame: `update` advances the simulation, `draw` is a pure
//! render of the current state through the `DrawSurface` primitives,
//! `finish` reports when the session wants to leave (run completed or
//! abandoned). Load failures surface as errors so the caller can fall
//! back to a safe screen instead of crashing mid-transition.

use std::error::Error;
use std::fmt;
use std::path::Path;

use glam::Vec2;

use crate::consts::{CELL_SIZE, PLAYER_SIZE, SCREEN_WIDTH};
use crate::platform::{Color, DrawSurface, ResourceError, TextureId, TextureStore};
use crate::sim::camera::{screen_rect, viewport};
use crate::sim::collider::Rect;
use crate::sim::level::{load_map, LevelError, MapData};
use crate::sim::particles::Particle;
use crate::sim::state::{Obstacle, SessionPhase, SessionState};
use crate::sim::tick::{tick, FrameInput};
use crate::tuning::Tuning;

pub use crate::sim::state::RunOutcome as ScreenExit;

/// Anything that can stop the gameplay screen from loading.
#[derive(Debug)]
pub enum LoadError {
    Level(LevelError),
    Texture(ResourceError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Level(e) => write!(f, "level load failed: {e}"),
            LoadError::Texture(e) => write!(f, "texture load failed: {e}"),
        }
    }
}

impl Error for LoadError {}

impl From<LevelError> for LoadError {
    fn from(e: LevelError) -> Self {
        LoadError::Level(e)
    }
}

impl From<ResourceError> for LoadError {
    fn from(e: ResourceError) -> Self {
        LoadError::Texture(e)
    }
}

/// Texture handles the gameplay screen owns for its lifetime.
#[derive(Debug, Clone, Copy)]
struct Textures {
    background: TextureId,
    player: TextureId,
    hazard: TextureId,
    platform: TextureId,
    particle: TextureId,
}

/// One gameplay session, from fade-in to finish signal.
#[derive(Debug)]
pub struct GameplayScreen {
    state: SessionState,
    tuning: Tuning,
    textures: Textures,
}

impl GameplayScreen {
    /// Load the map and textures and start a session.
    pub fn init(
        map_path: &Path,
        assets_dir: &Path,
        seed: u64,
        tuning: Tuning,
        store: &mut dyn TextureStore,
    ) -> Result<Self, LoadError> {
        let map = load_map(map_path)?;
        Self::with_map(map, assets_dir, seed, tuning, store)
    }

    /// Start a session from an already-decoded map.
    pub fn with_map(
        map: MapData,
        assets_dir: &Path,
        seed: u64,
        tuning: Tuning,
        store: &mut dyn TextureStore,
    ) -> Result<Self, LoadError> {
        let textures = Textures {
            background: store.load_texture(&assets_dir.join("background.png"))?,
            player: store.load_texture(&assets_dir.join("player.png"))?,
            hazard: store.load_texture(&assets_dir.join("hazard.png"))?,
            platform: store.load_texture(&assets_dir.join("platform.png"))?,
            particle: store.load_texture(&assets_dir.join("particle.png"))?,
        };
        Ok(Self {
            state: SessionState::new(seed, map, &tuning),
            tuning,
            textures,
        })
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &FrameInput) {
        tick(&mut self.state, input, &self.tuning);
    }

    /// Render the current state. Pure: no simulation mutation.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        let state = &self.state;
        let follow = state.follow.position;

        // Backdrop (assets are authored at viewport size)
        surface.draw_texture(self.textures.background, viewport(), viewport(), 0.0, Color::WHITE);

        for obstacle in state.hazards.iter().chain(state.platforms.iter()) {
            self.draw_obstacle(surface, obstacle);
        }

        // Trail sits under the player, the death burst above it
        for p in state.player.trail.particles() {
            draw_particle(surface, self.textures.particle, p, follow);
        }

        if state.player.alive {
            let pos = state.player.transform.position - follow;
            let half = PLAYER_SIZE / 2.0 * state.player.transform.scale;
            surface.draw_texture(
                self.textures.player,
                sprite_source(false),
                Rect::from_center_half(pos, Vec2::splat(half)),
                state.player.transform.rotation,
                Color::WHITE,
            );
        } else {
            // Death circle grows with the scale easing
            let pos = state.player.transform.position - follow;
            let radius = PLAYER_SIZE / 2.0 * state.player.transform.scale;
            surface.draw_circle(pos, radius, Color::rgba(235, 90, 54, 255));
        }

        for p in state.player.burst.particles() {
            draw_particle(surface, self.textures.particle, p, follow);
        }

        self.draw_hud(surface);

        if state.fade_alpha > 0.0 {
            surface.draw_rect(viewport(), Color::BLACK.faded(state.fade_alpha));
        }
    }

    fn draw_obstacle(&self, surface: &mut dyn DrawSurface, obstacle: &Obstacle) {
        if !obstacle.states.active || !obstacle.states.in_screen {
            return;
        }
        let dest = screen_rect(
            obstacle.source_position,
            Vec2::splat(CELL_SIZE / 2.0),
            &self.state.scroll,
            &self.state.follow,
        );
        let texture = if obstacle.is_hazard() {
            self.textures.hazard
        } else {
            self.textures.platform
        };
        surface.draw_texture(texture, sprite_source(obstacle.states.is_up), dest, 0.0, Color::WHITE);
    }

    fn draw_hud(&self, surface: &mut dyn DrawSurface) {
        let state = &self.state;

        // Progress bar along the top edge
        let bar = Rect::new(Vec2::new(12.0, 12.0), Vec2::new(SCREEN_WIDTH - 12.0, 22.0));
        surface.draw_rect_outline(bar, Color::WHITE);
        let filled_w = (bar.max.x - bar.min.x) * state.progress;
        surface.draw_rect(
            Rect::new(bar.min, Vec2::new(bar.min.x + filled_w, bar.max.y)),
            Color::WHITE,
        );

        surface.draw_text(
            &format!("ATTEMPT {}", state.attempts),
            Vec2::new(12.0, 32.0),
            20.0,
            Color::WHITE,
        );

        if state.phase == SessionPhase::Paused {
            surface.draw_text(
                "PAUSED",
                Vec2::new(SCREEN_WIDTH / 2.0 - 48.0, 60.0),
                32.0,
                Color::WHITE,
            );
        }
    }

    /// Release everything the session holds on the platform side.
    pub fn unload(&mut self, store: &mut dyn TextureStore) {
        for id in [
            self.textures.background,
            self.textures.player,
            self.textures.hazard,
            self.textures.platform,
            self.textures.particle,
        ] {
            store.unload_texture(id);
        }
        log::info!("gameplay screen unloaded after {} attempts", self.state.attempts);
    }

    /// The session's finish signal for the transition layer.
    pub fn finish(&self) -> Option<ScreenExit> {
        match self.state.phase {
            SessionPhase::Complete => self.state.outcome,
            _ => None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
}

/// Source rect of a cell-sized sprite; an `is_up` obstacle flips
/// vertically by inverting the source's y extent.
fn sprite_source(flip_y: bool) -> Rect {
    if flip_y {
        Rect::new(Vec2::new(0.0, CELL_SIZE), Vec2::new(CELL_SIZE, 0.0))
    } else {
        Rect::new(Vec2::ZERO, Vec2::splat(CELL_SIZE))
    }
}

fn draw_particle(surface: &mut dyn DrawSurface, texture: TextureId, p: &Particle, follow: Vec2) {
    let half = 4.0 * p.scale;
    if half <= 0.0 {
        return;
    }
    surface.draw_texture(
        texture,
        sprite_source(false),
        Rect::from_center_half(p.position - follow, Vec2::splat(half)),
        p.rotation,
        Color::from_array(p.color),
    );
}
