//! Pooled particle emitters
//!
//! Fixed-capacity pools owned by each emitter: spawn claims the first
//! inactive slot, expiry marks the slot reusable, nothing is freed
//! until the owning session drops. All randomized spawn parameters are
//! drawn from per-field `[min, max]` template ranges through the
//! session RNG, so runs replay identically from the same seed.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Per-field spawn ranges for an emitter. Each particle draws its own
/// values uniformly from these on spawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleTemplate {
    /// Base emission direction (unit vector)
    pub direction: Vec2,
    /// Angular spread around `direction`, radians
    pub spread: [f32; 2],
    /// Initial speed magnitude
    pub speed: [f32; 2],
    /// Initial rotation, degrees
    pub rotation: [f32; 2],
    /// Per-frame rotation rate, degrees
    pub rotation_speed: [f32; 2],
    /// Initial scale
    pub scale: [f32; 2],
    /// Per-frame scale rate (negative shrinks)
    pub scale_speed: [f32; 2],
    /// Lifetime in frames
    pub lifetime: [u32; 2],
    /// Spawn offset radius around the anchor (0 = exactly at anchor)
    pub spawn_radius: f32,
    /// Constant per-frame force accumulated into velocity
    pub force: Vec2,
    /// Particle tint
    pub color: [u8; 4],
}

/// One pooled particle slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub rotation: f32,
    pub scale: f32,
    pub direction: Vec2,
    pub velocity: Vec2,
    pub rotation_speed: f32,
    pub scale_speed: f32,
    /// Remaining frames; 0 means the slot is free
    pub lifetime: u32,
    pub color: [u8; 4],
    pub active: bool,
}

impl Particle {
    fn idle() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: 0.0,
            direction: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation_speed: 0.0,
            scale_speed: 0.0,
            lifetime: 0,
            color: [0; 4],
            active: false,
        }
    }
}

/// How the emitter releases particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmissionMode {
    /// Trickle at `rate` particles per frame (fractional rates carry
    /// their remainder to the next frame).
    Continuous,
    /// Spawn the entire pool in one activation; never refires until
    /// re-armed.
    Burst,
}

/// A pooled, fixed-capacity particle spawner/updater.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    pub template: ParticleTemplate,
    pub mode: EmissionMode,
    /// Particles per frame (Continuous mode)
    pub rate: f32,
    /// Whether the emitter spawns this frame; active particles keep
    /// ticking either way
    pub active: bool,
    pool: Vec<Particle>,
    /// Fractional remainder accumulator for non-integer rates
    carry: f32,
    burst_fired: bool,
}

impl Emitter {
    pub fn new(capacity: usize, template: ParticleTemplate, mode: EmissionMode, rate: f32) -> Self {
        Self {
            template,
            mode,
            rate,
            active: false,
            pool: vec![Particle::idle(); capacity],
            carry: 0.0,
            burst_fired: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.pool.len()
    }

    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|p| p.active).count()
    }

    /// Iterate the live particles (for the draw pass).
    pub fn particles(&self) -> impl Iterator<Item = &Particle> {
        self.pool.iter().filter(|p| p.active)
    }

    /// Ready the emitter for a fresh activation: retires every slot and
    /// clears the burst latch and rate remainder.
    pub fn rearm(&mut self) {
        for p in &mut self.pool {
            p.active = false;
            p.lifetime = 0;
        }
        self.carry = 0.0;
        self.burst_fired = false;
        self.active = false;
    }

    /// Advance the emitter one frame: spawn according to the emission
    /// mode, then integrate every live particle.
    pub fn tick(&mut self, anchor: Vec2, rng: &mut Pcg32) {
        if self.active {
            match self.mode {
                EmissionMode::Continuous => {
                    let budget = self.rate + self.carry;
                    let count = budget.floor() as usize;
                    self.carry = budget - count as f32;
                    for _ in 0..count {
                        // Saturated pool: drop silently
                        if !self.spawn(anchor, rng) {
                            break;
                        }
                    }
                }
                EmissionMode::Burst => {
                    if !self.burst_fired {
                        self.burst_fired = true;
                        while self.spawn(anchor, rng) {}
                    }
                }
            }
        }

        let force = self.template.force;
        for p in &mut self.pool {
            if !p.active {
                continue;
            }
            p.velocity += force;
            p.position += p.velocity;
            p.rotation += p.rotation_speed;
            p.scale = (p.scale + p.scale_speed).max(0.0);
            p.lifetime -= 1;
            if p.lifetime == 0 {
                p.active = false;
            }
        }
    }

    fn spawn(&mut self, anchor: Vec2, rng: &mut Pcg32) -> bool {
        let Some(slot) = self.pool.iter_mut().find(|p| !p.active) else {
            return false;
        };
        let t = &self.template;

        let spread = sample(rng, t.spread);
        let angle = t.direction.y.atan2(t.direction.x) + spread;
        let speed = sample(rng, t.speed);
        let velocity = Vec2::new(angle.cos(), angle.sin()) * speed;

        let position = if t.spawn_radius > 0.0 {
            let theta = rng.random_range(0.0..TAU);
            let r = rng.random_range(0.0..=t.spawn_radius);
            anchor + Vec2::new(theta.cos(), theta.sin()) * r
        } else {
            anchor
        };

        *slot = Particle {
            position,
            rotation: sample(rng, t.rotation),
            scale: sample(rng, t.scale),
            direction: Vec2::new(angle.cos(), angle.sin()),
            velocity,
            rotation_speed: sample(rng, t.rotation_speed),
            scale_speed: sample(rng, t.scale_speed),
            lifetime: sample_frames(rng, t.lifetime),
            color: t.color,
            active: true,
        };
        true
    }
}

fn sample(rng: &mut Pcg32, range: [f32; 2]) -> f32 {
    if range[0] >= range[1] {
        range[0]
    } else {
        rng.random_range(range[0]..=range[1])
    }
}

fn sample_frames(rng: &mut Pcg32, range: [u32; 2]) -> u32 {
    let lo = range[0].max(1);
    let hi = range[1].max(lo);
    if lo == hi { lo } else { rng.random_range(lo..=hi) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn template() -> ParticleTemplate {
        ParticleTemplate {
            direction: Vec2::new(-1.0, 0.0),
            spread: [-0.4, 0.4],
            speed: [1.0, 3.0],
            rotation: [0.0, 360.0],
            rotation_speed: [-4.0, 4.0],
            scale: [0.5, 1.0],
            scale_speed: [-0.01, -0.005],
            lifetime: [200, 200],
            spawn_radius: 4.0,
            force: Vec2::new(0.0, 0.05),
            color: [255, 255, 255, 255],
        }
    }

    #[test]
    fn pool_capacity_is_never_exceeded() {
        let mut t = template();
        t.lifetime = [3, 6];
        let mut e = Emitter::new(16, t, EmissionMode::Continuous, 10.0);
        e.active = true;
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            e.tick(Vec2::ZERO, &mut rng);
            assert!(e.active_count() <= e.capacity());
        }
    }

    #[test]
    fn fractional_rate_long_run_average() {
        // 0.7/frame over 100 frames must spawn 70 or 71, not more
        let mut e = Emitter::new(128, template(), EmissionMode::Continuous, 0.7);
        e.active = true;
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..100 {
            e.tick(Vec2::ZERO, &mut rng);
        }
        // Lifetime 200 frames, so nothing has expired yet
        let spawned = e.active_count();
        assert!(
            (70..=71).contains(&spawned),
            "expected 70..=71 spawns, got {spawned}"
        );
    }

    #[test]
    fn burst_spawns_whole_pool_exactly_once() {
        let mut t = template();
        t.lifetime = [2, 2];
        let mut e = Emitter::new(32, t, EmissionMode::Burst, 0.0);
        e.active = true;
        let mut rng = Pcg32::seed_from_u64(3);
        e.tick(Vec2::ZERO, &mut rng);
        assert_eq!(e.active_count(), 32);
        // Pool drains after lifetime and is not refilled within the activation
        e.tick(Vec2::ZERO, &mut rng);
        e.tick(Vec2::ZERO, &mut rng);
        assert_eq!(e.active_count(), 0);
        e.tick(Vec2::ZERO, &mut rng);
        assert_eq!(e.active_count(), 0);
    }

    #[test]
    fn rearm_allows_a_second_burst() {
        let mut e = Emitter::new(8, template(), EmissionMode::Burst, 0.0);
        e.active = true;
        let mut rng = Pcg32::seed_from_u64(3);
        e.tick(Vec2::ZERO, &mut rng);
        assert_eq!(e.active_count(), 8);
        e.rearm();
        assert_eq!(e.active_count(), 0);
        e.active = true;
        e.tick(Vec2::ZERO, &mut rng);
        assert_eq!(e.active_count(), 8);
    }

    #[test]
    fn seeded_emission_is_deterministic() {
        let mut a = Emitter::new(32, template(), EmissionMode::Continuous, 1.3);
        let mut b = Emitter::new(32, template(), EmissionMode::Continuous, 1.3);
        a.active = true;
        b.active = true;
        let mut rng_a = Pcg32::seed_from_u64(99);
        let mut rng_b = Pcg32::seed_from_u64(99);
        for _ in 0..50 {
            a.tick(Vec2::new(10.0, 20.0), &mut rng_a);
            b.tick(Vec2::new(10.0, 20.0), &mut rng_b);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn particles_accumulate_force() {
        let mut t = template();
        t.spread = [0.0, 0.0];
        t.speed = [2.0, 2.0];
        t.spawn_radius = 0.0;
        t.force = Vec2::new(0.0, 1.0);
        let mut e = Emitter::new(4, t, EmissionMode::Continuous, 1.0);
        e.active = true;
        let mut rng = Pcg32::seed_from_u64(1);
        e.tick(Vec2::ZERO, &mut rng);
        e.active = false;
        let v0 = e.particles().next().unwrap().velocity;
        e.tick(Vec2::ZERO, &mut rng);
        let v1 = e.particles().next().unwrap().velocity;
        assert_eq!(v1 - v0, Vec2::new(0.0, 1.0));
    }
}
