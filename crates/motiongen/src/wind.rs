// Shared oscillating wind signal and the force model derived from it.
//
// One WindModel is owned per scene and advanced exactly once per tick; every
// consumer works from the returned snapshot.

use crate::config::WindConfig;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;

/// Snapshot of the wind signal at one tick.
#[derive(Debug, Clone, Copy)]
pub struct WindSample {
    pub strength: f32,
    pub target_strength: f32,
    /// Unit direction; z is carried for hosts that project into depth.
    pub direction: Vec3,
    /// Bounded roughness factor in [0.4, 1.0], independent of strength.
    pub turbulence: f32,
    pub is_blowing: bool,
    pub last_change_ms: f64,
    pub timestamp_ms: f64,
}

impl Default for WindSample {
    fn default() -> Self {
        Self {
            strength: 0.0,
            target_strength: 0.0,
            direction: Vec3::X,
            turbulence: 0.0,
            is_blowing: false,
            last_change_ms: 0.0,
            timestamp_ms: 0.0,
        }
    }
}

pub type ListenerId = u64;

/// Slowly oscillating wind state shared by all ribbons (and whatever else a
/// host points at it). Time is injected through `advance`, randomness through
/// the owned generator, so a seeded model replays identically.
pub struct WindModel {
    sample: WindSample,
    config: WindConfig,
    next_interval_ms: f64,
    started: bool,
    rng: StdRng,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&WindSample) + Send + Sync>)>,
    next_listener_id: ListenerId,
}

impl WindModel {
    pub fn new(config: WindConfig) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        Self::with_rng(config, rng)
    }

    pub fn seeded(config: WindConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WindConfig, mut rng: StdRng) -> Self {
        let next_interval_ms =
            rng.random_range(config.change_interval_min_ms..config.change_interval_max_ms);
        Self {
            sample: WindSample::default(),
            config,
            next_interval_ms,
            started: false,
            rng,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Advance the signal to `now_ms` and return the new snapshot.
    ///
    /// Flips `is_blowing` once the drawn interval elapses (a fresh interval is
    /// drawn at each flip), then relaxes `strength` toward `target_strength`
    /// geometrically. Listeners are notified synchronously at the end.
    pub fn advance(&mut self, now_ms: f64) -> WindSample {
        if !self.started {
            self.started = true;
            self.sample.last_change_ms = now_ms;
        }

        if now_ms - self.sample.last_change_ms > self.next_interval_ms {
            self.sample.is_blowing = !self.sample.is_blowing;
            self.sample.target_strength = if self.sample.is_blowing {
                self.rng
                    .random_range(self.config.strength_min..self.config.strength_max)
            } else {
                0.0
            };
            self.sample.last_change_ms = now_ms;
            self.next_interval_ms = self.rng.random_range(
                self.config.change_interval_min_ms..self.config.change_interval_max_ms,
            );
        }

        self.sample.strength +=
            (self.sample.target_strength - self.sample.strength) * self.config.transition_speed;
        self.sample.turbulence = 0.7 + 0.3 * ((now_ms * 0.001).sin() as f32);
        self.sample.timestamp_ms = now_ms;

        let snapshot = self.sample;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&snapshot);
        }
        snapshot
    }

    /// Zero vectors are ignored rather than producing a NaN direction.
    pub fn set_direction(&mut self, direction: Vec3) {
        if let Some(unit) = direction.try_normalize() {
            self.sample.direction = unit;
        }
    }

    pub fn current(&self) -> WindSample {
        self.sample
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WindConfig) {
        self.config = config;
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&WindSample) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Wind force on a point in canvas space.
///
/// # Arguments
/// * `sample` - Current wind snapshot
/// * `position` - Point the force is evaluated at, canvas units
/// * `weight` - Inverse sensitivity; lighter objects move more
/// * `flexibility` - Bend/flow sensitivity of the consumer
///
/// # Returns
/// Displacement to apply this tick. The vertical component is damped so wind
/// reads as mostly lateral.
pub fn force_at(sample: &WindSample, position: Vec2, weight: f32, flexibility: f32) -> Vec2 {
    let weight_factor = 2.0 - weight;

    // Vertical position modulates the force as a traveling wave rather than a
    // uniform push.
    let height_factor = position.y / 400.0;
    let variation =
        (height_factor * PI * 2.0 + (sample.timestamp_ms * 0.0008) as f32).sin() * 0.3 + 0.7;

    let force = sample.strength * weight_factor * variation * sample.turbulence;
    Vec2::new(
        sample.direction.x * force * flexibility,
        sample.direction.y * force * flexibility * 0.3,
    )
}

/// Per-consumer phase layered on the shared signal so individual ribbons and
/// blades never move in lockstep. Rarely re-randomized.
#[derive(Debug, Clone, Copy)]
pub struct IndividualWindPhase {
    pub phase: f32,
    pub amplitude: f32,
    pub frequency: f32,
    last_update_ms: f64,
}

impl IndividualWindPhase {
    pub fn new(config: &WindConfig, rng: &mut impl Rng) -> Self {
        Self {
            phase: rng.random_range(0.0..PI * 2.0),
            amplitude: rng
                .random_range(config.individual_amplitude_min..config.individual_amplitude_max),
            frequency: rng
                .random_range(config.individual_frequency_min..config.individual_frequency_max),
            last_update_ms: 0.0,
        }
    }

    pub fn update(&mut self, now_ms: f64, config: &WindConfig, rng: &mut impl Rng) {
        let dt = ((now_ms - self.last_update_ms) * 0.001) as f32;
        self.phase += self.frequency * dt;
        self.last_update_ms = now_ms;

        // 0.1% chance per frame to drift to a new character.
        if rng.random_bool(0.001) {
            self.amplitude = rng
                .random_range(config.individual_amplitude_min..config.individual_amplitude_max);
            self.frequency = rng
                .random_range(config.individual_frequency_min..config.individual_frequency_max);
        }
    }
}
