// Verlet ribbon chains blown by the shared wind signal.
//
// The constraint pass is deliberately soft: each iteration applies only a
// fraction of the full correction, which is what gives the chains their
// silk-like drape instead of rope stiffness.

use crate::config::{RibbonParams, WindConfig};
use crate::wind::{self, IndividualWindPhase, WindSample};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Static per-ribbon parameters, fixed for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RibbonDefinition {
    pub color: [f32; 4],
    pub stroke_width: f32,
    pub opacity: f32,
    /// Target length in canvas units; segment count follows from spacing.
    pub length: f32,
    /// Inverse wind sensitivity: lighter ribbons move more.
    pub weight: f32,
    /// How much the ribbon bends and flows.
    pub flexibility: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub position: Vec2,
    pub previous: Vec2,
    pub pinned: bool,
}

/// One simulated particle chain. Segment 0 is pinned to the anchor supplied
/// each tick; everything downstream integrates freely.
pub struct RibbonChain {
    pub def: RibbonDefinition,
    index: usize,
    /// Signed offset from the center of the ribbon set, in ribbon slots.
    lateral: f32,
    segments: Vec<Segment>,
    phase: IndividualWindPhase,
}

impl RibbonChain {
    pub fn new(
        def: RibbonDefinition,
        index: usize,
        set_size: usize,
        anchor: Vec2,
        params: &RibbonParams,
        wind_config: &WindConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let count = ((def.length / params.segment_spacing).floor() as usize).max(2);
        let lateral = index as f32 - (set_size.max(1) as f32 - 1.0) / 2.0;
        let root = anchor + Vec2::new(lateral * params.anchor_spread, 0.0);
        let segments = (0..count)
            .map(|i| {
                let position = root + Vec2::new(0.0, i as f32 * params.segment_spacing);
                Segment {
                    position,
                    previous: position,
                    pinned: i == 0,
                }
            })
            .collect();
        Self {
            def,
            index,
            lateral,
            segments,
            phase: IndividualWindPhase::new(wind_config, rng),
        }
    }

    /// Advance the chain one tick.
    pub fn step(
        &mut self,
        anchor: Vec2,
        sample: &WindSample,
        pointer: Vec2,
        params: &RibbonParams,
        wind_config: &WindConfig,
        rng: &mut impl Rng,
    ) {
        if let Some(first) = self.segments.first_mut() {
            first.position = anchor + Vec2::new(self.lateral * params.anchor_spread, 0.0);
        }

        self.phase.update(sample.timestamp_ms, wind_config, rng);

        // Pointer influence is gauged at the anchor and falls off linearly.
        let pointer_influence =
            (1.0 - pointer.distance(anchor) / params.pointer_radius).max(0.0)
                * params.pointer_strength;

        let count = self.segments.len() as f32;
        let t = (sample.timestamp_ms * 0.001) as f32;
        let damping = params.base_damping - self.def.flexibility * params.damping_flexibility_factor;
        let phase = self.phase;

        for (i, segment) in self.segments.iter_mut().enumerate() {
            if segment.pinned {
                continue;
            }

            let velocity = segment.position - segment.previous;
            segment.previous = segment.position;
            segment.position += velocity * damping + Vec2::new(0.0, params.gravity);

            // Influence grows toward the free end.
            let progression = (i as f32 / count).powf(0.8);

            let force = wind::force_at(sample, segment.position, self.def.weight, self.def.flexibility);
            segment.position += force * progression;

            // Secondary undulation, only while the wind is actually up, so a
            // calm ribbon hangs still instead of shimmering in place. The
            // individual phase keeps the set out of lockstep.
            if sample.strength > 0.01 {
                let wave_x = (t * 0.5 + i as f32 * 0.1 + phase.phase).sin()
                    * self.def.flexibility
                    * phase.amplitude
                    * progression;
                let wave_y = (t * 0.3 + i as f32 * 0.08 + phase.phase * 1.5).cos()
                    * self.def.flexibility
                    * (phase.amplitude / 3.0)
                    * progression;
                segment.position += Vec2::new(wave_x, wave_y);
            }

            if pointer_influence > 0.0 {
                let away = segment.position - pointer;
                let distance = away.length().max(1.0);
                segment.position += Vec2::new(
                    away.x / distance * pointer_influence * progression,
                    away.y / distance * pointer_influence * progression * 0.5,
                );
            }
        }

        self.relax(params);
    }

    /// Soft distance-constraint pass. Coincident segments are skipped for the
    /// iteration instead of dividing by zero.
    fn relax(&mut self, params: &RibbonParams) {
        let softness = 0.3 + self.def.flexibility * 0.1;
        for _ in 0..params.constraint_iterations {
            for i in 1..self.segments.len() {
                let (head, tail) = self.segments.split_at_mut(i);
                let first = &mut head[i - 1];
                let second = &mut tail[0];

                let delta = second.position - first.position;
                let distance = delta.length();
                if distance <= f32::EPSILON {
                    continue;
                }

                let difference = params.segment_spacing - distance;
                let correction = delta * (difference / distance) * softness;
                if !first.pinned {
                    first.position -= correction;
                }
                if !second.pinned {
                    second.position += correction;
                }
            }
        }
    }

    /// Drawable points for this tick: cosmetic lateral fan-out and a
    /// wind-gated traveling wave layered on the simulated positions, then
    /// midpoint-quadratic smoothing. None of this feeds back into `step`.
    pub fn path(&self, now_ms: f64, wind_strength: f32, params: &RibbonParams) -> Vec<Vec2> {
        let t = (now_ms * 0.001) as f32;
        let count = self.segments.len() as f32;
        let points: Vec<Vec2> = self
            .segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let start_x = if i == 0 { self.lateral * 2.0 } else { 0.0 };
                let start_y = if i == 0 { self.lateral * 0.5 } else { 0.0 };

                let spread = (i as f32 / count).powf(1.5);
                let offset_x = start_x + self.lateral * params.fan_spread * spread;

                let ratio = i as f32 / count;
                let wave = if wind_strength > 0.01 {
                    (ratio * PI * 1.2 + t * 0.4 + self.index as f32 * 0.3).sin()
                        * self.def.flexibility
                        * 1.5
                        * ratio
                } else {
                    0.0
                };

                Vec2::new(
                    segment.position.x + offset_x + wave,
                    segment.position.y + start_y,
                )
            })
            .collect();
        smooth_polyline(&points, params.smoothing_samples)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

/// Densify a polyline with quadratic spans through consecutive midpoints,
/// keeping the original endpoints.
pub fn smooth_polyline(points: &[Vec2], samples_per_span: usize) -> Vec<Vec2> {
    if points.len() < 3 || samples_per_span == 0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len() * samples_per_span + 2);
    out.push(points[0]);
    let mut cursor = points[0];
    for i in 1..points.len() - 1 {
        let control = points[i];
        let end = (points[i] + points[i + 1]) * 0.5;
        for s in 1..=samples_per_span {
            let t = s as f32 / samples_per_span as f32;
            let u = 1.0 - t;
            out.push(cursor * (u * u) + control * (2.0 * u * t) + end * (t * t));
        }
        cursor = end;
    }
    out.push(points[points.len() - 1]);
    out
}
