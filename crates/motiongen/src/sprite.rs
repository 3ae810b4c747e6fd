// Autonomous glow sprites: slow meandering, pointer-triggered Bézier dashes,
// content-card avoidance, toroidal wraparound.

use crate::config::SpriteConfig;
use crate::rect::Rect;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;

/// Transient dash trajectory. At most one per sprite; destroyed when the
/// progress parameter reaches 1.
#[derive(Debug, Clone, Copy)]
pub struct ActiveArc {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub p3: Vec2,
    pub start_ms: f64,
    pub duration_ms: f64,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub color: [f32; 4],
    pub opacity: f32,
    pub glow_radius: f32,
    pub phase: f32,
    pub speed: f32,
    pub heading: f32,
    pub turn_rate: f32,
    pub arc: Option<ActiveArc>,
    pub cooldown_until_ms: f64,
}

/// Per-sprite draw instructions for one frame.
#[derive(Debug, Clone, Copy)]
pub struct SpriteFrame {
    pub position: Vec2,
    pub core_radius: f32,
    pub glow_radius: f32,
    pub color: [f32; 4],
    pub pulse_opacity: f32,
    /// False while the sprite sits over the content card; it keeps simulating
    /// but must not be painted this frame.
    pub visible: bool,
}

impl SpriteFrame {
    /// Radial gradient stops for the glow: full color at the center, fading
    /// out completely at the glow radius.
    pub fn glow_stops(&self) -> [(f32, [f32; 4]); 3] {
        let [r, g, b, _] = self.color;
        [
            (0.0, [r, g, b, self.pulse_opacity]),
            (0.3, [r, g, b, self.pulse_opacity * 0.6]),
            (1.0, [r, g, b, 0.0]),
        ]
    }
}

/// The full set of sprites for one scene. Sprites are created once and never
/// destroyed; they wrap at the viewport edges.
pub struct SpriteSwarm {
    sprites: Vec<Sprite>,
    config: SpriteConfig,
}

impl SpriteSwarm {
    pub fn new(config: SpriteConfig, viewport: Vec2, rng: &mut impl Rng) -> Self {
        let sprites = spawn_sprites(&config, viewport, rng);
        Self { sprites, config }
    }

    /// The original canvas rebuilds its swarm when the surface changes size;
    /// keep that behavior so densities stay sane after a resize.
    pub fn resize(&mut self, viewport: Vec2, rng: &mut impl Rng) {
        self.sprites = spawn_sprites(&self.config, viewport, rng);
    }

    pub fn set_config(&mut self, config: SpriteConfig) {
        self.config = config;
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    /// Advance every sprite one tick and emit its draw parameters.
    pub fn step(
        &mut self,
        now_ms: f64,
        pointer: Vec2,
        exclusion: Rect,
        viewport: Vec2,
        rng: &mut impl Rng,
    ) -> Vec<SpriteFrame> {
        let t = (now_ms * 0.001) as f32;
        let mut frames = Vec::with_capacity(self.sprites.len());

        for sprite in &mut self.sprites {
            if let Some(arc) = sprite.arc {
                let raw = (((now_ms - arc.start_ms) / arc.duration_ms).clamp(0.0, 1.0)) as f32;
                let eased = ease_in_out_cubic(raw);
                sprite.position = cubic_bezier(arc.p0, arc.p1, arc.p2, arc.p3, eased);
                if raw >= 1.0 {
                    // Resume wandering along the arc's exit direction, with
                    // most of the dash momentum shed.
                    sprite.heading = (arc.p3.y - arc.p2.y).atan2(arc.p3.x - arc.p2.x);
                    sprite.velocity *= 0.2;
                    sprite.arc = None;
                }
            } else {
                let jitter = (rng.random::<f32>() - 0.5) * sprite.turn_rate;
                let drift = (t + sprite.phase).sin() * sprite.turn_rate * 0.5;
                sprite.heading += jitter + drift;

                let desired = Vec2::from_angle(sprite.heading)
                    * (self.config.base_speed * sprite.speed);
                sprite.velocity = sprite.velocity * 0.96 + desired * 0.04;

                let oscillation = Vec2::new(
                    (t * 0.8 + sprite.phase).sin() * 0.2,
                    (t * 0.6 + sprite.phase * 1.2).cos() * 0.15,
                );
                sprite.position += sprite.velocity + oscillation;
            }

            // Pointer contact launches a dash unless the sprite is mid-arc or
            // still cooling down.
            let trigger_radius = self
                .config
                .trigger_radius_min
                .max(sprite.glow_radius * self.config.trigger_glow_factor);
            if sprite.arc.is_none()
                && now_ms >= sprite.cooldown_until_ms
                && sprite.position.distance(pointer) <= trigger_radius
            {
                let zone = exclusion.expand(sprite.glow_radius);
                let target = pick_target(
                    viewport,
                    &zone,
                    self.config.retarget_attempts,
                    sprite.position,
                    rng,
                );
                let arc = build_arc(sprite.position, target, now_ms, &self.config, rng);
                sprite.cooldown_until_ms = now_ms + arc.duration_ms + self.config.cooldown_buffer_ms;
                sprite.arc = Some(arc);
            }

            // Never paint over the content card: snap to the nearest edge of
            // the padded zone and steer away, skipping this frame's render.
            let mut visible = true;
            let zone = exclusion.expand(sprite.glow_radius);
            if zone.contains(sprite.position) {
                let away = sprite.position - exclusion.center();
                sprite.heading = away.y.atan2(away.x);
                sprite.position = zone.clamp_outside(sprite.position);
                visible = false;
            }

            // Toroidal wrap, padded by the glow so the fade finishes off-screen.
            let pad = sprite.glow_radius;
            if sprite.position.x < -pad {
                sprite.position.x = viewport.x + pad;
            } else if sprite.position.x > viewport.x + pad {
                sprite.position.x = -pad;
            }
            if sprite.position.y < -pad {
                sprite.position.y = viewport.y + pad;
            } else if sprite.position.y > viewport.y + pad {
                sprite.position.y = -pad;
            }

            let pulse = sprite.opacity * (0.7 + 0.3 * (t * 2.0 + sprite.phase).sin());
            frames.push(SpriteFrame {
                position: sprite.position,
                core_radius: sprite.size,
                glow_radius: sprite.glow_radius,
                color: sprite.color,
                pulse_opacity: pulse,
                visible,
            });
        }

        frames
    }
}

fn spawn_sprites(config: &SpriteConfig, viewport: Vec2, rng: &mut impl Rng) -> Vec<Sprite> {
    let width = viewport.x.max(1.0);
    let height = viewport.y.max(1.0);
    (0..config.count)
        .map(|i| Sprite {
            position: Vec2::new(
                rng.random_range(0.0..width),
                rng.random_range(0.0..height),
            ),
            velocity: Vec2::new(
                (rng.random::<f32>() - 0.5) * 0.5,
                (rng.random::<f32>() - 0.5) * 0.5,
            ),
            size: rng.random_range(config.size_min..config.size_max),
            color: config.palette[i % config.palette.len().max(1)],
            opacity: rng.random_range(config.opacity_min..config.opacity_max),
            glow_radius: rng.random_range(config.glow_min..config.glow_max),
            phase: rng.random_range(0.0..std::f32::consts::TAU),
            speed: rng.random_range(config.speed_min..config.speed_max),
            heading: rng.random_range(0.0..std::f32::consts::TAU),
            turn_rate: rng.random_range(config.turn_rate_min..config.turn_rate_max),
            arc: None,
            cooldown_until_ms: 0.0,
        })
        .collect()
}

/// Draw dash targets until one lands outside the exclusion zone; once the
/// attempts run out the last sample is accepted as-is (the per-frame snap
/// keeps the worst case off the card anyway).
fn pick_target(
    viewport: Vec2,
    zone: &Rect,
    attempts: usize,
    fallback: Vec2,
    rng: &mut impl Rng,
) -> Vec2 {
    let mut target = fallback;
    for _ in 0..attempts {
        target = Vec2::new(
            rng.random_range(0.0..viewport.x.max(1.0)),
            rng.random_range(0.0..viewport.y.max(1.0)),
        );
        if !zone.contains(target) {
            break;
        }
    }
    target
}

/// Cubic Bézier with control points pushed perpendicular to the direct path,
/// so the dash arcs instead of beelining.
fn build_arc(
    from: Vec2,
    to: Vec2,
    now_ms: f64,
    config: &SpriteConfig,
    rng: &mut impl Rng,
) -> ActiveArc {
    let direction = (to.y - from.y).atan2(to.x - from.x);
    let distance = from.distance(to);
    let side = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let perpendicular = direction + side * FRAC_PI_2;
    let offset = (distance * config.arc_offset_distance_factor)
        .clamp(config.arc_offset_min, config.arc_offset_max);

    let along = Vec2::from_angle(direction);
    let across = Vec2::from_angle(perpendicular);
    let p1 = from + along * distance * 0.25 + across * offset;
    let p2 = from + along * distance * 0.75 - across * offset;
    let duration_ms = rng.random_range(config.dash_duration_min_ms..config.dash_duration_max_ms);

    ActiveArc {
        p0: from,
        p1,
        p2,
        p3: to,
        start_ms: now_ms,
        duration_ms,
    }
}

pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn cubic_bezier(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MotionConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::rstest;

    const VIEWPORT: Vec2 = Vec2::new(1200.0, 800.0);

    fn far_rect() -> Rect {
        Rect::new(-500.0, -500.0, -400.0, -400.0)
    }

    fn swarm_with_one_sprite(sprite: Sprite) -> SpriteSwarm {
        let config = MotionConfig::default().sprites;
        let mut rng = StdRng::seed_from_u64(21);
        let mut swarm = SpriteSwarm::new(config, VIEWPORT, &mut rng);
        swarm.sprites = vec![sprite];
        swarm
    }

    fn still_sprite(position: Vec2) -> Sprite {
        Sprite {
            position,
            velocity: Vec2::ZERO,
            size: 3.0,
            color: [1.0, 0.9, 0.4, 1.0],
            opacity: 0.7,
            glow_radius: 10.0,
            phase: 0.0,
            speed: 0.0,
            heading: 0.0,
            turn_rate: 0.0,
            arc: None,
            cooldown_until_ms: 0.0,
        }
    }

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(0.5, 0.5)]
    #[case(1.0, 1.0)]
    fn test_ease_in_out_cubic_fixed_points(#[case] input: f32, #[case] expected: f32) {
        assert!((ease_in_out_cubic(input) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_out_cubic_monotonic() {
        let mut previous = 0.0;
        for i in 0..=100 {
            let value = ease_in_out_cubic(i as f32 / 100.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_bezier_endpoints_exact() {
        let p0 = Vec2::new(1.0, 2.0);
        let p1 = Vec2::new(50.0, -10.0);
        let p2 = Vec2::new(80.0, 90.0);
        let p3 = Vec2::new(120.0, 40.0);
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 0.0), p0);
        assert_eq!(cubic_bezier(p0, p1, p2, p3, 1.0), p3);
    }

    #[test]
    fn test_pointer_contact_triggers_dash() {
        // Distance 10 from the pointer with the 16-unit trigger floor and no
        // cooldown: the next step must attach an arc.
        let mut swarm = swarm_with_one_sprite(still_sprite(Vec2::new(100.0, 100.0)));
        let pointer = Vec2::new(110.0, 100.0);
        let mut rng = StdRng::seed_from_u64(22);

        swarm.step(16.0, pointer, far_rect(), VIEWPORT, &mut rng);

        let sprite = &swarm.sprites()[0];
        assert!(sprite.arc.is_some());
        assert!(sprite.cooldown_until_ms > 16.0);
    }

    #[test]
    fn test_cooldown_blocks_new_arc() {
        let mut sprite = still_sprite(Vec2::new(100.0, 100.0));
        sprite.cooldown_until_ms = 10_000.0;
        let mut swarm = swarm_with_one_sprite(sprite);
        let mut rng = StdRng::seed_from_u64(23);

        swarm.step(16.0, Vec2::new(100.0, 100.0), far_rect(), VIEWPORT, &mut rng);

        assert!(swarm.sprites()[0].arc.is_none());
    }

    #[test]
    fn test_dash_lands_on_target_and_clears_arc() {
        let mut sprite = still_sprite(Vec2::new(100.0, 100.0));
        let target = Vec2::new(600.0, 500.0);
        sprite.arc = Some(ActiveArc {
            p0: Vec2::new(100.0, 100.0),
            p1: Vec2::new(200.0, 50.0),
            p2: Vec2::new(450.0, 550.0),
            p3: target,
            start_ms: 0.0,
            duration_ms: 700.0,
        });
        sprite.cooldown_until_ms = 10_000.0;
        let mut swarm = swarm_with_one_sprite(sprite);
        let mut rng = StdRng::seed_from_u64(24);

        swarm.step(700.0, Vec2::new(-500.0, -500.0), far_rect(), VIEWPORT, &mut rng);

        let sprite = &swarm.sprites()[0];
        assert!(sprite.arc.is_none());
        assert_eq!(sprite.position, target);
    }

    #[test]
    fn test_arc_offset_clamped() {
        let config = MotionConfig::default().sprites;
        let mut rng = StdRng::seed_from_u64(25);
        // Short hop: perpendicular offset must still be at least the floor.
        let arc = build_arc(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), 0.0, &config, &mut rng);
        let mid_deviation = arc.p1.y.abs();
        assert!(
            (mid_deviation - config.arc_offset_min).abs() < 1.0,
            "offset {} should sit at the floor",
            mid_deviation
        );
    }

    #[test]
    fn test_wrap_preserves_velocity() {
        let mut sprite = still_sprite(Vec2::new(VIEWPORT.x + 15.0, 300.0));
        sprite.cooldown_until_ms = 10_000.0;
        let mut swarm = swarm_with_one_sprite(sprite);
        let mut rng = StdRng::seed_from_u64(26);

        swarm.step(16.0, Vec2::new(-500.0, -500.0), far_rect(), VIEWPORT, &mut rng);

        let sprite = &swarm.sprites()[0];
        assert_eq!(sprite.position.x, -sprite.glow_radius);
        assert_eq!(sprite.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_exclusion_snaps_to_zone_boundary_and_hides() {
        let rect = Rect::new(400.0, 300.0, 800.0, 500.0);
        let mut sprite = still_sprite(Vec2::new(420.0, 400.0));
        sprite.cooldown_until_ms = 10_000.0;
        let mut swarm = swarm_with_one_sprite(sprite);
        let mut rng = StdRng::seed_from_u64(27);

        let frames = swarm.step(16.0, Vec2::new(-500.0, -500.0), rect, VIEWPORT, &mut rng);

        assert!(!frames[0].visible);
        let sprite = &swarm.sprites()[0];
        let zone = rect.expand(sprite.glow_radius);
        assert!(!zone.contains(sprite.position));
        // Nearest edge was the left one; the sprite sits exactly on it.
        assert_eq!(sprite.position.x, zone.min.x);

        // Heading points away from the card center.
        let away = sprite.position - rect.center();
        assert!(Vec2::from_angle(sprite.heading).dot(away.normalize()) > 0.9);
    }

    #[test]
    fn test_retarget_avoids_zone_when_possible() {
        let zone = Rect::new(200.0, 150.0, 1000.0, 650.0);
        let mut rng = StdRng::seed_from_u64(28);
        for _ in 0..50 {
            let target = pick_target(VIEWPORT, &zone, 12, Vec2::new(10.0, 10.0), &mut rng);
            // Not guaranteed by construction, but with a ~45% interior this
            // many consecutive exhaustions would mean the re-roll is broken.
            if !zone.contains(target) {
                return;
            }
        }
        panic!("retarget never escaped the exclusion zone");
    }

    #[test]
    fn test_spawn_respects_viewport_and_palette() {
        let config = MotionConfig::default().sprites;
        let mut rng = StdRng::seed_from_u64(29);
        let swarm = SpriteSwarm::new(config.clone(), VIEWPORT, &mut rng);
        assert_eq!(swarm.sprites().len(), config.count);
        for sprite in swarm.sprites() {
            assert!(sprite.position.x >= 0.0 && sprite.position.x <= VIEWPORT.x);
            assert!(sprite.position.y >= 0.0 && sprite.position.y <= VIEWPORT.y);
            assert!(sprite.glow_radius >= config.glow_min && sprite.glow_radius < config.glow_max);
        }
    }

    #[test]
    fn test_glow_stops_fade_to_transparent() {
        let frame = SpriteFrame {
            position: Vec2::ZERO,
            core_radius: 3.0,
            glow_radius: 12.0,
            color: [0.2, 0.8, 0.4, 1.0],
            pulse_opacity: 0.6,
            visible: true,
        };
        let stops = frame.glow_stops();
        assert_eq!(stops[0].0, 0.0);
        assert!((stops[0].1[3] - 0.6).abs() < 1e-6);
        assert_eq!(stops[2].1[3], 0.0);
    }
}
