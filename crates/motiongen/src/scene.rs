// Owned per-session orchestrator. One `step` call is one display tick: the
// wind advances exactly once, then every ribbon, then the sprite swarm, all
// from the same snapshot.

use crate::config::{MotionConfig, SpriteConfig, WindConfig};
use crate::rect::Rect;
use crate::ribbon::RibbonChain;
use crate::sprite::{SpriteFrame, SpriteSwarm};
use crate::tools;
use crate::wind::{WindModel, WindSample};
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Everything the render surface feeds in per tick. The pointer and content
/// rect are last-write-wins cells on the host side; the scene just reads
/// whatever is current.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub now_ms: f64,
    /// Canvas size in pixels, origin top-left, y down.
    pub viewport: Vec2,
    pub pointer: Vec2,
    /// Bounding box of the content card, if the host has one laid out.
    pub content_rect: Option<Rect>,
}

/// A stroked path plus its styling.
#[derive(Debug, Clone)]
pub struct RibbonPath {
    pub points: Vec<Vec2>,
    pub color: [f32; 4],
    pub stroke_width: f32,
    pub opacity: f32,
}

/// Per-tick output: draw instructions only, no retained handles.
#[derive(Debug, Clone, Default)]
pub struct ScenePacket {
    pub wind: WindSample,
    pub ribbons: Vec<RibbonPath>,
    pub sprites: Vec<SpriteFrame>,
}

/// The motion engine instance for one rendering session. Dropping it stops
/// everything; there is no global state behind it.
pub struct MotionScene {
    config: MotionConfig,
    wind: WindModel,
    ribbons: Vec<RibbonChain>,
    swarm: SpriteSwarm,
    rng: StdRng,
    viewport: Vec2,
}

impl MotionScene {
    pub fn new(config: MotionConfig, viewport: Vec2) -> Self {
        let rng = StdRng::from_rng(&mut rand::rng());
        let wind = WindModel::new(config.wind.clone());
        Self::build(config, viewport, wind, rng)
    }

    /// Fully deterministic twin of `new` for tests and replays.
    pub fn seeded(config: MotionConfig, viewport: Vec2, seed: u64) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        let wind = WindModel::seeded(config.wind.clone(), tools::splitmix64(seed));
        Self::build(config, viewport, wind, rng)
    }

    fn build(config: MotionConfig, viewport: Vec2, wind: WindModel, mut rng: StdRng) -> Self {
        let viewport = viewport.max(Vec2::ONE);
        let anchor = Self::anchor_for(Self::fallback_rect(viewport));
        let set_size = config.ribbons.len();
        let ribbons = config
            .ribbons
            .iter()
            .enumerate()
            .map(|(index, def)| {
                RibbonChain::new(
                    def.clone(),
                    index,
                    set_size,
                    anchor,
                    &config.ribbon,
                    &config.wind,
                    &mut rng,
                )
            })
            .collect();
        let swarm = SpriteSwarm::new(config.sprites.clone(), viewport, &mut rng);
        Self {
            config,
            wind,
            ribbons,
            swarm,
            rng,
            viewport,
        }
    }

    /// Advance the whole scene one tick and emit draw instructions.
    ///
    /// A degenerate viewport yields an empty packet instead of an error; the
    /// host simply retries next tick.
    pub fn step(&mut self, input: &FrameInput) -> ScenePacket {
        if input.viewport.x <= 0.0 || input.viewport.y <= 0.0 {
            return ScenePacket {
                wind: self.wind.current(),
                ..ScenePacket::default()
            };
        }

        let content = input
            .content_rect
            .unwrap_or_else(|| Self::fallback_rect(input.viewport));
        let anchor = Self::anchor_for(content);

        let wind = self.wind.advance(input.now_ms);

        for chain in &mut self.ribbons {
            chain.step(
                anchor,
                &wind,
                input.pointer,
                &self.config.ribbon,
                &self.config.wind,
                &mut self.rng,
            );
        }

        let sprites = self.swarm.step(
            input.now_ms,
            input.pointer,
            content,
            input.viewport,
            &mut self.rng,
        );

        let ribbons = self
            .ribbons
            .iter()
            .map(|chain| RibbonPath {
                points: chain.path(input.now_ms, wind.strength, &self.config.ribbon),
                color: chain.def.color,
                stroke_width: chain.def.stroke_width,
                opacity: chain.def.opacity,
            })
            .collect();

        ScenePacket {
            wind,
            ribbons,
            sprites,
        }
    }

    /// Re-seat the swarm for a new surface size.
    pub fn resize(&mut self, viewport: Vec2) {
        let viewport = viewport.max(Vec2::ONE);
        if viewport != self.viewport {
            self.viewport = viewport;
            self.swarm.resize(viewport, &mut self.rng);
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn wind(&self) -> &WindModel {
        &self.wind
    }

    pub fn wind_mut(&mut self) -> &mut WindModel {
        &mut self.wind
    }

    /// Live-apply a new wind config without rebuilding the scene.
    pub fn set_wind_config(&mut self, config: WindConfig) {
        self.wind.set_config(config.clone());
        self.config.wind = config;
    }

    pub fn set_sprite_config(&mut self, config: SpriteConfig) {
        self.swarm.set_config(config.clone());
        self.config.sprites = config;
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Ribbons hang from the card's top-right corner, inset a little.
    fn anchor_for(content: Rect) -> Vec2 {
        Vec2::new(content.max.x - 25.0, content.min.y)
    }

    /// Stand-in card when the host has no layout yet: sized so the derived
    /// anchor lands at (0.8 w, 0.2 h).
    fn fallback_rect(viewport: Vec2) -> Rect {
        Rect::new(
            viewport.x * 0.4,
            viewport.y * 0.2,
            viewport.x * 0.8 + 25.0,
            viewport.y * 0.45,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VIEWPORT: Vec2 = Vec2::new(1200.0, 800.0);

    fn frame(now_ms: f64) -> FrameInput {
        FrameInput {
            now_ms,
            viewport: VIEWPORT,
            pointer: Vec2::new(-1000.0, -1000.0),
            content_rect: None,
        }
    }

    #[test]
    fn test_zero_viewport_yields_empty_packet() {
        let mut scene = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 41);
        let packet = scene.step(&FrameInput {
            viewport: Vec2::ZERO,
            ..frame(16.0)
        });
        assert!(packet.ribbons.is_empty());
        assert!(packet.sprites.is_empty());
    }

    #[test]
    fn test_fallback_anchor_pins_ribbons() {
        let mut scene = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 42);
        scene.step(&frame(16.0));

        let expected_anchor = Vec2::new(VIEWPORT.x * 0.8, VIEWPORT.y * 0.2);
        let set_size = scene.ribbons.len();
        for (index, chain) in scene.ribbons.iter().enumerate() {
            let lateral = index as f32 - (set_size as f32 - 1.0) / 2.0;
            let expected =
                expected_anchor + Vec2::new(lateral * scene.config.ribbon.anchor_spread, 0.0);
            assert_eq!(chain.segments()[0].position, expected);
        }
    }

    #[test]
    fn test_supplied_content_rect_moves_anchor() {
        let mut scene = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 43);
        let rect = Rect::new(100.0, 60.0, 700.0, 300.0);
        scene.step(&FrameInput {
            content_rect: Some(rect),
            ..frame(16.0)
        });
        assert_eq!(
            scene.ribbons[2].segments()[0].position.y,
            rect.min.y,
        );
    }

    #[test]
    fn test_wind_advances_once_per_step() {
        let mut scene = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 44);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        scene.wind_mut().subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        scene.step(&frame(16.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        scene.step(&frame(32.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_seeded_scenes_replay_identically() {
        let mut a = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 45);
        let mut b = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 45);

        for tick in 1..60 {
            let input = frame(tick as f64 * 16.0);
            let pa = a.step(&input);
            let pb = b.step(&input);
            assert_eq!(pa.wind.strength, pb.wind.strength);
            for (ra, rb) in pa.ribbons.iter().zip(pb.ribbons.iter()) {
                assert_eq!(ra.points, rb.points);
            }
            for (sa, sb) in pa.sprites.iter().zip(pb.sprites.iter()) {
                assert_eq!(sa.position, sb.position);
            }
        }
    }

    #[test]
    fn test_packet_styling_matches_definitions() {
        let config = MotionConfig::default();
        let mut scene = MotionScene::seeded(config.clone(), VIEWPORT, 46);
        let packet = scene.step(&frame(16.0));
        assert_eq!(packet.ribbons.len(), config.ribbons.len());
        for (path, def) in packet.ribbons.iter().zip(config.ribbons.iter()) {
            assert_eq!(path.color, def.color);
            assert_eq!(path.stroke_width, def.stroke_width);
            assert_eq!(path.opacity, def.opacity);
        }
        assert_eq!(packet.sprites.len(), config.sprites.count);
    }

    #[test]
    fn test_resize_respawns_swarm_within_new_bounds() {
        let mut scene = MotionScene::seeded(MotionConfig::default(), VIEWPORT, 47);
        let small = Vec2::new(300.0, 200.0);
        scene.resize(small);
        for sprite in scene.swarm.sprites() {
            assert!(sprite.position.x <= small.x);
            assert!(sprite.position.y <= small.y);
        }
    }
}
