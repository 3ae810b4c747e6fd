use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use motiongen::backdrop::ParallaxBackdrop;
use motiongen::scene::{FrameInput, MotionScene};

use crate::hero::components::HeroCamera;
use crate::hero::logic;
use crate::hero::resources::*;

/// Wheel lines are converted to pixels at the usual line height.
const SCROLL_LINE_PX: f32 = 40.0;

pub fn setup_hero_scene(
    mut commands: Commands,
    settings: Res<HeroSettings>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut config_store: ResMut<GizmoConfigStore>,
) {
    let viewport = windows
        .single()
        .map(|window| Vec2::new(window.width(), window.height()))
        .unwrap_or(Vec2::new(1280.0, 720.0));

    commands.spawn((Camera2d::default(), HeroCamera));

    let (gizmo_config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    gizmo_config.line.width = 3.5;

    let scene = MotionScene::seeded(settings.config.clone(), viewport, settings.seed);
    let backdrop = ParallaxBackdrop::new(&settings.config.backdrop, &mut rand::rng());

    commands.insert_resource(HeroScene { scene });
    commands.insert_resource(HeroBackdrop { backdrop });
    commands.insert_resource(ViewportState { size: viewport });
    commands.insert_resource(LatestPacket::default());

    info!(
        "Hero scene ready: {}x{}, seed {}",
        viewport.x, viewport.y, settings.user_seed
    );
}

pub fn track_pointer(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut pointer: ResMut<PointerState>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    if let Some(position) = window.cursor_position() {
        pointer.position = position;
    }
}

pub fn track_scroll(mut wheel: MessageReader<MouseWheel>, mut scroll: ResMut<ScrollState>) {
    for message in wheel.read() {
        let delta = match message.unit {
            MouseScrollUnit::Line => message.y * SCROLL_LINE_PX,
            MouseScrollUnit::Pixel => message.y,
        };
        scroll.offset = (scroll.offset - delta).max(0.0);
    }
}

pub fn handle_resize(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportState>,
    mut hero: ResMut<HeroScene>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = Vec2::new(window.width(), window.height());
    if size != viewport.size {
        viewport.size = size;
        hero.scene.resize(size);
    }
}

pub fn handle_rebuild(
    mut rebuilds: MessageReader<RebuildScene>,
    settings: Res<HeroSettings>,
    mut hero: ResMut<HeroScene>,
    mut backdrop: ResMut<HeroBackdrop>,
    viewport: Res<ViewportState>,
) {
    if rebuilds.read().next().is_none() {
        return;
    }
    hero.scene = MotionScene::seeded(settings.config.clone(), viewport.size, settings.seed);
    backdrop.backdrop = ParallaxBackdrop::new(&settings.config.backdrop, &mut rand::rng());
    info!("Hero scene rebuilt with seed {}", settings.user_seed);
}

/// One display tick: feed the engine the current input cells, keep the output
/// packet for the draw systems.
pub fn tick_scene(
    time: Res<Time>,
    viewport: Res<ViewportState>,
    pointer: Res<PointerState>,
    scroll: Res<ScrollState>,
    mut hero: ResMut<HeroScene>,
    mut latest: ResMut<LatestPacket>,
) {
    let input = FrameInput {
        now_ms: time.elapsed_secs_f64() * 1000.0,
        viewport: viewport.size,
        pointer: pointer.position,
        content_rect: logic::content_card_rect(viewport.size, scroll.offset),
    };
    latest.packet = hero.scene.step(&input);
}

pub fn draw_backdrop(
    backdrop: Res<HeroBackdrop>,
    scroll: Res<ScrollState>,
    viewport: Res<ViewportState>,
    mut gizmos: Gizmos,
) {
    let size = viewport.size;
    if size.x <= 0.0 || size.y <= 0.0 {
        return;
    }

    let layers = backdrop.backdrop.offsets(scroll.offset, size);
    // Painter's order: deepest first.
    for (layer_index, layer) in layers.iter().enumerate().rev() {
        let heights = backdrop.backdrop.skyline(layer_index);
        if heights.len() < 2 {
            continue;
        }
        let (color, height_fraction) = logic::layer_style(layer_index, layers.len());
        let amplitude = size.y * height_fraction;

        for tile in &layer.tiles {
            let base_y = size.y + tile.position.y + layer.translate_y;
            let step = tile.width / (heights.len() - 1) as f32;
            let points = heights.iter().enumerate().map(|(i, height)| {
                let canvas = Vec2::new(
                    tile.position.x + i as f32 * step,
                    base_y - height * amplitude,
                );
                logic::canvas_to_world(size, canvas)
            });
            gizmos.linestrip_2d(points, color);
        }
    }
}

pub fn draw_content_card(
    scroll: Res<ScrollState>,
    viewport: Res<ViewportState>,
    mut gizmos: Gizmos,
) {
    let Some(card) = logic::content_card_rect(viewport.size, scroll.offset) else {
        return;
    };
    let center = logic::canvas_to_world(viewport.size, card.center());
    let outline = Color::srgba(0.98, 0.96, 0.9, 0.9);
    gizmos.rect_2d(center, Vec2::new(card.size().x, card.size().y), outline);

    // A few rules inside the card to suggest the text block it stands in for.
    let inset = 24.0;
    for line in 0..3 {
        let y = card.min.y + inset + 28.0 * line as f32;
        if y > card.max.y - inset {
            break;
        }
        let from = logic::canvas_to_world(viewport.size, Vec2::new(card.min.x + inset, y));
        let to = logic::canvas_to_world(viewport.size, Vec2::new(card.max.x - inset * 2.0, y));
        gizmos.line_2d(from, to, Color::srgba(0.98, 0.96, 0.9, 0.35));
    }
}

pub fn draw_ribbons(latest: Res<LatestPacket>, viewport: Res<ViewportState>, mut gizmos: Gizmos) {
    for ribbon in &latest.packet.ribbons {
        if ribbon.points.len() < 2 {
            continue;
        }
        let color = logic::rgba(ribbon.color, ribbon.opacity);
        let points = ribbon
            .points
            .iter()
            .map(|point| logic::canvas_to_world(viewport.size, *point));
        gizmos.linestrip_2d(points, color);
    }
}

pub fn draw_sprites(latest: Res<LatestPacket>, viewport: Res<ViewportState>, mut gizmos: Gizmos) {
    const GLOW_RINGS: usize = 5;

    for sprite in &latest.packet.sprites {
        if !sprite.visible {
            continue;
        }
        let center = logic::canvas_to_world(viewport.size, sprite.position);
        let stops = sprite.glow_stops();

        // Concentric rings stand in for the radial gradient.
        for ring in 1..=GLOW_RINGS {
            let t = ring as f32 / GLOW_RINGS as f32;
            let color = logic::glow_color_at(&stops, t);
            gizmos.circle_2d(center, sprite.glow_radius * t, logic::rgba(color, 1.0));
        }

        let core = [sprite.color[0], sprite.color[1], sprite.color[2], sprite.pulse_opacity];
        gizmos.circle_2d(center, sprite.core_radius, logic::rgba(core, 1.0));
    }
}
