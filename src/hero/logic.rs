use bevy::prelude::*;
use motiongen::rect::Rect as CanvasRect;

/// Content card layout in canvas space for a viewport and scroll offset.
///
/// The card starts in the upper-right area and scrolls up with the page;
/// `None` once it has left the view entirely (the engine then falls back to
/// its own exclusion rect).
pub fn content_card_rect(viewport: Vec2, scroll: f32) -> Option<CanvasRect> {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return None;
    }
    let top = viewport.y * 0.18 - scroll * 0.9;
    let rect = CanvasRect::new(
        viewport.x * 0.42,
        top,
        viewport.x * 0.88,
        top + viewport.y * 0.3,
    );
    if rect.max.y < 0.0 { None } else { Some(rect) }
}

/// Canvas space (origin top-left, y down) to Bevy world space (origin center,
/// y up).
pub fn canvas_to_world(viewport: Vec2, point: Vec2) -> Vec2 {
    Vec2::new(point.x - viewport.x * 0.5, viewport.y * 0.5 - point.y)
}

pub fn rgba(color: [f32; 4], opacity: f32) -> Color {
    Color::srgba(color[0], color[1], color[2], color[3] * opacity)
}

/// Interpolate glow gradient stops at radius fraction `t`.
pub fn glow_color_at(stops: &[(f32, [f32; 4]); 3], t: f32) -> [f32; 4] {
    let t = t.clamp(0.0, 1.0);
    let (mut lo, mut hi) = (stops[0], stops[2]);
    for pair in stops.windows(2) {
        if t >= pair[0].0 && t <= pair[1].0 {
            lo = pair[0];
            hi = pair[1];
            break;
        }
    }
    let span = (hi.0 - lo.0).max(f32::EPSILON);
    let mix = (t - lo.0) / span;
    let mut out = [0.0; 4];
    for i in 0..4 {
        out[i] = lo.1[i] + (hi.1[i] - lo.1[i]) * mix;
    }
    out
}

/// Silhouette color and height fraction for a backdrop layer; front layers
/// are taller and darker, deep layers fade toward the sky.
pub fn layer_style(layer_index: usize, layer_count: usize) -> (Color, f32) {
    let depth = if layer_count > 1 {
        layer_index as f32 / (layer_count - 1) as f32
    } else {
        0.0
    };
    let color = Color::srgba(
        0.11 + 0.16 * depth,
        0.26 + 0.22 * depth,
        0.20 + 0.18 * depth,
        0.85 - 0.45 * depth,
    );
    let height_fraction = 0.26 - 0.15 * depth;
    (color, height_fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VIEWPORT: Vec2 = Vec2::new(1200.0, 800.0);

    #[rstest]
    #[case(Vec2::new(0.0, 0.0), Vec2::new(-600.0, 400.0))]
    #[case(Vec2::new(600.0, 400.0), Vec2::new(0.0, 0.0))]
    #[case(Vec2::new(1200.0, 800.0), Vec2::new(600.0, -400.0))]
    fn test_canvas_to_world_corners(#[case] canvas: Vec2, #[case] world: Vec2) {
        assert_eq!(canvas_to_world(VIEWPORT, canvas), world);
    }

    #[test]
    fn test_card_rect_tracks_scroll() {
        let at_rest = content_card_rect(VIEWPORT, 0.0).unwrap();
        let scrolled = content_card_rect(VIEWPORT, 100.0).unwrap();
        assert_eq!(at_rest.min.x, scrolled.min.x);
        assert!((at_rest.min.y - scrolled.min.y - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_card_rect_disappears_when_scrolled_out() {
        // Enough scroll to push the whole card above the top edge.
        assert!(content_card_rect(VIEWPORT, 10_000.0).is_none());
        assert!(content_card_rect(Vec2::ZERO, 0.0).is_none());
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.3)]
    #[case(1.0)]
    fn test_glow_color_at_matches_stops(#[case] t: f32) {
        let stops = [
            (0.0, [1.0, 0.5, 0.2, 0.8]),
            (0.3, [1.0, 0.5, 0.2, 0.48]),
            (1.0, [1.0, 0.5, 0.2, 0.0]),
        ];
        let color = glow_color_at(&stops, t);
        let expected = stops.iter().find(|(s, _)| *s == t).unwrap().1;
        for i in 0..4 {
            assert!((color[i] - expected[i]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_glow_color_interpolates_between_stops() {
        let stops = [
            (0.0, [1.0, 1.0, 1.0, 1.0]),
            (0.3, [1.0, 1.0, 1.0, 0.6]),
            (1.0, [1.0, 1.0, 1.0, 0.0]),
        ];
        let alpha = glow_color_at(&stops, 0.65)[3];
        assert!(alpha > 0.0 && alpha < 0.6);
    }

    #[test]
    fn test_layer_style_orders_depth() {
        let (front_color, front_height) = layer_style(0, 5);
        let (back_color, back_height) = layer_style(4, 5);
        assert!(front_height > back_height);
        assert!(front_color.alpha() > back_color.alpha());
    }
}
