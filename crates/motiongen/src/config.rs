use crate::ribbon::RibbonDefinition;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    pub wind: WindConfig,
    pub ribbon: RibbonParams,
    pub ribbons: Vec<RibbonDefinition>,
    pub sprites: SpriteConfig,
    pub backdrop: BackdropConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindConfig {
    /// Bounds of the pause between wind on/off flips, in milliseconds.
    pub change_interval_min_ms: f64,
    pub change_interval_max_ms: f64,
    /// Exponential smoothing factor for strength, in (0, 1).
    pub transition_speed: f32,
    pub strength_min: f32,
    pub strength_max: f32,
    /// Per-consumer phase variation so ribbons never move in lockstep.
    pub individual_amplitude_min: f32,
    pub individual_amplitude_max: f32,
    pub individual_frequency_min: f32,
    pub individual_frequency_max: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RibbonParams {
    /// Fixed spacing between chain segments; also the constraint target distance.
    pub segment_spacing: f32,
    pub constraint_iterations: usize,
    pub gravity: f32,
    pub base_damping: f32,
    pub damping_flexibility_factor: f32,
    /// Pointer influence window radius, canvas units.
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    /// Lateral offset per ribbon at the anchor.
    pub anchor_spread: f32,
    /// Cosmetic fan-out towards the free end.
    pub fan_spread: f32,
    /// Interpolated points per quadratic span when smoothing the drawable path.
    pub smoothing_samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub count: usize,
    pub size_min: f32,
    pub size_max: f32,
    pub opacity_min: f32,
    pub opacity_max: f32,
    pub glow_min: f32,
    pub glow_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub base_speed: f32,
    pub turn_rate_min: f32,
    pub turn_rate_max: f32,
    /// Floor for the pointer dash trigger radius; scaled up by glow size.
    pub trigger_radius_min: f32,
    pub trigger_glow_factor: f32,
    pub dash_duration_min_ms: f64,
    pub dash_duration_max_ms: f64,
    pub cooldown_buffer_ms: f64,
    /// Retarget draws before giving up and accepting the last sample.
    pub retarget_attempts: usize,
    pub arc_offset_min: f32,
    pub arc_offset_max: f32,
    pub arc_offset_distance_factor: f32,
    pub palette: Vec<[f32; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackdropConfig {
    pub layers: Vec<LayerConfig>,
    /// Scroll offsets are clamped to this many pixels either way so a tiling
    /// seam can never be dragged into view.
    pub offset_clamp: f32,
    /// Extra per-tile vertical jitter, pixels, randomized once at mount.
    pub jitter: f32,
    pub skyline_seed: u32,
    pub skyline_samples: usize,
    pub skyline_octaves: usize,
    pub skyline_persistence: f32,
    pub skyline_frequency: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Per-tile scroll speed coefficients; smaller moves less (reads deeper).
    pub tile_speeds: Vec<f32>,
    /// Per-tile base x positions as fractions of the viewport width.
    pub tile_base_x: Vec<f32>,
    /// Per-tile strip widths in pixels.
    pub tile_widths: Vec<f32>,
    /// Whole-layer translation coefficient applied on top of tile offsets.
    pub row_parallax: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            wind: WindConfig {
                change_interval_min_ms: 4000.0,
                change_interval_max_ms: 10000.0,
                transition_speed: 0.02,
                strength_min: 0.03,
                strength_max: 0.08,
                individual_amplitude_min: 0.1,
                individual_amplitude_max: 0.25,
                individual_frequency_min: 0.1,
                individual_frequency_max: 0.3,
            },
            ribbon: RibbonParams {
                segment_spacing: 12.0,
                constraint_iterations: 2,
                gravity: 0.3,
                base_damping: 0.995,
                damping_flexibility_factor: 0.002,
                pointer_radius: 200.0,
                pointer_strength: 0.3,
                anchor_spread: 1.5,
                fan_spread: 8.0,
                smoothing_samples: 4,
            },
            ribbons: vec![
                // green
                RibbonDefinition {
                    color: [0.498, 1.0, 0.498, 1.0],
                    stroke_width: 4.25,
                    opacity: 0.85,
                    length: 210.0,
                    weight: 0.8,
                    flexibility: 1.2,
                },
                // teal
                RibbonDefinition {
                    color: [0.251, 0.878, 0.816, 1.0],
                    stroke_width: 3.75,
                    opacity: 0.8,
                    length: 235.0,
                    weight: 0.6,
                    flexibility: 1.4,
                },
                // gold
                RibbonDefinition {
                    color: [1.0, 0.898, 0.361, 1.0],
                    stroke_width: 3.25,
                    opacity: 0.8,
                    length: 190.0,
                    weight: 0.4,
                    flexibility: 1.6,
                },
                // coral
                RibbonDefinition {
                    color: [1.0, 0.498, 0.498, 1.0],
                    stroke_width: 4.25,
                    opacity: 0.85,
                    length: 255.0,
                    weight: 1.0,
                    flexibility: 1.0,
                },
                // lavender
                RibbonDefinition {
                    color: [0.867, 0.627, 0.867, 1.0],
                    stroke_width: 3.25,
                    opacity: 0.8,
                    length: 220.0,
                    weight: 0.5,
                    flexibility: 1.5,
                },
                // mint
                RibbonDefinition {
                    color: [0.596, 0.984, 0.596, 1.0],
                    stroke_width: 3.75,
                    opacity: 0.8,
                    length: 200.0,
                    weight: 0.7,
                    flexibility: 1.3,
                },
            ],
            sprites: SpriteConfig {
                count: 5,
                size_min: 2.0,
                size_max: 5.0,
                opacity_min: 0.55,
                opacity_max: 0.9,
                glow_min: 8.0,
                glow_max: 20.0,
                speed_min: 0.3,
                speed_max: 0.7,
                base_speed: 0.25,
                turn_rate_min: 0.003,
                turn_rate_max: 0.007,
                trigger_radius_min: 16.0,
                trigger_glow_factor: 0.6,
                dash_duration_min_ms: 600.0,
                dash_duration_max_ms: 1100.0,
                cooldown_buffer_ms: 250.0,
                retarget_attempts: 12,
                arc_offset_min: 40.0,
                arc_offset_max: 120.0,
                arc_offset_distance_factor: 0.2,
                palette: vec![
                    [1.0, 0.898, 0.361, 1.0],  // soft gold
                    [0.498, 1.0, 0.498, 1.0],  // soft green
                    [0.867, 0.627, 0.867, 1.0], // lavender
                    [0.251, 0.878, 0.816, 1.0], // teal
                    [1.0, 0.498, 0.498, 1.0],  // coral
                    [0.596, 0.984, 0.596, 1.0], // mint
                    [0.941, 0.902, 0.549, 1.0], // khaki
                    [0.871, 0.722, 0.533, 1.0], // burlywood
                ],
            },
            backdrop: BackdropConfig {
                layers: vec![
                    LayerConfig {
                        tile_speeds: vec![0.035, 0.04, 0.03, 0.045, 0.032],
                        tile_base_x: vec![-0.05, 0.08, 0.26, 0.54, 0.78],
                        tile_widths: vec![415.0, 493.0, 337.0, 623.0, 441.0],
                        row_parallax: 0.04,
                    },
                    LayerConfig {
                        tile_speeds: vec![0.02, 0.03, 0.015, 0.04, 0.025],
                        tile_base_x: vec![0.0, 0.1, 0.3, 0.6, 0.8],
                        tile_widths: vec![352.0, 418.0, 286.0, 528.0, 374.0],
                        row_parallax: 0.028,
                    },
                    LayerConfig {
                        tile_speeds: vec![0.025, 0.035, 0.02, 0.045, 0.03],
                        tile_base_x: vec![0.15, 0.35, 0.55, 0.75, 0.9],
                        tile_widths: vec![286.0, 330.0, 242.0, 396.0, 308.0],
                        row_parallax: 0.018,
                    },
                    LayerConfig {
                        tile_speeds: vec![0.012, 0.018, 0.01, 0.02, 0.015],
                        tile_base_x: vec![-0.1, 0.05, 0.2, 0.4, 0.65],
                        tile_widths: vec![220.0, 242.0, 198.0, 286.0, 264.0],
                        row_parallax: 0.01,
                    },
                    LayerConfig {
                        tile_speeds: vec![0.01, 0.012, 0.008, 0.014, 0.01],
                        tile_base_x: vec![-0.2, 0.0, 0.2, 0.4, 0.6],
                        tile_widths: vec![190.0, 210.0, 170.0, 240.0, 200.0],
                        row_parallax: 0.006,
                    },
                ],
                offset_clamp: 40.0,
                jitter: 7.0,
                skyline_seed: 12345,
                skyline_samples: 64,
                skyline_octaves: 4,
                skyline_persistence: 0.5,
                skyline_frequency: 2.4,
            },
        }
    }
}

impl MotionConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: MotionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
