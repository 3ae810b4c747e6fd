use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use motiongen::tools;

use crate::hero::resources::*;

/// Side panel exposing the engine tunables at runtime.
pub fn render_tuning_panel(
    mut contexts: EguiContexts,
    mut settings: ResMut<HeroSettings>,
    hero: Option<ResMut<HeroScene>>,
    latest: Option<Res<LatestPacket>>,
    mut rebuilds: MessageWriter<RebuildScene>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let Some(mut hero) = hero else {
        return;
    };

    egui::SidePanel::right("tuning_panel")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Motion Tuning");
                ui.add_space(8.0);

                if let Some(latest) = &latest {
                    let wind = &latest.packet.wind;
                    ui.label(format!(
                        "wind {} | strength {:.3} -> {:.3}",
                        if wind.is_blowing { "on" } else { "off" },
                        wind.strength,
                        wind.target_strength
                    ));
                    ui.add_space(8.0);
                }

                ui.label("Wind");
                let wind = &mut settings.config.wind;
                ui.label("Change interval (ms)");
                ui.add(egui::Slider::new(&mut wind.change_interval_min_ms, 500.0..=15000.0));
                ui.add(egui::Slider::new(&mut wind.change_interval_max_ms, 1000.0..=30000.0));
                ui.label("Transition speed");
                ui.add(egui::Slider::new(&mut wind.transition_speed, 0.005..=0.2).step_by(0.005));
                ui.label("Strength range");
                ui.add(egui::Slider::new(&mut wind.strength_min, 0.0..=0.2).step_by(0.005));
                ui.add(egui::Slider::new(&mut wind.strength_max, 0.01..=0.4).step_by(0.005));
                if wind.change_interval_max_ms < wind.change_interval_min_ms {
                    wind.change_interval_max_ms = wind.change_interval_min_ms;
                }
                if wind.strength_max < wind.strength_min {
                    wind.strength_max = wind.strength_min;
                }

                ui.add_space(8.0);
                ui.label("Sprites");
                let sprites = &mut settings.config.sprites;
                ui.label("Dash duration (ms)");
                ui.add(egui::Slider::new(&mut sprites.dash_duration_min_ms, 200.0..=2000.0));
                ui.add(egui::Slider::new(&mut sprites.dash_duration_max_ms, 300.0..=3000.0));
                ui.label("Trigger radius floor");
                ui.add(egui::Slider::new(&mut sprites.trigger_radius_min, 4.0..=64.0));
                if sprites.dash_duration_max_ms < sprites.dash_duration_min_ms {
                    sprites.dash_duration_max_ms = sprites.dash_duration_min_ms;
                }

                // Cheap to re-apply every pass; the scene just swaps configs.
                hero.scene.set_wind_config(settings.config.wind.clone());
                hero.scene.set_sprite_config(settings.config.sprites.clone());

                ui.add_space(8.0);
                ui.separator();
                ui.label(format!("Seed: {}", settings.user_seed));
                ui.horizontal(|ui| {
                    if ui.button("New seed").clicked() {
                        settings.user_seed = tools::generate_seed8();
                        settings.seed = tools::expand_seed64(settings.user_seed);
                        rebuilds.write(RebuildScene);
                    }
                    if ui.button("Rebuild").clicked() {
                        rebuilds.write(RebuildScene);
                    }
                });
            });
        });
}
