pub mod components;
pub mod logic;
pub mod resources;
pub mod systems;
pub mod ui;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::hero::resources::*;
use crate::hero::systems::*;

pub struct HeroPlugin;

impl Plugin for HeroPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
            .init_resource::<ScrollState>()
            .init_resource::<HeroSettings>()
            .add_message::<RebuildScene>()
            .add_systems(Startup, setup_hero_scene)
            .add_systems(
                Update,
                (
                    track_pointer,
                    track_scroll,
                    handle_resize,
                    handle_rebuild,
                    tick_scene,
                    draw_backdrop,
                    draw_content_card,
                    draw_ribbons,
                    draw_sprites,
                )
                    .chain(),
            )
            .add_systems(EguiPrimaryContextPass, ui::render_tuning_panel);
    }
}
