// disable console on windows for release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use bevy::DefaultPlugins;
use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use meadowglow::ScenePlugin;

fn main() {
    App::new()
        // morning-sky base the backdrop layers sit on
        .insert_resource(ClearColor(Color::srgb(0.55, 0.76, 0.87)))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Meadowglow".into(),
                resolution: WindowResolution::new(1280, 720),
                present_mode: PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(ScenePlugin)
        .run();
}
