use bevy::prelude::*;

/// Marker for the single 2D camera the hero scene renders through.
#[derive(Component)]
pub struct HeroCamera;
