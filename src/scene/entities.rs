use bevy::prelude::*;

use crate::sequence::Side;

/// Marker for the camera entity.
#[derive(Component)]
pub struct MainCamera;

/// Root of one blade (blade + hilt children). Its transform is the hilt pose.
#[derive(Component, Reflect)]
pub struct Blade(pub Side);

/// Marker for the background point cloud.
#[derive(Component, Reflect)]
pub struct Starfield;

/// Point light that flares on impact.
#[derive(Component)]
pub struct ClashLight;

/// Horizontal light beam shown on impact.
#[derive(Component)]
pub struct ClashBeam;
