#![warn(missing_docs)]
//! Looping lightsaber clash title sequence.
//!
//! Two glowing blades slide in, collide with camera shake and a flash of
//! light, exit, and hand over to a two-line title that scales in, holds and
//! scales out before the whole cycle repeats.

#[cfg(feature = "native")]
mod cli;
pub mod math;
mod scene;
mod sequence;
mod title;
mod tween;

use bevy::prelude::*;
#[cfg(feature = "native")]
use bevy::remote::{RemotePlugin, http::RemoteHttpPlugin};
use bevy_inspector_egui::quick::WorldInspectorPlugin;

use scene::{SceneConfig, ScenePlugin};
use sequence::{SequenceConfig, SequencePlugin};
use title::{TitleConfig, TitlePlugin};

/// Plugin configs after command-line overrides, plus whether to inspect.
#[cfg(feature = "native")]
fn configs() -> (SceneConfig, SequenceConfig, TitleConfig, bool) {
    use clap::Parser;

    let cli = cli::Cli::parse();
    let mut scene = SceneConfig::default();
    let mut title = TitleConfig::default();
    cli.apply(&mut scene, &mut title);
    (scene, SequenceConfig::default(), title, cli.inspect)
}

#[cfg(not(feature = "native"))]
fn configs() -> (SceneConfig, SequenceConfig, TitleConfig, bool) {
    (
        SceneConfig::default(),
        SequenceConfig::default(),
        TitleConfig::default(),
        false,
    )
}

fn main() -> AppExit {
    let (scene, sequence, title, inspect) = configs();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Saber Clash".into(),
            #[cfg(not(feature = "native"))]
            fit_canvas_to_parent: true,
            ..default()
        }),
        ..default()
    }));

    // LogPlugin is in place from here on.
    if let Err(err) = sequence.validate() {
        error!("invalid sequence config: {err}");
        return AppExit::error();
    }

    app.add_plugins(ScenePlugin(scene))
        .add_plugins(SequencePlugin(sequence))
        .add_plugins(TitlePlugin(title));

    #[cfg(feature = "native")]
    app.add_plugins(RemotePlugin::default())
        .add_plugins(RemoteHttpPlugin::default());

    if inspect {
        app.add_plugins(bevy_egui::EguiPlugin::default())
            .add_plugins(WorldInspectorPlugin::new());
    }

    app.run()
}
