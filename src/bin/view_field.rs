use std::path::PathBuf;

use bevy::{prelude::*, window::WindowResolution};
use clap::Parser;
use efield::{
    config::setup::SetupConfig,
    field::FieldVisualizationMode,
    view::{
        common::SetupConfigRes,
        drive_scene,
        render::{present_submissions, FrameSubmissions, MeshRegistry},
        setup_scene,
    },
};

#[derive(Debug, clap::Parser)]
#[command(
    name = "efield_view",
    about = "Place point charges and watch the field lattice respond"
)]
struct ViewCli {
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<FieldVisualizationMode>,

    #[arg(long = "edge-size")]
    pub edge_size: Option<usize>,
}

fn main() -> AppExit {
    env_logger::init();
    let args = ViewCli::parse();

    let config = match SetupConfig::load(args.config.as_deref(), args.mode, args.edge_size) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return AppExit::error();
        }
    };
    config.print();

    let window = Window {
        title: config.window.title.clone(),
        resolution: WindowResolution::new(config.window.width as f32, config.window.height as f32),
        resizable: false,
        ..default()
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(window),
            ..default()
        }))
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
        })
        .insert_resource(SetupConfigRes(config))
        .init_resource::<MeshRegistry>()
        .init_resource::<FrameSubmissions>()
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (drive_scene, present_submissions).chain())
        .run()
}
