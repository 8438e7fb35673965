pub mod common;
pub mod input;
pub mod render;

use bevy::{prelude::*, window::PrimaryWindow};

use crate::frame::{FrameStatus, Scene};

use self::{
    common::{point3_to_gvec3, SetupConfigRes},
    input::BevyWindowInput,
    render::{BevyRenderer, FieldCamera, FrameSubmissions, MeshRegistry},
};

#[derive(Resource)]
pub struct SceneRes(pub Scene);

pub fn setup_scene(
    mut commands: Commands,
    setup_config: Res<SetupConfigRes>,
    mut registry: ResMut<MeshRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut submissions: ResMut<FrameSubmissions>,
    mut exit: EventWriter<AppExit>,
) {
    let config = &setup_config.0;
    let mut renderer = BevyRenderer {
        registry: &mut registry,
        meshes: &mut meshes,
        submissions: &mut submissions,
    };
    let scene = match Scene::setup(config, &mut renderer) {
        Ok(scene) => scene,
        Err(e) => {
            error!("Scene setup failed: {}", e);
            exit.send(AppExit::error());
            return;
        }
    };

    let cam = &config.camera;
    let eye = point3_to_gvec3(&scene.camera().eye());
    let target = point3_to_gvec3(&scene.camera().state.target);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: cam.fov_y_degrees.to_radians() as f32,
            aspect_ratio: config.window.aspect() as f32,
            near: cam.near as f32,
            far: cam.far as f32,
        }),
        Transform::from_translation(eye).looking_at(target, Vec3::Z),
        FieldCamera,
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            ..default()
        },
        Transform::from_translation(target + Vec3::new(1.0, 0.5, 2.0)).looking_at(target, Vec3::Z),
    ));

    commands.insert_resource(SceneRes(scene));
}

/// Run one scene frame per bevy update.
#[allow(clippy::too_many_arguments)]
pub fn drive_scene(
    scene: Option<ResMut<SceneRes>>,
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut registry: ResMut<MeshRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut submissions: ResMut<FrameSubmissions>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut scene) = scene else {
        return;
    };
    let mut window = BevyWindowInput::new(&keys, q_window.get_single().ok(), time.elapsed_secs_f64());
    let mut renderer = BevyRenderer {
        registry: &mut registry,
        meshes: &mut meshes,
        submissions: &mut submissions,
    };
    if scene.0.frame(&mut window, &mut renderer) == FrameStatus::Close {
        info!("Closing after {} frames", scene.0.n_frames());
        exit.send(AppExit::Success);
    }
}
