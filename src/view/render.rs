use std::path::Path;

use bevy::prelude::*;
use nalgebra::Matrix4;

use crate::{
    error::AssetLoadError,
    frame::{MeshHandle, Renderer},
    mesh::load_obj,
};

use super::common::{matrix4_to_mat4, mesh_data_to_mesh, rgba_to_color};

/// Bevy handles for every mesh the scene has loaded, indexed by `MeshHandle`.
#[derive(Resource, Default)]
pub struct MeshRegistry(pub Vec<Handle<Mesh>>);

pub struct Draw {
    pub mesh: MeshHandle,
    pub model: Mat4,
    pub color: Color,
}

/// Draws recorded by the scene during the current frame.
#[derive(Resource, Default)]
pub struct FrameSubmissions {
    pub draws: Vec<Draw>,
    pub view: Option<Mat4>,
}

/// Entity reused for the n-th draw of each frame.
#[derive(Component)]
pub struct DrawSlot(pub usize);

#[derive(Component)]
pub struct FieldCamera;

pub struct BevyRenderer<'a> {
    pub registry: &'a mut MeshRegistry,
    pub meshes: &'a mut Assets<Mesh>,
    pub submissions: &'a mut FrameSubmissions,
}

impl Renderer for BevyRenderer<'_> {
    fn load_mesh(&mut self, path: &Path) -> Result<MeshHandle, AssetLoadError> {
        let data = load_obj(path)?;
        let handle = self.meshes.add(mesh_data_to_mesh(&data));
        self.registry.0.push(handle);
        Ok(MeshHandle(self.registry.0.len() - 1))
    }

    // Bevy's camera carries its own perspective, built from the same
    // parameters, so only the view is kept.
    fn submit(
        &mut self,
        mesh: MeshHandle,
        model: &Matrix4<f64>,
        view: &Matrix4<f64>,
        _projection: &Matrix4<f64>,
        color: [f32; 4],
    ) {
        self.submissions.view = Some(matrix4_to_mat4(view));
        self.submissions.draws.push(Draw {
            mesh,
            model: matrix4_to_mat4(model),
            color: rgba_to_color(color),
        });
    }
}

/// Copy the frame's draws onto slot entities, spawning more as needed and
/// hiding the ones left over.
pub fn present_submissions(
    mut commands: Commands,
    mut submissions: ResMut<FrameSubmissions>,
    registry: Res<MeshRegistry>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut q_slots: Query<(
        &DrawSlot,
        &mut Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
        &mut Transform,
        &mut Visibility,
    )>,
    mut q_camera: Query<&mut Transform, (With<FieldCamera>, Without<DrawSlot>)>,
) {
    let submissions = &mut *submissions;

    if let Some(view) = submissions.view.take() {
        for mut transform in &mut q_camera {
            *transform = Transform::from_matrix(view.inverse());
        }
    }

    let mut n_slots = 0;
    for (slot, mut mesh3d, material, mut transform, mut visibility) in &mut q_slots {
        n_slots += 1;
        let Some(draw) = submissions.draws.get(slot.0) else {
            *visibility = Visibility::Hidden;
            continue;
        };
        let Some(handle) = registry.0.get(draw.mesh.0) else {
            warn!("Draw {} refers to unknown mesh {:?}", slot.0, draw.mesh);
            *visibility = Visibility::Hidden;
            continue;
        };
        if mesh3d.0 != *handle {
            mesh3d.0 = handle.clone();
        }
        *transform = Transform::from_matrix(draw.model);
        if let Some(mat) = materials.get_mut(&material.0) {
            if mat.base_color != draw.color {
                mat.base_color = draw.color;
            }
        }
        *visibility = if draw.color.alpha() > 0.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }

    // Slots spawned now are filled in from next frame's draws.
    for i in n_slots..submissions.draws.len() {
        let draw = &submissions.draws[i];
        let Some(handle) = registry.0.get(draw.mesh.0) else {
            continue;
        };
        commands.spawn((
            Mesh3d(handle.clone()),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: draw.color,
                alpha_mode: AlphaMode::Blend,
                ..default()
            })),
            Transform::from_matrix(draw.model),
            if draw.color.alpha() > 0.0 {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
            DrawSlot(i),
        ));
    }

    submissions.draws.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn submissions_are_recorded_in_order() {
        let mut registry = MeshRegistry::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut submissions = FrameSubmissions::default();
        let mut renderer = BevyRenderer {
            registry: &mut registry,
            meshes: &mut meshes,
            submissions: &mut submissions,
        };

        let arrow = renderer.load_mesh(Path::new("assets/arrow.obj")).unwrap();
        let sphere = renderer.load_mesh(Path::new("assets/sphere.obj")).unwrap();
        assert_eq!((arrow, sphere), (MeshHandle(0), MeshHandle(1)));

        let view = Matrix4::new_translation(&nalgebra::Vector3::new(0.0, 0.0, -5.0));
        let id = Matrix4::identity();
        renderer.submit(sphere, &id, &view, &id, [1.0, 0.0, 0.0, 1.0]);
        renderer.submit(arrow, &id, &view, &id, [1.0, 1.0, 0.0, 0.25]);

        assert_eq!(registry.0.len(), 2);
        assert_eq!(submissions.draws.len(), 2);
        assert_eq!(submissions.draws[0].mesh, sphere);
        assert_eq!(submissions.draws[1].color.alpha(), 0.25);
        assert_eq!(
            submissions.view.map(|v| v.w_axis),
            Some(Vec4::new(0.0, 0.0, -5.0, 1.0))
        );
    }

    #[test]
    fn missing_mesh_file_is_reported() {
        let mut registry = MeshRegistry::default();
        let mut meshes = Assets::<Mesh>::default();
        let mut submissions = FrameSubmissions::default();
        let mut renderer = BevyRenderer {
            registry: &mut registry,
            meshes: &mut meshes,
            submissions: &mut submissions,
        };
        let err = renderer.load_mesh(Path::new("assets/nope.obj")).unwrap_err();
        assert_eq!(err.path, PathBuf::from("assets/nope.obj"));
        assert!(registry.0.is_empty());
    }
}
