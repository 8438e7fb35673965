use bevy::{
    prelude::*,
    render::{
        mesh::{Indices, PrimitiveTopology},
        render_asset::RenderAssetUsages,
    },
};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::{config::setup::SetupConfig, mesh::MeshData};

// Resources.

#[derive(Resource)]
pub struct SetupConfigRes(pub SetupConfig);

pub fn vec3_to_gvec3(v: &Vector3<f64>) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub fn point3_to_gvec3(v: &Point3<f64>) -> Vec3 {
    vec3_to_gvec3(&v.coords)
}

/// Both libraries store matrices column-major.
pub fn matrix4_to_mat4(m: &Matrix4<f64>) -> Mat4 {
    let mut cols = [0.0f32; 16];
    for (dst, src) in cols.iter_mut().zip(m.iter()) {
        *dst = *src as f32;
    }
    Mat4::from_cols_array(&cols)
}

pub fn rgba_to_color(c: [f32; 4]) -> Color {
    Color::linear_rgba(c[0], c[1], c[2], c[3])
}

pub fn mesh_data_to_mesh(data: &MeshData) -> Mesh {
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, data.positions.clone())
        .with_inserted_indices(Indices::U32(data.indices.clone()));
    if data.normals.is_empty() {
        mesh.duplicate_vertices();
        mesh.compute_flat_normals();
    } else {
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, data.normals.clone());
    }
    mesh
}
