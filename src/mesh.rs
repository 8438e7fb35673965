use std::path::Path;

use log::{debug, info};
use tobj::LoadOptions;

use crate::error::AssetLoadError;

/// Triangle mesh read from disk, ready for upload by a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals, or empty if the file had none.
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn n_triangles(&self) -> usize {
        self.indices.len() / 3
    }
}

fn triples(xs: &[f32]) -> Vec<[f32; 3]> {
    xs.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

/// Read every model in an OBJ file into one triangulated mesh.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, AssetLoadError> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &LoadOptions {
            single_index: true,
            triangulate: true,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        },
    )
    .map_err(|e| AssetLoadError::new(path, e))?;

    let mut data = MeshData::default();
    let mut with_normals = true;
    for model in &models {
        let mesh = &model.mesh;
        debug!(
            "Model '{}': {} vertices, {} triangles",
            model.name,
            mesh.positions.len() / 3,
            mesh.indices.len() / 3
        );
        with_normals &= mesh.normals.len() == mesh.positions.len();

        let offset = data.positions.len() as u32;
        data.positions.extend(triples(&mesh.positions));
        data.normals.extend(triples(&mesh.normals));
        data.indices.extend(mesh.indices.iter().map(|i| i + offset));
    }
    if !with_normals {
        data.normals.clear();
    }

    if data.n_triangles() == 0 {
        return Err(AssetLoadError::new(path, "file contains no triangles"));
    }
    if let Some(bad) = data
        .indices
        .iter()
        .find(|&&i| i as usize >= data.positions.len())
    {
        return Err(AssetLoadError::new(
            path,
            format!("face refers to missing vertex {}", bad),
        ));
    }

    info!(
        "Loaded mesh {}: {} vertices, {} triangles",
        path.display(),
        data.positions.len(),
        data.n_triangles()
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("efield-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn quad_is_triangulated() {
        let path = write_temp(
            "quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.n_triangles(), 2);
        assert!(mesh.normals.is_empty());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn normals_are_kept_when_present() {
        let path = write_temp(
            "tri.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.n_triangles(), 1);
        assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 3]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_obj("does/not/exist.obj").unwrap_err();
        assert_eq!(err.path, PathBuf::from("does/not/exist.obj"));
        assert!(!err.message.is_empty());
    }

    #[test]
    fn file_without_faces_is_rejected() {
        let path = write_temp("points.obj", "v 0 0 0\nv 1 0 0\n");
        let err = load_obj(&path).unwrap_err();
        assert_eq!(err.path, path);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn bundled_assets_load() {
        for asset in ["assets/arrow.obj", "assets/sphere.obj"] {
            let mesh = load_obj(asset).unwrap();
            assert!(mesh.n_triangles() > 0, "{}", asset);
        }
    }
}
