use std::path::PathBuf;

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowParams {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowParams {
            title: "Electric Field Simulator".to_string(),
            width: 1920,
            height: 1080,
        }
    }
}

impl WindowParams {
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GlyphParams {
    // OBJ meshes. The glyph must point along +Z.
    pub glyph_mesh: PathBuf,
    pub charge_mesh: PathBuf,
    // Uniform scale applied to each mesh.
    pub glyph_scale: f64,
    pub charge_scale: f64,
    pub marker_scale: f64,
    // Linear RGB; glyph alpha comes from the fade policy.
    pub glyph_color: [f32; 3],
    pub positive_color: [f32; 3],
    pub negative_color: [f32; 3],
    pub marker_color: [f32; 4],
    pub show_placement_marker: bool,
}

impl Default for GlyphParams {
    fn default() -> Self {
        GlyphParams {
            glyph_mesh: PathBuf::from("assets/arrow.obj"),
            charge_mesh: PathBuf::from("assets/sphere.obj"),
            glyph_scale: 6.0,
            charge_scale: 2.5,
            marker_scale: 1.5,
            glyph_color: [1.0, 0.85, 0.2],
            positive_color: [0.9, 0.15, 0.15],
            negative_color: [0.2, 0.35, 0.95],
            marker_color: [1.0, 1.0, 1.0, 0.4],
            show_placement_marker: true,
        }
    }
}
