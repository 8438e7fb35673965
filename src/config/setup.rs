pub mod parameters;

use std::{fs::File, io::Read, path::Path};

use log::{info, warn};
use nalgebra::Point3;

use crate::{
    error::SetupError,
    field::{FieldVisualizationMode, LatticeSpec, MAX_LATTICE_POINTS},
};

use self::parameters::{
    camera::{CameraParams, PlacementParams},
    display::{GlyphParams, WindowParams},
    field::FieldParams,
};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SetupConfig {
    pub window: WindowParams,
    pub lattice: LatticeSpec,
    pub camera: CameraParams,
    pub placement: PlacementParams,
    pub field: FieldParams,
    pub glyphs: GlyphParams,
}

impl SetupConfig {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self, SetupError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, SetupError> {
        // An empty document deserializes to unit, not to an all-defaults map.
        if contents.trim().is_empty() {
            return Ok(SetupConfig::default());
        }
        let config: SetupConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Read `path` (or fall back to defaults), apply command-line overrides,
    /// then validate the result.
    pub fn load(
        path: Option<&Path>,
        mode: Option<FieldVisualizationMode>,
        edge_size: Option<usize>,
    ) -> Result<Self, SetupError> {
        let mut config = match path {
            Some(path) => Self::parse(path)?,
            None => {
                warn!("No config given, using defaults");
                SetupConfig::default()
            }
        };
        if let Some(mode) = mode {
            config.field.mode = mode;
        }
        if let Some(edge_size) = edge_size {
            config.lattice.edge_size = edge_size;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.lattice.is_empty() {
            return Err(SetupError::invalid("lattice edge_size must be at least 1"));
        }
        match self.lattice.checked_len() {
            Some(n) if n <= MAX_LATTICE_POINTS => {}
            _ => {
                return Err(SetupError::invalid(format!(
                    "lattice edge_size {} gives more than {} sample points",
                    self.lattice.edge_size, MAX_LATTICE_POINTS
                )))
            }
        }
        if !(self.lattice.spacing > 0.0) {
            return Err(SetupError::invalid("lattice spacing must be positive"));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(SetupError::invalid("window size must be non-zero"));
        }
        let cam = &self.camera;
        if !(cam.radius > 0.0 && cam.min_radius > 0.0) {
            return Err(SetupError::invalid("camera radii must be positive"));
        }
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(SetupError::invalid(format!(
                "clip planes must satisfy 0 < near < far, got near={} far={}",
                cam.near, cam.far
            )));
        }
        if !(cam.fov_y_degrees > 0.0 && cam.fov_y_degrees < 180.0) {
            return Err(SetupError::invalid("fov_y_degrees must lie in (0, 180)"));
        }
        if let crate::camera::PitchPolicy::Clamp { min, max } = cam.pitch_policy {
            if !(min <= max) {
                return Err(SetupError::invalid(format!(
                    "pitch clamp bounds are inverted: min={} max={}",
                    min, max
                )));
            }
        }
        if !(self.placement.distance > 0.0) {
            return Err(SetupError::invalid("placement distance must be positive"));
        }
        let fade = &self.field.fade;
        if !(fade.opaque_within <= fade.transparent_beyond) || fade.reference == 0.0 {
            return Err(SetupError::invalid(
                "fade needs opaque_within <= transparent_beyond and a non-zero reference",
            ));
        }
        Ok(())
    }

    pub fn camera_target(&self) -> Point3<f64> {
        self.camera.target.unwrap_or_else(|| self.lattice.centre())
    }

    pub fn print(&self) {
        info!(
            "\
Scene:
  Lattice: {n}^3 = {total} samples, spacing {spacing}
  Field mode: {mode:?}
  Fade: opaque within {opaque}, transparent beyond {transparent}, reference {reference}
Camera:
  Target: {target}
  Radius: {radius} (min {min_radius})
  Pitch policy: {pitch:?}
  Projection: fov {fov} deg, near {near}, far {far}
Placement:
  Distance along cursor ray: {distance}",
            n = self.lattice.edge_size,
            total = self.lattice.len(),
            spacing = self.lattice.spacing,
            mode = self.field.mode,
            opaque = self.field.fade.opaque_within,
            transparent = self.field.fade.transparent_beyond,
            reference = self.field.fade.reference,
            target = self.camera_target(),
            radius = self.camera.radius,
            min_radius = self.camera.min_radius,
            pitch = self.camera.pitch_policy,
            fov = self.camera.fov_y_degrees,
            near = self.camera.near,
            far = self.camera.far,
            distance = self.placement.distance,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PitchPolicy;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SetupConfig::from_yaml_str("").unwrap();
        assert_eq!(config, SetupConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.lattice.edge_size, 10);
        assert_eq!(config.field.fade.reference, 70.0);
    }

    #[test]
    fn partial_document_overrides_only_given_fields() {
        let config = SetupConfig::from_yaml_str(
            "\
lattice:
  edge_size: 4
field:
  mode: NearestChargeOnly
camera:
  target: [1.0, 2.0, 3.0]
  pitch_policy:
    type: Clamp
    min: 0.1
    max: 3.0
",
        )
        .unwrap();
        assert_eq!(config.lattice.edge_size, 4);
        assert_eq!(config.lattice.spacing, 10.0);
        assert_eq!(config.field.mode, FieldVisualizationMode::NearestChargeOnly);
        assert_eq!(config.camera_target(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(
            config.camera.pitch_policy,
            PitchPolicy::Clamp { min: 0.1, max: 3.0 }
        );
        assert_eq!(config.placement.distance, 150.0);
    }

    #[test]
    fn target_defaults_to_lattice_centre() {
        let config = SetupConfig::default();
        assert_eq!(config.camera_target(), Point3::new(45.0, 45.0, 45.0));
    }

    #[test]
    fn unknown_mode_is_a_parse_error() {
        let err = SetupConfig::from_yaml_str("field:\n  mode: Sideways\n").unwrap_err();
        assert!(matches!(err, SetupError::Yaml(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = SetupConfig::default();
        config.lattice.spacing = 0.0;
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));

        let mut config = SetupConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 5.0;
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));

        let mut config = SetupConfig::default();
        config.camera.pitch_policy = PitchPolicy::Clamp { min: 1.0, max: 0.0 };
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));

        let mut config = SetupConfig::default();
        config.lattice.edge_size = 0;
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));
    }

    #[test]
    fn oversized_lattice_is_rejected() {
        let config = SetupConfig::from_yaml_str("lattice:\n  edge_size: 3000000\n").unwrap();
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));

        // 101^3 is just past the limit; 100^3 is exactly on it.
        let mut config = SetupConfig::default();
        config.lattice.edge_size = 101;
        assert!(matches!(config.validate(), Err(SetupError::Invalid { .. })));
        config.lattice.edge_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn overrides_are_applied_then_validated() {
        let config = SetupConfig::load(
            Some(Path::new("config.yaml")),
            Some(FieldVisualizationMode::NearestChargeOnly),
            Some(4),
        )
        .unwrap();
        assert_eq!(config.field.mode, FieldVisualizationMode::NearestChargeOnly);
        assert_eq!(config.lattice.len(), 64);

        let err = SetupConfig::load(None, None, Some(3_000_000)).unwrap_err();
        assert!(matches!(err, SetupError::Invalid { .. }));
        let err = SetupConfig::load(None, None, Some(0)).unwrap_err();
        assert!(matches!(err, SetupError::Invalid { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SetupConfig::parse("no/such/config.yaml").unwrap_err();
        assert!(matches!(err, SetupError::Io(_)));
    }

    #[test]
    fn bundled_config_is_valid() {
        let config = SetupConfig::parse("config.yaml").unwrap();
        config.validate().unwrap();
        assert_eq!(config, SetupConfig::default());
    }
}
