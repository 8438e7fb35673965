use nalgebra::Point3;

use crate::camera::{OrbitCamera, OrbitCameraState, Perspective, PitchPolicy};

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraParams {
    // Initial orbit, angles in radians.
    pub yaw: f64,
    pub pitch: f64,
    pub radius: f64,
    // Point the camera orbits. Defaults to the centre of the lattice.
    pub target: Option<Point3<f64>>,
    // Angular speed of the orbit keys, radians per second.
    pub rate: f64,
    // Zoom speed, length units per second.
    pub zoom_rate: f64,
    pub min_radius: f64,
    pub pitch_policy: PitchPolicy,
    // Projection.
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraParams {
    fn default() -> Self {
        CameraParams {
            yaw: 0.6,
            pitch: 1.1,
            radius: 180.0,
            target: None,
            rate: 1.0,
            zoom_rate: 60.0,
            min_radius: 5.0,
            pitch_policy: PitchPolicy::Wrap,
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl CameraParams {
    pub fn orbit_camera(&self, target: Point3<f64>, aspect: f64) -> OrbitCamera {
        OrbitCamera {
            state: OrbitCameraState {
                yaw: self.yaw,
                pitch: self.pitch_policy.apply(self.pitch),
                target,
                radius: self.radius,
            },
            rate: self.rate,
            zoom_rate: self.zoom_rate,
            min_radius: self.min_radius,
            pitch_policy: self.pitch_policy,
            perspective: Perspective {
                fov_y: self.fov_y_degrees.to_radians(),
                aspect,
                near: self.near,
                far: self.far,
            },
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlacementParams {
    // Distance from the eye, along the cursor ray, at which charges are dropped.
    pub distance: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        PlacementParams { distance: 150.0 }
    }
}
