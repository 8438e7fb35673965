use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

/// How pitch is treated as it accumulates.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(tag = "type")]
pub enum PitchPolicy {
    /// Leave pitch unbounded. The camera can swing over the poles and end up
    /// upside down.
    #[default]
    Wrap,
    Clamp { min: f64, max: f64 },
}

impl PitchPolicy {
    pub fn apply(&self, pitch: f64) -> f64 {
        match *self {
            PitchPolicy::Wrap => pitch,
            PitchPolicy::Clamp { min, max } => pitch.clamp(min, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCameraState {
    pub yaw: f64,
    pub pitch: f64,
    pub target: Point3<f64>,
    pub radius: f64,
}

/// Directional inputs held during one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Perspective {
    pub fn matrix(&self) -> Matrix4<f64> {
        Matrix4::new_perspective(self.aspect, self.fov_y, self.near, self.far)
    }
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub state: OrbitCameraState,
    /// Angular speed for yaw and pitch, in radians per second.
    pub rate: f64,
    pub zoom_rate: f64,
    pub min_radius: f64,
    pub pitch_policy: PitchPolicy,
    pub perspective: Perspective,
}

impl OrbitCamera {
    pub fn update(&mut self, dt: f64, input: &OrbitInput) {
        let step = self.rate * dt;
        let s = &mut self.state;
        if input.forward {
            s.pitch -= step;
        }
        if input.back {
            s.pitch += step;
        }
        if input.left {
            s.yaw -= step;
        }
        if input.right {
            s.yaw += step;
        }
        s.pitch = self.pitch_policy.apply(s.pitch);

        let zoom = self.zoom_rate * dt;
        if input.zoom_in {
            s.radius -= zoom;
        }
        if input.zoom_out {
            s.radius += zoom;
        }
        // dont allow zoom to reach the target or the view degenerates
        s.radius = f64::max(s.radius, self.min_radius);

        debug!(
            "Camera yaw={:.3} pitch={:.3} radius={:.2}",
            s.yaw, s.pitch, s.radius
        );
    }

    pub fn eye(&self) -> Point3<f64> {
        orbit_eye(&self.state)
    }

    /// Look-at from the eye to the target with world Z as up.
    pub fn view(&self) -> Matrix4<f64> {
        let eye = self.eye();
        let forward = self.state.target - eye;
        let up = if forward.cross(&Vector3::z()).norm() > 1e-9 * forward.norm() {
            Vector3::z()
        } else {
            // Looking straight along Z: use the up vector the Z-up frame tends to
            // as the camera approaches this pole.
            let (sy, cy) = self.state.yaw.sin_cos();
            -Vector3::new(cy, sy, 0.0) * self.state.pitch.cos().signum()
        };
        Matrix4::look_at_rh(&eye, &self.state.target, &up)
    }

    pub fn projection(&self) -> Matrix4<f64> {
        self.perspective.matrix()
    }
}

pub fn orbit_eye(s: &OrbitCameraState) -> Point3<f64> {
    let (sp, cp) = s.pitch.sin_cos();
    let (sy, cy) = s.yaw.sin_cos();
    s.target + s.radius * Vector3::new(cy * sp, sy * sp, cp)
}
