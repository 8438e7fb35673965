use nalgebra::{Matrix4, Point3, Vector4};

use crate::camera::OrbitCamera;

// Rays shorter than this are treated as having no direction.
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Window-space rectangle the scene is drawn into. Origin top-left, y down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Turns the cursor into the point where a new charge would be dropped: a fixed
/// distance from the eye along the ray under the cursor.
#[derive(Debug, Clone)]
pub struct CursorProjector {
    pub distance: f64,
    last: Point3<f64>,
}

impl CursorProjector {
    pub fn new(distance: f64, initial: Point3<f64>) -> Self {
        CursorProjector {
            distance,
            last: initial,
        }
    }

    pub fn placement(&self) -> Point3<f64> {
        self.last
    }

    /// Project the cursor through `camera`. Falls back to the previous placement
    /// point whenever no ray can be formed.
    pub fn project(
        &mut self,
        cursor: Option<(f64, f64)>,
        viewport: &Viewport,
        camera: &OrbitCamera,
    ) -> Point3<f64> {
        let Some(cursor) = cursor else {
            return self.last;
        };
        let view_proj = camera.projection() * camera.view();
        match unproject_ray(cursor, viewport, &view_proj) {
            Some((near, far)) => self.place_along(camera.eye(), near, far),
            None => self.last,
        }
    }

    pub fn place_along(
        &mut self,
        eye: Point3<f64>,
        near: Point3<f64>,
        far: Point3<f64>,
    ) -> Point3<f64> {
        if let Some(dir) = (far - near).try_normalize(MIN_RAY_LENGTH) {
            let p = eye + dir * self.distance;
            if p.iter().all(|x| x.is_finite()) {
                self.last = p;
            }
        }
        self.last
    }
}

/// World-space points under the cursor on the near and far clip planes.
pub fn unproject_ray(
    cursor: (f64, f64),
    viewport: &Viewport,
    view_proj: &Matrix4<f64>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    if viewport.is_empty() {
        return None;
    }
    let inv = view_proj.try_inverse()?;
    let ndc_x = 2.0 * (cursor.0 - viewport.x) / viewport.width - 1.0;
    let ndc_y = 1.0 - 2.0 * (cursor.1 - viewport.y) / viewport.height;

    let unproject = |ndc_z: f64| -> Option<Point3<f64>> {
        let h = inv * Vector4::new(ndc_x, ndc_y, ndc_z, 1.0);
        if h.w.abs() < f64::EPSILON {
            return None;
        }
        let p = Point3::from(h.xyz() / h.w);
        p.iter().all(|x| x.is_finite()).then_some(p)
    };
    Some((unproject(-1.0)?, unproject(1.0)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{OrbitCameraState, Perspective, PitchPolicy};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn camera() -> OrbitCamera {
        OrbitCamera {
            state: OrbitCameraState {
                yaw: 0.0,
                pitch: FRAC_PI_2,
                target: Point3::origin(),
                radius: 100.0,
            },
            rate: 1.0,
            zoom_rate: 1.0,
            min_radius: 1.0,
            pitch_policy: PitchPolicy::Wrap,
            perspective: Perspective {
                fov_y: 45f64.to_radians(),
                aspect: 2.0,
                near: 1.0,
                far: 1000.0,
            },
        }
    }

    fn viewport() -> Viewport {
        Viewport {
            x: 0.0,
            y: 0.0,
            width: 800.0,
            height: 400.0,
        }
    }

    #[test]
    fn viewport_centre_projects_towards_target() {
        let cam = camera();
        let mut projector = CursorProjector::new(60.0, Point3::new(7.0, 7.0, 7.0));
        let p = projector.project(Some((400.0, 200.0)), &viewport(), &cam);
        // Eye sits at +100 on X looking back at the origin.
        assert_relative_eq!(p, Point3::new(40.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(projector.placement(), p);
    }

    #[test]
    fn cursor_above_centre_places_above_the_view_axis() {
        let cam = camera();
        let mut projector = CursorProjector::new(60.0, Point3::origin());
        let p = projector.project(Some((400.0, 50.0)), &viewport(), &cam);
        assert!(p.z > 0.0);
        assert_relative_eq!((p - cam.eye()).norm(), 60.0, epsilon = 1e-6);
    }

    #[test]
    fn coincident_near_and_far_keep_previous_point() {
        let previous = Point3::new(1.0, 2.0, 3.0);
        let mut projector = CursorProjector::new(60.0, previous);
        let q = Point3::new(5.0, 5.0, 5.0);
        let p = projector.place_along(Point3::new(100.0, 0.0, 0.0), q, q);
        assert_eq!(p, previous);
        assert!(p.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn empty_viewport_keeps_previous_point() {
        let previous = Point3::new(1.0, 2.0, 3.0);
        let mut projector = CursorProjector::new(60.0, previous);
        let empty = Viewport {
            width: 0.0,
            ..viewport()
        };
        assert_eq!(projector.project(Some((0.0, 0.0)), &empty, &camera()), previous);
    }

    #[test]
    fn missing_cursor_keeps_previous_point() {
        let previous = Point3::new(1.0, 2.0, 3.0);
        let mut projector = CursorProjector::new(60.0, previous);
        assert_eq!(projector.project(None, &viewport(), &camera()), previous);
    }

    #[test]
    fn singular_view_projection_has_no_ray() {
        assert!(unproject_ray((1.0, 1.0), &viewport(), &Matrix4::zeros()).is_none());
    }
}
