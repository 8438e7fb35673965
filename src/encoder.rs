use nalgebra::{Matrix4, UnitQuaternion, Vector3};

use crate::field::FieldSample;

const MIN_DIRECTION: f64 = 1e-9;

/// Linearly map `value` from the `from` range onto the `to` range, without
/// clamping.
pub fn remap(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    to.0 + (to.1 - to.0) * (value - from.0) / (from.1 - from.0)
}

/// Opacity as a function of distance to the nearest charge.
///
/// Fully opaque up to `opaque_within`, invisible beyond `transparent_beyond`,
/// and in between the remap of `[reference, 0]` onto `[0, 1]`. With the default
/// thresholds (30, 50, 70) the remap does not meet either clamp continuously.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FadePolicy {
    pub opaque_within: f64,
    pub transparent_beyond: f64,
    pub reference: f64,
}

impl Default for FadePolicy {
    fn default() -> Self {
        FadePolicy {
            opaque_within: 30.0,
            transparent_beyond: 50.0,
            reference: 70.0,
        }
    }
}

impl FadePolicy {
    /// The unclamped falloff.
    pub fn interpolate(&self, nearest_distance: f64) -> f64 {
        remap(nearest_distance, (self.reference, 0.0), (0.0, 1.0))
    }

    pub fn alpha(&self, nearest_distance: f64) -> f64 {
        if nearest_distance > self.transparent_beyond {
            0.0
        } else if nearest_distance <= self.opaque_within {
            1.0
        } else {
            self.interpolate(nearest_distance)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphVisual {
    pub orientation: Matrix4<f64>,
    pub alpha: f64,
}

/// Rotation taking the glyph's forward axis (+Z) onto `direction`, with world Z
/// kept as up where possible. A zero direction leaves the glyph unrotated.
pub fn orientation(direction: &Vector3<f64>) -> Matrix4<f64> {
    let Some(dir) = direction.try_normalize(MIN_DIRECTION) else {
        return Matrix4::identity();
    };
    let up = if dir.cross(&Vector3::z()).norm() > 1e-6 {
        Vector3::z()
    } else {
        Vector3::y()
    };
    UnitQuaternion::face_towards(&dir, &up).to_homogeneous()
}

#[derive(Debug, Clone, Default)]
pub struct FieldVisualEncoder {
    pub fade: FadePolicy,
}

impl FieldVisualEncoder {
    pub fn new(fade: FadePolicy) -> Self {
        FieldVisualEncoder { fade }
    }

    pub fn encode(&self, sample: &FieldSample) -> GlyphVisual {
        GlyphVisual {
            orientation: orientation(&sample.direction),
            alpha: self.fade.alpha(sample.nearest_distance()),
        }
    }
}
