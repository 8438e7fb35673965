use std::path::Path;

use log::{debug, info};
use nalgebra::{Matrix4, Point3};

use crate::{
    camera::{OrbitCamera, OrbitInput},
    charge::{ChargeSet, Sign},
    config::setup::{parameters::display::GlyphParams, SetupConfig},
    cursor::{CursorProjector, Viewport},
    encoder::{FieldVisualEncoder, GlyphVisual},
    error::{AssetLoadError, SetupError},
    field::FieldSampler,
    input::InputEdgeTracker,
};

/// Logical keys the scene reacts to. Hosts map their own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    PitchForward,
    PitchBack,
    YawLeft,
    YawRight,
    ZoomIn,
    ZoomOut,
    PlacePositive,
    PlaceNegative,
}

pub trait WindowInput {
    fn poll_events(&mut self);
    fn is_key_down(&self, key: Key) -> bool;
    /// Window-space cursor, or `None` when it is outside the window.
    fn cursor_position(&self) -> Option<(f64, f64)>;
    fn viewport(&self) -> Viewport;
    /// Seconds since the window opened.
    fn elapsed_time(&self) -> f64;
    fn should_close(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

pub trait Renderer {
    fn load_mesh(&mut self, path: &Path) -> Result<MeshHandle, AssetLoadError>;
    fn submit(
        &mut self,
        mesh: MeshHandle,
        model: &Matrix4<f64>,
        view: &Matrix4<f64>,
        projection: &Matrix4<f64>,
        color: [f32; 4],
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Close,
}

fn model_matrix(position: &Point3<f64>, orientation: &Matrix4<f64>, scale: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&position.coords) * orientation * Matrix4::new_scaling(scale)
}

fn with_alpha(rgb: [f32; 3], alpha: f64) -> [f32; 4] {
    [rgb[0], rgb[1], rgb[2], alpha as f32]
}

/// Everything that lives across frames.
pub struct Scene {
    camera: OrbitCamera,
    projector: CursorProjector,
    charges: ChargeSet,
    sampler: FieldSampler,
    encoder: FieldVisualEncoder,
    edges: InputEdgeTracker,
    glyphs: GlyphParams,
    glyph_mesh: MeshHandle,
    charge_mesh: MeshHandle,
    last_time: f64,
    n_frames: u64,
}

impl Scene {
    /// Validate the configuration and load both meshes. Any failure aborts
    /// setup before anything is drawn.
    pub fn setup<R: Renderer + ?Sized>(
        config: &SetupConfig,
        renderer: &mut R,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        let glyph_mesh = renderer.load_mesh(&config.glyphs.glyph_mesh)?;
        let charge_mesh = renderer.load_mesh(&config.glyphs.charge_mesh)?;

        let target = config.camera_target();
        let camera = config
            .camera
            .orbit_camera(target, config.window.aspect());
        let sampler = FieldSampler::new(&config.lattice, config.field.mode);
        info!(
            "Scene ready: {} lattice points, mode {:?}",
            sampler.points().len(),
            sampler.mode
        );

        Ok(Scene {
            camera,
            projector: CursorProjector::new(config.placement.distance, target),
            charges: ChargeSet::new(),
            sampler,
            encoder: FieldVisualEncoder::new(config.field.fade),
            edges: InputEdgeTracker::new(),
            glyphs: config.glyphs.clone(),
            glyph_mesh,
            charge_mesh,
            last_time: 0.0,
            n_frames: 0,
        })
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn charges(&self) -> &ChargeSet {
        &self.charges
    }

    pub fn placement(&self) -> Point3<f64> {
        self.projector.placement()
    }

    pub fn n_frames(&self) -> u64 {
        self.n_frames
    }

    /// Glyph visuals for the current charges, in lattice order.
    pub fn glyph_visuals(&self) -> Vec<GlyphVisual> {
        self.sampler
            .sample_all(&self.charges)
            .iter()
            .map(|s| self.encoder.encode(s))
            .collect()
    }

    /// Advance by one frame: read input, move the camera, track the cursor,
    /// place charges on key release, then resample the field and submit every
    /// draw.
    pub fn frame<W, R>(&mut self, window: &mut W, renderer: &mut R) -> FrameStatus
    where
        W: WindowInput + ?Sized,
        R: Renderer + ?Sized,
    {
        window.poll_events();
        if window.should_close() {
            info!("Window closing after {} frames", self.n_frames);
            return FrameStatus::Close;
        }

        let now = window.elapsed_time();
        let dt = (now - self.last_time).max(0.0);
        self.last_time = now;

        let orbit = OrbitInput {
            forward: window.is_key_down(Key::PitchForward),
            back: window.is_key_down(Key::PitchBack),
            left: window.is_key_down(Key::YawLeft),
            right: window.is_key_down(Key::YawRight),
            zoom_in: window.is_key_down(Key::ZoomIn),
            zoom_out: window.is_key_down(Key::ZoomOut),
        };
        self.camera.update(dt, &orbit);

        let placement =
            self.projector
                .project(window.cursor_position(), &window.viewport(), &self.camera);

        for (sign, key) in [
            (Sign::Positive, Key::PlacePositive),
            (Sign::Negative, Key::PlaceNegative),
        ] {
            if self.edges.update(sign, window.is_key_down(key)) {
                let outcome = self.charges.place(placement, sign);
                debug!("Placement of {:?} charge: {:?}", sign, outcome);
            }
        }

        self.draw(renderer);
        self.n_frames += 1;
        FrameStatus::Continue
    }

    fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        let view = self.camera.view();
        let projection = self.camera.projection();
        let glyphs = &self.glyphs;

        let samples = self.sampler.sample_all(&self.charges);
        for (p, sample) in self.sampler.points().iter().zip(&samples) {
            let visual = self.encoder.encode(sample);
            renderer.submit(
                self.glyph_mesh,
                &model_matrix(p, &visual.orientation, glyphs.glyph_scale),
                &view,
                &projection,
                with_alpha(glyphs.glyph_color, visual.alpha),
            );
        }

        for charge in self.charges.iter() {
            let rgb = match charge.sign {
                Sign::Positive => glyphs.positive_color,
                Sign::Negative => glyphs.negative_color,
            };
            renderer.submit(
                self.charge_mesh,
                &model_matrix(&charge.position, &Matrix4::identity(), glyphs.charge_scale),
                &view,
                &projection,
                with_alpha(rgb, 1.0),
            );
        }

        if glyphs.show_placement_marker {
            renderer.submit(
                self.charge_mesh,
                &model_matrix(&self.placement(), &Matrix4::identity(), glyphs.marker_scale),
                &view,
                &projection,
                glyphs.marker_color,
            );
        }
    }

    /// Drive frames until the window asks to close.
    pub fn run<W, R>(&mut self, window: &mut W, renderer: &mut R)
    where
        W: WindowInput + ?Sized,
        R: Renderer + ?Sized,
    {
        while self.frame(window, renderer) == FrameStatus::Continue {}
    }
}
