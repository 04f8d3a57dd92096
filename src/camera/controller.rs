use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use super::preset::{CameraPreset, CameraState, POLAR_EPSILON};
use crate::options::CameraOptions;

/// Frame rate the damping factor is expressed against.
const REFERENCE_FPS: f32 = 60.0;
/// Radians of orbit per pixel of drag at unit speed.
const ORBIT_RADIANS_PER_PIXEL: f32 = 0.01;
/// Fraction of the orbit distance panned per pixel of drag at unit speed.
const PAN_DISTANCE_PER_PIXEL: f32 = 0.002;
/// Render pose counts as settled when every component is this close.
const SETTLE_EPSILON: f32 = 1.0e-4;
/// Idle spin per second at auto-rotate speed 1.0 (one turn per minute).
const AUTO_ROTATE_RADIANS_PER_SECOND: f32 = TAU / 60.0;

/// Orbit camera around a centered specimen.
///
/// Commands mutate the *commanded* state immediately; the *rendered* pose
/// follows it through [`update`](Self::update) with exponential damping.
/// `min_distance <= distance <= max_distance` holds after every operation.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    state: CameraState,
    initial: CameraState,
    rendered: CameraState,
    min_distance: f32,
    max_distance: f32,

    fovy: f32,
    znear: f32,
    zfar: f32,
    zoom_factor: f32,
    rotate_step: f32,
    rotate_speed: f32,
    pan_speed: f32,
    dolly_speed: f32,

    auto_rotate: bool,
    auto_rotate_speed: f32,
    auto_rotate_paused: bool,
}

impl OrbitCamera {
    /// Mount a camera at `preset`, with projection and command parameters
    /// from `options`.
    pub fn new(preset: &CameraPreset, options: &CameraOptions) -> Self {
        let preset = preset.sanitized();
        let initial = preset.initial_state();
        Self {
            state: initial,
            initial,
            rendered: initial,
            min_distance: preset.min_distance,
            max_distance: preset.max_distance,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
            zoom_factor: options.zoom_factor,
            rotate_step: options.rotate_step,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            dolly_speed: options.dolly_speed,
            auto_rotate: preset.auto_rotate.unwrap_or(options.auto_rotate),
            auto_rotate_speed: if options.auto_rotate_speed.is_finite() {
                options.auto_rotate_speed
            } else {
                0.0
            },
            auto_rotate_paused: false,
        }
    }

    /// Commanded state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Damped pose actually shown this frame.
    pub fn rendered(&self) -> CameraState {
        self.rendered
    }

    /// State restored by [`reset`](Self::reset).
    pub fn initial(&self) -> CameraState {
        self.initial
    }

    /// Distance limits as `(min, max)`.
    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Default zoom factor for parameterless zoom commands.
    pub fn zoom_factor(&self) -> f32 {
        self.zoom_factor
    }

    /// Default azimuthal step for parameterless rotate commands.
    pub fn rotate_step(&self) -> f32 {
        self.rotate_step
    }

    /// Whether the idle spin is switched on.
    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    /// Hold the idle spin while the user is dragging or touching.
    pub fn pause_auto_rotate(&mut self, paused: bool) {
        self.auto_rotate_paused = paused;
    }

    /// Move closer: `distance <- max(distance / factor, min_distance)`.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_in(&mut self, factor: f32) {
        if !is_usable_factor(factor) {
            return;
        }
        self.set_distance(self.state.distance / factor);
    }

    /// Move away: `distance <- min(distance * factor, max_distance)`.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_out(&mut self, factor: f32) {
        if !is_usable_factor(factor) {
            return;
        }
        self.set_distance(self.state.distance * factor);
    }

    /// Advance the azimuthal angle by `step` radians.
    pub fn rotate(&mut self, step: f32) {
        if step.is_finite() {
            self.state.azimuthal_angle += step;
        }
    }

    /// Restore the mount-time distance, angles and target.
    pub fn reset(&mut self) {
        self.state = self.initial;
    }

    /// Orbit by a drag of `delta` pixels.
    pub fn orbit(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let scale = self.rotate_speed * ORBIT_RADIANS_PER_PIXEL;
        self.state.azimuthal_angle -= delta.x * scale;
        self.state.polar_angle = (self.state.polar_angle - delta.y * scale)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Slide the orbit target by a drag of `delta` pixels, in the view
    /// plane. Pan speed scales with distance so the specimen tracks the
    /// pointer at any zoom level.
    pub fn pan(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        let (right, up) = view_plane_basis(&self.state);
        let scale = self.state.distance * self.pan_speed * PAN_DISTANCE_PER_PIXEL;
        self.state.target += right * (-delta.x * scale) + up * (delta.y * scale);
    }

    /// Dolly by `delta` wheel notches or pinch units (positive = closer).
    pub fn dolly(&mut self, delta: f32) {
        if !delta.is_finite() || delta == 0.0 {
            return;
        }
        let factor = (1.0 + self.dolly_speed).powf(delta.abs());
        if delta > 0.0 {
            self.zoom_in(factor);
        } else {
            self.zoom_out(factor);
        }
    }

    /// Advance the idle spin and move the rendered pose toward the
    /// commanded state by `dt` seconds of damping.
    ///
    /// The spin turns the commanded azimuth only; the mount-time state that
    /// [`reset`](Self::reset) restores is never touched.
    pub fn update(&mut self, dt: f32) {
        let spinning = self.auto_rotate && !self.auto_rotate_paused;
        if spinning && dt.is_finite() && dt > 0.0 {
            self.state.azimuthal_angle +=
                self.auto_rotate_speed * AUTO_ROTATE_RADIANS_PER_SECOND * dt;
        }

        let damping = self.state.damping_factor;
        if damping <= 0.0 || damping >= 1.0 {
            self.settle();
            return;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }

        let alpha = 1.0 - (1.0 - damping).powf(dt * REFERENCE_FPS);
        let goal = self.state;
        let pose = &mut self.rendered;
        pose.distance += (goal.distance - pose.distance) * alpha;
        pose.azimuthal_angle +=
            (goal.azimuthal_angle - pose.azimuthal_angle) * alpha;
        pose.polar_angle += (goal.polar_angle - pose.polar_angle) * alpha;
        pose.target = pose.target.lerp(goal.target, alpha);
        pose.damping_factor = goal.damping_factor;

        if self.is_settled() {
            self.settle();
        }
    }

    /// Jump the rendered pose straight to the commanded state.
    pub fn settle(&mut self) {
        self.rendered = self.state;
    }

    /// Whether the rendered pose has caught up with the commanded state.
    pub fn is_settled(&self) -> bool {
        let (goal, pose) = (&self.state, &self.rendered);
        (goal.distance - pose.distance).abs() < SETTLE_EPSILON
            && (goal.azimuthal_angle - pose.azimuthal_angle).abs()
                < SETTLE_EPSILON
            && (goal.polar_angle - pose.polar_angle).abs() < SETTLE_EPSILON
            && goal.target.distance(pose.target) < SETTLE_EPSILON
    }

    /// Perspective camera for the rendered pose.
    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.rendered.eye(),
            target: self.rendered.target,
            up: Vec3::Y,
            aspect,
            fovy: self.fovy,
            znear: self.znear,
            zfar: self.zfar,
        }
    }

    fn set_distance(&mut self, distance: f32) {
        self.state.distance = distance.clamp(self.min_distance, self.max_distance);
    }
}

fn is_usable_factor(factor: f32) -> bool {
    factor.is_finite() && factor > 0.0
}

/// Screen-right and screen-up vectors for a camera in `state`.
fn view_plane_basis(state: &CameraState) -> (Vec3, Vec3) {
    let forward = -state.direction();
    let right = forward.cross(Vec3::Y).normalize_or_zero();
    let up = right.cross(forward).normalize_or_zero();
    (right, up)
}
