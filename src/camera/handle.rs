use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::controller::OrbitCamera;
use super::preset::CameraState;

/// Host-facing camera command handle.
///
/// Obtained once from [`Viewport::camera_handle`](crate::viewport::Viewport::camera_handle)
/// and valid for the viewport's whole life. The viewport attaches a fresh
/// [`OrbitCamera`] whenever a 3D scene mounts and detaches it when the
/// scene goes away; while detached (loading, failed, flat-image specimens)
/// every command is a silent no-op.
///
/// Cloning shares the same underlying slot. The handle is `!Send`: camera
/// state lives on the render/interaction thread.
#[derive(Clone, Default)]
pub struct CameraHandle {
    slot: Rc<RefCell<Option<OrbitCamera>>>,
}

impl CameraHandle {
    /// Create a detached handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom in by the configured default factor.
    pub fn zoom_in(&self) {
        self.apply(|cam| cam.zoom_in(cam.zoom_factor()));
    }

    /// Zoom out by the configured default factor.
    pub fn zoom_out(&self) {
        self.apply(|cam| cam.zoom_out(cam.zoom_factor()));
    }

    /// Rotate by the configured default azimuthal step.
    pub fn rotate(&self) {
        self.apply(|cam| cam.rotate(cam.rotate_step()));
    }

    /// Restore the mount-time camera placement.
    pub fn reset(&self) {
        self.apply(OrbitCamera::reset);
    }

    /// Zoom in by an explicit factor.
    pub fn zoom_in_by(&self, factor: f32) {
        self.apply(|cam| cam.zoom_in(factor));
    }

    /// Zoom out by an explicit factor.
    pub fn zoom_out_by(&self, factor: f32) {
        self.apply(|cam| cam.zoom_out(factor));
    }

    /// Rotate by an explicit azimuthal step in radians.
    pub fn rotate_by(&self, step: f32) {
        self.apply(|cam| cam.rotate(step));
    }

    /// Whether a camera is currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.slot.try_borrow().is_ok_and(|slot| slot.is_some())
    }

    /// Snapshot of the attached camera's commanded state.
    #[must_use]
    pub fn state(&self) -> Option<CameraState> {
        self.with_camera(OrbitCamera::state)
    }

    /// Run `f` against the attached camera, if any.
    pub fn with_camera<R>(
        &self,
        f: impl FnOnce(&OrbitCamera) -> R,
    ) -> Option<R> {
        let slot = self.slot.try_borrow().ok()?;
        slot.as_ref().map(f)
    }

    /// Run `f` against the attached camera mutably, if any.
    ///
    /// Re-entrant calls (from inside another `with_camera*` closure) are
    /// dropped rather than panicking.
    pub fn with_camera_mut<R>(
        &self,
        f: impl FnOnce(&mut OrbitCamera) -> R,
    ) -> Option<R> {
        let Ok(mut slot) = self.slot.try_borrow_mut() else {
            log::debug!("camera busy; command dropped");
            return None;
        };
        slot.as_mut().map(f)
    }

    fn apply(&self, command: impl FnOnce(&mut OrbitCamera)) {
        let _ = self.with_camera_mut(command);
    }

    pub(crate) fn attach(&self, camera: OrbitCamera) {
        if let Ok(mut slot) = self.slot.try_borrow_mut() {
            *slot = Some(camera);
        }
    }

    pub(crate) fn detach(&self) {
        if let Ok(mut slot) = self.slot.try_borrow_mut() {
            *slot = None;
        }
    }
}

impl fmt::Debug for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
