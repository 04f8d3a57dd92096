//! The interactive specimen viewport.
//!
//! A [`Viewport`] owns the asset loader, the gesture processor, the light
//! rig and the camera slot behind its [`CameraHandle`]. Hosts push a
//! [`ViewportConfig`] whenever the selected specimen or interaction mode
//! changes, call [`tick`](Viewport::tick) once per frame, and read the
//! result through [`frame`](Viewport::frame).
//!
//! A camera exists only while a 3D scene is mounted. It is created with the
//! specimen's preset when the scene becomes ready and dropped when the asset
//! reference changes; scale and interaction-mode changes never touch it.

/// Camera operations understood by the viewport.
pub mod command;
/// Per-frame render descriptions.
pub mod frame;
/// Ambient plus key/fill directional lights.
pub mod lighting;
/// Scene centering and size normalization.
pub mod normalize;

use std::time::Duration;

pub use command::ViewportCommand;
pub use frame::{Fallback, SceneFrame, ViewportFrame};
use glam::Mat4;
pub use lighting::{LightingRig, LightingUniform};

use crate::asset::{
    AssetLoadState, AssetLoader, AssetSource, LoadEvent, ResolvedAsset,
};
use crate::camera::core::CameraUniform;
use crate::camera::{CameraHandle, CameraPreset, OrbitCamera};
use crate::catalog::{ImageMarker, Specimen, SpecimenScale};
use crate::error::AnatomicaError;
use crate::input::{GestureProcessor, InputEvent, InteractionMode};
use crate::options::Options;

/// Inbound configuration pushed by the host.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewportConfig {
    /// Asset locator of the specimen to show.
    pub asset_ref: String,
    /// Specimen scale; `None` means identity.
    pub scale: Option<SpecimenScale>,
    /// `true` makes the primary button / one finger pan instead of rotate.
    pub pan_mode: bool,
    /// Mount-time camera placement; `None` uses the camera options.
    pub camera: Option<CameraPreset>,
    /// Hotspots for the flat-image presentation.
    pub markers: Vec<ImageMarker>,
}

impl ViewportConfig {
    /// Config for `asset_ref` with everything else defaulted.
    #[must_use]
    pub fn new(asset_ref: impl Into<String>) -> Self {
        Self {
            asset_ref: asset_ref.into(),
            ..Self::default()
        }
    }

    /// Config presenting `specimen` in the given interaction mode.
    #[must_use]
    pub fn for_specimen(specimen: &Specimen, pan_mode: bool) -> Self {
        Self {
            asset_ref: specimen.asset_ref.clone(),
            scale: specimen.scale,
            pan_mode,
            camera: specimen.camera,
            markers: specimen.markers.clone(),
        }
    }
}

/// Interactive 3D specimen viewport.
pub struct Viewport {
    options: Options,
    loader: AssetLoader,
    handle: CameraHandle,
    gestures: GestureProcessor,
    lighting: LightingRig,
    config: Option<ViewportConfig>,
    scale: SpecimenScale,
    model: Mat4,
    aspect: f32,
}

impl Viewport {
    /// Create a viewport whose loader reads through the configured
    /// default source.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::ThreadSpawn`] if the loader worker cannot start.
    pub fn new(options: Options) -> Result<Self, AnatomicaError> {
        let loader = AssetLoader::from_options(&options.loader)?;
        Ok(Self::with_loader(options, loader))
    }

    /// Create a viewport reading assets through `source`.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::ThreadSpawn`] if the loader worker cannot start.
    pub fn with_source(
        options: Options,
        source: Box<dyn AssetSource>,
    ) -> Result<Self, AnatomicaError> {
        let loader = AssetLoader::new(source)?;
        Ok(Self::with_loader(options, loader))
    }

    fn with_loader(options: Options, loader: AssetLoader) -> Self {
        Self {
            gestures: GestureProcessor::new(&options.input),
            lighting: LightingRig::from_options(&options.lighting),
            options,
            loader,
            handle: CameraHandle::new(),
            config: None,
            scale: SpecimenScale::IDENTITY,
            model: Mat4::IDENTITY,
            aspect: 1.0,
        }
    }

    /// The host's camera command handle. Every call returns a clone of the
    /// same handle.
    #[must_use]
    pub fn camera_handle(&self) -> CameraHandle {
        self.handle.clone()
    }

    /// Apply host configuration.
    ///
    /// A new asset reference drops the camera and starts a new load
    /// generation; a scale change only recomputes the model transform; a
    /// mode change only affects the next gesture.
    pub fn apply_config(&mut self, config: ViewportConfig) {
        let previous = self.config.take();

        let mode = InteractionMode::from_pan_mode(config.pan_mode);
        if previous.as_ref().map(|c| c.pan_mode) != Some(config.pan_mode) {
            self.gestures.set_mode(mode);
        }

        let previous_scale = self.scale;
        let scale = config.scale.unwrap_or_default().sanitized();
        let asset_changed =
            previous.as_ref().map(|c| c.asset_ref.as_str())
                != Some(config.asset_ref.as_str());

        self.scale = scale;
        self.config = Some(config);

        if asset_changed {
            self.begin_load();
        } else if previous_scale != scale {
            self.refresh_model();
        }
    }

    /// Current configuration, if any has been applied.
    #[must_use]
    pub fn config(&self) -> Option<&ViewportConfig> {
        self.config.as_ref()
    }

    /// Advance one frame: collect settled loads and animate the camera.
    ///
    /// Idle auto-rotation holds while a drag or touch is in progress.
    pub fn tick(&mut self, dt: f32) {
        if let Some(event) = self.loader.poll() {
            self.on_load_event(event);
        }
        let interacting = self.gestures.is_gesture_active();
        let _ = self.handle.with_camera_mut(|camera| {
            camera.pause_auto_rotate(interacting);
            camera.update(dt);
        });
    }

    /// Block until the current load settles or `timeout` elapses, then
    /// report the load state.
    pub fn wait_for_load(&mut self, timeout: Duration) -> AssetLoadState {
        if let Some(event) = self.loader.wait(timeout) {
            self.on_load_event(event);
        }
        self.loader.state()
    }

    /// Run a camera command. No-op while no scene is mounted.
    pub fn execute(&mut self, command: ViewportCommand) {
        match command {
            ViewportCommand::ZoomIn => self.handle.zoom_in(),
            ViewportCommand::ZoomOut => self.handle.zoom_out(),
            ViewportCommand::Rotate => self.handle.rotate(),
            ViewportCommand::Reset => self.handle.reset(),
            ViewportCommand::Orbit { delta } => {
                let _ = self.handle.with_camera_mut(|c| c.orbit(delta));
            }
            ViewportCommand::Pan { delta } => {
                let _ = self.handle.with_camera_mut(|c| c.pan(delta));
            }
            ViewportCommand::Dolly { delta } => {
                let _ = self.handle.with_camera_mut(|c| c.dolly(delta));
            }
        }
    }

    /// Feed a raw pointer or touch event through the gesture mapping.
    pub fn handle_input(&mut self, event: InputEvent) {
        for command in self.gestures.handle_event(event) {
            self.execute(command);
        }
    }

    /// Update the projection aspect ratio. Zero-sized surfaces are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Load state of the current asset.
    #[must_use]
    pub fn load_state(&self) -> AssetLoadState {
        self.loader.state()
    }

    /// Current interaction mode.
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.gestures.mode()
    }

    /// The fixed light rig.
    #[must_use]
    pub fn lighting(&self) -> &LightingRig {
        &self.lighting
    }

    /// Model transform of the mounted scene (identity otherwise).
    #[must_use]
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// The asset loader, for cache inspection.
    #[must_use]
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// Describe what should be drawn this frame.
    #[must_use]
    pub fn frame(&self) -> ViewportFrame {
        match self.loader.state() {
            AssetLoadState::Idle => ViewportFrame::Empty,
            AssetLoadState::Loading => ViewportFrame::Fallback(Fallback::Loading),
            AssetLoadState::Failed => {
                let message = self
                    .loader
                    .error()
                    .map_or_else(String::new, ToString::to_string);
                ViewportFrame::Fallback(Fallback::Failed { message })
            }
            AssetLoadState::Ready => match self.loader.resolved() {
                Some(ResolvedAsset::Scene(scene)) => {
                    let camera = self
                        .handle
                        .with_camera(|c| {
                            CameraUniform::from_camera(&c.camera(self.aspect))
                        })
                        .unwrap_or_default();
                    ViewportFrame::Scene(SceneFrame {
                        scene: scene.clone(),
                        model: self.model,
                        camera,
                        lighting: self.lighting.uniform(),
                    })
                }
                Some(ResolvedAsset::FlatImage(locator)) => {
                    ViewportFrame::FlatImage {
                        locator: locator.clone(),
                        markers: self
                            .config
                            .as_ref()
                            .map(|c| c.markers.clone())
                            .unwrap_or_default(),
                    }
                }
                None => ViewportFrame::Empty,
            },
        }
    }

    fn begin_load(&mut self) {
        self.handle.detach();
        self.gestures.cancel();
        self.model = Mat4::IDENTITY;

        let Some(asset_ref) = self.config.as_ref().map(|c| c.asset_ref.clone())
        else {
            return;
        };
        let ticket = self.loader.request(&asset_ref);
        log::info!("[gen {}] showing {asset_ref}", ticket.generation);
        if ticket.state == AssetLoadState::Ready {
            self.mount_resolved();
        }
    }

    fn on_load_event(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Ready { .. } => self.mount_resolved(),
            LoadEvent::Failed { generation, error } => {
                log::info!("[gen {generation}] showing failed fallback: {error}");
                self.handle.detach();
            }
        }
    }

    fn mount_resolved(&mut self) {
        match self.loader.resolved() {
            Some(ResolvedAsset::Scene(_)) => {
                self.refresh_model();
                let preset = self
                    .config
                    .as_ref()
                    .and_then(|c| c.camera)
                    .unwrap_or_else(|| self.options.camera.preset());
                self.handle
                    .attach(OrbitCamera::new(&preset, &self.options.camera));
            }
            Some(ResolvedAsset::FlatImage(_)) | None => self.handle.detach(),
        }
    }

    fn refresh_model(&mut self) {
        if let Some(ResolvedAsset::Scene(scene)) = self.loader.resolved() {
            self.model = normalize::model_transform(&scene.bounds, self.scale);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;
    use std::sync::mpsc;

    use glam::Vec3;

    use super::*;
    use crate::asset::fixtures::TRIANGLE_GLTF;
    use crate::asset::MemorySource;
    use crate::error::AssetLoadError;
    use crate::input::MouseButton;

    const WAIT: Duration = Duration::from_secs(5);

    fn viewport() -> Viewport {
        let source = MemorySource::new()
            .with_asset("a.gltf", TRIANGLE_GLTF)
            .with_asset("b.glb", TRIANGLE_GLTF)
            .with_asset("broken.glb", b"not gltf".to_vec());
        Viewport::with_source(Options::default(), Box::new(source)).unwrap()
    }

    fn mounted(asset_ref: &str) -> Viewport {
        let mut vp = viewport();
        vp.apply_config(ViewportConfig::new(asset_ref));
        assert_eq!(vp.wait_for_load(WAIT), AssetLoadState::Ready);
        vp
    }

    /// Blocks the first fetch of `a.gltf` until released.
    struct GatedSource {
        gate: Option<mpsc::Receiver<()>>,
    }

    impl AssetSource for GatedSource {
        fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
            if asset_ref == "a.gltf" {
                if let Some(gate) = self.gate.take() {
                    let _ = gate.recv();
                }
            }
            Ok(TRIANGLE_GLTF.as_bytes().to_vec())
        }
    }

    #[test]
    fn idle_viewport_is_empty_and_detached() {
        let vp = viewport();
        assert_eq!(vp.frame(), ViewportFrame::Empty);
        assert_eq!(vp.load_state(), AssetLoadState::Idle);
        assert!(!vp.camera_handle().is_attached());
    }

    #[test]
    fn commands_before_mount_are_noops() {
        let (release, gate) = mpsc::channel();
        let source = GatedSource { gate: Some(gate) };
        let mut vp =
            Viewport::with_source(Options::default(), Box::new(source))
                .unwrap();
        let handle = vp.camera_handle();
        handle.zoom_in();
        handle.rotate();

        vp.apply_config(ViewportConfig::new("a.gltf"));
        assert_eq!(vp.frame(), ViewportFrame::Fallback(Fallback::Loading));
        handle.zoom_out();
        vp.execute(ViewportCommand::Reset);
        assert!(handle.state().is_none());

        release.send(()).unwrap();
        assert_eq!(vp.wait_for_load(WAIT), AssetLoadState::Ready);
        let state = handle.state().unwrap();
        assert_eq!(state.distance, 3.0);
        assert_eq!(state.azimuthal_angle, 0.0);
    }

    #[test]
    fn switching_while_loading_ends_on_the_latest_specimen() {
        let (release, gate) = mpsc::channel();
        let source = GatedSource { gate: Some(gate) };
        let mut vp =
            Viewport::with_source(Options::default(), Box::new(source))
                .unwrap();

        vp.apply_config(ViewportConfig::new("a.gltf"));
        vp.apply_config(ViewportConfig {
            camera: Some(CameraPreset {
                distance: 5.0,
                max_distance: 16.0,
                ..CameraPreset::default()
            }),
            ..ViewportConfig::new("b.glb")
        });
        release.send(()).unwrap();

        assert_eq!(vp.wait_for_load(WAIT), AssetLoadState::Ready);
        match vp.frame() {
            ViewportFrame::Scene(frame) => {
                assert_eq!(frame.scene.asset_ref, "b.glb");
            }
            other => panic!("expected scene, got {other:?}"),
        }
        assert_eq!(vp.camera_handle().state().unwrap().distance, 5.0);
    }

    #[test]
    fn scene_frame_is_normalized_and_lit() {
        let vp = mounted("a.gltf");
        let ViewportFrame::Scene(frame) = vp.frame() else {
            panic!("expected scene");
        };
        let prim = &frame.scene.primitives[0];
        let to_world = frame.model * prim.transform;
        let centered = to_world.transform_point3(Vec3::new(1.0, 2.0, 0.0));
        assert!(centered.length() < 1e-5);
        assert_eq!(frame.lighting, LightingRig::default().uniform());
        let eye = Vec3::from_array(frame.camera.position);
        assert!((eye - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn failed_load_shows_fallback_and_stays_detached() {
        let mut vp = viewport();
        vp.apply_config(ViewportConfig::new("broken.glb"));
        assert_eq!(vp.wait_for_load(WAIT), AssetLoadState::Failed);
        assert!(matches!(
            vp.frame(),
            ViewportFrame::Fallback(Fallback::Failed { .. })
        ));
        vp.camera_handle().zoom_in();
        assert!(!vp.camera_handle().is_attached());
    }

    #[test]
    fn flat_image_branch_carries_markers_without_camera() {
        let mut vp = viewport();
        vp.apply_config(ViewportConfig {
            markers: vec![ImageMarker::new("Interactive Node", 0.5, 0.2)],
            ..ViewportConfig::new("https://example.org/nerves.png")
        });
        assert_eq!(
            vp.frame(),
            ViewportFrame::FlatImage {
                locator: "https://example.org/nerves.png".into(),
                markers: vec![ImageMarker::new("Interactive Node", 0.5, 0.2)],
            }
        );
        assert!(!vp.camera_handle().is_attached());
        vp.execute(ViewportCommand::ZoomIn);
    }

    #[test]
    fn toggling_pan_mode_keeps_camera_state() {
        let mut vp = mounted("a.gltf");
        let handle = vp.camera_handle();
        handle.zoom_in();
        handle.rotate();
        let before = handle.state().unwrap();

        vp.apply_config(ViewportConfig {
            pan_mode: true,
            ..ViewportConfig::new("a.gltf")
        });
        assert_eq!(vp.interaction_mode(), InteractionMode::Pan);
        assert_eq!(handle.state().unwrap(), before);
        assert!((before.azimuthal_angle - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn scale_change_updates_model_only() {
        let mut vp = mounted("a.gltf");
        let handle = vp.camera_handle();
        handle.zoom_out();
        let before = handle.state().unwrap();
        let model_before = vp.model();

        vp.apply_config(ViewportConfig {
            scale: Some(SpecimenScale::Uniform(2.0)),
            ..ViewportConfig::new("a.gltf")
        });
        assert_eq!(handle.state().unwrap(), before);
        let expected = Mat4::from_scale(Vec3::splat(2.0)) * model_before;
        assert!(vp.model().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn remount_restores_the_preset() {
        let mut vp = mounted("a.gltf");
        let handle = vp.camera_handle();
        handle.zoom_out();
        handle.rotate();

        vp.apply_config(ViewportConfig::new("b.glb"));
        let _ = vp.wait_for_load(WAIT);
        vp.apply_config(ViewportConfig::new("a.gltf"));
        // Cache hit: mounted synchronously.
        assert_eq!(vp.load_state(), AssetLoadState::Ready);
        let state = handle.state().unwrap();
        assert_eq!(state.distance, 3.0);
        assert_eq!(state.azimuthal_angle, 0.0);
    }

    #[test]
    fn drag_in_pan_mode_moves_the_target() {
        let mut vp = mounted("a.gltf");
        vp.apply_config(ViewportConfig {
            pan_mode: true,
            ..ViewportConfig::new("a.gltf")
        });
        vp.handle_input(InputEvent::CursorMoved { x: 100.0, y: 100.0 });
        vp.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        vp.handle_input(InputEvent::CursorMoved { x: 150.0, y: 100.0 });
        vp.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        let state = vp.camera_handle().state().unwrap();
        assert_ne!(state.target, Vec3::ZERO);
        assert_eq!(state.azimuthal_angle, 0.0);
    }

    #[test]
    fn resize_changes_aspect() {
        let mut vp = mounted("a.gltf");
        vp.resize(1600, 800);
        let ViewportFrame::Scene(frame) = vp.frame() else {
            panic!("expected scene");
        };
        assert_eq!(frame.camera.aspect, 2.0);
        vp.resize(0, 0);
        let ViewportFrame::Scene(frame) = vp.frame() else {
            panic!("expected scene");
        };
        assert_eq!(frame.camera.aspect, 2.0);
    }

    #[test]
    fn tick_spins_the_idle_camera_but_not_during_a_drag() {
        let mut vp = mounted("a.gltf");
        let handle = vp.camera_handle();

        vp.handle_input(InputEvent::CursorMoved { x: 10.0, y: 10.0 });
        vp.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        for _ in 0..30 {
            vp.tick(1.0 / 60.0);
        }
        assert_eq!(handle.state().unwrap().azimuthal_angle, 0.0);

        vp.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        for _ in 0..30 {
            vp.tick(1.0 / 60.0);
        }
        let spun = handle.state().unwrap().azimuthal_angle;
        assert!(spun > 0.0);

        handle.reset();
        assert_eq!(handle.state().unwrap().azimuthal_angle, 0.0);
    }
}
