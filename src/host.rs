//! Reference host: the dashboard side of the viewport contract.
//!
//! The host owns which specimen is active and whether pan mode is on. It
//! pushes both down as a [`ViewportConfig`] and drives the camera only
//! through the [`CameraHandle`], which may be detached at any moment
//! (loading, failed, flat image) without the host having to care.

use std::fmt;
use std::str::FromStr;

use crate::camera::CameraHandle;
use crate::catalog::{Catalog, Specimen};
use crate::error::AnatomicaError;
use crate::viewport::{Viewport, ViewportConfig};

/// A dashboard action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Zoom-in button.
    ZoomIn,
    /// Zoom-out button.
    ZoomOut,
    /// Rotate button.
    Rotate,
    /// Reset-view button.
    Reset,
    /// Pan-mode toggle.
    TogglePan,
    /// Pick a specimen from the system list.
    Select(String),
}

impl FromStr for HostCommand {
    type Err = AnatomicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "zoom-in" => Ok(Self::ZoomIn),
            "zoom-out" => Ok(Self::ZoomOut),
            "rotate" => Ok(Self::Rotate),
            "reset" => Ok(Self::Reset),
            "toggle-pan" => Ok(Self::TogglePan),
            other => match other.strip_prefix("select:") {
                Some(id) if !id.is_empty() => Ok(Self::Select(id.to_owned())),
                _ => Err(AnatomicaError::UnknownCommand(other.to_owned())),
            },
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZoomIn => f.write_str("zoom-in"),
            Self::ZoomOut => f.write_str("zoom-out"),
            Self::Rotate => f.write_str("rotate"),
            Self::Reset => f.write_str("reset"),
            Self::TogglePan => f.write_str("toggle-pan"),
            Self::Select(id) => write!(f, "select:{id}"),
        }
    }
}

/// Owns the catalog, the active selection and the viewport.
pub struct HostController {
    catalog: Catalog,
    viewport: Viewport,
    camera: CameraHandle,
    active: Option<String>,
    pan_mode: bool,
}

impl HostController {
    /// Wrap `viewport`; nothing is selected yet.
    #[must_use]
    pub fn new(catalog: Catalog, viewport: Viewport) -> Self {
        let camera = viewport.camera_handle();
        Self {
            catalog,
            viewport,
            camera,
            active: None,
            pan_mode: false,
        }
    }

    /// Show the specimen with `id`.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::UnknownSpecimen`] if the catalog has no such id;
    /// the current selection is kept.
    pub fn select(&mut self, id: &str) -> Result<(), AnatomicaError> {
        if self.catalog.get(id).is_none() {
            return Err(AnatomicaError::UnknownSpecimen(id.to_owned()));
        }
        log::info!("selecting specimen {id}");
        self.active = Some(id.to_owned());
        self.push_config();
        Ok(())
    }

    /// Show the first catalog entry, if any.
    pub fn select_first(&mut self) {
        let first = self.catalog.first().map(|s| s.id.clone());
        if let Some(id) = first {
            self.active = Some(id);
            self.push_config();
        }
    }

    /// Flip pan mode. This is a config push, never a camera command.
    pub fn toggle_pan_mode(&mut self) {
        self.set_pan_mode(!self.pan_mode);
    }

    /// Set pan mode.
    pub fn set_pan_mode(&mut self, pan_mode: bool) {
        if self.pan_mode != pan_mode {
            self.pan_mode = pan_mode;
            self.push_config();
        }
    }

    /// Whether pan mode is on.
    #[must_use]
    pub fn pan_mode(&self) -> bool {
        self.pan_mode
    }

    /// Run a dashboard action.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::UnknownSpecimen`] for a selection of a missing id.
    pub fn execute(&mut self, command: HostCommand) -> Result<(), AnatomicaError> {
        match command {
            HostCommand::ZoomIn => self.camera.zoom_in(),
            HostCommand::ZoomOut => self.camera.zoom_out(),
            HostCommand::Rotate => self.camera.rotate(),
            HostCommand::Reset => self.camera.reset(),
            HostCommand::TogglePan => self.toggle_pan_mode(),
            HostCommand::Select(id) => self.select(&id)?,
        }
        Ok(())
    }

    /// The active specimen, for the title and info panels.
    #[must_use]
    pub fn specimen(&self) -> Option<&Specimen> {
        self.active.as_deref().and_then(|id| self.catalog.get(id))
    }

    /// The catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The camera handle used for button commands.
    #[must_use]
    pub fn camera(&self) -> &CameraHandle {
        &self.camera
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// The viewport, mutably (for ticking, input and resizing).
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    fn push_config(&mut self) {
        let Some(specimen) = self.specimen() else {
            return;
        };
        let config = ViewportConfig::for_specimen(specimen, self.pan_mode);
        self.viewport.apply_config(config);
    }
}
