use glam::Vec3;

use crate::options::LightingOptions;

/// Lighting block shared by the scene shaders.
/// NOTE: layout is three `vec4`s (48 bytes) on the shader side.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Direction toward the key light (normalized).
    pub key_dir: [f32; 3],
    /// Key light intensity.
    pub key_intensity: f32,
    /// Direction toward the fill light (normalized).
    pub fill_dir: [f32; 3],
    /// Fill light intensity.
    pub fill_intensity: f32,
    /// Light color shared by every source.
    pub color: [f32; 3],
    /// Ambient light intensity.
    pub ambient: f32,
}

/// One ambient and two directional lights aimed at the origin.
///
/// The rig is fixed for the viewport's lifetime; specimens never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingRig {
    /// Ambient intensity.
    pub ambient: f32,
    /// Key light position and intensity.
    pub key: DirectionalLight,
    /// Fill light position and intensity.
    pub fill: DirectionalLight,
    /// Shared light color.
    pub color: Vec3,
}

/// A directional light described by where it sits; it shines at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// World-space position.
    pub position: Vec3,
    /// Intensity.
    pub intensity: f32,
}

impl DirectionalLight {
    /// Unit vector from the origin toward the light. A light placed at the
    /// origin falls back to straight overhead.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

impl Default for LightingRig {
    fn default() -> Self {
        Self::from_options(&LightingOptions::default())
    }
}

impl LightingRig {
    /// Build the rig from options.
    #[must_use]
    pub fn from_options(options: &LightingOptions) -> Self {
        Self {
            ambient: options.ambient,
            key: DirectionalLight {
                position: Vec3::from_array(options.key_position),
                intensity: options.key_intensity,
            },
            fill: DirectionalLight {
                position: Vec3::from_array(options.fill_position),
                intensity: options.fill_intensity,
            },
            color: Vec3::from_array(options.color),
        }
    }

    /// Pack for upload.
    #[must_use]
    pub fn uniform(&self) -> LightingUniform {
        LightingUniform {
            key_dir: self.key.direction().to_array(),
            key_intensity: self.key.intensity,
            fill_dir: self.fill.direction().to_array(),
            fill_intensity: self.fill.intensity,
            color: self.color.to_array(),
            ambient: self.ambient,
        }
    }
}
