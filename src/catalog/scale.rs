use glam::Vec3;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::error::InvalidConfigurationError;

/// Per-specimen scale: one uniform factor or one factor per axis.
///
/// Deserializes from either `1.5` or `[1.0, 2.0, 1.0]`. Anything that cannot
/// be honoured (a string or table, wrong arity, non-finite or non-positive
/// components) becomes the identity scale with a warning instead of failing
/// the whole catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawScale", into = "RawScale")]
pub enum SpecimenScale {
    /// Same factor on every axis.
    Uniform(f32),
    /// Independent X, Y, Z factors.
    Axes([f32; 3]),
}

impl Default for SpecimenScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpecimenScale {
    /// No scaling.
    pub const IDENTITY: Self = Self::Uniform(1.0);

    /// Build a scale from a component list of length 1 or 3.
    ///
    /// # Errors
    ///
    /// [`InvalidConfigurationError::ScaleComponent`] for the first component
    /// that is non-finite or not positive, otherwise
    /// [`InvalidConfigurationError::ScaleArity`] unless there are exactly 1
    /// or 3 components.
    pub fn try_from_components(
        components: &[f32],
    ) -> Result<Self, InvalidConfigurationError> {
        if let Some(&bad) =
            components.iter().find(|c| !c.is_finite() || **c <= 0.0)
        {
            return Err(InvalidConfigurationError::ScaleComponent(bad));
        }
        match *components {
            [s] => Ok(Self::Uniform(s)),
            [x, y, z] => Ok(Self::Axes([x, y, z])),
            _ => Err(InvalidConfigurationError::ScaleArity(components.len())),
        }
    }

    /// Build a scale, falling back to identity (with a warning) when the
    /// components are invalid.
    #[must_use]
    pub fn from_components_or_identity(components: &[f32]) -> Self {
        Self::try_from_components(components).unwrap_or_else(|e| {
            log::warn!("{e}; using identity scale");
            Self::IDENTITY
        })
    }

    /// Check an already-constructed scale.
    ///
    /// # Errors
    ///
    /// [`InvalidConfigurationError::ScaleComponent`] if any factor is
    /// non-finite or not positive.
    pub fn validate(&self) -> Result<(), InvalidConfigurationError> {
        Self::try_from_components(self.components()).map(|_| ())
    }

    /// The scale itself if valid, identity otherwise.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self::from_components_or_identity(self.components())
    }

    /// Per-axis factors.
    #[must_use]
    pub fn to_vec3(&self) -> Vec3 {
        match *self {
            Self::Uniform(s) => Vec3::splat(s),
            Self::Axes(axes) => Vec3::from_array(axes),
        }
    }

    fn components(&self) -> &[f32] {
        match self {
            Self::Uniform(s) => std::slice::from_ref(s),
            Self::Axes(axes) => axes,
        }
    }
}

/// Wire shape of a scale before validation.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawScale {
    Uniform(f32),
    Axes(Vec<f32>),
    #[serde(skip_serializing)]
    Unrecognised(IgnoredAny),
}

impl From<RawScale> for SpecimenScale {
    fn from(raw: RawScale) -> Self {
        match raw {
            RawScale::Uniform(s) => Self::from_components_or_identity(&[s]),
            RawScale::Axes(axes) => Self::from_components_or_identity(&axes),
            RawScale::Unrecognised(_) => {
                log::warn!(
                    "scale is neither a number nor a list of numbers; \
                     using identity scale"
                );
                Self::IDENTITY
            }
        }
    }
}

impl From<SpecimenScale> for RawScale {
    fn from(scale: SpecimenScale) -> Self {
        match scale {
            SpecimenScale::Uniform(s) => Self::Uniform(s),
            SpecimenScale::Axes(axes) => Self::Axes(axes.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        scale: SpecimenScale,
    }

    fn parse(text: &str) -> SpecimenScale {
        toml::from_str::<Wrapper>(text).unwrap().scale
    }

    #[test]
    fn accepts_scalar_and_vector_forms() {
        assert_eq!(parse("scale = 1.5"), SpecimenScale::Uniform(1.5));
        assert_eq!(
            parse("scale = [1.0, 2.0, 1.0]"),
            SpecimenScale::Axes([1.0, 2.0, 1.0])
        );
        assert_eq!(parse("scale = [2.0]"), SpecimenScale::Uniform(2.0));
    }

    #[test]
    fn invalid_shapes_become_identity() {
        assert_eq!(parse("scale = [1.0, 2.0]"), SpecimenScale::IDENTITY);
        assert_eq!(parse("scale = -3.0"), SpecimenScale::IDENTITY);
        assert_eq!(parse("scale = [1.0, 0.0, 1.0]"), SpecimenScale::IDENTITY);
    }

    #[test]
    fn non_numeric_values_become_identity() {
        assert_eq!(parse(r#"scale = "big""#), SpecimenScale::IDENTITY);
        assert_eq!(parse("scale = true"), SpecimenScale::IDENTITY);
        assert_eq!(parse(r#"scale = ["a", "b", "c"]"#), SpecimenScale::IDENTITY);
        assert_eq!(parse("scale = { x = 2.0 }"), SpecimenScale::IDENTITY);
    }

    #[test]
    fn valid_scales_serialize_back_to_numbers() {
        #[derive(Serialize)]
        struct Out {
            scale: SpecimenScale,
        }
        let text = toml::to_string(&Out {
            scale: SpecimenScale::Axes([1.0, 2.0, 1.0]),
        })
        .unwrap();
        assert_eq!(parse(&text), SpecimenScale::Axes([1.0, 2.0, 1.0]));
    }

    #[test]
    fn component_errors_are_specific() {
        assert_eq!(
            SpecimenScale::try_from_components(&[1.0, 1.0]),
            Err(InvalidConfigurationError::ScaleArity(2))
        );
        assert!(matches!(
            SpecimenScale::try_from_components(&[f32::NAN]),
            Err(InvalidConfigurationError::ScaleComponent(_))
        ));
    }

    #[test]
    fn sanitized_replaces_bad_values() {
        assert_eq!(
            SpecimenScale::Axes([1.0, f32::INFINITY, 1.0]).sanitized(),
            SpecimenScale::IDENTITY
        );
        assert_eq!(
            SpecimenScale::Uniform(2.0).to_vec3(),
            Vec3::splat(2.0)
        );
    }
}
