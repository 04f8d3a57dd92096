use glam::{Mat4, Vec3};

use crate::asset::Bounds;
use crate::catalog::SpecimenScale;

/// Largest extent of a normalized scene, in world units.
pub const NORMALIZED_SIZE: f32 = 2.0;

/// Transform that centers `bounds` at the origin and fits its largest
/// extent to [`NORMALIZED_SIZE`].
///
/// Empty or zero-sized bounds only get centered (unit fit).
#[must_use]
pub fn normalization_transform(bounds: &Bounds) -> Mat4 {
    if bounds.is_empty() {
        return Mat4::IDENTITY;
    }
    let extent = bounds.max_extent();
    let fit = if extent.is_finite() && extent > f32::EPSILON {
        NORMALIZED_SIZE / extent
    } else {
        1.0
    };
    Mat4::from_scale(Vec3::splat(fit)) * Mat4::from_translation(-bounds.center())
}

/// Full model matrix: normalization first, then the specimen scale.
#[must_use]
pub fn model_transform(bounds: &Bounds, scale: SpecimenScale) -> Mat4 {
    Mat4::from_scale(scale.sanitized().to_vec3())
        * normalization_transform(bounds)
}
