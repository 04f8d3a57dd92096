//! Specimen catalog: which specimens exist and how each one is presented.
//!
//! The built-in catalog carries the five body systems of the dashboard.
//! Catalogs can also be loaded from TOML:
//!
//! ```toml
//! [[specimen]]
//! id = "Skeletal"
//! title = "Human Skeleton"
//! system_label = "Skeletal System"
//! asset_ref = "models/skeleton.glb"
//! scale = [1.0, 1.0, 1.0]
//!
//! [specimen.camera]
//! max_distance = 16.0
//!
//! [[specimen.markers]]
//! label = "Interactive Node"
//! x = 0.5
//! y = 0.2
//! ```

mod scale;
mod specimen;

use std::path::Path;

pub use scale::SpecimenScale;
use serde::{Deserialize, Serialize};
pub use specimen::{ImageMarker, Specimen};

use crate::camera::CameraPreset;
use crate::error::AnatomicaError;

/// Ordered collection of specimens with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "specimen", default)]
    specimens: Vec<Specimen>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::CatalogParse`] if two specimens share an id.
    pub fn new(specimens: Vec<Specimen>) -> Result<Self, AnatomicaError> {
        let catalog = Self { specimens };
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// The dashboard's five body systems.
    #[must_use]
    pub fn builtin() -> Self {
        let node = || vec![ImageMarker::new("Interactive Node", 0.5, 0.2)];
        let specimens = vec![
            Specimen {
                id: "Skeletal".into(),
                title: "Human Skeleton".into(),
                system_label: "Skeletal System".into(),
                description: "The internal framework of the human body. It \
                    is composed of around 270 bones at birth; this total \
                    decreases to around 206 bones by adulthood after some \
                    bones get fused together."
                    .into(),
                asset_ref: "models/skeleton.glb".into(),
                icon_id: "skeleton".into(),
                scale: None,
                camera: Some(CameraPreset {
                    max_distance: 16.0,
                    ..CameraPreset::default()
                }),
                markers: node(),
            },
            Specimen {
                id: "Muscular".into(),
                title: "Muscular System".into(),
                system_label: "Muscular System".into(),
                description: "The biological system of an organism that \
                    allows for movement. The muscular system in vertebrates \
                    is controlled through the nervous system although some \
                    muscles can be completely autonomous."
                    .into(),
                asset_ref: "https://upload.wikimedia.org/wikipedia/commons/\
                    thumb/e/e5/Gnaeus_Pompeius_Magnus_Louvre_Ma1251.jpg/\
                    800px-Gnaeus_Pompeius_Magnus_Louvre_Ma1251.jpg"
                    .into(),
                icon_id: "accessibility_new".into(),
                scale: None,
                camera: None,
                markers: node(),
            },
            Specimen {
                id: "Nervous".into(),
                title: "Nervous Network".into(),
                system_label: "Nervous System".into(),
                description: "A highly complex part of an animal that \
                    coordinates its actions and sensory information by \
                    transmitting signals to and from different parts of its \
                    body."
                    .into(),
                asset_ref: "https://upload.wikimedia.org/wikipedia/commons/\
                    thumb/b/b2/Nervous_system_diagram.png/\
                    800px-Nervous_system_diagram.png"
                    .into(),
                icon_id: "neurology".into(),
                scale: None,
                camera: None,
                markers: node(),
            },
            Specimen {
                id: "Circulatory".into(),
                title: "Human Heart".into(),
                system_label: "Circulatory System".into(),
                description: "The heart is a muscular organ that pumps blood \
                    through the circulatory system's blood vessels. Blood \
                    carries oxygen and nutrients to the body while carrying \
                    metabolic waste."
                    .into(),
                asset_ref: "models/heart.glb".into(),
                icon_id: "cardiology".into(),
                scale: None,
                camera: None,
                markers: node(),
            },
            Specimen {
                id: "Digestive".into(),
                title: "Digestive Tract".into(),
                system_label: "Digestive System".into(),
                description: "The gastrointestinal tract plus the accessory \
                    organs of digestion (the tongue, salivary glands, \
                    pancreas, liver, and gallbladder). Digestion involves \
                    the breakdown of food into smaller components."
                    .into(),
                asset_ref: "https://upload.wikimedia.org/wikipedia/commons/\
                    thumb/c/c5/Digestive_system_diagram_en.svg/\
                    800px-Digestive_system_diagram_en.svg.png"
                    .into(),
                icon_id: "gastroenterology".into(),
                scale: None,
                camera: None,
                markers: node(),
            },
        ];
        Self { specimens }
    }

    /// Parse a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::CatalogParse`] for malformed TOML, a specimen
    /// missing a required field, or a duplicate id. An unusable `scale` is
    /// not an error; it becomes the identity scale.
    pub fn from_toml_str(content: &str) -> Result<Self, AnatomicaError> {
        let catalog: Self = toml::from_str(content)
            .map_err(|e| AnatomicaError::CatalogParse(e.to_string()))?;
        catalog.check_unique_ids()?;
        Ok(catalog)
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: &Path) -> Result<Self, AnatomicaError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to pretty TOML.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::CatalogParse`] if the TOML serializer rejects the
    /// catalog.
    pub fn to_toml_string(&self) -> Result<String, AnatomicaError> {
        toml::to_string_pretty(self)
            .map_err(|e| AnatomicaError::CatalogParse(e.to_string()))
    }

    /// Look up a specimen by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Specimen> {
        self.specimens.iter().find(|s| s.id == id)
    }

    /// Ids in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.specimens.iter().map(|s| s.id.as_str())
    }

    /// All specimens in catalog order.
    #[must_use]
    pub fn specimens(&self) -> &[Specimen] {
        &self.specimens
    }

    /// The first specimen, shown when nothing else is selected.
    #[must_use]
    pub fn first(&self) -> Option<&Specimen> {
        self.specimens.first()
    }

    /// Number of specimens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    /// Whether the catalog has no specimens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specimens.is_empty()
    }

    fn check_unique_ids(&self) -> Result<(), AnatomicaError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for specimen in &self.specimens {
            if !seen.insert(specimen.id.as_str()) {
                return Err(AnatomicaError::CatalogParse(format!(
                    "duplicate specimen id {:?}",
                    specimen.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;

    #[test]
    fn builtin_has_the_five_systems() {
        let catalog = Catalog::builtin();
        let ids: Vec<_> = catalog.ids().collect();
        assert_eq!(
            ids,
            ["Skeletal", "Muscular", "Nervous", "Circulatory", "Digestive"]
        );
        assert_eq!(catalog.first().unwrap().id, "Skeletal");

        let skeleton = catalog.get("Skeletal").unwrap();
        assert_eq!(AssetKind::of(&skeleton.asset_ref), AssetKind::Scene);
        assert_eq!(skeleton.camera.unwrap().max_distance, 16.0);

        let nervous = catalog.get("Nervous").unwrap();
        assert_eq!(AssetKind::of(&nervous.asset_ref), AssetKind::FlatImage);
        assert!(!nervous.asset_ref.contains(' '));
        assert_eq!(nervous.markers[0].label, "Interactive Node");
    }

    #[test]
    fn parses_toml_with_optional_sections() {
        let toml_str = r#"
[[specimen]]
id = "Skull"
title = "Human Skull"
asset_ref = "models/skull.gltf"
scale = [1.0, 2.0, 1.0]

[specimen.camera]
distance = 2.0
max_distance = 6.0

[[specimen]]
id = "Hand"
title = "Hand"
asset_ref = "hand.png"
scale = 0.5

[[specimen.markers]]
label = "Thumb"
x = 0.1
y = 0.4
"#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        assert_eq!(catalog.len(), 2);

        let skull = catalog.get("Skull").unwrap();
        assert_eq!(skull.scale, Some(SpecimenScale::Axes([1.0, 2.0, 1.0])));
        let camera = skull.camera.unwrap();
        assert_eq!(camera.distance, 2.0);
        assert_eq!(camera.min_distance, 0.3);
        assert!(skull.description.is_empty());

        let hand = catalog.get("Hand").unwrap();
        assert_eq!(hand.effective_scale(), SpecimenScale::Uniform(0.5));
        assert_eq!(hand.markers, vec![ImageMarker::new("Thumb", 0.1, 0.4)]);
        assert!(hand.camera.is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let toml_str = r#"
[[specimen]]
id = "A"
title = "A"
asset_ref = "a.glb"

[[specimen]]
id = "A"
title = "Again"
asset_ref = "b.glb"
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, AnatomicaError::CatalogParse(_)));
    }

    #[test]
    fn builtin_survives_toml_round_trip() {
        let catalog = Catalog::builtin();
        let text = catalog.to_toml_string().unwrap();
        assert_eq!(Catalog::from_toml_str(&text).unwrap(), catalog);
    }

    #[test]
    fn missing_required_field_is_a_catalog_error() {
        let err = Catalog::from_toml_str("[[specimen]]\nid = \"X\"")
            .unwrap_err();
        assert!(matches!(err, AnatomicaError::CatalogParse(_)));
    }

    #[test]
    fn unusable_scale_does_not_fail_the_catalog() {
        let toml_str = r#"
[[specimen]]
id = "Big"
title = "Big"
asset_ref = "big.glb"
scale = "big"

[[specimen]]
id = "Small"
title = "Small"
asset_ref = "small.glb"
scale = 0.5
"#;
        let catalog = Catalog::from_toml_str(toml_str).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get("Big").unwrap().scale,
            Some(SpecimenScale::IDENTITY)
        );
        assert_eq!(
            catalog.get("Small").unwrap().effective_scale(),
            SpecimenScale::Uniform(0.5)
        );
    }
}
