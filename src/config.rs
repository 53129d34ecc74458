//! Scene configuration.
//!
//! [`SceneConfig::default`] reproduces the dog scene as published: asset
//! paths, the hover variant table, the reset targets, timings and the
//! scroll timeline. Host code adjusts fields before handing the config to
//! [`crate::scene::DogScene::load`].

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::{
    context::CAMERA_DISTANCE,
    error::SetupError,
    material::{MatcapId, VariantTable},
    parallax::ParallaxSettings,
    scene::DirectionalLight,
    timeline::{Placement, Property, ScrollTimeline, Transform},
    transition::TransitionSettings,
};

/// A normal map and how it is stored.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalMapConfig {
    pub path: String,
    pub flip_y: bool,
}

/// Perspective camera on the +z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub distance: f32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: CAMERA_DISTANCE,
            fov: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// DOM anchors the web host binds to.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorConfig {
    /// Hover anchors; each carries its variant name in `hover_attribute`.
    pub hover_selector: String,
    pub hover_attribute: String,
    /// Top of this element at the viewport top starts the timeline.
    pub scroll_start: String,
    /// Bottom of this element at the viewport bottom ends it.
    pub scroll_end: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            hover_selector: "#section-2 a".to_string(),
            hover_attribute: "img-title".to_string(),
            scroll_start: "#section-1".to_string(),
            scroll_end: "#section-4".to_string(),
        }
    }
}

impl AnchorConfig {
    /// Selector of the hover anchor for `variant`.
    pub fn hover_anchor(&self, variant: &str) -> String {
        format!(
            "{}[{}=\"{}\"]",
            self.hover_selector, self.hover_attribute, variant
        )
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Uncompressed `.glb` (Draco is not supported).
    pub model_path: String,
    pub primary_normal_map: NormalMapConfig,
    pub environment_normal_map: NormalMapConfig,
    /// Number of matcaps in `matcap/`, loaded as `mat-1` ..= `mat-{n}`.
    pub matcap_count: u32,
    /// Nodes whose name contains this token get the primary material.
    pub marker: String,
    /// Clip that loops from the start; `None` keeps the rest pose.
    pub animation_clip: Option<String>,
    pub variants: VariantTable,
    /// Target of a hover leave for the primary object.
    pub default_primary: MatcapId,
    /// Target of a hover leave for the environment's flat matcap.
    pub default_environment: MatcapId,
    /// Also cross-fade the environment. When off, the environment keeps its
    /// own flat matcap, which follows each settled transition.
    pub blend_environment: bool,
    pub transition: TransitionSettings,
    pub parallax: ParallaxSettings,
    pub camera: CameraConfig,
    pub exposure: f32,
    pub clear_colour: wgpu::Color,
    /// Rest transform of the whole asset before any scrolling.
    pub base: Transform,
    /// Viewport-high sections of the emulated page on native hosts.
    pub scroll_sections: u32,
    /// Pixels scrolled per mouse wheel line on native hosts.
    pub wheel_line_height: f32,
    pub anchors: AnchorConfig,
    pub light: DirectionalLight,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            model_path: "models/dog.glb".to_string(),
            primary_normal_map: NormalMapConfig {
                path: "dog_normals.jpg".to_string(),
                flip_y: false,
            },
            environment_normal_map: NormalMapConfig {
                path: "branches_normals.jpg".to_string(),
                flip_y: true,
            },
            matcap_count: 20,
            marker: "DOG".to_string(),
            animation_clip: Some("Take 001".to_string()),
            variants: VariantTable::default(),
            default_primary: MatcapId(2),
            default_environment: MatcapId(1),
            blend_environment: true,
            transition: TransitionSettings::default(),
            parallax: ParallaxSettings::default(),
            camera: CameraConfig::default(),
            exposure: 1.0,
            clear_colour: wgpu::Color::TRANSPARENT,
            base: Transform::new(Vector3::new(0.15, -0.65, 0.05), Vector3::new(0.0, PI / 8.0, 0.0)),
            scroll_sections: 4,
            wheel_line_height: 48.0,
            anchors: AnchorConfig::default(),
            light: DirectionalLight::default(),
        }
    }
}

impl SceneConfig {
    /// The scroll timeline of the asset root, starting from `base`.
    pub fn scroll_timeline(&self) -> ScrollTimeline {
        ScrollTimeline::new(self.base)
            .to(
                Property::Position,
                Vector3::new(0.0, 0.05, -0.5),
                Placement::Sequential,
            )
            .to(
                Property::Rotation,
                Vector3::new(PI / 15.0, 0.0, 0.0),
                Placement::Sequential,
            )
            .to(
                Property::Rotation,
                Vector3::new(-PI / 15.0, -PI, -PI / 20.0),
                "third",
            )
            .to(Property::Position, Vector3::new(-0.4, 0.0, 0.25), "third")
    }

    /// Checks every matcap reference against a library of `matcap_count`.
    pub fn validate(&self) -> Result<(), SetupError> {
        let known = |id: MatcapId| id.0 >= 1 && id.0 <= self.matcap_count;
        let referenced = self
            .variants
            .iter()
            .map(|(_, id)| id)
            .chain([self.default_primary, self.default_environment]);
        for id in referenced {
            if !known(id) {
                return Err(SetupError::UnknownMatcap(id));
            }
        }
        Ok(())
    }
}
