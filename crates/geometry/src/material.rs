use carscene_common::Color;
use serde::{Deserialize, Serialize};

/// Which faces of a mesh are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// Shading model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaterialKind {
    /// Blinn-Phong: diffuse plus a specular highlight.
    Phong { shininess: f32 },
    /// Two-band cel shading.
    Toon,
    /// Unlit solid color, used for debug helpers.
    LineBasic,
}

/// Surface description shared by any number of meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub color: Color,
    pub side: Side,
}

impl Material {
    pub fn phong(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Phong { shininess: 30.0 },
            color,
            side: Side::Front,
        }
    }

    pub fn toon(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::Toon,
            color,
            side: Side::Front,
        }
    }

    pub fn line_basic(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            kind: MaterialKind::LineBasic,
            color,
            side: Side::Front,
        }
    }

    pub fn double_sided(mut self) -> Self {
        self.side = Side::Double;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::phong("default", Color::rgb(0.8, 0.8, 0.8))
    }
}
