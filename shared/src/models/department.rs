//! Department Model

use serde::{Deserialize, Serialize};

/// Production department
///
/// `Production` is the special administrative role; every other variant is a
/// regular crew department. Wire values keep the original French display
/// names used by the persisted documents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Department {
    #[serde(rename = "PRODUCTION")]
    Production,
    #[serde(rename = "Caméra")]
    Camera,
    #[serde(rename = "Lumière")]
    Lumiere,
    #[serde(rename = "Machinerie")]
    Machinerie,
    #[serde(rename = "Régie")]
    Regie,
    #[serde(rename = "Décoration")]
    Deco,
    #[serde(rename = "Mise en scène")]
    MiseEnScene,
    #[serde(rename = "Son")]
    Son,
    #[serde(rename = "Costume")]
    Costume,
    #[serde(rename = "Maquillage")]
    Maquillage,
    #[serde(rename = "Coiffure")]
    Coiffure,
    #[serde(rename = "Accessoire")]
    Accessoire,
}

impl Department {
    /// Whether this department holds the administrative role
    pub fn is_production(&self) -> bool {
        matches!(self, Department::Production)
    }

    /// Display name (matches the wire value)
    pub fn name(&self) -> &'static str {
        match self {
            Department::Production => "PRODUCTION",
            Department::Camera => "Caméra",
            Department::Lumiere => "Lumière",
            Department::Machinerie => "Machinerie",
            Department::Regie => "Régie",
            Department::Deco => "Décoration",
            Department::MiseEnScene => "Mise en scène",
            Department::Son => "Son",
            Department::Costume => "Costume",
            Department::Maquillage => "Maquillage",
            Department::Coiffure => "Coiffure",
            Department::Accessoire => "Accessoire",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
