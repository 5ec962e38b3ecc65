//! Cotton species profiles.
//!
//! The detection model emits one of four class labels. Each label maps to exactly one
//! profile below; anything else is an unknown species.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Species identifier as emitted by the detection model.
///
/// Variants are declared in label order, so `Ord` agrees with comparing `as_str()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SpeciesCode {
    #[serde(rename = "G-arboreum")]
    Arboreum,
    #[serde(rename = "G-barbadense")]
    Barbadense,
    #[serde(rename = "G-herbaceum")]
    Herbaceum,
    #[serde(rename = "G-hirsutum")]
    Hirsutum,
}

impl SpeciesCode {
    pub const ALL: [SpeciesCode; 4] = [
        SpeciesCode::Arboreum,
        SpeciesCode::Barbadense,
        SpeciesCode::Herbaceum,
        SpeciesCode::Hirsutum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpeciesCode::Arboreum => "G-arboreum",
            SpeciesCode::Herbaceum => "G-herbaceum",
            SpeciesCode::Hirsutum => "G-hirsutum",
            SpeciesCode::Barbadense => "G-barbadense",
        }
    }
}

impl fmt::Display for SpeciesCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label that is not one of the four recognized species codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown cotton species code: {0}")]
pub struct UnknownSpeciesCode(pub String);

impl FromStr for SpeciesCode {
    type Err = UnknownSpeciesCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeciesCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownSpeciesCode(s.to_string()))
    }
}

/// Descriptive profile for one cotton species.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesProfile {
    pub code: SpeciesCode,
    pub icon: &'static str,
    pub scientific_name: &'static str,
    pub common_name: &'static str,
    pub origin: &'static str,
    pub traits: &'static str,
    pub care_tips: &'static str,
    pub use_cases: &'static str,
    pub bonus_note: &'static str,
}

impl SpeciesProfile {
    /// Card heading, e.g. "Gossypium hirsutum (Upland Cotton)".
    pub fn title(&self) -> String {
        format!("{} ({})", self.scientific_name, self.common_name)
    }
}

// ============================================================================
// EMBEDDED SPECIES DATA
// ============================================================================

static PROFILES: &[SpeciesProfile] = &[
    SpeciesProfile {
        code: SpeciesCode::Arboreum,
        icon: "🧬",
        scientific_name: "Gossypium arboreum",
        common_name: "Desi Cotton",
        origin: "India & Pakistan",
        traits: "Naturally drought-resistant and pest-tolerant. Ideal for arid regions with less rainfall.",
        care_tips: "Requires minimal irrigation, grows well in dry and semi-dry climates. Use organic compost to enhance growth.",
        use_cases: "Hand-spun cotton, Ayurvedic products, eco-friendly fabrics.",
        bonus_note: "Supports biodiversity and traditional farming methods.",
    },
    SpeciesProfile {
        code: SpeciesCode::Herbaceum,
        icon: "🌾",
        scientific_name: "Gossypium herbaceum",
        common_name: "Levant Cotton",
        origin: "Africa and South Asia",
        traits: "Short staple fiber, hardy plant, tolerates heat and drought.",
        care_tips: "Minimal water required, prefers well-drained soil.",
        use_cases: "Used in traditional textiles and handicrafts.",
        bonus_note: "Adaptable to poor soil conditions.",
    },
    SpeciesProfile {
        code: SpeciesCode::Hirsutum,
        icon: "☁️",
        scientific_name: "Gossypium hirsutum",
        common_name: "Upland Cotton",
        origin: "Central America",
        traits: "High yield, medium fiber length, adaptable.",
        care_tips: "Needs moderate water, grows in various soils.",
        use_cases: "Most common cotton in clothing and textiles.",
        bonus_note: "Preferred by commercial cotton farmers.",
    },
    SpeciesProfile {
        code: SpeciesCode::Barbadense,
        icon: "🌱",
        scientific_name: "Gossypium barbadense",
        common_name: "Pima/Egyptian Cotton",
        origin: "South America",
        traits: "Extra-long fibers, silky texture, high durability.",
        care_tips: "Thrives in well-irrigated, nutrient-rich soil with moderate climate.",
        use_cases: "Luxury garments, premium bedding and textiles.",
        bonus_note: "Known for soft feel and strength.",
    },
];

/// Look up the profile for a detected label.
///
/// Returns None for labels outside the recognized set.
pub fn species_profile(code: &str) -> Option<&'static SpeciesProfile> {
    let code: SpeciesCode = code.parse().ok()?;
    PROFILES.iter().find(|profile| profile.code == code)
}
