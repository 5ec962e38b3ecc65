//! View Models for the detection page
//!
//! Every block of content on the page is a `ContentCard`. One template partial
//! (`templates/partials/card.html`) renders all card kinds.

use rand::Rng;
use serde::Serialize;

use crate::catalog::{random_fact, CropCalendar, SpeciesProfile};
use crate::detector::DetectionError;
use crate::resolution::ResolvedOutcome;

// ============================================================================
// Cards
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub enum ContentCard {
    Species(SpeciesCard),
    Calendar(CalendarCard),
    Fact(FactCard),
    Notice(NoticeCard),
}

impl ContentCard {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentCard::Species(_) => "species",
            ContentCard::Calendar(_) => "calendar",
            ContentCard::Fact(_) => "fact",
            ContentCard::Notice(_) => "notice",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeciesCard {
    pub code: &'static str,
    pub icon: &'static str,
    pub title: String,
    pub origin: &'static str,
    pub traits: &'static str,
    pub care_tips: &'static str,
    pub use_cases: &'static str,
    pub bonus_note: &'static str,
}

impl From<&SpeciesProfile> for SpeciesCard {
    fn from(profile: &SpeciesProfile) -> Self {
        Self {
            code: profile.code.as_str(),
            icon: profile.icon,
            title: profile.title(),
            origin: profile.origin,
            traits: profile.traits,
            care_tips: profile.care_tips,
            use_cases: profile.use_cases,
            bonus_note: profile.bonus_note,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarCard {
    pub species_code: &'static str,
    pub months: Vec<CalendarMonth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarMonth {
    pub name: &'static str,
    pub tasks: Vec<&'static str>,
}

impl From<&CropCalendar> for CalendarCard {
    fn from(calendar: &CropCalendar) -> Self {
        Self {
            species_code: calendar.species.as_str(),
            months: calendar
                .months
                .iter()
                .map(|m| CalendarMonth {
                    name: m.month_name(),
                    tasks: m.tasks.to_vec(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FactCard {
    pub text: &'static str,
}

/// Severity of a notice card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Warning,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice-info",
            NoticeLevel::Warning => "notice-warning",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "ℹ️",
            NoticeLevel::Warning => "⚠️",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeCard {
    pub level: NoticeLevel,
    pub message: String,
}

impl NoticeCard {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

// ============================================================================
// Page
// ============================================================================

/// Inline image for the page (`data:` URI, never written to disk).
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub caption: &'static str,
    pub data_uri: String,
}

/// Everything the result section of the page shows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub uploaded: Option<ImageView>,
    pub annotated: Option<ImageView>,
    pub cards: Vec<ContentCard>,
}

pub const UNIDENTIFIED_MESSAGE: &str = "Could not identify the cotton species. Please try another image.";
pub const NO_CALENDAR_MESSAGE: &str = "No calendar available for this species.";

impl PageView {
    /// Cards for a completed detection.
    ///
    /// A fact is drawn only when a species was resolved.
    pub fn from_outcome<R: Rng + ?Sized>(outcome: &ResolvedOutcome, rng: &mut R) -> Self {
        let cards = match outcome {
            ResolvedOutcome::Resolved { profile, calendar } => {
                let calendar_card = match calendar {
                    Some(calendar) => ContentCard::Calendar(CalendarCard::from(*calendar)),
                    None => ContentCard::Notice(NoticeCard::new(NoticeLevel::Info, NO_CALENDAR_MESSAGE)),
                };
                vec![
                    ContentCard::Species(SpeciesCard::from(*profile)),
                    calendar_card,
                    ContentCard::Fact(FactCard { text: random_fact(rng) }),
                ]
            }
            ResolvedOutcome::Unidentified => {
                vec![ContentCard::Notice(NoticeCard::new(NoticeLevel::Warning, UNIDENTIFIED_MESSAGE))]
            }
            ResolvedOutcome::UnknownSpecies { label } => vec![ContentCard::Notice(NoticeCard::new(
                NoticeLevel::Warning,
                format!(
                    "Detected '{}', which is not in the species catalog. Please try another image.",
                    label
                ),
            ))],
        };

        Self { cards, ..Self::default() }
    }

    /// Cards for an upload that could not be processed.
    pub fn from_failure(error: &DetectionError) -> Self {
        let message = match error {
            DetectionError::UnsupportedFormat(reason) => {
                format!("Could not process image: {}. Please upload a JPG or PNG photo.", reason)
            }
            DetectionError::Timeout(_) => {
                "Could not process image: detection took too long. Please try again.".to_string()
            }
            _ => "Could not process image. Please try another photo.".to_string(),
        };

        Self::warning(message)
    }

    /// A page holding a single warning notice.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            cards: vec![ContentCard::Notice(NoticeCard::new(NoticeLevel::Warning, message))],
            ..Self::default()
        }
    }

    pub fn with_images(mut self, uploaded: Option<ImageView>, annotated: Option<ImageView>) -> Self {
        self.uploaded = uploaded;
        self.annotated = annotated;
        self
    }

    pub fn has_fact(&self) -> bool {
        self.cards.iter().any(|c| matches!(c, ContentCard::Fact(_)))
    }
}
