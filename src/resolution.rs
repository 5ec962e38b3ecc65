//! Resolution Pipeline
//!
//! Turns one image's detections into the single outcome the page displays.
//!
//! Primary species policy: highest detection confidence wins; equal confidences (and
//! label-only inputs) go to the lexicographically smallest label. The same input always
//! yields the same species, independent of detection order.

use crate::catalog::{crop_calendar, species_profile, CropCalendar, SpeciesProfile};
use crate::detector::DetectionResult;

/// What the page shows for one upload.
#[derive(Debug, Clone)]
pub enum ResolvedOutcome {
    /// Detection ran but found nothing.
    Unidentified,
    /// A label was detected that has no catalog entry.
    UnknownSpecies { label: String },
    /// Species found; the calendar may still be missing.
    Resolved {
        profile: &'static SpeciesProfile,
        calendar: Option<&'static CropCalendar>,
    },
}

impl ResolvedOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolvedOutcome::Resolved { .. })
    }

    /// Species code for logging, if one was detected.
    pub fn label(&self) -> Option<&str> {
        match self {
            ResolvedOutcome::Unidentified => None,
            ResolvedOutcome::UnknownSpecies { label } => Some(label),
            ResolvedOutcome::Resolved { profile, .. } => Some(profile.code.as_str()),
        }
    }
}

/// Resolve one image's detections.
pub fn resolve(result: &DetectionResult) -> ResolvedOutcome {
    match result.primary_species() {
        None => ResolvedOutcome::Unidentified,
        Some(label) => resolve_primary(label),
    }
}

/// Resolve a bare set of labels (no confidences).
pub fn resolve_labels<I, S>(labels: I) -> ResolvedOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    resolve(&DetectionResult::from_labels(labels))
}

fn resolve_primary(label: &str) -> ResolvedOutcome {
    match species_profile(label) {
        Some(profile) => {
            let calendar = crop_calendar(label);
            if calendar.is_none() {
                tracing::debug!("No crop calendar for {}", label);
            }
            ResolvedOutcome::Resolved { profile, calendar }
        }
        None => {
            tracing::warn!("Detected label '{}' has no catalog entry", label);
            ResolvedOutcome::UnknownSpecies { label: label.to_string() }
        }
    }
}
