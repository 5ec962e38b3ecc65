//! Cotton Content Catalog
//!
//! Static reference data compiled into the binary:
//! - `species`: one descriptive profile per recognized cotton species
//! - `calendar`: twelve-month crop calendars keyed by species
//! - `facts`: cotton trivia, sampled uniformly for the fact card
//!
//! Every lookup is read-only. "Not found" is a normal outcome (`None`), never an error.

pub mod species;
pub mod calendar;
pub mod facts;

pub use species::{species_profile, SpeciesCode, SpeciesProfile, UnknownSpeciesCode};
pub use calendar::{crop_calendar, CropCalendar, MonthTasks};
pub use facts::{facts, random_fact};
