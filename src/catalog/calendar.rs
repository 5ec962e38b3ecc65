//! Crop calendars: twelve months of field tasks per species.
//!
//! A species without a calendar is valid; callers show a "not available" notice.

use chrono::Month;

use super::species::SpeciesCode;

/// Tasks for a single month.
#[derive(Debug, Clone)]
pub struct MonthTasks {
    pub month: Month,
    pub tasks: &'static [&'static str],
}

impl MonthTasks {
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

/// Twelve-month task plan, January first.
#[derive(Debug, Clone)]
pub struct CropCalendar {
    pub species: SpeciesCode,
    pub months: [MonthTasks; 12],
}

const fn m(month: Month, tasks: &'static [&'static str]) -> MonthTasks {
    MonthTasks { month, tasks }
}

// ============================================================================
// EMBEDDED CALENDAR DATA
// ============================================================================

static CALENDARS: &[CropCalendar] = &[
    CropCalendar {
        species: SpeciesCode::Arboreum,
        months: [
            m(Month::January, &["Land preparation", "Soil health analysis"]),
            m(Month::February, &["Start sowing in warmer zones"]),
            m(Month::March, &["Seed treatment", "Sowing in central zones"]),
            m(Month::April, &["Thinning", "First irrigation", "Weed removal"]),
            m(Month::May, &["Fertilizer application", "Monitor early pests"]),
            m(Month::June, &["Regular irrigation", "Spray bio-pesticides"]),
            m(Month::July, &["Full vegetative growth", "Fertilizer top-up"]),
            m(Month::August, &["Flowering begins", "Insect control"]),
            m(Month::September, &["Boll formation", "Less irrigation"]),
            m(Month::October, &["Harvesting begins", "Dry cotton properly"]),
            m(Month::November, &["Final picking", "Field cleaning"]),
            m(Month::December, &["Crop rotation prep", "Off-season planning"]),
        ],
    },
    CropCalendar {
        species: SpeciesCode::Herbaceum,
        months: [
            m(Month::January, &["Send soil for testing", "Prepare compost"]),
            m(Month::February, &["Early sowing in southern India"]),
            m(Month::March, &["Sowing in main belts", "Set up drip irrigation"]),
            m(Month::April, &["Thin plants", "Apply bio-fertilizers"]),
            m(Month::May, &["Check for weeds and pests", "Apply foliar spray"]),
            m(Month::June, &["Boost with fertilizer", "Set up insect traps"]),
            m(Month::July, &["Support vegetative phase", "Irrigate frequently"]),
            m(Month::August, &["Monitor full bloom", "Apply potassium nitrate"]),
            m(Month::September, &["Reduce irrigation", "Check for boll rot"]),
            m(Month::October, &["Harvest mid-month", "Sort cotton"]),
            m(Month::November, &["Clear fields", "Sell produce"]),
            m(Month::December, &["Plough fields", "Plan next cycle"]),
        ],
    },
    CropCalendar {
        species: SpeciesCode::Hirsutum,
        months: [
            m(Month::January, &["Control pre-sowing weeds", "Plant green manure"]),
            m(Month::February, &["Sow in Tamil Nadu/Andhra"]),
            m(Month::March, &["Main season sowing", "Plan fertilizers"]),
            m(Month::April, &["Start irrigation", "Control weeds"]),
            m(Month::May, &["Monitor early insects"]),
            m(Month::June, &["Apply top-dressing fertilizers", "Irrigate weekly"]),
            m(Month::July, &["Support growth", "Spray micronutrients"]),
            m(Month::August, &["Protect heavy flowering from bollworms"]),
            m(Month::September, &["Monitor maturing bolls", "Check weather"]),
            m(Month::October, &["Harvest mid to late month", "Dry cotton"]),
            m(Month::November, &["Complete harvest", "Clear fields"]),
            m(Month::December, &["Prepare fields for next cycle"]),
        ],
    },
    CropCalendar {
        species: SpeciesCode::Barbadense,
        months: [
            m(Month::January, &["Prepare soil", "Plan fertilization"]),
            m(Month::February, &["Sow in southern zones"]),
            m(Month::March, &["Treat seeds", "Sow in warmer climates"]),
            m(Month::April, &["Begin irrigation", "Control early pests"]),
            m(Month::May, &["Maintain irrigation", "Monitor pests/diseases"]),
            m(Month::June, &["Spray foliar fertilizers", "Ensure water levels"]),
            m(Month::July, &["Support vegetative growth", "Monitor water needs"]),
            m(Month::August, &["Control insects during boll formation"]),
            m(Month::September, &["Reduce irrigation", "Monitor boll growth"]),
            m(Month::October, &["Start harvesting", "Dry cotton"]),
            m(Month::November, &["Finish picking", "Store and gin cotton"]),
            m(Month::December, &["Plan next season", "Prepare fields"]),
        ],
    },
];

/// Look up the crop calendar for a detected label.
pub fn crop_calendar(code: &str) -> Option<&'static CropCalendar> {
    let code: SpeciesCode = code.parse().ok()?;
    CALENDARS.iter().find(|calendar| calendar.species == code)
}
