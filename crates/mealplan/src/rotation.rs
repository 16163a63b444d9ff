use dinnerplan_shared::Dinner;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Weekday};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// RotationState tracks which dinners were served this week and last week
///
/// A dinner that appears in either list is off the menu until it has been
/// out of both for a full week. `week_start` is the week boundary as of the
/// last rollover check.
///
/// This state is stored as JSON between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    #[serde(with = "iso_date")]
    pub week_start: Date,
    #[serde(default)]
    pub current_week: Vec<Dinner>,
    #[serde(default)]
    pub previous_week: Vec<Dinner>,
}

impl RotationState {
    /// Create an empty rotation anchored at `week_start`
    pub fn new(week_start: Date) -> Self {
        RotationState {
            week_start,
            current_week: Vec::new(),
            previous_week: Vec::new(),
        }
    }

    /// Roll the rotation over if `now` falls in a different week
    ///
    /// Returns true when a rollover happened. Calling this again within the
    /// same week is a no-op.
    pub fn check_new_week(&mut self, now: OffsetDateTime, first_day: Weekday) -> bool {
        self.roll_to(crate::week_boundary(now, first_day))
    }

    /// Roll the rotation over to `boundary` unless it is already anchored there
    ///
    /// Any change of boundary counts, including a backwards clock jump, so the
    /// week just served always becomes the previous week.
    pub fn roll_to(&mut self, boundary: Date) -> bool {
        if self.week_start == boundary {
            return false;
        }

        tracing::info!(
            from = %self.week_start,
            to = %boundary,
            served = self.current_week.len(),
            "rotation rolled over to a new week"
        );

        self.previous_week = std::mem::take(&mut self.current_week);
        self.week_start = boundary;

        true
    }

    /// Check if a dinner was served this week or last week (exact name match)
    pub fn is_already_selected(&self, dinner_name: &str) -> bool {
        self.current_week
            .iter()
            .chain(self.previous_week.iter())
            .any(|dinner| dinner.name == dinner_name)
    }

    /// Record a dinner as served this week
    ///
    /// This method does NOT check for duplicates - caller must verify with
    /// `is_already_selected()` first.
    pub fn add_selection(&mut self, dinner: Dinner) {
        self.current_week.push(dinner);
    }

    /// Get count of dinners currently excluded from selection
    pub fn excluded_count(&self) -> usize {
        self.current_week.len() + self.previous_week.len()
    }

    /// Serialize to pretty JSON for the state file
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
