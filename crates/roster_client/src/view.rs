//! Pure view-model construction for the roster display.
//!
//! The model is rebuilt wholesale from each fetched collection; there is no
//! diffing against the previous render and no retained per-row state.

use shared::{display::initials, domain::ActivityMap};

pub const SELECTOR_PLACEHOLDER: &str = "-- Select an activity --";
pub const EMPTY_ROSTER_PLACEHOLDER: &str = "No participants yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub email: String,
    pub initials: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterViewModel {
    /// One card per activity, in the collection's iteration order.
    pub cards: Vec<ActivityCard>,
    /// Selector entries, one per activity; the disabled placeholder sits in
    /// front of these when rendered.
    pub selector_options: Vec<String>,
}

impl RosterViewModel {
    pub fn build(activities: &ActivityMap) -> Self {
        let cards = activities
            .iter()
            .map(|(name, activity)| ActivityCard {
                name: name.clone(),
                description: activity.description.clone(),
                schedule: activity.schedule.clone(),
                spots_left: activity.spots_left(),
                participants: activity
                    .participants
                    .iter()
                    .map(|email| ParticipantRow {
                        email: email.clone(),
                        initials: initials(email),
                    })
                    .collect(),
            })
            .collect();
        let selector_options = activities.keys().cloned().collect();
        Self {
            cards,
            selector_options,
        }
    }

    /// Every participant row carries exactly one removal control.
    pub fn removal_control_count(&self) -> usize {
        self.cards
            .iter()
            .map(|card| card.participants.len())
            .sum()
    }
}
