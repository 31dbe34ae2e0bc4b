//! Events delivered from the backend worker to the UI thread.

use roster_client::StatusNotice;
use shared::domain::ActivityMap;

pub enum UiEvent {
    Info(String),
    /// Replace the rendered roster and rebuild the selector options.
    RosterLoaded(ActivityMap),
    /// Show the failure notice in place of the roster; the selector keeps
    /// whatever options it had.
    RosterUnavailable { notice: String },
    /// The server accepted a signup; clear the form fields.
    SignupAccepted,
    Status(StatusNotice),
}
