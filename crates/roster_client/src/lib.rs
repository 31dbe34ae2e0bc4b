use std::{sync::Arc, time::Duration};

use anyhow::{anyhow, Result};
use reqwest::Client;
use shared::{domain::ActivityMap, protocol::MutationOutcomeBody};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{error, warn};
use url::Url;

pub mod view;

/// How long a signup outcome stays on screen.
pub const SIGNUP_STATUS_VISIBILITY: Duration = Duration::from_secs(5);
/// How long an unregister outcome stays on screen.
pub const UNREGISTER_STATUS_VISIBILITY: Duration = Duration::from_secs(4);

const ROSTER_UNAVAILABLE_NOTICE: &str = "Failed to load activities. Please try again later.";
const SIGNUP_CONFIRMED_FALLBACK: &str = "Signed up";
const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
const SIGNUP_TRANSPORT_FAILURE: &str = "Failed to sign up. Please try again.";
const UNREGISTER_REJECTED_FALLBACK: &str = "Failed to unregister participant";
const UNREGISTER_TRANSPORT_FAILURE: &str = "Failed to unregister. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

/// One transient status event for the UI's single message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotice {
    pub text: String,
    pub kind: StatusKind,
    pub visible_for: Duration,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    /// Full replacement of the displayed roster and the selector options.
    RosterLoaded(ActivityMap),
    /// The roster could not be fetched; display the notice in place of the
    /// roster and leave the selector as it was.
    RosterUnavailable { notice: String },
    /// A signup was accepted by the server; the form fields should be cleared.
    SignupAccepted,
    Status(StatusNotice),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("activities request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("activities response was not a valid roster: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Async client for the activity roster API. All operations emit their
/// outcomes over the broadcast channel; none of them propagates a failure to
/// the caller, and none retries on its own.
pub struct RosterClient {
    http: Client,
    base_url: Url,
    events: broadcast::Sender<ClientEvent>,
}

impl RosterClient {
    pub fn new(base_url: Url) -> Result<Arc<Self>> {
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("server URL {base_url} cannot carry path segments"));
        }
        let (events, _) = broadcast::channel(256);
        Ok(Arc::new(Self {
            http: Client::new(),
            base_url,
            events,
        }))
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// `GET /activities`, parsed as the full name-to-activity mapping.
    pub async fn fetch_activities(&self) -> Result<ActivityMap, FetchError> {
        let url = self.endpoint(&["activities"]);
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// One resync cycle: fetch the collection, then either replace the roster
    /// wholesale or put up the static failure notice. A failed cycle is
    /// terminal; the next trigger retries implicitly.
    pub async fn refresh_activities(&self) {
        match self.fetch_activities().await {
            Ok(activities) => {
                let _ = self.events.send(ClientEvent::RosterLoaded(activities));
            }
            Err(err) => {
                error!(base_url = %self.base_url, "failed to fetch activity roster: {err}");
                let _ = self.events.send(ClientEvent::RosterUnavailable {
                    notice: ROSTER_UNAVAILABLE_NOTICE.to_string(),
                });
            }
        }
    }

    /// `POST /activities/{name}/signup?email=`. On acceptance the confirmation
    /// banner is emitted first and the roster resync follows; a rejection
    /// surfaces the server's detail and skips the resync entirely.
    pub async fn sign_up(&self, activity: &str, email: &str) {
        let mut url = self.endpoint(&["activities", activity, "signup"]);
        url.query_pairs_mut().append_pair("email", email);

        let response = match self.http.post(url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(activity, email, "signup request failed: {err}");
                self.emit_status(
                    SIGNUP_TRANSPORT_FAILURE,
                    StatusKind::Error,
                    SIGNUP_STATUS_VISIBILITY,
                );
                return;
            }
        };

        let status = response.status();
        let body: MutationOutcomeBody = response.json().await.unwrap_or_default();

        if status.is_success() {
            let _ = self.events.send(ClientEvent::SignupAccepted);
            let text = body
                .message
                .unwrap_or_else(|| SIGNUP_CONFIRMED_FALLBACK.to_string());
            self.emit_status(text, StatusKind::Success, SIGNUP_STATUS_VISIBILITY);
            self.refresh_activities().await;
        } else {
            warn!(activity, email, %status, "signup rejected by server");
            let text = body
                .detail
                .unwrap_or_else(|| SIGNUP_REJECTED_FALLBACK.to_string());
            self.emit_status(text, StatusKind::Error, SIGNUP_STATUS_VISIBILITY);
        }
    }

    /// `DELETE /activities/{name}/participants?email=`. On success the roster
    /// resync lands before the confirmation banner, so the removal is already
    /// visible when the message appears.
    pub async fn unregister(&self, activity: &str, email: &str) {
        if activity.is_empty() || email.is_empty() {
            return;
        }

        let mut url = self.endpoint(&["activities", activity, "participants"]);
        url.query_pairs_mut().append_pair("email", email);

        let response = match self.http.delete(url).send().await {
            Ok(response) => response,
            Err(err) => {
                error!(activity, email, "unregister request failed: {err}");
                self.emit_status(
                    UNREGISTER_TRANSPORT_FAILURE,
                    StatusKind::Error,
                    UNREGISTER_STATUS_VISIBILITY,
                );
                return;
            }
        };

        let status = response.status();
        let body: MutationOutcomeBody = response.json().await.unwrap_or_default();

        if status.is_success() {
            self.refresh_activities().await;
            let text = body
                .message
                .unwrap_or_else(|| format!("{email} unregistered from {activity}"));
            self.emit_status(text, StatusKind::Success, UNREGISTER_STATUS_VISIBILITY);
        } else {
            warn!(activity, email, %status, "unregister rejected by server");
            let text = body
                .detail
                .unwrap_or_else(|| UNREGISTER_REJECTED_FALLBACK.to_string());
            self.emit_status(text, StatusKind::Error, UNREGISTER_STATUS_VISIBILITY);
        }
    }

    fn emit_status(&self, text: impl Into<String>, kind: StatusKind, visible_for: Duration) {
        let _ = self.events.send(ClientEvent::Status(StatusNotice {
            text: text.into(),
            kind,
            visible_for,
        }));
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
