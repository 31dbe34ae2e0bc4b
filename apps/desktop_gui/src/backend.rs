//! Backend worker: owns the tokio runtime and the roster client, services
//! commands queued by the UI, and forwards client events back to it.

use std::{sync::Arc, thread};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use roster_client::{ClientEvent, RosterClient};
use url::Url;

use crate::events::UiEvent;

pub enum BackendCommand {
    RefreshActivities,
    SignUp { activity: String, email: String },
    Unregister { activity: String, email: String },
}

pub fn queue_command(cmd_tx: &Sender<BackendCommand>, cmd: BackendCommand, status: &mut String) {
    let cmd_name = match &cmd {
        BackendCommand::RefreshActivities => "refresh_activities",
        BackendCommand::SignUp { .. } => "sign_up",
        BackendCommand::Unregister { .. } => "unregister",
    };
    tracing::debug!(command = cmd_name, "queueing ui->backend command");
    match cmd_tx.try_send(cmd) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker is unavailable; restart the app".to_string();
            tracing::error!(command = cmd_name, "ui->backend command channel disconnected");
        }
    }
}

pub fn spawn_backend_thread(
    server_url: Url,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::RosterUnavailable {
                    notice: "Backend worker failed to start.".to_string(),
                });
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = match RosterClient::new(server_url.clone()) {
                Ok(client) => client,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::RosterUnavailable {
                        notice: format!("Invalid server URL {server_url}: {err}"),
                    });
                    tracing::error!("failed to build roster client: {err}");
                    return;
                }
            };

            let mut events = client.subscribe_events();
            let ui_tx_clone = ui_tx.clone();
            let forward_task = tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    let evt = match event {
                        ClientEvent::RosterLoaded(activities) => UiEvent::RosterLoaded(activities),
                        ClientEvent::RosterUnavailable { notice } => {
                            UiEvent::RosterUnavailable { notice }
                        }
                        ClientEvent::SignupAccepted => UiEvent::SignupAccepted,
                        ClientEvent::Status(notice) => UiEvent::Status(notice),
                    };
                    let _ = ui_tx_clone.try_send(evt);
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            // Commands run on their own tasks: mutations are not serialized
            // against each other, and whichever response lands last
            // determines the final roster and status message.
            while let Ok(cmd) = cmd_rx.recv() {
                let client = Arc::clone(&client);
                tokio::spawn(async move {
                    match cmd {
                        BackendCommand::RefreshActivities => {
                            tracing::info!("backend: refresh_activities");
                            client.refresh_activities().await;
                        }
                        BackendCommand::SignUp { activity, email } => {
                            tracing::info!(activity, email, "backend: sign_up");
                            client.sign_up(&activity, &email).await;
                        }
                        BackendCommand::Unregister { activity, email } => {
                            tracing::info!(activity, email, "backend: unregister");
                            client.unregister(&activity, &email).await;
                        }
                    }
                });
            }

            forward_task.abort();
        });
    });
}
