use std::time::{Duration, Instant};

mod backend;
mod events;

use backend::{queue_command, spawn_backend_thread, BackendCommand};
use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use events::UiEvent;
use roster_client::{
    view::{RosterViewModel, EMPTY_ROSTER_PLACEHOLDER, SELECTOR_PLACEHOLDER},
    StatusKind, StatusNotice,
};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "activity-roster", about = "Desktop client for the activity signup roster")]
struct Args {
    /// Base URL of the roster API server.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server_url: Url,
}

enum RosterState {
    Loading,
    Loaded(RosterViewModel),
    Unavailable(String),
}

struct ActiveNotice {
    text: String,
    kind: StatusKind,
    hide_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingUnregister {
    activity: String,
    email: String,
}

struct RosterApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    roster: RosterState,
    // Selector options survive a failed refresh; only a successful fetch
    // rebuilds them.
    selector_options: Vec<String>,

    email_input: String,
    selected_activity: Option<String>,

    status: String,
    notice: Option<ActiveNotice>,
    pending_unregister: Option<PendingUnregister>,
}

impl RosterApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            roster: RosterState::Loading,
            selector_options: Vec::new(),
            email_input: String::new(),
            selected_activity: None,
            status: "Loading activities...".to_string(),
            notice: None,
            pending_unregister: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::RosterLoaded(activities) => {
                    let model = RosterViewModel::build(&activities);
                    if let Some(selected) = &self.selected_activity {
                        if !model.selector_options.contains(selected) {
                            self.selected_activity = None;
                        }
                    }
                    self.selector_options = model.selector_options.clone();
                    self.status = format!("{} activities loaded", model.cards.len());
                    self.roster = RosterState::Loaded(model);
                }
                UiEvent::RosterUnavailable { notice } => {
                    self.roster = RosterState::Unavailable(notice);
                }
                UiEvent::SignupAccepted => {
                    self.email_input.clear();
                    self.selected_activity = None;
                }
                UiEvent::Status(notice) => self.apply_status(notice, Instant::now()),
            }
        }
    }

    // A newer notice overwrites the text and resets the auto-hide deadline,
    // so an older pending timer can never hide it early.
    fn apply_status(&mut self, notice: StatusNotice, now: Instant) {
        self.notice = Some(ActiveNotice {
            text: notice.text,
            kind: notice.kind,
            hide_at: now + notice.visible_for,
        });
    }

    fn expire_status(&mut self, now: Instant) {
        if let Some(active) = &self.notice {
            if now >= active.hide_at {
                self.notice = None;
            }
        }
    }

    fn signup_allowed(&self) -> bool {
        !self.email_input.trim().is_empty() && self.selected_activity.is_some()
    }

    fn submit_signup(&mut self) {
        let Some(activity) = self.selected_activity.clone() else {
            return;
        };
        let email = self.email_input.trim().to_string();
        if email.is_empty() {
            return;
        }
        queue_command(
            &self.cmd_tx,
            BackendCommand::SignUp { activity, email },
            &mut self.status,
        );
    }

    fn confirm_unregister(&mut self) {
        if let Some(pending) = self.pending_unregister.take() {
            queue_command(
                &self.cmd_tx,
                BackendCommand::Unregister {
                    activity: pending.activity,
                    email: pending.email,
                },
                &mut self.status,
            );
        }
    }

    fn decline_unregister(&mut self) {
        self.pending_unregister = None;
    }

    fn show_status_banner(&self, ui: &mut egui::Ui) {
        if let Some(active) = &self.notice {
            let fill = match active.kind {
                StatusKind::Success => egui::Color32::from_rgb(34, 92, 54),
                StatusKind::Error => egui::Color32::from_rgb(111, 53, 53),
            };
            egui::Frame::NONE
                .fill(fill)
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new(&active.text).color(egui::Color32::WHITE));
                });
            ui.add_space(6.0);
        }
    }

    fn show_roster(&mut self, ui: &mut egui::Ui) {
        let mut clicked_removal: Option<PendingUnregister> = None;

        match &self.roster {
            RosterState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading activities...");
                });
            }
            RosterState::Unavailable(notice) => {
                ui.label(egui::RichText::new(notice).weak());
            }
            RosterState::Loaded(model) => {
                egui::ScrollArea::vertical()
                    .id_salt("roster_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for card in &model.cards {
                            egui::Frame::group(ui.style())
                                .inner_margin(egui::Margin::symmetric(12, 10))
                                .show(ui, |ui| {
                                    ui.set_min_width(ui.available_width());
                                    ui.heading(&card.name);
                                    ui.label(&card.description);
                                    ui.horizontal(|ui| {
                                        ui.label(egui::RichText::new("Schedule:").strong());
                                        ui.label(&card.schedule);
                                    });
                                    ui.horizontal(|ui| {
                                        ui.label(egui::RichText::new("Availability:").strong());
                                        ui.label(format!("{} spots left", card.spots_left));
                                    });
                                    ui.add_space(4.0);
                                    ui.label(egui::RichText::new("Participants").strong());
                                    if card.participants.is_empty() {
                                        ui.label(
                                            egui::RichText::new(EMPTY_ROSTER_PLACEHOLDER).weak(),
                                        );
                                    } else {
                                        for row in &card.participants {
                                            ui.horizontal(|ui| {
                                                draw_avatar(ui, &row.initials);
                                                ui.label(&row.email);
                                                ui.with_layout(
                                                    egui::Layout::right_to_left(
                                                        egui::Align::Center,
                                                    ),
                                                    |ui| {
                                                        let remove = ui
                                                            .small_button("🗑")
                                                            .on_hover_text(format!(
                                                                "Unregister {}",
                                                                row.email
                                                            ));
                                                        if remove.clicked() {
                                                            clicked_removal =
                                                                Some(PendingUnregister {
                                                                    activity: card.name.clone(),
                                                                    email: row.email.clone(),
                                                                });
                                                        }
                                                    },
                                                );
                                            });
                                        }
                                    }
                                });
                            ui.add_space(8.0);
                        }
                    });
            }
        }

        if let Some(pending) = clicked_removal {
            self.pending_unregister = Some(pending);
        }
    }

    fn show_signup_form(&mut self, ui: &mut egui::Ui) {
        ui.heading("Sign Up for an Activity");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Email:");
            ui.add(
                egui::TextEdit::singleline(&mut self.email_input)
                    .hint_text("you@school.edu")
                    .desired_width(220.0),
            );
            ui.label("Activity:");
            let selected_label = self
                .selected_activity
                .clone()
                .unwrap_or_else(|| SELECTOR_PLACEHOLDER.to_string());
            egui::ComboBox::from_id_salt("activity_selector")
                .selected_text(selected_label)
                .show_ui(ui, |ui| {
                    ui.add_enabled(
                        false,
                        egui::SelectableLabel::new(
                            self.selected_activity.is_none(),
                            SELECTOR_PLACEHOLDER,
                        ),
                    );
                    for option in &self.selector_options {
                        ui.selectable_value(
                            &mut self.selected_activity,
                            Some(option.clone()),
                            option,
                        );
                    }
                });
            let submit = ui.add_enabled(self.signup_allowed(), egui::Button::new("Sign Up"));
            if submit.clicked() {
                self.submit_signup();
            }
        });
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_unregister.clone() else {
            return;
        };
        egui::Window::new("Confirm unregistration")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Unregister {} from {}?",
                    pending.email, pending.activity
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Unregister").clicked() {
                        self.confirm_unregister();
                    }
                    if ui.button("Cancel").clicked() {
                        self.decline_unregister();
                    }
                });
            });
    }
}

fn draw_avatar(ui: &mut egui::Ui, initials: &str) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(24.0, 24.0), egui::Sense::hover());
    ui.painter()
        .circle_filled(rect.center(), 12.0, egui::Color32::from_rgb(58, 60, 70));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        egui::FontId::proportional(10.0),
        egui::Color32::WHITE,
    );
}

impl eframe::App for RosterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.expire_status(Instant::now());

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Activity Roster");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        queue_command(
                            &self.cmd_tx,
                            BackendCommand::RefreshActivities,
                            &mut self.status,
                        );
                    }
                    ui.small(egui::RichText::new(&self.status).weak());
                });
            });
        });

        egui::TopBottomPanel::bottom("signup_form")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                self.show_signup_form(ui);
                ui.add_space(6.0);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_status_banner(ui);
            self.show_roster(ui);
        });

        self.show_confirm_dialog(ctx);

        // Keeps the channel polling and banner expiry moving without user input.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    spawn_backend_thread(args.server_url, cmd_rx, ui_tx);

    // The initial sync replaces the page-load fetch; it is queued before the
    // first frame renders.
    let mut startup_status = String::new();
    queue_command(&cmd_tx, BackendCommand::RefreshActivities, &mut startup_status);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Activity Roster")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Activity Roster",
        options,
        Box::new(|_cc| Ok(Box::new(RosterApp::new(cmd_tx, ui_rx)))),
    )
}
