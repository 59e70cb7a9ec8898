use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::error::GuiError;
use crate::racer::Racer;
use crate::store::StateStore;

use super::pages;
use super::state::{BatchModel, MainModel};

pub const MAIN_REFRESH: Duration = Duration::from_secs(5);
pub const BATCH_REFRESH: Duration = Duration::from_secs(10);
const TOAST_TTL: Duration = Duration::from_secs(5);

pub fn run(store: StateStore, racer: Arc<dyn Racer>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_fullscreen(true),
        ..Default::default()
    };
    eframe::run_native(
        "CompuRacer GUI",
        options,
        Box::new(move |_cc| Ok(Box::new(GuiApp::new(store, racer)))),
    )
}

/// Poll timer backing the refresh protocol. Re-armed on every tick, so an
/// unfocused window keeps polling indefinitely.
#[derive(Debug)]
pub struct RefreshTimer {
    interval: Duration,
    next: Instant,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    fn starting_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    pub fn due(&self, now: Instant) -> bool {
        now >= self.next
    }

    pub fn rearm(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Requests,
    Batches,
    Logs,
}

pub struct MainScreen {
    pub model: MainModel,
    pub tab: Tab,
    pub new_batch_name: String,
    pub timer: RefreshTimer,
}

impl MainScreen {
    fn new(model: MainModel) -> Self {
        Self {
            model,
            tab: Tab::Requests,
            new_batch_name: String::new(),
            timer: RefreshTimer::new(MAIN_REFRESH),
        }
    }
}

pub struct BatchScreen {
    pub model: BatchModel,
    /// `None` once the batch has been handed to the racer for sending.
    pub timer: Option<RefreshTimer>,
}

impl BatchScreen {
    fn new(model: BatchModel) -> Self {
        Self {
            model,
            timer: Some(RefreshTimer::new(BATCH_REFRESH)),
        }
    }
}

/// The single current screen; navigation replaces it wholesale.
pub enum Screen {
    Main(MainScreen),
    Batch(BatchScreen),
}

/// A user intent collected during rendering. Row identity travels with the
/// action so no handler closes over loop state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    AddRequest { request_id: String },
    SetCurrentBatch { name: String },
    OpenBatch { name: String },
    CreateBatch { name: String },
    SendBatch,
    GoBack,
    Save,
    Quit,
}

struct Toast {
    // Stable widget id, so surviving toasts keep their identity when an
    // earlier one expires.
    id: u64,
    text: String,
    error: bool,
    expires: Instant,
}

pub struct GuiApp {
    store: StateStore,
    racer: Arc<dyn Racer>,
    screen: Screen,
    toasts: Vec<Toast>,
    next_toast_id: u64,
}

impl GuiApp {
    fn new(store: StateStore, racer: Arc<dyn Racer>) -> Self {
        let mut app = Self {
            store,
            racer,
            screen: Screen::Main(MainScreen::new(MainModel::default())),
            toasts: Vec::new(),
            next_toast_id: 0,
        };
        match MainModel::load(&app.store) {
            Ok(model) => app.screen = Screen::Main(MainScreen::new(model)),
            Err(e) => app.report(e),
        }
        app
    }

    fn push_toast(&mut self, text: String, error: bool) {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        self.toasts.push(Toast {
            id,
            text,
            error,
            expires: Instant::now() + TOAST_TTL,
        });
    }

    fn toast(&mut self, text: impl Into<String>) {
        self.push_toast(text.into(), false);
    }

    fn toast_error(&mut self, text: impl Into<String>) {
        self.push_toast(text.into(), true);
    }

    fn report(&mut self, err: GuiError) {
        tracing::warn!(%err, "gui error");
        self.toast_error(err.to_string());
    }

    /// Delegate persistence to the racer, the standard save before any
    /// refresh or navigation.
    fn save_state(&mut self) {
        if let Err(e) = self.racer.save(true) {
            self.report(GuiError::Collaborator(e.to_string()));
        }
    }

    /// Refresh protocol: on a due tick the timer re-arms; a focused window
    /// additionally saves and rebuilds its view-model from disk.
    fn tick(&mut self, now: Instant, focused: bool) {
        let due = match &mut self.screen {
            Screen::Main(screen) => {
                if screen.timer.due(now) {
                    screen.timer.rearm(now);
                    true
                } else {
                    false
                }
            }
            Screen::Batch(screen) => match &mut screen.timer {
                Some(timer) if timer.due(now) => {
                    timer.rearm(now);
                    true
                }
                _ => false,
            },
        };
        if !due || !focused {
            return;
        }
        self.save_state();
        self.rebuild_current();
    }

    /// Reload the current screen wholesale. On failure the prior model keeps
    /// rendering and the error is surfaced as a toast.
    fn rebuild_current(&mut self) {
        match &self.screen {
            Screen::Main(screen) => {
                let tab = screen.tab;
                let pending = screen.new_batch_name.clone();
                match MainModel::load(&self.store) {
                    Ok(model) => {
                        let mut fresh = MainScreen::new(model);
                        fresh.tab = tab;
                        fresh.new_batch_name = pending;
                        self.screen = Screen::Main(fresh);
                    }
                    Err(e) => self.report(e),
                }
            }
            Screen::Batch(screen) => {
                let name = screen.model.name.clone();
                match BatchModel::load(&self.store, &name) {
                    Ok(model) => self.screen = Screen::Batch(BatchScreen::new(model)),
                    Err(e) => self.report(e),
                }
            }
        }
    }

    fn apply(&mut self, action: UiAction, ctx: &egui::Context) {
        match action {
            UiAction::AddRequest { request_id } => {
                match self.racer.add_request_to_current_batch(&request_id) {
                    Ok(()) => {
                        self.toast(format!("Request {request_id} added to the current batch"));
                    }
                    Err(e) => self.report(GuiError::Collaborator(e.to_string())),
                }
            }
            UiAction::SetCurrentBatch { name } => match self.racer.set_current_batch(&name) {
                Ok(()) => self.toast(format!("Set current batch to {name}")),
                Err(e) => self.report(GuiError::Collaborator(e.to_string())),
            },
            UiAction::CreateBatch { name } => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    self.toast_error("Batch name must not be empty");
                    return;
                }
                match self.racer.create_batch(&name) {
                    Ok(()) => {
                        if let Screen::Main(screen) = &mut self.screen {
                            screen.new_batch_name.clear();
                        }
                        self.toast(format!(
                            "Added new batch {name}. Add a request to it before opening."
                        ));
                    }
                    Err(e) => self.report(GuiError::Collaborator(e.to_string())),
                }
            }
            UiAction::OpenBatch { name } => {
                self.save_state();
                match BatchModel::load(&self.store, &name) {
                    Ok(model) => self.screen = Screen::Batch(BatchScreen::new(model)),
                    Err(e) => self.report(e),
                }
            }
            UiAction::SendBatch => {
                self.save_state();
                if let Screen::Batch(screen) = &mut self.screen {
                    screen.timer = None;
                }
                match self.racer.send_batches() {
                    Ok(()) => self.toast("Batch handed to the racer for sending"),
                    Err(e) => self.report(GuiError::Collaborator(e.to_string())),
                }
            }
            UiAction::GoBack => match MainModel::load(&self.store) {
                Ok(model) => self.screen = Screen::Main(MainScreen::new(model)),
                Err(e) => self.report(e),
            },
            UiAction::Save => self.save_state(),
            UiAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn draw_toasts(&self, ctx: &egui::Context) {
        for (idx, toast) in self.toasts.iter().enumerate() {
            egui::Window::new("notification")
                .id(egui::Id::new(("toast", toast.id)))
                .anchor(egui::Align2::CENTER_TOP, [0.0, 8.0 + 36.0 * idx as f32])
                .title_bar(false)
                .resizable(false)
                .collapsible(false)
                .show(ctx, |ui| {
                    if toast.error {
                        ui.colored_label(egui::Color32::from_rgb(200, 80, 60), &toast.text);
                    } else {
                        ui.label(&toast.text);
                    }
                });
        }
    }

    /// Earliest moment anything time-driven (poll tick, toast expiry) needs a
    /// repaint. `None` when the screen has stopped polling and no toast is up.
    fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        let timer = match &self.screen {
            Screen::Main(screen) => Some(screen.timer.remaining(now)),
            Screen::Batch(screen) => screen.timer.as_ref().map(|t| t.remaining(now)),
        };
        let toast = self
            .toasts
            .iter()
            .map(|t| t.expires.saturating_duration_since(now))
            .min();
        [timer, toast].into_iter().flatten().min()
    }
}

impl eframe::App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.toasts.retain(|toast| toast.expires > now);

        // Treat an unreported focus state as focused so refresh still works
        // on backends that never set it.
        let focused = ctx.input(|i| i.viewport().focused.unwrap_or(true));
        self.tick(now, focused);

        let mut actions = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.screen {
            Screen::Main(screen) => pages::render_main(ui, screen, &mut actions),
            Screen::Batch(screen) => pages::render_batch(ui, screen, &mut actions),
        });
        for action in actions {
            self.apply(action, ctx);
        }

        self.draw_toasts(ctx);

        if let Some(wait) = self.next_wakeup(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
    }
}
