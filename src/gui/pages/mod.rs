//! Screen rendering. Pure widget wiring: every user intent is pushed onto
//! the frame's action list and applied by the controller afterwards.

use eframe::egui;

use super::app::{BatchScreen, MainScreen, Tab, UiAction};
use super::state::{BatchRow, RequestRow};

pub fn render_main(ui: &mut egui::Ui, screen: &mut MainScreen, actions: &mut Vec<UiAction>) {
    nav(ui, &mut screen.tab);
    match screen.tab {
        Tab::Requests => render_requests(ui, &screen.model.requests, actions),
        Tab::Batches => render_batches(
            ui,
            &screen.model.batches,
            &mut screen.new_batch_name,
            actions,
        ),
        Tab::Logs => render_logs(ui, &screen.model.history, actions),
    }
}

fn nav(ui: &mut egui::Ui, current: &mut Tab) {
    ui.horizontal(|ui| {
        let items = [
            (Tab::Requests, "Requests"),
            (Tab::Batches, "Batches"),
            (Tab::Logs, "Logs"),
        ];
        for (tab, label) in items {
            if ui.selectable_label(*current == tab, label).clicked() {
                *current = tab;
            }
        }
    });
    ui.separator();
}

fn render_requests(ui: &mut egui::Ui, rows: &[RequestRow], actions: &mut Vec<UiAction>) {
    ui.heading("Requests");
    ui.separator();
    if rows.is_empty() {
        ui.label("No captured requests.");
        return;
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("requests_grid")
            .striped(true)
            .min_col_width(60.0)
            .show(ui, |ui| {
                for header in ["ID", "URL", "Method", "Timestamp", "Host", ""] {
                    ui.strong(header);
                }
                ui.end_row();
                for row in rows {
                    ui.label(&row.id);
                    ui.label(&row.url);
                    ui.label(&row.method);
                    ui.label(&row.timestamp);
                    ui.label(&row.host);
                    if ui.button("Add").clicked() {
                        actions.push(UiAction::AddRequest {
                            request_id: row.id.clone(),
                        });
                    }
                    ui.end_row();
                }
            });
    });
}

fn render_batches(
    ui: &mut egui::Ui,
    rows: &[BatchRow],
    new_batch_name: &mut String,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Batches");
    ui.separator();
    if rows.is_empty() {
        ui.label("No batches yet.");
    } else {
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("batches_grid")
                .striped(true)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    let headers = [
                        "Name",
                        "Allow Redirects",
                        "Sync Last Byte",
                        "Send Timeout",
                        "",
                        "",
                    ];
                    for header in headers {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for row in rows {
                        cell(ui, &row.name, row.is_current);
                        cell(ui, &row.allow_redirects.to_string(), row.is_current);
                        cell(ui, &row.sync_last_byte.to_string(), row.is_current);
                        cell(ui, &row.send_timeout.to_string(), row.is_current);
                        if ui
                            .add_enabled(row.can_set_current(), egui::Button::new("Set Current"))
                            .clicked()
                        {
                            actions.push(UiAction::SetCurrentBatch {
                                name: row.name.clone(),
                            });
                        }
                        if ui
                            .add_enabled(row.can_open(), egui::Button::new("Open"))
                            .clicked()
                        {
                            actions.push(UiAction::OpenBatch {
                                name: row.name.clone(),
                            });
                        }
                        ui.end_row();
                    }
                });
        });
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.add(egui::TextEdit::singleline(new_batch_name).hint_text("New batch name"));
        if ui.button("Add Batch").clicked() {
            actions.push(UiAction::CreateBatch {
                name: new_batch_name.clone(),
            });
        }
    });

    ui.add_space(8.0);
    if ui.button("Quit").clicked() {
        actions.push(UiAction::Quit);
    }
}

fn render_logs(ui: &mut egui::Ui, history: &[String], actions: &mut Vec<UiAction>) {
    ui.heading("Command log");
    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        if history.is_empty() {
            ui.label("No commands issued yet.");
        }
        for entry in history {
            ui.label(entry);
        }
    });
    ui.add_space(8.0);
    if ui.button("Save").clicked() {
        actions.push(UiAction::Save);
    }
}

pub fn render_batch(ui: &mut egui::Ui, screen: &BatchScreen, actions: &mut Vec<UiAction>) {
    ui.heading(format!("Batch: {}", screen.model.name));
    ui.separator();
    if screen.model.rows.is_empty() {
        ui.label("This batch has no requests yet.");
    } else {
        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("batch_requests_grid")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui| {
                    for header in ["ID", "Method", "URL", "Host"] {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for row in &screen.model.rows {
                        ui.label(&row.id);
                        ui.label(&row.method);
                        ui.label(&row.url);
                        ui.label(&row.host);
                        ui.end_row();
                    }
                });
        });
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Send Batch").clicked() {
            actions.push(UiAction::SendBatch);
        }
        if ui.button("Go Back").clicked() {
            actions.push(UiAction::GoBack);
        }
        if ui.button("Quit").clicked() {
            actions.push(UiAction::Quit);
        }
    });
}

// Current-batch rows get a grey background across every column.
fn cell(ui: &mut egui::Ui, text: &str, current: bool) {
    if current {
        ui.label(egui::RichText::new(text).background_color(egui::Color32::from_gray(110)));
    } else {
        ui.label(text);
    }
}
