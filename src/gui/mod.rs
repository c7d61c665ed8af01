mod button_dialog;
mod confirmation_modal;
mod shelf_dialog;

pub use button_dialog::ButtonDialog;
pub use confirmation_modal::{ConfirmationModal, ConfirmationResult, DeleteTarget};
pub use shelf_dialog::ShelfDialog;

use crate::button::ShelfButtonRecord;
use crate::error::ShelfError;
use crate::executor::FailureLog;
use crate::registry::ShelfRegistry;
use crate::search::SearchHit;
use crate::session::ToolSession;
use crate::settings::Settings;
use crate::shelf::{Direction, Shelf, ShelfId};
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

const SEARCH_ID: &str = "shelf_search";

/// Something the user clicked while the shelves were drawn. Applied after
/// drawing so the registry is never borrowed while it is mutated.
#[derive(Debug, Clone)]
enum UiAction {
    Run { shelf: ShelfId, label: String },
    EditButton { shelf: ShelfId, label: String },
    AddButton(ShelfId),
    DuplicateButton { shelf: ShelfId, label: String },
    MoveButton { shelf: ShelfId, label: String, direction: Direction },
    DeleteButton { shelf: ShelfId, label: String },
    CopyCommand(String),
    SetCollapsed(ShelfId, bool),
    RenameShelf(ShelfId),
    MoveShelf(ShelfId, Direction),
    DeleteShelf(ShelfId),
    SearchFor(String),
}

fn button_text(rec: &ShelfButtonRecord) -> String {
    if rec.image_overlay_label.is_empty() {
        rec.label.clone()
    } else {
        format!("[{}] {}", rec.image_overlay_label, rec.label)
    }
}

fn hover_text(rec: &ShelfButtonRecord) -> String {
    let mut text = if rec.annotation.is_empty() {
        rec.label.clone()
    } else {
        rec.annotation.clone()
    };
    if !rec.icon.is_empty() {
        text.push_str(&format!("\nicon: {}", rec.icon));
    }
    text.push_str(&format!("\n{}", rec.language));
    text
}

fn draw_shelf(ui: &mut egui::Ui, id: &ShelfId, shelf: &Shelf, actions: &mut Vec<UiAction>) {
    ui.horizontal_wrapped(|ui| {
        for rec in shelf.buttons() {
            let resp = ui.button(button_text(rec)).on_hover_text(hover_text(rec));
            if resp.clicked() {
                actions.push(UiAction::Run {
                    shelf: id.clone(),
                    label: rec.label.clone(),
                });
            }
            resp.context_menu(|ui| {
                let label = rec.label.clone();
                let chosen = if ui.button("Edit...").clicked() {
                    Some(UiAction::EditButton {
                        shelf: id.clone(),
                        label,
                    })
                } else if ui.button("Duplicate").clicked() {
                    Some(UiAction::DuplicateButton {
                        shelf: id.clone(),
                        label,
                    })
                } else if ui.button("Move left").clicked() {
                    Some(UiAction::MoveButton {
                        shelf: id.clone(),
                        label,
                        direction: Direction::Up,
                    })
                } else if ui.button("Move right").clicked() {
                    Some(UiAction::MoveButton {
                        shelf: id.clone(),
                        label,
                        direction: Direction::Down,
                    })
                } else if ui.button("Copy command").clicked() {
                    Some(UiAction::CopyCommand(rec.command.clone()))
                } else {
                    ui.separator();
                    ui.button("Delete").clicked().then(|| UiAction::DeleteButton {
                        shelf: id.clone(),
                        label,
                    })
                };
                if let Some(action) = chosen {
                    actions.push(action);
                    ui.close_menu();
                }
            });
        }
        if ui.small_button("+").on_hover_text("Add button").clicked() {
            actions.push(UiAction::AddButton(id.clone()));
        }
    });
}

fn draw_tabs(
    ui: &mut egui::Ui,
    registry: &ShelfRegistry,
    selected_tab: &mut Option<String>,
    actions: &mut Vec<UiAction>,
) {
    egui::CollapsingHeader::new("Common")
        .id_source("common_shelf")
        .default_open(true)
        .show(ui, |ui| draw_shelf(ui, &ShelfId::Common, registry.common(), actions));
    ui.separator();

    let tabs = registry.tabs();
    if tabs.is_empty() {
        ui.label("No task shelves yet. Use \"New shelf\" to create one.");
        return;
    }
    let selected_exists = selected_tab
        .as_deref()
        .map(|name| tabs.iter().any(|t| t.name == name))
        .unwrap_or(false);
    if !selected_exists {
        *selected_tab = Some(tabs[0].name.to_string());
    }

    ui.horizontal_wrapped(|ui| {
        for tab in &tabs {
            let selected = selected_tab.as_deref() == Some(tab.name);
            if ui.selectable_label(selected, tab.name).clicked() {
                *selected_tab = Some(tab.name.to_string());
            }
        }
    });
    ui.separator();

    let Some(tab) = tabs
        .iter()
        .find(|t| selected_tab.as_deref() == Some(t.name))
    else {
        return;
    };
    egui::ScrollArea::vertical().show(ui, |ui| {
        for task in &tab.shelves {
            let id = task.id();
            let collapsed = task.collapsed();
            let resp = egui::CollapsingHeader::new(task.frame())
                .id_source(("task_shelf", id.to_string()))
                .open(Some(!collapsed))
                .show(ui, |ui| draw_shelf(ui, &id, task.shelf(), actions));
            if resp.header_response.clicked() {
                actions.push(UiAction::SetCollapsed(id.clone(), !collapsed));
            }
            resp.header_response.context_menu(|ui| {
                let chosen = if ui.button("Add button...").clicked() {
                    Some(UiAction::AddButton(id.clone()))
                } else if ui.button("Rename shelf...").clicked() {
                    Some(UiAction::RenameShelf(id.clone()))
                } else if ui.button("Move up").clicked() {
                    Some(UiAction::MoveShelf(id.clone(), Direction::Up))
                } else if ui.button("Move down").clicked() {
                    Some(UiAction::MoveShelf(id.clone(), Direction::Down))
                } else {
                    ui.separator();
                    ui.button("Delete shelf")
                        .clicked()
                        .then(|| UiAction::DeleteShelf(id.clone()))
                };
                if let Some(action) = chosen {
                    actions.push(action);
                    ui.close_menu();
                }
            });
        }
    });
}

fn draw_results(ui: &mut egui::Ui, results: &[SearchHit], actions: &mut Vec<UiAction>) {
    if results.is_empty() {
        ui.label("No matching tools");
        return;
    }
    egui::ScrollArea::vertical().show(ui, |ui| {
        for hit in results {
            ui.horizontal(|ui| {
                let resp = ui
                    .button(button_text(&hit.record))
                    .on_hover_text(hover_text(&hit.record));
                if resp.clicked() {
                    actions.push(UiAction::Run {
                        shelf: hit.shelf.clone(),
                        label: hit.record.label.clone(),
                    });
                }
                ui.weak(hit.shelf.to_string());
                if !hit.record.annotation.is_empty() {
                    ui.label(&hit.record.annotation);
                }
            });
        }
    });
}

/// Main tool window: search bar, Common shelf and tabbed task shelves.
pub struct ShelfApp {
    session: ToolSession,
    query: String,
    results: Vec<SearchHit>,
    selected_tab: Option<String>,
    toasts: Toasts,
    enable_toasts: bool,
    toast_duration: f32,
    confirm_delete: bool,
    failures: FailureLog,
    save_shortcut: Option<egui::KeyboardShortcut>,
    focus_shortcut: Option<egui::KeyboardShortcut>,
    focus_search: bool,
    button_dialog: ButtonDialog,
    shelf_dialog: ShelfDialog,
    confirm: ConfirmationModal,
}

impl ShelfApp {
    pub fn new(session: ToolSession, settings: &Settings, failures: FailureLog) -> Self {
        let mut app = Self {
            session,
            query: String::new(),
            results: Vec::new(),
            selected_tab: None,
            toasts: Toasts::new().anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0]),
            enable_toasts: settings.enable_toasts,
            toast_duration: settings.toast_duration,
            confirm_delete: settings.confirm_delete,
            failures,
            save_shortcut: settings.save_hotkey().map(|s| s.to_egui()),
            focus_shortcut: settings.focus_search_hotkey().map(|s| s.to_egui()),
            focus_search: true,
            button_dialog: ButtonDialog::default(),
            shelf_dialog: ShelfDialog::default(),
            confirm: ConfirmationModal::default(),
        };
        let skipped: Vec<String> = app
            .session
            .skipped_files()
            .iter()
            .map(|s| format!("Skipped {}: {}", s.path.display(), s.reason))
            .collect();
        for msg in skipped {
            app.toast(ToastKind::Warning, msg);
        }
        app
    }

    pub fn session(&self) -> &ToolSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ToolSession {
        &mut self.session
    }

    pub fn select_tab(&mut self, tab: Option<&str>) {
        if let Some(tab) = tab {
            self.selected_tab = Some(tab.to_string());
        }
    }

    fn toast(&mut self, kind: ToastKind, text: String) {
        if !self.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default().duration_in_seconds(self.toast_duration as f64),
        });
    }

    /// Show an editing error next to the shelves without blocking.
    pub fn report(&mut self, err: &ShelfError) {
        tracing::warn!("{err}");
        self.toast(ToastKind::Error, err.user_message());
    }

    /// Re-run the live search after the registry changed.
    pub fn refresh_results(&mut self) {
        self.results = self.session.preview(&self.query);
    }

    fn clear_search(&mut self) {
        self.query.clear();
        self.results.clear();
    }

    fn save(&mut self) -> bool {
        match self.session.save() {
            Ok(()) => {
                self.toast(ToastKind::Success, "Shelves saved".into());
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    fn copy_to_clipboard(&mut self, text: String) {
        let res = arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text));
        match res {
            Ok(()) => self.toast(ToastKind::Info, "Command copied".into()),
            Err(e) => self.toast(ToastKind::Error, format!("Clipboard unavailable: {e}")),
        }
    }

    fn delete(&mut self, target: DeleteTarget) {
        let res = match &target {
            DeleteTarget::Shelf(id) => self.session.delete_shelf(id),
            DeleteTarget::Button { shelf, label } => self.session.delete_button(shelf, label),
        };
        match res {
            Ok(()) => self.refresh_results(),
            Err(e) => self.report(&e),
        }
    }

    fn request_delete(&mut self, target: DeleteTarget) {
        if self.confirm_delete {
            self.confirm.open_for(target);
        } else {
            self.delete(target);
        }
    }

    fn apply(&mut self, action: UiAction) {
        let res: Result<(), ShelfError> = match action {
            UiAction::Run { shelf, label } => self.session.run_button(&shelf, &label),
            UiAction::EditButton { shelf, label } => {
                match self.session.registry().shelf(&shelf).and_then(|s| s.get(&label)) {
                    Some(rec) => {
                        let rec = rec.clone();
                        self.button_dialog.open_edit(shelf, &rec);
                        Ok(())
                    }
                    None => Err(ShelfError::ButtonNotFound { shelf, label }),
                }
            }
            UiAction::AddButton(shelf) => {
                self.button_dialog.open_add(shelf);
                Ok(())
            }
            UiAction::DuplicateButton { shelf, label } => {
                self.session.duplicate_button(&shelf, &label).map(|_| ())
            }
            UiAction::MoveButton {
                shelf,
                label,
                direction,
            } => self.session.move_button(&shelf, &label, direction).map(|_| ()),
            UiAction::DeleteButton { shelf, label } => {
                self.request_delete(DeleteTarget::Button { shelf, label });
                Ok(())
            }
            UiAction::CopyCommand(cmd) => {
                self.copy_to_clipboard(cmd);
                Ok(())
            }
            UiAction::SetCollapsed(id, collapsed) => self.session.set_collapsed(&id, collapsed),
            UiAction::RenameShelf(id) => {
                self.shelf_dialog.open_rename(&id);
                Ok(())
            }
            UiAction::MoveShelf(id, direction) => {
                self.session.reorder_shelf(&id, direction).map(|_| ())
            }
            UiAction::DeleteShelf(id) => {
                self.request_delete(DeleteTarget::Shelf(id));
                Ok(())
            }
            UiAction::SearchFor(query) => {
                self.query = query;
                self.results = self.session.search(&self.query);
                Ok(())
            }
        };
        match res {
            Ok(()) => self.refresh_results(),
            Err(e) => self.report(&e),
        }
    }

    fn drain_failures(&mut self) {
        let failures: Vec<String> = self.failures.borrow_mut().drain(..).collect();
        for msg in failures {
            self.toast(ToastKind::Error, msg);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if let Some(sc) = self.save_shortcut {
            if ctx.input_mut(|i| i.consume_shortcut(&sc)) {
                self.save();
            }
        }
        if let Some(sc) = self.focus_shortcut {
            if ctx.input_mut(|i| i.consume_shortcut(&sc)) {
                self.focus_search = true;
            }
        }
    }

    /// Save pending edits when the window is closed; keep the window open
    /// if that fails.
    fn handle_close(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) || !self.session.is_dirty() {
            return;
        }
        if let Err(e) = self.session.save() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.report(&e);
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut self.query)
                    .id(egui::Id::new(SEARCH_ID))
                    .hint_text("Search tools")
                    .desired_width(240.0),
            );
            if self.focus_search {
                input.request_focus();
                self.focus_search = false;
            }
            if input.changed() {
                self.results = self.session.preview(&self.query);
            }
            if input.lost_focus() {
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let query = self.query.clone();
                    if self.session.run_first_result(&query).is_none() && !query.trim().is_empty() {
                        self.toast(ToastKind::Info, format!("Nothing matches '{query}'"));
                    }
                    self.results = self.session.preview(&self.query);
                    self.focus_search = true;
                } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    self.clear_search();
                }
            }
            if !self.session.history().is_empty() {
                egui::ComboBox::from_id_source("search_history")
                    .selected_text("Recent")
                    .show_ui(ui, |ui| {
                        for q in self.session.history().queries() {
                            if ui.selectable_label(false, q).clicked() {
                                actions.push(UiAction::SearchFor(q.to_string()));
                            }
                        }
                    });
            }

            let save_label = if self.session.is_dirty() { "Save*" } else { "Save" };
            if ui.button(save_label).clicked() {
                self.save();
            }
            if ui.button("New shelf").clicked() {
                self.shelf_dialog.open_add(self.selected_tab.as_deref());
            }
            if ui.button("Open folder").clicked() {
                let dir = self.session.store().dir().to_path_buf();
                if let Err(e) = open::that(&dir) {
                    self.toast(
                        ToastKind::Error,
                        format!("Failed to open {}: {e}", dir.display()),
                    );
                }
            }
        });
    }

    fn most_used(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let top = self.session.usage().most_used(5);
        if top.is_empty() {
            return;
        }
        ui.horizontal_wrapped(|ui| {
            ui.weak("Most used:");
            for (key, count) in top {
                if ui
                    .small_button(&key.label)
                    .on_hover_text(format!("{} ({count}x)", key.shelf))
                    .clicked()
                {
                    actions.push(UiAction::Run {
                        shelf: key.shelf.clone(),
                        label: key.label.clone(),
                    });
                }
            }
        });
        ui.separator();
    }
}

impl eframe::App for ShelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_failures();
        self.handle_shortcuts(ctx);
        self.handle_close(ctx);

        let mut actions = Vec::new();
        egui::TopBottomPanel::top("search_bar").show(ctx, |ui| {
            self.top_bar(ui, &mut actions);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.query.trim().is_empty() {
                self.most_used(ui, &mut actions);
                draw_tabs(
                    ui,
                    self.session.registry(),
                    &mut self.selected_tab,
                    &mut actions,
                );
            } else {
                draw_results(ui, &self.results, &mut actions);
            }
        });
        for action in actions {
            self.apply(action);
        }

        let mut dlg = std::mem::take(&mut self.button_dialog);
        dlg.ui(ctx, self);
        self.button_dialog = dlg;

        let mut shelf_dlg = std::mem::take(&mut self.shelf_dialog);
        shelf_dlg.ui(ctx, self);
        self.shelf_dialog = shelf_dlg;

        if let (ConfirmationResult::Confirmed, Some(target)) = self.confirm.ui(ctx) {
            self.delete(target);
        }

        self.toasts.show(ctx);
    }
}

/// Window shown instead of the tool when the shelf directory is unusable.
pub struct StartupErrorApp {
    message: String,
}

impl StartupErrorApp {
    pub fn new(err: &ShelfError) -> Self {
        Self {
            message: err.user_message(),
        }
    }
}

impl eframe::App for StartupErrorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Tak Tools could not start");
            ui.add_space(8.0);
            ui.colored_label(egui::Color32::RED, &self.message);
            ui.add_space(8.0);
            ui.label("Check the shelf_dir entry in settings.json and restart the tool.");
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }
}
