use crate::button::{ShelfButtonRecord, SourceType};
use crate::error::ShelfError;
use crate::gui::ShelfApp;
use crate::shelf::ShelfId;
use eframe::egui;

/// Window for adding a button to a shelf or editing an existing one.
#[derive(Default)]
pub struct ButtonDialog {
    pub open: bool,
    shelf: Option<ShelfId>,
    /// Label of the button being edited; `None` when adding.
    original: Option<String>,
    label: String,
    annotation: String,
    icon: String,
    overlay: String,
    command: String,
    language: SourceType,
}

impl ButtonDialog {
    pub fn open_add(&mut self, shelf: ShelfId) {
        *self = Self {
            open: true,
            shelf: Some(shelf),
            ..Self::default()
        };
    }

    pub fn open_edit(&mut self, shelf: ShelfId, record: &ShelfButtonRecord) {
        *self = Self {
            open: true,
            shelf: Some(shelf),
            original: Some(record.label.clone()),
            label: record.label.clone(),
            annotation: record.annotation.clone(),
            icon: record.icon.clone(),
            overlay: record.image_overlay_label.clone(),
            command: record.command.clone(),
            language: record.language,
        };
    }

    fn apply(&self, app: &mut ShelfApp) -> Result<(), ShelfError> {
        let Some(shelf) = &self.shelf else {
            return Ok(());
        };
        let session = app.session_mut();
        match &self.original {
            None => {
                let record = ShelfButtonRecord::new(self.label.trim(), &self.command, self.language)
                    .with_annotation(&self.annotation)
                    .with_icon(&self.icon)
                    .with_overlay(&self.overlay);
                session.add_button(shelf, record)
            }
            Some(original) => {
                let label = self.label.trim();
                session.rename_button(shelf, original, label)?;
                session.set_tooltip(shelf, label, &self.annotation)?;
                session.set_icon(shelf, label, &self.icon)?;
                session.set_label_badge(shelf, label, &self.overlay)?;
                session.set_command(shelf, label, &self.command)?;
                session.set_language(shelf, label, self.language)
            }
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut ShelfApp) {
        if !self.open {
            return;
        }
        let title = match (&self.original, &self.shelf) {
            (None, Some(shelf)) => format!("Add button to {shelf}"),
            (Some(label), _) => format!("Edit '{label}'"),
            _ => "Button".into(),
        };
        let mut save = false;
        let mut cancel = false;
        let mut open = self.open;
        egui::Window::new(title)
            .id(egui::Id::new("button_dialog"))
            .open(&mut open)
            .collapsible(false)
            .show(ctx, |ui| {
                egui::Grid::new("button_fields").num_columns(2).show(ui, |ui| {
                    ui.label("Label");
                    ui.text_edit_singleline(&mut self.label);
                    ui.end_row();
                    ui.label("Tooltip");
                    ui.text_edit_singleline(&mut self.annotation);
                    ui.end_row();
                    ui.label("Icon");
                    ui.text_edit_singleline(&mut self.icon);
                    ui.end_row();
                    ui.label("Badge");
                    ui.text_edit_singleline(&mut self.overlay);
                    ui.end_row();
                    ui.label("Language");
                    egui::ComboBox::from_id_source("button_language")
                        .selected_text(self.language.as_str())
                        .show_ui(ui, |ui| {
                            for lang in SourceType::ALL {
                                ui.selectable_value(&mut self.language, lang, lang.as_str());
                            }
                        });
                    ui.end_row();
                });
                ui.label("Command");
                ui.add(
                    egui::TextEdit::multiline(&mut self.command)
                        .code_editor()
                        .desired_rows(6)
                        .desired_width(f32::INFINITY),
                );
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if save {
            match self.apply(app) {
                Ok(()) => {
                    app.refresh_results();
                    open = false;
                }
                Err(e) => app.report(&e),
            }
        }
        self.open = open && !cancel;
    }
}
