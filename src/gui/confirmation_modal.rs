use crate::shelf::ShelfId;
use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResult {
    None,
    Confirmed,
    Cancelled,
}

/// Something the user asked to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Shelf(ShelfId),
    Button { shelf: ShelfId, label: String },
}

impl DeleteTarget {
    pub fn description(&self) -> String {
        match self {
            Self::Shelf(id) => format!("Delete shelf {id} and all of its buttons?"),
            Self::Button { shelf, label } => format!("Delete button '{label}' from {shelf}?"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmationModal {
    target: Option<DeleteTarget>,
}

impl ConfirmationModal {
    pub fn open_for(&mut self, target: DeleteTarget) {
        self.target = Some(target);
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    /// Draw the modal. On confirmation the target is handed back and the
    /// modal closes.
    pub fn ui(&mut self, ctx: &egui::Context) -> (ConfirmationResult, Option<DeleteTarget>) {
        let Some(target) = &self.target else {
            return (ConfirmationResult::None, None);
        };
        let mut result = ConfirmationResult::None;
        let mut open = true;
        egui::Window::new("Confirm delete")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(target.description());
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "The change is written to disk on the next save.",
                );
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        result = ConfirmationResult::Confirmed;
                    }
                    if ui.button("Cancel").clicked() {
                        result = ConfirmationResult::Cancelled;
                    }
                });
            });
        if !open && result == ConfirmationResult::None {
            result = ConfirmationResult::Cancelled;
        }
        match result {
            ConfirmationResult::None => (result, None),
            ConfirmationResult::Confirmed => (result, self.target.take()),
            ConfirmationResult::Cancelled => {
                self.target = None;
                (result, None)
            }
        }
    }
}
