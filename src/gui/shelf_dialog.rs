use crate::gui::ShelfApp;
use crate::shelf::ShelfId;
use eframe::egui;

/// Window asking for a tab and frame name, used to create or rename a
/// task shelf.
#[derive(Default)]
pub struct ShelfDialog {
    pub open: bool,
    /// Shelf being renamed; `None` when creating.
    target: Option<ShelfId>,
    tab: String,
    frame: String,
}

impl ShelfDialog {
    pub fn open_add(&mut self, tab: Option<&str>) {
        *self = Self {
            open: true,
            tab: tab.unwrap_or_default().to_string(),
            ..Self::default()
        };
    }

    pub fn open_rename(&mut self, id: &ShelfId) {
        *self = Self {
            open: true,
            target: Some(id.clone()),
            tab: id.tab().unwrap_or_default().to_string(),
            frame: id.frame().unwrap_or_default().to_string(),
        };
    }

    pub fn ui(&mut self, ctx: &egui::Context, app: &mut ShelfApp) {
        if !self.open {
            return;
        }
        let title = match &self.target {
            Some(id) => format!("Rename {id}"),
            None => "New shelf".to_string(),
        };
        let mut submit = false;
        let mut cancel = false;
        let mut open = self.open;
        egui::Window::new(title)
            .id(egui::Id::new("shelf_dialog"))
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Tab");
                    ui.text_edit_singleline(&mut self.tab);
                });
                ui.horizontal(|ui| {
                    ui.label("Frame");
                    let resp = ui.text_edit_singleline(&mut self.frame);
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        submit = true;
                    }
                });
                ui.horizontal(|ui| {
                    let label = if self.target.is_some() { "Rename" } else { "Create" };
                    if ui.button(label).clicked() {
                        submit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });

        if submit {
            let res = match &self.target {
                Some(id) => app.session_mut().rename_shelf(id, &self.tab, &self.frame),
                None => app.session_mut().add_shelf(&self.tab, &self.frame),
            };
            match res {
                Ok(id) => {
                    app.select_tab(id.tab());
                    app.refresh_results();
                    open = false;
                }
                Err(e) => app.report(&e),
            }
        }
        self.open = open && !cancel;
    }
}
