use crate::button::{ShelfButtonRecord, SourceType};
use crate::error::{Result, ShelfError};
use crate::shelf::{validate_name, Direction, Shelf, ShelfId, TaskShelf};

/// All shelves of a running tool: the Common shelf plus the task shelves
/// grouped by tab.
///
/// Task shelves are kept in display order: tabs ordered by their lowest
/// `order` value, shelves inside a tab by `order`, ties kept stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShelfRegistry {
    common: Shelf,
    tasks: Vec<TaskShelf>,
}

/// Borrowed view of one tab and its frames in display order.
#[derive(Debug)]
pub struct TabView<'a> {
    pub name: &'a str,
    pub shelves: Vec<&'a TaskShelf>,
}

impl ShelfRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(common: Shelf, tasks: Vec<TaskShelf>) -> Self {
        let mut reg = Self { common, tasks };
        reg.normalize();
        reg
    }

    pub fn common(&self) -> &Shelf {
        &self.common
    }

    /// Task shelves in display order.
    pub fn task_shelves(&self) -> &[TaskShelf] {
        &self.tasks
    }

    pub fn tabs(&self) -> Vec<TabView<'_>> {
        let mut out: Vec<TabView<'_>> = Vec::new();
        for task in &self.tasks {
            match out.last_mut() {
                Some(view) if view.name == task.tab => view.shelves.push(task),
                _ => out.push(TabView {
                    name: &task.tab,
                    shelves: vec![task],
                }),
            }
        }
        out
    }

    pub fn task(&self, id: &ShelfId) -> Option<&TaskShelf> {
        self.tasks.iter().find(|t| t.is(id))
    }

    pub fn shelf(&self, id: &ShelfId) -> Option<&Shelf> {
        match id {
            ShelfId::Common => Some(&self.common),
            _ => self.task(id).map(|t| &t.shelf),
        }
    }

    pub fn contains(&self, id: &ShelfId) -> bool {
        self.shelf(id).is_some()
    }

    /// Every shelf in discovery order: Common first, then tabs and frames
    /// as displayed.
    pub fn iter_shelves(&self) -> impl Iterator<Item = (ShelfId, &Shelf)> {
        std::iter::once((ShelfId::Common, &self.common))
            .chain(self.tasks.iter().map(|t| (t.id(), &t.shelf)))
    }

    pub fn button_count(&self) -> usize {
        self.iter_shelves().map(|(_, s)| s.len()).sum()
    }

    fn next_order(&self) -> u32 {
        self.tasks
            .iter()
            .map(|t| t.order)
            .max()
            .map(|o| o.saturating_add(1))
            .unwrap_or(0)
    }

    fn task_index(&self, id: &ShelfId) -> Result<usize> {
        if id.is_common() {
            return Err(ShelfError::ImmutableShelf);
        }
        self.tasks
            .iter()
            .position(|t| t.is(id))
            .ok_or_else(|| ShelfError::ShelfNotFound(id.clone()))
    }

    fn shelf_mut(&mut self, id: &ShelfId) -> Result<&mut Shelf> {
        match id {
            ShelfId::Common => Ok(&mut self.common),
            _ => self
                .tasks
                .iter_mut()
                .find(|t| t.is(id))
                .map(|t| &mut t.shelf)
                .ok_or_else(|| ShelfError::ShelfNotFound(id.clone())),
        }
    }

    /// Validate a prospective task identity. `skip` is the shelf being
    /// renamed, which may keep its own file name.
    fn check_identity(&self, id: &ShelfId, skip: Option<usize>) -> Result<()> {
        let ShelfId::Task { tab, frame } = id else {
            return Err(ShelfError::ImmutableShelf);
        };
        validate_name("tab", tab).map_err(ShelfError::InvalidName)?;
        validate_name("frame", frame).map_err(ShelfError::InvalidName)?;
        let file = id.file_name().to_lowercase();
        for (idx, other) in self.tasks.iter().enumerate() {
            if Some(idx) == skip {
                continue;
            }
            if other.is(id) {
                return Err(ShelfError::DuplicateShelf(id.clone()));
            }
            if other.id().file_name().to_lowercase() == file {
                return Err(ShelfError::InvalidName(format!(
                    "{id} would share a file with shelf {}",
                    other.id()
                )));
            }
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.tasks.sort_by_key(|t| t.order);
        let mut tabs: Vec<String> = Vec::new();
        for t in &self.tasks {
            if !tabs.contains(&t.tab) {
                tabs.push(t.tab.clone());
            }
        }
        self.tasks
            .sort_by_key(|t| tabs.iter().position(|name| name == &t.tab));
    }

    /// Create an empty task shelf placed after every existing one.
    pub fn add_shelf(&mut self, tab: &str, frame: &str) -> Result<&TaskShelf> {
        let id = ShelfId::task(tab.trim(), frame.trim());
        self.check_identity(&id, None)?;
        let order = self.next_order();
        self.tasks.push(TaskShelf::new(tab.trim(), frame.trim(), order));
        self.normalize();
        tracing::debug!(shelf = %id, order, "added shelf");
        self.task(&id).ok_or(ShelfError::ShelfNotFound(id.clone()))
    }

    /// Move a task shelf to a new tab/frame identity, keeping its order,
    /// collapse flag and buttons.
    pub fn rename_shelf(&mut self, id: &ShelfId, new_tab: &str, new_frame: &str) -> Result<()> {
        let idx = self.task_index(id)?;
        let new_id = ShelfId::task(new_tab.trim(), new_frame.trim());
        if &new_id == id {
            return Ok(());
        }
        self.check_identity(&new_id, Some(idx))?;
        let task = &mut self.tasks[idx];
        task.tab = new_tab.trim().to_string();
        task.frame = new_frame.trim().to_string();
        self.normalize();
        tracing::debug!(from = %id, to = %new_id, "renamed shelf");
        Ok(())
    }

    pub fn delete_shelf(&mut self, id: &ShelfId) -> Result<TaskShelf> {
        let idx = self.task_index(id)?;
        tracing::debug!(shelf = %id, "deleted shelf");
        Ok(self.tasks.remove(idx))
    }

    /// Swap `order` with the neighbouring shelf of the same tab.
    ///
    /// Returns `false` when the shelf is already first/last in its tab.
    pub fn reorder_shelf(&mut self, id: &ShelfId, direction: Direction) -> Result<bool> {
        let idx = self.task_index(id)?;
        let neighbour = match direction {
            Direction::Up => idx.checked_sub(1),
            Direction::Down => Some(idx + 1).filter(|&n| n < self.tasks.len()),
        };
        let Some(other) = neighbour.filter(|&n| self.tasks[n].tab == self.tasks[idx].tab) else {
            return Ok(false);
        };
        let order = self.tasks[idx].order;
        self.tasks[idx].order = self.tasks[other].order;
        self.tasks[other].order = order;
        self.tasks.swap(idx, other);
        self.normalize();
        tracing::debug!(shelf = %id, ?direction, "reordered shelf");
        Ok(true)
    }

    pub fn set_collapsed(&mut self, id: &ShelfId, collapsed: bool) -> Result<()> {
        let idx = self.task_index(id)?;
        self.tasks[idx].collapsed = collapsed;
        Ok(())
    }

    pub fn add_button(&mut self, id: &ShelfId, record: ShelfButtonRecord) -> Result<()> {
        if record.label.trim().is_empty() {
            return Err(ShelfError::InvalidName("button label must not be empty".into()));
        }
        let shelf = self.shelf_mut(id)?;
        if shelf.contains(&record.label) {
            return Err(ShelfError::DuplicateLabel {
                shelf: id.clone(),
                label: record.label,
            });
        }
        tracing::debug!(shelf = %id, label = %record.label, "added button");
        shelf.push(record);
        Ok(())
    }

    fn button_index(&mut self, id: &ShelfId, label: &str) -> Result<(&mut Shelf, usize)> {
        let shelf = self.shelf_mut(id)?;
        let idx = shelf
            .position(label)
            .ok_or_else(|| ShelfError::ButtonNotFound {
                shelf: id.clone(),
                label: label.to_string(),
            })?;
        Ok((shelf, idx))
    }

    pub fn delete_button(&mut self, id: &ShelfId, label: &str) -> Result<ShelfButtonRecord> {
        let (shelf, idx) = self.button_index(id, label)?;
        tracing::debug!(shelf = %id, label, "deleted button");
        Ok(shelf.remove_at(idx))
    }

    pub fn rename_button(&mut self, id: &ShelfId, old_label: &str, new_label: &str) -> Result<()> {
        if new_label.trim().is_empty() {
            return Err(ShelfError::InvalidName("button label must not be empty".into()));
        }
        let (shelf, idx) = self.button_index(id, old_label)?;
        if old_label == new_label {
            return Ok(());
        }
        if shelf.contains(new_label) {
            return Err(ShelfError::DuplicateLabel {
                shelf: id.clone(),
                label: new_label.to_string(),
            });
        }
        shelf.get_mut_at(idx).label = new_label.to_string();
        tracing::debug!(shelf = %id, from = old_label, to = new_label, "renamed button");
        Ok(())
    }

    fn update_button(
        &mut self,
        id: &ShelfId,
        label: &str,
        f: impl FnOnce(&mut ShelfButtonRecord),
    ) -> Result<()> {
        let (shelf, idx) = self.button_index(id, label)?;
        f(shelf.get_mut_at(idx));
        Ok(())
    }

    pub fn set_icon(&mut self, id: &ShelfId, label: &str, icon: &str) -> Result<()> {
        self.update_button(id, label, |b| b.icon = icon.to_string())
    }

    pub fn set_label_badge(&mut self, id: &ShelfId, label: &str, badge: &str) -> Result<()> {
        self.update_button(id, label, |b| b.image_overlay_label = badge.to_string())
    }

    pub fn set_tooltip(&mut self, id: &ShelfId, label: &str, tooltip: &str) -> Result<()> {
        self.update_button(id, label, |b| b.annotation = tooltip.to_string())
    }

    pub fn set_command(&mut self, id: &ShelfId, label: &str, command: &str) -> Result<()> {
        self.update_button(id, label, |b| b.command = command.to_string())
    }

    pub fn set_language(&mut self, id: &ShelfId, label: &str, language: SourceType) -> Result<()> {
        self.update_button(id, label, |b| b.language = language)
    }

    /// Move a button one slot within its shelf. Returns `false` at the ends.
    pub fn move_button(&mut self, id: &ShelfId, label: &str, direction: Direction) -> Result<bool> {
        let (shelf, idx) = self.button_index(id, label)?;
        let target = match direction {
            Direction::Up => idx.checked_sub(1),
            Direction::Down => Some(idx + 1).filter(|&n| n < shelf.len()),
        };
        match target {
            Some(t) => {
                shelf.swap(idx, t);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(label: &str) -> ShelfButtonRecord {
        ShelfButtonRecord::new(label, format!("{label}()"), SourceType::Python)
    }

    fn orders(reg: &ShelfRegistry, tab: &str) -> Vec<(String, u32)> {
        reg.task_shelves()
            .iter()
            .filter(|t| t.tab() == tab)
            .map(|t| (t.frame().to_string(), t.order()))
            .collect()
    }

    #[test]
    fn add_shelf_assigns_next_order() {
        let mut reg = ShelfRegistry::new();
        assert_eq!(reg.add_shelf("Rigging", "Build").unwrap().order(), 0);
        assert_eq!(reg.add_shelf("Rigging", "Skin").unwrap().order(), 1);
        assert_eq!(reg.add_shelf("Anim", "Keys").unwrap().order(), 2);
    }

    #[test]
    fn duplicate_shelf_is_rejected() {
        let mut reg = ShelfRegistry::new();
        reg.add_shelf("Animation", "Misc").unwrap();
        let err = reg.add_shelf("Animation", "Misc").unwrap_err();
        assert!(matches!(err, ShelfError::DuplicateShelf(_)));
        assert_eq!(reg.task_shelves().len(), 1);
    }

    #[test]
    fn colliding_file_names_are_rejected() {
        let mut reg = ShelfRegistry::new();
        reg.add_shelf("a_b", "c").unwrap();
        let err = reg.add_shelf("a", "b_c").unwrap_err();
        assert!(matches!(err, ShelfError::InvalidName(_)));
        let err = reg.add_shelf("A_B", "C").unwrap_err();
        assert!(matches!(err, ShelfError::InvalidName(_)));
    }

    #[test]
    fn bad_names_are_rejected() {
        let mut reg = ShelfRegistry::new();
        assert!(matches!(
            reg.add_shelf(" ", "x"),
            Err(ShelfError::InvalidName(_))
        ));
        assert!(matches!(
            reg.add_shelf("a/b", "x"),
            Err(ShelfError::InvalidName(_))
        ));
        assert!(reg.task_shelves().is_empty());
    }

    #[test]
    fn common_shelf_is_immutable() {
        let mut reg = ShelfRegistry::new();
        reg.add_button(&ShelfId::Common, button("Snap")).unwrap();
        let before = reg.clone();
        assert!(matches!(
            reg.delete_shelf(&ShelfId::Common),
            Err(ShelfError::ImmutableShelf)
        ));
        assert!(matches!(
            reg.rename_shelf(&ShelfId::Common, "X", "Y"),
            Err(ShelfError::ImmutableShelf)
        ));
        assert!(matches!(
            reg.reorder_shelf(&ShelfId::Common, Direction::Up),
            Err(ShelfError::ImmutableShelf)
        ));
        assert_eq!(reg, before);
    }

    #[test]
    fn reorder_swaps_orders_and_back() {
        let mut reg = ShelfRegistry::new();
        for frame in ["A", "B", "C"] {
            reg.add_shelf("Tab", frame).unwrap();
        }
        let b = ShelfId::task("Tab", "B");
        assert!(reg.reorder_shelf(&b, Direction::Up).unwrap());
        assert_eq!(
            orders(&reg, "Tab"),
            vec![("B".into(), 0), ("A".into(), 1), ("C".into(), 2)]
        );
        assert!(reg.reorder_shelf(&b, Direction::Down).unwrap());
        assert_eq!(
            orders(&reg, "Tab"),
            vec![("A".into(), 0), ("B".into(), 1), ("C".into(), 2)]
        );
    }

    #[test]
    fn reorder_stops_at_tab_boundary() {
        let mut reg = ShelfRegistry::new();
        reg.add_shelf("One", "A").unwrap();
        reg.add_shelf("Two", "B").unwrap();
        let before = reg.clone();
        assert!(!reg.reorder_shelf(&ShelfId::task("Two", "B"), Direction::Up).unwrap());
        assert!(!reg.reorder_shelf(&ShelfId::task("One", "A"), Direction::Down).unwrap());
        assert_eq!(reg, before);
    }

    #[test]
    fn tabs_group_by_lowest_order() {
        let tasks = vec![
            TaskShelf::new("Anim", "Keys", 3),
            TaskShelf::new("Rig", "Build", 0),
            TaskShelf::new("Anim", "Curves", 1),
            TaskShelf::new("Rig", "Skin", 2),
        ];
        let reg = ShelfRegistry::from_parts(Shelf::new(), tasks);
        let tabs = reg.tabs();
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].name, "Rig");
        let frames: Vec<_> = tabs[1].shelves.iter().map(|t| t.frame()).collect();
        assert_eq!(frames, vec!["Curves", "Keys"]);
    }

    #[test]
    fn rename_shelf_keeps_buttons_and_rejects_collisions() {
        let mut reg = ShelfRegistry::new();
        reg.add_shelf("Rig", "Build").unwrap();
        reg.add_shelf("Rig", "Skin").unwrap();
        let build = ShelfId::task("Rig", "Build");
        reg.add_button(&build, button("Ctrl")).unwrap();

        let err = reg.rename_shelf(&build, "Rig", "Skin").unwrap_err();
        assert!(matches!(err, ShelfError::DuplicateShelf(_)));

        reg.rename_shelf(&build, "Anim", "Build").unwrap();
        let moved = ShelfId::task("Anim", "Build");
        assert!(reg.shelf(&moved).unwrap().contains("Ctrl"));
        assert!(!reg.contains(&build));
    }

    #[test]
    fn button_labels_stay_unique() {
        let mut reg = ShelfRegistry::new();
        let common = ShelfId::Common;
        reg.add_button(&common, button("Bake")).unwrap();
        reg.add_button(&common, button("Snap")).unwrap();
        assert!(matches!(
            reg.add_button(&common, button("Bake")),
            Err(ShelfError::DuplicateLabel { .. })
        ));
        assert!(matches!(
            reg.rename_button(&common, "Snap", "Bake"),
            Err(ShelfError::DuplicateLabel { .. })
        ));
        assert_eq!(reg.common().len(), 2);
    }

    #[test]
    fn missing_button_is_not_found() {
        let mut reg = ShelfRegistry::new();
        let common = ShelfId::Common;
        assert!(matches!(
            reg.set_icon(&common, "Nope", "x.png"),
            Err(ShelfError::ButtonNotFound { .. })
        ));
        assert!(matches!(
            reg.delete_button(&ShelfId::task("No", "Shelf"), "Nope"),
            Err(ShelfError::ShelfNotFound(_))
        ));
    }

    #[test]
    fn setters_update_fields() {
        let mut reg = ShelfRegistry::new();
        let common = ShelfId::Common;
        reg.add_button(&common, button("Bake")).unwrap();
        reg.set_icon(&common, "Bake", "bake.png").unwrap();
        reg.set_label_badge(&common, "Bake", "BK").unwrap();
        reg.set_tooltip(&common, "Bake", "Bake keys").unwrap();
        reg.set_command(&common, "Bake", "bakeResults;").unwrap();
        reg.set_language(&common, "Bake", SourceType::Mel).unwrap();
        let b = reg.common().get("Bake").unwrap();
        assert_eq!(b.icon, "bake.png");
        assert_eq!(b.image_overlay_label, "BK");
        assert_eq!(b.annotation, "Bake keys");
        assert_eq!(b.command, "bakeResults;");
        assert_eq!(b.language, SourceType::Mel);
    }

    #[test]
    fn move_button_within_shelf() {
        let mut reg = ShelfRegistry::new();
        let common = ShelfId::Common;
        for l in ["A", "B", "C"] {
            reg.add_button(&common, button(l)).unwrap();
        }
        assert!(reg.move_button(&common, "C", Direction::Up).unwrap());
        assert!(!reg.move_button(&common, "A", Direction::Up).unwrap());
        let labels: Vec<_> = reg.common().buttons().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "C", "B"]);
    }
}
