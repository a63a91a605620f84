// SPDX-License-Identifier: AGPL-3.0
// Artshelf Core - Multi-select for bulk removal

use std::collections::HashSet;

/// Identifiers checked for batch removal
///
/// Session scoped: cleared after a successful removal or when the owning
/// screen loses focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    selected: HashSet<String>,
    /// Selection replaced by the last select-all, restored by the next
    /// deselect-all so the toggle is its own inverse.
    before_select_all: Option<HashSet<String>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one identifier. Never affects other entries.
    pub fn toggle(&mut self, id: &str) {
        self.before_select_all = None;
        if !self.selected.remove(id) {
            self.selected.insert(id.to_string());
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    /// True when every visible identifier is selected
    pub fn all_selected<'a>(&self, visible: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in visible {
            any = true;
            if !self.selected.contains(id) {
                return false;
            }
        }
        any
    }

    /// Select every visible item, or undo that if all are already selected
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a str>) {
        let visible: Vec<&str> = visible.into_iter().collect();

        if self.all_selected(visible.iter().copied()) {
            match self.before_select_all.take() {
                Some(previous) => self.selected = previous,
                None => {
                    for id in &visible {
                        self.selected.remove(*id);
                    }
                }
            }
        } else {
            self.before_select_all = Some(self.selected.clone());
            self.selected.extend(visible.iter().map(|id| id.to_string()));
        }
    }

    /// Drop selections whose item is no longer listed
    pub fn retain_present<'a>(&mut self, present: impl IntoIterator<Item = &'a str>) {
        let present: HashSet<&str> = present.into_iter().collect();
        self.selected.retain(|id| present.contains(id.as_str()));
        if let Some(previous) = self.before_select_all.as_mut() {
            previous.retain(|id| present.contains(id.as_str()));
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.before_select_all = None;
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.selected
    }
}
