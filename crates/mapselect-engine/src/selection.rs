// Imports
use crate::feature::SelectedItem;
use crate::widgetflags::WidgetFlags;

/// The selection set collaborator of the engine.
///
/// The engine never stores the selection itself, it forwards the outcome of every
/// query here.
pub trait SelectionManager {
    /// Add a single item, or highlight it when an item with the same identity is
    /// already selected.
    fn add_or_highlight(&mut self, item: SelectedItem);
    /// Add a batch of items, deduplicating against the current selection.
    fn add_many(&mut self, items: Vec<SelectedItem>);
    /// Remove all items with the identities of the given items.
    fn remove_many(&mut self, items: &[SelectedItem]);
    /// Clear the entire selection.
    fn clear(&mut self);
}

/// Apply a query result to the selection, following the arity policy.
///
/// Additive queries dispatch on the number of items: none is a no-op, a single item
/// goes through [SelectionManager::add_or_highlight], several through
/// [SelectionManager::add_many]. Subtractive queries go through
/// [SelectionManager::remove_many], except for the empty case which is a no-op.
pub fn apply_query_result(
    mut items: Vec<SelectedItem>,
    remove: bool,
    selection: &mut dyn SelectionManager,
) -> WidgetFlags {
    let mut widget_flags = WidgetFlags::default();

    if remove {
        if items.is_empty() {
            return widget_flags;
        }
        selection.remove_many(&items);
    } else {
        match items.len() {
            0 => return widget_flags,
            1 => selection.add_or_highlight(items.remove(0)),
            _ => selection.add_many(items),
        }
    }

    widget_flags.selection_modified = true;
    widget_flags.redraw = true;
    widget_flags
}

/// An in-memory ordered selection set.
#[derive(Debug, Default)]
pub struct MemorySelection {
    items: Vec<SelectedItem>,
    highlighted: Option<(String, String)>,
}

impl MemorySelection {
    pub fn items(&self) -> &[SelectedItem] {
        &self.items
    }

    pub fn highlighted(&self) -> Option<&SelectedItem> {
        let (layer, id) = self.highlighted.as_ref()?;
        self.items
            .iter()
            .find(|item| item.identity() == (layer.as_str(), id.as_str()))
    }

    fn contains(&self, item: &SelectedItem) -> bool {
        self.items.iter().any(|held| held.identity() == item.identity())
    }
}

impl SelectionManager for MemorySelection {
    fn add_or_highlight(&mut self, item: SelectedItem) {
        if self.contains(&item) {
            let (layer, id) = item.identity();
            self.highlighted = Some((layer.to_string(), id.to_string()));
        } else {
            self.items.push(item);
        }
    }

    fn add_many(&mut self, items: Vec<SelectedItem>) {
        for item in items {
            if !self.contains(&item) {
                self.items.push(item);
            }
        }
    }

    fn remove_many(&mut self, items: &[SelectedItem]) {
        self.items
            .retain(|held| !items.iter().any(|item| item.identity() == held.identity()));
        if let Some((layer, id)) = self.highlighted.as_ref() {
            let still_held = self
                .items
                .iter()
                .any(|item| item.identity() == (layer.as_str(), id.as_str()));
            if !still_held {
                self.highlighted = None;
            }
        }
    }

    fn clear(&mut self) {
        self.items.clear();
        self.highlighted = None;
    }
}
