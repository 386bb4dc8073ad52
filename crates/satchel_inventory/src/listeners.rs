//! Change notification subscribers
//!
//! Handlers are invoked by the inventory only after a mutation batch has
//! finished touching its item list, so a handler may safely read the
//! inventory again (or try to mutate it through whatever shared handle the
//! caller holds).

use satchel_core::ItemId;

/// Handler for "the inventory changed"
pub type ChangedHandler = Box<dyn Fn() + Send + Sync>;

/// Handler for "this item changed"
pub type ItemModifiedHandler = Box<dyn Fn(ItemId) + Send + Sync>;

/// Listener ID returned on subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Subscriber lists for an inventory
pub struct ChangeListeners {
    changed: Vec<(ListenerId, ChangedHandler)>,
    item_modified: Vec<(ListenerId, ItemModifiedHandler)>,
    next_listener_id: u64,
}

impl ChangeListeners {
    /// Create empty listener lists
    pub fn new() -> Self {
        Self {
            changed: Vec::new(),
            item_modified: Vec::new(),
            next_listener_id: 1,
        }
    }

    fn allocate_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        id
    }

    /// Subscribe to inventory changes
    pub fn on_changed<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.changed.push((id, Box::new(handler)));
        id
    }

    /// Subscribe to single item modifications
    pub fn on_item_modified<F>(&mut self, handler: F) -> ListenerId
    where
        F: Fn(ItemId) + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.item_modified.push((id, Box::new(handler)));
        id
    }

    /// Unsubscribe; returns whether anything was removed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.len();
        self.changed.retain(|(listener, _)| *listener != id);
        self.item_modified.retain(|(listener, _)| *listener != id);
        self.len() != before
    }

    /// Total subscriber count
    pub fn len(&self) -> usize {
        self.changed.len() + self.item_modified.len()
    }

    /// Check if there are no subscribers
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn notify_changed(&self) {
        for (_, handler) in &self.changed {
            handler();
        }
    }

    pub(crate) fn notify_item_modified(&self, item: ItemId) {
        for (_, handler) in &self.item_modified {
            handler(item);
        }
    }
}

impl Default for ChangeListeners {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("changed", &self.changed.len())
            .field("item_modified", &self.item_modified.len())
            .finish()
    }
}
