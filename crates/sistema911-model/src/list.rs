//! Local mirrors of server-side collections
//!
//! The client never refetches after a mutation. Each successful call is
//! turned into a [`ListEvent`] and applied to the cached list, which keeps
//! insertion order.

/// Entities identified by a server-assigned id
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Entities carrying a "default" flag
pub trait Primary {
    fn is_primary(&self) -> bool;
    fn set_primary(&mut self, primary: bool);
}

/// Outcome of a successful server call on a collection
#[derive(Clone, Debug, PartialEq)]
pub enum ListEvent<T> {
    /// Full list returned by a fetch
    Loaded(Vec<T>),
    /// Appended
    Created(T),
    /// Replaces the item with the same key
    Updated(T),
    /// Removes the item with this key
    Deleted(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ListState<T> {
    items: Vec<T>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> ListState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: ListEvent<T>) {
        match event {
            ListEvent::Loaded(items) => self.items = items,
            ListEvent::Created(item) => self.items.push(item),
            ListEvent::Updated(item) => {
                // An update for an item we never saw is ignored
                if let Some(slot) = self.items.iter_mut().find(|i| i.key() == item.key()) {
                    *slot = item;
                }
            }
            ListEvent::Deleted(id) => self.items.retain(|i| i.key() != id),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.key() == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T: Keyed + Primary> ListState<T> {
    /// Flag `id` as primary and clear the flag on every other item.
    /// Make `id` the only primary item. Unknown ids leave the list as is.
    pub fn mark_primary(&mut self, id: &str) {
        if self.get(id).is_none() {
            return;
        }
        for item in &mut self.items {
            let primary = item.key() == id;
            item.set_primary(primary);
        }
    }

    pub fn primary(&self) -> Option<&T> {
        self.items.iter().find(|i| i.is_primary())
    }
}
