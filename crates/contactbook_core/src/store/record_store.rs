//! Arena-backed record store with an explicit visible order.
//!
//! # Responsibility
//! - Assign stable ids and hold records for the whole session.
//! - Maintain the newest-first visible order as a sequence of ids.
//!
//! # Invariants
//! - `order` holds each id at most once.
//! - Every id in `order` resolves to a record in `records`.
//! - Ids are never reused, even after `remove`.

use crate::model::contact::{Contact, ContactId};
use crate::store::query::NameOrdering;
use std::collections::{HashMap, VecDeque};

/// Ordered contact storage.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<ContactId, Contact>,
    order: VecDeque<ContactId>,
    next_id: u64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record and makes it the first visible entry.
    pub fn insert_front(&mut self, contact: Contact) -> ContactId {
        let id = self.allocate(contact);
        self.order.push_front(id);
        id
    }

    /// Stores a record and makes it the last visible entry.
    ///
    /// Used by the load path so file order is preserved.
    pub fn push_back(&mut self, contact: Contact) -> ContactId {
        let id = self.allocate(contact);
        self.order.push_back(id);
        id
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.records.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        self.records.get_mut(&id)
    }

    /// Current index of `id` in the visible order.
    pub fn position(&self, id: ContactId) -> Option<usize> {
        self.order.iter().position(|candidate| *candidate == id)
    }

    pub fn is_attached(&self, id: ContactId) -> bool {
        self.position(id).is_some()
    }

    /// First visible record whose name equals `name`.
    pub fn first_by_name(&self, name: &str) -> Option<ContactId> {
        self.iter_with_ids()
            .find(|(_, contact)| contact.name == name)
            .map(|(id, _)| id)
    }

    /// Hides a record from the visible order and keeps it in the arena.
    ///
    /// Returns the former position, or `None` when it was not visible.
    pub fn detach(&mut self, id: ContactId) -> Option<usize> {
        let position = self.position(id)?;
        self.order.remove(position);
        Some(position)
    }

    /// Makes a stored record the first visible entry.
    ///
    /// An already visible record is moved rather than duplicated. Returns
    /// `false` when `id` is not in the arena.
    pub fn attach_front(&mut self, id: ContactId) -> bool {
        self.attach_at(id, 0)
    }

    /// Makes a stored record visible at `position`, clamped to the order length.
    pub fn attach_at(&mut self, id: ContactId, position: usize) -> bool {
        if !self.records.contains_key(&id) {
            return false;
        }
        self.detach(id);
        let position = position.min(self.order.len());
        self.order.insert(position, id);
        true
    }

    /// Drops a record from both the visible order and the arena.
    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        self.detach(id);
        self.records.remove(&id)
    }

    /// Visible records, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Contact> + Clone + '_ {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }

    /// Visible records with their ids, newest first.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (ContactId, &Contact)> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.records.get(id).map(|contact| (*id, contact)))
    }

    /// Lazily yields visible records accepted by `predicate`, in order.
    ///
    /// The returned iterator borrows the store; calling `find` again restarts
    /// the scan from the front.
    pub fn find<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Contact> + 'a
    where
        P: Fn(&Contact) -> bool + 'a,
    {
        self.iter().filter(move |contact| predicate(*contact))
    }

    /// Visible names sorted by `ordering`; the store order is untouched.
    pub fn sorted_names(&self, ordering: NameOrdering) -> Vec<String> {
        let mut names: Vec<String> = self.iter().map(|contact| contact.name.clone()).collect();
        names.sort_by(|left, right| ordering.compare(left, right));
        names
    }

    /// Number of visible records.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of records held by the arena, detached ones included.
    pub fn stored_len(&self) -> usize {
        self.records.len()
    }

    fn allocate(&mut self, contact: Contact) -> ContactId {
        let id = ContactId(self.next_id);
        self.next_id += 1;
        self.records.insert(id, contact);
        id
    }
}
