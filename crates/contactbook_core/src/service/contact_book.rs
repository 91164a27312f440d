//! Contact book use-case service.
//!
//! # Responsibility
//! - Provide add/delete/update/query entry points over one owned book.
//! - Drive undo/redo according to the configured `UndoPolicy`.
//! - Persist the full contact set after every successful mutation.
//!
//! # Invariants
//! - Mutations touch the store first, then history, then the graph, and
//!   persist last.
//! - Rejected operations (validation, not found, empty history) change
//!   nothing and write nothing.
//! - Persistence failures never fail an operation; they ride along as a
//!   `PersistenceWarning`.
//! - Log events carry ids, counts and codes only, never contact fields.

use crate::config::{BookConfig, UndoPolicy};
use crate::graph::chain::RelationshipGraph;
use crate::history::journal::{History, HistoryDirection, HistoryEntry};
use crate::model::contact::{
    validate_field, Contact, ContactField, ContactId, ContactValidationError,
};
use crate::persist::{
    ContactPersistence, FlatFilePersistence, LoadOutcome, PersistenceWarning, StoredRow,
};
use crate::store::query::{ContactQuery, NameOrdering};
use crate::store::record_store::RecordStore;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BookResult<T> = Result<T, BookError>;

/// Rejection reported by a book operation.
#[derive(Debug)]
pub enum BookError {
    Validation(ContactValidationError),
    /// No visible contact carries the requested name.
    NotFound(String),
    EmptyHistory(HistoryDirection),
    /// Internal mismatch between history and store.
    InconsistentState(&'static str),
}

impl BookError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.code(),
            Self::NotFound(_) => "not_found",
            Self::EmptyHistory(_) => "empty_history",
            Self::InconsistentState(_) => "inconsistent_state",
        }
    }
}

impl Display for BookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(name) => write!(f, "contact not found: `{name}`"),
            Self::EmptyHistory(direction) => write!(f, "nothing to {direction}"),
            Self::InconsistentState(details) => write!(f, "inconsistent book state: {details}"),
        }
    }
}

impl Error for BookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ContactValidationError> for BookError {
    fn from(value: ContactValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Successful mutation result.
#[derive(Debug)]
pub struct Mutation {
    pub id: ContactId,
    /// Snapshot of the affected contact after the operation.
    pub contact: Contact,
    /// Set when the contact file could not be rewritten.
    pub warning: Option<PersistenceWarning>,
}

/// Why a stored row was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    Invalid(ContactValidationError),
    /// The line bytes were not valid UTF-8.
    NotUtf8,
}

impl RowError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Invalid(err) => err.code(),
            Self::NotUtf8 => "not_utf8",
        }
    }
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NotUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

impl Error for RowError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::NotUtf8 => None,
        }
    }
}

/// Stored row that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub line: usize,
    pub error: RowError,
}

/// Summary of a load pass.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<RejectedRow>,
    pub warning: Option<PersistenceWarning>,
}

/// Owned contact book: record store, history, relationship graph and
/// persistence adapter.
pub struct ContactBook<P: ContactPersistence> {
    store: RecordStore,
    history: History,
    graph: RelationshipGraph,
    persistence: P,
    policy: UndoPolicy,
}

impl ContactBook<FlatFilePersistence> {
    /// Opens a file-backed book and loads existing contacts.
    pub fn open(config: &BookConfig) -> (Self, LoadReport) {
        let persistence = FlatFilePersistence::new(config.data_file.clone());
        let mut book = Self::new(persistence, config.undo_policy);
        let report = book.load();
        (book, report)
    }
}

impl<P: ContactPersistence> ContactBook<P> {
    /// Creates an empty book. Nothing is read until `load` is called.
    pub fn new(persistence: P, policy: UndoPolicy) -> Self {
        Self {
            store: RecordStore::new(),
            history: History::new(),
            graph: RelationshipGraph::new(),
            persistence,
            policy,
        }
    }

    /// Replaces the book's contents with every valid stored row, in stored
    /// order.
    ///
    /// Rows go through the same validation as `add`, but loading records no
    /// history and does not rewrite the file. When the source is missing or
    /// unreadable the book is left as it was.
    pub fn load(&mut self) -> LoadReport {
        let rows = match self.persistence.load() {
            Ok(LoadOutcome::Rows(rows)) => rows,
            Ok(LoadOutcome::Missing(path)) => {
                warn!("event=book_load module=book status=missing");
                return LoadReport {
                    warning: Some(PersistenceWarning::FileMissing(path)),
                    ..LoadReport::default()
                };
            }
            Err(err) => {
                warn!(
                    "event=book_load module=book status=error error_code={}",
                    err.code()
                );
                return LoadReport {
                    warning: Some(PersistenceWarning::LoadFailed(err)),
                    ..LoadReport::default()
                };
            }
        };

        self.store = RecordStore::new();
        self.history = History::new();
        self.graph = RelationshipGraph::new();

        let mut report = LoadReport::default();
        let mut loaded = Vec::new();
        for row in rows {
            let (line, outcome) = match row {
                StoredRow::Parsed(row) => (
                    row.line,
                    Contact::new(row.name, row.phone, row.category).map_err(RowError::Invalid),
                ),
                StoredRow::Undecodable { line } => (line, Err(RowError::NotUtf8)),
            };
            match outcome {
                Ok(contact) => loaded.push(self.store.push_back(contact)),
                Err(error) => {
                    warn!(
                        "event=book_load_row module=book status=rejected line={} error_code={}",
                        line,
                        error.code()
                    );
                    report.rejected.push(RejectedRow { line, error });
                }
            }
        }
        report.loaded = loaded.len();

        // Stored order is newest first; the chain grows oldest first.
        for id in loaded.into_iter().rev() {
            if let Some(contact) = self.store.get(id) {
                self.graph.link(&contact.name, &contact.category);
            }
        }

        info!(
            "event=book_load module=book status=ok loaded={} rejected={}",
            report.loaded,
            report.rejected.len()
        );
        report
    }

    /// Validates and inserts a contact at the front of the book.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        category: impl Into<String>,
    ) -> BookResult<Mutation> {
        let contact = Contact::new(name, phone, category)
            .map_err(|err| rejected("contact_add", err.into()))?;
        let snapshot = contact.clone();

        let id = self.store.insert_front(contact);
        self.record(HistoryEntry::Added(id));
        self.graph.link(&snapshot.name, &snapshot.category);
        let warning = self.persist();

        info!(
            "event=contact_add module=book status=ok contact_id={} size={}",
            id,
            self.store.len()
        );
        Ok(Mutation {
            id,
            contact: snapshot,
            warning,
        })
    }

    /// Removes the first contact named `name`.
    ///
    /// Under `UndoPolicy::Retract` the record is dropped and any history that
    /// referenced it is forgotten. Under `UndoPolicy::Revert` it is kept
    /// detached so the delete can be undone.
    pub fn delete(&mut self, name: &str) -> BookResult<Mutation> {
        let id = self.lookup(name, "contact_delete")?;

        let contact = match self.policy {
            UndoPolicy::Retract => {
                let contact = self
                    .store
                    .remove(id)
                    .ok_or(BookError::InconsistentState("located contact missing"))?;
                let dropped = self.history.forget(id);
                if dropped > 0 {
                    debug!(
                        "event=history_forget module=book contact_id={} dropped={}",
                        id, dropped
                    );
                }
                contact
            }
            UndoPolicy::Revert => {
                let position = self
                    .store
                    .detach(id)
                    .ok_or(BookError::InconsistentState("located contact not visible"))?;
                self.record(HistoryEntry::Deleted { id, position });
                self.snapshot(id)?
            }
        };
        self.graph.unlink(&contact.name);
        let warning = self.persist();

        info!(
            "event=contact_delete module=book status=ok contact_id={} size={}",
            id,
            self.store.len()
        );
        Ok(Mutation {
            id,
            contact,
            warning,
        })
    }

    /// Replaces one field of the first contact named `name`.
    ///
    /// The new value must satisfy the same rule as that field on `add`.
    pub fn update(
        &mut self,
        name: &str,
        field: ContactField,
        new_value: impl Into<String>,
    ) -> BookResult<Mutation> {
        let new_value = new_value.into();
        let id = self.lookup(name, "contact_update")?;
        validate_field(field, &new_value).map_err(|err| rejected("contact_update", err.into()))?;

        let previous = self
            .store
            .get_mut(id)
            .ok_or(BookError::InconsistentState("located contact missing"))?
            .replace_field(field, new_value.clone());
        self.record(HistoryEntry::Updated {
            id,
            field,
            previous,
            next: new_value,
        });
        let snapshot = self.snapshot(id)?;
        self.graph.unlink(name);
        self.graph.link(&snapshot.name, &snapshot.category);
        let warning = self.persist();

        info!(
            "event=contact_update module=book status=ok contact_id={} field={}",
            id,
            field.as_str()
        );
        Ok(Mutation {
            id,
            contact: snapshot,
            warning,
        })
    }

    /// Undoes the most recent recorded mutation.
    pub fn undo(&mut self) -> BookResult<Mutation> {
        let Some(entry) = self.history.pop_undo() else {
            return Err(rejected(
                "history_undo",
                BookError::EmptyHistory(HistoryDirection::Undo),
            ));
        };

        let id = entry.contact_id();
        let applied = match (self.policy, &entry) {
            (UndoPolicy::Revert, HistoryEntry::Updated {
                field, previous, ..
            }) => self.set_field(id, *field, previous.clone()),
            (UndoPolicy::Revert, HistoryEntry::Deleted { position, .. }) => {
                self.show(id, *position)
            }
            _ => {
                self.hide(id);
                Ok(())
            }
        };
        self.finish_history_step(HistoryDirection::Undo, entry, applied)
    }

    /// Re-applies the most recently undone mutation.
    pub fn redo(&mut self) -> BookResult<Mutation> {
        let Some(entry) = self.history.pop_redo() else {
            return Err(rejected(
                "history_redo",
                BookError::EmptyHistory(HistoryDirection::Redo),
            ));
        };

        let id = entry.contact_id();
        let applied = match (self.policy, &entry) {
            (UndoPolicy::Revert, HistoryEntry::Updated { field, next, .. }) => {
                self.set_field(id, *field, next.clone())
            }
            (UndoPolicy::Revert, HistoryEntry::Deleted { .. }) => {
                self.hide(id);
                Ok(())
            }
            _ => self.show(id, 0),
        };
        self.finish_history_step(HistoryDirection::Redo, entry, applied)
    }

    /// Lazily yields visible contacts accepted by `predicate`, in book order.
    pub fn find<'a, F>(&'a self, predicate: F) -> impl Iterator<Item = &'a Contact> + 'a
    where
        F: Fn(&Contact) -> bool + 'a,
    {
        self.store.find(predicate)
    }

    pub fn query<'a>(&'a self, query: &'a ContactQuery) -> impl Iterator<Item = &'a Contact> + 'a {
        self.store.find(move |contact| query.matches(contact))
    }

    /// Contacts whose name, phone or category contains `term`.
    pub fn search<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a Contact> + 'a {
        self.store.find(move |contact| contact.contains(term))
    }

    /// Contacts whose category equals `category` exactly.
    pub fn search_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Contact> + 'a {
        self.store.find(move |contact| contact.category == category)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.store.first_by_name(name).is_some()
    }

    /// Visible names in case-sensitive byte order.
    pub fn sorted_view(&self) -> Vec<String> {
        self.store.sorted_names(NameOrdering::Lexicographic)
    }

    pub fn sorted_view_by(&self, ordering: NameOrdering) -> Vec<String> {
        self.store.sorted_names(ordering)
    }

    /// Visible contacts, newest first.
    pub fn contacts(&self) -> impl Iterator<Item = &Contact> + '_ {
        self.store.iter()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn graph(&self) -> &RelationshipGraph {
        &self.graph
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn policy(&self) -> UndoPolicy {
        self.policy
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn lookup(&self, name: &str, event: &'static str) -> BookResult<ContactId> {
        self.store
            .first_by_name(name)
            .ok_or_else(|| rejected(event, BookError::NotFound(name.to_string())))
    }

    fn snapshot(&self, id: ContactId) -> BookResult<Contact> {
        self.store
            .get(id)
            .cloned()
            .ok_or(BookError::InconsistentState("history references a dropped contact"))
    }

    fn record(&mut self, entry: HistoryEntry) {
        if self.policy == UndoPolicy::Revert {
            self.history.clear_redo();
        }
        self.history.record(entry);
    }

    fn hide(&mut self, id: ContactId) {
        if self.store.detach(id).is_none() {
            return;
        }
        if let Some(contact) = self.store.get(id) {
            self.graph.unlink(&contact.name);
        }
    }

    fn show(&mut self, id: ContactId, position: usize) -> BookResult<()> {
        let was_visible = self.store.is_attached(id);
        if !self.store.attach_at(id, position) {
            return Err(BookError::InconsistentState(
                "history references a dropped contact",
            ));
        }
        if !was_visible {
            if let Some(contact) = self.store.get(id) {
                self.graph.link(&contact.name, &contact.category);
            }
        }
        Ok(())
    }

    fn set_field(&mut self, id: ContactId, field: ContactField, value: String) -> BookResult<()> {
        let contact = self
            .store
            .get_mut(id)
            .ok_or(BookError::InconsistentState("history references a dropped contact"))?;
        let old_name = contact.name.clone();
        contact.replace_field(field, value);
        let (name, category) = (contact.name.clone(), contact.category.clone());

        if self.store.is_attached(id) {
            self.graph.unlink(&old_name);
            self.graph.link(&name, &category);
        }
        Ok(())
    }

    fn finish_history_step(
        &mut self,
        direction: HistoryDirection,
        entry: HistoryEntry,
        applied: BookResult<()>,
    ) -> BookResult<Mutation> {
        let id = entry.contact_id();
        if let Err(err) = applied {
            error!(
                "event=history_{} module=book status=error contact_id={} error_code={}",
                direction,
                id,
                err.code()
            );
            return Err(err);
        }

        let contact = self.snapshot(id)?;
        let kind = entry.kind();
        match direction {
            HistoryDirection::Undo => self.history.push_redo(entry),
            HistoryDirection::Redo => self.history.push_undo(entry),
        }
        let warning = self.persist();

        info!(
            "event=history_{} module=book status=ok entry={} contact_id={} policy={} size={}",
            direction,
            kind,
            id,
            self.policy,
            self.store.len()
        );
        Ok(Mutation {
            id,
            contact,
            warning,
        })
    }

    fn persist(&self) -> Option<PersistenceWarning> {
        let contacts: Vec<&Contact> = self.store.iter().collect();
        match self.persistence.save(&contacts) {
            Ok(()) => None,
            Err(err) => {
                warn!(
                    "event=book_persist module=book status=degraded error_code={}",
                    err.code()
                );
                Some(PersistenceWarning::SaveFailed(err))
            }
        }
    }
}

fn rejected(event: &'static str, err: BookError) -> BookError {
    info!(
        "event={} module=book status=rejected error_code={}",
        event,
        err.code()
    );
    err
}
