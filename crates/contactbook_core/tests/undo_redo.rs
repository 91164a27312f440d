use contactbook_core::{
    BookError, Contact, ContactBook, ContactField, ContactPersistence, HistoryDirection,
    HistoryEntry, LoadOutcome, PersistResult, UndoPolicy,
};
use std::cell::Cell;

/// Persistence double that only counts saves.
#[derive(Default)]
struct CountingPersistence {
    saves: Cell<usize>,
}

impl ContactPersistence for CountingPersistence {
    fn save(&self, _contacts: &[&Contact]) -> PersistResult<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }

    fn load(&self) -> PersistResult<LoadOutcome> {
        Ok(LoadOutcome::Rows(Vec::new()))
    }
}

fn book(policy: UndoPolicy) -> ContactBook<CountingPersistence> {
    ContactBook::new(CountingPersistence::default(), policy)
}

fn names(book: &ContactBook<CountingPersistence>) -> Vec<&str> {
    book.contacts().map(|contact| contact.name.as_str()).collect()
}

#[test]
fn undo_and_redo_on_empty_history_are_rejected() {
    let mut book = book(UndoPolicy::Retract);

    let undo = book.undo().unwrap_err();
    assert!(matches!(
        undo,
        BookError::EmptyHistory(HistoryDirection::Undo)
    ));
    assert_eq!(undo.to_string(), "nothing to undo");

    let redo = book.redo().unwrap_err();
    assert!(matches!(
        redo,
        BookError::EmptyHistory(HistoryDirection::Redo)
    ));
    assert_eq!(book.persistence().saves.get(), 0);
}

#[test]
fn undo_then_redo_restores_previous_order() {
    let mut book = book(UndoPolicy::Retract);
    book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "x").unwrap();

    let undone = book.undo().unwrap();
    assert_eq!(undone.contact.name, "B");
    assert_eq!(names(&book), vec!["A"]);
    assert_eq!(book.graph().len(), 1);

    let redone = book.redo().unwrap();
    assert_eq!(redone.contact.name, "B");
    assert_eq!(names(&book), vec!["B", "A"]);
    assert_eq!(book.graph().len(), 2);
    assert_eq!(book.persistence().saves.get(), 4);
}

#[test]
fn retract_undo_of_update_removes_the_contact() {
    let mut book = book(UndoPolicy::Retract);
    book.add("A", "1111111111", "old").unwrap();
    book.update("A", ContactField::Category, "new").unwrap();

    let undone = book.undo().unwrap();
    assert_eq!(undone.contact.category, "new");
    assert!(book.is_empty());
    assert!(!book.exists("A"));
    assert!(book.graph().is_empty());
}

#[test]
fn retract_repeated_entries_never_duplicate_a_contact() {
    let mut book = book(UndoPolicy::Retract);
    book.add("A", "1111111111", "x").unwrap();
    book.update("A", ContactField::Phone, "2222222222").unwrap();

    book.undo().unwrap();
    book.undo().unwrap();
    assert!(book.is_empty());

    book.redo().unwrap();
    book.redo().unwrap();
    assert_eq!(names(&book), vec!["A"]);
    assert_eq!(book.graph().len(), 1);
}

#[test]
fn retract_fresh_mutation_keeps_redo_available() {
    let mut book = book(UndoPolicy::Retract);
    book.add("A", "1111111111", "x").unwrap();
    book.undo().unwrap();
    book.add("B", "2222222222", "x").unwrap();

    assert_eq!(book.history().redo_len(), 1);
    book.redo().unwrap();
    assert_eq!(names(&book), vec!["A", "B"]);
}

#[test]
fn retract_delete_is_not_undoable_and_forgets_history() {
    let mut book = book(UndoPolicy::Retract);
    book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "x").unwrap();
    book.delete("B").unwrap();

    assert_eq!(book.history().undo_len(), 1);
    assert_eq!(
        book.history().peek_undo().map(HistoryEntry::kind),
        Some("add")
    );

    let undone = book.undo().unwrap();
    assert_eq!(undone.contact.name, "A");
    assert!(book.is_empty());
    assert!(matches!(
        book.undo().unwrap_err(),
        BookError::EmptyHistory(HistoryDirection::Undo)
    ));
}

#[test]
fn revert_undo_of_update_restores_previous_value() {
    let mut book = book(UndoPolicy::Revert);
    book.add("A", "1111111111", "old").unwrap();
    book.update("A", ContactField::Category, "new").unwrap();

    let undone = book.undo().unwrap();
    assert_eq!(undone.contact.category, "old");
    assert_eq!(book.search_by_category("old").count(), 1);

    let redone = book.redo().unwrap();
    assert_eq!(redone.contact.category, "new");
    assert_eq!(book.len(), 1);
}

#[test]
fn revert_undo_of_rename_restores_graph_node() {
    let mut book = book(UndoPolicy::Revert);
    book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "x").unwrap();
    book.update("A", ContactField::Name, "Alpha").unwrap();
    assert!(book.graph().nodes().any(|node| node.name == "Alpha"));

    book.undo().unwrap();
    assert!(book.exists("A"));
    assert!(book.graph().nodes().any(|node| node.name == "A"));
    assert!(!book.graph().nodes().any(|node| node.name == "Alpha"));
    assert_eq!(book.graph().len(), 2);
}

#[test]
fn revert_undo_of_delete_reinserts_at_former_position() {
    let mut book = book(UndoPolicy::Revert);
    book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "x").unwrap();
    book.add("C", "3333333333", "x").unwrap();
    book.delete("B").unwrap();
    assert_eq!(names(&book), vec!["C", "A"]);

    let undone = book.undo().unwrap();
    assert_eq!(undone.contact.name, "B");
    assert_eq!(names(&book), vec!["C", "B", "A"]);

    book.redo().unwrap();
    assert_eq!(names(&book), vec!["C", "A"]);
}

#[test]
fn revert_fresh_mutation_clears_redo() {
    let mut book = book(UndoPolicy::Revert);
    book.add("A", "1111111111", "x").unwrap();
    book.undo().unwrap();
    assert!(book.is_empty());

    book.add("B", "2222222222", "x").unwrap();
    assert!(matches!(
        book.redo().unwrap_err(),
        BookError::EmptyHistory(HistoryDirection::Redo)
    ));
    assert_eq!(names(&book), vec!["B"]);
}
