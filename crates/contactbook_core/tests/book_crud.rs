use contactbook_core::{
    BookError, Contact, ContactBook, ContactField, ContactPersistence, ContactQuery,
    ContactValidationError, LoadOutcome, NameOrdering, PersistResult, UndoPolicy,
};
use std::cell::RefCell;

/// In-memory persistence that remembers every save.
#[derive(Default)]
struct RecordingPersistence {
    saves: RefCell<Vec<Vec<Contact>>>,
}

impl RecordingPersistence {
    fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }

    fn last_names(&self) -> Vec<String> {
        self.saves
            .borrow()
            .last()
            .map(|contacts| contacts.iter().map(|c| c.name.clone()).collect())
            .unwrap_or_default()
    }
}

impl ContactPersistence for RecordingPersistence {
    fn save(&self, contacts: &[&Contact]) -> PersistResult<()> {
        self.saves
            .borrow_mut()
            .push(contacts.iter().map(|contact| (*contact).clone()).collect());
        Ok(())
    }

    fn load(&self) -> PersistResult<LoadOutcome> {
        Ok(LoadOutcome::Rows(Vec::new()))
    }
}

fn book() -> ContactBook<RecordingPersistence> {
    ContactBook::new(RecordingPersistence::default(), UndoPolicy::Retract)
}

fn names(book: &ContactBook<RecordingPersistence>) -> Vec<&str> {
    book.contacts().map(|contact| contact.name.as_str()).collect()
}

#[test]
fn add_then_find_returns_exactly_one_match() {
    let mut book = book();
    let triples = [
        ("Ada", "0123456789", "work"),
        ("Grace", "9876543210", "family"),
        ("Linus", "5555555555", "friends"),
    ];
    for (name, phone, category) in triples {
        book.add(name, phone, category).unwrap();
    }

    for (name, phone, category) in triples {
        let found: Vec<&Contact> = book.find(|contact| contact.name == name).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].phone, phone);
        assert_eq!(found[0].category, category);
    }
}

#[test]
fn add_inserts_at_front_and_persists_each_time() {
    let mut book = book();
    let first = book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "x").unwrap();

    assert_eq!(first.contact.name, "A");
    assert!(first.warning.is_none());
    assert_eq!(names(&book), vec!["B", "A"]);
    assert_eq!(book.persistence().save_count(), 2);
    assert_eq!(book.persistence().last_names(), vec!["B", "A"]);
}

#[test]
fn invalid_add_leaves_book_and_storage_untouched() {
    let mut book = book();
    book.add("A", "1111111111", "x").unwrap();

    let empty_name = book.add("", "1234567890", "x").unwrap_err();
    assert!(matches!(
        empty_name,
        BookError::Validation(ContactValidationError::EmptyName)
    ));
    let short_phone = book.add("A", "12345", "x").unwrap_err();
    assert!(matches!(
        short_phone,
        BookError::Validation(ContactValidationError::InvalidPhone(_))
    ));

    assert_eq!(names(&book), vec!["A"]);
    assert_eq!(book.persistence().save_count(), 1);
    assert_eq!(book.history().undo_len(), 1);
    assert_eq!(book.graph().len(), 1);
}

#[test]
fn delete_removes_first_match_only() {
    let mut book = book();
    book.add("Dup", "1111111111", "old").unwrap();
    book.add("Other", "2222222222", "x").unwrap();
    book.add("Dup", "3333333333", "new").unwrap();

    let removed = book.delete("Dup").unwrap();
    assert_eq!(removed.contact.phone, "3333333333");
    assert_eq!(names(&book), vec!["Other", "Dup"]);
    assert!(book.exists("Dup"));
    assert_eq!(book.persistence().last_names(), vec!["Other", "Dup"]);
}

#[test]
fn delete_missing_name_is_not_found_without_side_effects() {
    let mut book = book();
    book.add("A", "1111111111", "x").unwrap();
    let saves_before = book.persistence().save_count();

    let err = book.delete("Nobody").unwrap_err();
    assert!(matches!(err, BookError::NotFound(ref name) if name == "Nobody"));
    assert_eq!(names(&book), vec!["A"]);
    assert_eq!(book.persistence().save_count(), saves_before);
}

#[test]
fn update_changes_exactly_one_field_in_place() {
    let mut book = book();
    book.add("A", "1111111111", "x").unwrap();
    book.add("B", "2222222222", "y").unwrap();

    let updated = book.update("A", ContactField::Phone, "9999999999").unwrap();
    assert_eq!(updated.contact.name, "A");
    assert_eq!(updated.contact.phone, "9999999999");
    assert_eq!(updated.contact.category, "x");
    assert_eq!(names(&book), vec!["B", "A"]);
    assert_eq!(book.history().undo_len(), 3);

    book.update("A", ContactField::Name, "Alpha").unwrap();
    assert!(!book.exists("A"));
    assert!(book.exists("Alpha"));
}

#[test]
fn update_missing_name_and_invalid_value_are_rejected() {
    let mut book = book();
    book.add("A", "1111111111", "x").unwrap();
    let saves_before = book.persistence().save_count();

    let missing = book.update("Z", ContactField::Category, "y").unwrap_err();
    assert!(matches!(missing, BookError::NotFound(_)));

    let bad_phone = book.update("A", ContactField::Phone, "12").unwrap_err();
    assert!(matches!(
        bad_phone,
        BookError::Validation(ContactValidationError::InvalidPhone(_))
    ));
    let empty_category = book.update("A", ContactField::Category, "").unwrap_err();
    assert!(matches!(
        empty_category,
        BookError::Validation(ContactValidationError::EmptyCategory)
    ));

    assert_eq!(book.search_by_category("x").count(), 1);
    assert_eq!(book.persistence().save_count(), saves_before);
}

#[test]
fn search_matches_substrings_across_fields_in_store_order() {
    let mut book = book();
    book.add("Ann", "1112223333", "work").unwrap();
    book.add("Bob", "4445556666", "family").unwrap();
    book.add("Joanne", "7778889999", "network").unwrap();

    let by_name: Vec<&str> = book.search("nn").map(|c| c.name.as_str()).collect();
    assert_eq!(by_name, vec!["Joanne", "Ann"]);

    let by_phone: Vec<&str> = book.search("555").map(|c| c.name.as_str()).collect();
    assert_eq!(by_phone, vec!["Bob"]);

    let by_category: Vec<&str> = book.search("work").map(|c| c.name.as_str()).collect();
    assert_eq!(by_category, vec!["Joanne", "Ann"]);

    assert_eq!(book.search("zzz").count(), 0);
}

#[test]
fn category_search_requires_exact_equality_and_restarts() {
    let mut book = book();
    book.add("Ann", "1112223333", "work").unwrap();
    book.add("Joanne", "7778889999", "network").unwrap();

    let query = ContactQuery::Category("work".to_string());
    let first: Vec<&str> = book.query(&query).map(|c| c.name.as_str()).collect();
    let second: Vec<&str> = book.query(&query).map(|c| c.name.as_str()).collect();
    assert_eq!(first, vec!["Ann"]);
    assert_eq!(first, second);
}

#[test]
fn sorted_view_is_case_sensitive_and_read_only() {
    let mut book = book();
    for name in ["Bob", "alice", "Amy"] {
        book.add(name, "1234567890", "x").unwrap();
    }

    assert_eq!(book.sorted_view(), vec!["Amy", "Bob", "alice"]);
    assert_eq!(
        book.sorted_view_by(NameOrdering::CaseInsensitive),
        vec!["alice", "Amy", "Bob"]
    );
    assert_eq!(names(&book), vec!["Amy", "alice", "Bob"]);
}

#[test]
fn exists_tracks_visible_contacts() {
    let mut book = book();
    assert!(!book.exists("A"));
    book.add("A", "1111111111", "x").unwrap();
    assert!(book.exists("A"));
    book.delete("A").unwrap();
    assert!(!book.exists("A"));
    assert!(book.is_empty());
}
