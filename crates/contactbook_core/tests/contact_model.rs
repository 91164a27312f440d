use contactbook_core::{Contact, ContactField, ContactValidationError};

#[test]
fn contact_new_accepts_valid_fields() {
    let contact = Contact::new("Ada", "0123456789", "work").unwrap();
    assert_eq!(contact.name, "Ada");
    assert_eq!(contact.phone, "0123456789");
    assert_eq!(contact.category, "work");
}

#[test]
fn contact_new_rejects_empty_fields_in_field_order() {
    assert_eq!(
        Contact::new("", "", "").unwrap_err(),
        ContactValidationError::EmptyName
    );
    assert_eq!(
        Contact::new("Ada", "", "").unwrap_err(),
        ContactValidationError::EmptyPhone
    );
    assert_eq!(
        Contact::new("Ada", "0123456789", "").unwrap_err(),
        ContactValidationError::EmptyCategory
    );
}

#[test]
fn contact_new_rejects_malformed_phone() {
    for phone in ["12345", "12345678901", "01234-6789", "(012)34567"] {
        let err = Contact::new("Ada", phone, "work").unwrap_err();
        assert_eq!(err, ContactValidationError::InvalidPhone(phone.to_string()));
        assert!(err.to_string().contains("10 digits"));
    }
}

#[test]
fn contact_new_rejects_line_breaks_in_name_and_category() {
    assert_eq!(
        Contact::new("Ann\nX,1112223333,evil", "4445556666", "work").unwrap_err(),
        ContactValidationError::LineBreak(ContactField::Name)
    );
    let err = Contact::new("Ann", "4445556666", "work\r").unwrap_err();
    assert_eq!(err, ContactValidationError::LineBreak(ContactField::Category));
    assert_eq!(err.to_string(), "category cannot contain line breaks");
}

#[test]
fn contact_serialization_uses_plain_field_names() {
    let contact = Contact::new("Ada", "0123456789", "work").unwrap();

    let json = serde_json::to_value(&contact).unwrap();
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["phone"], "0123456789");
    assert_eq!(json["category"], "work");

    let decoded: Contact = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, contact);
}

#[test]
fn contact_field_serializes_as_snake_case_label() {
    let json = serde_json::to_value(ContactField::Category).unwrap();
    assert_eq!(json, "category");
    assert_eq!(ContactField::Phone.as_str(), "phone");
}
