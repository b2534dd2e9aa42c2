//! Tests for #[derive(Event)] macro

use todo_list_core::event::Event;
use todo_list_macros::Event;

#[derive(Event, Clone, Debug, PartialEq)]
enum ListEvent {
    ListCreated { list_id: String, title: String },
    ListRenamed(String, String),
    ListsCleared,
}

#[test]
fn test_event_type_named_fields() {
    let event = ListEvent::ListCreated {
        list_id: "list-1".to_string(),
        title: "Groceries".to_string(),
    };
    assert_eq!(event.event_type(), "ListCreated.v1");
}

#[test]
fn test_event_type_tuple_variant() {
    let event = ListEvent::ListRenamed("list-1".to_string(), "Errands".to_string());
    assert_eq!(event.event_type(), "ListRenamed.v1");
}

#[test]
fn test_event_type_unit_variant() {
    assert_eq!(ListEvent::ListsCleared.event_type(), "ListsCleared.v1");
}
