//! Pins which request paths yield a title.

use plainwiki_core::{extract_title, route, Operation, PathError};

#[test]
fn all_three_operation_literals_yield_the_title() {
    for (operation, path) in [
        (Operation::View, "/view/Page1"),
        (Operation::Edit, "/edit/Page1"),
        (Operation::Save, "/save/Page1"),
    ] {
        assert_eq!(route(path), Some(operation));
        assert_eq!(extract_title(path).unwrap(), "Page1", "path {path}");
    }
}

#[test]
fn routed_prefix_with_bad_title_is_rejected_by_the_grammar() {
    for path in ["/view/", "/edit/a-b", "/save/a_b", "/view/Page%20One", "/edit/Page/Sub"] {
        assert!(route(path).is_some(), "prefix should route {path}");
        assert!(
            matches!(extract_title(path), Err(PathError::InvalidTitle { .. })),
            "grammar should reject {path}"
        );
    }
}

#[test]
fn operation_literal_does_not_leak_into_the_title() {
    // A save path yields the page title, never the literal `save`.
    assert_eq!(extract_title("/save/Notes").unwrap(), "Notes");
    assert_eq!(extract_title("/edit/edit").unwrap(), "edit");
}
