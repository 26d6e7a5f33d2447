//! Query ordering and projection tests with real `SQLite` (no mocks).

mod common;

use common::{fixtures, test_db};
use tracklet::model::PresenceStatus;

// ============================================================================
// REFERENCE SET ORDERING
// ============================================================================

#[test]
fn statuses_ordered_by_id_ascending() {
    let storage = test_db();
    let statuses = storage.all_statuses().unwrap();

    assert_eq!(statuses.len(), 6);
    let ids: Vec<&str> = statuses.iter().map(|s| s.id.as_str()).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert!(ids.contains(&"technical-review"));
}

#[test]
fn priorities_ordered_by_id_ascending() {
    let storage = test_db();
    let priorities = storage.all_priorities().unwrap();

    let ids: Vec<&str> = priorities.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["high", "low", "medium", "no-priority", "urgent"]);
}

#[test]
fn labels_ordered_by_name_for_any_insertion_order() {
    let mut storage = test_db();
    for id in ["zeta", "alpha", "midway"] {
        storage.insert_label(&fixtures::label(id)).unwrap();
    }

    let labels = storage.all_labels().unwrap();
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Label alpha", "Label midway", "Label zeta"]);
}

// ============================================================================
// USER FLATTENING
// ============================================================================

#[test]
fn users_ordered_descending_with_presence_and_roles() {
    let mut storage = test_db();
    storage.insert_user(&fixtures::user("u-a")).unwrap();
    storage.insert_user(&fixtures::user("u-b")).unwrap();
    storage.insert_user(&fixtures::user("u-c")).unwrap();

    storage.set_presence("u-a", PresenceStatus::Online).unwrap();

    storage
        .insert_role(&tracklet::model::Role {
            id: "admin".to_string(),
            name: "Administrator".to_string(),
        })
        .unwrap();
    storage.grant_role("u-b", "admin").unwrap();

    let users = storage.all_users().unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec!["u-c", "u-b", "u-a"]);

    let a = users.iter().find(|u| u.id == "u-a").unwrap();
    assert_eq!(a.status, Some(PresenceStatus::Online));
    assert!(a.roles.is_empty());

    let b = users.iter().find(|u| u.id == "u-b").unwrap();
    assert_eq!(b.status, None);
    assert_eq!(b.roles, vec!["admin".to_string()]);
}

#[test]
fn duplicate_email_rejected() {
    let mut storage = test_db();
    storage.insert_user(&fixtures::user("u-a")).unwrap();

    let mut clone = fixtures::user("u-other");
    clone.email = "u-a@example.com".to_string();
    assert!(storage.insert_user(&clone).is_err());
}

// ============================================================================
// ISSUE LISTING
// ============================================================================

#[test]
fn issues_ordered_most_recently_updated_first() {
    let mut storage = test_db();
    let first = fixtures::create_issue(&mut storage, "TRK-1");
    std::thread::sleep(std::time::Duration::from_millis(10));
    let second = fixtures::create_issue(&mut storage, "TRK-2");
    std::thread::sleep(std::time::Duration::from_millis(10));

    // Touching the older issue moves it to the front.
    storage.update_status(first, "in-progress").unwrap();

    let issues = storage.all_issues().unwrap();
    let ids: Vec<i64> = issues.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn issue_labels_projected_exactly() {
    let mut storage = test_db();
    for id in ["l1", "l2", "l3"] {
        storage.insert_label(&fixtures::label(id)).unwrap();
    }
    let issue_id = fixtures::create_issue(&mut storage, "TRK-1");
    let other_id = fixtures::create_issue(&mut storage, "TRK-2");

    storage.add_issue_label(issue_id, "l1").unwrap();
    storage.add_issue_label(issue_id, "l2").unwrap();
    // Duplicate association is ignored, not duplicated.
    storage.add_issue_label(issue_id, "l2").unwrap();
    storage.add_issue_label(other_id, "l3").unwrap();

    let issues = storage.all_issues().unwrap();
    let with_labels = issues.iter().find(|i| i.id == issue_id).unwrap();
    assert_eq!(with_labels.labels, vec!["l1".to_string(), "l2".to_string()]);

    let other = issues.iter().find(|i| i.id == other_id).unwrap();
    assert_eq!(other.labels, vec!["l3".to_string()]);
}

#[test]
fn issue_without_labels_has_empty_list() {
    let mut storage = test_db();
    let id = fixtures::create_issue(&mut storage, "TRK-1");

    let issue = storage.get_issue(id).unwrap().expect("issue exists");
    assert!(issue.labels.is_empty());
}

#[test]
fn get_issue_returns_none_for_nonexistent() {
    let storage = test_db();
    assert!(storage.get_issue(9999).unwrap().is_none());
}

#[test]
fn queries_are_side_effect_free() {
    let mut storage = test_db();
    fixtures::create_issue(&mut storage, "TRK-1");

    let before = storage.all_issues().unwrap();
    let _ = storage.all_statuses().unwrap();
    let _ = storage.all_users().unwrap();
    let after = storage.all_issues().unwrap();
    assert_eq!(before, after);
}
