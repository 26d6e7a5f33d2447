//! Router dispatch: method routing, param validation, and error mapping.

mod common;

use common::{fixtures, test_router};
use serde_json::{Value, json};
use tracklet::{ErrorCode, TrackletError};

#[test]
fn unknown_method_is_method_not_found() {
    let mut router = test_router();
    let err = router.dispatch("issues.destroyAll", None).unwrap_err();
    assert!(matches!(err, TrackletError::MethodNotFound { .. }));
    assert_eq!(err.code(), ErrorCode::MethodNotFound);
}

#[test]
fn queries_route_to_storage() {
    let mut router = test_router();

    let statuses = router.dispatch("statuses.getAll", None).unwrap();
    assert_eq!(statuses.as_array().unwrap().len(), 6);

    let priorities = router.dispatch("priorities.getAll", None).unwrap();
    assert_eq!(priorities.as_array().unwrap().len(), 5);

    let issues = router.dispatch("issues.getAll", None).unwrap();
    assert_eq!(issues, json!([]));
}

#[test]
fn malformed_params_fail_before_any_write() {
    let mut router = test_router();
    let id = fixtures::create_issue(router.storage_mut(), "TRK-1");

    // statusId has the wrong type; the handler body must not run.
    let err = router
        .dispatch(
            "issues.updateStatus",
            Some(json!({"issueId": id, "statusId": 7})),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParams);

    let issue = router.storage().get_issue(id).unwrap().unwrap();
    assert_eq!(issue.status_id, "backlog");
}

#[test]
fn missing_params_on_a_mutation_is_invalid_params() {
    let mut router = test_router();
    let err = router.dispatch("issues.updateStatus", None).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidParams);
}

#[test]
fn not_found_surfaces_through_dispatch() {
    let mut router = test_router();
    let err = router
        .dispatch(
            "issues.updateStatus",
            Some(json!({"issueId": 404, "statusId": "backlog"})),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[test]
fn update_status_through_dispatch_persists() {
    let mut router = test_router();
    let id = fixtures::create_issue(router.storage_mut(), "TRK-1");

    let result = router
        .dispatch(
            "issues.updateStatus",
            Some(json!({"issueId": id, "statusId": "in-progress"})),
        )
        .unwrap();
    assert_eq!(result, Value::Null);

    let issue = router.storage().get_issue(id).unwrap().unwrap();
    assert_eq!(issue.status_id, "in-progress");
}

#[test]
fn presign_response_shape() {
    let mut router = test_router();
    let result = router
        .dispatch(
            "files.generateUserAvatarUploadUrl",
            Some(json!({"filename": "me.png", "mimeType": "image/png"})),
        )
        .unwrap();

    let obj = result.as_object().unwrap();
    assert_eq!(obj["bucket"], "avatars-test");
    let key = obj["key"].as_str().unwrap();
    assert!(key.starts_with("avatars/"));
    assert!(key.ends_with("-me.png"));
    let url = obj["signedUrl"].as_str().unwrap();
    assert!(url.contains(key));
    assert!(url.contains("X-Signature="));
}

#[test]
fn files_add_returns_records_with_ids() {
    let mut router = test_router();
    router
        .storage_mut()
        .insert_user(&fixtures::user("u-a"))
        .unwrap();

    let result = router
        .dispatch(
            "files.add",
            Some(json!({"files": [{
                "key": "avatars/1-me.png",
                "bucket": "avatars-test",
                "filename": "me.png",
                "mimeType": "image/png",
                "size": 2048,
                "uploadedByUserId": "u-a"
            }]})),
        )
        .unwrap();

    let records = result.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["key"], "avatars/1-me.png");
}

#[test]
fn profile_flow_through_dispatch() {
    let mut router = test_router();
    router
        .storage_mut()
        .insert_user(&fixtures::user("u-a"))
        .unwrap();

    router
        .dispatch("users.createProfile", Some(json!({"userId": "u-a"})))
        .unwrap();

    let records = router
        .storage_mut()
        .add_files(&[fixtures::new_file("avatars/1-a.png", "u-a")])
        .unwrap();

    router
        .dispatch(
            "users.updateProfileAvatar",
            Some(json!({"userId": "u-a", "avatarFileId": records[0].id})),
        )
        .unwrap();

    let profile = router.storage().get_profile("u-a").unwrap().unwrap();
    assert_eq!(profile.avatar_file_id, Some(records[0].id));
}

#[test]
fn constraint_violation_maps_to_constraint_code() {
    let mut router = test_router();
    let id = fixtures::create_issue(router.storage_mut(), "TRK-1");

    let err = router
        .dispatch(
            "issues.updateAssignee",
            Some(json!({"issueId": id, "userId": "ghost"})),
        )
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Constraint);
}
