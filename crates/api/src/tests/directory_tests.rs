// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the user directory, data export and account deletion.

use vibemon_domain::Role;

use crate::tests::helpers::{
    TEST_PASSWORD, audit_entries, create_test_admin, create_test_operator,
    create_test_persistence, create_test_super_admin, create_test_user, reading_request,
    single_parameter,
};
use crate::{
    ApiError, AuthenticationService, DELETE_CONFIRMATION, DeleteAccountRequest, DirectoryQuery,
    delete_account, export_user_data, list_directory, save_reading, search_directory,
};

fn confirmed() -> DeleteAccountRequest {
    DeleteAccountRequest {
        confirmation: Some(String::from(DELETE_CONFIRMATION)),
    }
}

#[test]
fn test_directory_lists_only_approved_active_users() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);
    create_test_user(
        &mut persistence,
        "pending@vibratemonitor.com",
        "Pending Person",
        Role::Technician,
        false,
    );
    let leaver = create_test_user(
        &mut persistence,
        "leaver@vibratemonitor.com",
        "Former Engineer",
        Role::Engineer,
        true,
    );
    persistence
        .deactivate_user(leaver.id, admin.id, "Left the plant")
        .unwrap();

    let directory = list_directory(&mut persistence).unwrap();

    assert_eq!(directory.count, 2);
    let ids: Vec<i64> = directory.users.iter().map(|u| u.id).collect();
    assert!(ids.contains(&admin.id));
    assert!(ids.contains(&operator.id));
}

#[test]
fn test_directory_search_by_text_and_role() {
    let mut persistence = create_test_persistence();
    create_test_admin(&mut persistence);
    create_test_operator(&mut persistence);
    create_test_user(
        &mut persistence,
        "maria.lopez@vibratemonitor.com",
        "Maria Lopez",
        Role::Engineer,
        true,
    );

    let by_name = search_directory(
        &mut persistence,
        &DirectoryQuery {
            query: Some(String::from("lopez")),
            role: None,
        },
    )
    .unwrap();
    assert_eq!(by_name.count, 1);
    assert_eq!(by_name.users[0].name, "Maria Lopez");

    let by_email = search_directory(
        &mut persistence,
        &DirectoryQuery {
            query: Some(String::from("operator@")),
            role: None,
        },
    )
    .unwrap();
    assert_eq!(by_email.count, 1);

    let by_role = search_directory(
        &mut persistence,
        &DirectoryQuery {
            query: None,
            role: Some(String::from("admin")),
        },
    )
    .unwrap();
    assert_eq!(by_role.count, 1);
    assert_eq!(by_role.users[0].role, Role::Admin);

    let blank = search_directory(
        &mut persistence,
        &DirectoryQuery {
            query: Some(String::from("   ")),
            role: None,
        },
    )
    .unwrap();
    assert_eq!(blank.count, 3);
}

#[test]
fn test_directory_search_rejects_unknown_role() {
    let mut persistence = create_test_persistence();

    let result = search_directory(
        &mut persistence,
        &DirectoryQuery {
            query: None,
            role: Some(String::from("wizard")),
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_export_own_data() {
    let mut persistence = create_test_persistence();
    let operator = create_test_operator(&mut persistence);

    save_reading(
        &mut persistence,
        reading_request("DRI1", "CP-cpSGC", "2026-03-10", single_parameter("GA1", 1.25)),
        &operator,
        None,
    )
    .unwrap();

    let export = export_user_data(&mut persistence, operator.id, &operator, None).unwrap();

    assert_eq!(export.exported_by, operator.id);
    assert_eq!(export.user.email, "operator@vibratemonitor.com");
    assert_eq!(export.vibrate_data.len(), 1);
    assert_eq!(export.vibrate_data[0].id, "data_DRI1_CP-cpSGC_2026-03-10");
    assert_eq!(export.audit_logs.len(), 1);

    let entries = audit_entries(&mut persistence, "USER_DATA_EXPORTED");
    assert_eq!(entries[0].details["recordCount"], 1);
}

#[test]
fn test_admin_exports_other_user_but_operator_cannot() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    assert!(export_user_data(&mut persistence, operator.id, &admin, None).is_ok());

    let denied = export_user_data(&mut persistence, admin.id, &operator, None);
    assert!(matches!(denied, Err(ApiError::Unauthorized { .. })));
    assert_eq!(
        audit_entries(&mut persistence, "UNAUTHORIZED_ACCESS_ATTEMPT").len(),
        1
    );
}

#[test]
fn test_export_unknown_user_is_not_found() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = export_user_data(&mut persistence, 4242, &admin, None);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_account_requires_confirmation() {
    let mut persistence = create_test_persistence();
    let operator = create_test_operator(&mut persistence);

    let result = delete_account(
        &mut persistence,
        operator.id,
        &DeleteAccountRequest {
            confirmation: Some(String::from("yes please")),
        },
        &operator,
        None,
    );

    assert!(
        matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "confirmation")
    );
    assert!(persistence.email_exists("operator@vibratemonitor.com").unwrap());
}

#[test]
fn test_self_deletion_anonymizes_account() {
    let mut persistence = create_test_persistence();
    let operator = create_test_operator(&mut persistence);

    save_reading(
        &mut persistence,
        reading_request("DRI2", "GB-cp71", "2026-03-10", single_parameter("V2", 9.0)),
        &operator,
        None,
    )
    .unwrap();
    let (token, _) = AuthenticationService::login(
        &mut persistence,
        "operator@vibratemonitor.com",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LIFETIME,
    )
    .unwrap();

    delete_account(&mut persistence, operator.id, &confirmed(), &operator, None).unwrap();

    let user = persistence.get_user_by_id(operator.id).unwrap().unwrap();
    assert_eq!(user.name, "Deleted User");
    assert_ne!(user.email, "operator@vibratemonitor.com");
    assert!(user.deleted_at.is_some());
    assert!(!persistence.email_exists("operator@vibratemonitor.com").unwrap());
    assert!(AuthenticationService::validate_session(&mut persistence, &token).is_err());

    // Readings stay attached to the anonymized row.
    assert_eq!(persistence.readings_by_creator(operator.id).unwrap().len(), 1);

    let entries = audit_entries(&mut persistence, "USER_ACCOUNT_DELETED");
    assert_eq!(entries[0].details["selfDeletion"], true);

    let again = delete_account(&mut persistence, operator.id, &confirmed(), &operator, None);
    assert!(matches!(again, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_super_admin_deletes_other_account() {
    let mut persistence = create_test_persistence();
    let super_admin = create_test_super_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    delete_account(&mut persistence, operator.id, &confirmed(), &super_admin, None).unwrap();

    let entries = audit_entries(&mut persistence, "USER_ACCOUNT_DELETED");
    assert_eq!(entries[0].actor_id, Some(super_admin.id));
    assert_eq!(entries[0].details["selfDeletion"], false);
}

#[test]
fn test_super_admin_account_cannot_be_deleted() {
    let mut persistence = create_test_persistence();
    let super_admin = create_test_super_admin(&mut persistence);

    let result = delete_account(
        &mut persistence,
        super_admin.id,
        &confirmed(),
        &super_admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
}

#[test]
fn test_admin_cannot_delete_other_account() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = delete_account(&mut persistence, operator.id, &confirmed(), &admin, None);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
    assert!(persistence.email_exists("operator@vibratemonitor.com").unwrap());
}
