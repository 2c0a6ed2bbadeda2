// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the administration endpoints.

use vibemon_domain::{AccountStatus, Role};

use crate::tests::helpers::{
    TEST_PASSWORD, audit_entries, create_test_admin, create_test_operator,
    create_test_persistence, create_test_super_admin, create_test_user, reading_request,
    single_parameter, test_date,
};
use crate::{
    AdminUserListQuery, ApiError, AuditLogQuery, AuthenticationService, BulkData, BulkRequest,
    ChangeRoleRequest, DeactivateRequest, ResetPasswordRequest, approve_user, bulk_update_users,
    change_user_role, deactivate_user, get_system_stats, get_user_detail, list_audit_logs,
    list_pending_users, list_users, reset_user_password, save_reading,
};

#[test]
fn test_list_users_filters_by_role_and_status() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    create_test_operator(&mut persistence);
    create_test_user(
        &mut persistence,
        "tech@vibratemonitor.com",
        "Night Technician",
        Role::Technician,
        false,
    );

    let all = list_users(
        &mut persistence,
        &AdminUserListQuery::default(),
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(all.pagination.total, 3);
    assert_eq!(all.pagination.limit, 10);

    let pending = list_users(
        &mut persistence,
        &AdminUserListQuery {
            status: Some(String::from("pending")),
            ..AdminUserListQuery::default()
        },
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(pending.users.len(), 1);
    assert_eq!(pending.users[0].status, AccountStatus::Pending);

    let operators = list_users(
        &mut persistence,
        &AdminUserListQuery {
            role: Some(String::from("operator")),
            ..AdminUserListQuery::default()
        },
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(operators.users.len(), 1);
    assert_eq!(operators.users[0].email, "operator@vibratemonitor.com");
}

#[test]
fn test_list_users_rejects_unknown_status() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = list_users(
        &mut persistence,
        &AdminUserListQuery {
            status: Some(String::from("banned")),
            ..AdminUserListQuery::default()
        },
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "status"));
}

#[test]
fn test_operator_cannot_use_admin_endpoints() {
    let mut persistence = create_test_persistence();
    let operator = create_test_operator(&mut persistence);

    let result = list_pending_users(&mut persistence, &operator, Some("10.1.1.1"));

    assert_eq!(
        result,
        Err(ApiError::Unauthorized {
            action: String::from("list pending users"),
            required_role: String::from("admin or super_admin"),
        })
    );
    let attempts = audit_entries(&mut persistence, "UNAUTHORIZED_ACCESS_ATTEMPT");
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].details["endpoint"], "GET /api/admin/users/pending");
    assert_eq!(attempts[0].ip.as_deref(), Some("10.1.1.1"));
}

#[test]
fn test_approve_pending_user_once() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let pending = create_test_user(
        &mut persistence,
        "tech@vibratemonitor.com",
        "Night Technician",
        Role::Technician,
        false,
    );

    let listed = list_pending_users(&mut persistence, &admin, None).unwrap();
    assert_eq!(listed.count, 1);

    let response = approve_user(&mut persistence, pending.id, &admin, None).unwrap();
    assert!(response.user.is_approved);
    assert_eq!(response.user.approved_by, Some(admin.id));
    assert_eq!(response.user.status, AccountStatus::Approved);

    let again = approve_user(&mut persistence, pending.id, &admin, None);
    assert!(matches!(again, Err(ApiError::DomainRuleViolation { .. })));

    assert_eq!(audit_entries(&mut persistence, "USER_APPROVED").len(), 1);
    assert_eq!(list_pending_users(&mut persistence, &admin, None).unwrap().count, 0);
}

#[test]
fn test_approve_deactivated_user_is_rule_violation() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    deactivate_user(
        &mut persistence,
        operator.id,
        &DeactivateRequest::default(),
        &admin,
        None,
    )
    .unwrap();

    let result = approve_user(&mut persistence, operator.id, &admin, None);

    match result {
        Err(ApiError::DomainRuleViolation { message, .. }) => {
            assert_eq!(message, "User account is deactivated");
        }
        other => panic!("Expected DomainRuleViolation, got {other:?}"),
    }
    assert!(audit_entries(&mut persistence, "USER_APPROVED").is_empty());
}

#[test]
fn test_approve_unknown_user_is_not_found() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = approve_user(&mut persistence, 9999, &admin, None);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_deactivate_user_records_reason() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let response = deactivate_user(
        &mut persistence,
        operator.id,
        &DeactivateRequest {
            reason: Some(String::from("  Contract ended  ")),
        },
        &admin,
        None,
    )
    .unwrap();

    assert!(!response.user.is_active);
    assert_eq!(response.user.status, AccountStatus::Deactivated);
    assert_eq!(
        response.user.deactivation_reason.as_deref(),
        Some("Contract ended")
    );

    let entries = audit_entries(&mut persistence, "USER_DEACTIVATED");
    assert_eq!(entries[0].details["reason"], "Contract ended");
}

#[test]
fn test_deactivate_without_reason_uses_default() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let response = deactivate_user(
        &mut persistence,
        operator.id,
        &DeactivateRequest::default(),
        &admin,
        None,
    )
    .unwrap();

    assert_eq!(
        response.user.deactivation_reason.as_deref(),
        Some("No reason provided")
    );
}

#[test]
fn test_super_admin_cannot_be_deactivated() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let super_admin = create_test_super_admin(&mut persistence);

    let result = deactivate_user(
        &mut persistence,
        super_admin.id,
        &DeactivateRequest::default(),
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::Forbidden { .. })));
    assert!(
        persistence
            .get_user_by_id(super_admin.id)
            .unwrap()
            .unwrap()
            .is_active
    );
}

#[test]
fn test_admin_cannot_deactivate_self() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = deactivate_user(
        &mut persistence,
        admin.id,
        &DeactivateRequest::default(),
        &admin,
        None,
    );

    assert_eq!(
        result,
        Err(ApiError::Forbidden {
            message: String::from("Cannot deactivate your own account"),
        })
    );
}

#[test]
fn test_change_role_audits_old_and_new_role() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let response = change_user_role(
        &mut persistence,
        operator.id,
        &ChangeRoleRequest {
            role: String::from("supervisor"),
        },
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(response.user.role, Role::Supervisor);
    assert_eq!(response.user.role_changed_by, Some(admin.id));

    let entries = audit_entries(&mut persistence, "USER_ROLE_CHANGED");
    assert_eq!(entries[0].details["oldRole"], "operator");
    assert_eq!(entries[0].details["newRole"], "supervisor");
}

#[test]
fn test_only_super_admin_grants_admin_role() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let super_admin = create_test_super_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);
    let promote = ChangeRoleRequest {
        role: String::from("admin"),
    };

    let by_admin = change_user_role(&mut persistence, operator.id, &promote, &admin, None);
    assert!(matches!(by_admin, Err(ApiError::Forbidden { .. })));

    let by_super_admin =
        change_user_role(&mut persistence, operator.id, &promote, &super_admin, None).unwrap();
    assert_eq!(by_super_admin.user.role, Role::Admin);
}

#[test]
fn test_super_admin_role_is_never_granted() {
    let mut persistence = create_test_persistence();
    let super_admin = create_test_super_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = change_user_role(
        &mut persistence,
        operator.id,
        &ChangeRoleRequest {
            role: String::from("super_admin"),
        },
        &super_admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "role"));
}

#[test]
fn test_change_role_rejects_unknown_role() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = change_user_role(
        &mut persistence,
        operator.id,
        &ChangeRoleRequest {
            role: String::from("janitor"),
        },
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { .. })));
}

#[test]
fn test_reset_password_requires_super_admin() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = reset_user_password(
        &mut persistence,
        operator.id,
        &ResetPasswordRequest {
            new_password: String::from("Reset789"),
        },
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_reset_password_revokes_sessions() {
    let mut persistence = create_test_persistence();
    let super_admin = create_test_super_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let (token, _) = AuthenticationService::login(
        &mut persistence,
        "operator@vibratemonitor.com",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LIFETIME,
    )
    .unwrap();

    reset_user_password(
        &mut persistence,
        operator.id,
        &ResetPasswordRequest {
            new_password: String::from("Reset789"),
        },
        &super_admin,
        None,
    )
    .unwrap();

    assert!(AuthenticationService::validate_session(&mut persistence, &token).is_err());
    assert!(
        AuthenticationService::authenticate(
            &mut persistence,
            "operator@vibratemonitor.com",
            "Reset789"
        )
        .is_ok()
    );

    let entries = audit_entries(&mut persistence, "PASSWORD_RESET_BY_ADMIN");
    assert_eq!(entries[0].details["sessionsRevoked"], 1);
}

#[test]
fn test_reset_password_enforces_policy() {
    let mut persistence = create_test_persistence();
    let super_admin = create_test_super_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = reset_user_password(
        &mut persistence,
        operator.id,
        &ResetPasswordRequest {
            new_password: String::from("abc"),
        },
        &super_admin,
        None,
    );

    assert!(matches!(
        result,
        Err(ApiError::PasswordPolicyViolation { .. })
    ));
}

#[test]
fn test_bulk_approve_reports_each_user() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);
    let pending = create_test_user(
        &mut persistence,
        "tech@vibratemonitor.com",
        "Night Technician",
        Role::Technician,
        false,
    );

    let response = bulk_update_users(
        &mut persistence,
        &BulkRequest {
            user_ids: vec![pending.id, operator.id, 9999],
            action: String::from("approve"),
            data: BulkData::default(),
        },
        &admin,
        None,
    )
    .unwrap();

    assert_eq!(response.message, "Bulk approve completed: 1 succeeded, 2 failed");
    assert_eq!(response.results.success.len(), 1);
    assert_eq!(response.results.success[0].user_id, pending.id);
    let failed_ids: Vec<i64> = response
        .results
        .failed
        .iter()
        .map(|f| f.user_id)
        .collect();
    assert_eq!(failed_ids, vec![operator.id, 9999]);

    let entries = audit_entries(&mut persistence, "BULK_APPROVE");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].details["targetUserId"], pending.id);
}

#[test]
fn test_bulk_change_role_requires_role() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let result = bulk_update_users(
        &mut persistence,
        &BulkRequest {
            user_ids: vec![operator.id],
            action: String::from("changeRole"),
            data: BulkData::default(),
        },
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "data.role"));
}

#[test]
fn test_bulk_rejects_unknown_action_and_empty_list() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let unknown = bulk_update_users(
        &mut persistence,
        &BulkRequest {
            user_ids: vec![admin.id],
            action: String::from("delete"),
            data: BulkData::default(),
        },
        &admin,
        None,
    );
    assert!(matches!(unknown, Err(ApiError::InvalidInput { field, .. }) if field == "action"));

    let empty = bulk_update_users(
        &mut persistence,
        &BulkRequest {
            user_ids: Vec::new(),
            action: String::from("approve"),
            data: BulkData::default(),
        },
        &admin,
        None,
    );
    assert!(matches!(empty, Err(ApiError::InvalidInput { field, .. }) if field == "userIds"));
}

#[test]
fn test_bulk_deactivate_skips_self() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    let response = bulk_update_users(
        &mut persistence,
        &BulkRequest {
            user_ids: vec![admin.id, operator.id],
            action: String::from("deactivate"),
            data: BulkData {
                reason: Some(String::from("Plant shutdown")),
                role: None,
            },
        },
        &admin,
        None,
    )
    .unwrap();

    assert_eq!(response.results.success.len(), 1);
    assert_eq!(response.results.failed.len(), 1);
    assert_eq!(
        response.results.failed[0].error,
        "Cannot deactivate your own account"
    );
    assert!(
        persistence
            .get_user_by_id(admin.id)
            .unwrap()
            .unwrap()
            .is_active
    );
}

#[test]
fn test_user_detail_includes_recent_activity() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    save_reading(
        &mut persistence,
        reading_request("DRI2", "FN-fnMAB", "2026-03-10", single_parameter("GV2", 0.5)),
        &operator,
        None,
    )
    .unwrap();

    let detail = get_user_detail(&mut persistence, operator.id, &admin, None).unwrap();

    assert_eq!(detail.user.id, operator.id);
    assert_eq!(detail.recent_activity.len(), 1);
    assert_eq!(detail.recent_activity[0].action, "DATA_CREATED");
    assert_eq!(
        detail.recent_activity[0].user_name.as_deref(),
        Some("Field Operator")
    );
}

#[test]
fn test_system_stats() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);
    create_test_user(
        &mut persistence,
        "tech@vibratemonitor.com",
        "Night Technician",
        Role::Technician,
        false,
    );

    for date in ["2026-03-09", "2026-03-10"] {
        save_reading(
            &mut persistence,
            reading_request("DRI1", "GB-cp51", date, single_parameter("H1", 2.0)),
            &operator,
            None,
        )
        .unwrap();
    }
    save_reading(
        &mut persistence,
        reading_request("DRI2", "GB-cp51", "2026-03-10", single_parameter("H1", 2.0)),
        &operator,
        None,
    )
    .unwrap();

    let stats = get_system_stats(&mut persistence, test_date(10), &admin, None).unwrap();

    assert_eq!(stats.users.total, 3);
    assert_eq!(stats.users.approved, 2);
    assert_eq!(stats.users.pending, 1);
    assert_eq!(stats.users.by_role.get("operator"), Some(&1));
    assert_eq!(stats.data.total_records, 3);
    assert_eq!(stats.data.today_records, 2);
    assert_eq!(stats.data.unique_dates, 2);
    assert_eq!(stats.recent_activity.len(), 3);
}

#[test]
fn test_audit_log_filters_by_action_and_user() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let operator = create_test_operator(&mut persistence);

    save_reading(
        &mut persistence,
        reading_request("DRI1", "FN-fnESF", "2026-03-10", single_parameter("A2", 7.5)),
        &operator,
        None,
    )
    .unwrap();
    change_user_role(
        &mut persistence,
        operator.id,
        &ChangeRoleRequest {
            role: String::from("engineer"),
        },
        &admin,
        None,
    )
    .unwrap();

    let by_action = list_audit_logs(
        &mut persistence,
        &AuditLogQuery {
            action: Some(String::from("DATA_CREATED")),
            ..AuditLogQuery::default()
        },
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(by_action.pagination.total, 1);
    assert_eq!(by_action.logs[0].user_id, Some(operator.id));

    let by_user = list_audit_logs(
        &mut persistence,
        &AuditLogQuery {
            user_id: Some(admin.id.to_string()),
            ..AuditLogQuery::default()
        },
        &admin,
        None,
    )
    .unwrap();
    assert_eq!(by_user.pagination.total, 1);
    assert_eq!(by_user.logs[0].action, "USER_ROLE_CHANGED");
    assert_eq!(by_user.pagination.limit, 20);
}

#[test]
fn test_audit_log_rejects_unknown_action() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let result = list_audit_logs(
        &mut persistence,
        &AuditLogQuery {
            action: Some(String::from("DROP_TABLES")),
            ..AuditLogQuery::default()
        },
        &admin,
        None,
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "action"));
}
