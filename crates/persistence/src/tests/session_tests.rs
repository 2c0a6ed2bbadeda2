// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use vibemon_domain::Role;

use super::create_test_user;
use crate::{Persistence, SessionData};

#[test]
fn test_create_and_lookup_session() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "op@example.com", Role::Operator, true);

    let session_id = persistence
        .create_session("session_1_42", user_id, "2099-01-01T00:00:00Z")
        .unwrap();

    let session: SessionData = persistence
        .get_session_by_token("session_1_42")
        .unwrap()
        .unwrap();
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.user_id, user_id);
    assert_eq!(session.expires_at, "2099-01-01T00:00:00Z");

    persistence.update_session_activity(session_id).unwrap();
    assert!(
        persistence
            .get_session_by_token("unknown")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_session() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "op@example.com", Role::Operator, true);
    persistence
        .create_session("session_a", user_id, "2099-01-01T00:00:00Z")
        .unwrap();

    persistence.delete_session("session_a").unwrap();
    persistence.delete_session("session_a").unwrap();

    assert!(
        persistence
            .get_session_by_token("session_a")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_delete_expired_sessions_keeps_live_ones() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let user_id = create_test_user(&mut persistence, "op@example.com", Role::Operator, true);
    persistence
        .create_session("expired", user_id, "2000-01-01T00:00:00Z")
        .unwrap();
    persistence
        .create_session("live", user_id, "2099-01-01T00:00:00Z")
        .unwrap();

    assert_eq!(persistence.delete_expired_sessions().unwrap(), 1);
    assert!(persistence.get_session_by_token("live").unwrap().is_some());
    assert_eq!(persistence.count_sessions_for_user(user_id).unwrap(), 1);
}

#[test]
fn test_session_requires_existing_user() {
    let mut persistence = Persistence::new_in_memory().unwrap();

    assert!(
        persistence
            .create_session("orphan", 999, "2099-01-01T00:00:00Z")
            .is_err()
    );
}
