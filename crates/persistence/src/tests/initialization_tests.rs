// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    super::create_test_user(&mut first, "one@example.com", vibemon_domain::Role::Operator, true);

    assert!(first.email_exists("one@example.com").unwrap());
    assert!(!second.email_exists("one@example.com").unwrap());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_persists_between_opens() {
    let path = std::env::temp_dir().join(format!(
        "vibemon_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        super::create_test_user(
            &mut persistence,
            "file@example.com",
            vibemon_domain::Role::Engineer,
            true,
        );
    }

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    assert!(reopened.email_exists("file@example.com").unwrap());

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}
