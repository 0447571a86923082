// SPDX-FileCopyrightText: 2025 The sshcm contributors
// SPDX-License-Identifier: MIT

//! Smoke tests for sshcm-store-db.
//!
//! These tests exercise the connection store operations against an
//! in-memory database.

use sshcm_store_db::{ConnectionRecord, Error, StoreDb};

fn full_record(nickname: &str) -> ConnectionRecord {
    ConnectionRecord {
        user: "deploy".into(),
        description: "Production web frontend".into(),
        args: "-p 2222".into(),
        identity: "~/.ssh/deploy".into(),
        command: "mosh".into(),
        ..ConnectionRecord::new(nickname, format!("{nickname}.example.com"))
    }
}

/// Verify add and get roundtrip on all fields.
#[test]
fn test_add_get_roundtrip() {
    let db = StoreDb::open_memory().unwrap();
    let record = full_record("web");

    let id = db.add(&record).unwrap();
    assert!(id > 0);

    let stored = db.get(id).unwrap();
    assert_eq!(stored, ConnectionRecord { id, ..record });
}

#[test]
fn test_add_minimal_record() {
    let db = StoreDb::open_memory().unwrap();
    let record = ConnectionRecord::new("db", "10.0.0.5");
    let id = db.add(&record).unwrap();

    let stored = db.get(id).unwrap();
    assert_eq!(stored.nickname, "db");
    assert_eq!(stored.host, "10.0.0.5");
    assert!(stored.user.is_empty());
    assert!(stored.command.is_empty());
}

#[test]
fn test_add_rejects_invalid_records() {
    let db = StoreDb::open_memory().unwrap();

    assert!(matches!(
        db.add(&ConnectionRecord::new("", "example.com")),
        Err(Error::InvalidNickname)
    ));
    assert!(matches!(
        db.add(&ConnectionRecord::new("700", "example.com")),
        Err(Error::NicknameMustStartWithLetter(_))
    ));
    assert!(matches!(
        db.add(&ConnectionRecord::new("web", "")),
        Err(Error::MissingHost)
    ));
    assert!(matches!(
        db.add(&ConnectionRecord::new("web", "-oProxyCommand=sh")),
        Err(Error::HostStartsWithDash(_))
    ));

    let persisted = ConnectionRecord {
        id: 4,
        ..ConnectionRecord::new("web", "example.com")
    };
    assert!(matches!(
        db.add(&persisted),
        Err(Error::IdAlreadyAssigned(4))
    ));
    assert_eq!(db.count().unwrap(), 0);
}

/// Verify nickname uniqueness leaves the table untouched.
#[test]
fn test_duplicate_nickname() {
    let db = StoreDb::open_memory().unwrap();
    db.add(&full_record("web")).unwrap();
    assert_eq!(db.count().unwrap(), 1);

    let result = db.add(&ConnectionRecord::new("web", "other.example.com"));
    assert!(matches!(result, Err(Error::DuplicateNickname(n)) if n == "web"));
    assert_eq!(db.count().unwrap(), 1);
}

#[test]
fn test_get_missing_and_invalid_ids() {
    let db = StoreDb::open_memory().unwrap();
    assert!(matches!(db.get(42), Err(Error::ConnectionNotFound(_))));
    assert!(matches!(db.get(0), Err(Error::InvalidId(_))));
    assert!(matches!(db.get(-1), Err(Error::InvalidId(_))));
}

#[test]
fn test_get_by_property() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();

    let by_host = db.get_by_property("host", "web.example.com").unwrap();
    assert_eq!(by_host.id, id);

    assert!(matches!(
        db.get_by_property("host", "nowhere"),
        Err(Error::ConnectionNotFound(_))
    ));
    assert!(matches!(
        db.get_by_property("id = 1 OR 1", "x"),
        Err(Error::InvalidProperty(_))
    ));
}

#[test]
fn test_get_by_id_or_nickname() {
    let db = StoreDb::open_memory().unwrap();
    let web = db.add(&full_record("web")).unwrap();
    let db_id = db.add(&full_record("db")).unwrap();

    assert_eq!(db.get_by_id_or_nickname("web").unwrap().id, web);
    assert_eq!(
        db.get_by_id_or_nickname(&db_id.to_string()).unwrap().nickname,
        "db"
    );
    assert!(matches!(
        db.get_by_id_or_nickname("mail"),
        Err(Error::ConnectionNotFound(_))
    ));
    assert!(matches!(
        db.get_by_id_or_nickname("0"),
        Err(Error::InvalidIdOrNickname(_))
    ));
    assert!(matches!(
        db.get_by_id_or_nickname("-web"),
        Err(Error::InvalidIdOrNickname(_))
    ));
}

#[test]
fn test_exists_by_property() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();

    assert!(db.exists(id).unwrap());
    assert!(!db.exists(id + 1).unwrap());
    assert!(db.exists_by_property("nickname", "web").unwrap());
    assert!(!db.exists_by_property("nickname", "mail").unwrap());
    assert!(db.exists_by_property("user", "deploy").unwrap());
    assert!(matches!(
        db.exists_by_property("blarg", "won't work"),
        Err(Error::InvalidProperty(_))
    ));
}

/// Unset properties are stored as NULL but match an empty value.
#[test]
fn test_lookup_by_unset_property() {
    let db = StoreDb::open_memory().unwrap();
    let full = db.add(&full_record("web")).unwrap();
    let bare = db.add(&ConnectionRecord::new("db", "10.0.0.5")).unwrap();

    assert_eq!(db.get(bare).unwrap().user, "");
    assert!(db.exists_by_property("user", "").unwrap());
    assert_eq!(db.get_by_property("user", "").unwrap().id, bare);
    assert_eq!(db.get_by_property("command", "").unwrap().id, bare);
    assert_eq!(db.get_by_property("user", "deploy").unwrap().id, full);

    let mut record = db.get(full).unwrap();
    record.description = String::new();
    db.update(&record).unwrap();
    assert_eq!(db.get_by_property("description", "").unwrap().id, full);
    assert!(!db.exists_by_property("host", "").unwrap());
}

#[test]
fn test_update() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();

    let mut record = db.get(id).unwrap();
    record.host = "10.1.1.1".into();
    record.user = String::new();
    record.nickname = "frontend".into();
    db.update(&record).unwrap();

    let stored = db.get(id).unwrap();
    assert_eq!(stored, record);
    assert!(!db.exists_by_property("nickname", "web").unwrap());
}

/// Keeping the current nickname is not a conflict.
#[test]
fn test_update_same_nickname() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();

    let mut record = db.get(id).unwrap();
    record.description = "renamed nothing".into();
    db.update(&record).unwrap();
    assert_eq!(db.get(id).unwrap().description, "renamed nothing");
}

#[test]
fn test_update_conflicts_and_missing() {
    let db = StoreDb::open_memory().unwrap();
    db.add(&full_record("web")).unwrap();
    let id = db.add(&full_record("db")).unwrap();

    let mut record = db.get(id).unwrap();
    record.nickname = "web".into();
    assert!(matches!(
        db.update(&record),
        Err(Error::DuplicateNickname(_))
    ));
    assert_eq!(db.get(id).unwrap().nickname, "db");

    let unsaved = ConnectionRecord::new("mail", "mail.example.com");
    assert!(matches!(db.update(&unsaved), Err(Error::MissingId)));

    let ghost = ConnectionRecord {
        id: 99,
        ..ConnectionRecord::new("ghost", "example.com")
    };
    assert!(matches!(db.update(&ghost), Err(Error::IdNotExist(99))));

    let mut bad = db.get(id).unwrap();
    bad.nickname = "9lives".into();
    assert!(matches!(
        db.update(&bad),
        Err(Error::NicknameMustStartWithLetter(_))
    ));
}

#[test]
fn test_delete_then_get() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();
    let keep = db.add(&full_record("db")).unwrap();

    let record = db.get(id).unwrap();
    db.delete(&record).unwrap();

    assert!(matches!(db.get(id), Err(Error::ConnectionNotFound(_))));
    assert!(db.get(keep).is_ok());
    assert!(matches!(db.delete(&record), Err(Error::IdNotExist(_))));
    assert!(matches!(
        db.delete(&ConnectionRecord::new("x", "y")),
        Err(Error::MissingId)
    ));
}

#[test]
fn test_get_all_in_id_order() {
    let db = StoreDb::open_memory().unwrap();
    let ids: Vec<i64> = ["web", "db", "mail"]
        .into_iter()
        .map(|n| db.add(&full_record(n)).unwrap())
        .collect();

    let all = db.get_all().unwrap();
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), ids);
}

#[test]
fn test_search() {
    let db = StoreDb::open_memory().unwrap();
    db.add(&ConnectionRecord {
        description: "Billing DATABASE".into(),
        ..ConnectionRecord::new("billing", "10.0.0.2")
    })
    .unwrap();
    db.add(&ConnectionRecord {
        user: "postgres".into(),
        ..ConnectionRecord::new("analytics", "db.internal")
    })
    .unwrap();
    db.add(&ConnectionRecord {
        args: "-o database=1".into(),
        ..ConnectionRecord::new("web", "web.example.com")
    })
    .unwrap();

    let found: Vec<_> = db
        .search("Data")
        .unwrap()
        .into_iter()
        .map(|c| c.nickname)
        .collect();
    assert_eq!(found, vec!["billing"]);

    let found: Vec<_> = db
        .search("DB")
        .unwrap()
        .into_iter()
        .map(|c| c.nickname)
        .collect();
    assert_eq!(found, vec!["analytics"]);

    assert_eq!(db.search("").unwrap().len(), 3);
    assert!(db.search("nomatch").unwrap().is_empty());
}

/// A row edited behind the store's back is reported, not returned.
#[test]
fn test_corrupted_row_is_rejected() {
    let db = StoreDb::open_memory().unwrap();
    let id = db.add(&full_record("web")).unwrap();

    db.connection()
        .execute("UPDATE connections SET host = '' WHERE id = ?1", [id])
        .unwrap();
    assert!(matches!(
        db.get(id),
        Err(Error::RecordInvalid { id: bad, .. }) if bad == id
    ));

    db.connection()
        .execute(
            "UPDATE connections SET host = 'h', nickname = '1st' WHERE id = ?1",
            [id],
        )
        .unwrap();
    let err = db.get_all().unwrap_err();
    assert!(matches!(err, Error::RecordInvalid { .. }));
    assert!(!err.is_user_error());
}
