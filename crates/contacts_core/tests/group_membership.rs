use contacts_core::db::open_db_in_memory;
use contacts_core::{
    ContactRepository, GroupRepository, Membership, RepoError, SqliteContactRepository,
    SqliteGroupRepository,
};

#[test]
fn list_groups_returns_seeded_groups_in_id_order() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let listed = groups.list_groups().unwrap();
    let kinds = listed
        .iter()
        .map(|group| group.kind.as_str())
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["family", "friends", "work"]);
    assert!(listed.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[test]
fn group_lookup_by_type_and_id_agree() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let work = groups.group_by_type("work").unwrap().unwrap();
    let same = groups.group_by_id(work.id).unwrap().unwrap();
    assert_eq!(work, same);

    assert!(groups.group_by_type("Work").unwrap().is_none());
    assert!(groups.group_by_type("gym").unwrap().is_none());
    assert!(groups.group_by_id(999).unwrap().is_none());
}

#[test]
fn empty_group_fills_and_empties_with_one_membership() {
    let conn = open_db_in_memory().unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let contact_id = contacts.create_contact("Alice", "", "").unwrap();
    let family = groups.group_by_type("family").unwrap().unwrap();
    assert!(groups.is_group_empty(family.id).unwrap());
    assert!(!groups.is_member(contact_id, family.id).unwrap());

    let membership = groups.add_membership(contact_id, "family").unwrap();
    assert_eq!(
        membership,
        Membership {
            contact_id,
            group_id: family.id,
        }
    );
    assert!(!groups.is_group_empty(family.id).unwrap());
    assert!(groups.is_member(contact_id, family.id).unwrap());

    groups.remove_membership(contact_id, family.id).unwrap();
    assert!(groups.is_group_empty(family.id).unwrap());
    assert!(!groups.is_member(contact_id, family.id).unwrap());
}

#[test]
fn add_membership_with_unknown_group_type_fails() {
    let conn = open_db_in_memory().unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let contact_id = contacts.create_contact("Alice", "", "").unwrap();

    let err = groups.add_membership(contact_id, "gym").unwrap_err();
    assert!(matches!(err, RepoError::GroupNotFound(kind) if kind == "gym"));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM contact_groups;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn add_membership_for_missing_contact_violates_foreign_key() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let err = groups.add_membership(999, "work").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn duplicate_membership_insert_is_refused_by_schema() {
    let conn = open_db_in_memory().unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let contact_id = contacts.create_contact("Alice", "", "").unwrap();

    groups.add_membership(contact_id, "work").unwrap();
    let err = groups.add_membership(contact_id, "work").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));

    let rows: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM contact_groups WHERE contact_id = ?1;",
            [contact_id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn remove_absent_membership_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    groups.remove_membership(1, 1).unwrap();
}

#[test]
fn group_members_joins_contacts_through_memberships() {
    let conn = open_db_in_memory().unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();

    let zed = contacts.create_contact("Zed", "", "").unwrap();
    let amy = contacts.create_contact("Amy", "", "").unwrap();
    let bob = contacts.create_contact("Bob", "", "").unwrap();
    let work = groups.add_membership(zed, "work").unwrap().group_id;
    groups.add_membership(amy, "work").unwrap();
    groups.add_membership(bob, "family").unwrap();

    let names = groups
        .group_members(work)
        .unwrap()
        .into_iter()
        .map(|contact| contact.name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Amy", "Zed"]);

    let friends = groups.group_by_type("friends").unwrap().unwrap();
    assert!(groups.group_members(friends.id).unwrap().is_empty());
}

#[test]
fn membership_reads_reflect_current_state_without_caching() {
    let conn = open_db_in_memory().unwrap();
    let contacts = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let contact_id = contacts.create_contact("Alice", "", "").unwrap();
    let work = groups.add_membership(contact_id, "work").unwrap().group_id;

    conn.execute("DELETE FROM contact_groups;", []).unwrap();

    assert!(!groups.is_member(contact_id, work).unwrap());
    assert!(groups.group_members(work).unwrap().is_empty());
}
