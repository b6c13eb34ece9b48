use contacts_core::db::open_db_in_memory;
use contacts_core::service::contact_service::{
    CONTACT_ADDED, CONTACT_DELETED, CONTACT_UPDATED, DUPLICATE_NAME_ERROR, NAME_LENGTH_ERROR,
};
use contacts_core::{
    ContactRepository, ContactService, GroupRepository, NewContact, Outcome, Page,
    RequestContext, SqliteContactRepository, SqliteGroupRepository,
};
use rusqlite::Connection;

fn service(
    conn: &Connection,
) -> ContactService<SqliteContactRepository<'_>, SqliteGroupRepository<'_>> {
    ContactService::new(
        SqliteContactRepository::try_new(conn).unwrap(),
        SqliteGroupRepository::try_new(conn).unwrap(),
    )
}

fn fields(name: &str) -> NewContact {
    NewContact::trimmed(name, "555-1111", "a@x.com")
}

fn contact_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM contacts;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_redirects_home_with_success_flash() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut ctx = RequestContext::default();

    let outcome = service.create(&mut ctx, fields("Alice")).unwrap();

    assert_eq!(outcome, Outcome::Redirect("/home".to_string()));
    let flash = ctx.take_flash();
    assert_eq!(flash.success.as_deref(), Some(CONTACT_ADDED));
    assert!(flash.error.is_none());
    assert_eq!(contact_count(&conn), 1);
}

#[test]
fn create_trims_submitted_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut ctx = RequestContext::default();

    service
        .create(&mut ctx, NewContact::trimmed("  Alice  ", " 555 ", " a@x.com "))
        .unwrap();

    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let stored = &repo.list_contacts().unwrap()[0];
    assert_eq!(stored.name, "Alice");
    assert_eq!(stored.phone, "555");
    assert_eq!(stored.email, "a@x.com");
}

#[test]
fn create_enforces_name_length_boundaries() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let cases = [
        (String::new(), false),
        ("A".to_string(), true),
        ("B".repeat(100), true),
        ("C".repeat(101), false),
    ];

    for (name, accepted) in cases {
        let mut ctx = RequestContext::default();
        let outcome = service.create(&mut ctx, fields(&name)).unwrap();
        let flash = ctx.take_flash();
        if accepted {
            assert!(matches!(outcome, Outcome::Redirect(_)), "len {}", name.len());
            assert!(flash.error.is_none());
        } else {
            assert_eq!(outcome, Outcome::Render(Page::NewContact), "len {}", name.len());
            assert_eq!(flash.error.as_deref(), Some(NAME_LENGTH_ERROR));
        }
    }

    assert_eq!(contact_count(&conn), 2);
}

#[test]
fn whitespace_only_name_is_rejected_after_trimming() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut ctx = RequestContext::default();

    let outcome = service.create(&mut ctx, fields("   ")).unwrap();

    assert_eq!(outcome, Outcome::Render(Page::NewContact));
    assert_eq!(ctx.take_flash().error.as_deref(), Some(NAME_LENGTH_ERROR));
}

#[test]
fn create_rejects_exact_duplicate_but_accepts_case_variant() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service
        .create(&mut RequestContext::default(), fields("Alice"))
        .unwrap();

    let mut ctx = RequestContext::default();
    let duplicate = service.create(&mut ctx, fields("Alice")).unwrap();
    assert_eq!(duplicate, Outcome::Render(Page::NewContact));
    assert_eq!(ctx.take_flash().error.as_deref(), Some(DUPLICATE_NAME_ERROR));

    let mut ctx = RequestContext::default();
    let variant = service.create(&mut ctx, fields("alice")).unwrap();
    assert_eq!(variant, Outcome::Redirect("/home".to_string()));
    assert_eq!(ctx.take_flash().success.as_deref(), Some(CONTACT_ADDED));

    assert_eq!(contact_count(&conn), 2);
}

#[test]
fn name_check_passes_for_concurrent_creates_of_the_same_name() {
    // Read-then-write: both checks run before either insert lands.
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let submitted = fields("Alice");

    assert_eq!(service.name_error(&submitted).unwrap(), None);
    assert_eq!(service.name_error(&submitted).unwrap(), None);

    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.create_from(&submitted).unwrap();
    repo.create_from(&submitted).unwrap();
    assert_eq!(contact_count(&conn), 2);
}

#[test]
fn update_skips_create_time_validation() {
    // Known asymmetry: update accepts names that create would reject.
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.create_contact("Alice", "", "").unwrap();
    let bob = repo.create_contact("Bob", "", "").unwrap();

    let mut ctx = RequestContext::default();
    let outcome = service.update(&mut ctx, bob, fields("Alice")).unwrap();
    assert_eq!(outcome, Outcome::Redirect(format!("/home/{bob}")));
    assert_eq!(ctx.take_flash().success.as_deref(), Some(CONTACT_UPDATED));
    assert_eq!(repo.find_contact(bob).unwrap().unwrap().name, "Alice");

    let mut ctx = RequestContext::default();
    service.update(&mut ctx, bob, fields("")).unwrap();
    assert!(ctx.take_flash().error.is_none());
    assert_eq!(repo.find_contact(bob).unwrap().unwrap().name, "");
}

#[test]
fn update_of_missing_contact_still_reports_success() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let mut ctx = RequestContext::default();

    let outcome = service.update(&mut ctx, 77, fields("Ghost")).unwrap();

    assert_eq!(outcome, Outcome::Redirect("/home/77".to_string()));
    assert_eq!(ctx.take_flash().success.as_deref(), Some(CONTACT_UPDATED));
    assert_eq!(contact_count(&conn), 0);
}

#[test]
fn delete_redirects_home_and_clears_memberships() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let id = repo.create_contact("Alice", "", "").unwrap();
    let family = groups.add_membership(id, "family").unwrap().group_id;

    let mut ctx = RequestContext::default();
    let outcome = service.delete(&mut ctx, id).unwrap();

    assert_eq!(outcome, Outcome::Redirect("/home".to_string()));
    assert_eq!(ctx.take_flash().success.as_deref(), Some(CONTACT_DELETED));
    assert!(groups.is_group_empty(family).unwrap());
}

#[test]
fn home_lists_groups_with_empty_flags_and_sorted_contacts() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let groups = SqliteGroupRepository::try_new(&conn).unwrap();
    let zed = repo.create_contact("Zed", "", "").unwrap();
    repo.create_contact("Amy", "", "").unwrap();
    groups.add_membership(zed, "work").unwrap();

    let Outcome::Render(Page::Home { groups, contacts }) = service.home().unwrap() else {
        panic!("home should render the home page");
    };

    let flags = groups
        .iter()
        .map(|summary| (summary.group.kind.as_str(), summary.is_empty))
        .collect::<Vec<_>>();
    assert_eq!(
        flags,
        vec![("family", true), ("friends", true), ("work", false)]
    );
    let names = contacts
        .iter()
        .map(|contact| contact.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Amy", "Zed"]);
}

#[test]
fn search_page_echoes_query_and_results() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    repo.create_contact("Anna", "", "").unwrap();
    repo.create_contact("Bob", "", "").unwrap();

    let Outcome::Render(Page::Search { query, results }) = service.search(Some("AN")).unwrap()
    else {
        panic!("search should render the search page");
    };
    assert_eq!(query.as_deref(), Some("AN"));
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Anna");

    let Outcome::Render(Page::Search { query, results }) = service.search(None).unwrap() else {
        panic!("search should render the search page");
    };
    assert!(query.is_none());
    assert!(results.is_empty());
}

#[test]
fn show_and_edit_bind_no_contact_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    assert_eq!(
        service.show(5).unwrap(),
        Outcome::Render(Page::ContactDetail {
            contact_id: 5,
            contact: None,
        })
    );
    assert_eq!(
        service.edit_form(5).unwrap(),
        Outcome::Render(Page::EditContact {
            contact_id: 5,
            contact: None,
        })
    );
}

#[test]
fn show_binds_existing_contact() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let repo = SqliteContactRepository::try_new(&conn).unwrap();
    let id = repo.create_contact("Alice", "555-1111", "a@x.com").unwrap();

    let Outcome::Render(Page::ContactDetail { contact, .. }) = service.show(id).unwrap() else {
        panic!("show should render the contact page");
    };
    let contact = contact.unwrap();
    assert_eq!(contact.name, "Alice");
    assert_eq!(contact.phone, "555-1111");
}

#[test]
fn new_form_renders_empty_form() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(service(&conn).new_form(), Outcome::Render(Page::NewContact));
}
