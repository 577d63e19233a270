use super::*;
use crate::crud::form::FieldKey;
use crate::crud::list::{ListPage, TableBody, NEEDS_JOURNAL};
use crate::crud::pagination::Pagination;
use crate::crud::validation::AUTHOR_REQUIRED;
use crate::domain::models::{Article, Author};
use pretty_assertions::assert_eq;
use std::io::Write;

fn app_with(journal_id: Option<u64>) -> App {
    let config = Config {
        journal_id,
        ..Config::default()
    };
    App::new(config, LogBuffer::new())
}

fn author(id: u64) -> Entity {
    Entity::Author(Author {
        id,
        full_name: format!("Author {id}"),
        ..Default::default()
    })
}

fn page(records: Vec<Entity>, current: u32, total_pages: u32) -> ListPage {
    ListPage {
        records,
        pagination: Some(Pagination {
            current,
            total_pages,
            has_previous: current > 1,
            has_next: current < total_pages,
            total_count: None,
        }),
    }
}

/// Answer every queued list load of `kind` with `page`
fn answer_lists(app: &mut App, kind: EntityKind, reply_page: ListPage) {
    for command in app.take_commands() {
        if let Command::LoadList {
            kind: k, ticket, ..
        } = command
        {
            if k == kind {
                app.handle_reply(Reply::List {
                    kind,
                    ticket,
                    result: Ok(reply_page.clone()),
                });
            }
        }
    }
}

fn open_form(app: &mut App) -> &mut FormState {
    app.modal
        .as_mut()
        .and_then(Modal::as_form_mut)
        .expect("form modal open")
}

fn pdf_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    file.write_all(b"%PDF-1.4").unwrap();
    file
}

#[test]
fn test_successful_create_closes_form_and_reloads_current_page() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Author));
    answer_lists(&mut app, EntityKind::Author, page(vec![author(1)], 1, 3));
    app.with_section(|s, journal| s.next_page(journal));
    answer_lists(&mut app, EntityKind::Author, page(vec![author(2)], 2, 3));

    app.open_create_form();
    let form = open_form(&mut app);
    form.set_text("first_name", "Ali");
    form.set_text("last_name", "Valiyev");
    app.take_commands();

    app.submit_form();
    let commands = app.take_commands();
    assert!(matches!(
        commands.as_slice(),
        [Command::Save {
            kind: EntityKind::Author,
            mode: FormMode::Create,
            ..
        }]
    ));

    app.handle_reply(Reply::Saved {
        kind: EntityKind::Author,
        mode: FormMode::Create,
        submission: 1,
        result: Ok("Author created".into()),
    });

    assert!(app.modal.is_none());
    assert_eq!(app.toasts.last().map(|t| t.message.as_str()), Some("Author created"));
    match app.take_commands().as_slice() {
        [Command::LoadList { kind, query, .. }] => {
            assert_eq!(*kind, EntityKind::Author);
            assert_eq!(query.page, 2);
        }
        other => panic!("expected a reload, got {other:?}"),
    }
}

#[test]
fn test_article_without_authors_issues_no_command() {
    let pdf = pdf_file();
    let mut app = app_with(Some(1));
    app.set_tab(Tab::Section(EntityKind::Article));
    app.open_create_form();
    app.take_commands();

    let form = open_form(&mut app);
    form.set_text("title", "On rivers");
    form.set_text("abstract", "Flow of water");
    form.set_text("pdf_file", &pdf.path().display().to_string());

    app.submit_form();

    assert!(app.take_commands().is_empty());
    let form = open_form(&mut app);
    assert_eq!(form.phase(), FormPhase::Editing);
    let first = FieldKey::Cell {
        field: "authors",
        row: 0,
        column: 0,
    };
    let last = FieldKey::Cell {
        field: "authors",
        row: 0,
        column: 2,
    };
    assert_eq!(form.errors().message_for(&first), Some(AUTHOR_REQUIRED));
    assert_eq!(form.errors().message_for(&last), Some(AUTHOR_REQUIRED));
    assert_eq!(form.focused(), Some(first));
    assert_eq!(app.toasts.last().map(|t| t.kind), Some(ToastKind::Warning));
}

#[test]
fn test_second_submit_ignored_while_saving() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::FieldOfScience));
    app.open_create_form();
    open_form(&mut app).set_text("name", "Physics");
    app.take_commands();

    app.submit_form();
    app.submit_form();
    assert_eq!(app.take_commands().len(), 1);
}

#[test]
fn test_failed_save_returns_form_to_editing() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::FieldOfScience));
    app.open_create_form();
    open_form(&mut app).set_text("name", "Physics");
    app.submit_form();
    app.take_commands();

    app.handle_reply(Reply::Saved {
        kind: EntityKind::FieldOfScience,
        mode: FormMode::Create,
        submission: 1,
        result: Err(ApiError::Application("Name already exists".into())),
    });

    let form = open_form(&mut app);
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(form.text("name"), "Physics");
    let toast = app.toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert_eq!(toast.message, "Name already exists");
    assert!(app.take_commands().is_empty());
}

#[test]
fn test_save_reply_leaves_a_newer_form_open() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::FieldOfScience));
    app.open_create_form();
    open_form(&mut app).set_text("name", "Physics");
    app.submit_form();
    let submission = match app.take_commands().as_slice() {
        [Command::Save { submission, .. }] => *submission,
        other => panic!("expected a save, got {other:?}"),
    };

    // Closed while the save is in flight, then a fresh form is started
    app.close_modal();
    app.open_create_form();
    open_form(&mut app).set_text("name", "Chemistry");

    app.handle_reply(Reply::Saved {
        kind: EntityKind::FieldOfScience,
        mode: FormMode::Create,
        submission,
        result: Ok("Created".into()),
    });

    let form = open_form(&mut app);
    assert_eq!(form.text("name"), "Chemistry");
    assert_eq!(form.phase(), FormPhase::Editing);
    assert_eq!(app.toasts.last().map(|t| t.kind), Some(ToastKind::Success));
}

#[test]
fn test_failed_save_does_not_touch_a_newer_submission() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::FieldOfScience));
    app.open_create_form();
    open_form(&mut app).set_text("name", "Physics");
    app.submit_form();
    app.close_modal();

    app.open_create_form();
    open_form(&mut app).set_text("name", "Chemistry");
    app.submit_form();
    let submissions: Vec<u64> = app
        .take_commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::Save { submission, .. } => Some(submission),
            _ => None,
        })
        .collect();
    assert_eq!(submissions, vec![1, 2]);

    app.handle_reply(Reply::Saved {
        kind: EntityKind::FieldOfScience,
        mode: FormMode::Create,
        submission: 1,
        result: Err(ApiError::Application("Name already exists".into())),
    });
    assert_eq!(open_form(&mut app).phase(), FormPhase::Submitting);

    app.handle_reply(Reply::Saved {
        kind: EntityKind::FieldOfScience,
        mode: FormMode::Create,
        submission: 2,
        result: Ok("Created".into()),
    });
    assert!(app.modal.is_none());
}

#[test]
fn test_issue_lookup_for_previous_journal_is_dropped() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Article));
    app.set_journal(1);
    app.set_journal(2);
    app.take_commands();

    app.handle_reply(Reply::Lookup {
        lookup: Lookup::Issues,
        journal: Some(2),
        result: Ok(LookupData::Choices(vec![Choice::new("20", "Vol.2 No.1")])),
    });
    app.handle_reply(Reply::Lookup {
        lookup: Lookup::Issues,
        journal: Some(1),
        result: Ok(LookupData::Choices(vec![Choice::new("10", "Vol.1 No.1")])),
    });

    app.cycle_issue_filter();
    assert_eq!(app.section(EntityKind::Article).query.issue, Some(20));
}

#[test]
fn test_delete_confirm_and_cancel() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Author));
    answer_lists(&mut app, EntityKind::Author, page(vec![author(1), author(2)], 1, 1));

    app.request_delete();
    assert!(matches!(app.modal, Some(Modal::ConfirmDelete(EntityKind::Author))));
    app.close_modal();
    assert!(app.section(EntityKind::Author).confirm.pending().is_none());

    app.with_section(|s, _| {
        s.list.select_next();
        None
    });
    app.request_delete();
    app.confirm_delete();
    let target = match app.take_commands().as_slice() {
        [Command::Delete { target, .. }] => target.clone(),
        other => panic!("expected a delete, got {other:?}"),
    };
    assert_eq!(target.id, 2);

    app.handle_reply(Reply::Deleted {
        target,
        result: Ok(()),
    });
    assert_eq!(app.toasts.last().map(|t| t.message.as_str()), Some("Author deleted"));
    assert!(matches!(
        app.take_commands().as_slice(),
        [Command::LoadList {
            kind: EntityKind::Author,
            ..
        }]
    ));
}

#[test]
fn test_failed_delete_shows_fallback() {
    let mut app = app_with(None);
    app.handle_reply(Reply::Deleted {
        target: crate::crud::confirm::DeleteTarget {
            kind: EntityKind::Author,
            id: 1,
            label: "A".into(),
        },
        result: Err(ApiError::Status(500)),
    });
    let toast = app.toasts.last().unwrap();
    assert_eq!(toast.kind, ToastKind::Error);
    assert!(toast.message.starts_with("Could not delete"));
}

#[test]
fn test_stale_list_reply_is_ignored() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Author));
    let first = app.take_commands();
    app.refresh();
    let second = app.take_commands();

    let ticket_of = |commands: &[Command]| match commands {
        [Command::LoadList { ticket, .. }] => *ticket,
        other => panic!("expected one load, got {other:?}"),
    };
    let (old, new) = (ticket_of(&first), ticket_of(&second));

    app.handle_reply(Reply::List {
        kind: EntityKind::Author,
        ticket: new,
        result: Ok(page(vec![author(2)], 1, 1)),
    });
    app.handle_reply(Reply::List {
        kind: EntityKind::Author,
        ticket: old,
        result: Ok(page(vec![author(1)], 1, 1)),
    });

    let ids: Vec<u64> = app
        .section(EntityKind::Author)
        .list
        .rows()
        .iter()
        .map(|e| e.record().id())
        .collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn test_scoped_tab_without_journal_shows_placeholder() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Issue));
    assert!(app.take_commands().is_empty());
    assert!(matches!(
        app.section(EntityKind::Issue).list.body(),
        TableBody::Placeholder(NEEDS_JOURNAL)
    ));

    app.open_create_form();
    assert!(app.modal.is_none());
    assert_eq!(app.toasts.last().map(|t| t.kind), Some(ToastKind::Warning));
}

#[test]
fn test_setting_journal_reloads_scoped_tab_and_issues() {
    let mut app = app_with(None);
    app.journals = vec![Choice::new("7", "Physics Letters")];
    app.set_tab(Tab::Section(EntityKind::Issue));
    app.take_commands();

    app.cycle_journal();

    assert_eq!(app.journal, Some(7));
    let commands = app.take_commands();
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::Lookup {
            lookup: Lookup::Issues,
            journal: Some(7)
        }
    )));
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::LoadList {
            kind: EntityKind::Issue,
            journal: Some(7),
            ..
        }
    )));
    assert_eq!(
        app.toasts.last().map(|t| t.message.as_str()),
        Some("Active journal: Physics Letters")
    );
}

#[test]
fn test_toasts_expire_on_tick() {
    let mut app = app_with(None);
    app.success("Saved");
    app.tick(Instant::now() + Duration::from_secs(4));
    assert_eq!(app.toasts.len(), 1);
    app.tick(Instant::now() + Duration::from_secs(6));
    assert!(app.toasts.is_empty());
}

#[test]
fn test_toast_stack_is_bounded() {
    let mut app = app_with(None);
    for i in 0..5 {
        app.info(format!("message {i}"));
    }
    assert_eq!(app.toasts.len(), MAX_TOASTS);
    assert_eq!(app.toasts[0].message, "message 2");
}

#[test]
fn test_featured_toggle_updates_row() {
    let mut app = app_with(Some(1));
    app.set_tab(Tab::Section(EntityKind::Article));
    let article = Entity::Article(Article {
        id: 5,
        title: "On rivers".into(),
        ..Default::default()
    });
    answer_lists(&mut app, EntityKind::Article, page(vec![article], 1, 1));

    app.toggle_featured();
    assert!(matches!(
        app.take_commands().as_slice(),
        [Command::ToggleFeatured { id: 5 }]
    ));

    app.handle_reply(Reply::FeaturedToggled {
        id: 5,
        result: Ok(true),
    });
    let row = &app.section(EntityKind::Article).list.rows()[0];
    assert!(matches!(row, Entity::Article(a) if a.featured));
}

#[test]
fn test_debounced_search_fires_from_app_tick() {
    let mut app = app_with(None);
    app.set_tab(Tab::Section(EntityKind::Author));
    app.take_commands();

    let now = Instant::now();
    app.with_section(|s, _| {
        s.begin_search();
        s.search_input('v', now);
        None
    });
    app.tick(now + Duration::from_millis(100));
    assert!(app.take_commands().is_empty());

    app.tick(now + Duration::from_millis(350));
    match app.take_commands().as_slice() {
        [Command::LoadList { query, .. }] => assert_eq!(query.search, "v"),
        other => panic!("expected a search load, got {other:?}"),
    }
}

#[test]
fn test_edit_fetch_opens_prefilled_form_and_requests_lookups() {
    let mut app = app_with(Some(1));
    app.handle_reply(Reply::Fetched {
        kind: EntityKind::Article,
        id: 5,
        purpose: Purpose::Edit,
        result: Ok(Entity::Article(Article {
            id: 5,
            title: "On rivers".into(),
            ..Default::default()
        })),
    });

    let form = open_form(&mut app);
    assert_eq!(form.mode(), FormMode::Edit(5));
    assert_eq!(form.text("title"), "On rivers");

    let lookups: Vec<Lookup> = app
        .take_commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::Lookup { lookup, .. } => Some(lookup),
            _ => None,
        })
        .collect();
    assert_eq!(lookups, vec![Lookup::Issues, Lookup::Authors]);

    app.handle_reply(Reply::Lookup {
        lookup: Lookup::Issues,
        journal: Some(1),
        result: Ok(LookupData::Choices(vec![Choice::new("10", "Vol.1 No.1")])),
    });
    let form = open_form(&mut app);
    match &form.field("issue_id").unwrap().value {
        crate::crud::form::FieldValue::Select { options, .. } => assert_eq!(options.len(), 1),
        other => panic!("expected select, got {other:?}"),
    }
    assert!(app.section(EntityKind::Article).has_issue_choices());
}

#[test]
fn test_view_fetch_opens_detail() {
    let mut app = app_with(None);
    app.handle_reply(Reply::Fetched {
        kind: EntityKind::Author,
        id: 1,
        purpose: Purpose::View,
        result: Ok(author(1)),
    });
    match &app.modal {
        Some(Modal::Detail(detail)) => assert_eq!(detail.title, "Author #1"),
        other => panic!("expected detail, got {other:?}"),
    }
    assert!(app.copy_current_readable().unwrap().starts_with("Author #1"));
}
