//! End-to-end properties of the engine, exercised through the public
//! facade only.

use carrel::library::Library;
use carrel::model::{Category, Item, Priority, Task};
use chrono::{Duration, Utc};
use uuid::Uuid;

fn item(title: &str, path: Option<&str>) -> Item {
    Item::new(title, Category::LectureNotes, path.map(str::to_string))
}

#[test]
fn path_uniqueness_holds_across_any_sequence() {
    let mut library = Library::new();

    let a = library.add_item(item("A", Some("/lib/a.pdf"))).unwrap();
    let b = library.add_item(item("B", Some("/lib/b.pdf"))).unwrap();

    // Moving A onto B's path fails; swapping through a free path works.
    assert!(library
        .edit_item(a, |it| it.set_file_path(Some("/lib/b.pdf".into())))
        .is_err());
    library
        .edit_item(a, |it| it.set_file_path(Some("/lib/c.pdf".into())))
        .unwrap();
    library
        .edit_item(b, |it| it.set_file_path(Some("/lib/a.pdf".into())))
        .unwrap();

    // Undo unwinds both edits; reservations follow every step.
    assert!(library.undo());
    assert!(library.undo());
    assert!(library
        .add_item(item("Clash A", Some("/lib/a.pdf")))
        .is_err());
    assert!(library
        .add_item(item("Clash B", Some("/lib/b.pdf")))
        .is_err());
    library.add_item(item("Free", Some("/lib/c.pdf"))).unwrap();

    // Deleting releases; undoing the delete re-reserves.
    assert!(library.delete_item(a));
    library.add_item(item("Taker", Some("/lib/a.pdf"))).unwrap();
    assert!(library.undo()); // Taker's add
    assert!(library.undo()); // A's delete
    assert!(library
        .add_item(item("Clash again", Some("/lib/a.pdf")))
        .is_err());
}

#[test]
fn search_scenario_lecture_and_notes() {
    let mut library = Library::new();
    let a = library
        .add_item(
            Item::new("Lecture 1 Notes", Category::LectureNotes, None).with_tag("notes"),
        )
        .unwrap();
    let b = library
        .add_item(Item::new("Lecture 2 Slides", Category::LectureNotes, None))
        .unwrap();

    let lecture: Vec<Uuid> = library.search("lecture").iter().map(|i| i.id()).collect();
    assert!(lecture.contains(&a));
    assert!(lecture.contains(&b));

    let notes: Vec<Uuid> = library.search("notes").iter().map(|i| i.id()).collect();
    assert_eq!(notes, vec![a]);
}

#[test]
fn scheduling_scenario_overdue_low_beats_distant_urgent() {
    let mut library = Library::new();
    let id = library.add_item(item("Exam", None)).unwrap();

    let t1 = library.add_task(Task::new(
        id,
        "overdue low",
        Utc::now() - Duration::hours(1),
        Priority::Low,
    ));
    library.add_task(Task::new(
        id,
        "distant urgent",
        Utc::now() + Duration::hours(200),
        Priority::Urgent,
    ));

    // 1000 × 0.5 = 500 for the overdue task; the distant one sits near 24.
    let next = library.peek_next_task().unwrap();
    assert_eq!(next.id(), t1);
    assert!((next.urgency() - 500.0).abs() < 1.0);

    let ordered = library.tasks_by_urgency();
    assert_eq!(ordered[0].id(), t1);
    assert!(ordered[1].urgency() < 30.0);
}

#[test]
fn view_history_is_bounded_and_deduplicated() {
    let mut library = Library::with_recent_limit(20);
    let ids: Vec<Uuid> = (0..25)
        .map(|n| library.add_item(item(&format!("Item {:02}", n), None)).unwrap())
        .collect();

    for id in &ids {
        assert!(library.mark_viewed(*id));
    }

    let recent: Vec<Uuid> = library.recently_viewed().iter().map(|i| i.id()).collect();
    assert_eq!(recent.len(), 20);
    let expected: Vec<Uuid> = ids[5..].iter().rev().copied().collect();
    assert_eq!(recent, expected);
}

#[test]
fn snapshot_round_trip_is_behavior_preserving() {
    let mut library = Library::new();
    let a = library
        .add_item(item("Alpha Notes", Some("/s/alpha.md")).with_tag("shared"))
        .unwrap();
    let b = library
        .add_item(item("Beta Notes", None).with_tag("shared"))
        .unwrap();
    library.add_task(Task::new(
        a,
        "revise",
        Utc::now() + Duration::hours(4),
        Priority::High,
    ));
    library.mark_viewed(b);
    library.mark_viewed(a);
    library.edit_item(b, |it| it.set_title("Beta Slides")).unwrap();
    library.delete_item(a);

    let mut restored = Library::new();
    restored.restore_snapshot(library.create_snapshot());

    let ids = |items: Vec<Item>| items.iter().map(Item::id).collect::<Vec<_>>();
    assert_eq!(ids(restored.search("shared")), ids(library.search("shared")));
    assert_eq!(ids(restored.items()), ids(library.items()));
    assert_eq!(
        restored.tasks_by_urgency().len(),
        library.tasks_by_urgency().len()
    );
    assert_eq!(
        ids(restored.recently_viewed()),
        ids(library.recently_viewed())
    );

    // The undo history travelled too: both reverse the delete of Alpha,
    // resurrecting its task with it.
    assert!(restored.undo());
    assert!(library.undo());
    for lib in [&restored, &library] {
        assert!(lib.item(a).is_some());
        assert_eq!(lib.task_count(), 1);
        assert_eq!(lib.tasks_by_urgency()[0].description(), "revise");
    }
}

#[test]
fn getters_hand_out_defensive_copies() {
    let mut library = Library::new();
    library
        .add_item(item("Original", None).with_tag("keep"))
        .unwrap();

    let mut listed = library.items();
    listed[0].set_title("Scribbled over");
    let mut freq = library.tag_frequency();
    freq.insert("injected".into(), 99);

    assert_eq!(library.items()[0].title(), "Original");
    assert!(!library.tag_frequency().contains_key("injected"));
}
