use super::*;

// ------------------------------------------------------------------------
// Lifecycle of a walk-in order
// Create → Confirmed → Preparing → Ready → Completed
// ------------------------------------------------------------------------
#[test]
fn test_walk_in_order_lifecycle() {
    let (dir, desk) = create_test_desk();
    let table = desk.table(7);
    let id = create_lunch_order(&table).order_id();

    for status in [
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
    ] {
        let order = table.change_status(id, status).unwrap();
        assert_eq!(order.status(), status);
        assert_eq!(stored_orders(dir.path(), 7)[0].status(), status);
    }
}

// ------------------------------------------------------------------------
// Future order: only confirmation states are reachable
// ------------------------------------------------------------------------
#[test]
fn test_future_order_transitions() {
    let (_dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    let mut session = table.begin_edit(id).unwrap();
    session.set_date(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
    let order = table.finish_edit(&session).unwrap();
    assert_eq!(order.scheduled_at(), now() + Duration::days(1));

    let err = table.change_status(id, OrderStatus::Ready).unwrap_err();
    assert!(matches!(
        err,
        ManagerError::Order(OrderError::TransitionNotAllowed {
            target: OrderStatus::Ready,
            ..
        })
    ));
    assert_eq!(table.order(id).unwrap().status(), OrderStatus::AwaitingConfirmation);

    let order = table.change_status(id, OrderStatus::Confirmed).unwrap();
    assert_eq!(order.status(), OrderStatus::Confirmed);
}

// ------------------------------------------------------------------------
// Past order: flagged until closed, only NotConfirmed/Completed reachable
// ------------------------------------------------------------------------
#[test]
fn test_unclosed_past_order_is_flagged() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let desk = open_desk_at(dir.path(), now());
        let table = desk.table(4);
        let id = create_lunch_order(&table).order_id();
        table.change_status(id, OrderStatus::Preparing).unwrap();
        id
    };

    let later = now() + Duration::days(2);
    let desk = open_desk_at(dir.path(), later);
    let table = desk.table(4);

    let listing = table.listing();
    assert_eq!(listing.orders.len(), 1);
    assert_eq!(
        listing.unclosed,
        vec![UnclosedPastOrder {
            order_id: id,
            table_number: 4,
            status: OrderStatus::Preparing,
            scheduled_at: now(),
        }]
    );

    assert!(table.change_status(id, OrderStatus::Ready).is_err());
    table.change_status(id, OrderStatus::Completed).unwrap();
    assert!(table.listing().unclosed.is_empty());
}

#[test]
fn test_listing_warns_once_per_unclosed_order() {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let dir = tempfile::tempdir().unwrap();
    {
        let desk = open_desk_at(dir.path(), now());
        let table = desk.table(4);
        create_lunch_order(&table);
        create_lunch_order(&table);
    }
    let desk = open_desk_at(dir.path(), now() + Duration::days(2));

    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&warnings)));
    let listing = tracing::subscriber::with_default(subscriber, || desk.table(4).listing());

    assert_eq!(listing.unclosed.len(), 2);
    assert_eq!(warnings.load(Ordering::SeqCst), 2);
}

#[test]
fn test_closed_past_order_is_not_flagged() {
    let dir = tempfile::tempdir().unwrap();
    {
        let desk = open_desk_at(dir.path(), now());
        let table = desk.table(4);
        let id = create_lunch_order(&table).order_id();
        table.change_status(id, OrderStatus::NotConfirmed).unwrap();
    }

    let desk = open_desk_at(dir.path(), now() + Duration::days(3));
    assert!(desk.table(4).unclosed_past_orders().is_empty());
}

// ------------------------------------------------------------------------
// Edit sessions
// ------------------------------------------------------------------------
#[test]
fn test_cancel_edit_restores_lines_and_status() {
    let (dir, desk) = create_test_desk();
    let table = desk.table(1);
    let original = create_lunch_order(&table);
    let id = original.order_id();

    let session = table.begin_edit(id).unwrap();
    assert_eq!(session.order_id(), id);

    table.add_line(id, cheesecake(), 2, "").unwrap();
    table.set_quantity(id, "Борщ", 9).unwrap();
    table.remove_line(id, "Сік", |_| true).unwrap();
    table.change_status(id, OrderStatus::Confirmed).unwrap();
    assert_ne!(table.order(id).unwrap(), original);

    let restored = table.cancel_edit(session).unwrap();
    assert_eq!(restored, original);
    assert_eq!(restored.total_cost(), Decimal::from(130));
    assert_eq!(stored_orders(dir.path(), 1), vec![original]);
}

#[test]
fn test_finish_edit_rejects_past_schedule() {
    let (_dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    let mut session = table.begin_edit(id).unwrap();
    session.set_time_str("11:30").unwrap();

    let err = table.finish_edit(&session).unwrap_err();
    assert!(err.is_validation());
    assert!(matches!(err, ManagerError::Order(OrderError::ScheduleInPast(_))));
    assert_eq!(table.order(id).unwrap().scheduled_at(), now());

    // the operator keeps editing the same session
    session.set_time_str("18:45").unwrap();
    let order = table.finish_edit(&session).unwrap();
    assert_eq!(
        order.scheduled_at(),
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(18, 45, 0)
            .unwrap()
    );
}

#[test]
fn test_finish_edit_rejects_far_schedule() {
    let (_dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    let mut session = table.begin_edit(id).unwrap();
    session.set_date(NaiveDate::from_ymd_opt(2028, 1, 1).unwrap());
    assert!(matches!(
        table.finish_edit(&session),
        Err(ManagerError::Order(OrderError::ScheduleTooFar(_)))
    ));
}

#[test]
fn test_malformed_time_keeps_staged_schedule() {
    let (_dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    let mut session = table.begin_edit(id).unwrap();
    session.set_time_str("19:00").unwrap();
    for bad in ["7pm", "25:00", "19.30"] {
        assert!(matches!(
            session.set_time_str(bad),
            Err(OrderError::MalformedTime(_))
        ));
    }
    assert_eq!(session.scheduled_at().time(), NaiveTime::from_hms_opt(19, 0, 0).unwrap());
}

#[test]
fn test_cancel_after_order_deleted() {
    let (_dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    let session = table.begin_edit(id).unwrap();
    table.delete_order(id, |_| true).unwrap();
    assert!(matches!(
        table.cancel_edit(session),
        Err(ManagerError::OrderNotFound(_))
    ));
}

// ------------------------------------------------------------------------
// Shared desk
// ------------------------------------------------------------------------
#[test]
fn test_views_of_same_table_share_state() {
    let (_dir, desk) = create_test_desk();
    let a = desk.table(9);
    let b = desk.table(9);

    let id = create_lunch_order(&a).order_id();
    b.increment_quantity(id, "Сік").unwrap();
    assert_eq!(a.order(id).unwrap().line("Сік").unwrap().quantity(), 2);
}

#[test]
fn test_ids_continue_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    {
        let desk = open_desk_at(dir.path(), now());
        create_lunch_order(&desk.table(1));
        create_lunch_order(&desk.table(2));
    }

    let desk = open_desk_at(dir.path(), now());
    let order = create_lunch_order(&desk.table(1));
    assert_eq!(order.order_id(), 3);
    assert_eq!(desk.table(1).orders().len(), 2);
}

#[test]
fn test_concurrent_tables() {
    let (dir, desk) = create_test_desk();

    let handles: Vec<_> = (1..=4)
        .map(|table_number| {
            let desk = Arc::clone(&desk);
            std::thread::spawn(move || {
                let table = desk.table(table_number);
                (0..5)
                    .map(|_| create_lunch_order(&table).order_id())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<_>>());

    let stored = JsonStore::new(dir.path()).load_orders_at(now()).unwrap().value;
    assert_eq!(stored.values().map(Vec::len).sum::<usize>(), 20);
}

// ------------------------------------------------------------------------
// Failed save leaves the book as it was
// ------------------------------------------------------------------------
#[test]
fn test_failed_save_keeps_previous_state() {
    let (dir, desk) = create_test_desk();
    let table = desk.table(1);
    let id = create_lunch_order(&table).order_id();

    // the temp file cannot be written over a directory
    let blocker = dir.path().join("orders.json.tmp");
    std::fs::create_dir(&blocker).unwrap();

    let err = table.change_status(id, OrderStatus::Confirmed).unwrap_err();
    assert!(matches!(err, ManagerError::Storage(_)));
    assert!(table.create_order(vec![line(juice(), 1)]).is_err());

    assert_eq!(table.order(id).unwrap().status(), OrderStatus::AwaitingConfirmation);
    assert_eq!(table.orders().len(), 1);
    assert_eq!(stored_orders(dir.path(), 1)[0].status(), OrderStatus::AwaitingConfirmation);

    std::fs::remove_dir(&blocker).unwrap();
    let order = table.change_status(id, OrderStatus::Confirmed).unwrap();
    assert_eq!(order.status(), OrderStatus::Confirmed);
    // the discarded order did not use up an id
    assert_eq!(create_lunch_order(&table).order_id(), id + 1);
}
