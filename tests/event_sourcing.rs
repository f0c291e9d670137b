use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use eventsourcing::{
    Config, Event, EventSourcing, HandlerFn, HandlerRef, MemoryJournal, NoticeKind, Op,
    SubmitError, SyncFn, UnitOfWork, UnitOfWorkError, WaitOutcome,
};
use parking_lot::Mutex;

const WAIT: Option<Duration> = Some(Duration::from_secs(5));

#[derive(Debug, Default, Clone, PartialEq)]
enum Ev {
    #[default]
    Generic,
    Named(&'static str),
}

fn counting<E: Event>(name: &'static str) -> (HandlerRef<E>, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&hits);
    let handler: HandlerRef<E> = SyncFn::arc(name, move |_src: &EventSourcing<E>, _ev: &E| {
        probe.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    (handler, hits)
}

#[tokio::test(flavor = "multi_thread")]
async fn fan_out_delivers_the_same_event_to_every_match() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let seen: Arc<Mutex<Vec<Arc<Ev>>>> = Arc::new(Mutex::new(Vec::new()));

    for name in ["a", "b", "c"] {
        let seen = Arc::clone(&seen);
        es.subscribe_to(
            HandlerFn::arc(name, move |_src: EventSourcing<Ev>, ev: Arc<Ev>| {
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().push(ev);
                    Ok(())
                }
            }),
            Ev::Named("x"),
        );
    }

    let receipt = es.add_event(Ev::Named("x")).unwrap();
    assert_eq!(receipt.deliveries, 3);
    assert_eq!(es.wait_events_processed_async(WAIT).await, WaitOutcome::Drained);

    let seen = seen.lock();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().all(|ev| Arc::ptr_eq(ev, &seen[0])));
    assert_eq!(*seen[0], Ev::Named("x"));
}

#[tokio::test(flavor = "multi_thread")]
async fn filters_isolate_subscriptions() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let (on_a, a) = counting("on-a");
    let (on_b, b) = counting("on-b");
    let (generic, g) = counting("generic");
    es.subscribe_to(on_a, Ev::Named("a"));
    es.subscribe_to(on_b, Ev::Named("b"));
    es.subscribe(generic);

    es.add_event(Ev::Named("a")).unwrap();
    es.add_event(Ev::Named("a")).unwrap();
    es.add_event(Ev::Named("b")).unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    assert_eq!(a.load(Ordering::SeqCst), 2);
    assert_eq!(b.load(Ordering::SeqCst), 1);
    assert_eq!(g.load(Ordering::SeqCst), 0);
    assert_eq!(es.subscriptions(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn stalled_handler_does_not_block_others() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    es.subscribe(HandlerFn::arc(
        "stuck",
        |_src: EventSourcing<Ev>, _ev: Arc<Ev>| std::future::pending::<anyhow::Result<()>>(),
    ));
    let (fine, hits) = counting("fine");
    es.subscribe(fine);

    es.add_default().unwrap();
    let outcome = es
        .wait_events_processed_async(Some(Duration::from_millis(200)))
        .await;

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(es.processing_events(), 1);
    es.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn drain_converges_after_many_submissions() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let (h1, c1) = counting("h1");
    let (h2, c2) = counting("h2");
    es.subscribe(h1);
    es.subscribe(h2);

    for _ in 0..100 {
        es.add_default().unwrap();
    }
    assert_eq!(es.wait_events_processed_async(None).await, WaitOutcome::Drained);

    assert_eq!(es.processing_events(), 0);
    assert_eq!(c1.load(Ordering::SeqCst), 100);
    assert_eq!(c2.load(Ordering::SeqCst), 100);
}

#[test]
fn concurrent_blocking_waiters_return_after_completion() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let _ctx = rt.enter();

    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let done = Arc::new(AtomicUsize::new(0));
    let probe = Arc::clone(&done);
    es.subscribe(HandlerFn::arc(
        "slow",
        move |_src: EventSourcing<Ev>, _ev: Arc<Ev>| {
            let probe = Arc::clone(&probe);
            async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                probe.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        },
    ));

    es.add_default().unwrap();

    let waiters: Vec<_> = (0..2)
        .map(|_| {
            let es = es.clone();
            let done = Arc::clone(&done);
            std::thread::spawn(move || {
                let outcome = es.wait_events_processed(None);
                (outcome, done.load(Ordering::SeqCst), es.processing_events())
            })
        })
        .collect();

    for waiter in waiters {
        let (outcome, completed, outstanding) = waiter.join().unwrap();
        assert_eq!(outcome, WaitOutcome::Drained);
        assert_eq!(completed, 1);
        assert_eq!(outstanding, 0);
    }
    rt.block_on(es.shutdown()).unwrap();
}

#[test]
fn blocking_wait_times_out_without_error() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();
    let _ctx = rt.enter();

    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    es.subscribe(HandlerFn::arc(
        "stuck",
        |_src: EventSourcing<Ev>, _ev: Arc<Ev>| std::future::pending::<anyhow::Result<()>>(),
    ));
    es.add_default().unwrap();

    let outcome = es.wait_events_processed(Some(Duration::from_millis(50)));
    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(es.processing_events(), 1);
}

/// Unit of work recording its calls into a shared log.
struct Spy {
    log: Arc<Mutex<Vec<String>>>,
}

impl UnitOfWork<Ev> for Spy {
    fn insert(&mut self, event: &Ev) -> Result<(), UnitOfWorkError> {
        self.log.lock().push(format!("insert {event:?}"));
        Ok(())
    }

    fn update(&mut self, _event: &Ev) -> Result<(), UnitOfWorkError> {
        Ok(())
    }

    fn delete(&mut self, _event: &Ev) -> Result<(), UnitOfWorkError> {
        Ok(())
    }

    fn commit(&mut self) -> Result<(), UnitOfWorkError> {
        self.log.lock().push("commit".into());
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), UnitOfWorkError> {
        self.log.lock().push("rollback".into());
        Ok(())
    }
}

impl Drop for Spy {
    fn drop(&mut self) {
        self.log.lock().push("release".into());
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn commit_happens_before_delivery() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let factory = {
        let log = Arc::clone(&log);
        move || -> Result<Box<dyn UnitOfWork<Ev>>, UnitOfWorkError> {
            Ok(Box::new(Spy {
                log: Arc::clone(&log),
            }))
        }
    };
    let es = EventSourcing::<Ev>::new(factory);

    let handler_log = Arc::clone(&log);
    es.subscribe(SyncFn::arc(
        "observer",
        move |_src: &EventSourcing<Ev>, _ev: &Ev| {
            handler_log.lock().push("handle".into());
            Ok(())
        },
    ));

    es.add_default().unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    assert_eq!(
        *log.lock(),
        vec![
            "insert Generic".to_string(),
            "commit".to_string(),
            "release".to_string(),
            "handle".to_string(),
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn generic_and_keyed_subscribers_with_strict_equality() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let (h1, c1) = counting("h1");
    let (h2, c2) = counting("h2");
    es.subscribe(h1);
    es.subscribe_to(h2, Ev::Named("k"));

    assert_eq!(es.add_default().unwrap().deliveries, 1);
    assert_eq!(es.add_event(Ev::Named("k")).unwrap().deliveries, 1);
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    assert_eq!(c1.load(Ordering::SeqCst), 1);
    assert_eq!(c2.load(Ordering::SeqCst), 1);
    assert_eq!(es.processing_events(), 0);
}

/// Event whose generic value acts as a wildcard when it is on the filter side.
///
/// The relation is intentionally not symmetric: `Any == K(_)` but `K(_) != Any`.
#[derive(Debug, Default, Clone)]
enum Wild {
    #[default]
    Any,
    K(u32),
}

impl PartialEq for Wild {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Wild::Any, _) => true,
            (Wild::K(a), Wild::K(b)) => a == b,
            (Wild::K(_), Wild::Any) => false,
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn generic_subscriber_sees_every_event_with_wildcard_equality() {
    let es = EventSourcing::new(MemoryJournal::<Wild>::new());
    let (h1, c1) = counting("h1");
    let (h2, c2) = counting("h2");
    es.subscribe(h1);
    es.subscribe_to(h2, Wild::K(7));

    assert_eq!(es.add_default().unwrap().deliveries, 1);
    assert_eq!(es.add_event(Wild::K(7)).unwrap().deliveries, 2);
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    assert_eq!(c1.load(Ordering::SeqCst), 2);
    assert_eq!(c2.load(Ordering::SeqCst), 1);
    assert_eq!(es.processing_events(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn unmatched_event_is_still_committed() {
    let journal = MemoryJournal::<Ev>::new();
    let es = EventSourcing::new(journal.clone());
    let (h, hits) = counting("other");
    es.subscribe_to(h, Ev::Named("other"));

    let receipt = es.add_event(Ev::Named("lonely")).unwrap();
    assert_eq!(receipt.deliveries, 0);
    assert_eq!(es.processing_events(), 0);
    assert!(es.wait_events_processed_async(Some(Duration::ZERO)).await.is_drained());

    let records = journal.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].op, Op::New);
    assert_eq!(records[0].event, Ev::Named("lonely"));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn handler_error_and_panic_release_their_count() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let mut notices = es.notices();

    es.subscribe(SyncFn::arc("fails", |_src: &EventSourcing<Ev>, _ev: &Ev| {
        anyhow::bail!("no stock")
    }));
    es.subscribe(HandlerFn::arc(
        "panics",
        |_src: EventSourcing<Ev>, _ev: Arc<Ev>| async move {
            if true {
                panic!("handler blew up");
            }
            Ok(())
        },
    ));
    let (ok, hits) = counting("ok");
    es.subscribe(ok);

    assert_eq!(es.add_default().unwrap().deliveries, 3);
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    assert_eq!(es.processing_events(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    let mut failed = None;
    let mut panicked = None;
    while let Ok(n) = notices.try_recv() {
        match n.kind {
            NoticeKind::HandlerFailed => failed = Some(n),
            NoticeKind::HandlerPanicked => panicked = Some(n),
            _ => {}
        }
    }
    let failed = failed.expect("HandlerFailed notice");
    assert_eq!(failed.handler.as_deref(), Some("fails"));
    assert_eq!(failed.reason.as_deref(), Some("no stock"));
    let panicked = panicked.expect("HandlerPanicked notice");
    assert_eq!(panicked.handler.as_deref(), Some("panics"));
    assert_eq!(panicked.reason.as_deref(), Some("handler blew up"));

    // The worker survived both failures.
    es.add_default().unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn persist_failure_restores_count_and_skips_delivery() {
    let journal = MemoryJournal::<Ev>::failing("disk full");
    let es = EventSourcing::new(journal.clone());
    let (h, hits) = counting("never");
    es.subscribe(h);

    let err = es.add_default().unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Persist(UnitOfWorkError::Commit { ref reason }) if reason == "disk full"
    ));
    assert!(!err.is_retryable());
    assert_eq!(es.processing_events(), 0);
    assert!(es.wait_events_processed_async(Some(Duration::ZERO)).await.is_drained());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(journal.is_empty());
    assert_eq!(journal.opened(), 1);
    assert_eq!(journal.released(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn factory_failure_is_reported() {
    let factory = || -> Result<Box<dyn UnitOfWork<Ev>>, UnitOfWorkError> {
        Err(UnitOfWorkError::Unavailable {
            reason: "pool exhausted".into(),
        })
    };
    let es = EventSourcing::<Ev>::new(factory);
    let (h, _hits) = counting("never");
    es.subscribe(h);

    let err = es.add_default().unwrap_err();
    assert_eq!(err.as_label(), "submit_persist");
    assert!(err.is_retryable());
    assert_eq!(es.processing_events(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn submissions_after_shutdown_are_rejected() {
    let journal = MemoryJournal::<Ev>::new();
    let es = EventSourcing::new(journal.clone());
    let (h, hits) = counting("h");
    es.subscribe(h);

    es.add_default().unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    es.shutdown().await.unwrap();
    assert!(es.is_closed());

    assert!(matches!(es.add_default(), Err(SubmitError::Closed)));
    assert_eq!(journal.len(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(es.processing_events(), 0);

    // Idempotent.
    es.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn nested_submissions_converge() {
    let journal = MemoryJournal::<Ev>::new();
    let es = EventSourcing::new(journal.clone());

    es.subscribe_to(
        HandlerFn::arc(
            "order",
            |src: EventSourcing<Ev>, _ev: Arc<Ev>| async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                src.add_event(Ev::Named("credit"))?;
                Ok::<(), anyhow::Error>(())
            },
        ),
        Ev::Named("order"),
    );
    es.subscribe_to(
        SyncFn::arc("credit", |src: &EventSourcing<Ev>, _ev: &Ev| -> anyhow::Result<()> {
            src.add_event(Ev::Named("done"))?;
            Ok(())
        }),
        Ev::Named("credit"),
    );
    let (done, finished) = counting("done");
    es.subscribe_to(done, Ev::Named("done"));

    for _ in 0..5 {
        es.add_event(Ev::Named("order")).unwrap();
    }
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    assert_eq!(finished.load(Ordering::SeqCst), 5);
    assert_eq!(journal.len(), 15);
    assert_eq!(journal.opened(), journal.released());
}

#[tokio::test(flavor = "multi_thread")]
async fn sequence_numbers_and_notices() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let mut notices = es.notices();
    let (h, _) = counting("h");
    es.subscribe(h);

    assert_eq!(es.add_default().unwrap().seq, 0);
    assert_eq!(es.add_event(Ev::Named("x")).unwrap().seq, 1);
    assert_eq!(es.add_default().unwrap().seq, 2);
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());

    let mut persisted = Vec::new();
    let mut dispatched = Vec::new();
    while let Ok(n) = notices.try_recv() {
        match n.kind {
            NoticeKind::EventPersisted => persisted.push(n.event_seq),
            NoticeKind::EventDispatched => dispatched.push(n.event_seq),
            _ => {}
        }
    }
    assert_eq!(persisted, vec![Some(0), Some(1), Some(2)]);
    assert_eq!(dispatched, vec![Some(0), Some(1), Some(2)]);
}

#[tokio::test(flavor = "multi_thread")]
async fn builder_registers_initial_subscribers() {
    let (h1, c1) = counting("h1");
    let (h2, c2) = counting("h2");
    let es = EventSourcing::builder(MemoryJournal::<Ev>::new())
        .with_config(Config {
            grace: Duration::from_secs(1),
            ..Config::default()
        })
        .with_subscriber(h1)
        .with_subscriber_to(h2, Ev::Named("k"))
        .build();

    assert_eq!(es.subscriptions(), 2);
    assert_eq!(es.config().grace, Duration::from_secs(1));

    es.add_default().unwrap();
    es.add_event(Ev::Named("k")).unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    assert_eq!(c1.load(Ordering::SeqCst), 1);
    assert_eq!(c2.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn zero_grace_shutdown_does_not_join() {
    let es = EventSourcing::builder(MemoryJournal::<Ev>::new())
        .with_config(Config {
            grace: Duration::ZERO,
            ..Config::default()
        })
        .build();
    let mut notices = es.notices();

    es.shutdown().await.unwrap();
    assert!(es.is_closed());

    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match notices.recv().await {
                Ok(n) if n.kind == NoticeKind::WorkerStopped => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await;
    assert_eq!(stopped, Ok(true));
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_the_last_handle_stops_the_worker() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let mut notices = es.notices();
    drop(es);

    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match notices.recv().await {
                Ok(n) if n.kind == NoticeKind::WorkerStopped => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await;
    assert_eq!(stopped, Ok(true));
}

#[tokio::test(flavor = "multi_thread")]
async fn units_of_work_are_always_released() {
    let journal = MemoryJournal::<Ev>::new();
    let es = EventSourcing::new(journal.clone());
    for _ in 0..10 {
        es.add_default().unwrap();
    }
    assert_eq!(journal.opened(), 10);
    assert_eq!(journal.released(), 10);
    assert!(journal.records().iter().enumerate().all(|(i, r)| r.seq == i as u64));
}

#[test]
fn blocking_sync_handler_does_not_starve_siblings() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let ctx = rt.enter();

    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let (fine, hits) = counting("fine");
    es.subscribe(fine);
    es.subscribe(SyncFn::arc(
        "sleeper",
        |_src: &EventSourcing<Ev>, _ev: &Ev| -> anyhow::Result<()> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(())
        },
    ));

    assert_eq!(es.add_default().unwrap().deliveries, 2);
    let outcome = es.wait_events_processed(Some(Duration::from_millis(500)));

    assert_eq!(outcome, WaitOutcome::TimedOut);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(es.processing_events(), 1);

    drop(es);
    drop(ctx);
    rt.shutdown_background();
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_handler_panic_is_reported() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    let mut notices = es.notices();
    es.subscribe(SyncFn::arc(
        "sync-panics",
        |_src: &EventSourcing<Ev>, _ev: &Ev| -> anyhow::Result<()> { panic!("sync boom") },
    ));

    es.add_default().unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    assert_eq!(es.processing_events(), 0);

    let mut panicked = None;
    while let Ok(n) = notices.try_recv() {
        if n.kind == NoticeKind::HandlerPanicked {
            panicked = Some(n);
        }
    }
    let panicked = panicked.expect("HandlerPanicked notice");
    assert_eq!(panicked.handler.as_deref(), Some("sync-panics"));
    assert_eq!(panicked.reason.as_deref(), Some("sync boom"));
}

#[test]
fn submissions_racing_shutdown_stay_consistent() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let _ctx = rt.enter();

    let journal = MemoryJournal::<Ev>::new();
    let es = EventSourcing::new(journal.clone());
    let (h, hits) = counting("h");
    es.subscribe(h);

    let start = Arc::new(std::sync::Barrier::new(5));
    let submitters: Vec<_> = (0..4)
        .map(|_| {
            let es = es.clone();
            let start = Arc::clone(&start);
            std::thread::spawn(move || {
                start.wait();
                let mut accepted = 0usize;
                for _ in 0..200 {
                    match es.add_default() {
                        Ok(_) => accepted += 1,
                        Err(SubmitError::Closed) => {}
                        Err(other) => panic!("unexpected submit error: {other}"),
                    }
                }
                accepted
            })
        })
        .collect();

    start.wait();
    rt.block_on(es.shutdown()).unwrap();
    let accepted: usize = submitters.into_iter().map(|t| t.join().unwrap()).sum();

    assert!(es.is_closed());
    assert!(matches!(es.add_default(), Err(SubmitError::Closed)));
    assert_eq!(
        rt.block_on(es.wait_events_processed_async(None)),
        WaitOutcome::Drained
    );
    assert_eq!(es.processing_events(), 0);
    assert!(journal.len() >= accepted);
    assert!(hits.load(Ordering::SeqCst) <= accepted);
}

#[tokio::test(flavor = "multi_thread")]
async fn handlers_using_their_source_do_not_keep_the_instance_alive() {
    let es = EventSourcing::new(MemoryJournal::<Ev>::new());
    es.subscribe_to(
        SyncFn::arc("forward", |src: &EventSourcing<Ev>, _ev: &Ev| -> anyhow::Result<()> {
            src.add_event(Ev::Named("next"))?;
            Ok(())
        }),
        Ev::Named("first"),
    );
    let mut notices = es.notices();

    es.add_event(Ev::Named("first")).unwrap();
    assert!(es.wait_events_processed_async(WAIT).await.is_drained());
    drop(es);

    let stopped = tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            match notices.recv().await {
                Ok(n) if n.kind == NoticeKind::WorkerStopped => return true,
                Ok(_) => continue,
                Err(_) => return false,
            }
        }
    })
    .await;
    assert_eq!(stopped, Ok(true));
}
