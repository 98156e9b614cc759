use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use scene_ngin::{CURRENT_SCENE_READY, Emitter, EventBus};

#[test]
fn emit_without_listeners_returns_false() {
    let bus = EventBus::new();
    assert!(!bus.emit("nothing", &()));
}

#[test]
fn listeners_receive_payload_in_registration_order() {
    let bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    for tag in ["first", "second"] {
        let seen = seen.clone();
        bus.on("score", move |payload| {
            let score = payload.downcast_ref::<u32>().copied();
            seen.lock().unwrap().push((tag, score));
        });
    }

    assert!(bus.emit("score", &42u32));
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("first", Some(42)), ("second", Some(42))]
    );
}

#[test]
fn once_listener_fires_a_single_time() {
    let bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    bus.once(CURRENT_SCENE_READY, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(bus.listener_count(CURRENT_SCENE_READY), 1);

    assert!(bus.emit(CURRENT_SCENE_READY, &()));
    assert!(!bus.emit(CURRENT_SCENE_READY, &()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(bus.listener_count(CURRENT_SCENE_READY), 0);
}

#[test]
fn off_removes_only_the_given_listener() {
    let bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let a = {
        let calls = calls.clone();
        bus.on("tick", move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    let _b = {
        let calls = calls.clone();
        bus.on("tick", move |_| {
            calls.fetch_add(10, Ordering::SeqCst);
        })
    };

    assert!(bus.off("tick", a));
    assert!(!bus.off("tick", a));
    bus.emit("tick", &());
    assert_eq!(calls.load(Ordering::SeqCst), 10);
}

#[test]
fn remove_all_listeners_by_event_or_everything() {
    let bus = EventBus::new();
    bus.on("a", |_| {});
    bus.on("a", |_| {});
    bus.on("b", |_| {});
    assert_eq!(bus.event_names(), vec!["a".to_string(), "b".to_string()]);

    bus.remove_all_listeners(Some("a"));
    assert_eq!(bus.listener_count("a"), 0);
    assert_eq!(bus.listener_count("b"), 1);

    bus.remove_all_listeners(None);
    assert!(bus.event_names().is_empty());
}

#[test]
fn listeners_may_subscribe_while_handling_an_event() {
    let bus = Arc::new(EventBus::new());
    let inner_calls = Arc::new(AtomicUsize::new(0));
    {
        let bus_handle = bus.clone();
        let inner_calls = inner_calls.clone();
        bus.once("boot", move |_| {
            let inner_calls = inner_calls.clone();
            bus_handle.on("boot", move |_| {
                inner_calls.fetch_add(1, Ordering::SeqCst);
            });
        });
    }

    // The listener added during the first emit only sees later emits.
    bus.emit("boot", &());
    assert_eq!(inner_calls.load(Ordering::SeqCst), 0);
    bus.emit("boot", &());
    assert_eq!(inner_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn listeners_may_query_and_unsubscribe_while_handling_an_event() {
    let bus = Arc::new(EventBus::new());
    let seen_counts = Arc::new(Mutex::new(Vec::new()));
    let id = Arc::new(Mutex::new(None));
    {
        let bus_handle = bus.clone();
        let seen_counts = seen_counts.clone();
        let own_id = id.clone();
        let registered = bus.on("tick", move |_| {
            seen_counts
                .lock()
                .unwrap()
                .push(bus_handle.listener_count("tick"));
            if let Some(own_id) = *own_id.lock().unwrap() {
                assert!(bus_handle.off("tick", own_id));
            }
        });
        *id.lock().unwrap() = Some(registered);
    }

    assert!(bus.emit("tick", &()));
    assert!(!bus.emit("tick", &()));
    assert_eq!(*seen_counts.lock().unwrap(), vec![1]);
    assert!(bus.event_names().is_empty());
}

#[test]
fn bus_is_shared_across_threads() {
    let bus = Arc::new(EventBus::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bus = bus.clone();
            let calls = calls.clone();
            std::thread::spawn(move || {
                bus.on("spawned", move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(bus.listener_count("spawned"), 4);
    assert!(bus.emit("spawned", &()));
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}
