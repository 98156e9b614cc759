//! Process-wide publish/subscribe.
//!
//! The [`EventBus`] is created once by the application and shared through an
//! `Arc`. Scenes never see the concrete bus; they publish through the
//! [`Emitter`] trait so that tests can hand them a recording fake instead.
//!
//! Payloads are passed as `&dyn Any`. A listener that expects a scene
//! downcasts it:
//!
//! ```ignore
//! bus.on(CURRENT_SCENE_READY, |payload| {
//!     if let Some(game) = payload.downcast_ref::<Game>() {
//!         log::info!("{} is ready", game.key());
//!     }
//! });
//! ```

use std::{
    any::Any,
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::{Mutex, MutexGuard};

/// Emitted by a scene once its display objects are in place.
pub const CURRENT_SCENE_READY: &str = "current-scene-ready";

pub type Listener = Arc<dyn Fn(&dyn Any) + Send + Sync>;

/// Handle returned by [`EventBus::on`] / [`EventBus::once`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Anything a scene can publish to.
pub trait Emitter: Send + Sync {
    /// Publish `event` with `payload`. Returns `true` if at least one
    /// listener received it.
    fn emit(&self, event: &str, payload: &dyn Any) -> bool;
}

struct Registration {
    id: ListenerId,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<HashMap<String, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.event_names())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&dyn Any) + Send + Sync + 'static,
    {
        self.register(event, Arc::new(listener), false)
    }

    /// Like [`on`](Self::on) but the listener is dropped after its first call.
    pub fn once<F>(&self, event: &str, listener: F) -> ListenerId
    where
        F: Fn(&dyn Any) + Send + Sync + 'static,
    {
        self.register(event, Arc::new(listener), true)
    }

    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let Some(registrations) = listeners.get_mut(event) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|r| r.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            listeners.remove(event);
        }
        removed
    }

    /// Drop every listener of `event`, or of all events when `None`.
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut listeners = self.lock();
        match event {
            Some(event) => {
                listeners.remove(event);
            }
            None => listeners.clear(),
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.lock().get(event).map_or(0, Vec::len)
    }

    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn register(&self, event: &str, listener: Listener, once: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock()
            .entry(event.to_string())
            .or_default()
            .push(Registration { id, once, listener });
        id
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.lock()
    }
}

impl Emitter for EventBus {
    fn emit(&self, event: &str, payload: &dyn Any) -> bool {
        // Snapshot under the lock, call outside of it so listeners may (un)subscribe.
        let snapshot: Vec<Listener> = {
            let mut listeners = self.lock();
            let Some(registrations) = listeners.get_mut(event) else {
                log::trace!("event {event:?} has no listeners");
                return false;
            };
            let snapshot: Vec<Listener> = registrations
                .iter()
                .map(|r| r.listener.clone())
                .collect();
            registrations.retain(|r| !r.once);
            if registrations.is_empty() {
                listeners.remove(event);
            }
            snapshot
        };
        log::debug!("emitting {event:?} to {} listener(s)", snapshot.len());
        snapshot.iter().for_each(|listener| listener(payload));
        !snapshot.is_empty()
    }
}
