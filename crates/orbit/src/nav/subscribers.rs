use super::state::NavigationEvent;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Callback = Rc<RefCell<dyn FnMut(&NavigationEvent)>>;

struct Entry {
    id: u64,
    live: Rc<Cell<bool>>,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

#[derive(Default)]
pub struct Subscribers {
    registry: Rc<RefCell<Registry>>,
}

/// Handle returned by `subscribe`. Dropping it keeps the callback registered.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    live: Rc<Cell<bool>>,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        self.live.set(false);
        if let Some(shared) = self.registry.upgrade()
            && let Ok(mut registry) = shared.try_borrow_mut()
        {
            registry.entries.retain(|e| e.id != self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.live.get()
    }
}

impl Subscribers {
    pub fn subscribe(&self, callback: impl FnMut(&NavigationEvent) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;

        let live = Rc::new(Cell::new(true));
        registry.entries.push(Entry {
            id,
            live: live.clone(),
            callback: Rc::new(RefCell::new(callback)),
        });

        Subscription {
            id,
            live,
            registry: Rc::downgrade(&self.registry),
        }
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut registry = self.registry.borrow_mut();
        registry.entries.iter().for_each(|e| e.live.set(false));
        registry.entries.clear();
    }

    /// Works on a snapshot of the list. Panics are caught and logged.
    pub fn dispatch(&self, event: &NavigationEvent) {
        let pass: Vec<(Rc<Cell<bool>>, Callback)> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|e| (e.live.clone(), e.callback.clone()))
            .collect();

        for (live, entry) in pass {
            if !live.get() {
                continue;
            }
            let Ok(mut callback) = entry.try_borrow_mut() else {
                log::warn!("Skipping re-entrant subscriber for {} event", event.kind);
                continue;
            };
            let result = panic::catch_unwind(AssertUnwindSafe(|| (*callback)(event)));
            if result.is_err() {
                log::error!("Subscriber panicked while handling {} event", event.kind);
            }
        }

        // unsubscribes that happened mid-dispatch could not borrow the list
        self.registry.borrow_mut().entries.retain(|e| e.live.get());
    }
}
