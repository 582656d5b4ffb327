use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Subscribers<T> {
    next_id: AtomicU64,
    // Keyed by subscription id, so iteration follows subscription order.
    entries: Mutex<BTreeMap<u64, Subscriber<T>>>,
    pending: Mutex<Pending<T>>,
}

/// Notifications waiting to be delivered. Only one pass drains it at a
/// time; a `set` made while a pass is running appends and returns.
struct Pending<T> {
    queue: VecDeque<(Subscriber<T>, T)>,
    draining: bool,
}

impl<T> Subscribers<T> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(BTreeMap::new()),
            pending: Mutex::new(Pending {
                queue: VecDeque::new(),
                draining: false,
            }),
        }
    }

    fn snapshot(&self) -> Vec<Subscriber<T>> {
        self.entries.lock().values().cloned().collect()
    }
}

/// A thread-safe observable value.
///
/// Every `set` or `update` notifies all current subscribers before it
/// returns. A `set` issued from inside a subscriber is queued behind the
/// notifications already in flight, so every subscriber sees values in the
/// order they were set and ends on the latest one. Cloning a `Writable`
/// gives another handle to the same value.
pub struct Writable<T> {
    value: Arc<RwLock<T>>,
    subscribers: Arc<Subscribers<T>>,
}

impl<T: Clone + Send + Sync + 'static> Writable<T> {
    /// Create a new cell holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            value: Arc::new(RwLock::new(initial)),
            subscribers: Arc::new(Subscribers::new()),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Read the value with a function without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, new_value: T) {
        *self.value.write() = new_value;
        self.notify();
    }

    /// Mutate the value in place and notify subscribers.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut value = self.value.write();
            f(&mut value);
        }
        self.notify();
    }

    /// Subscribe to the value.
    ///
    /// The callback runs immediately with the current value and then after
    /// every change. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = self.subscribers.next_id.fetch_add(1, Ordering::SeqCst);
        let callback: Subscriber<T> = Arc::new(callback);
        self.subscribers
            .entries
            .lock()
            .insert(id, Arc::clone(&callback));

        let current = self.get();
        callback(&current);

        let subscribers: Weak<Subscribers<T>> = Arc::downgrade(&self.subscribers);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(subscribers) = subscribers.upgrade() {
                    subscribers.entries.lock().remove(&id);
                }
            })),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.entries.lock().len()
    }

    fn notify(&self) {
        let current = self.get();
        let subscribers = self.subscribers.snapshot();
        {
            let mut pending = self.subscribers.pending.lock();
            pending
                .queue
                .extend(subscribers.into_iter().map(|s| (s, current.clone())));
            if pending.draining {
                // A set from inside a callback: the running pass delivers it
                // after everything already queued.
                return;
            }
            pending.draining = true;
        }

        let _drain = DrainGuard(&self.subscribers.pending);
        loop {
            let next = self.subscribers.pending.lock().queue.pop_front();
            // Callbacks run without any lock held so they may read the value,
            // set it, subscribe, or unsubscribe.
            match next {
                Some((subscriber, value)) => subscriber(&value),
                None => break,
            }
        }
    }
}

/// Ends a drain pass, even if a callback panics.
struct DrainGuard<'a, T>(&'a Mutex<Pending<T>>);

impl<T> Drop for DrainGuard<'_, T> {
    fn drop(&mut self) {
        let mut pending = self.0.lock();
        pending.draining = false;
        pending.queue.clear();
    }
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("value", &*self.value.read())
            .finish_non_exhaustive()
    }
}

/// RAII guard for a [`Writable`] subscription.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Remove the subscriber now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.remove.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Debug, PartialEq)]
    struct Draft {
        text: String,
        revision: usize,
    }

    #[test]
    fn writable_get_set() {
        let cell = Writable::new(Draft {
            text: "{}".to_string(),
            revision: 0,
        });

        assert_eq!(cell.get().revision, 0);

        cell.set(Draft {
            text: "a = 1".to_string(),
            revision: 1,
        });

        assert_eq!(cell.get().revision, 1);
        assert_eq!(cell.get().text, "a = 1");
    }

    #[test]
    fn writable_update() {
        let cell = Writable::new(Draft {
            text: String::new(),
            revision: 0,
        });

        cell.update(|draft| {
            draft.revision += 10;
        });

        assert_eq!(cell.get().revision, 10);
        assert_eq!(cell.with(|draft| draft.text.len()), 0);
    }

    #[test]
    fn subscriber_sees_current_value_immediately() {
        let cell = Writable::new(String::from("hello"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let _sub = cell.subscribe(move |value: &String| {
            seen_clone.lock().push(value.clone());
        });

        assert_eq!(*seen.lock(), vec!["hello".to_string()]);
    }

    #[test]
    fn subscribers_see_values_in_set_order() {
        let cell = Writable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let _sub = cell.subscribe(move |value| seen_clone.lock().push(*value));

        cell.set(1);
        cell.set(2);
        cell.update(|n| *n += 1);

        assert_eq!(*seen.lock(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn subscribers_are_notified_in_subscription_order() {
        let cell = Writable::new(0);
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let _a = cell.subscribe(move |_| first.lock().push("a"));
        let second = Arc::clone(&order);
        let _b = cell.subscribe(move |_| second.lock().push("b"));

        order.lock().clear();
        cell.set(7);

        assert_eq!(*order.lock(), vec!["a", "b"]);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let cell = Writable::new(0);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let sub = cell.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.subscriber_count(), 1);

        cell.set(1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        drop(sub);
        assert_eq!(cell.subscriber_count(), 0);

        cell.set(2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_is_explicit_too() {
        let cell = Writable::new(0);
        let sub = cell.subscribe(|_| {});
        sub.unsubscribe();
        assert_eq!(cell.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_cell_is_harmless() {
        let cell = Writable::new(0);
        let sub = cell.subscribe(|_| {});
        drop(cell);
        drop(sub);
    }

    #[test]
    fn callback_may_read_the_cell() {
        let cell = Writable::new(1);
        let reader = cell.clone();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let _sub = cell.subscribe(move |_| seen_clone.lock().push(reader.get()));
        cell.set(5);

        assert_eq!(*seen.lock(), vec![1, 5]);
    }

    #[test]
    fn nested_set_is_delivered_after_the_current_pass() {
        let cell = Writable::new(0);
        let writer = cell.clone();
        let seen_a = Arc::new(Mutex::new(Vec::new()));
        let seen_b = Arc::new(Mutex::new(Vec::new()));

        let a_log = Arc::clone(&seen_a);
        let _a = cell.subscribe(move |value| {
            a_log.lock().push(*value);
            if *value == 1 {
                writer.set(2);
            }
        });
        let b_log = Arc::clone(&seen_b);
        let _b = cell.subscribe(move |value| b_log.lock().push(*value));

        cell.set(1);

        assert_eq!(cell.get(), 2);
        assert_eq!(*seen_a.lock(), vec![0, 1, 2]);
        assert_eq!(*seen_b.lock(), vec![0, 1, 2]);
    }

    #[test]
    fn panicking_subscriber_does_not_wedge_the_cell() {
        let cell = Writable::new(0);
        let sub = cell.subscribe(|value| {
            if *value == 1 {
                panic!("subscriber failed");
            }
        });

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| cell.set(1)));
        assert!(result.is_err());
        drop(sub);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let _sub = cell.subscribe(move |value| seen_clone.lock().push(*value));
        cell.set(3);

        assert_eq!(*seen.lock(), vec![1, 3]);
    }

    #[test]
    fn clones_share_value_and_subscribers() {
        let cell = Writable::new(String::new());
        let other = cell.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let _sub = cell.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        other.set("Toml".to_string());

        assert_eq!(cell.get(), "Toml");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
