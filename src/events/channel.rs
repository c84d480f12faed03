use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use log::trace;

pub type Callback<T> = Rc<dyn Fn(&T)>;
pub type SubscriptionId = u64;

/// Sending half of a [`Channel`]. Entities keep a clone and emit their lifecycle
/// events through it.
pub struct EventEmitter<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

pub struct EventObserver<T: std::fmt::Debug> {
    channel: Channel<T>,
}

impl<T: std::fmt::Debug> Clone for EventObserver<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

/// Single-threaded broadcast channel. Listeners fire in subscription order.
pub struct Channel<T: std::fmt::Debug> {
    listeners: Rc<RefCell<BTreeMap<SubscriptionId, Callback<T>>>>,
    next_id: Rc<Cell<SubscriptionId>>,
}

impl<T: std::fmt::Debug> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
            next_id: Rc::clone(&self.next_id),
        }
    }
}

impl<T: std::fmt::Debug> Channel<T> {
    pub fn new() -> (EventEmitter<T>, EventObserver<T>) {
        let channel = Channel {
            listeners: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
        };
        (
            EventEmitter {
                channel: channel.clone(),
            },
            EventObserver { channel },
        )
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.borrow_mut().remove(&id).is_some()
    }

    pub fn emit(&self, data: &T) {
        // Snapshot so a listener may subscribe, unsubscribe or trigger a nested
        // emit (e.g. by dropping the last handle to another entity).
        let listeners: Vec<Callback<T>> = self.listeners.borrow().values().cloned().collect();
        trace!(target: "events", "Emitting event to {} listeners: {:?}", listeners.len(), data);
        for listener in listeners {
            listener(data);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

impl<T: std::fmt::Debug> EventEmitter<T> {
    pub fn emit(&self, data: &T) {
        self.channel.emit(data);
    }

    pub fn has_listeners(&self) -> bool {
        self.channel.listener_count() > 0
    }
}

impl<T: std::fmt::Debug> EventObserver<T> {
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.channel.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.channel.listener_count()
    }

    pub fn clear(&self) {
        self.channel.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsubscribe_during_emit_applies_to_next_emit() {
        let (emitter, observer) = Channel::<u8>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let later_id = Rc::new(Cell::new(None));

        let remover = observer.clone();
        let later_id_clone = later_id.clone();
        observer.subscribe(move |_| {
            if let Some(id) = later_id_clone.take() {
                assert!(remover.unsubscribe(id));
            }
        });
        let seen_clone = seen.clone();
        later_id.set(Some(
            observer.subscribe(move |data: &u8| seen_clone.borrow_mut().push(*data)),
        ));

        // The listener removed mid-emit still sees the event already in flight.
        emitter.emit(&1);
        emitter.emit(&2);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(emitter.channel.listener_count(), 1);
    }

    #[test]
    fn test_listeners_fire_in_subscription_order() {
        let (emitter, observer) = Channel::<&'static str>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let seen = seen.clone();
            observer.subscribe(move |data: &&'static str| {
                seen.borrow_mut().push(format!("{tag}:{data}"));
            });
        }

        emitter.emit(&"ping");
        assert_eq!(
            *seen.borrow(),
            vec!["first:ping", "second:ping", "third:ping"]
        );
    }

    #[test]
    fn test_nested_emit_from_listener() {
        let (emitter, observer) = Channel::<u8>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_emitter = emitter.clone();
        observer.subscribe(move |data: &u8| {
            if *data == 1 {
                inner_emitter.emit(&2);
            }
        });
        let seen_clone = seen.clone();
        observer.subscribe(move |data: &u8| seen_clone.borrow_mut().push(*data));

        emitter.emit(&1);
        assert_eq!(*seen.borrow(), vec![2, 1]);
    }

    #[test]
    fn test_subscribe_during_emit() {
        let (emitter, observer) = Channel::<u8>::new();
        let late_observer = observer.clone();
        observer.subscribe(move |_| {
            late_observer.subscribe(|_| {});
        });

        emitter.emit(&0);
        assert!(emitter.has_listeners());
        assert_eq!(emitter.channel.listener_count(), 2);
    }

    #[test]
    fn test_unsubscribe_keeps_remaining_order() {
        let (emitter, observer) = Channel::<char>::new();
        let seen = Rc::new(RefCell::new(String::new()));
        let subscribe_tag = |tag: char| {
            let seen = seen.clone();
            observer.subscribe(move |data: &char| {
                let mut seen = seen.borrow_mut();
                seen.push(tag);
                seen.push(*data);
            })
        };

        let _a = subscribe_tag('a');
        let b = subscribe_tag('b');
        let _c = subscribe_tag('c');
        assert!(observer.unsubscribe(b));
        assert!(!observer.unsubscribe(b));

        let d = subscribe_tag('d');
        assert!(d > b);

        emitter.emit(&'!');
        assert_eq!(*seen.borrow(), "a!c!d!");
    }

    #[test]
    fn test_clear_drops_all_listeners() {
        let (emitter, observer) = Channel::<i32>::new();
        observer.subscribe(|_| {});
        observer.subscribe(|_| {});
        assert!(emitter.has_listeners());

        observer.clear();
        assert!(!emitter.has_listeners());
    }
}
