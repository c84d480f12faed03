use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use super::{EventObserver, SubscriptionId};

/// Stateful consumer of events, e.g. a journal recording every lifecycle event.
pub trait EventHandler<T> {
    fn handle_event(&mut self, event: &T);
}

/// Routes every event seen by `observer` into `handler`.
///
/// The subscription only holds a weak handle, so the observer never keeps the
/// handler alive; once the handler is dropped further events are ignored. An
/// event arriving while the handler is already borrowed is skipped with a
/// warning, so emitting from a `Drop` impl never panics.
pub fn attach_handler<T, H>(observer: &EventObserver<T>, handler: &Rc<RefCell<H>>) -> SubscriptionId
where
    T: std::fmt::Debug + 'static,
    H: EventHandler<T> + 'static,
{
    let weak_handler = Rc::downgrade(handler);
    observer.subscribe(move |event: &T| {
        let Some(handler) = weak_handler.upgrade() else {
            return;
        };
        match handler.try_borrow_mut() {
            Ok(mut handler) => handler.handle_event(event),
            Err(_) => warn!(target: "events", "Handler busy, dropping event {:?}", event),
        };
    })
}
