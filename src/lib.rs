mod destroyable;
pub mod error;
pub mod events;
pub mod model;
pub mod town;

pub use destroyable::Destroyable;
pub use error::UnownedError;

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Once;
    use test_context::TestContext;

    use crate::events::{Channel, EventEmitter};
    use crate::model::LifecycleEvent;

    static INIT_LOGGER: Once = Once::new();

    pub struct UsingLogger;

    impl TestContext for UsingLogger {
        fn setup() -> UsingLogger {
            INIT_LOGGER.call_once(|| {
                let _ = env_logger::builder().is_test(true).try_init();
            });

            UsingLogger
        }

        fn teardown(self) {}
    }

    /// Emitter whose events are collected, in order, into the returned vector.
    pub fn recording_channel() -> (EventEmitter<LifecycleEvent>, Rc<RefCell<Vec<LifecycleEvent>>>) {
        let (emitter, observer) = Channel::new();
        let recorded = Rc::new(RefCell::new(Vec::new()));
        let recorded_clone = recorded.clone();
        observer.subscribe(move |event: &LifecycleEvent| {
            recorded_clone.borrow_mut().push(event.clone());
        });
        (emitter, recorded)
    }
}
