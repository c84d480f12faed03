use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::events::{attach_handler, Channel, EventEmitter, EventObserver};
use crate::model::{Apartment, CreditCard, LifecycleEvent, Person};

use super::{LifecycleJournal, Settings};

/// Creates entities wired to a shared lifecycle channel and, depending on the
/// settings, journals and echoes everything that happens to them.
pub struct Town {
    settings: Settings,
    emitter: EventEmitter<LifecycleEvent>,
    observer: EventObserver<LifecycleEvent>,
    journal: Rc<RefCell<LifecycleJournal>>,
}

impl Default for Town {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Town {
    pub fn new(settings: Settings) -> Self {
        let (emitter, observer) = Channel::new();
        let journal = Rc::new(RefCell::new(LifecycleJournal::default()));
        if settings.keep_journal {
            attach_handler(&observer, &journal);
        }
        if settings.echo_trace {
            observer.subscribe(|event: &LifecycleEvent| println!("{event}"));
        }
        Self {
            settings,
            emitter,
            observer,
            journal,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn person(&self, name: impl Into<String>) -> Rc<Person> {
        Person::new(name, &self.emitter)
    }

    pub fn person_in(&self, name: impl Into<String>, apartment: Rc<Apartment>) -> Rc<Person> {
        Person::with_apartment(name, apartment, &self.emitter)
    }

    pub fn apartment(&self, unit: impl Into<String>) -> Rc<Apartment> {
        Apartment::new(unit, &self.emitter)
    }

    pub fn apartment_for(&self, unit: impl Into<String>, tenant: &Rc<Person>) -> Rc<Apartment> {
        Apartment::with_tenant(unit, tenant, &self.emitter)
    }

    pub fn credit_card(&self, number: impl Into<String>) -> Rc<CreditCard> {
        CreditCard::new(number, &self.emitter)
    }

    /// Snapshot of the journal; empty unless `keep_journal` is set.
    pub fn journal(&self) -> LifecycleJournal {
        self.journal.borrow().clone()
    }

    pub fn clear_journal(&self) {
        self.journal.borrow_mut().clear();
    }

    pub fn observer(&self) -> &EventObserver<LifecycleEvent> {
        &self.observer
    }

    /// Marker between steps of a scenario.
    pub fn note(&self, message: &str) {
        info!(target: "town", "{}", message);
        if self.settings.echo_trace {
            println!("{message}");
        }
    }
}
