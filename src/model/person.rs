use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::destroyable::Destroyable;
use crate::events::EventEmitter;

use super::lifecycle_event::announce;
use super::{Apartment, CreditCard, LifecycleEvent};

/// Owns (strongly) the apartment it lives in and its credit card.
#[readonly::make]
pub struct Person {
    pub name: String,
    apartment: RefCell<Option<Rc<Apartment>>>,
    credit_card: RefCell<Option<Rc<CreditCard>>>,
    events: EventEmitter<LifecycleEvent>,
}

impl Person {
    pub fn new(name: impl Into<String>, events: &EventEmitter<LifecycleEvent>) -> Rc<Self> {
        Self::build(name.into(), None, events)
    }

    /// Does not set the apartment's tenant; see [`Apartment::set_tenant`].
    pub fn with_apartment(
        name: impl Into<String>,
        apartment: Rc<Apartment>,
        events: &EventEmitter<LifecycleEvent>,
    ) -> Rc<Self> {
        Self::build(name.into(), Some(apartment), events)
    }

    fn build(
        name: String,
        apartment: Option<Rc<Apartment>>,
        events: &EventEmitter<LifecycleEvent>,
    ) -> Rc<Self> {
        announce(
            events,
            LifecycleEvent::PersonInitialized {
                name: name.clone(),
                apartment: apartment.as_ref().map(|apartment| apartment.unit.clone()),
            },
        );
        Rc::new(Self {
            name,
            apartment: RefCell::new(apartment),
            credit_card: RefCell::new(None),
            events: events.clone(),
        })
    }

    pub fn apartment(&self) -> Option<Rc<Apartment>> {
        self.apartment.borrow().clone()
    }

    pub fn credit_card(&self) -> Option<Rc<CreditCard>> {
        self.credit_card.borrow().clone()
    }

    /// Replaces the current apartment. A previous apartment with no other owner
    /// is torn down here.
    pub fn set_apartment(&self, apartment: Rc<Apartment>) {
        trace!(target: "person", "{} moves into {}", self.name, apartment.unit);
        let previous = self.apartment.replace(Some(apartment));
        drop(previous);
    }

    pub fn set_credit_card(&self, credit_card: Rc<CreditCard>) {
        trace!(target: "person", "{} holds card {}", self.name, credit_card.number);
        let previous = self.credit_card.replace(Some(credit_card));
        drop(previous);
    }
}

impl Destroyable for Person {
    fn destroy(&self) {
        let apartment = self.apartment.take();
        let credit_card = self.credit_card.take();
        trace!(
            target: "person",
            "{} releases apartment {:?} and card {:?}",
            self.name,
            apartment.as_ref().map(|apartment| apartment.unit.as_str()),
            credit_card.as_ref().map(|card| card.number.as_str())
        );
        drop(apartment);
        drop(credit_card);
    }
}

impl Drop for Person {
    fn drop(&mut self) {
        announce(
            &self.events,
            LifecycleEvent::PersonDeinitialized {
                name: self.name.clone(),
            },
        );
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && *self.apartment.borrow() == *other.apartment.borrow()
    }
}

impl fmt::Debug for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Person")
            .field("name", &self.name)
            .field(
                "apartment",
                &self.apartment.borrow().as_ref().map(|apartment| apartment.unit.clone()),
            )
            .field(
                "credit_card",
                &self.credit_card.borrow().as_ref().map(|card| card.number.clone()),
            )
            .finish()
    }
}
