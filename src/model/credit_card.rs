use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::trace;

use crate::destroyable::Destroyable;
use crate::error::UnownedError;
use crate::events::EventEmitter;

use super::lifecycle_event::announce;
use super::{LifecycleEvent, Person, Unowned};

/// Refers to its owner through an [`Unowned`] reference: the owner is expected
/// to outlive the card.
#[readonly::make]
pub struct CreditCard {
    pub number: String,
    owner: RefCell<Option<Unowned<Person>>>,
    events: EventEmitter<LifecycleEvent>,
}

impl CreditCard {
    pub fn new(number: impl Into<String>, events: &EventEmitter<LifecycleEvent>) -> Rc<Self> {
        let number = number.into();
        announce(
            events,
            LifecycleEvent::CreditCardInitialized {
                number: number.clone(),
            },
        );
        Rc::new(Self {
            number,
            owner: RefCell::new(None),
            events: events.clone(),
        })
    }

    pub fn set_owner(&self, owner: &Rc<Person>) {
        trace!(target: "credit_card", "{} is owned by {}", self.number, owner.name);
        *self.owner.borrow_mut() = Some(Unowned::new(owner));
    }

    /// `Ok(None)` if no owner was ever set. Reading an owner that has already
    /// been released is an error rather than a dangling read.
    pub fn owner(&self) -> Result<Option<Rc<Person>>, UnownedError> {
        self.owner.borrow().as_ref().map(Unowned::get).transpose()
    }
}

impl Destroyable for CreditCard {
    fn destroy(&self) {
        trace!(target: "credit_card", "{} drops its owner reference", self.number);
        self.owner.borrow_mut().take();
    }
}

impl Drop for CreditCard {
    fn drop(&mut self) {
        announce(
            &self.events,
            LifecycleEvent::CreditCardDeinitialized {
                number: self.number.clone(),
            },
        );
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &self.number)
            .field("owner", &*self.owner.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::tests::{recording_channel, UsingLogger};

    #[test_context(UsingLogger)]
    #[test]
    fn test_owner_round_trip(_: &mut UsingLogger) {
        let (events, _recorded) = recording_channel();
        let card = CreditCard::new("1234", &events);
        assert_eq!(card.owner(), Ok(None));

        let person = Person::new("John", &events);
        card.set_owner(&person);
        person.set_credit_card(card.clone());

        let owner = card.owner().unwrap().unwrap();
        assert!(Rc::ptr_eq(&owner, &person));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_owner_and_card_are_released_together(_: &mut UsingLogger) {
        let (events, recorded) = recording_channel();
        let person = Person::new("John", &events);
        let card = CreditCard::new("1234", &events);
        card.set_owner(&person);
        person.set_credit_card(card);

        drop(person);
        let teardowns: Vec<String> = recorded
            .borrow()
            .iter()
            .filter(|event| event.is_teardown())
            .map(|event| event.to_string())
            .collect();
        assert_eq!(
            teardowns,
            vec!["Person John is deinit.", "CreditCard deinit(1234)"]
        );
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_owner_read_after_release_is_an_error(_: &mut UsingLogger) {
        let (events, _recorded) = recording_channel();
        let card = CreditCard::new("1234", &events);
        let person = Person::new("John", &events);
        card.set_owner(&person);

        drop(person);
        assert!(matches!(
            card.owner(),
            Err(UnownedError::Deallocated { .. })
        ));

        card.destroy();
        assert_eq!(card.owner(), Ok(None));
    }
}
