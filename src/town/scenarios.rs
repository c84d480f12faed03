use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::debug;

use crate::destroyable::Destroyable;
use crate::error::UnownedError;
use crate::events::{attach_handler, EventObserver, SubscriptionId};
use crate::model::{CreditCard, EntityKind, LifecycleEvent, Person};

use super::{LifecycleJournal, Town};

/// Journals the events emitted while a scenario runs; unsubscribes on drop.
struct Recorder<'a> {
    observer: &'a EventObserver<LifecycleEvent>,
    subscription: SubscriptionId,
    journal: Rc<RefCell<LifecycleJournal>>,
}

impl<'a> Recorder<'a> {
    fn start(town: &'a Town) -> Self {
        let journal = Rc::new(RefCell::new(LifecycleJournal::default()));
        let subscription = attach_handler(town.observer(), &journal);
        Self {
            observer: town.observer(),
            subscription,
            journal,
        }
    }

    fn teardowns_of(&self, kind: EntityKind, subject: &str) -> usize {
        self.journal.borrow().teardowns_of(kind, subject)
    }

    fn last_apartment_tenant(&self, unit: &str) -> Option<String> {
        self.journal
            .borrow()
            .events()
            .iter()
            .rev()
            .find_map(|event| match event {
                LifecycleEvent::ApartmentDeinitialized {
                    unit: seen_unit,
                    tenant,
                } if seen_unit == unit => Some(tenant.clone()),
                _ => None,
            })
            .flatten()
    }
}

impl Drop for Recorder<'_> {
    fn drop(&mut self) {
        self.observer.unsubscribe(self.subscription);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCountingReport {
    /// Whether the weak handle still resolved after each strong release.
    pub weak_alive_after_release: [bool; 3],
    pub strong_count_after_release: [usize; 3],
    pub teardowns: usize,
}

/// Three strong handles and one weak handle to the same person, released one
/// strong handle at a time.
pub fn reference_counting(town: &Town) -> ReferenceCountingReport {
    let recorder = Recorder::start(town);
    let ref1 = town.person("John");
    let ref2 = Rc::clone(&ref1);
    let ref3 = Rc::clone(&ref1);
    let ref4: Weak<Person> = Rc::downgrade(&ref1);

    let mut weak_alive_after_release = [false; 3];
    let mut strong_count_after_release = [0; 3];
    let mut observe = |step: usize| {
        weak_alive_after_release[step] = ref4.upgrade().is_some();
        strong_count_after_release[step] = ref4.strong_count();
    };

    town.note("0");
    drop(ref1);
    observe(0);
    town.note("1");
    drop(ref2);
    observe(1);
    town.note("2");
    town.note(&format!("ref4 = {:?}", ref4.upgrade()));
    town.note(&format!("ref3 = {:?}", ref3));
    drop(ref3);
    observe(2);
    town.note("3");
    town.note(&format!("ref4 = {:?}", ref4.upgrade()));

    ReferenceCountingReport {
        weak_alive_after_release,
        strong_count_after_release,
        teardowns: recorder.teardowns_of(EntityKind::Person, "John"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationReport {
    pub tenant: Option<String>,
    /// The apartment's own handle is gone but the person still owns it.
    pub apartment_alive_via_person: bool,
    pub person_strong_count: usize,
    pub apartment_released_with_person: bool,
}

/// A person moves into an apartment that points back at them.
pub fn associate_person_with_apartment(town: &Town) -> AssociationReport {
    let person = town.person("John");
    let apartment = town.apartment("A88");

    person.set_apartment(apartment.clone());
    apartment.set_tenant(&person);
    let tenant = apartment.tenant().map(|tenant| tenant.name.clone());

    let weak_apartment = Rc::downgrade(&apartment);
    drop(apartment);
    let apartment_alive_via_person = weak_apartment.upgrade().is_some();
    let person_strong_count = Rc::strong_count(&person);

    drop(person);
    AssociationReport {
        tenant,
        apartment_alive_via_person,
        person_strong_count,
        apartment_released_with_person: weak_apartment.upgrade().is_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializationReport {
    pub alive_before_release: bool,
    /// Teardown already happened when the statement after the release runs.
    pub torn_down_after_release: bool,
}

pub fn initialization(town: &Town) -> InitializationReport {
    let recorder = Recorder::start(town);
    let person = town.person("Junior");

    town.note("Before set person to nil");
    let alive_before_release = recorder.teardowns_of(EntityKind::Person, "Junior") == 0;
    drop(person);
    let torn_down_after_release = recorder.teardowns_of(EntityKind::Person, "Junior") == 1;
    town.note("After set person to nil");

    InitializationReport {
        alive_before_release,
        torn_down_after_release,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditCardReport {
    pub owner_while_alive: Option<String>,
    pub owner_after_release: Result<Option<String>, UnownedError>,
}

fn owner_name(card: &CreditCard) -> Result<Option<String>, UnownedError> {
    card.owner()
        .map(|owner| owner.map(|owner| owner.name.clone()))
}

/// A card kept alive past its owner, which the unowned reference reports
/// instead of dereferencing.
pub fn credit_card_ownership(town: &Town) -> CreditCardReport {
    let person = town.person("John");
    let card = town.credit_card("1234-5678");
    card.set_owner(&person);
    person.set_credit_card(card.clone());

    let owner_while_alive = owner_name(&card).unwrap_or_default();

    drop(person);
    let owner_after_release = owner_name(&card);
    if let Err(err) = &owner_after_release {
        debug!(target: "credit_card", "{}", err);
    }

    CreditCardReport {
        owner_while_alive,
        owner_after_release,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownOrderReport {
    /// Tenant named by the apartment when it goes before its tenant.
    pub apartment_released_first: Option<String>,
    /// Tenant named by the apartment when its tenant goes first.
    pub tenant_released_first: Option<String>,
}

/// The tenant an apartment reports at teardown depends on which of the two is
/// released first; only "absent once released" is guaranteed.
pub fn apartment_teardown_order(town: &Town) -> TeardownOrderReport {
    let recorder = Recorder::start(town);

    let person = town.person("John");
    let apartment = town.apartment_for("A88", &person);
    person.set_apartment(apartment);
    person.destroy();
    let apartment_released_first = recorder.last_apartment_tenant("A88");
    drop(person);

    let person = town.person("Jane");
    let apartment = town.apartment_for("B12", &person);
    person.set_apartment(apartment);
    drop(person);
    let tenant_released_first = recorder.last_apartment_tenant("B12");

    TeardownOrderReport {
        apartment_released_first,
        tenant_released_first,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSummary {
    pub reference_counting: ReferenceCountingReport,
    pub association: AssociationReport,
    pub initialization: InitializationReport,
    pub credit_card: CreditCardReport,
    pub teardown_order: TeardownOrderReport,
}

pub fn run_all(town: &Town) -> ScenarioSummary {
    town.note("-- reference counting");
    let reference_counting = reference_counting(town);
    town.note("-- associate person with apartment");
    let association = associate_person_with_apartment(town);
    town.note("-- initialization");
    let initialization = initialization(town);
    town.note("-- credit card ownership");
    let credit_card = credit_card_ownership(town);
    town.note("-- apartment teardown order");
    let teardown_order = apartment_teardown_order(town);

    ScenarioSummary {
        reference_counting,
        association,
        initialization,
        credit_card,
        teardown_order,
    }
}
