use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::trace;

use crate::destroyable::Destroyable;
use crate::events::EventEmitter;

use super::lifecycle_event::announce;
use super::{LifecycleEvent, Person};

/// Points back at its tenant weakly, so a tenant that also owns the apartment
/// does not form a cycle.
#[readonly::make]
pub struct Apartment {
    pub unit: String,
    tenant: RefCell<Weak<Person>>,
    events: EventEmitter<LifecycleEvent>,
}

impl Apartment {
    pub fn new(unit: impl Into<String>, events: &EventEmitter<LifecycleEvent>) -> Rc<Self> {
        Self::build(unit.into(), None, events)
    }

    /// Does not set the tenant's apartment; see [`Person::set_apartment`].
    pub fn with_tenant(
        unit: impl Into<String>,
        tenant: &Rc<Person>,
        events: &EventEmitter<LifecycleEvent>,
    ) -> Rc<Self> {
        Self::build(unit.into(), Some(tenant), events)
    }

    fn build(
        unit: String,
        tenant: Option<&Rc<Person>>,
        events: &EventEmitter<LifecycleEvent>,
    ) -> Rc<Self> {
        announce(
            events,
            LifecycleEvent::ApartmentInitialized {
                unit: unit.clone(),
                tenant: tenant.map(|tenant| tenant.name.clone()),
            },
        );
        Rc::new(Self {
            unit,
            tenant: RefCell::new(tenant.map(Rc::downgrade).unwrap_or_default()),
            events: events.clone(),
        })
    }

    /// The current tenant, or `None` once that tenant has been released.
    pub fn tenant(&self) -> Option<Rc<Person>> {
        self.tenant.borrow().upgrade()
    }

    pub fn set_tenant(&self, tenant: &Rc<Person>) {
        trace!(target: "apartment", "{} now lets to {}", self.unit, tenant.name);
        *self.tenant.borrow_mut() = Rc::downgrade(tenant);
    }
}

impl Destroyable for Apartment {
    fn destroy(&self) {
        trace!(target: "apartment", "{} forgets its tenant", self.unit);
        *self.tenant.borrow_mut() = Weak::new();
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        // Depends on teardown order: a tenant released first reads as absent.
        let tenant = self.tenant().map(|tenant| tenant.name.clone());
        announce(
            &self.events,
            LifecycleEvent::ApartmentDeinitialized {
                unit: self.unit.clone(),
                tenant,
            },
        );
    }
}

/// Tenants compare by identity, not by value.
impl PartialEq for Apartment {
    fn eq(&self, other: &Self) -> bool {
        let same_tenant = match (self.tenant(), other.tenant()) {
            (Some(mine), Some(theirs)) => Rc::ptr_eq(&mine, &theirs),
            (None, None) => true,
            _ => false,
        };
        same_tenant && self.unit == other.unit
    }
}

impl fmt::Debug for Apartment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Apartment")
            .field("unit", &self.unit)
            .field("tenant", &self.tenant().map(|tenant| tenant.name.clone()))
            .finish()
    }
}
