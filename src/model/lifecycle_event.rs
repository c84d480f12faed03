use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::events::EventEmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Apartment,
    CreditCard,
}

impl EntityKind {
    pub fn log_target(&self) -> &'static str {
        match self {
            EntityKind::Person => "person",
            EntityKind::Apartment => "apartment",
            EntityKind::CreditCard => "credit_card",
        }
    }
}

/// Construction and teardown of an entity. `Display` renders the trace line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    PersonInitialized {
        name: String,
        apartment: Option<String>,
    },
    PersonDeinitialized {
        name: String,
    },
    ApartmentInitialized {
        unit: String,
        tenant: Option<String>,
    },
    /// `tenant` is whatever the weak back-reference still resolved to at teardown.
    ApartmentDeinitialized {
        unit: String,
        tenant: Option<String>,
    },
    CreditCardInitialized {
        number: String,
    },
    CreditCardDeinitialized {
        number: String,
    },
}

impl LifecycleEvent {
    pub fn kind(&self) -> EntityKind {
        match self {
            LifecycleEvent::PersonInitialized { .. } | LifecycleEvent::PersonDeinitialized { .. } => {
                EntityKind::Person
            }
            LifecycleEvent::ApartmentInitialized { .. }
            | LifecycleEvent::ApartmentDeinitialized { .. } => EntityKind::Apartment,
            LifecycleEvent::CreditCardInitialized { .. }
            | LifecycleEvent::CreditCardDeinitialized { .. } => EntityKind::CreditCard,
        }
    }

    /// Name, unit or card number of the entity the event is about.
    pub fn subject(&self) -> &str {
        match self {
            LifecycleEvent::PersonInitialized { name, .. }
            | LifecycleEvent::PersonDeinitialized { name } => name,
            LifecycleEvent::ApartmentInitialized { unit, .. }
            | LifecycleEvent::ApartmentDeinitialized { unit, .. } => unit,
            LifecycleEvent::CreditCardInitialized { number }
            | LifecycleEvent::CreditCardDeinitialized { number } => number,
        }
    }

    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::PersonDeinitialized { .. }
                | LifecycleEvent::ApartmentDeinitialized { .. }
                | LifecycleEvent::CreditCardDeinitialized { .. }
        )
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::PersonInitialized {
                name,
                apartment: Some(unit),
            } => write!(f, "Initializing Person({name}, {unit})"),
            LifecycleEvent::PersonInitialized {
                name,
                apartment: None,
            } => write!(f, "Initializing Person({name})"),
            LifecycleEvent::PersonDeinitialized { name } => write!(f, "Person {name} is deinit."),
            LifecycleEvent::ApartmentInitialized {
                unit,
                tenant: Some(tenant),
            } => write!(f, "Initializing Apartment({unit}, {tenant})"),
            LifecycleEvent::ApartmentInitialized { unit, tenant: None } => {
                write!(f, "Initializing Apartment({unit})")
            }
            LifecycleEvent::ApartmentDeinitialized {
                unit,
                tenant: Some(tenant),
            } => write!(f, "Apartment {unit} {tenant} was deinit"),
            LifecycleEvent::ApartmentDeinitialized { unit, tenant: None } => {
                write!(f, "Apartment {unit} was deinit")
            }
            LifecycleEvent::CreditCardInitialized { number } => {
                write!(f, "Initializing CreditCard({number})")
            }
            LifecycleEvent::CreditCardDeinitialized { number } => {
                write!(f, "CreditCard deinit({number})")
            }
        }
    }
}

/// Logs `event` under the entity's target and hands it to every listener.
pub(crate) fn announce(events: &EventEmitter<LifecycleEvent>, event: LifecycleEvent) {
    info!(target: event.kind().log_target(), "{}", event);
    events.emit(&event);
}
