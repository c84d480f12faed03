mod apartment;
mod credit_card;
mod lifecycle_event;
mod person;
mod unowned;

pub use apartment::Apartment;
pub use credit_card::CreditCard;
pub use lifecycle_event::{EntityKind, LifecycleEvent};
pub use person::Person;
pub use unowned::Unowned;
