mod journal;
pub mod scenarios;
pub mod settings;
mod world;

pub use journal::LifecycleJournal;
pub use settings::Settings;
pub use world::Town;
