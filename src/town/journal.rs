use crate::events::EventHandler;
use crate::model::{EntityKind, LifecycleEvent};

/// Every lifecycle event seen on a channel, in the order it was emitted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LifecycleJournal {
    events: Vec<LifecycleEvent>,
}

impl LifecycleJournal {
    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&LifecycleEvent) -> bool,
    {
        self.events.iter().filter(|event| predicate(*event)).count()
    }

    pub fn teardowns_of(&self, kind: EntityKind, subject: &str) -> usize {
        self.count(|event| event.is_teardown() && event.kind() == kind && event.subject() == subject)
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventHandler<LifecycleEvent> for LifecycleJournal {
    fn handle_event(&mut self, event: &LifecycleEvent) {
        self.events.push(event.clone());
    }
}
