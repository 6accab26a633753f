use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Progress reported by the conversion steps.
///
/// Events are advisory only: nothing in the pipeline reads them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Deleted { path: PathBuf },
    Replaced { path: PathBuf },
    Skipped { path: PathBuf, reason: String },
    Copied { path: PathBuf },
    Appended { path: PathBuf },
    HookRan { hook: String },
}

pub trait Notifier {
    fn notify(&mut self, event: Event);
}

/// Collects events in order; used by tests and by callers that render output afterwards.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn deleted(&self) -> Vec<PathBuf> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Deleted { path } => Some(path.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for EventLog {
    fn notify(&mut self, event: Event) {
        self.events.push(event);
    }
}
