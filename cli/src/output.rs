use std::io::Write;

use colored::Colorize;
use slim_scaffold::{Event, Notifier};

/// Label and subject of the line printed for an event.
pub(crate) fn event_parts(event: &Event) -> (&'static str, String) {
    match event {
        Event::Deleted { path } => ("Deleted", path.display().to_string()),
        Event::Replaced { path } => ("Replace", path.display().to_string()),
        Event::Skipped { reason, .. } => ("SKIP :", reason.clone()),
        Event::Copied { path } => ("Copied", path.display().to_string()),
        Event::Appended { path } => ("Append", path.display().to_string()),
        Event::HookRan { hook } => ("Ran", hook.clone()),
    }
}

pub(crate) fn event_line(event: &Event) -> String {
    let (label, subject) = event_parts(event);
    format!("{label} {subject}")
}

/// Prints one line per event. Write failures are remembered and surfaced after the run.
pub(crate) struct TerminalNotifier<W: Write> {
    out: W,
    error: Option<std::io::Error>,
}

impl<W: Write> TerminalNotifier<W> {
    pub(crate) fn new(out: W) -> Self {
        Self { out, error: None }
    }

    pub(crate) fn finish(self) -> std::io::Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<W: Write> Notifier for TerminalNotifier<W> {
    fn notify(&mut self, event: Event) {
        if self.error.is_some() {
            return;
        }
        let (label, subject) = event_parts(&event);
        let label = match event {
            Event::Skipped { .. } => label.yellow(),
            _ => label.bright_black(),
        };
        if let Err(err) = writeln!(self.out, "{label} {subject}") {
            self.error = Some(err);
        }
    }
}
