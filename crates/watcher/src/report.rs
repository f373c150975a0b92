//! Event reporting
//!
//! The engine pushes every detected change through an [`EventSink`]. The
//! stock sink is [`ConsoleReporter`], which writes one colored line per
//! event to stdout; tests substitute a collecting sink.

use crate::event::{Event, EventKind};
use owo_colors::{AnsiColors, OwoColorize};
use std::io::IsTerminal;

/// Consumer of change events
///
/// Reporting must never fail back into the poll loop, so the contract is
/// infallible: a sink that cannot present an event is expected to degrade
/// (e.g. drop the styling), not error.
pub trait EventSink {
    fn report(&mut self, event: &Event);
}

/// Display color for each event kind
///
/// Total by construction: the match is exhaustive over [`EventKind`], so
/// every event classifies to exactly one color.
fn color_for(kind: EventKind) -> AnsiColors {
    match kind {
        EventKind::Created => AnsiColors::Green,
        EventKind::Deleted => AnsiColors::Red,
        EventKind::Accessed => AnsiColors::Blue,
        EventKind::Modified => AnsiColors::Yellow,
        EventKind::NotFound => AnsiColors::BrightRed,
    }
}

/// Writes events to stdout as `<timestamp>: <path> has been <kind>`
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    /// Reporter with color enabled iff stdout is a terminal
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Override color handling (e.g. a `--no-color` flag, or piped output)
    pub fn with_color(color: bool) -> Self {
        Self { color }
    }

    fn format_line(event: &Event) -> String {
        format!(
            "{}: {} has been {}",
            event.formatted_timestamp(),
            event.path.display(),
            event.kind.label()
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleReporter {
    fn report(&mut self, event: &Event) {
        let line = Self::format_line(event);
        if self.color {
            println!("{}", line.color(color_for(event.kind)));
        } else {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_color_mapping() {
        assert!(matches!(color_for(EventKind::Created), AnsiColors::Green));
        assert!(matches!(color_for(EventKind::Deleted), AnsiColors::Red));
        assert!(matches!(color_for(EventKind::Accessed), AnsiColors::Blue));
        assert!(matches!(color_for(EventKind::Modified), AnsiColors::Yellow));
        assert!(matches!(color_for(EventKind::NotFound), AnsiColors::BrightRed));
    }

    #[test]
    fn test_line_format() {
        let event = Event::now(PathBuf::from("notes/todo.txt"), EventKind::Deleted);
        let line = ConsoleReporter::format_line(&event);

        assert!(line.ends_with("notes/todo.txt has been deleted"));
        assert!(line.contains(": "));
    }

    #[test]
    fn test_plain_reporter_does_not_panic() {
        let mut reporter = ConsoleReporter::with_color(false);
        reporter.report(&Event::now(PathBuf::from("a"), EventKind::NotFound));
    }
}
