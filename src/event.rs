//! Terminal event types and listener trait.
//!
//! Events flow outward from the terminal state machine and the session to
//! the host. The `EventListener` trait decouples the core from any UI
//! framework; tests use `VoidListener`.

/// Events delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// New content was parsed — drain dirty rows and redraw.
    Wakeup,
    /// BEL received. Advisory; no grid effect.
    Bell,
    /// Window title changed (OSC 0/1/2).
    Title(String),
    /// The child process exited with the given status code (-1 when
    /// killed by a signal).
    ChildExit(i32),
}

/// Receives terminal events.
///
/// Bound `Send + 'static` because the PTY reader context fires events from
/// a background thread.
pub trait EventListener: Send + 'static {
    /// Handle a terminal event. Default: no-op.
    fn send_event(&self, _event: Event) {}
}

/// No-op event listener for tests and headless operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidListener;

impl EventListener for VoidListener {}

#[cfg(test)]
mod tests {
    use super::{Event, EventListener, VoidListener};

    #[test]
    fn void_listener_accepts_events() {
        let listener = VoidListener;
        listener.send_event(Event::Bell);
        listener.send_event(Event::Title("shell".into()));
    }

    #[test]
    fn events_compare_by_payload() {
        assert_eq!(Event::Title("a".into()), Event::Title("a".into()));
        assert_ne!(Event::ChildExit(0), Event::ChildExit(-1));
    }
}
