use crate::results::Detection;
use tokio::sync::mpsc;

pub mod file;
pub mod webdriver;

/// A trigger event for the detection pipeline.
///
/// Triggers are processed sequentially from one queue, so each check runs to
/// completion before the next starts; the session latch makes repeats a
/// no-op rather than requiring any cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The page finished its initial load
    DomReady,
    /// Fixed-delay re-check for UIs rendered asynchronously on the client
    DelayedRecheck,
    /// External "re-check now" signal; no payload beyond the discriminator
    Recheck,
}

/// Handle for an in-flight page watch: detection outcomes arrive on
/// `results`, and `triggers` lets the caller inject external re-checks.
/// Dropping `triggers` (once any delayed re-check has fired) lets the
/// driver wind down and report a negative outcome if nothing was found.
pub struct Watch {
    pub results: mpsc::Receiver<Detection>,
    pub triggers: mpsc::Sender<Trigger>,
}
