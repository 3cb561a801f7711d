//! Action enum — operator intents and internal events.

/// Identifies a console panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    Header,
    QuoteBar,
    NetworkTable,
    Footer,
}

/// All actions that can flow through the console.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Flip the lab flag of a hardware address.
    ToggleLab(String),
    /// Scan now without waiting for the countdown.
    Rescan,
    /// A scan (timed or manual) finished and the store is up to date.
    ScanCompleted,
    Quit,
}
