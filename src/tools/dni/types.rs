use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// The two marked phone links on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnchorSlot {
    /// Header link the call-tracking script rewrites.
    Primary,
    /// Footer link the script misses when it renders late.
    Footer,
}

/// What a phone link currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneAnchor {
    pub text: String,
    pub href: String,
}

/// Access to the rendered page.
///
/// Implementations find anchors by their marker attribute. The footer anchor
/// holds a leading label element and a trailing number element;
/// `update_footer_number` writes only the trailing one (plus the link target).
pub trait PhoneDom: Send {
    fn anchor(&self, slot: AnchorSlot) -> Result<Option<PhoneAnchor>>;
    fn update_footer_number(&mut self, text: &str, href: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DniOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for DniOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DniState {
    Idle,
    Polling,
    Stopped,
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// An anchor is missing or the primary number has not rendered yet.
    Waiting,
    /// Both links point at the same number. Either nothing was swapped yet or
    /// they already agree; polling continues either way.
    Unchanged,
    /// Footer rewritten; polling stopped.
    Synced,
    TimedOut,
    /// The page threw; polling stopped.
    Failed,
    /// Not polling.
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    Synced,
    TimedOut,
    Failed,
    Cancelled,
}

/// Summary handed back when a spawned poll ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DniReport {
    pub reason: StopReason,
    pub ticks: u32,
}
