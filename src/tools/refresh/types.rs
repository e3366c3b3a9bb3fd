use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::Result;

/// The page-side surface of the call-tracking script.
pub trait ScriptHost {
    /// Whether the script's global event queue array exists.
    fn has_queue(&self) -> bool;
    fn push_queue_event(&mut self, event: &Value) -> Result<()>;
    fn has_function(&self, name: &str) -> bool;
    fn call_function(&mut self, name: &str) -> Result<()>;
    /// Remove script tags carrying `marker`; returns how many were removed.
    fn remove_scripts(&mut self, marker: &str) -> Result<usize>;
    fn append_script(&mut self, src: &str, marker: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RefreshReason {
    InitialLoad,
    Navigation { path: String },
}

impl RefreshReason {
    /// Event pushed onto the script's queue.
    pub fn event(&self) -> Value {
        match self {
            RefreshReason::InitialLoad => json!({"event": "refresh", "reason": "initial_load"}),
            RefreshReason::Navigation { path } => {
                json!({"event": "refresh", "reason": "navigation", "path": path})
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RefreshStrategy {
    QueueEvent,
    Rescan { function: String },
    Reinject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Another trigger fired inside the throttle window.
    Throttled,
    Applied(RefreshStrategy),
    /// Every strategy was missing or failed.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOptions {
    pub delay: Duration,
    pub min_interval: Duration,
    /// Known global re-scan functions, tried in order.
    pub rescan_functions: Vec<String>,
    pub script_src: String,
    /// Attribute value identifying scripts this crate inserted.
    pub script_marker: String,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(400),
            min_interval: Duration::from_millis(1_500),
            rescan_functions: vec!["wc_refresh".to_string(), "wcRescan".to_string()],
            script_src: "https://scripts.iconnode.com/tracker.js".to_string(),
            script_marker: "firmsite-dni".to_string(),
        }
    }
}
