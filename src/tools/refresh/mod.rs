//! Third-Party Script Refresh
//!
//! After client-side navigation the call-tracking script has to re-scan the
//! page. Ask it to, in order of preference, and never let a failure escape.

pub mod types;

pub use types::*;

use log::debug;
use tokio::time::{sleep, Instant};

/// Throttled refresh trigger. One per page session.
#[derive(Debug, Clone)]
pub struct RefreshTrigger {
    opts: RefreshOptions,
    last_fired: Option<Instant>,
}

impl RefreshTrigger {
    pub fn new(opts: RefreshOptions) -> Self {
        Self {
            opts,
            last_fired: None,
        }
    }

    pub fn options(&self) -> &RefreshOptions {
        &self.opts
    }

    /// Claim the throttle window at `now`. `force` bypasses it.
    pub fn admit(&mut self, now: Instant, force: bool) -> bool {
        let inside_window = self
            .last_fired
            .is_some_and(|last| now.saturating_duration_since(last) < self.opts.min_interval);
        if inside_window && !force {
            return false;
        }
        self.last_fired = Some(now);
        true
    }

    /// Wait the configured delay, then run the strategies.
    pub async fn trigger<H: ScriptHost + ?Sized>(
        &mut self,
        host: &mut H,
        reason: &RefreshReason,
        force: bool,
    ) -> RefreshOutcome {
        if !self.admit(Instant::now(), force) {
            debug!("refresh throttled ({reason:?})");
            return RefreshOutcome::Throttled;
        }
        sleep(self.opts.delay).await;
        self.run_strategies(host, reason)
    }

    /// Try queue event, each present rescan function, then script re-injection; first success wins.
    pub fn run_strategies<H: ScriptHost + ?Sized>(
        &self,
        host: &mut H,
        reason: &RefreshReason,
    ) -> RefreshOutcome {
        if host.has_queue() {
            match host.push_queue_event(&reason.event()) {
                Ok(()) => return RefreshOutcome::Applied(RefreshStrategy::QueueEvent),
                Err(e) => debug!("queue event failed: {e}"),
            }
        }

        for name in &self.opts.rescan_functions {
            if !host.has_function(name) {
                continue;
            }
            match host.call_function(name) {
                Ok(()) => {
                    return RefreshOutcome::Applied(RefreshStrategy::Rescan {
                        function: name.clone(),
                    })
                }
                Err(e) => debug!("{name}() failed: {e}"),
            }
        }

        match self.reinject(host) {
            Ok(()) => RefreshOutcome::Applied(RefreshStrategy::Reinject),
            Err(e) => {
                debug!("script re-injection failed: {e}");
                RefreshOutcome::Unavailable
            }
        }
    }

    fn reinject<H: ScriptHost + ?Sized>(&self, host: &mut H) -> crate::Result<()> {
        let removed = host.remove_scripts(&self.opts.script_marker)?;
        debug!("removed {removed} injected tracking scripts");
        host.append_script(&self.opts.script_src, &self.opts.script_marker)
    }
}

impl Default for RefreshTrigger {
    fn default() -> Self {
        Self::new(RefreshOptions::default())
    }
}
