//! DNI Phone Sync
//!
//! The call-tracking script swaps the header phone number once, on load. When
//! the footer renders after that scan it keeps the default number. This
//! poller copies the swapped number into the footer, then stops.

mod tests;
pub mod types;

pub use types::*;

use log::debug;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Poll state machine. Timing is supplied by the caller.
#[derive(Debug, Clone)]
pub struct DniSync {
    opts: DniOptions,
    state: DniState,
    started_at: Option<Instant>,
    ticks: u32,
}

impl DniSync {
    pub fn new(opts: DniOptions) -> Self {
        Self {
            opts,
            state: DniState::Idle,
            started_at: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> DniState {
        self.state
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn options(&self) -> DniOptions {
        self.opts
    }

    /// Begin polling from `now`, discarding any poll in progress.
    pub fn start(&mut self, now: Instant) {
        self.state = DniState::Polling;
        self.started_at = Some(now);
        self.ticks = 0;
    }

    pub fn stop(&mut self) {
        self.state = DniState::Stopped;
    }

    /// Run one poll against the page.
    pub fn tick<D: PhoneDom + ?Sized>(&mut self, dom: &mut D, now: Instant) -> TickOutcome {
        let Some(started_at) = self.started_at.filter(|_| self.state == DniState::Polling) else {
            return TickOutcome::Inactive;
        };
        self.ticks += 1;

        if now.saturating_duration_since(started_at) > self.opts.timeout {
            self.stop();
            return TickOutcome::TimedOut;
        }

        match poll_once(dom) {
            Ok(TickOutcome::Synced) => {
                self.stop();
                TickOutcome::Synced
            }
            Ok(outcome) => outcome,
            Err(e) => {
                debug!("dni sync stopped: {e}");
                self.stop();
                TickOutcome::Failed
            }
        }
    }
}

fn poll_once<D: PhoneDom + ?Sized>(dom: &mut D) -> crate::Result<TickOutcome> {
    let (Some(primary), Some(footer)) = (
        dom.anchor(AnchorSlot::Primary)?,
        dom.anchor(AnchorSlot::Footer)?,
    ) else {
        return Ok(TickOutcome::Waiting);
    };
    if primary.text.trim().is_empty() {
        return Ok(TickOutcome::Waiting);
    }
    if primary.href == footer.href {
        return Ok(TickOutcome::Unchanged);
    }
    dom.update_footer_number(&primary.text, &primary.href)?;
    Ok(TickOutcome::Synced)
}

/// Owner's handle on a spawned poll. Dropping it cancels the poll.
pub struct DniHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<DniReport>,
}

impl DniHandle {
    /// Request cancellation. The poll ends at its next wake-up.
    pub fn stop(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the poll to end.
    pub async fn join(mut self) -> DniReport {
        // hold the sender while waiting; dropping it would cancel the poll
        let _cancel = self.cancel.take();
        (&mut self.task).await.unwrap_or(DniReport {
            reason: StopReason::Failed,
            ticks: 0,
        })
    }
}

/// Spawn a poll on the current tokio runtime.
pub fn spawn_dni_sync<D: PhoneDom + 'static>(mut dom: D, opts: DniOptions) -> DniHandle {
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let mut sync = DniSync::new(opts);
        sync.start(Instant::now());

        let mut interval = time::interval_at(Instant::now() + opts.interval, opts.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut cancel_rx => {
                    sync.stop();
                    return DniReport { reason: StopReason::Cancelled, ticks: sync.ticks() };
                }
                _ = interval.tick() => {
                    let reason = match sync.tick(&mut dom, Instant::now()) {
                        TickOutcome::Synced => StopReason::Synced,
                        TickOutcome::TimedOut => StopReason::TimedOut,
                        TickOutcome::Failed | TickOutcome::Inactive => StopReason::Failed,
                        TickOutcome::Waiting | TickOutcome::Unchanged => continue,
                    };
                    return DniReport { reason, ticks: sync.ticks() };
                }
            }
        }
    });
    DniHandle {
        cancel: Some(cancel_tx),
        task,
    }
}

/// Holds at most one running poll; starting again cancels the previous one.
#[derive(Default)]
pub struct DniController {
    opts: DniOptions,
    current: Option<DniHandle>,
}

impl DniController {
    pub fn new(opts: DniOptions) -> Self {
        Self {
            opts,
            current: None,
        }
    }

    pub fn start<D: PhoneDom + 'static>(&mut self, dom: D) {
        self.stop();
        self.current = Some(spawn_dni_sync(dom, self.opts));
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.current.take() {
            handle.stop();
        }
    }

    pub fn state(&self) -> DniState {
        match &self.current {
            None => DniState::Idle,
            Some(h) if h.is_finished() => DniState::Stopped,
            Some(_) => DniState::Polling,
        }
    }

    /// Take the running handle, e.g. to await its report.
    pub fn take(&mut self) -> Option<DniHandle> {
        self.current.take()
    }
}
