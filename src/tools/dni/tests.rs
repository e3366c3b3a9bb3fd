#[cfg(test)]
mod tests {
    use crate::tools::dni::*;
    use crate::{Result, SiteError};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    const DEFAULT_HREF: &str = "tel:+16305550142";
    const TRACKED_HREF: &str = "tel:+16305550199";

    #[derive(Debug, Clone)]
    struct Page {
        primary: Option<PhoneAnchor>,
        footer_present: bool,
        footer_label: String,
        footer_number: String,
        footer_href: String,
        writes: usize,
        broken: bool,
    }

    #[derive(Clone)]
    struct FakeDom(Arc<Mutex<Page>>);

    impl FakeDom {
        fn new() -> Self {
            FakeDom(Arc::new(Mutex::new(Page {
                primary: Some(PhoneAnchor {
                    text: "(630) 555-0142".into(),
                    href: DEFAULT_HREF.into(),
                }),
                footer_present: true,
                footer_label: "Call us:".into(),
                footer_number: "(630) 555-0142".into(),
                footer_href: DEFAULT_HREF.into(),
                writes: 0,
                broken: false,
            })))
        }

        fn swap_primary(&self) {
            self.0.lock().unwrap().primary = Some(PhoneAnchor {
                text: "(630) 555-0199".into(),
                href: TRACKED_HREF.into(),
            });
        }

        fn page(&self) -> Page {
            self.0.lock().unwrap().clone()
        }
    }

    impl PhoneDom for FakeDom {
        fn anchor(&self, slot: AnchorSlot) -> Result<Option<PhoneAnchor>> {
            let page = self.0.lock().unwrap();
            if page.broken {
                return Err(SiteError::Dom("detached node".into()));
            }
            Ok(match slot {
                AnchorSlot::Primary => page.primary.clone(),
                AnchorSlot::Footer if page.footer_present => Some(PhoneAnchor {
                    text: format!("{} {}", page.footer_label, page.footer_number),
                    href: page.footer_href.clone(),
                }),
                AnchorSlot::Footer => None,
            })
        }

        fn update_footer_number(&mut self, text: &str, href: &str) -> Result<()> {
            let mut page = self.0.lock().unwrap();
            page.footer_number = text.to_string();
            page.footer_href = href.to_string();
            page.writes += 1;
            Ok(())
        }
    }

    fn started() -> (DniSync, Instant) {
        let mut sync = DniSync::new(DniOptions::default());
        let t0 = Instant::now();
        sync.start(t0);
        (sync, t0)
    }

    #[test]
    fn test_idle_until_started() {
        let mut sync = DniSync::new(DniOptions::default());
        let mut dom = FakeDom::new();
        assert_eq!(sync.state(), DniState::Idle);
        assert_eq!(sync.tick(&mut dom, Instant::now()), TickOutcome::Inactive);
    }

    #[test]
    fn test_matching_hrefs_do_not_mutate() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();

        for i in 1..=5 {
            let outcome = sync.tick(&mut dom, t0 + Duration::from_millis(250 * i));
            assert_eq!(outcome, TickOutcome::Unchanged);
        }
        assert_eq!(sync.state(), DniState::Polling);
        assert_eq!(dom.page().writes, 0);
    }

    #[test]
    fn test_mismatch_updates_footer_number_only_and_stops() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();
        dom.swap_primary();

        assert_eq!(
            sync.tick(&mut dom, t0 + Duration::from_millis(250)),
            TickOutcome::Synced
        );
        let page = dom.page();
        assert_eq!(page.footer_number, "(630) 555-0199");
        assert_eq!(page.footer_href, TRACKED_HREF);
        assert_eq!(page.footer_label, "Call us:");
        assert_eq!(page.writes, 1);

        assert_eq!(sync.state(), DniState::Stopped);
        assert_eq!(
            sync.tick(&mut dom, t0 + Duration::from_millis(500)),
            TickOutcome::Inactive
        );
        assert_eq!(dom.page().writes, 1);
    }

    #[test]
    fn test_waits_for_missing_anchor_or_empty_text() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();
        dom.0.lock().unwrap().footer_present = false;
        assert_eq!(sync.tick(&mut dom, t0), TickOutcome::Waiting);

        dom.0.lock().unwrap().footer_present = true;
        dom.0.lock().unwrap().primary = Some(PhoneAnchor {
            text: "  ".into(),
            href: TRACKED_HREF.into(),
        });
        assert_eq!(sync.tick(&mut dom, t0), TickOutcome::Waiting);
        assert_eq!(sync.state(), DniState::Polling);
    }

    #[test]
    fn test_times_out_after_window() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();
        assert_eq!(
            sync.tick(&mut dom, t0 + Duration::from_secs(10)),
            TickOutcome::Unchanged
        );
        assert_eq!(
            sync.tick(&mut dom, t0 + Duration::from_millis(10_250)),
            TickOutcome::TimedOut
        );
        assert_eq!(sync.state(), DniState::Stopped);
    }

    #[test]
    fn test_dom_error_stops_quietly() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();
        dom.0.lock().unwrap().broken = true;
        assert_eq!(sync.tick(&mut dom, t0), TickOutcome::Failed);
        assert_eq!(sync.state(), DniState::Stopped);
    }

    #[test]
    fn test_restart_resets_window() {
        let (mut sync, t0) = started();
        let mut dom = FakeDom::new();
        sync.tick(&mut dom, t0 + Duration::from_secs(11));
        assert_eq!(sync.state(), DniState::Stopped);

        let t1 = t0 + Duration::from_secs(12);
        sync.start(t1);
        assert_eq!(sync.ticks(), 0);
        assert_eq!(
            sync.tick(&mut dom, t1 + Duration::from_millis(250)),
            TickOutcome::Unchanged
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_poll_syncs_late_swap() {
        let dom = FakeDom::new();
        let handle = spawn_dni_sync(dom.clone(), DniOptions::default());

        tokio::time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(dom.page().writes, 0);
        dom.swap_primary();

        let report = handle.join().await;
        assert_eq!(report.reason, StopReason::Synced);
        assert_eq!(report.ticks, 5);
        assert_eq!(dom.page().footer_href, TRACKED_HREF);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_poll_times_out() {
        let dom = FakeDom::new();
        let report = spawn_dni_sync(dom.clone(), DniOptions::default()).join().await;
        assert_eq!(report.reason, StopReason::TimedOut);
        assert_eq!(report.ticks, 41);
        assert_eq!(dom.page().writes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_stop_cancels() {
        let dom = FakeDom::new();
        let mut handle = spawn_dni_sync(dom.clone(), DniOptions::default());
        tokio::time::sleep(Duration::from_millis(600)).await;
        handle.stop();
        let report = handle.join().await;
        assert_eq!(report.reason, StopReason::Cancelled);
        assert_eq!(report.ticks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_restart_cancels_previous() {
        let mut controller = DniController::new(DniOptions::default());
        assert_eq!(controller.state(), DniState::Idle);

        let first = FakeDom::new();
        controller.start(first.clone());
        assert_eq!(controller.state(), DniState::Polling);

        let second = FakeDom::new();
        controller.start(second.clone());
        first.swap_primary();
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(first.page().writes, 0);

        second.swap_primary();
        let report = controller.take().unwrap().join().await;
        assert_eq!(report.reason, StopReason::Synced);
        assert_eq!(second.page().writes, 1);
        assert_eq!(controller.state(), DniState::Idle);
    }
}
