use super::manager::{PreviewManager, PreviewSink};

/// Recording fake: counts transitions instead of touching audio.
#[derive(Default)]
struct FakeSink {
    starts: usize,
    stops: usize,
    polls: usize,
    finished: bool,
    fail_start: bool,
    pending: bool,
}

impl PreviewSink for FakeSink {
    fn start(&mut self) -> bool {
        if self.fail_start {
            return false;
        }
        self.starts += 1;
        true
    }

    fn stop(&mut self) {
        self.stops += 1;
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn is_pending(&self) -> bool {
        self.pending
    }

    fn poll(&mut self) {
        self.polls += 1;
    }
}

fn manager_with(ids: &[&str]) -> PreviewManager<FakeSink> {
    let mut manager = PreviewManager::new();
    for id in ids {
        manager.insert(*id, FakeSink::default());
    }
    manager
}

#[test]
fn playing_a_row_stops_the_previous_one() {
    let mut manager = manager_with(&["api-1", "api-2"]);

    manager.request_play("api-1");
    assert!(manager.is_playing("api-1"));

    manager.request_play("api-2");
    assert!(manager.is_playing("api-2"));
    assert!(!manager.is_playing("api-1"));
    assert_eq!(manager.active(), Some("api-2"));
}

#[test]
fn replaying_the_active_row_does_not_stop_it() {
    let mut manager = manager_with(&["api-1"]);
    manager.request_play("api-1");
    manager.request_play("api-1");
    assert!(manager.is_playing("api-1"));
    let sink = manager.slot("api-1").unwrap();
    assert_eq!(sink.stops, 0);
    assert_eq!(sink.starts, 2);
}

#[test]
fn stop_for_an_inactive_row_is_a_noop() {
    let mut manager = manager_with(&["api-1", "api-2"]);
    manager.request_play("api-1");

    manager.request_stop("api-2");
    assert!(manager.is_playing("api-1"));

    manager.request_stop("api-1");
    assert_eq!(manager.active(), None);
}

#[test]
fn playing_an_unknown_row_is_a_noop() {
    let mut manager = manager_with(&["api-1"]);
    manager.request_play("api-9");
    assert_eq!(manager.active(), None);
}

#[test]
fn failed_start_leaves_no_active_row() {
    let mut manager = PreviewManager::new();
    manager.insert(
        "api-1",
        FakeSink {
            fail_start: true,
            ..FakeSink::default()
        },
    );
    manager.request_play("api-1");
    assert_eq!(manager.active(), None);
}

#[test]
fn natural_end_clears_the_active_row() {
    let mut manager = manager_with(&["api-1"]);
    manager.request_play("api-1");
    manager.notify_ended("api-1");
    assert_eq!(manager.active(), None);
}

#[test]
fn reap_finished_picks_up_ended_clips() {
    let mut manager = manager_with(&["api-1"]);
    manager.request_play("api-1");

    manager.reap_finished();
    assert!(manager.is_playing("api-1"));

    manager.slot_mut("api-1").unwrap().finished = true;
    manager.reap_finished();
    assert_eq!(manager.active(), None);
}

// Local rows and remote rows share the same exclusivity rule: starting one
// preview silences whatever else was playing, whatever its origin.
#[test]
fn local_and_remote_rows_share_one_active_preview() {
    let mut manager = manager_with(&["karera", "api-1"]);

    manager.request_play("karera");
    assert!(manager.is_playing("karera"));

    manager.request_play("api-1");
    assert!(manager.is_playing("api-1"));
    assert!(!manager.is_playing("karera"));
    assert_eq!(manager.slot("karera").unwrap().stops, 1);

    manager.request_play("karera");
    assert_eq!(manager.active(), Some("karera"));
    assert_eq!(manager.slot("api-1").unwrap().stops, 1);
}

#[test]
fn a_row_waiting_on_its_clip_reports_loading() {
    let mut manager = PreviewManager::new();
    manager.insert(
        "api-1",
        FakeSink {
            pending: true,
            ..FakeSink::default()
        },
    );
    manager.insert("karera", FakeSink::default());

    // Not loading until the row is actually active.
    assert!(!manager.is_loading("api-1"));

    manager.request_play("api-1");
    assert!(manager.is_loading("api-1"));

    manager.slot_mut("api-1").unwrap().pending = false;
    assert!(!manager.is_loading("api-1"));
    assert!(manager.is_playing("api-1"));

    manager.request_play("karera");
    assert!(!manager.is_loading("karera"));
}

#[test]
fn poll_slots_reaches_every_slot() {
    let mut manager = manager_with(&["api-1", "api-2", "karera"]);
    manager.poll_slots();
    manager.poll_slots();
    for id in ["api-1", "api-2", "karera"] {
        assert_eq!(manager.slot(id).unwrap().polls, 2);
    }
}

#[test]
fn sync_rows_releases_rows_that_left_the_screen() {
    let mut manager = manager_with(&["api-1", "api-2", "api-3"]);
    manager.request_play("api-2");

    manager.sync_rows(&["api-1", "api-3"]);
    assert!(!manager.contains("api-2"));
    assert_eq!(manager.active(), None);
    assert!(manager.contains("api-1"));
}
