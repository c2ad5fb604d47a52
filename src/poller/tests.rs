use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::error::PollError;
use crate::track::TrackKey;

/// Source that answers from a script, then keeps repeating its fallback.
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<JobDescriptor>, String>>>,
    calls: Mutex<u32>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Vec<JobDescriptor>, String>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl JobsSource for ScriptedSource {
    fn fetch_active_jobs(&self) -> Result<Vec<JobDescriptor>, PollError> {
        *self.calls.lock().unwrap() += 1;
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(jobs)) => Ok(jobs),
            Some(Err(e)) => Err(PollError::Body(e)),
            None => Ok(Vec::new()),
        }
    }
}

fn job(artist: &str, title: &str, state: JobState) -> JobDescriptor {
    JobDescriptor {
        artist: Some(artist.to_string()),
        title: Some(title.to_string()),
        query: None,
        job_state: state,
    }
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn parses_envelope_with_mixed_field_names() {
    let body = r#"{
        "active_downloads": [
            {"artist": "Air", "title": "Talisman", "job_state": "downloading"},
            {"query": "Daft Punk - Veridis Quo", "status": "queued"},
            {"artist": "Justice", "title": "Genesis", "jobState": "something-new"}
        ]
    }"#;
    let parsed: ActiveJobsResponse = serde_json::from_str(body).unwrap();
    let jobs = parsed.active_downloads;

    assert_eq!(jobs.len(), 3);
    assert_eq!(jobs[0].job_state, JobState::Downloading);
    assert_eq!(jobs[1].job_state, JobState::Queued);
    assert_eq!(jobs[1].track_key(), Some(TrackKey::new("Daft Punk", "Veridis Quo")));
    assert_eq!(jobs[2].job_state, JobState::Unknown);
}

#[test]
fn missing_list_is_empty() {
    let parsed: ActiveJobsResponse = serde_json::from_str("{}").unwrap();
    assert!(parsed.active_downloads.is_empty());
}

#[test]
fn descriptor_without_identity_has_no_key() {
    let parsed: JobDescriptor = serde_json::from_str(r#"{"state": "pending"}"#).unwrap();
    assert_eq!(parsed.job_state, JobState::Pending);
    assert_eq!(parsed.track_key(), None);
    assert_eq!(parsed.label(), "?");
}

#[test]
fn successful_tick_replaces_snapshot_wholesale() {
    let source = ScriptedSource::new(vec![
        Ok(vec![
            job("Air", "Talisman", JobState::Queued),
            job("Air", "Ce Matin-Là", JobState::Queued),
        ]),
        Ok(vec![job("Air", "Talisman", JobState::Processing)]),
    ]);
    let poller = JobStatusPoller::new(source);

    assert!(poller.poll_once());
    assert_eq!(poller.snapshot().len(), 2);

    assert!(poller.poll_once());
    let snapshot = poller.snapshot();
    assert_eq!(snapshot.len(), 1);
    let talisman = snapshot.job_for(&TrackKey::new("Air", "Talisman")).unwrap();
    assert_eq!(talisman.job_state, JobState::Processing);
}

#[test]
fn failed_tick_keeps_previous_snapshot() {
    let first = vec![job("Air", "Talisman", JobState::Downloading)];
    let source = ScriptedSource::new(vec![
        Ok(first.clone()),
        Err("connection refused".to_string()),
        Err("connection refused".to_string()),
    ]);
    let poller = JobStatusPoller::new(source);

    assert!(poller.poll_once());
    assert!(!poller.poll_once());
    assert!(!poller.poll_once());

    assert_eq!(poller.snapshot().jobs, first);
    let stats = poller.stats();
    assert_eq!(stats.successes, 1);
    assert_eq!(stats.failures, 2);
    assert_eq!(stats.consecutive_failures, 2);
    assert!(stats.last_error.unwrap().contains("connection refused"));
}

#[test]
fn success_resets_consecutive_failures() {
    let source = ScriptedSource::new(vec![Err("timeout".to_string()), Ok(Vec::new())]);
    let poller = JobStatusPoller::new(source);

    poller.poll_once();
    assert_eq!(poller.stats().consecutive_failures, 1);
    poller.poll_once();
    assert_eq!(poller.stats().consecutive_failures, 0);
}

#[test]
fn first_fetch_happens_right_away() {
    let source = ScriptedSource::new(vec![Ok(vec![job("Air", "Talisman", JobState::Queued)])]);
    let poller = JobStatusPoller::spawn(source.clone(), Duration::from_secs(3600));

    assert!(wait_until(|| poller.stats().successes == 1));
    assert_eq!(poller.snapshot().len(), 1);
    assert_eq!(source.calls(), 1);
}

#[test]
fn timer_keeps_polling_through_failures() {
    let source = ScriptedSource::new(vec![
        Err("down".to_string()),
        Err("down".to_string()),
        Ok(vec![job("Air", "Talisman", JobState::Completed)]),
    ]);
    let poller = JobStatusPoller::spawn(source, Duration::from_millis(10));

    assert!(wait_until(|| poller.stats().successes >= 1));
    let stats = poller.stats();
    assert_eq!(stats.failures, 2);
}

#[test]
fn dropping_the_poller_stops_the_timer() {
    let source = ScriptedSource::new(Vec::new());
    let poller = JobStatusPoller::spawn(source.clone(), Duration::from_millis(5));
    assert!(wait_until(|| source.calls() >= 2));

    drop(poller);
    // A tick that was already due may still land right after the drop.
    thread::sleep(Duration::from_millis(20));
    let after_drop = source.calls();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(source.calls(), after_drop);
}

/// Source whose fetch blocks until the test opens the gate.
struct StuckSource {
    gate: Mutex<Receiver<()>>,
    calls: Mutex<u32>,
}

impl JobsSource for StuckSource {
    fn fetch_active_jobs(&self) -> Result<Vec<JobDescriptor>, PollError> {
        *self.calls.lock().unwrap() += 1;
        let _ = self.gate.lock().unwrap().recv();
        Ok(Vec::new())
    }
}

#[test]
fn dropping_the_poller_does_not_wait_for_a_stuck_fetch() {
    let (open_gate, gate) = mpsc::channel();
    let source = Arc::new(StuckSource {
        gate: Mutex::new(gate),
        calls: Mutex::new(0),
    });
    let poller = JobStatusPoller::spawn(source.clone(), Duration::from_millis(5));
    assert!(wait_until(|| *source.calls.lock().unwrap() == 1));

    let (dropped_tx, dropped_rx) = mpsc::channel();
    thread::spawn(move || {
        drop(poller);
        let _ = dropped_tx.send(());
    });
    assert!(dropped_rx.recv_timeout(Duration::from_secs(1)).is_ok());

    // Once the fetch returns the thread sees the stop and fetches no more.
    open_gate.send(()).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(*source.calls.lock().unwrap(), 1);
}
