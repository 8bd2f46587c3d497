//! Fakes shared by the coordinator and API tests

use async_trait::async_trait;
use lso_client::{CallbackNotifier, ClientError};
use lso_core::domain::outcome::RunOutcome;
use lso_runner::{CommandSpec, ProcessExit, ProcessRunner, RunnerError, Termination};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use url::Url;

use crate::config::Settings;

type Reply = dyn Fn(&CommandSpec) -> Result<ProcessExit, RunnerError> + Send + Sync;

/// Temporary playbook root holding the given files
pub fn playbook_root(files: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        std::fs::write(dir.path().join(file), "- hosts: all\n").unwrap();
    }
    dir
}

pub fn settings_for(root: &Path) -> Settings {
    Settings::new(root)
}

pub fn exited(code: i32, output: &str) -> Result<ProcessExit, RunnerError> {
    Ok(ProcessExit {
        termination: Termination::Exited(code),
        output: output.to_string(),
        elapsed: Duration::from_millis(1),
    })
}

/// Process runner that answers from a closure and records what it was asked
pub struct FakeRunner {
    reply: Box<Reply>,
    delay: Duration,
    calls: Mutex<Vec<(CommandSpec, Option<Duration>)>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeRunner {
    pub fn replying<F>(reply: F) -> Self
    where
        F: Fn(&CommandSpec) -> Result<ProcessExit, RunnerError> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(spec, _)| spec.clone()).collect()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(_, timeout)| *timeout).collect()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(
        &self,
        spec: CommandSpec,
        timeout: Option<Duration>,
    ) -> Result<ProcessExit, RunnerError> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = (self.reply)(&spec);
        self.calls.lock().unwrap().push((spec, timeout));
        self.running.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Notifier that forwards every outcome to a channel
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(Url, RunOutcome)>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<(Url, RunOutcome)>>,
    count: AtomicUsize,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
            count: AtomicUsize::new(0),
            fail: false,
        }
    }

    /// Records outcomes but reports every delivery as failed
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Waits for the next delivered outcome
    pub async fn next(&self) -> (Url, RunOutcome) {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no callback within 5s")
            .expect("notifier channel closed")
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallbackNotifier for RecordingNotifier {
    async fn notify(&self, callback: &Url, outcome: &RunOutcome) -> lso_client::Result<()> {
        self.count.fetch_add(1, Ordering::SeqCst);
        let _ = self.tx.send((callback.clone(), outcome.clone()));

        if self.fail {
            return Err(ClientError::api_error(503, "callback receiver unavailable"));
        }
        Ok(())
    }
}
