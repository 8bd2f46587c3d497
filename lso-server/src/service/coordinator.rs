//! Run Coordinator
//!
//! Accepts run requests, resolves what to run and hands the process off to a
//! detached task. When the process ends the coordinator turns its exit into
//! a [`RunOutcome`] and delivers it to the callback exactly once.
//!
//! Everything that can fail synchronously (validation, resolution, command
//! construction) happens before a job id is minted. Once an id exists, every
//! failure travels through the callback instead.

use lso_client::CallbackNotifier;
use lso_core::ValidationError;
use lso_core::domain::job::JobId;
use lso_core::domain::outcome::RunOutcome;
use lso_core::dto::execute::RunExecutableRequest;
use lso_core::dto::playbook::RunPlaybookRequest;
use lso_runner::{
    CommandSpec, ProcessExit, ProcessRunner, RunnerError, StagedInventory, Termination,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::config::Settings;
use crate::service::resolver::{self, ResolveError};

/// Service error type
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("{0}")]
    PlaybookNotFound(#[source] ResolveError),

    #[error("{0}")]
    ExecutableRejected(#[source] ResolveError),

    #[error("Running executables is not enabled on this server.")]
    ExecutablesDisabled,

    #[error("Failed to build command: {0}")]
    Command(#[from] RunnerError),
}

/// What a run executes, used in failure reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunKind {
    Playbook,
    Executable,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Playbook => f.write_str("playbook"),
            RunKind::Executable => f.write_str("executable"),
        }
    }
}

/// Entry point for starting runs
pub struct RunCoordinator {
    settings: Arc<Settings>,
    runner: Arc<dyn ProcessRunner>,
    notifier: Arc<dyn CallbackNotifier>,
    permits: Arc<Semaphore>,
}

impl RunCoordinator {
    pub fn new(
        settings: Arc<Settings>,
        runner: Arc<dyn ProcessRunner>,
        notifier: Arc<dyn CallbackNotifier>,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(settings.max_parallel_runs));
        Self {
            settings,
            runner,
            notifier,
            permits,
        }
    }

    /// Starts a playbook run and returns without waiting for it
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch_playbook(&self, req: &RunPlaybookRequest) -> Result<JobId, LaunchError> {
        req.validate()?;

        let root = &self.settings.ansible_playbooks_root_dir;
        let playbook = resolver::resolve(root, &req.playbook_name)
            .map_err(LaunchError::PlaybookNotFound)?;

        let inventory = StagedInventory::stage(&req.inventory)?;
        let spec = CommandSpec::playbook(
            &self.settings.ansible_playbook_bin,
            playbook.as_path(),
            &inventory,
            &req.extra_vars,
        )?
        .in_dir(root);

        let job_id = JobId::new();
        info!(
            "Job {} accepted: playbook {} against {:?}",
            job_id,
            playbook.as_path().display(),
            inventory.arg()
        );

        let callback = req.callback.clone();
        self.dispatch(job_id, RunKind::Playbook, spec, callback, Some(inventory));
        Ok(job_id)
    }

    /// Starts an executable run and returns without waiting for it
    pub fn launch_executable(&self, req: &RunExecutableRequest) -> Result<JobId, LaunchError> {
        req.validate()?;

        let root = self
            .settings
            .executables_root_dir
            .as_ref()
            .ok_or(LaunchError::ExecutablesDisabled)?;
        let executable = resolver::resolve_executable(root, &req.executable_name)
            .map_err(LaunchError::ExecutableRejected)?;

        let spec = CommandSpec::executable(executable.as_path(), &req.args).in_dir(root);

        let job_id = JobId::new();
        info!(
            "Job {} accepted: executable {} with {} argument(s)",
            job_id,
            executable.as_path().display(),
            req.args.len()
        );

        self.dispatch(job_id, RunKind::Executable, spec, req.callback.clone(), None);
        Ok(job_id)
    }

    /// Spawns the detached task that runs the process and reports the outcome
    ///
    /// A staged inventory is kept alive until the process has exited.
    fn dispatch(
        &self,
        job_id: JobId,
        kind: RunKind,
        spec: CommandSpec,
        callback: Url,
        inventory: Option<StagedInventory>,
    ) {
        let runner = Arc::clone(&self.runner);
        let notifier = Arc::clone(&self.notifier);
        let permits = Arc::clone(&self.permits);
        let timeout = self.settings.run_timeout();

        tokio::spawn(async move {
            let permit = match permits.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(e) => {
                    warn!("Run limit unavailable for job {}: {}", job_id, e);
                    None
                }
            };

            debug!("Job {} starting {}", job_id, spec.display_program());
            let result = runner.run(spec, Some(timeout)).await;
            drop(permit);
            drop(inventory);

            let outcome = build_outcome(job_id, kind, result);
            if outcome.is_success() {
                info!("Job {} succeeded", job_id);
            } else {
                warn!(
                    "Job {} failed: {}",
                    job_id,
                    outcome.reason.as_deref().unwrap_or_default()
                );
            }

            deliver(notifier.as_ref(), &callback, &outcome).await;
        });
    }
}

/// Maps a process result onto the reported outcome
fn build_outcome(
    job_id: JobId,
    kind: RunKind,
    result: Result<ProcessExit, RunnerError>,
) -> RunOutcome {
    let exit = match result {
        Ok(exit) => exit,
        Err(e) => {
            error!("Job {} could not run: {}", job_id, e);
            return RunOutcome::failure(
                job_id,
                format!("{} process could not be started: {}", kind, e),
                String::new(),
            );
        }
    };

    if exit.succeeded() {
        return RunOutcome::success(job_id, exit.output);
    }

    match exit.termination {
        Termination::Exited(code) => RunOutcome::failure(
            job_id,
            format!("{} process failed with exit code {}", kind, code),
            exit.output,
        ),
        Termination::Signaled => RunOutcome::failure(
            job_id,
            format!("{} process was terminated by a signal", kind),
            exit.output,
        ),
        Termination::TimedOut(limit) => RunOutcome::failure(
            job_id,
            format!("{} run timed out after {}s", kind, limit.as_secs()),
            exit.output,
        ),
    }
}

/// Best-effort delivery; failures are logged and dropped
async fn deliver(notifier: &dyn CallbackNotifier, callback: &Url, outcome: &RunOutcome) {
    match notifier.notify(callback, outcome).await {
        Ok(()) => info!("Delivered outcome of job {} to {}", outcome.job_id, callback),
        Err(e) => error!(
            "Failed to deliver outcome of job {} to {}: {}",
            outcome.job_id, callback, e
        ),
    }
}
