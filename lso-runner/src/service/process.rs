//! Process execution service
//!
//! Handles the lifecycle of one automation process:
//! - Spawning it in its own process group with stdin closed and output piped
//! - Draining stdout and stderr into one buffer while waiting for the exit
//! - Enforcing the optional time limit and killing the whole group on expiry
//!
//! The exit of the spawned process decides the outcome. Descendants that keep
//! the pipes open afterwards only get a short grace period to flush.

use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::command::CommandSpec;
use crate::error::{Result, RunnerError};
use crate::execution::{ProcessExit, Termination};

const READ_CHUNK: usize = 8 * 1024;

/// How long output is still collected once the process has ended
const DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Service trait for running an external process to completion
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs the command and waits for it to finish
    ///
    /// # Arguments
    /// * `spec` - The program, arguments and working directory
    /// * `timeout` - Upper bound on the run, `None` waits forever
    ///
    /// # Returns
    /// How the process terminated and everything it wrote
    async fn run(&self, spec: CommandSpec, timeout: Option<Duration>) -> Result<ProcessExit>;
}

/// Runs processes with `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, spec: CommandSpec, timeout: Option<Duration>) -> Result<ProcessExit> {
        let program = spec.display_program();
        let started = Instant::now();

        let mut std_command = std::process::Command::new(&spec.program);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            std_command.process_group(0);
        }

        let mut command = Command::from(std_command);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| RunnerError::Spawn {
            program: program.clone(),
            source,
        })?;

        debug!("Spawned {} (pid {:?})", program, child.id());

        let mut output = Vec::new();
        let termination = supervise(&mut child, &program, &mut output, timeout).await?;

        let elapsed = started.elapsed();
        info!(
            "{} finished: {:?} after {:?} ({} bytes of output)",
            program,
            termination,
            elapsed,
            output.len()
        );

        Ok(ProcessExit {
            termination,
            output: String::from_utf8_lossy(&output).into_owned(),
            elapsed,
        })
    }
}

/// Collects output until the process exits or the time limit expires
async fn supervise(
    child: &mut Child,
    program: &str,
    output: &mut Vec<u8>,
    timeout: Option<Duration>,
) -> io::Result<Termination> {
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not captured"))?;

    let deadline = async {
        match timeout {
            Some(limit) => {
                tokio::time::sleep(limit).await;
                limit
            }
            None => std::future::pending().await,
        }
    };
    tokio::pin!(deadline);

    let mut out_buf = [0u8; READ_CHUNK];
    let mut err_buf = [0u8; READ_CHUNK];
    let mut out_open = true;
    let mut err_open = true;

    let termination = loop {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read? {
                0 => out_open = false,
                n => output.extend_from_slice(&out_buf[..n]),
            },
            read = stderr.read(&mut err_buf), if err_open => match read? {
                0 => err_open = false,
                n => output.extend_from_slice(&err_buf[..n]),
            },
            status = child.wait() => break Termination::from(status?),
            limit = &mut deadline => {
                warn!("{} exceeded its time limit of {:?}, killing it", program, limit);
                kill_process_group(child, program);
                if let Err(e) = child.kill().await {
                    warn!("Failed to kill {}: {}", program, e);
                }
                break Termination::TimedOut(limit);
            }
        }
    };

    if out_open || err_open {
        let drained = tokio::time::timeout(
            DRAIN_GRACE,
            capture_interleaved(&mut stdout, &mut stderr, output),
        )
        .await;
        match drained {
            Ok(result) => result?,
            Err(_) => debug!("Output of {} still open after exit, no longer reading", program),
        }
    }

    Ok(termination)
}

/// Kills every process in the group led by `child`
#[cfg(unix)]
fn kill_process_group(child: &Child, program: &str) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            warn!("Failed to kill process group of {}: {}", program, e);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child, _program: &str) {}

/// Reads both streams until EOF, appending chunks in arrival order
async fn capture_interleaved<O, E>(
    stdout: &mut O,
    stderr: &mut E,
    output: &mut Vec<u8>,
) -> io::Result<()>
where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut out_buf = [0u8; READ_CHUNK];
    let mut err_buf = [0u8; READ_CHUNK];
    let mut out_open = true;
    let mut err_open = true;

    while out_open || err_open {
        tokio::select! {
            read = stdout.read(&mut out_buf), if out_open => match read? {
                0 => out_open = false,
                n => output.extend_from_slice(&out_buf[..n]),
            },
            read = stderr.read(&mut err_buf), if err_open => match read? {
                0 => err_open = false,
                n => output.extend_from_slice(&err_buf[..n]),
            },
        }
    }

    Ok(())
}
