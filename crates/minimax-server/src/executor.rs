//! Running one analysis in an isolated, killable worker.
//!
//! Search has no suspension points, so the only way to stop it early is
//! to kill whatever is running it. [`ProcessExecutor`] gives every task
//! its own child process (this binary, run as `minimax-server worker`);
//! the scheduler only ever sees a [`WorkerHandle`] it can await or
//! terminate.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use minimax_core::{AnalysisRequest, AnalysisResult};
use minimax_protocol::{decode_report, encode_job};

use crate::error::ExecutorError;

/// Starts analyses on some preemptible execution unit.
pub trait Executor: Send + Sync + 'static {
    /// Begin running `request`. Must be called inside a Tokio runtime.
    fn launch(&self, request: &AnalysisRequest) -> Result<WorkerHandle, ExecutorError>;
}

/// A running analysis.
///
/// Await it for the result, or call [`terminate`](Self::terminate) to
/// kill the worker. Dropping the handle also kills the worker.
#[derive(Debug)]
pub struct WorkerHandle {
    outcome: JoinHandle<Result<AnalysisResult, ExecutorError>>,
    kill: Option<oneshot::Sender<()>>,
}

impl WorkerHandle {
    /// `outcome` resolves with the worker's result; it must stop the
    /// worker as soon as `kill` fires or is dropped.
    pub fn new(
        outcome: JoinHandle<Result<AnalysisResult, ExecutorError>>,
        kill: oneshot::Sender<()>,
    ) -> Self {
        WorkerHandle {
            outcome,
            kill: Some(kill),
        }
    }

    /// Kill the worker and wait until it is gone.
    pub async fn terminate(mut self) {
        if let Some(kill) = self.kill.take() {
            let _ = kill.send(());
        }
        let _ = (&mut self.outcome).await;
    }
}

impl Future for WorkerHandle {
    type Output = Result<AnalysisResult, ExecutorError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.outcome).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(ExecutorError::Supervisor(e.to_string())),
        })
    }
}

/// Runs each analysis in a fresh child process.
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    program: PathBuf,
    args: Vec<String>,
}

impl ProcessExecutor {
    /// Spawn `program worker` for each analysis.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        ProcessExecutor {
            program: program.into(),
            args: vec!["worker".to_string()],
        }
    }
}

impl Executor for ProcessExecutor {
    fn launch(&self, request: &AnalysisRequest) -> Result<WorkerHandle, ExecutorError> {
        let job = encode_job(request)?;

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(ExecutorError::Spawn)?;
        debug!("Spawned worker pid {:?}", child.id());

        let (kill_tx, kill_rx) = oneshot::channel();
        let outcome = tokio::spawn(supervise(child, job, kill_rx));
        Ok(WorkerHandle::new(outcome, kill_tx))
    }
}

/// Feed the job, collect the report, and reap the child; or kill it as
/// soon as `kill` resolves.
async fn supervise(
    mut child: Child,
    job: Vec<u8>,
    kill: oneshot::Receiver<()>,
) -> Result<AnalysisResult, ExecutorError> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();

    let exchange = async move {
        if let Some(mut stdin) = stdin {
            stdin.write_all(&job).await?;
            // Closing stdin tells the worker the job is complete.
            drop(stdin);
        }
        let mut report = Vec::new();
        if let Some(mut stdout) = stdout {
            stdout.read_to_end(&mut report).await?;
        }
        Ok::<_, std::io::Error>(report)
    };

    let report = tokio::select! {
        _ = kill => {
            let pid = child.id();
            if let Err(e) = child.kill().await {
                debug!("Worker pid {:?} already gone: {}", pid, e);
            }
            return Err(ExecutorError::Terminated);
        }
        report = exchange => report?,
    };

    let status = child.wait().await?;
    if !status.success() {
        return Err(ExecutorError::Exit(status));
    }
    Ok(decode_report(&report)?)
}
