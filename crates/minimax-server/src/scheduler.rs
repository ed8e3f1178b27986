//! Admission-controlled task scheduler.
//!
//! The scheduler owns two pools of slots:
//! - worker slots (`worker_limit`): one per running analysis,
//! - session slots (`session_limit`): one per open WebSocket session.
//!
//! Both are `Semaphore`s. A slot is held as an owned permit, so whichever
//! way a task ends (completion, failure, timeout, cancellation, panic),
//! dropping the permit gives the slot back and wakes the next waiter.
//!
//! Task lifecycle:
//!
//! ```text
//! submit ──► [waiting] ──► running ──► complete | error
//!                │            │
//!                │            ├──► timeout      (worker killed)
//!                └────────────┴──► cancelled    (worker killed, no event)
//! ```
//!
//! `waiting` is only sent when no slot was free at submission.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use minimax_core::{AnalysisRequest, AnalysisResult};
use minimax_protocol::OutboundEvent;

use crate::config::Config;
use crate::error::{ExecutorError, ServiceError};
use crate::executor::{Executor, ProcessExecutor};
use crate::types::{EventTx, SessionId, TaskId};

/// How a task ended. Exactly one per task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Failed,
    Cancelled,
    TimedOut,
}

/// Snapshot of the scheduler's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SchedulerStats {
    pub active_workers: usize,
    pub worker_limit: usize,
    pub active_sessions: usize,
    pub session_limit: usize,
}

/// Proof that a session slot is held. Dropping it frees the slot.
#[derive(Debug)]
pub struct SessionTicket {
    id: SessionId,
    _permit: OwnedSemaphorePermit,
}

impl SessionTicket {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

/// Handle to a submitted task.
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    cancel: CancellationToken,
    join: JoinHandle<TaskOutcome>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Signal cancellation without waiting for the worker to die.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Cancel and wait until the worker is gone and its slot released.
    ///
    /// A task that already finished reports how it finished.
    pub async fn cancel_and_wait(self) -> TaskOutcome {
        self.cancel.cancel();
        self.join().await
    }

    /// Wait for the task to end on its own.
    pub async fn join(self) -> TaskOutcome {
        self.join.await.unwrap_or(TaskOutcome::Failed)
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

enum Finish {
    Cancelled,
    TimedOut,
    Done(Result<AnalysisResult, ExecutorError>),
}

/// Shared scheduler. Create once and wrap in an `Arc`.
pub struct Scheduler {
    workers: Arc<Semaphore>,
    worker_limit: usize,
    sessions: Arc<Semaphore>,
    session_limit: usize,
    executor: Arc<dyn Executor>,
    task_timeout: Duration,
    next_session: AtomicU64,
    next_task: AtomicU64,
}

impl Scheduler {
    pub fn new(
        worker_limit: usize,
        session_limit: usize,
        task_timeout: Duration,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Scheduler {
            workers: Arc::new(Semaphore::new(worker_limit)),
            worker_limit,
            sessions: Arc::new(Semaphore::new(session_limit)),
            session_limit,
            executor,
            task_timeout,
            next_session: AtomicU64::new(1),
            next_task: AtomicU64::new(1),
        }
    }

    /// Scheduler with worker processes, sized from `config`.
    pub fn from_config(config: &Config) -> Self {
        let executor = Arc::new(ProcessExecutor::new(config.worker_binary.clone()));
        Scheduler::new(
            config.worker_limit,
            config.session_limit,
            config.task_timeout,
            executor,
        )
    }

    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            active_workers: self.worker_limit - self.workers.available_permits(),
            worker_limit: self.worker_limit,
            active_sessions: self.session_limit - self.sessions.available_permits(),
            session_limit: self.session_limit,
        }
    }

    /// Claim a session slot, or `None` if the session limit is reached.
    pub fn open_session(&self) -> Option<SessionTicket> {
        let permit = self.sessions.clone().try_acquire_owned().ok()?;
        Some(SessionTicket {
            id: self.next_session_id(),
            _permit: permit,
        })
    }

    fn next_session_id(&self) -> SessionId {
        SessionId(self.next_session.fetch_add(1, Ordering::Relaxed))
    }

    /// Start a task for `session`. Lifecycle events go to `events`.
    pub fn submit(
        self: &Arc<Self>,
        session: SessionId,
        request: AnalysisRequest,
        events: EventTx,
    ) -> TaskHandle {
        let id = TaskId(self.next_task.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        let scheduler = Arc::clone(self);
        let token = cancel.clone();
        let join = tokio::spawn(async move {
            scheduler.run_task(id, session, request, events, token).await
        });
        TaskHandle { id, cancel, join }
    }

    async fn run_task(
        self: Arc<Self>,
        task: TaskId,
        session: SessionId,
        request: AnalysisRequest,
        events: EventTx,
        cancel: CancellationToken,
    ) -> TaskOutcome {
        let game = request.game();

        let permit = match self.workers.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(TryAcquireError::NoPermits) => {
                info!(%session, %task, %game, "All {} workers busy, task waiting", self.worker_limit);
                let _ = events.send(OutboundEvent::Waiting);
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        info!(%session, %task, "Task cancelled while waiting");
                        return TaskOutcome::Cancelled;
                    }
                    acquired = self.workers.clone().acquire_owned() => match acquired {
                        Ok(permit) => permit,
                        Err(_) => return slots_closed(task, &events),
                    },
                }
            }
            Err(TryAcquireError::Closed) => return slots_closed(task, &events),
        };

        if cancel.is_cancelled() {
            info!(%session, %task, "Task cancelled before start");
            return TaskOutcome::Cancelled;
        }

        let _ = events.send(OutboundEvent::Running);
        info!(%session, %task, %game, "Task running");
        let started = Instant::now();

        let mut worker = match self.executor.launch(&request) {
            Ok(worker) => worker,
            Err(e) => {
                drop(permit);
                warn!(%session, %task, "Could not start worker: {}", e);
                let _ = events.send(OutboundEvent::error(e.to_string()));
                return TaskOutcome::Failed;
            }
        };

        let finish = tokio::select! {
            biased;
            _ = cancel.cancelled() => Finish::Cancelled,
            _ = tokio::time::sleep(self.task_timeout) => Finish::TimedOut,
            result = &mut worker => Finish::Done(result),
        };

        match finish {
            Finish::Cancelled => {
                worker.terminate().await;
                drop(permit);
                info!(%session, %task, elapsed = ?started.elapsed(), "Task cancelled");
                TaskOutcome::Cancelled
            }
            Finish::TimedOut => {
                worker.terminate().await;
                drop(permit);
                info!(%session, %task, elapsed = ?started.elapsed(), "Task timed out");
                let _ = events.send(OutboundEvent::Timeout);
                TaskOutcome::TimedOut
            }
            Finish::Done(Ok(result)) => {
                drop(permit);
                info!(
                    %session, %task, elapsed = ?started.elapsed(),
                    nodes = result.evaluated_nodes,
                    "Task complete"
                );
                let _ = events.send(OutboundEvent::from(result));
                TaskOutcome::Completed
            }
            Finish::Done(Err(e)) => {
                drop(permit);
                warn!(%session, %task, elapsed = ?started.elapsed(), "Task failed: {}", e);
                let _ = events.send(OutboundEvent::error(e.to_string()));
                TaskOutcome::Failed
            }
        }
    }

    /// Run one analysis to completion for a caller without a session
    /// (the HTTP routes). Dropping the returned future cancels the task.
    pub async fn evaluate(self: &Arc<Self>, request: AnalysisRequest) -> Result<AnalysisResult, ServiceError> {
        let session = self.next_session_id();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = self.submit(session, request, tx);
        let guard = handle.cancel.clone().drop_guard();
        debug!(%session, task = %handle.id(), "One-shot analysis submitted");

        let mut last = None;
        while let Some(event) = rx.recv().await {
            match event {
                OutboundEvent::Waiting | OutboundEvent::Running => continue,
                terminal => {
                    last = Some(terminal);
                    break;
                }
            }
        }
        guard.disarm();

        match last {
            Some(OutboundEvent::Complete {
                evaluations,
                evaluated_nodes,
            }) => Ok(AnalysisResult {
                evaluations,
                evaluated_nodes,
            }),
            Some(OutboundEvent::Timeout) => Err(ServiceError::Timeout),
            Some(OutboundEvent::Error { message }) => Err(ServiceError::Failed(message)),
            _ => Err(ServiceError::Failed("task ended without a result".to_string())),
        }
    }
}

fn slots_closed(task: TaskId, events: &EventTx) -> TaskOutcome {
    warn!(%task, "Worker pool is shut down");
    let _ = events.send(OutboundEvent::error("worker pool is shut down"));
    TaskOutcome::Failed
}
