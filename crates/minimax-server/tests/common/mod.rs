// crates/minimax-server/tests/common/mod.rs
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Semaphore};

use minimax_core::{analyze, AnalysisRequest, GameKind};
use minimax_protocol::OutboundEvent;
use minimax_server::types::EventRx;
use minimax_server::{Executor, ExecutorError, Scheduler, WorkerHandle};

/// In-process executor whose jobs block until the test opens the gate.
///
/// Each released job runs the real analysis (keep boards small) or, in
/// failing mode, reports an error.
pub struct GatedExecutor {
    gate: Arc<Semaphore>,
    launched: AtomicUsize,
    live: Arc<AtomicUsize>,
    fail: bool,
}

struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GatedExecutor {
    pub fn new() -> Arc<Self> {
        Self::with_mode(false)
    }

    pub fn failing() -> Arc<Self> {
        Self::with_mode(true)
    }

    fn with_mode(fail: bool) -> Arc<Self> {
        Arc::new(GatedExecutor {
            gate: Arc::new(Semaphore::new(0)),
            launched: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
            fail,
        })
    }

    /// Let `n` jobs finish.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Jobs ever started.
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    /// Jobs started and neither finished nor killed.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl Executor for GatedExecutor {
    fn launch(&self, request: &AnalysisRequest) -> Result<WorkerHandle, ExecutorError> {
        self.launched.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);

        let guard = LiveGuard(Arc::clone(&self.live));
        let gate = Arc::clone(&self.gate);
        let request = *request;
        let fail = self.fail;
        let (kill_tx, kill_rx) = oneshot::channel::<()>();

        let outcome = tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                _ = kill_rx => Err(ExecutorError::Terminated),
                permit = gate.acquire() => {
                    if let Ok(permit) = permit {
                        permit.forget();
                    }
                    if fail {
                        Err(ExecutorError::Supervisor("worker crashed".to_string()))
                    } else {
                        Ok(analyze(&request))
                    }
                }
            }
        });
        Ok(WorkerHandle::new(outcome, kill_tx))
    }
}

pub fn scheduler(
    worker_limit: usize,
    session_limit: usize,
    timeout: Duration,
    executor: Arc<GatedExecutor>,
) -> Arc<Scheduler> {
    Arc::new(Scheduler::new(worker_limit, session_limit, timeout, executor))
}

pub fn small_request() -> AnalysisRequest {
    AnalysisRequest::parse(GameKind::TicTacToe, "xx_oo____", false, false, None).unwrap()
}

/// Next event, failing the test if none arrives within two seconds.
pub async fn next_event(rx: &mut EventRx) -> OutboundEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("event channel closed")
}

/// Everything already queued, without waiting.
pub fn drain(rx: &mut EventRx) -> Vec<OutboundEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Yield until `check` holds, or fail after two seconds.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !check() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
