//! minimax-server
//!
//! Admission-controlled analysis service: a task scheduler over a pool
//! of killable worker processes, WebSocket sessions, and one-shot HTTP
//! routes.

pub mod config;
pub mod types;
pub mod error;
pub mod executor;
pub mod scheduler;
pub mod session;
pub mod server;
pub mod worker;

pub use config::Config;
pub use error::{ExecutorError, ServiceError};
pub use executor::{Executor, ProcessExecutor, WorkerHandle};
pub use scheduler::{Scheduler, SchedulerStats, SessionTicket, TaskHandle, TaskOutcome};
pub use session::Session;
