//! Domain model (ids, keys, states, task/queue snapshots, errors, outcomes).

pub mod errors;
pub mod ids;
pub mod key;
pub mod outcome;
pub mod queue;
pub mod scheduler;
pub mod server;
pub mod state;
pub mod task;

pub use self::errors::{AdminError, ErrorKind, Result};
pub use self::ids::{EntryId, Id, IdMarker, QueueName, TaskId};
pub use self::key::TaskKey;
pub use self::outcome::{BatchFailure, BatchOutcome, CancelReport};
pub use self::queue::{
    PauseReport, Period, PeriodStats, QueueHistory, QueueInfo, StatsReport, TaskCounts,
};
pub use self::scheduler::{EnqueueEvent, SchedulerEntry};
pub use self::server::{ServerInfo, StoreInfo, WorkerInfo};
pub use self::state::{KeyedState, TaskOp, TaskState};
pub use self::task::{ArchiveReason, RetryInfo, TaskInfo};
