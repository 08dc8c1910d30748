//! Wire models for the collector admin API.

mod status;
mod task;

pub use status::{ActionResponse, CollectorStatus, ResponseStatus};
pub use task::{
    market_table_name, BatchCreateResponse, CollectorTask, FailedTask, TableStats, TaskList,
    TaskListResponse, TaskRequest,
};
