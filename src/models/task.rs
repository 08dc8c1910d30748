//! Collector task models.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::ResponseStatus;

/// One task creation record: a product on a server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskRequest {
    pub server_type: i64,
    pub product_type: i64,
}

impl TaskRequest {
    pub fn new(server_type: i64, product_type: i64) -> Self {
        Self {
            server_type,
            product_type,
        }
    }

    /// Name of the market table the backend keeps for this task.
    pub fn table_name(&self) -> String {
        market_table_name(self.server_type, self.product_type)
    }
}

/// Market table name for a server/product pair.
pub fn market_table_name(server_type: i64, product_type: i64) -> String {
    format!("market_{}_{}", server_type, product_type)
}

/// Task the backend refused to create inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedTask {
    pub server_type: i64,
    pub product_type: i64,
    #[serde(default)]
    pub reason: String,
}

/// Body of `POST /admin/task/batch_create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchCreateResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_tasks: Vec<FailedTask>,
}

impl BatchCreateResponse {
    pub fn is_success(&self) -> bool {
        self.status == Some(ResponseStatus::Success)
    }

    /// Error message enriched with per-task failure reasons.
    pub fn error_message(&self) -> String {
        let base = self
            .message
            .clone()
            .unwrap_or_else(|| "create failed".to_string());
        if self.failed_tasks.is_empty() {
            return base;
        }
        let reasons: Vec<String> = self
            .failed_tasks
            .iter()
            .map(|t| format!("{}/{}: {}", t.server_type, t.product_type, t.reason))
            .collect();
        format!("{} ({})", base, reasons.join("; "))
    }
}

/// Row of the collector task table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorTask {
    pub id: i64,
    pub server_type: i64,
    pub product_type: i64,
    #[serde(default)]
    pub last_collection_time: Option<String>,
    #[serde(default)]
    pub total_collections: u64,
    #[serde(default, deserialize_with = "flag")]
    pub last_collection_success: bool,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl CollectorTask {
    pub fn table_name(&self) -> String {
        market_table_name(self.server_type, self.product_type)
    }
}

/// MySQL hands booleans back as 0/1.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    })
}

/// Row counts of one market table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub batch_count: u64,
    #[serde(default)]
    pub last_batch_count: u64,
    #[serde(default = "no_update_time")]
    pub last_update_time: String,
}

fn no_update_time() -> String {
    "-".to_string()
}

impl Default for TableStats {
    fn default() -> Self {
        Self {
            total_count: 0,
            batch_count: 0,
            last_batch_count: 0,
            last_update_time: no_update_time(),
        }
    }
}

/// Payload of `GET /admin/collector/tasks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(default)]
    pub tasks: Vec<CollectorTask>,
    #[serde(default)]
    pub table_stats: HashMap<String, TableStats>,
}

impl TaskList {
    /// Stats for a task's market table, zeroed when the table is missing.
    pub fn stats_for(&self, task: &CollectorTask) -> TableStats {
        self.table_stats
            .get(&task.table_name())
            .cloned()
            .unwrap_or_default()
    }
}

/// Envelope around [`TaskList`]; `code == 0` means success.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<TaskList>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_request_serializes_wire_names() {
        let json = serde_json::to_value(TaskRequest::new(5, 12)).unwrap();
        assert_eq!(json, serde_json::json!({"server_type": 5, "product_type": 12}));
    }

    #[test]
    fn test_collector_task_accepts_integer_flag() {
        let json = serde_json::json!({
            "id": 3,
            "server_type": 1,
            "product_type": 20,
            "total_collections": 4,
            "last_collection_success": 1,
            "last_error": null
        });
        let task: CollectorTask = serde_json::from_value(json).unwrap();
        assert!(task.last_collection_success);
        assert_eq!(task.table_name(), "market_1_20");
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let list = TaskList {
            tasks: vec![],
            table_stats: HashMap::new(),
        };
        let task = CollectorTask {
            id: 1,
            server_type: 0,
            product_type: 1,
            last_collection_time: None,
            total_collections: 0,
            last_collection_success: false,
            last_error: None,
        };
        let stats = list.stats_for(&task);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.last_update_time, "-");
    }

    #[test]
    fn test_batch_error_message_lists_failed_tasks() {
        let resp = BatchCreateResponse {
            status: Some(ResponseStatus::Error),
            message: Some("partial failure".to_string()),
            created_count: Some(0),
            failed_tasks: vec![FailedTask {
                server_type: 1,
                product_type: 2,
                reason: "table".to_string(),
            }],
        };
        assert_eq!(resp.error_message(), "partial failure (1/2: table)");
    }
}
