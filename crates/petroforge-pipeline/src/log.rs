use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use petroforge_core::TableName;
use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    NotStarted,
    Running,
    Success,
    Failed,
}

impl PipelineStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineStatus::NotStarted => "not_started",
            PipelineStatus::Running => "running",
            PipelineStatus::Success => "success",
            PipelineStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record of one pipeline run, serialized as the execution report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionLog {
    pub run_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: PipelineStatus,
    pub tables_generated: BTreeMap<TableName, u64>,
    pub tables_validated: BTreeMap<TableName, u64>,
    pub tables_inserted: BTreeMap<TableName, u64>,
    pub errors: Vec<String>,
}

impl ExecutionLog {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            start_time: None,
            end_time: None,
            status: PipelineStatus::NotStarted,
            tables_generated: BTreeMap::new(),
            tables_validated: BTreeMap::new(),
            tables_inserted: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// `not_started -> running`, stamping the start time.
    pub fn start(&mut self) -> Result<(), PipelineError> {
        self.transition(PipelineStatus::Running)?;
        self.start_time = Some(Utc::now());
        Ok(())
    }

    /// `running -> success`.
    pub fn succeed(&mut self) -> Result<(), PipelineError> {
        self.transition(PipelineStatus::Success)?;
        self.end_time = Some(Utc::now());
        Ok(())
    }

    /// `running -> failed`, appending the triggering error.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), PipelineError> {
        self.transition(PipelineStatus::Failed)?;
        self.end_time = Some(Utc::now());
        self.errors.push(error.into());
        Ok(())
    }

    pub fn record_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// Elapsed time between start and end, or until now while running.
    pub fn duration(&self) -> Option<Duration> {
        let start = self.start_time?;
        let end = self.end_time.unwrap_or_else(Utc::now);
        Some(end - start)
    }

    pub fn total_inserted(&self) -> u64 {
        self.tables_inserted.values().sum()
    }

    fn transition(&mut self, to: PipelineStatus) -> Result<(), PipelineError> {
        let allowed = matches!(
            (self.status, to),
            (PipelineStatus::NotStarted, PipelineStatus::Running)
                | (PipelineStatus::Running, PipelineStatus::Success)
                | (PipelineStatus::Running, PipelineStatus::Failed)
        );
        if !allowed {
            return Err(PipelineError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_moves_through_terminal_state_once() {
        let mut log = ExecutionLog::new("run");
        assert!(log.duration().is_none());
        log.start().unwrap();
        assert_eq!(log.status, PipelineStatus::Running);
        assert!(log.start_time.is_some());

        log.fail("insertion: boom").unwrap();
        assert_eq!(log.status, PipelineStatus::Failed);
        assert!(log.end_time.is_some());
        assert_eq!(log.errors, vec!["insertion: boom".to_string()]);
        assert!(log.duration().unwrap() >= Duration::zero());

        assert!(matches!(
            log.succeed(),
            Err(PipelineError::InvalidTransition {
                from: PipelineStatus::Failed,
                to: PipelineStatus::Success
            })
        ));
    }

    #[test]
    fn cannot_finish_before_start() {
        let mut log = ExecutionLog::new("run");
        assert!(log.succeed().is_err());
        assert!(log.fail("early").is_err());
        assert!(log.errors.is_empty());
        assert_eq!(log.status, PipelineStatus::NotStarted);
    }

    #[test]
    fn serializes_table_maps_by_name() {
        let mut log = ExecutionLog::new("run");
        log.tables_generated.insert(TableName::Wells, 3);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["tables_generated"]["raw_pocos"], 3);
    }
}
