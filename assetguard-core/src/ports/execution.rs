// assetguard-core/src/ports/execution.rs

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::error::AssetGuardError;

/// One check invocation, recorded after the check completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionEvent {
    pub check_id: String,
    pub findings_count: usize,
    pub executed_at: DateTime<Local>,
}

impl ExecutionEvent {
    pub fn now(check_id: impl Into<String>, findings_count: usize) -> Self {
        Self {
            check_id: check_id.into(),
            findings_count,
            executed_at: Local::now(),
        }
    }
}

/// Receives one event per executed check (audit log, progress display...).
pub trait ExecutionSink {
    fn record(&mut self, event: &ExecutionEvent) -> Result<(), AssetGuardError>;
}

impl ExecutionSink for Vec<ExecutionEvent> {
    fn record(&mut self, event: &ExecutionEvent) -> Result<(), AssetGuardError> {
        self.push(event.clone());
        Ok(())
    }
}

/// Fans one event out to several sinks, in order.
pub struct TeeSink<'a> {
    sinks: Vec<&'a mut dyn ExecutionSink>,
}

impl<'a> TeeSink<'a> {
    pub fn new(sinks: Vec<&'a mut dyn ExecutionSink>) -> Self {
        Self { sinks }
    }
}

impl ExecutionSink for TeeSink<'_> {
    fn record(&mut self, event: &ExecutionEvent) -> Result<(), AssetGuardError> {
        for sink in self.sinks.iter_mut() {
            sink.record(event)?;
        }
        Ok(())
    }
}
