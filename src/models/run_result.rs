//! Results of executing a test plan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Draft, EntityId, Record, RecordContext};
use crate::error::ValidationErrors;

/// Run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Warning,
    Error,
    Running,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Running => "running",
        }
    }

    /// Derive the outcome from counts: any failure is an error, skips
    /// alone are a warning.
    pub fn from_counts(failed: u32, skipped: u32) -> Self {
        if failed > 0 {
            Self::Error
        } else if skipped > 0 {
            Self::Warning
        } else {
            Self::Success
        }
    }
}

/// Stored run result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub id: EntityId,
    /// Name of the executed test plan
    pub test_plan: String,
    pub status: RunStatus,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    /// Always `passed + failed + skipped`
    pub tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub executed_by: String,
}

impl RunResult {
    /// Pass rate in percent, `None` for an empty run.
    pub fn pass_rate(&self) -> Option<f64> {
        if self.tests == 0 {
            None
        } else {
            Some(self.passed as f64 * 100.0 / self.tests as f64)
        }
    }
}

impl Record for RunResult {
    fn id(&self) -> EntityId {
        self.id
    }

    // Run results are immutable history
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// Recorded run input. `status` overrides the count-derived outcome,
/// which is how in-flight runs are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResultDraft {
    pub test_plan: String,
    pub status: Option<RunStatus>,
    pub duration_ms: u64,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl Draft for RunResultDraft {
    type Record = RunResult;

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("testPlan", &self.test_plan, "Test plan is required");
        if self
            .passed
            .checked_add(self.failed)
            .and_then(|n| n.checked_add(self.skipped))
            .is_none()
        {
            errors.add("tests", "Test counts are out of range");
        }
        errors.into_result()
    }

    fn build(self, ctx: &RecordContext) -> RunResult {
        let status = self
            .status
            .unwrap_or_else(|| RunStatus::from_counts(self.failed, self.skipped));
        RunResult {
            id: ctx.id,
            test_plan: self.test_plan,
            status,
            duration_ms: self.duration_ms,
            timestamp: ctx.now,
            tests: self.passed.saturating_add(self.failed).saturating_add(self.skipped),
            passed: self.passed,
            failed: self.failed,
            skipped: self.skipped,
            executed_by: ctx.author.clone(),
        }
    }

    fn apply(self, record: &mut RunResult, _now: DateTime<Utc>) {
        record.test_plan = self.test_plan;
        record.status = self
            .status
            .unwrap_or_else(|| RunStatus::from_counts(self.failed, self.skipped));
        record.duration_ms = self.duration_ms;
        record.passed = self.passed;
        record.failed = self.failed;
        record.skipped = self.skipped;
        record.tests = self.passed.saturating_add(self.failed).saturating_add(self.skipped);
    }
}
