//! Metrics reports for lighting runs, exported as JSON for CI artifacts and regression checks.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level report written to `metrics.json` by tests and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test/scenario identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601)
    pub timestamp: String,

    /// Git commit hash (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,

    /// Overall result
    pub result: TestResult,

    /// Lighting generation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingMetrics>,

    /// Execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// All validations passed
    Pass,
    /// A validation failed
    Fail,
    /// Not run
    Skip,
}

/// Lighting generation cost and outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightingMetrics {
    /// Chunks lit during the run
    pub chunks_generated: usize,
    /// Cells whose regen reached the cap
    pub regen_saturated: usize,
    /// Sunlight seeds committed by the column scan
    pub sunlight_seeds: usize,
    /// Luminous blocks seeded into the point-light channel
    pub light_seeds: usize,
    /// Queue entries processed across both propagated channels
    pub nodes_processed: usize,
    /// Mean wall time per chunk (microseconds)
    pub avg_generation_time_us: f64,
    /// Processed nodes per second
    pub nodes_per_second: f64,
    /// Light digest of the last chunk, hex encoded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_digest: Option<String>,
}

impl LightingMetrics {
    /// Derive the rate fields from the counters and a total wall time.
    pub fn with_timing(mut self, total_seconds: f64) -> Self {
        if self.chunks_generated > 0 {
            self.avg_generation_time_us = total_seconds * 1e6 / self.chunks_generated as f64;
        }
        if total_seconds > 0.0 {
            self.nodes_per_second = self.nodes_processed as f64 / total_seconds;
        }
        self
    }
}

/// Test execution and infrastructure metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total duration (seconds)
    pub duration_seconds: f64,

    /// Number of assertions checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,

    /// Number of validations passed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_passed: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                commit_hash: None,
                result: TestResult::Pass,
                lighting: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set test result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set commit hash
    pub fn commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.report.commit_hash = Some(hash.into());
        self
    }

    /// Set lighting metrics
    pub fn lighting(mut self, metrics: LightingMetrics) -> Self {
        self.report.lighting = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), test = %report.test_name, "wrote metrics report");
        Ok(())
    }
}
