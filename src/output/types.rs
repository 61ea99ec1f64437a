// src/output/types.rs
use crate::error::AppError;
use std::fmt;
use std::path::PathBuf;

/// The deliveries requested for one piece of text.
#[derive(Debug, Clone, Default)]
pub struct DeliveryPlan {
    pub targets: Vec<DeliveryTarget>,
}

impl DeliveryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: DeliveryTarget) -> Self {
        self.targets.push(target);
        self
    }

    /// Adds `target` only when `enabled` is true.
    pub fn with_target_if(self, enabled: bool, target: DeliveryTarget) -> Self {
        if enabled {
            self.with_target(target)
        } else {
            self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Where a piece of text goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    WriteFile { path: PathBuf, content: String },
    CopyToClipboard { content: String },
    PrintToStdout { content: String },
}

impl fmt::Display for DeliveryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryTarget::WriteFile { path, .. } => write!(f, "file {}", path.display()),
            DeliveryTarget::CopyToClipboard { .. } => write!(f, "clipboard"),
            DeliveryTarget::PrintToStdout { .. } => write!(f, "stdout"),
        }
    }
}

/// A delivery that went through.
#[derive(Debug, Clone)]
pub struct Delivered {
    pub target: DeliveryTarget,
    pub bytes: usize,
}

/// A delivery that did not.
#[derive(Debug, Clone)]
pub struct FailedDelivery {
    pub target: DeliveryTarget,
    pub error: String,
}

/// What happened to each target of a plan.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<Delivered>,
    pub failed: Vec<FailedDelivery>,
    pub elapsed_ms: u64,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn bytes_written(&self) -> usize {
        self.delivered.iter().map(|d| d.bytes).sum()
    }

    /// Turns any failed delivery into an error.
    pub fn into_result(self) -> Result<Self, AppError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::DeliveryFailed {
                failures: self
                    .failed
                    .iter()
                    .map(|f| format!("{}: {}", f.target, f.error))
                    .collect(),
            })
        }
    }
}
