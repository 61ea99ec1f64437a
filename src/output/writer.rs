// src/output/writer.rs
use super::clipboard::copy_to_clipboard;
use super::types::{Delivered, DeliveryPlan, DeliveryReport, DeliveryTarget, FailedDelivery};
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// Carries out every target of `plan`; a failing target does not stop the rest.
pub fn deliver(plan: DeliveryPlan) -> DeliveryReport {
    let started = Instant::now();
    let mut report = DeliveryReport::default();

    for target in plan.targets {
        match execute(&target) {
            Ok(bytes) => {
                log::debug!("Delivered {} bytes to {}", bytes, target);
                report.delivered.push(Delivered { target, bytes });
            }
            Err(e) => {
                log::error!("Delivery to {} failed: {}", target, e);
                report.failed.push(FailedDelivery {
                    error: e.to_string(),
                    target,
                });
            }
        }
    }

    report.elapsed_ms = started.elapsed().as_millis() as u64;
    log::info!(
        "Delivery finished: {} ok, {} failed in {}ms",
        report.delivered.len(),
        report.failed.len(),
        report.elapsed_ms
    );
    report
}

fn execute(target: &DeliveryTarget) -> Result<usize, AppError> {
    match target {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::CopyToClipboard { content } => {
            copy_to_clipboard(content)?;
            Ok(content.len())
        }
        DeliveryTarget::PrintToStdout { content } => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", content)?;
            stdout.flush()?;
            Ok(content.len())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<usize, AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    log::info!("Wrote {}", path.display());
    Ok(content.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("prompt2post-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_writes_file_and_creates_parents() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("post.txt");
        let plan = DeliveryPlan::new().with_target(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: "Hello".to_string(),
        });

        let report = deliver(plan);
        assert!(report.is_success());
        assert_eq!(report.bytes_written(), 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello");
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_failed_target_is_reported_and_others_continue() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("ok.txt");
        let plan = DeliveryPlan::new()
            .with_target(DeliveryTarget::WriteFile {
                // a directory cannot be overwritten with a file
                path: dir.clone(),
                content: "x".to_string(),
            })
            .with_target(DeliveryTarget::WriteFile {
                path: good.clone(),
                content: "y".to_string(),
            });

        let report = deliver(plan);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.delivered.len(), 1);
        assert!(good.exists());

        let err = report.into_result().unwrap_err();
        assert!(matches!(err, AppError::DeliveryFailed { ref failures } if failures.len() == 1));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_conditional_targets() {
        let plan = DeliveryPlan::new()
            .with_target_if(false, DeliveryTarget::CopyToClipboard {
                content: "x".to_string(),
            })
            .with_target_if(true, DeliveryTarget::PrintToStdout {
                content: "x".to_string(),
            });
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].to_string(), "stdout");
    }
}
