//! Roster recomputation.
//!
//! Calculates many casts' payrolls on a worker pool bounded by the available
//! CPUs. Each cast gets its own result; one cast failing never affects the
//! others. Outcomes come back in input order.

use std::sync::Arc;
use std::thread;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::calculation::calculate_payroll;
use crate::config::SystemPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayrollInput, PayrollResult};

/// The outcome of one cast's calculation in a roster run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The cast the outcome belongs to.
    pub cast_id: String,
    /// The payroll result, or why it failed.
    pub result: EngineResult<PayrollResult>,
}

/// Returns the number of calculations run at once.
pub fn worker_limit() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Calculates the payroll of every input.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use compensation_engine::batch::calculate_roster;
/// use compensation_engine::config::SystemPolicy;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let policy = Arc::new(SystemPolicy::default());
/// let outcomes = runtime.block_on(calculate_roster(policy, vec![]));
/// assert!(outcomes.is_empty());
/// ```
pub async fn calculate_roster(
    policy: Arc<SystemPolicy>,
    inputs: Vec<PayrollInput>,
) -> Vec<BatchOutcome> {
    let workers = worker_limit();
    let permits = Arc::new(Semaphore::new(workers));
    let total = inputs.len();

    info!(casts = total, workers, "Starting roster calculation");

    let mut handles = Vec::with_capacity(total);
    for input in inputs {
        let cast_id = input.cast.id.clone();
        let policy = Arc::clone(&policy);
        let permits = Arc::clone(&permits);

        let handle = tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    return Err(EngineError::CalculationError {
                        message: format!("worker pool closed: {}", e),
                    });
                }
            };

            match tokio::task::spawn_blocking(move || calculate_payroll(&input, &policy)).await {
                Ok(result) => result,
                Err(e) => Err(EngineError::CalculationError {
                    message: format!("worker failed: {}", e),
                }),
            }
        });
        handles.push((cast_id, handle));
    }

    let mut outcomes = Vec::with_capacity(total);
    let mut failed = 0usize;
    for (cast_id, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(EngineError::CalculationError {
                message: format!("worker failed: {}", e),
            }),
        };

        if let Err(err) = &result {
            failed += 1;
            warn!(cast_id = %cast_id, error = %err, "Cast calculation failed");
        }
        outcomes.push(BatchOutcome { cast_id, result });
    }

    info!(casts = total, failed, "Roster calculation finished");
    outcomes
}
