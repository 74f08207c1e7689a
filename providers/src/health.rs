//! Settings-screen connectivity test.

use std::time::Duration;

use crate::DispatchError;

/// Deadline for `GET {baseUrl}/health`, independent of the generate timeout.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub const MOCK_HEALTH_DELAY: Duration = Duration::from_millis(500);

/// One-line result for the "Test connection" button.
#[must_use]
pub fn describe_health(result: &Result<String, DispatchError>) -> String {
    match result {
        Ok(status) => format!("Success: {status}"),
        Err(DispatchError::BackendError(status)) => format!("Error: {status}"),
        Err(_) => "Error: Unreachable".to_string(),
    }
}
