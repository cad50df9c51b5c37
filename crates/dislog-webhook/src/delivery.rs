//! Webhook delivery receipts.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a single webhook delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Unique identifier for the attempt, used for log correlation.
    pub request_id: Uuid,
    /// HTTP status code returned by the webhook endpoint.
    pub status_code: u16,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl DeliveryReceipt {
    /// Creates a new receipt for a completed attempt.
    pub fn new(request_id: Uuid, status_code: u16, started_at: Timestamp) -> Self {
        Self {
            request_id,
            status_code,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the endpoint acknowledged the delivery (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Elapsed wall-clock time for the attempt.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_receipt() {
        let request_id = Uuid::now_v7();
        let receipt = DeliveryReceipt::new(request_id, 204, Timestamp::now());

        assert!(receipt.is_success());
        assert_eq!(receipt.request_id, request_id);
        assert_eq!(receipt.status_code, 204);
    }

    #[test]
    fn test_failure_receipt() {
        let started_at = Timestamp::now();

        assert!(!DeliveryReceipt::new(Uuid::now_v7(), 400, started_at).is_success());
        assert!(!DeliveryReceipt::new(Uuid::now_v7(), 500, started_at).is_success());
        assert!(DeliveryReceipt::new(Uuid::now_v7(), 200, started_at).is_success());
    }
}
