use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Canonical per-device outcome values
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const SKIPPED: &str = "skipped";
    pub const ERROR: &str = "error";
}

/// Login credentials shared by every device in the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// A single device to provision, identified by its management address
#[derive(Debug, Clone)]
pub struct DeviceTarget {
    pub host: String,
    pub credentials: Arc<Credentials>,
}

/// Parameters fixed for the whole fleet run
#[derive(Debug, Clone)]
pub struct RunParams {
    pub count: u8,
    pub description: String,
    pub print_responses: bool,
    pub port: u16,
    pub timeout_secs: u64,
}

/// DeviceResult tracks the outcome of provisioning one device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceResult {
    pub device: String,
    pub status: String,
    pub interfaces_created: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeviceResult {
    /// A fresh result; the status stays `success` unless the sequence skips or fails
    pub fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            status: outcome::SUCCESS.to_string(),
            interfaces_created: 0,
            error: None,
        }
    }

    /// An error result created outside the orchestration itself
    pub fn failed(device: &str, detail: String) -> Self {
        let mut result = Self::new(device);
        result.mark_error(detail);
        result
    }

    /// Count one interface as applied. The count only ever grows and freezes
    /// at its current value when the sequence skips or errors.
    pub fn record_created(&mut self) {
        self.interfaces_created += 1;
    }

    pub fn mark_skipped(&mut self) {
        self.status = outcome::SKIPPED.to_string();
    }

    pub fn mark_error(&mut self, detail: String) {
        self.status = outcome::ERROR.to_string();
        self.error = Some(detail);
    }

    pub fn is_error(&self) -> bool {
        self.status == outcome::ERROR
    }
}

/// Ordered per-device results for one fleet run, in device-list order
#[derive(Debug, Default, Serialize)]
pub struct FleetSummary {
    pub results: Vec<DeviceResult>,
}

impl FleetSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: DeviceResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.count(outcome::SUCCESS)
    }

    pub fn skipped(&self) -> usize {
        self.count(outcome::SKIPPED)
    }

    pub fn failed(&self) -> usize {
        self.count(outcome::ERROR)
    }

    fn count(&self, status: &str) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_result_starts_successful() {
        let result = DeviceResult::new("192.168.56.110");
        assert_eq!(result.status, outcome::SUCCESS);
        assert_eq!(result.interfaces_created, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_mark_error_keeps_partial_count() {
        let mut result = DeviceResult::new("192.168.56.110");
        result.record_created();
        result.record_created();
        result.mark_error("edit rejected".to_string());
        assert_eq!(result.status, outcome::ERROR);
        assert_eq!(result.interfaces_created, 2);
        assert_eq!(result.error.as_deref(), Some("edit rejected"));
    }

    #[test]
    fn test_summary_tallies() {
        let mut summary = FleetSummary::new();
        summary.push(DeviceResult::new("a"));
        let mut skipped = DeviceResult::new("b");
        skipped.mark_skipped();
        summary.push(skipped);
        summary.push(DeviceResult::failed("c", "unreachable".to_string()));
        assert_eq!(summary.len(), 3);
        assert_eq!(summary.succeeded(), 1);
        assert_eq!(summary.skipped(), 1);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_result_serializes_without_empty_error() {
        let json = serde_json::to_string(&DeviceResult::new("a")).unwrap();
        assert!(!json.contains("error"));
        let json = serde_json::to_string(&DeviceResult::failed("a", "boom".to_string())).unwrap();
        assert!(json.contains("\"error\":\"boom\""));
    }
}
