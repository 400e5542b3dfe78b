use std::sync::Arc;

use crate::models::{DeviceResult, DeviceTarget, FleetSummary, RunParams};

/// Per-device provisioning strategy. Blocking; the runner drives it on the
/// blocking pool one device at a time.
pub trait Provision: Send + Sync + 'static {
    fn provision(&self, device: &DeviceTarget, params: &RunParams) -> DeviceResult;
}

/// Runs the whole fleet sequentially and aggregates per-device results
pub struct FleetRunner<P: Provision> {
    devices: Vec<DeviceTarget>,
    params: Arc<RunParams>,
    provisioner: Arc<P>,
}

impl<P: Provision> FleetRunner<P> {
    pub fn new(devices: Vec<DeviceTarget>, params: RunParams, provisioner: P) -> Self {
        Self {
            devices,
            params: Arc::new(params),
            provisioner: Arc::new(provisioner),
        }
    }

    /// Process devices in input order, one at a time. A failed device never
    /// stops the rest: even a panicked orchestration is converted into an
    /// error entry, so the summary covers every device attempted.
    pub async fn run(&self) -> FleetSummary {
        let mut summary = FleetSummary::new();

        for target in &self.devices {
            let device = target.clone();
            let host = target.host.clone();
            let params = self.params.clone();
            let provisioner = self.provisioner.clone();

            let outcome =
                tokio::task::spawn_blocking(move || provisioner.provision(&device, &params)).await;

            match outcome {
                Ok(result) => summary.push(result),
                Err(e) => {
                    tracing::error!("Provisioning task for {} aborted: {}", host, e);
                    summary.push(DeviceResult::failed(&host, format!("task aborted: {}", e)));
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{outcome, Credentials};

    struct FakeProvisioner {
        fail_host: Option<&'static str>,
        panic_host: Option<&'static str>,
    }

    impl Provision for FakeProvisioner {
        fn provision(&self, device: &DeviceTarget, _params: &RunParams) -> DeviceResult {
            if self.panic_host == Some(device.host.as_str()) {
                panic!("simulated orchestration panic");
            }
            if self.fail_host == Some(device.host.as_str()) {
                return DeviceResult::failed(&device.host, "simulated failure".to_string());
            }
            let mut result = DeviceResult::new(&device.host);
            result.record_created();
            result
        }
    }

    fn targets(hosts: &[&str]) -> Vec<DeviceTarget> {
        let credentials = Arc::new(Credentials {
            username: "admin".to_string(),
            password: "admin".to_string(),
        });
        hosts
            .iter()
            .map(|host| DeviceTarget {
                host: host.to_string(),
                credentials: credentials.clone(),
            })
            .collect()
    }

    fn params() -> RunParams {
        RunParams {
            count: 1,
            description: "test".to_string(),
            print_responses: false,
            port: 830,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_one_failure_never_stops_the_fleet() {
        let runner = FleetRunner::new(
            targets(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
            params(),
            FakeProvisioner {
                fail_host: Some("10.0.0.2"),
                panic_host: None,
            },
        );

        let summary = tokio_test::block_on(runner.run());

        assert_eq!(summary.len(), 3);
        let hosts: Vec<&str> = summary.results.iter().map(|r| r.device.as_str()).collect();
        assert_eq!(hosts, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
        assert_eq!(summary.results[0].status, outcome::SUCCESS);
        assert_eq!(summary.results[1].status, outcome::ERROR);
        assert_eq!(summary.results[2].status, outcome::SUCCESS);
    }

    #[test]
    fn test_panicked_orchestration_becomes_error_entry() {
        let runner = FleetRunner::new(
            targets(&["10.0.0.1", "10.0.0.2"]),
            params(),
            FakeProvisioner {
                fail_host: None,
                panic_host: Some("10.0.0.1"),
            },
        );

        let summary = tokio_test::block_on(runner.run());

        assert_eq!(summary.len(), 2);
        assert!(summary.results[0].is_error());
        assert!(summary.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("task aborted"));
        assert_eq!(summary.results[1].status, outcome::SUCCESS);
    }
}
