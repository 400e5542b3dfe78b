use thiserror::Error;

use crate::netconf::NetconfError;

/// Failures that end the orchestration of a single device. Each one becomes
/// an error `DeviceResult`; none of them aborts the fleet run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("device identifier '{host}' has no numeric final octet")]
    MalformedAddress { host: String },

    #[error("connect failed: {0}")]
    Connection(NetconfError),

    #[error("Loopback{interface}: {source}")]
    Apply { interface: u8, source: NetconfError },
}
