use crate::error::ProvisionError;

/// Per-device addressing scheme: loopback N on this device gets
/// 10.{second_octet}.{N}.1/32, where the second octet comes from the final
/// octet of the device's own management address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressPlan {
    pub host: String,
    pub second_octet: u8,
}

/// One loopback interface to be created, in apply order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    pub number: u8,
    pub address: String,
    pub description: String,
}

impl InterfaceSpec {
    pub fn name(&self) -> String {
        format!("Loopback{}", self.number)
    }
}

/// Numeric value of the final dot-separated component of a device identifier.
/// Anything without a numeric 0-255 final component is rejected; the caller
/// turns that into an error result for the device rather than guessing.
pub fn last_octet(host: &str) -> Result<u8, ProvisionError> {
    host.trim()
        .rsplit('.')
        .next()
        .and_then(|part| part.parse::<u8>().ok())
        .ok_or_else(|| ProvisionError::MalformedAddress {
            host: host.trim().to_string(),
        })
}

impl AddressPlan {
    pub fn for_device(host: &str) -> Result<Self, ProvisionError> {
        Ok(Self {
            host: host.trim().to_string(),
            second_octet: last_octet(host)?,
        })
    }

    /// Synthesize the full 1..=count interface sequence without contacting
    /// the device.
    pub fn interfaces(&self, count: u8, description: &str) -> Vec<InterfaceSpec> {
        (1..=count)
            .map(|number| InterfaceSpec {
                number,
                address: format!("10.{}.{}.1/32", self.second_octet, number),
                description: description.to_string(),
            })
            .collect()
    }
}
