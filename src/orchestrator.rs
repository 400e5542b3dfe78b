use crate::addressing::AddressPlan;
use crate::console::{ConsolePrompt, Prompt};
use crate::error::ProvisionError;
use crate::fleet::Provision;
use crate::models::{DeviceResult, DeviceTarget, RunParams};
use crate::netconf::capabilities;
use crate::netconf::{ManagementSession, NetconfError, NetconfSession};
use crate::payload::{self, LoopbackConfig};
use crate::report;

/// Whether the operator let the device sequence run to completion
enum Outcome {
    Applied,
    Declined,
}

/// Drive the full sequence for one device and finalize its result:
/// derive the address plan, connect, negotiate the datastore, preview,
/// confirm, apply each interface (committing per interface in candidate
/// mode), then optionally persist to startup. Every failure converts into
/// the device's own error result; the session is released on every path.
pub fn configure_device<S, F>(
    connect: F,
    device: &DeviceTarget,
    params: &RunParams,
    prompt: &mut dyn Prompt,
) -> DeviceResult
where
    S: ManagementSession,
    F: FnOnce(&DeviceTarget) -> Result<S, NetconfError>,
{
    let mut result = DeviceResult::new(&device.host);
    match run_sequence(connect, device, params, prompt, &mut result) {
        Ok(Outcome::Applied) => {}
        Ok(Outcome::Declined) => result.mark_skipped(),
        Err(e) => {
            tracing::error!("Error configuring {}: {}", device.host, e);
            result.mark_error(e.to_string());
        }
    }
    result
}

fn run_sequence<S, F>(
    connect: F,
    device: &DeviceTarget,
    params: &RunParams,
    prompt: &mut dyn Prompt,
    result: &mut DeviceResult,
) -> Result<Outcome, ProvisionError>
where
    S: ManagementSession,
    F: FnOnce(&DeviceTarget) -> Result<S, NetconfError>,
{
    // Derived before connecting: a misaddressed device costs no session
    let plan = AddressPlan::for_device(&device.host)?;

    tracing::info!("Connecting to {} via NETCONF...", device.host);
    let mut session = connect(device).map_err(ProvisionError::Connection)?;

    let negotiation = capabilities::negotiate(&device.host, session.capabilities());
    tracing::info!(
        "{}: loopback addresses use second octet {}",
        device.host,
        plan.second_octet
    );

    let specs = plan.interfaces(params.count, &params.description);
    report::print_preview(&device.host, &specs);

    if !prompt.confirm(&format!(
        "Proceed with creation of {} loopbacks on {}?",
        specs.len(),
        device.host
    )) {
        tracing::info!("Skipping {} as requested", device.host);
        return Ok(Outcome::Declined);
    }

    for spec in &specs {
        let document = LoopbackConfig::new(spec.number, plan.second_octet, &spec.description);
        let reply = session
            .edit_config(negotiation.target, &document.to_xml())
            .map_err(|e| ProvisionError::Apply {
                interface: spec.number,
                source: e,
            })?;
        if params.print_responses {
            report::print_response(&reply.raw);
        }
        result.record_created();

        // One commit per interface; the next edit only starts once this
        // change is live
        if negotiation.uses_candidate() {
            let commit_reply = session.commit().map_err(|e| ProvisionError::Apply {
                interface: spec.number,
                source: e,
            })?;
            if params.print_responses {
                report::print_response(&commit_reply.raw);
            }
        }
    }

    if prompt.confirm(&format!("Save config to startup on {}?", device.host)) {
        // Non-fatal: the interfaces are already live
        match session.dispatch(&payload::save_config_rpc()) {
            Ok(reply) => {
                tracing::info!("Configuration saved to startup on {}", device.host);
                if params.print_responses {
                    report::print_response(&reply.raw);
                }
            }
            Err(e) => {
                tracing::warn!("Could not save config to startup on {}: {}", device.host, e);
            }
        }
    }

    Ok(Outcome::Applied)
}

/// Production provisioner: real NETCONF sessions plus interactive confirms
pub struct NetconfProvisioner;

impl Provision for NetconfProvisioner {
    fn provision(&self, device: &DeviceTarget, params: &RunParams) -> DeviceResult {
        let connect = |target: &DeviceTarget| {
            NetconfSession::connect(
                &target.host,
                params.port,
                &target.credentials,
                params.timeout_secs,
            )
        };
        configure_device(connect, device, params, &mut ConsolePrompt)
    }
}
