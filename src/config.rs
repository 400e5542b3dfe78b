use std::env;

use anyhow::{bail, Context, Result};

/// Config holds all run configuration sourced from the environment
#[derive(Debug, Clone)]
pub struct Config {
    pub inventory_path: String,
    pub devices_override: Option<String>,
    pub port: u16,
    pub timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            inventory_path: get_env("LOOPFORGE_INVENTORY", "devices.json"),
            devices_override: env::var("LOOPFORGE_DEVICES")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            port: get_env("NETCONF_PORT", "830").parse().unwrap_or(830),
            timeout_secs: get_env("CONNECT_TIMEOUT_SECS", "30").parse().unwrap_or(30),
        }
    }

    /// Device hosts for this run: the env override wins, otherwise the JSON
    /// inventory file. An empty fleet is a startup error.
    pub fn load_inventory(&self) -> Result<Vec<String>> {
        let hosts = if let Some(raw) = &self.devices_override {
            parse_override(raw)
        } else {
            let content = std::fs::read_to_string(&self.inventory_path)
                .with_context(|| format!("reading device inventory {}", self.inventory_path))?;
            parse_inventory(&content)
                .with_context(|| format!("parsing device inventory {}", self.inventory_path))?
        };

        if hosts.is_empty() {
            bail!("device inventory is empty, nothing to provision");
        }
        Ok(hosts)
    }
}

/// The inventory file is a JSON array of device addresses
fn parse_inventory(content: &str) -> Result<Vec<String>> {
    let hosts: Vec<String> = serde_json::from_str(content)?;
    Ok(hosts
        .into_iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect())
}

/// LOOPFORGE_DEVICES is a comma-separated address list
fn parse_override(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_with_inventory(path: &str) -> Config {
        Config {
            inventory_path: path.to_string(),
            devices_override: None,
            port: 830,
            timeout_secs: 30,
        }
    }

    #[test]
    fn test_parse_inventory_array() {
        let hosts = parse_inventory(r#"["192.168.56.110", "192.168.56.111"]"#).unwrap();
        assert_eq!(hosts, ["192.168.56.110", "192.168.56.111"]);
    }

    #[test]
    fn test_parse_inventory_rejects_non_array() {
        assert!(parse_inventory(r#"{"host": "192.168.56.110"}"#).is_err());
        assert!(parse_inventory("not json").is_err());
    }

    #[test]
    fn test_parse_override_splits_and_trims() {
        assert_eq!(
            parse_override("10.0.0.1, 10.0.0.2,,10.0.0.3 "),
            ["10.0.0.1", "10.0.0.2", "10.0.0.3"]
        );
    }

    #[test]
    fn test_load_inventory_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["192.168.56.110"]"#).unwrap();

        let cfg = config_with_inventory(file.path().to_str().unwrap());
        assert_eq!(cfg.load_inventory().unwrap(), ["192.168.56.110"]);
    }

    #[test]
    fn test_override_wins_over_file() {
        let mut cfg = config_with_inventory("/nonexistent/devices.json");
        cfg.devices_override = Some("10.0.0.1,10.0.0.2".to_string());
        assert_eq!(cfg.load_inventory().unwrap(), ["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_empty_inventory_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let cfg = config_with_inventory(file.path().to_str().unwrap());
        assert!(cfg.load_inventory().is_err());

        let missing = config_with_inventory("/nonexistent/devices.json");
        assert!(missing.load_inventory().is_err());
    }
}
