use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use gateway_ha::{new_err, ElectionError, ProbeSettings, SubnetPrefix};

/// Keys a settings document may nest its values under, in lookup order. The first is the
/// desired-properties section of existing IoT Edge deployments.
const SETTINGS_SECTIONS: [&str; 2] = ["IoTEdgeModuleHA", "gatewayHA"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsDocument {
    broadcast_subnet: Option<String>,
    #[serde(rename = "probeIntervalMS")]
    probe_interval_ms: Option<u64>,
    failed_probe_count: Option<u32>,
    udp_port: Option<u16>,
}

/// Reads probe settings from a JSON document. Absent keys keep their defaults, unknown keys
/// are ignored. The values may sit at the top level or in an "IoTEdgeModuleHA" or "gatewayHA" section.
pub fn settings_from_json(text: &str) -> Result<ProbeSettings, ElectionError> {
    let mut value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => return new_err("Cannot parse settings document".to_string(), err.to_string()),
    };

    let section = SETTINGS_SECTIONS
        .iter()
        .find(|name| value.get(**name).is_some())
        .and_then(|name| value.get_mut(*name).map(|section| section.take()));
    if let Some(section) = section {
        value = section;
    }

    let document: SettingsDocument = match serde_json::from_value(value) {
        Ok(document) => document,
        Err(err) => return new_err("Invalid settings document".to_string(), err.to_string()),
    };

    let mut settings = ProbeSettings::default();
    if let Some(subnet) = document.broadcast_subnet {
        settings.subnet = SubnetPrefix::parse(&subnet)?;
    }
    if let Some(probe_interval_ms) = document.probe_interval_ms {
        settings.probe_interval = Duration::from_millis(probe_interval_ms);
    }
    if let Some(failed_probe_count) = document.failed_probe_count {
        settings.failed_probe_count = failed_probe_count;
    }
    if let Some(udp_port) = document.udp_port {
        settings.udp_port = udp_port;
    }

    settings.validate()?;

    debug!("Probe settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn settings_from_file(path: &Path) -> Result<ProbeSettings, ElectionError> {
    match fs::read_to_string(path) {
        Ok(text) => settings_from_json(&text),
        Err(err) => new_err(format!("Cannot read settings file {}", path.display()), err.to_string()),
    }
}
