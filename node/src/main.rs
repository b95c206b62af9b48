#[macro_use]
extern crate log;
extern crate chrono;
extern crate env_logger;

use std::env;
use std::io::Write;
use std::path::Path;
use std::process;

use chrono::prelude::{DateTime, Local};

extern crate gateway_ha;
extern crate gateway_ha_modules;

use gateway_ha::{ElectionError, NodeConfiguration, ProbeSettings};
use gateway_ha_modules::{settings_from_file, LogErrorReporter, LogStatePublisher, UdpTransport};

const NODE_ID_VARIABLES: [&str; 2] = ["GATEWAY_ID", "IOTEDGE_DEVICEID"];
const SETTINGS_FILE_VARIABLE: &str = "GATEWAY_HA_SETTINGS";

fn init_logger() {
    env_logger::builder()
        .format(|buf, record| {
            let now: DateTime<Local> = Local::now();
            writeln!(buf, "{:5}: {} - {}", record.level(), now.format("%H:%M:%S.%3f").to_string(), record.args())
        })
        .init();
}

fn main() {
    init_logger();

    if let Err(err) = run() {
        error!("Gateway node failed: {}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), ElectionError> {
    let node_id = get_node_id()?;
    let settings = get_settings()?;

    let transport = UdpTransport::bind(settings.udp_port)?;

    let node_config = NodeConfiguration {
        node_id,
        boot_epoch: None,
        settings,
        transport,
        state_publisher: LogStatePublisher,
        error_reporter: LogErrorReporter,
    };

    let node_worker = gateway_ha::start_node(node_config)?;

    info!("Gateway node {} running", node_worker.node_id());

    node_worker.join();
    Ok(())
}

fn get_node_id() -> Result<String, ElectionError> {
    for variable in NODE_ID_VARIABLES.iter() {
        if let Ok(value) = env::var(variable) {
            if !value.trim().is_empty() {
                return Ok(value.trim().to_string());
            }
        }
    }

    gateway_ha::new_err(
        "Node id is not configured".to_string(),
        format!("set one of {:?}", NODE_ID_VARIABLES),
    )
}

fn get_settings() -> Result<ProbeSettings, ElectionError> {
    match env::var(SETTINGS_FILE_VARIABLE) {
        Ok(path) => settings_from_file(Path::new(&path)),
        Err(_) => {
            info!("{} is not set, using default probe settings", SETTINGS_FILE_VARIABLE);
            Ok(ProbeSettings::default())
        }
    }
}
