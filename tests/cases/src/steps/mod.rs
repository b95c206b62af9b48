use std::net::SocketAddr;
use std::thread;
use std::time::{Duration, Instant};

use gateway_ha::{ProbeSettings, SubnetPrefix};

pub mod cluster;

pub fn sleep_ms(milliseconds: u64) {
    thread::sleep(Duration::from_millis(milliseconds));
}

/// Subnet of the in-process case network.
pub fn case_subnet() -> SubnetPrefix {
    SubnetPrefix::new(10, 0, 0)
}

pub fn case_settings() -> ProbeSettings {
    ProbeSettings {
        subnet: case_subnet(),
        ..ProbeSettings::default()
    }
}

pub fn address(host: u8) -> SocketAddr {
    case_subnet().host_address(host, case_settings().udp_port)
}

/// Polls the condition every 20 ms until it holds or the timeout elapses.
pub fn wait_for<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep_ms(20);
    }
}
