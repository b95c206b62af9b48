use std::fmt;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;

use crate::communication::HeartbeatTransport;
use crate::errors::{new_err, ElectionError};
use crate::reporting::{ErrorReporter, StatePublisher};

pub const DEFAULT_PROBE_INTERVAL_MS: u64 = 200;
pub const DEFAULT_FAILED_PROBE_COUNT: u32 = 3;
pub const DEFAULT_UDP_PORT: u16 = 60000;
pub const DEFAULT_SUBNET_PREFIX: &str = "192.168.15.";

/// First three octets of the monitored /24 network. Heartbeats go to hosts 1..=254.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SubnetPrefix {
    octets: [u8; 3],
}

impl SubnetPrefix {
    pub fn new(a: u8, b: u8, c: u8) -> SubnetPrefix {
        SubnetPrefix { octets: [a, b, c] }
    }

    /// Parses "192.168.15." or any address in the network such as "192.168.15.0".
    /// Everything after the last dot is ignored.
    pub fn parse(value: &str) -> Result<SubnetPrefix, ElectionError> {
        let trimmed = value.trim();
        let prefix = match trimmed.rfind('.') {
            Some(position) => &trimmed[..position],
            None => return new_err(format!("Invalid subnet prefix '{}'", value), String::new()),
        };

        let parts: Vec<&str> = prefix.split('.').collect();
        if parts.len() != 3 {
            return new_err(
                format!("Invalid subnet prefix '{}'", value),
                "expected three leading octets".to_string(),
            );
        }

        let mut octets = [0u8; 3];
        for (index, part) in parts.iter().enumerate() {
            octets[index] = match part.parse::<u8>() {
                Ok(octet) => octet,
                Err(err) => {
                    return new_err(format!("Invalid subnet prefix '{}'", value), err.to_string())
                }
            };
        }

        Ok(SubnetPrefix { octets })
    }

    pub fn host_address(&self, host: u8, port: u16) -> SocketAddr {
        let [a, b, c] = self.octets;

        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(a, b, c, host), port))
    }

    /// Every host address of the network (x.y.z.1 ..= x.y.z.254) on the port.
    pub fn host_addresses(&self, port: u16) -> Vec<SocketAddr> {
        (1..=254u8).map(|host| self.host_address(host, port)).collect()
    }
}

impl Default for SubnetPrefix {
    fn default() -> Self {
        SubnetPrefix::new(192, 168, 15)
    }
}

impl fmt::Display for SubnetPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let [a, b, c] = self.octets;
        write!(f, "{}.{}.{}.", a, b, c)
    }
}

impl FromStr for SubnetPrefix {
    type Err = ElectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SubnetPrefix::parse(value)
    }
}

/// Probe timings and addressing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ProbeSettings {
    pub probe_interval: Duration,
    pub failed_probe_count: u32,
    pub udp_port: u16,
    pub subnet: SubnetPrefix,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        ProbeSettings {
            probe_interval: Duration::from_millis(DEFAULT_PROBE_INTERVAL_MS),
            failed_probe_count: DEFAULT_FAILED_PROBE_COUNT,
            udp_port: DEFAULT_UDP_PORT,
            subnet: SubnetPrefix::default(),
        }
    }
}

impl ProbeSettings {
    /// Silence after which a Standby node assumes the Active role. Also the failure detector period.
    pub fn failure_timeout(&self) -> Duration {
        self.probe_interval * self.failed_probe_count
    }

    pub fn probe_interval_ms(&self) -> u64 {
        self.probe_interval.as_millis() as u64
    }

    pub fn validate(&self) -> Result<(), ElectionError> {
        if self.probe_interval == Duration::from_millis(0) {
            return new_err("Invalid probe settings".to_string(), "probe interval is zero".to_string());
        }
        if self.failed_probe_count == 0 {
            return new_err("Invalid probe settings".to_string(), "failed probe count is zero".to_string());
        }
        if self.probe_interval.checked_mul(self.failed_probe_count).is_none() {
            return new_err(
                "Invalid probe settings".to_string(),
                format!(
                    "failure timeout of {} ms x {} overflows",
                    self.probe_interval_ms(),
                    self.failed_probe_count
                ),
            );
        }

        Ok(())
    }
}

/// Everything a node needs to start.
#[derive(Clone, Debug)]
pub struct NodeConfiguration<T, Sp, Er>
where
    T: HeartbeatTransport,
    Sp: StatePublisher,
    Er: ErrorReporter,
{
    pub node_id: String,
    /// Pinned boot epoch. When absent the node waits a random startup jitter and uses the current time.
    pub boot_epoch: Option<i64>,
    pub settings: ProbeSettings,
    pub transport: T,
    pub state_publisher: Sp,
    pub error_reporter: Er,
}
