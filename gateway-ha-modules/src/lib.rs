//! Collaborator implementations for the gateway-ha election core: transports, state
//! publishers, error reporters and the JSON settings source.

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;

mod communication;
mod publishing;
mod settings;

pub use communication::inproc_transport::{InProcNetwork, InProcTransport};
pub use communication::udp_transport::UdpTransport;
pub use publishing::channel_publisher::{ChannelErrorReporter, ChannelStatePublisher, ErrorReport};
pub use publishing::log_publisher::{LogErrorReporter, LogStatePublisher};
pub use settings::{settings_from_file, settings_from_json};
