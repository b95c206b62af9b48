pub mod inproc_transport;
pub mod udp_transport;
