pub mod conflicting_active;
pub mod failover;
pub mod malformed_datagram;
pub mod self_promotion;
pub mod smoke;
