pub mod channel_publisher;
pub mod log_publisher;
