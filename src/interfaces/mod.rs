pub mod receiver;
pub mod scheduler;
pub mod transport;
