pub mod decoder;
pub mod fetcher;
pub mod receiver;
pub mod retain;
pub mod transport;
