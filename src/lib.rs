pub mod actions;
pub mod client;
pub mod conf;
pub mod core;
pub mod export;
pub mod manager;
pub mod poller;
pub mod resource;

#[cfg(feature = "testutil")]
pub mod testutil;
