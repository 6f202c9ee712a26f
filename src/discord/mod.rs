//! Discord adapters: gateway listener, REST client and wire payloads.

pub mod gateway;
pub mod payload;
pub mod rest;

pub use gateway::run_gateway;
pub use rest::DiscordRest;
