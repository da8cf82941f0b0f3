pub mod args;
pub mod browser;
pub mod delivery;
pub mod server;
pub mod skill;
