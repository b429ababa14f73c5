pub mod boot;
pub mod capability;
pub mod cli;
pub mod config;
pub mod entitlement;
pub mod hooks;
pub mod nav;
pub mod plugin;

#[cfg(test)]
pub mod testing;
