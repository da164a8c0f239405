use std::{env, net::SocketAddr};

use snafu::ResultExt;

use crate::error::*;

pub const SERVER_ENV: &str = "SELFLINK_EXTRACT_SERVER";
pub const DEFAULT_SERVER: &str = "127.0.0.1:5120";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub address: SocketAddr,
}

impl Config {
    // read server address from the environment, falling back to the default
    pub fn from_env() -> Result<Config, FunctionError> {
        let address = env::var(SERVER_ENV).unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        Config::from_address(&address)
    }

    pub fn from_address(address: &str) -> Result<Config, FunctionError> {
        let address = address
            .parse::<SocketAddr>()
            .context(InvalidAddress { address })?;
        Ok(Config { address })
    }
}
