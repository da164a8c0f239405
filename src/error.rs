use std::{io, net};

use jsonrpc_core::{types::error::Error, ErrorCode};
use serde_json::json;
use snafu::Snafu;

use crate::diag::Diagnostics;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FunctionError {
    #[snafu(display("Invalid server address {}: {}", address, source))]
    InvalidAddress {
        address: String,
        source: net::AddrParseError,
    },

    #[snafu(display("Invalid regex {}: {}", regex, source))]
    InvalidRegex { regex: String, source: regex::Error },

    #[snafu(display(
        "Template {} references group {} which is not defined by regex {}",
        template,
        group,
        regex
    ))]
    InvalidTemplate {
        template: String,
        group: String,
        regex: String,
    },

    #[snafu(display("Missing expected parameters: {}", e))]
    MissingParams { e: Error },

    #[snafu(display(
        "The input string \"{}\" doesn't contain the expected pattern \"{}\"",
        input,
        pattern
    ))]
    NoMatch {
        input: String,
        pattern: String,
        diagnostics: Diagnostics,
    },

    #[snafu(display("Failed to start JSON-RPC server on {}: {}", address, source))]
    StartServer { address: String, source: io::Error },
}

impl From<FunctionError> for Error {
    fn from(err: FunctionError) -> Self {
        match &err {
            FunctionError::InvalidAddress { address, source } => Error {
                code: ErrorCode::ServerError(-32001),
                message: format!("Invalid server address {}: {}", address, source),
                data: None,
            },
            FunctionError::InvalidRegex { regex, source } => Error {
                code: ErrorCode::ServerError(-32002),
                message: format!("Invalid regex {}: {}", regex, source),
                data: None,
            },
            FunctionError::InvalidTemplate { .. } => Error {
                code: ErrorCode::ServerError(-32003),
                message: err.to_string(),
                data: None,
            },
            FunctionError::MissingParams { e } => e.clone(),
            FunctionError::NoMatch { diagnostics, .. } => Error {
                code: ErrorCode::ServerError(-32000),
                message: err.to_string(),
                data: Some(json!(diagnostics)),
            },
            FunctionError::StartServer { address, source } => Error {
                code: ErrorCode::InternalError,
                message: format!("Failed to start JSON-RPC server on {}: {}", address, source),
                data: None,
            },
        }
    }
}
