#[macro_use]
extern crate log;

pub mod config;
pub mod diag;
pub mod error;
pub mod functions;
pub mod utils;

use std::{collections::HashMap, result::Result};

use jsonrpc_core::{types::error::Error, IoHandler, Params, Value};
use jsonrpc_http_server::{AccessControlAllowOrigin, DomainsValidation, ServerBuilder};
use serde_json::json;
use snafu::ResultExt;

use crate::config::Config;
use crate::error::*;
use crate::functions::Definition;

// accept either named `{"<param>": "..."}` or positional `["..."]` params
fn parse_input(params: Params, param: &str) -> Result<String, FunctionError> {
    let input = match params {
        Params::Array(_) => params.parse::<(String,)>().map(|(input,)| input),
        _ => params
            .parse::<HashMap<String, String>>()
            .and_then(|mut map| {
                map.remove(param)
                    .ok_or_else(|| Error::invalid_params(format!("missing field `{}`", param)))
            }),
    };

    input.map_err(|e| FunctionError::MissingParams { e })
}

/// Register every element function, plus `list_functions`, as a JSON-RPC method.
pub fn build_io_handler() -> IoHandler {
    let mut io = IoHandler::default();

    for function in functions::all() {
        let param = function.definition().parameter.name;
        io.add_method(function.name(), move |params: Params| -> Result<Value, Error> {
            let input = parse_input(params, param)?;
            let output = function.run(&input)?;
            Ok(json!(output))
        });
    }

    io.add_method("list_functions", move |_| -> Result<Value, Error> {
        let definitions: Vec<&Definition> =
            functions::all().iter().map(|f| f.definition()).collect();
        Ok(json!(definitions))
    });

    io
}

pub fn run() -> Result<(), FunctionError> {
    info!("Starting up.");

    let config = Config::from_env()?;

    info!("Creating JSON-RPC I/O handler.");
    let io = build_io_handler();

    info!("Creating JSON-RPC server on {}.", config.address);
    let server = ServerBuilder::new(io)
        .cors(DomainsValidation::AllowOnly(vec![
            AccessControlAllowOrigin::Null,
        ]))
        .start_http(&config.address)
        .context(StartServer {
            address: config.address.to_string(),
        })?;

    info!("Listening for requests.");
    server.wait();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jsonrpc_test::Rpc;

    const SELF_LINK: &str =
        "https://host/compute/v1/projects/my-project/zones/us-central1-c/instances/my-instance";

    fn request(method: &str, params: &Value) -> Value {
        let rpc = Rpc::from(build_io_handler());
        serde_json::from_str(&rpc.request(method, params)).unwrap()
    }

    // test to ensure correct success response
    #[test]
    fn rpc_success() {
        let response = request(
            "project_id_from_self_link",
            &json!({ "self_link": SELF_LINK }),
        );
        assert_eq!(response, json!({ "result": "my-project", "warnings": [] }));
    }

    #[test]
    fn rpc_success_with_positional_params() {
        let response = request("zone_from_id", &json!([SELF_LINK]));
        assert_eq!(response["result"], "us-central1-c");
    }

    #[test]
    fn rpc_success_with_warning() {
        let response = request(
            "project_id_from_self_link",
            &json!({ "self_link": "projects/a/projects/b/instances/c" }),
        );
        assert_eq!(response["result"], "a");
        assert_eq!(response["warnings"].as_array().unwrap().len(), 1);
        assert_eq!(response["warnings"][0]["severity"], "warning");
    }

    #[test]
    fn rpc_no_match_error() {
        let response = request(
            "project_id_from_self_link",
            &json!({ "self_link": "zones/us-central1-c/instances/my-instance" }),
        );
        assert_eq!(response["code"], -32000);
        assert_eq!(response["data"].as_array().unwrap().len(), 1);
        assert_eq!(response["data"][0]["severity"], "error");
    }

    #[test]
    fn rpc_missing_params() {
        let response = request("project_id_from_self_link", &json!({ "id": SELF_LINK }));
        assert_eq!(response["code"], -32602);
    }

    #[test]
    fn rpc_list_functions() {
        let response = request("list_functions", &json!([]));
        let names: Vec<&str> = response
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"project_id_from_self_link"));
        assert_eq!(names.len(), functions::all().len());
    }
}
