use std::process;

use log::error;

fn main() {
    // initialize the logger
    env_logger::init();

    if let Err(e) = selflink_extract::run() {
        error!("Application error: {}", e);
        process::exit(1);
    }
}
