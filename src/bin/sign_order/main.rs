//! Order signer.
//!
//! Signs an order (EIP-712) or a cancel message (EIP-191) with the agent key
//! and prints the payload as JSON on stdout, without submitting it. Logs go
//! to stderr.

mod cli;

use std::process::exit;

use bjx_sdk::{
    config::ConfigSources,
    error::Error,
    signing::{self, SigningContext, Timestamp},
    types::SignedPayload,
};
use clap::{Parser, error::ErrorKind};
use serde_json::{Value, json};
use tracing::{error, info};

use cli::{CliConfig, CliError};

fn main() {
    // Set up logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "info");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = match CliConfig::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => fail("UsageError", e.to_string().trim()),
    };

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            let kind = match &e {
                CliError::Sdk(err) => err.kind().to_string(),
                CliError::IncompleteOrder | CliError::MissingOrderId => "UsageError".to_string(),
            };
            fail(&kind, &e.to_string())
        }
    }
}

fn run(cli: &CliConfig) -> Result<Value, CliError> {
    let sources = ConfigSources::load(&cli.config_dir).map_err(Error::from)?;
    let config = sources.resolve().map_err(Error::from)?;
    let request = cli.to_request(config.default_order_size())?;
    let key = sources.private_key().map_err(Error::from)?;

    info!(signer = %key.address(), sign_type = ?cli.sign_type, "signing");
    let payload = signing::sign(
        &SigningContext::from(&config),
        &key,
        &request,
        Timestamp::now(),
    )?;
    Ok(render(&payload))
}

fn render(payload: &SignedPayload) -> Value {
    match payload {
        SignedPayload::Order(order) => json!({
            "success": true,
            "type": "order",
            "signedOrder": order,
        }),
        SignedPayload::Cancel(cancel) => json!({
            "success": true,
            "type": "cancel",
            "orderId": cancel.order_id,
            "message": cancel.message,
            "timestamp": cancel.timestamp,
            "signature": cancel.signature,
        }),
    }
}

fn fail(kind: &str, message: &str) -> ! {
    error!(%kind, %message, "signing failed");
    println!("{}", json!({"success": false, "error": message}));
    exit(1)
}
