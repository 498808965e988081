//! Command-line client for the device registry.
//!
//! Every call goes through the outbound pipeline: the basic-auth interceptor,
//! the circuit breaker and the logging stage.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::http::{header, HeaderValue, Method, Request};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, Subcommand};
use futures_util::future::BoxFuture;
use url::Url;

use device_registry::client::{ClientBuilder, ClientResult, Interceptor, Next, OutboundRequest};
use device_registry::config::{load_config, ServiceConfig};
use device_registry::http::handlers::{HEADER_IP, HEADER_MODEL, HEADER_SERIAL_NUM};
use device_registry::observability::logging;

#[derive(Parser)]
#[command(name = "device-cli")]
#[command(about = "Management CLI for the device registry", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "user")]
    username: String,

    #[arg(long, default_value = "password", env = "DEVICE_REGISTRY_PASSWORD")]
    password: String,

    /// Client and breaker settings; defaults apply when omitted.
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one device
    Get { serial_num: String },
    /// Register a new device
    Create {
        serial_num: String,
        model: String,
        ip: String,
    },
    /// Replace an existing device
    Update {
        serial_num: String,
        model: String,
        ip: String,
    },
    /// Remove a device
    Delete { serial_num: String },
}

/// Adds `Authorization: Basic ...` to every outbound request.
struct BasicAuth {
    value: HeaderValue,
}

impl BasicAuth {
    fn new(username: &str, password: &str) -> Result<Self, header::InvalidHeaderValue> {
        let token = STANDARD.encode(format!("{}:{}", username, password));
        let mut value = HeaderValue::from_str(&format!("Basic {}", token))?;
        value.set_sensitive(true);
        Ok(Self { value })
    }
}

impl Interceptor for BasicAuth {
    fn intercept<'a>(
        &'a self,
        mut request: OutboundRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, ClientResult> {
        request
            .headers_mut()
            .insert(header::AUTHORIZATION, self.value.clone());
        next.run(request)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    logging::init_logging(&config.observability);

    let client = ClientBuilder::from_config(&config.http_client, &config.breaker)
        .interceptor(BasicAuth::new(&cli.username, &cli.password)?)
        .build();
    let base = Url::parse(&cli.url)?;

    let request = match &cli.command {
        Commands::Get { serial_num } => Request::builder()
            .method(Method::GET)
            .uri(base.join("getDevice")?.as_str())
            .header(HEADER_SERIAL_NUM, serial_num.as_str())
            .body(Bytes::new())?,
        Commands::Create { serial_num, model, ip } => Request::builder()
            .method(Method::POST)
            .uri(base.join("createDevice")?.as_str())
            .header(HEADER_SERIAL_NUM, serial_num.as_str())
            .header(HEADER_MODEL, model.as_str())
            .header(HEADER_IP, ip.as_str())
            .body(Bytes::new())?,
        Commands::Update { serial_num, model, ip } => Request::builder()
            .method(Method::PUT)
            .uri(base.join("updateDevice")?.as_str())
            .header(HEADER_SERIAL_NUM, serial_num.as_str())
            .header(HEADER_MODEL, model.as_str())
            .header(HEADER_IP, ip.as_str())
            .body(Bytes::new())?,
        Commands::Delete { serial_num } => Request::builder()
            .method(Method::DELETE)
            .uri(base.join("deleteDevice")?.as_str())
            .header(HEADER_SERIAL_NUM, serial_num.as_str())
            .body(Bytes::new())?,
    };

    let response = client.call(request).await?;
    let status = response.status();
    let body = response.into_body();

    if !status.is_success() {
        eprintln!("Error: device API returned status {}", status);
        eprintln!("{}", String::from_utf8_lossy(&body));
        std::process::exit(1);
    }

    if body.is_empty() {
        println!("OK");
    } else {
        match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", String::from_utf8_lossy(&body)),
        }
    }

    Ok(())
}
