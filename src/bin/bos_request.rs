//! BOS request command line tool.
//!
//! Sends a single request to the endpoint configured through `BOS_ENDPOINT`
//! (and `BOS_AK` / `BOS_SK` for signing) and prints the response.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.
//!
//! # Examples
//!
//! ```text
//! bos-request GET /v1
//! bos-request PUT /v1/my-bucket --param acl= --data-file acl.json
//! bos-request GET /v1/my-bucket/object.bin --output object.bin
//! ```

use anyhow::{bail, Context, Result};
use bos_http_client::{
    BceSigner, BosRequest, ClientConfig, HttpClient, HttpMethod, RequestBody, ResponseBody,
    SignFunction,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bos-request", version, about = "Send a signed request to a BOS endpoint")]
struct Args {
    /// HTTP method (GET, PUT, DELETE, ...)
    method: String,

    /// Resource path, e.g. /v1/my-bucket
    path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Request header as name:value (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE")]
    headers: Vec<String>,

    /// Request body given inline
    #[arg(long, conflicts_with = "data_file")]
    data: Option<String>,

    /// Request body streamed from a file
    #[arg(long, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Write the response body to a file instead of printing it
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Send the request without an Authorization header
    #[arg(long)]
    unsigned: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = ClientConfig::from_env().context("failed to load configuration")?;
    let client = HttpClient::new(config)?;

    let request = build_request(&args).await?;
    let signer = BceSigner::new();
    let signer: Option<&dyn SignFunction> = if args.unsigned { None } else { Some(&signer) };

    let response = match &args.output {
        Some(path) => {
            let mut file = tokio::fs::File::create(path)
                .await
                .with_context(|| format!("failed to create {}", path.display()))?;
            client
                .send_request_with_output(request, signer, &mut file)
                .await?
        }
        None => client.send_request(request, signer).await?,
    };

    println!("HTTP {}", response.status_code);
    let mut names: Vec<&String> = response.http_headers.keys().collect();
    names.sort();
    for name in names {
        println!("{}: {}", name, response.http_headers[name]);
    }
    println!();

    match &response.body {
        ResponseBody::Json(value) if !response.body.is_empty_object() => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        ResponseBody::Json(_) => {}
        ResponseBody::Raw(bytes) => println!("<{} bytes>", bytes.len()),
    }

    Ok(())
}

async fn build_request(args: &Args) -> Result<BosRequest> {
    let method = match HttpMethod::parse(&args.method) {
        Some(method) => method,
        None => bail!("unsupported method: {}", args.method),
    };
    let mut request = BosRequest::new(method, args.path.clone());

    for param in &args.params {
        let (key, value) = param.split_once('=').unwrap_or((param.as_str(), ""));
        request = request.param(key, value);
    }

    for header in &args.headers {
        let Some((name, value)) = header.split_once(':') else {
            bail!("header must be NAME:VALUE, got: {}", header);
        };
        request = request.header(name.trim(), value.trim());
    }

    if let Some(data) = &args.data {
        request = request.body(data.as_str());
    } else if let Some(path) = &args.data_file {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        let length = file.metadata().await?.len();
        if request.header_value("Content-Length").is_none() {
            request = request.header("Content-Length", length.to_string());
        }
        request = request.body(RequestBody::from_reader(file));
    }

    Ok(request)
}
