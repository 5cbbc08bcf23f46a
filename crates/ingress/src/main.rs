use std::env;
use std::pin::pin;

use color_eyre::eyre::{Result, bail};
use futures::StreamExt;
use ingress_utils::config::load_config_or_panic;
use ingress_utils::streaming::{CooperativeReader, LimitingReader, ReadSource};
use ingress_utils::validation::parse_host_port;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing() {
    let default_directives = "ingress_utils=info";
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // stdout carries the piped body, keep logs on stderr.
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry().with(env_filter).with(layer).init();
}

/// `ingress-utils check <host:port>...`
fn check_endpoints(inputs: &[String]) -> Result<()> {
    let mut invalid = 0;
    for input in inputs {
        match parse_host_port(input) {
            Ok(endpoint) => println!(
                "{endpoint}\thost={} port={}",
                endpoint.host(),
                endpoint.port()
            ),
            Err(e) => {
                eprintln!("{e}");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        bail!("{invalid} of {} endpoints are invalid", inputs.len());
    }
    Ok(())
}

/// Copy stdin to stdout, bounded by the configured size limit.
async fn pipe_stdin() -> Result<()> {
    let config = load_config_or_panic();
    let endpoint = config.endpoint()?;
    tracing::info!(
        %endpoint,
        chunk_size = config.streaming.chunk_size,
        size_limit = config.streaming.size_limit,
        "Streaming stdin"
    );

    let limited = LimitingReader::new(
        ReadSource::new(std::io::stdin().lock()),
        config.streaming.size_limit,
    );
    let reader = CooperativeReader::new(limited).with_chunk_size(config.streaming.chunk_size);

    let mut stdout = tokio::io::stdout();
    let mut chunks = pin!(reader.into_stream());
    let mut total: u64 = 0;
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        total += chunk.len() as u64;
        stdout.write_all(&chunk).await?;
    }
    stdout.flush().await?;

    tracing::info!(bytes = total, "Finished streaming");
    Ok(())
}

// Reads from stdin block, so the pipe runs on a single-threaded runtime.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    initialize_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    match args.split_first() {
        Some((command, rest)) if command == "check" => {
            if rest.is_empty() {
                bail!("usage: ingress-utils check <host:port>...");
            }
            check_endpoints(rest)
        }
        Some((command, _)) => bail!("unknown command: {command}"),
        None => pipe_stdin().await,
    }
}
