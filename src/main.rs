//! mjpeg-relay daemon.
//!
//! Serves the configured routes and waits for a capture component to
//! publish frames into the shared source. With `--demo`, a stand-in
//! producer thread republishes the embedded blank JPEG so the MJPEG plumbing
//! can be exercised without a camera:
//!
//!   mjpeg-relay --host 0.0.0.0 --port 8080 --demo

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use mjpeg_relay::{blank, HttpServer, ServerConfig, StreamSource};

#[derive(Debug)]
struct Options {
    config: ServerConfig,
    demo: bool,
}

/// Parse command line options.
///
/// Accepted flags:
/// - `--host HOST`      bind host (default: localhost)
/// - `--port PORT`      bind port (default: 8080)
/// - `--timeout SECS`   request-head timeout (default: 10)
/// - `--refresh USEC`   refresh tick interval in microseconds (default: 30000)
/// - `--demo`           publish the blank JPEG from a stand-in producer
fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut config = ServerConfig::default();
    let mut demo = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--host" => {
                config.host = required_value(&mut iter, "--host")?.clone();
            }
            "--port" => {
                config.port = required_value(&mut iter, "--port")?
                    .parse()
                    .map_err(|_| "invalid --port value".to_string())?;
            }
            "--timeout" => {
                let secs: u64 = required_value(&mut iter, "--timeout")?
                    .parse()
                    .map_err(|_| "invalid --timeout value".to_string())?;
                config.timeout = Duration::from_secs(secs);
            }
            "--refresh" => {
                let usec: u64 = required_value(&mut iter, "--refresh")?
                    .parse()
                    .map_err(|_| "invalid --refresh value".to_string())?;
                config.refresh_interval = Duration::from_micros(usec);
            }
            "--demo" => demo = true,
            other => return Err(format!("unknown option: '{other}'")),
        }
    }

    Ok(Options { config, demo })
}

fn required_value<'a>(
    iter: &mut std::slice::Iter<'a, String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn print_usage() {
    eprintln!("Usage: mjpeg-relay [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --host HOST      Host to bind to (default: localhost)");
    eprintln!("  --port PORT      Port to bind to (default: 8080)");
    eprintln!("  --timeout SECS   Request timeout in seconds (default: 10)");
    eprintln!("  --refresh USEC   Refresh interval in microseconds (default: 30000)");
    eprintln!("  --demo           Publish the embedded blank JPEG as a stand-in producer");
}

/// Stand-in producer: republishes the blank JPEG at 10 fps.
fn spawn_demo_producer(source: Arc<StreamSource>) {
    std::thread::spawn(move || loop {
        source.publish(blank::BLANK_JPEG, blank::BLANK_WIDTH, blank::BLANK_HEIGHT);
        std::thread::sleep(Duration::from_millis(100));
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("Error: {error}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let source = Arc::new(StreamSource::new());
    if options.demo {
        spawn_demo_producer(Arc::clone(&source));
    }

    let server = HttpServer::bind(options.config, source).await?;
    tracing::info!(addr = %server.local_addr(), "mjpeg-relay up");

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_defaults() {
        let options = parse_options(&[]).unwrap();
        assert_eq!(options.config.host, "localhost");
        assert_eq!(options.config.port, 8080);
        assert!(!options.demo);
    }

    #[test]
    fn test_parse_all_flags() {
        let options = parse_options(&args(&[
            "--host", "0.0.0.0", "--port", "8888", "--timeout", "5", "--refresh", "50000",
            "--demo",
        ]))
        .unwrap();

        assert_eq!(options.config.host, "0.0.0.0");
        assert_eq!(options.config.port, 8888);
        assert_eq!(options.config.timeout, Duration::from_secs(5));
        assert_eq!(options.config.refresh_interval, Duration::from_micros(50_000));
        assert!(options.demo);
    }

    #[test]
    fn test_parse_rejects_unknown_and_missing() {
        assert!(parse_options(&args(&["--frobnicate"])).is_err());
        assert!(parse_options(&args(&["--port"])).is_err());
        assert!(parse_options(&args(&["--port", "not-a-port"])).is_err());
    }
}
