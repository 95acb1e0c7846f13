use std::path::PathBuf;

use clap::Parser;

/// Process-level overrides; secrets and tokens stay in environment variables,
/// operational knobs can be flipped on the command line.
#[derive(Parser, Debug)]
#[command(name = "inkbound-api")]
#[command(about = "Article-to-Kindle conversion service")]
pub struct Args {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    #[arg(long, env = "QUEUE_SIZE", default_value_t = 10)]
    pub queue_size: usize,

    #[arg(long, env = "TMP_DIR")]
    pub tmp_dir: Option<PathBuf>,

    #[arg(long, env = "KINDLEGEN_PATH", default_value = "kindlegen")]
    pub kindlegen_path: String,
}

/// Fully resolved application configuration, built once at startup from
/// `Args` plus the environment variables that carry secrets.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: std::net::SocketAddr,
    pub canonical_host: String,
    pub tmp_dir: PathBuf,
    pub queue_size: usize,
    pub kindlegen_path: String,
    pub from_address: String,
    pub extractor_endpoint: String,
    pub extractor_token: String,
    pub mail_endpoint: String,
    pub mail_token: String,
    pub redis_url: Option<String>,
}

impl AppConfig {
    pub fn load(args: Args) -> anyhow::Result<Self> {
        let bind_addr = format!("{}:{}", args.bind_host, args.port).parse()?;
        Ok(Self {
            bind_addr,
            canonical_host: std::env::var("CANONICAL_HOST")
                .unwrap_or_else(|_| format!("localhost:{}", args.port)),
            tmp_dir: args.tmp_dir.unwrap_or_else(std::env::temp_dir),
            queue_size: args.queue_size,
            kindlegen_path: args.kindlegen_path,
            from_address: std::env::var("FROM")
                .unwrap_or_else(|_| "kindle@inkbound.example".to_string()),
            extractor_endpoint: std::env::var("EXTRACTOR_ENDPOINT")
                .unwrap_or_else(|_| "https://readability.example/v1/parser".to_string()),
            extractor_token: std::env::var("MERCURY_TOKEN")
                .or_else(|_| std::env::var("READABILITY_TOKEN"))
                .unwrap_or_default(),
            mail_endpoint: std::env::var("MAIL_ENDPOINT")
                .unwrap_or_else(|_| "https://api.postmarkapp.com/email".to_string()),
            mail_token: std::env::var("POSTMARK_TOKEN").unwrap_or_default(),
            redis_url: std::env::var("REDISTOGO_URL")
                .ok()
                .or_else(|| std::env::var("MEMCACHIER_SERVERS").ok()),
        })
    }
}
