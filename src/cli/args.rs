use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Serve blog posts and projects over REST with Server-Sent Events streaming",
    long_about = "A small non-blocking HTTP service exposing posts and projects backed by a SQLite document store. List endpoints stream as Server-Sent Events when the client accepts text/event-stream.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long,
        env = "POSTFLUX_DATA_DIR",
        default_value = ".postflux/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long = "log-file",
        env = "POSTFLUX_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "POSTFLUX_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "stream-delay-ms",
        env = "POSTFLUX_STREAM_DELAY_MS",
        value_name = "MS",
        default_value_t = 0u64,
        help = "Pause between streamed items on event-stream responses"
    )]
    pub stream_delay_ms: u64,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
