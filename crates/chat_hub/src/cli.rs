//! Command-line interface handling for the chat hub.
//!
//! Every option here overrides the matching setting from the configuration
//! file.

use clap::{value_parser, Arg, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for bind address
    pub bind_address: Option<String>,
    /// Optional override for the port of the bind address
    pub port: Option<u16>,
    /// Optional override for the admin password
    pub admin_password: Option<String>,
    /// Optional chat log path (also enables the chat log)
    pub chat_log: Option<PathBuf>,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
}

impl CliArgs {
    /// Parses command line arguments using clap.
    ///
    /// Exits with a usage message when the arguments are malformed.
    pub fn parse() -> Self {
        Self::from_matches(command().get_matches())
    }

    /// Parses an explicit argument list, the first item being the binary name.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: clap::ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config.toml")),
            bind_address: matches.get_one::<String>("bind").cloned(),
            port: matches.get_one::<u16>("port").copied(),
            admin_password: matches.get_one::<String>("admin-password").cloned(),
            chat_log: matches.get_one::<String>("chat-log").map(PathBuf::from),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
        }
    }
}

fn command() -> Command {
    Command::new("Chat Hub")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Real-time WebSocket chat server with whispers, renames and admin kicks")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDRESS")
                .help("Bind address (e.g., 127.0.0.1:3000)"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to listen on, keeping the bind host")
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("admin-password")
                .long("admin-password")
                .value_name("PASSWORD")
                .help("Password required by /kick"),
        )
        .arg(
            Arg::new("chat-log")
                .long("chat-log")
                .value_name("FILE")
                .help("Append chat events to this file"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
}
