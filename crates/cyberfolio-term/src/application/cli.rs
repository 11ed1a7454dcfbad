use anyhow::Result;
use clap::Arg;
use clap::ArgAction;
use clap::Command;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub fn build() -> Command {
    return Command::new("cyberfolio")
        .about("Terminal-styled portfolio with a boot sequence and a command line")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CYBERFOLIO_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                )),
        )
        .arg(
            Arg::new(ConfigKey::ServerUrl.to_string())
                .short('s')
                .long(ConfigKey::ServerUrl.to_string())
                .env("CYBERFOLIO_SERVER_URL")
                .num_args(1)
                .help(format!(
                    "Base URL of the news and link-preview proxy [default: {}]",
                    Config::default(ConfigKey::ServerUrl)
                )),
        )
        .arg(
            Arg::new(ConfigKey::FastBoot.to_string())
                .long(ConfigKey::FastBoot.to_string())
                .action(ArgAction::SetTrue)
                .help("Play the boot sequence ten times faster"),
        )
        .arg(
            Arg::new(ConfigKey::LogLevel.to_string())
                .long(ConfigKey::LogLevel.to_string())
                .env("CYBERFOLIO_LOG_LEVEL")
                .num_args(1)
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .help(format!(
                    "Level written to the log file [default: {}]",
                    Config::default(ConfigKey::LogLevel)
                )),
        )
        .subcommand(
            Command::new("config")
                .about("Configuration file helpers")
                .subcommand_required(true)
                .subcommand(
                    Command::new("default").about("Print the default config.toml to stdout"),
                )
                .subcommand(Command::new("path").about("Print the default config file path")),
        );
}

/// Parses the command line and loads configuration. Returns `false` when a
/// subcommand already did its work and the UI should not start.
pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    if let Some(("config", config_matches)) = matches.subcommand() {
        match config_matches.subcommand() {
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
            }
            _ => {}
        }
        return Ok(false);
    }

    Config::load(build(), vec![&matches]).await?;
    return Ok(true);
}
