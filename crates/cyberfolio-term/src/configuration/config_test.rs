use anyhow::Result;
use std::io::Write;

use super::*;
use crate::application::cli;

#[test]
fn it_has_defaults_for_every_key() {
    assert_eq!(Config::default(ConfigKey::ServerUrl), "http://localhost:3000");
    assert_eq!(Config::default(ConfigKey::FastBoot), "false");
    assert_eq!(Config::default(ConfigKey::LogLevel), "info");
    assert!(Config::default(ConfigKey::ConfigFile).ends_with("config.toml"));
}

#[test]
fn it_serializes_defaults_without_the_config_file_key() {
    let toml = Config::serialize_default(cli::build());

    assert!(toml.contains("server-url = \"http://localhost:3000\""));
    assert!(toml.contains("fast-boot = false"));
    assert!(toml.contains("log-level = \"info\""));
    assert!(toml.contains("[possible values: trace, debug, info, warn, error]"));
    assert!(!toml.contains("config-file"));
    assert!(!toml.contains("[default:"));
}

// One test owns the process-wide table so parallel tests cannot interleave.
#[tokio::test]
async fn it_layers_defaults_file_and_flags() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "server-url = \"http://from-file:4000\"")?;
    writeln!(file, "fast-boot = true")?;
    writeln!(file, "log-level = \"warn\"")?;
    let path = file.path().to_string_lossy().to_string();

    let matches = cli::build().try_get_matches_from(vec!["cyberfolio", "--config-file", path.as_str()])?;
    Config::load(cli::build(), vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ConfigFile), path);
    assert_eq!(Config::get(ConfigKey::ServerUrl), "http://from-file:4000");
    assert!(Config::get_bool(ConfigKey::FastBoot));
    assert_eq!(Config::get(ConfigKey::LogLevel), "warn");

    let matches = cli::build().try_get_matches_from(vec![
        "cyberfolio",
        "--config-file",
        path.as_str(),
        "--server-url",
        "http://from-flag:5000",
        "--log-level",
        "debug",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ServerUrl), "http://from-flag:5000");
    assert_eq!(Config::get(ConfigKey::LogLevel), "debug");
    assert!(Config::get_bool(ConfigKey::FastBoot));

    let mut invalid = tempfile::NamedTempFile::new()?;
    writeln!(invalid, "log-level = \"loud\"")?;
    let invalid_path = invalid.path().to_string_lossy().to_string();
    let matches =
        cli::build().try_get_matches_from(vec!["cyberfolio", "--config-file", invalid_path.as_str()])?;
    let err = Config::load(cli::build(), vec![&matches]).await.unwrap_err();
    assert!(err.to_string().contains("invalid value for key 'log-level'"));

    let matches = cli::build().try_get_matches_from(vec![
        "cyberfolio",
        "--config-file",
        "/nonexistent/cyberfolio.toml",
        "--fast-boot",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;
    assert_eq!(Config::get(ConfigKey::ServerUrl), "http://localhost:3000");
    assert!(Config::get_bool(ConfigKey::FastBoot));

    return Ok(());
}
