#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::Arg;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    ServerUrl,
    FastBoot,
    LogLevel,
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn get_bool(key: ConfigKey) -> bool {
        return Config::get(key) == "true";
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default_config_path() -> path::PathBuf {
        return match dirs::config_dir() {
            Some(dir) => dir.join("cyberfolio/config.toml"),
            None => path::PathBuf::from("cyberfolio.toml"),
        };
    }

    pub fn default(key: ConfigKey) -> String {
        let res = match key {
            ConfigKey::ServerUrl => "http://localhost:3000".to_string(),
            ConfigKey::FastBoot => "false".to_string(),
            ConfigKey::LogLevel => "info".to_string(),

            // Special
            ConfigKey::ConfigFile => Config::default_config_path().to_string_lossy().to_string(),
        };

        return res;
    }

    /// Resolves every key: defaults, then the TOML file, then command line matches.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key));
        }

        let config_file = clap_arg_matches
            .iter()
            .filter_map(|matches| flag_value(matches, ConfigKey::ConfigFile))
            .last()
            .unwrap_or_else(|| Config::default(ConfigKey::ConfigFile));
        Config::set(ConfigKey::ConfigFile, &config_file);

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).await?;
            apply_file(&cmd, &contents)?;
        } else {
            tracing::debug!(path = config_file.as_str(), "no config file");
        }

        for matches in &clap_arg_matches {
            for key in ConfigKey::iter() {
                if let Some(val) = flag_value(matches, key) {
                    Config::set(key, &val);
                }
            }
        }

        tracing::debug!(
            server_url = Config::get(ConfigKey::ServerUrl),
            fast_boot = Config::get(ConfigKey::FastBoot),
            log_level = Config::get(ConfigKey::LogLevel),
            "config"
        );

        return Ok(());
    }

    /// Commented TOML listing every file-configurable key with its default.
    pub fn serialize_default(cmd: Command) -> String {
        let mut sections = vec![];

        for key in ConfigKey::iter().filter(|key| *key != ConfigKey::ConfigFile) {
            let Some(arg) = arg_for(&cmd, key) else {
                continue;
            };

            let help = arg.get_help().map(|help| help.to_string()).unwrap_or_default();
            let mut comment = help
                .split("[default:")
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            let allowed = allowed_values(&cmd, key);
            if !allowed.is_empty() {
                comment = format!("{comment} [possible values: {}]", allowed.join(", "));
            }

            let default = Config::default(key);
            let literal = match default.as_str() {
                "true" | "false" => default.clone(),
                _ if default.parse::<i64>().is_ok() => default.clone(),
                _ => format!("\"{default}\""),
            };

            sections.push(format!("# {comment}\n{key} = {literal}"));
        }

        return sections.join("\n\n");
    }
}

fn arg_for(cmd: &Command, key: ConfigKey) -> Option<&Arg> {
    let long = key.to_string();
    return cmd.get_arguments().find(|arg| arg.get_long() == Some(long.as_str()));
}

/// Values the clap parser accepts for `key`; empty when anything goes.
fn allowed_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
    return arg_for(cmd, key)
        .map(|arg| {
            return arg
                .get_possible_values()
                .iter()
                .map(|value| value.get_name().to_string())
                .collect();
        })
        .unwrap_or_default();
}

/// A flag given on the command line or through its environment variable. Boolean
/// switches only count when set.
fn flag_value(matches: &ArgMatches, key: ConfigKey) -> Option<String> {
    let id = key.to_string();
    if let Ok(Some(val)) = matches.try_get_one::<String>(&id) {
        return (!val.is_empty()).then(|| val.clone());
    }
    if let Ok(Some(true)) = matches.try_get_one::<bool>(&id) {
        return Some("true".to_string());
    }
    return None;
}

fn apply_file(cmd: &Command, contents: &str) -> Result<()> {
    let doc = contents.parse::<toml_edit::Document>()?;

    for key in ConfigKey::iter().filter(|key| *key != ConfigKey::ConfigFile) {
        let Some(item) = doc.get(&key.to_string()) else {
            continue;
        };

        let val = if let Some(flag) = item.as_bool() {
            flag.to_string()
        } else if let Some(number) = item.as_integer() {
            number.to_string()
        } else if let Some(text) = item.as_str() {
            text.to_string()
        } else {
            bail!("config.toml has an unsupported value type for key '{key}'");
        };
        if val.is_empty() {
            continue;
        }

        let allowed = allowed_values(cmd, key);
        if !allowed.is_empty() && !allowed.contains(&val) {
            bail!(
                "config.toml has an invalid value for key '{key}': {val}\nPossible values are: {}",
                allowed.join(", ")
            );
        }
        Config::set(key, &val);
    }

    return Ok(());
}
