use std::{env, path::PathBuf};

use anyhow::{Result, anyhow};

pub const DEFAULT_CONFIG_PATH: &str = "./bti-assistant.jsonc";

const USAGE: &str = "usage: bti-assistant [--config <path>] [--key <token>] [question...]";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub key: Option<String>,
    /// `None` means the question is read from stdin.
    pub question: Option<String>,
}

pub fn args_from_env() -> Result<CliArgs> {
    parse_args(env::args().skip(1))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --config. {USAGE}"))?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--key" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow!("missing value for --key. {USAGE}"))?;
                parsed.key = Some(value);
            }
            "--" => {
                words.extend(args.by_ref());
            }
            other if other.starts_with("--") => {
                return Err(anyhow!("unknown argument: {other}. {USAGE}"));
            }
            other => words.push(other.to_string()),
        }
    }

    if !words.is_empty() {
        parsed.question = Some(words.join(" "));
    }
    Ok(parsed)
}
