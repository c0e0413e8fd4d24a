//! Command line arguments

use std::collections::HashMap;

use anyhow::{anyhow, Context};
use serde_json::Value;

/// `pipectl <command> [--key=value | --flag]...`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub command: Option<String>,
    flags: HashMap<String, String>,
    unexpected: Vec<String>,
}

impl CliArgs {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = CliArgs::default();

        for arg in args {
            let arg = arg.into();
            if let Some((key, value)) = arg.split_once('=') {
                // Handle --key=value format
                let clean_key = key.trim_start_matches('-');
                parsed.flags.insert(clean_key.to_string(), value.to_string());
            } else if arg.starts_with("--") {
                // Handle standalone flags like --wait
                let clean_key = arg.trim_start_matches('-');
                parsed.flags.insert(clean_key.to_string(), "true".to_string());
            } else if parsed.command.is_none() {
                parsed.command = Some(arg);
            } else {
                parsed.unexpected.push(arg);
            }
        }

        parsed
    }

    /// Fail on positional arguments after the command
    pub fn ensure_no_extra(&self) -> anyhow::Result<()> {
        match self.unexpected.as_slice() {
            [] => Ok(()),
            extra => Err(anyhow!(
                "unexpected argument(s): {} (options take the form --key=value)",
                extra.join(" ")
            )),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> anyhow::Result<&str> {
        self.get(key)
            .ok_or_else(|| anyhow!("missing required argument --{}=<value>", key))
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("true") | Some("1") | Some("yes"))
    }

    pub fn require_u32(&self, key: &str) -> anyhow::Result<u32> {
        let raw = self.require(key)?;
        raw.parse()
            .with_context(|| format!("--{} must be a non-negative integer, got {}", key, raw))
    }

    /// Parse an optional JSON-valued argument
    pub fn json(&self, key: &str) -> anyhow::Result<Option<Value>> {
        self.get(key)
            .map(|raw| {
                serde_json::from_str(raw).with_context(|| format!("--{} is not valid JSON", key))
            })
            .transpose()
    }

    /// Parse an optional JSON array argument, e.g. `--datasets='[{"sourceId":"..."}]'`
    pub fn json_list(&self, key: &str) -> anyhow::Result<Option<Vec<Value>>> {
        match self.json(key)? {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(_) => Err(anyhow!("--{} must be a JSON array", key)),
        }
    }
}
