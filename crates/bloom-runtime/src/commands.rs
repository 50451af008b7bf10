//! Line commands understood by the runtime.
//!
//! ```text
//! SET <key> <value>     -> OK | ERR <message>
//! EXIST <key> <value>   -> 1 | 0 | ERR <message>
//! OFFSETS <value>       -> space separated bit offsets
//! STATS                 -> metrics snapshot as JSON
//! ```
//!
//! The value is everything after the key, so it may contain spaces.

use std::str::FromStr;

use bitmap_bloom::{MembershipFilterApi, Metrics};
use thiserror::Error;

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Exist { key: String, value: String },
    Offsets { value: String },
    Stats,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim_start()),
            None => (line, ""),
        };

        match verb.to_ascii_uppercase().as_str() {
            "SET" => {
                let (key, value) =
                    key_and_value(rest).ok_or(CommandError::Usage("SET <key> <value>"))?;
                Ok(Command::Set { key, value })
            }
            "EXIST" | "EXISTS" => {
                let (key, value) =
                    key_and_value(rest).ok_or(CommandError::Usage("EXIST <key> <value>"))?;
                Ok(Command::Exist { key, value })
            }
            "OFFSETS" if !rest.is_empty() => Ok(Command::Offsets {
                value: rest.to_string(),
            }),
            "OFFSETS" => Err(CommandError::Usage("OFFSETS <value>")),
            "STATS" => Ok(Command::Stats),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

fn key_and_value(rest: &str) -> Option<(String, String)> {
    let (key, value) = rest.split_once(char::is_whitespace)?;
    let value = value.trim_start();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Run one command and render its reply line.
pub async fn execute<A>(filter: &A, metrics: &Metrics, command: Command) -> String
where
    A: MembershipFilterApi + ?Sized,
{
    match command {
        Command::Set { key, value } => match filter.set(&key, &value).await {
            Ok(()) => "OK".to_string(),
            Err(e) => format!("ERR {}", e),
        },
        Command::Exist { key, value } => match filter.exist(&key, &value).await {
            Ok(true) => "1".to_string(),
            Ok(false) => "0".to_string(),
            Err(e) => format!("ERR {}", e),
        },
        Command::Offsets { value } => match filter.offsets_for(&value) {
            Ok(offsets) => offsets
                .as_slice()
                .iter()
                .map(|offset| offset.to_string())
                .collect::<Vec<_>>()
                .join(" "),
            Err(e) => format!("ERR {}", e),
        },
        Command::Stats => match serde_json::to_string(&metrics.snapshot()) {
            Ok(json) => json,
            Err(e) => format!("ERR {}", e),
        },
    }
}
