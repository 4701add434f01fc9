//! Console Commands
//!
//! Parses and executes the line-oriented commands of the interactive console.

use std::str::FromStr;
use std::time::Duration;

use crate::cache::Cache;
use crate::error::{CacheError, Result};

/// Help text printed by `help`.
pub const HELP: &str = "\
commands:
  set <key> <value> [ttl_secs]   store a value (ttl 0 = never expire)
  get <key>                      fetch a value
  del <key>                      remove a value
  ttl <key>                      seconds left before a value expires
  keys                           keys from most to least recently used
  size                           number of stored entries
  stats                          hit/miss/eviction counters as JSON
  clear                          drop every entry
  quit                           exit";

// == Command ==
/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set {
        key: String,
        value: String,
        ttl: Option<u64>,
    },
    Get(String),
    Del(String),
    Ttl(String),
    Keys,
    Size,
    Stats,
    Clear,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| CacheError::InvalidCommand("empty line".to_string()))?;
        let args: Vec<&str> = parts.collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("set", [key, value]) => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: None,
            },
            ("set", [key, value, ttl]) => Command::Set {
                key: key.to_string(),
                value: value.to_string(),
                ttl: Some(ttl.parse().map_err(|_| {
                    CacheError::InvalidCommand(format!("ttl must be whole seconds, got '{ttl}'"))
                })?),
            },
            ("get", [key]) => Command::Get(key.to_string()),
            ("del", [key]) => Command::Del(key.to_string()),
            ("ttl", [key]) => Command::Ttl(key.to_string()),
            ("keys", []) => Command::Keys,
            ("size", []) => Command::Size,
            ("stats", []) => Command::Stats,
            ("clear", []) => Command::Clear,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => {
                return Err(CacheError::InvalidCommand(format!(
                    "'{}' (try 'help')",
                    line.trim()
                )))
            }
        };
        Ok(command)
    }
}

// == Execute ==
/// Runs a command against the cache and returns the reply line.
///
/// `Quit` is left to the caller and replies with nothing.
pub fn execute(cache: &mut Cache<String, String>, command: Command) -> Result<String> {
    let reply = match command {
        Command::Set { key, value, ttl } => {
            cache.set(key, value, ttl.map(Duration::from_secs));
            "OK".to_string()
        }
        Command::Get(key) => cache
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| "(nil)".to_string()),
        Command::Del(key) => match cache.remove(key.as_str()) {
            Some(_) => "1".to_string(),
            None => "0".to_string(),
        },
        Command::Ttl(key) => match (cache.contains_key(key.as_str()), cache.expires_in(key.as_str())) {
            (false, _) => "-2".to_string(),
            (true, None) => "-1".to_string(),
            (true, Some(left)) => left.as_secs().to_string(),
        },
        Command::Keys => cache.keys().cloned().collect::<Vec<_>>().join(" "),
        Command::Size => cache.len().to_string(),
        Command::Stats => serde_json::to_string(&cache.stats())?,
        Command::Clear => {
            cache.clear();
            "OK".to_string()
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cache: &mut Cache<String, String>, line: &str) -> String {
        execute(cache, line.parse().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_set() {
        assert_eq!(
            "set a 1".parse::<Command>().unwrap(),
            Command::Set {
                key: "a".to_string(),
                value: "1".to_string(),
                ttl: None
            }
        );
        assert_eq!(
            "SET a 1 30".parse::<Command>().unwrap(),
            Command::Set {
                key: "a".to_string(),
                value: "1".to_string(),
                ttl: Some(30)
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("get".parse::<Command>().is_err());
        assert!("set a 1 soon".parse::<Command>().is_err());
        assert!("fly away".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!("keys".parse::<Command>().unwrap(), Command::Keys);
        assert_eq!("exit".parse::<Command>().unwrap(), Command::Quit);
        assert_eq!("del k".parse::<Command>().unwrap(), Command::Del("k".to_string()));
    }

    #[test]
    fn test_session() {
        let mut cache = Cache::new(2, Duration::ZERO).unwrap();

        assert_eq!(run(&mut cache, "set A Alpha"), "OK");
        assert_eq!(run(&mut cache, "set B Beta"), "OK");
        assert_eq!(run(&mut cache, "get A"), "Alpha");
        assert_eq!(run(&mut cache, "set C Charlie"), "OK");
        assert_eq!(run(&mut cache, "get B"), "(nil)");
        assert_eq!(run(&mut cache, "keys"), "C A");
        assert_eq!(run(&mut cache, "size"), "2");
        assert_eq!(run(&mut cache, "ttl A"), "-1");
        assert_eq!(run(&mut cache, "ttl B"), "-2");
        assert_eq!(run(&mut cache, "del A"), "1");
        assert_eq!(run(&mut cache, "del A"), "0");
        assert_eq!(run(&mut cache, "clear"), "OK");
        assert_eq!(run(&mut cache, "size"), "0");
    }

    #[test]
    fn test_ttl_and_stats() {
        let mut cache = Cache::new(4, Duration::ZERO).unwrap();

        run(&mut cache, "set k v 60");
        let left: u64 = run(&mut cache, "ttl k").parse().unwrap();
        assert!(left <= 60 && left >= 59);

        run(&mut cache, "get k");
        run(&mut cache, "get missing");
        let stats: serde_json::Value = serde_json::from_str(&run(&mut cache, "stats")).unwrap();
        assert_eq!(stats["hits"], 1);
        assert_eq!(stats["misses"], 1);
        assert_eq!(stats["total_entries"], 1);
    }
}
