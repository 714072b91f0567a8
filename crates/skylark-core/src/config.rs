use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_USER_LIMIT: usize = 5000;

/// Typed runtime configuration, loaded from the environment (with `.env`
/// support for local runs).
#[derive(Clone, Debug)]
pub struct Config {
    /// Command prefix recognized in channel messages.
    pub prefix: String,
    /// Global ceiling on distinct subscribed users across all channels.
    pub user_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let prefix = env_str("SKYLARK_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.trim().is_empty() {
            return Err(Error::Config(
                "SKYLARK_PREFIX must not be blank".to_string(),
            ));
        }

        let user_limit = env_usize("SKYLARK_USER_LIMIT").unwrap_or(DEFAULT_USER_LIMIT);
        if user_limit == 0 {
            return Err(Error::Config(
                "SKYLARK_USER_LIMIT must be positive".to_string(),
            ));
        }

        Ok(Self { prefix, user_limit })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() || env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
