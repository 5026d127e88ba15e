//! Session configuration.
//!
//! `SessionConfig` is plain data: hosts construct it directly or load it
//! from a TOML fragment. Shell resolution happens at spawn time, not at
//! construction, so a config built on one machine stays portable.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::DEFAULT_MAX_SCROLLBACK;

/// Fallback shell when neither the config nor `$SHELL` names one.
pub const DEFAULT_SHELL: &str = "/bin/zsh";

/// Configuration for spawning a terminal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Shell executable. `None` falls back to `$SHELL`, then `/bin/zsh`.
    pub shell: Option<String>,
    /// Arguments passed to the shell after `argv[0]`.
    pub shell_args: Vec<String>,
    /// Extra environment variables for the child, on top of the inherited
    /// environment and the `TERM`/`LANG` defaults.
    pub env: HashMap<String, String>,
    /// Working directory for the child. `None` inherits the host's.
    pub working_dir: Option<String>,
    /// Initial grid height.
    pub rows: u16,
    /// Initial grid width.
    pub cols: u16,
    /// Scrollback line limit.
    pub max_scrollback: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shell: None,
            shell_args: Vec::new(),
            env: HashMap::new(),
            working_dir: None,
            rows: 24,
            cols: 80,
            max_scrollback: DEFAULT_MAX_SCROLLBACK,
        }
    }
}

impl SessionConfig {
    /// Parse a config from a TOML fragment. Missing fields take defaults.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    /// The shell to spawn: explicit config beats `$SHELL` beats the
    /// built-in default.
    pub fn resolve_shell(&self) -> String {
        if let Some(shell) = &self.shell {
            return shell.clone();
        }
        std::env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_owned())
    }
}
