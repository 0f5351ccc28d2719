//! Server Configuration
//!
//! Bind address plus the read-only parameter map surfaced through
//! `CONFIG GET`. Parameters are populated once at startup and never
//! mutated afterwards; the command layer only reads them.

use std::collections::HashMap;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6379;
pub const DEFAULT_DIR: &str = "/tmp";
pub const DEFAULT_DBFILENAME: &str = "dump.rdb";

/// Configuration assembled from command-line arguments.
///
/// The `dir` and `dbfilename` parameters name where a snapshot file would
/// live; the server itself never touches that file, it only reports the
/// values back through `CONFIG GET`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Lower-cased parameter name to value
    params: HashMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let mut params = HashMap::new();
        params.insert("dir".to_string(), DEFAULT_DIR.to_string());
        params.insert("dbfilename".to_string(), DEFAULT_DBFILENAME.to_string());

        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            params,
        }
    }
}

impl ServerConfig {
    /// Parses configuration from command-line arguments.
    ///
    /// Recognized flags: `--host`, `--port`, `--dir`, `--dbfilename`.
    /// `args` excludes the program name.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut config = ServerConfig::default();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--host" => {
                    config.host = Self::flag_value(args, i)?.to_string();
                    i += 2;
                }
                "--port" => {
                    config.port = Self::flag_value(args, i)?
                        .parse()
                        .map_err(|_| "invalid port number".to_string())?;
                    i += 2;
                }
                "--dir" => {
                    let dir = Self::flag_value(args, i)?.to_string();
                    config.params.insert("dir".to_string(), dir);
                    i += 2;
                }
                "--dbfilename" => {
                    let name = Self::flag_value(args, i)?.to_string();
                    config.params.insert("dbfilename".to_string(), name);
                    i += 2;
                }
                other => {
                    return Err(format!("unknown argument: {}", other));
                }
            }
        }

        Ok(config)
    }

    fn flag_value<'a>(args: &'a [String], i: usize) -> Result<&'a str, String> {
        args.get(i + 1)
            .map(|s| s.as_str())
            .ok_or_else(|| format!("{} requires a value", args[i]))
    }

    /// Looks up a parameter by name, case-insensitively.
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Returns the bind address as a string.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
