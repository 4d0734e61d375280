//! Configuration loading.
//!
//! Reads `config/conftable.toml` (or the file given with `--config`) and
//! falls back to defaults for anything missing:
//!
//! ```toml
//! [store]
//! dir = "conference"
//!
//! [server]
//! bind = "127.0.0.1"
//! port = 5001
//!
//! [quorum]
//! expected = 2
//! timeout_secs = 120
//! interval_secs = 2
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use conftable_store::QuorumOptions;
use conftable_web::WebConfig;
use tracing::warn;

/// Settings for every subcommand.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory of the file-backed table.
    pub store_dir: PathBuf,
    /// Where `serve` listens, and where `ping` looks by default.
    pub server: WebConfig,
    pub quorum: QuorumOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("conference"),
            server: WebConfig::default(),
            quorum: QuorumOptions::default(),
        }
    }
}

impl AppConfig {
    /// Base URL of the HTTP service described by `[server]`.
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server.bind_addr, self.server.port)
    }
}

/// Load configuration from `path`.
///
/// A missing file yields the defaults. An unparsable file is logged and
/// also yields the defaults.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };

    match content.parse::<toml::Table>() {
        Ok(table) => from_table(&table),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            AppConfig::default()
        }
    }
}

fn section<'a>(table: &'a toml::Table, name: &str) -> Option<&'a toml::Table> {
    match table.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        _ => None,
    }
}

fn from_table(table: &toml::Table) -> AppConfig {
    let defaults = AppConfig::default();

    let store_dir = section(table, "store")
        .and_then(|s| s.get("dir"))
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
        .unwrap_or(defaults.store_dir);

    let server = section(table, "server");
    let bind_addr = server
        .and_then(|s| s.get("bind"))
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .unwrap_or(defaults.server.bind_addr);
    let port = server
        .and_then(|s| s.get("port"))
        .and_then(|v| v.as_integer())
        .and_then(|v| u16::try_from(v).ok())
        .unwrap_or(defaults.server.port);

    let quorum = section(table, "quorum");
    let expected = quorum
        .and_then(|q| q.get("expected"))
        .and_then(|v| v.as_integer())
        .map(|v| v.max(1) as usize)
        .unwrap_or(defaults.quorum.expected);
    let timeout = quorum
        .and_then(|q| q.get("timeout_secs"))
        .and_then(|v| v.as_integer())
        .map(|v| Duration::from_secs(v.max(0) as u64))
        .unwrap_or(defaults.quorum.timeout);
    let poll_interval = quorum
        .and_then(|q| q.get("interval_secs"))
        .and_then(|v| v.as_integer())
        .map(|v| Duration::from_secs(v.max(1) as u64))
        .unwrap_or(defaults.quorum.poll_interval);

    AppConfig {
        store_dir,
        server: WebConfig { bind_addr, port },
        quorum: QuorumOptions {
            expected,
            timeout,
            poll_interval,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> AppConfig {
        from_table(&s.parse::<toml::Table>().unwrap())
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Path::new("/definitely/not/here.toml"));
        assert_eq!(config.store_dir, PathBuf::from("conference"));
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server_url(), "http://127.0.0.1:5001");
        assert_eq!(config.quorum, QuorumOptions::default());
    }

    #[test]
    fn full_file_overrides_everything() {
        let config = parse(
            r#"
            [store]
            dir = "/tmp/table"

            [server]
            bind = "0.0.0.0"
            port = 8080

            [quorum]
            expected = 3
            timeout_secs = 30
            interval_secs = 5
            "#,
        );
        assert_eq!(config.store_dir, PathBuf::from("/tmp/table"));
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.quorum.expected, 3);
        assert_eq!(config.quorum.timeout, Duration::from_secs(30));
        assert_eq!(config.quorum.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn partial_and_bad_values_fall_back() {
        let config = parse(
            r#"
            [server]
            port = 70000

            [quorum]
            expected = "many"
            "#,
        );
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.quorum.expected, 2);
    }

    #[test]
    fn unparsable_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conftable.toml");
        std::fs::write(&path, "[store\ndir = ").unwrap();

        let config = load_config(&path);
        assert_eq!(config.store_dir, PathBuf::from("conference"));
    }
}
