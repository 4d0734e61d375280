//! CLI argument definitions for conftable.
//!
//! All `clap` structures live here so that `main.rs` stays focused on
//! dispatching subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conftable_store::{DEFAULT_MESSAGE_TYPE, DEFAULT_ROLE};

/// conftable -- a shared message board for cooperating agents.
#[derive(Parser)]
#[command(
    name = "conftable",
    version,
    about = "conftable -- a shared conference table for agent processes",
    long_about = "Agents join the table, post short messages, read what others posted, \
                  and conclude. The table is either a directory of flat files used \
                  directly, or an HTTP service started with `conftable serve`."
)]
pub struct Cli {
    /// TOML configuration file. Missing files fall back to defaults.
    #[arg(long, global = true, default_value = "config/conftable.toml")]
    pub config: PathBuf,

    /// Use the file-backed table in this directory.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Use the HTTP service at this base URL instead of the file store.
    #[arg(long, global = true, conflicts_with = "dir")]
    pub remote: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the in-memory HTTP service until interrupted.
    Serve {
        /// Address to bind the HTTP server to.
        #[arg(long)]
        bind: Option<String>,

        /// Port to listen on.
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Check that the HTTP service is up.
    Ping,

    /// Join the table, replacing any earlier entry for the agent.
    Join {
        agent_id: String,
        #[arg(long, short, default_value = DEFAULT_ROLE)]
        role: String,
    },

    /// Post a message.
    Post {
        agent_id: String,
        message: String,
        /// Message type: statement, question, response, conclusion, ...
        #[arg(long = "type", short = 't', default_value = DEFAULT_MESSAGE_TYPE)]
        kind: String,
    },

    /// List messages with an id greater than `--since`.
    Messages {
        #[arg(long, short, default_value_t = 0)]
        since: u64,
    },

    /// Record a conclusion for an agent.
    Conclude { agent_id: String, conclusion: String },

    /// Show participants and message count.
    Status,

    /// Block until enough agents have joined.
    Wait {
        /// The waiting agent's own identifier.
        agent_id: String,

        /// Number of participants to wait for.
        #[arg(long, short)]
        expected: Option<usize>,

        /// Give up after this many seconds.
        #[arg(long)]
        timeout: Option<u64>,

        /// Seconds between checks.
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Delete every participant and message (file store only).
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_defaults_to_statement() {
        let cli = Cli::try_parse_from(["conftable", "post", "agentA", "hello"]).unwrap();
        match cli.command {
            Commands::Post { agent_id, message, kind } => {
                assert_eq!(agent_id, "agentA");
                assert_eq!(message, "hello");
                assert_eq!(kind, "statement");
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn global_store_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["conftable", "join", "agentA", "--dir", "/tmp/table"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/table")));
        assert!(matches!(cli.command, Commands::Join { ref role, .. } if role == "participant"));
    }

    #[test]
    fn dir_and_remote_conflict() {
        let parsed = Cli::try_parse_from([
            "conftable",
            "status",
            "--dir",
            "x",
            "--remote",
            "http://127.0.0.1:5001",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn type_flag_sets_kind() {
        let cli = Cli::try_parse_from(["conftable", "post", "a", "why?", "--type", "question"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Post { ref kind, .. } if kind == "question"));
    }
}
