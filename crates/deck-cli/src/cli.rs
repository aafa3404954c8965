//! Argument parsing for the `tdk` binary.

use clap::{Parser, Subcommand, ValueEnum};
use uuid::Uuid;

/// Shared output mode across all commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Top-level CLI parser for the `tdk` binary.
#[derive(Debug, Parser)]
#[command(name = "tdk", version, about = "taskdeck - personal kanban task tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: table, json
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Resolve a per-command page-size flag against the configured default.
#[must_use]
pub fn page_size_or(flag: Option<u32>, configured: u32) -> u32 {
    flag.unwrap_or(configured)
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the taskdeck API server
    Serve,

    /// Open a session (dev login: email + display name)
    Login {
        email: String,
        #[arg(default_value = "Developer")]
        name: String,
    },

    /// Close the current session
    Logout,

    /// Show the logged-in user
    Me,

    /// Show all status columns at once
    Board {
        /// Tasks shown per column (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// List one status column
    List {
        /// todo, in_progress, completed, blocked, cancelled
        #[arg(default_value = "todo")]
        status: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Tasks per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show one task in full
    Show { id: Uuid },

    /// Create a task
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// 1 = low, 2 = medium, 3 = high
        #[arg(long, default_value_t = 2)]
        priority: u8,
        /// 1 = trivial .. 5 = heavy
        #[arg(long, default_value_t = 1)]
        effort: u8,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Start-by date, YYYY-MM-DD
        #[arg(long)]
        start_by: Option<String>,
    },

    /// Edit task fields (only the flags you pass are changed)
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Any status; direct edits bypass the quick-action state machine
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<u8>,
        #[arg(long)]
        effort: Option<u8>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        start_by: Option<String>,
        #[arg(long)]
        blocked_reason: Option<String>,
    },

    /// Delete a task
    Delete { id: Uuid },

    /// Quick action: todo -> in_progress
    Start { id: Uuid },

    /// Quick action: in_progress -> completed
    Complete { id: Uuid },

    /// Quick action: in_progress -> blocked (reason required)
    Block { id: Uuid, reason: String },

    /// Quick action: blocked -> in_progress
    Unblock { id: Uuid },

    /// Quick action: cancel from todo or in_progress
    Cancel { id: Uuid },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["tdk", "--format", "json", "--verbose", "board"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Board { page_size: None }));
    }

    #[test]
    fn list_defaults_to_todo_page_one() {
        let cli = Cli::try_parse_from(["tdk", "list"]).expect("cli should parse");
        match cli.command {
            Commands::List {
                status,
                page,
                page_size,
            } => {
                assert_eq!(status, "todo");
                assert_eq!(page, 1);
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn page_size_falls_back_to_the_configured_default() {
        let cli = Cli::try_parse_from(["tdk", "board"]).expect("cli should parse");
        let Commands::Board { page_size } = cli.command else {
            panic!("expected board");
        };
        assert_eq!(super::page_size_or(page_size, 8), 8);

        let cli = Cli::try_parse_from(["tdk", "board", "--page-size", "3"])
            .expect("cli should parse");
        let Commands::Board { page_size } = cli.command else {
            panic!("expected board");
        };
        assert_eq!(super::page_size_or(page_size, 8), 3);
    }

    #[test]
    fn create_accepts_field_flags() {
        let cli = Cli::try_parse_from([
            "tdk", "create", "ship it", "--priority", "3", "--due", "2026-09-15",
        ])
        .expect("cli should parse");
        match cli.command {
            Commands::Create {
                name,
                priority,
                due,
                ..
            } => {
                assert_eq!(name, "ship it");
                assert_eq!(priority, 3);
                assert_eq!(due.as_deref(), Some("2026-09-15"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn block_requires_a_reason() {
        let id = "7b1d5cc8-7db4-4b53-9a54-9d1e8e53cbbd";
        assert!(Cli::try_parse_from(["tdk", "block", id]).is_err());
        assert!(Cli::try_parse_from(["tdk", "block", id, "waiting on review"]).is_ok());
    }

    #[test]
    fn invalid_uuid_is_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["tdk", "show", "not-a-uuid"]).is_err());
    }
}
