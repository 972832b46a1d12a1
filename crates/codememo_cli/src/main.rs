//! Command-line entry point for codememo.
//!
//! # Responsibility
//! - Parse arguments and environment into core configuration.
//! - Dispatch to `NoteService` / `MemoService` and print plain-text results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use codememo_core::db::open_db;
use codememo_core::repo::member_repo::{MemberRepository, SqliteMemberRepository};
use codememo_core::{
    default_log_level, init_logging, GithubClient, GithubConfig, ImportRequest, MemoService,
    NoteService, TreeSnapshotBuilder,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// Import repository snapshots and annotate them with memos.
#[derive(Parser, Debug)]
#[command(name = "codememo", version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(
        long,
        global = true,
        value_name = "PATH",
        env = "CODEMEMO_DB",
        default_value = "codememo.sqlite3"
    )]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, value_name = "DIR", env = "CODEMEMO_LOG_DIR")]
    log_dir: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", env = "CODEMEMO_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(flatten)]
    github: GithubArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GithubArgs {
    /// GitHub access token
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// GitHub REST API root
    #[arg(
        long,
        global = true,
        env = "CODEMEMO_GITHUB_API",
        default_value = codememo_core::github::config::DEFAULT_API_BASE_URL
    )]
    github_api: String,

    /// Per-request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "CODEMEMO_HTTP_TIMEOUT_SECS",
        default_value_t = 30
    )]
    http_timeout_secs: u64,
}

impl GithubArgs {
    fn to_config(&self) -> GithubConfig {
        GithubConfig::default()
            .with_api_base_url(self.github_api.as_str())
            .with_token(self.github_token.clone())
            .with_timeout(Duration::from_secs(self.http_timeout_secs))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a note owner
    MemberAdd { login: String },
    #[command(flatten)]
    Note(NoteCommands),
    /// Memo operations
    #[command(subcommand)]
    Memo(MemoCommands),
}

#[derive(Subcommand, Debug)]
enum NoteCommands {
    /// Import a repository branch as a new note
    Import {
        #[arg(long)]
        owner: i64,
        url: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "main")]
        branch: String,
        #[arg(long)]
        version: Option<String>,
    },
    /// List an owner's notes, most recently viewed first
    Notes {
        #[arg(long)]
        owner: i64,
    },
    /// Show one note and mark it as viewed
    Show { note_id: i64 },
    /// List the file snapshot of a note
    Files { note_id: i64 },
    /// Rename a note
    Rename { note_id: i64, title: String },
    /// Delete a note with its files and memos
    Delete { note_id: i64 },
}

#[derive(Subcommand, Debug)]
enum MemoCommands {
    /// Create an empty memo under a note
    Add {
        note_id: i64,
        /// Anchor the memo to a file path or page
        #[arg(long)]
        page: Option<String>,
    },
    /// Write memo content
    Edit { memo_id: i64, content: String },
    /// Print memo content
    Show { memo_id: i64 },
    /// Delete a memo
    Rm { memo_id: i64 },
    /// List memo ids of a note in creation order
    List { note_id: i64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let mut conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let client = GithubClient::new(cli.github.to_config());

    match cli.command {
        Commands::Memo(command) => run_memo(&mut conn, command),
        Commands::MemberAdd { login } => {
            let id = SqliteMemberRepository::new(&conn).create_member(login.trim())?;
            println!("{id}");
            Ok(())
        }
        Commands::Note(command) => run_note(&mut conn, &client, command),
    }
}

fn run_note(conn: &mut Connection, client: &GithubClient, command: NoteCommands) -> Result<()> {
    let mut notes = NoteService::try_new(conn, client, TreeSnapshotBuilder::new(client))?;

    match command {
        NoteCommands::Import {
            owner,
            url,
            title,
            branch,
            version,
        } => {
            let request = ImportRequest {
                url,
                title,
                branch,
                version,
            };
            let note_id = notes.import_repository(owner, &request)?;
            println!("{note_id}");
        }
        NoteCommands::Notes { owner } => {
            for note in notes.list_notes(owner)? {
                println!(
                    "{}\t{}\t{}@{}\tstars={} forks={} contributors={}",
                    note.id,
                    note.title,
                    note.url,
                    note.branch,
                    note.stars_count,
                    note.forks_count,
                    note.contributors_count
                );
            }
        }
        NoteCommands::Show { note_id } => {
            notes.touch_viewed_at(note_id)?;
            let note = notes.get_note(note_id)?;
            println!("id:           {}", note.id);
            println!("title:        {}", note.title);
            println!("url:          {}", note.url);
            println!("branch:       {}", note.branch);
            println!("version:      {}", note.version.as_deref().unwrap_or("-"));
            println!("description:  {}", note.description.as_deref().unwrap_or("-"));
            println!("stars:        {}", note.stars_count);
            println!("forks:        {}", note.forks_count);
            println!("contributors: {}", note.contributors_count);
        }
        NoteCommands::Files { note_id } => {
            for file in notes.list_files(note_id)? {
                println!("{}\t{}", file.kind.as_str(), file.path);
            }
        }
        NoteCommands::Rename { note_id, title } => notes.rename_note(note_id, &title)?,
        NoteCommands::Delete { note_id } => {
            let report = notes.delete_note(note_id)?;
            println!(
                "files={} memos={} note={}",
                report.files_removed, report.memos_removed, report.note_removed
            );
        }
    }
    Ok(())
}

fn run_memo(conn: &mut Connection, command: MemoCommands) -> Result<()> {
    let mut memos = MemoService::try_new(conn)?;

    match command {
        MemoCommands::Add { note_id, page } => {
            let memo_id = match page.as_deref() {
                Some(page) => memos.create_memo_at(note_id, page)?,
                None => memos.create_memo(note_id)?,
            };
            println!("{memo_id}");
        }
        MemoCommands::Edit { memo_id, content } => memos.update_memo(memo_id, &content)?,
        MemoCommands::Show { memo_id } => {
            println!("{}", memos.read_memo(memo_id)?.unwrap_or_default());
        }
        MemoCommands::Rm { memo_id } => {
            memos.delete_memo(memo_id)?;
        }
        MemoCommands::List { note_id } => {
            for memo_id in memos.list_memo_ids(note_id)? {
                println!("{memo_id}");
            }
        }
    }
    Ok(())
}
