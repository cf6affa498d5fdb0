//! quill-replay - Apply a stream of editor actions to a document

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use libquill::editor::ViewSummary;
use libquill::logging::{self, LogFormat, LoggingConfig};
use libquill::upload::Uploader;
use libquill::{Action, Config, Density, EditorData, EditorSession, QuillError};

#[derive(Parser, Debug)]
#[command(name = "quill-replay")]
#[command(version, about = "Apply a stream of editor actions to a document")]
#[command(long_about = r#"Apply newline-delimited JSON editor actions to a document and print the result.

Each input line is one action: {"type": "SET_TITLE", "payload": "Hello"}.
Blank lines are skipped. Unknown action types are ignored.

EXAMPLES:
    # Start from an empty document
    echo '{"type":"INIT_POLL","payload":[{"_id":"a","option":""},{"_id":"b","option":""},{"_id":"c","option":""}]}' | quill-replay

    # Start from a saved document and report derived values
    quill-replay actions.jsonl --initial draft.json --format json

    # Attach local files before replaying
    quill-replay actions.jsonl --attach photo.png --attach notes.txt

EXIT CODES:
    0 - Success
    1 - Error (unreadable input, bad configuration, etc.)
    3 - Invalid input (malformed action or document)
    4 - Attachment too large
"#)]
struct Cli {
    /// File of newline-delimited JSON actions (reads from stdin if not provided or "-")
    #[arg(value_name = "ACTIONS")]
    actions: Option<PathBuf>,

    /// Initial document as JSON (starts from an empty document if not provided)
    #[arg(short, long, value_name = "FILE")]
    initial: Option<PathBuf>,

    /// Attach a local file before replaying (repeatable)
    #[arg(short, long, value_name = "FILE")]
    attach: Vec<PathBuf>,

    /// Display density used for layout (overrides config)
    #[arg(short, long, value_name = "DENSITY")]
    density: Option<Density>,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Path to config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log output format: text, json or pretty (QUILL_LOG_FORMAT and
    /// QUILL_LOG_LEVEL apply when not provided)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Final state printed by `--format json`
#[derive(Debug, Serialize)]
struct Report {
    document: EditorData,
    #[serde(flatten)]
    view: ViewSummary,
    /// Input actions read
    applied: usize,
    /// Input actions that changed the document
    changed: usize,
    /// Attachment urls delivered by uploads
    resolved: usize,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.log_format {
        Some(format) => LoggingConfig::new(format, "warn".to_string(), cli.verbose).init(),
        None if cli.verbose => LoggingConfig::new(LogFormat::Text, "debug".to_string(), true).init(),
        None => logging::init_default(),
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Map an error to the exit code of the library error underneath it
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<QuillError>()
        .map_or(1, QuillError::exit_code)
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load_or_default().context("Failed to load configuration")?,
    };
    if let Some(density) = cli.density {
        config.editor.density = density;
    }

    let initial = match &cli.initial {
        Some(path) => load_document(path)?,
        None => EditorData::default(),
    };
    let mut session = EditorSession::new(initial, &config);

    let uploader = Uploader::new(
        tokio::runtime::Handle::current(),
        session.dispatcher(),
        &config.upload,
    );
    let mut uploads = Vec::with_capacity(cli.attach.len());
    for path in &cli.attach {
        let pending = uploader
            .attach(path)
            .with_context(|| format!("Failed to attach {}", path.display()))?;
        session.dispatch(pending.action);
        uploads.push(pending.task);
    }

    let actions = read_actions(cli.actions.as_deref())?;
    let applied = actions.len();
    let mut changed = 0;
    for action in actions {
        if session.dispatch(action) {
            changed += 1;
        }
    }

    for task in uploads {
        task.await.context("Upload task failed")?;
    }
    let resolved = session.pump();

    tracing::debug!(
        "Replayed {} actions ({} changed), {} uploads resolved",
        applied,
        changed,
        resolved
    );

    let report = Report {
        document: EditorData::clone(&session.document()),
        view: session.summary(),
        applied,
        changed,
        resolved,
    };

    match cli.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
        _ => print_text(&report, session.settings().density),
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<EditorData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read initial document {}", path.display()))?;
    let document = serde_json::from_str(&content).map_err(|e| {
        QuillError::InvalidInput(format!("initial document {}: {}", path.display(), e))
    })?;
    Ok(document)
}

/// Read newline-delimited actions from `path`, or stdin for `None` and `-`
fn read_actions(path: Option<&Path>) -> Result<Vec<Action>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open actions file {}", path.display()))?;
            parse_actions(BufReader::new(file))
        }
        _ => parse_actions(std::io::stdin().lock()),
    }
}

fn parse_actions(reader: impl BufRead) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read actions")?;
        if line.trim().is_empty() {
            continue;
        }
        let action = serde_json::from_str(&line)
            .and_then(Action::from_json)
            .map_err(|e| QuillError::InvalidInput(format!("line {}: {}", index + 1, e)))?;
        actions.push(action);
    }
    Ok(actions)
}

fn print_text(report: &Report, density: Density) {
    let document = &report.document;

    if let Some(title) = &document.title {
        println!("Title: {}", title);
    }
    if let Some(content) = &document.content {
        println!("Content: {} chars", content.chars().count());
    }
    if let Some(polls) = &document.polls {
        let state = if report.view.polls_editable {
            "editable"
        } else {
            "locked"
        };
        println!("Poll: {} options ({})", polls.len(), state);
        for poll in polls {
            println!("  - {}", poll.option);
        }
    }
    if let Some(attachments) = &document.attachments {
        println!("Attachments:");
        for id in &report.view.display_order {
            if let Some(attachment) = attachments.iter().find(|a| &a.id == id) {
                let marker = if attachment.is_pending() { " [pending]" } else { "" };
                println!(
                    "  - {} {}{}",
                    attachment.file_type, attachment.file_name, marker
                );
            }
        }
        println!("Scroll width: {} ({})", report.view.scroll_width, density);
    }
    if let Some(category) = &report.view.chosen_category {
        println!("Category: {}", category);
    }
    println!(
        "Applied {} actions, {} changed the document",
        report.applied, report.changed
    );
}
