use std::path::{Path, PathBuf};

use crate::app::{AppContext, ViewState};
use crate::cli::commands::{Cli, Commands, ExecArgs, ListArgs};
use crate::cli::output;
use crate::command::{self, CommandRegistry};
use crate::model::{AppConfig, ItemType, TimelineItem};
use crate::store::{ItemStore, JsonStore};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from("jot.toml"));
    let config = AppConfig::load(&config_path)?;
    let data_path = data_path(&cli, &config);

    match cli.command {
        None => unreachable!("main launches the session for the bare invocation"),
        Some(Commands::Exec(args)) => cmd_exec(args, &data_path, json),
        Some(Commands::List(args)) => cmd_list(args, &data_path, json),
        Some(Commands::Projects) => cmd_projects(&data_path, json),
    }
}

/// CLI flag wins over config; config wins over the default file name.
pub fn data_path(cli: &Cli, config: &AppConfig) -> PathBuf {
    cli.data
        .clone()
        .or_else(|| config.data_file.clone())
        .unwrap_or_else(|| PathBuf::from("jot.json"))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_exec(args: ExecArgs, data_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let line = args.line.join(" ");
    let registry = CommandRegistry::builtin()?;
    let mut store = JsonStore::open(data_path)?;
    let mut view = ViewState::new();
    let mut ctx = AppContext {
        store: &mut store,
        view: &mut view,
    };
    // Headless execution has no multi-selection to act on
    let classification = command::classify_and_run(&registry, &line, &mut ctx, None)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::outcome_json(&classification))?
        );
    } else {
        println!("{}", output::outcome_line(&classification));
    }
    Ok(())
}

fn cmd_list(args: ListArgs, data_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let kind = match args.kind.as_deref() {
        Some(raw) => Some(
            ItemType::parse(raw).ok_or_else(|| format!("unknown item type: {}", raw))?,
        ),
        None => None,
    };
    let store = JsonStore::open(data_path)?;
    let items: Vec<TimelineItem> = store
        .items()
        .into_iter()
        .filter(|item| kind.is_none_or(|k| item.item_type() == k))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }
    for item in &items {
        match item {
            TimelineItem::Task(task) => println!(
                "#{} [task/{}] {}",
                task.id,
                task.status.as_str(),
                task.content
            ),
            TimelineItem::Event(event) => println!("#{} [event] {}", event.id, event.content),
            TimelineItem::Note(note) => println!("#{} [note] {}", note.id, note.content),
        }
    }
    Ok(())
}

fn cmd_projects(data_path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(data_path)?;
    let projects = store.projects();
    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }
    for project in &projects {
        println!("#{} {}", project.id, project.name);
    }
    Ok(())
}
