use super::render::{
    format_active, format_folder_tree, print_messages, print_view, TerminalRenderer,
};
use super::setup::{Cli, Commands, FolderCommands, NoteCommands};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use urbrain::api::UrbrainApi;
use urbrain::commands::config::{self as config_cmd, ConfigAction};
use urbrain::commands::{CmdResult, Command, UrbrainPaths};
use urbrain::config::UrbrainConfig;
use urbrain::error::{Result, UrbrainError};
use urbrain::model::FolderId;
use urbrain::store::fs::FileStore;
use urbrain::tabs::TabTarget;
use urbrain::view::ActiveView;

const DATA_ENV: &str = "URBRAIN_DATA";
const LOG_ENV: &str = "URBRAIN_LOG";

const SESSION_HELP: &str = "\
open-folder <ID>     open a folder in a tab
open-note <ID>       open a note in a tab
home                 open a new Home tab
switch <TAB>         activate a tab (tab-N or N)
close [TAB]          close a tab (default: the active one)
move <TAB> <TARGET>  move a tab to the position of another
mkdir <NAME>         new folder inside the active folder
touch <TITLE>        new note in the active folder
rename <NAME>        rename the active folder or note
rm                   delete the active folder or note
tabs                 show the tab strip again
quit                 leave the session";

struct AppContext {
    api: UrbrainApi<FileStore, TerminalRenderer>,
}

type Lines<'a> = io::Lines<io::StdinLock<'a>>;

enum Flow {
    Continue,
    Quit,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = resolve_paths(&cli)?;

    let loaded = UrbrainConfig::load(&paths.config_dir);
    let configured_level = loaded
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| UrbrainConfig::default().log_level);
    init_tracing(cli.verbose, &configured_level);
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, using defaults");
        UrbrainConfig::default()
    });

    // Config never touches the data store.
    if let Some(Commands::Config { key, value }) = &cli.command {
        return handle_config(&paths, key.clone(), value.clone());
    }

    let mut ctx = init_context(&paths, config);
    print_messages(&ctx.api.startup_messages());

    match cli.command {
        Some(Commands::Folder { action }) => handle_folder(&mut ctx, action),
        Some(Commands::Note { action }) => handle_note(&mut ctx, action),
        Some(Commands::Session) => handle_session(&mut ctx),
        Some(Commands::Doctor) => handle_doctor(&ctx),
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Config { .. }) => Ok(()),
        None => {
            print_view(&ctx.api);
            Ok(())
        }
    }
}

/// `--data-dir`, then `$URBRAIN_DATA`, then the platform directories.
fn resolve_paths(cli: &Cli) -> Result<UrbrainPaths> {
    let explicit = cli.data_dir.clone().or_else(|| {
        std::env::var_os(DATA_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    if let Some(dir) = explicit {
        return Ok(UrbrainPaths {
            config_dir: dir.clone(),
            data_dir: dir,
        });
    }

    let dirs = ProjectDirs::from("com", "urbrain", "urbrain")
        .ok_or_else(|| UrbrainError::Config("Could not determine data directory".into()))?;
    Ok(UrbrainPaths {
        config_dir: dirs.config_dir().to_path_buf(),
        data_dir: dirs.data_dir().to_path_buf(),
    })
}

/// `-v` flags win over `$URBRAIN_LOG`, which wins over the config file.
fn init_tracing(verbose: u8, configured: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn init_context(paths: &UrbrainPaths, config: UrbrainConfig) -> AppContext {
    tracing::debug!(data_dir = %paths.data_dir.display(), "opening store");
    let store = FileStore::new(paths.data_dir.clone());
    let renderer = TerminalRenderer::new(config.preview_length);
    AppContext {
        api: UrbrainApi::open(store, renderer, config),
    }
}

fn report(result: &CmdResult) {
    print_messages(&result.messages);
}

fn handle_folder(ctx: &mut AppContext, action: FolderCommands) -> Result<()> {
    match action {
        FolderCommands::Create { name, parent } => {
            let parent = parent.map(|p| ctx.api.resolve_folder(&p)).transpose()?;
            let result = ctx.api.try_execute(Command::CreateFolder {
                name: name.join(" "),
                parent,
            })?;
            report(&result);
            for folder in &result.affected_folders {
                println!("{}", folder.id);
            }
        }
        FolderCommands::Rename { folder, name } => {
            let id = ctx.api.resolve_folder(&folder)?;
            let result = ctx.api.try_execute(Command::RenameFolder {
                id,
                name: name.join(" "),
            })?;
            report(&result);
        }
        FolderCommands::Delete { folder, yes } => {
            let id = ctx.api.resolve_folder(&folder)?;
            let stdin = io::stdin();
            let mut lines = stdin.lock().lines();
            delete_folder(ctx, id, yes, &mut lines)?;
        }
        FolderCommands::List => {
            println!("{}", format_folder_tree(&ctx.api.workspace().entities));
        }
        FolderCommands::Show { folder } => {
            let id = ctx.api.resolve_folder(&folder)?;
            ctx.api.try_execute(Command::OpenFolder { id })?;
            let preview_length = ctx.api.config().preview_length;
            print!("{}", format_active(&ctx.api.view().active, preview_length));
        }
    }
    Ok(())
}

fn handle_note(ctx: &mut AppContext, action: NoteCommands) -> Result<()> {
    match action {
        NoteCommands::Create {
            title,
            folder,
            content,
        } => {
            let folder = ctx.api.resolve_folder(&folder)?;
            let result = ctx.api.try_execute(Command::CreateNote {
                title: title.join(" "),
                folder,
                content,
            })?;
            report(&result);
            for note in &result.affected_notes {
                println!("{}", note.id);
            }
        }
        NoteCommands::Edit {
            note,
            title,
            content,
        } => {
            if title.is_none() && content.is_none() {
                return Err(UrbrainError::Validation(
                    "Nothing to change, pass --title or --content".into(),
                ));
            }
            let id = ctx.api.resolve_note(&note)?;
            let result = ctx
                .api
                .try_execute(Command::UpdateNote { id, title, content })?;
            report(&result);
        }
        NoteCommands::Delete { note } => {
            let id = ctx.api.resolve_note(&note)?;
            let result = ctx.api.try_execute(Command::DeleteNote { id })?;
            report(&result);
        }
        NoteCommands::Show { note } => {
            let id = ctx.api.resolve_note(&note)?;
            ctx.api.try_execute(Command::OpenNote { id })?;
            let preview_length = ctx.api.config().preview_length;
            print!("{}", format_active(&ctx.api.view().active, preview_length));
        }
    }
    Ok(())
}

/// Shows the deletion preview and asks before removing anything.
fn delete_folder(
    ctx: &mut AppContext,
    id: FolderId,
    yes: bool,
    lines: &mut Lines<'_>,
) -> Result<()> {
    if !yes {
        let preview = ctx
            .api
            .try_execute(Command::PreviewDeleteFolder { id })?
            .preview
            .ok_or(UrbrainError::FolderNotFound(id))?;
        if !confirm(&preview.prompt(), lines)? {
            println!("{}", "Cancelled.".dimmed());
            return Ok(());
        }
    }
    let result = ctx.api.try_execute(Command::DeleteFolder { id })?;
    report(&result);
    Ok(())
}

fn confirm(prompt: &str, lines: &mut Lines<'_>) -> Result<bool> {
    print!("{} [y/N] ", prompt.yellow());
    io::stdout().flush()?;
    let answer = match lines.next() {
        Some(line) => line?,
        None => String::new(),
    };
    println!();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn handle_doctor(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    report(&result);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes {
        return Err(UrbrainError::Validation(
            "This deletes everything, run again with --yes".into(),
        ));
    }
    let result = ctx.api.clear_all()?;
    report(&result);
    Ok(())
}

fn handle_config(paths: &UrbrainPaths, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = config_cmd::run(paths, action)?;
    if show_all {
        if let Some(config) = &result.config {
            for key in UrbrainConfig::keys() {
                if let Some(value) = config.get(key) {
                    println!("{} = {}", key, value);
                }
            }
        }
    }
    report(&result);
    Ok(())
}

fn handle_session(ctx: &mut AppContext) -> Result<()> {
    ctx.api.renderer_mut().set_muted(false);
    print_view(&ctx.api);

    let interactive = io::stdin().is_terminal();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("{} ", ">".cyan());
            io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&action, args)) = words.split_first() else {
            continue;
        };

        match session_step(ctx, action, args, &mut lines) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("{}", e.to_string().red()),
        }
    }
    Ok(())
}

fn session_step(
    ctx: &mut AppContext,
    action: &str,
    args: &[&str],
    lines: &mut Lines<'_>,
) -> Result<Flow> {
    let command = match action {
        "open-folder" => Command::OpenFolder {
            id: ctx.api.resolve_folder(first(args, "a folder id")?)?,
        },
        "open-note" => Command::OpenNote {
            id: ctx.api.resolve_note(first(args, "a note id")?)?,
        },
        "home" => Command::OpenHome,
        "switch" => Command::SwitchTab {
            id: ctx.api.resolve_tab(first(args, "a tab")?)?,
        },
        "close" => Command::CloseTab {
            id: match args.first() {
                Some(tab) => ctx.api.resolve_tab(tab)?,
                None => ctx.api.workspace().tabs.active_id(),
            },
        },
        "move" => match args {
            [dragged, target] => Command::ReorderTab {
                dragged: ctx.api.resolve_tab(dragged)?,
                target: ctx.api.resolve_tab(target)?,
            },
            _ => return Err(UrbrainError::Validation("Usage: move <TAB> <TARGET>".into())),
        },
        "mkdir" => Command::CreateFolder {
            name: joined(args, "a folder name")?,
            parent: match active_target(ctx) {
                TabTarget::Folder(id) => Some(id),
                _ => None,
            },
        },
        "touch" => {
            let folder = match active_target(ctx) {
                TabTarget::Folder(id) => id,
                TabTarget::Note(id) => ctx
                    .api
                    .workspace()
                    .entities
                    .note(id)
                    .map(|n| n.folder_id)
                    .ok_or(UrbrainError::NoteNotFound(id))?,
                _ => {
                    return Err(UrbrainError::Validation(
                        "Open a folder before creating a note".into(),
                    ))
                }
            };
            Command::CreateNote {
                title: joined(args, "a note title")?,
                folder,
                content: String::new(),
            }
        }
        "rename" => {
            let name = joined(args, "a new name")?;
            match active_target(ctx) {
                TabTarget::Folder(id) => Command::RenameFolder { id, name },
                TabTarget::Note(id) => Command::UpdateNote {
                    id,
                    title: Some(name),
                    content: None,
                },
                _ => {
                    return Err(UrbrainError::Validation(
                        "Only folders and notes can be renamed".into(),
                    ))
                }
            }
        }
        "rm" => match active_target(ctx) {
            TabTarget::Folder(id) => {
                delete_folder(ctx, id, false, lines)?;
                return Ok(Flow::Continue);
            }
            TabTarget::Note(id) => Command::DeleteNote { id },
            _ => {
                return Err(UrbrainError::Validation(
                    "Nothing to delete on this tab".into(),
                ))
            }
        },
        "tabs" => {
            print_view(&ctx.api);
            return Ok(Flow::Continue);
        }
        "help" => {
            println!("{}", SESSION_HELP);
            return Ok(Flow::Continue);
        }
        "quit" | "exit" => return Ok(Flow::Quit),
        other => {
            return Err(UrbrainError::Validation(format!(
                "Unknown action '{}', try 'help'",
                other
            )))
        }
    };

    let result = ctx.api.try_execute(command)?;
    report(&result);
    Ok(Flow::Continue)
}

/// What the active tab shows after resolution; a tab on a deleted entity
/// counts as Home.
fn active_target(ctx: &AppContext) -> TabTarget {
    match ctx.api.view().active {
        ActiveView::Folder { folder, .. } => TabTarget::Folder(folder.id),
        ActiveView::Note { note, .. } => TabTarget::Note(note.id),
        ActiveView::Sticky { id } => TabTarget::Sticky(id.to_string()),
        ActiveView::Home { .. } => TabTarget::Home,
    }
}

fn first<'a>(args: &[&'a str], what: &str) -> Result<&'a str> {
    args.first()
        .copied()
        .ok_or_else(|| UrbrainError::Validation(format!("Expected {}", what)))
}

fn joined(args: &[&str], what: &str) -> Result<String> {
    if args.is_empty() {
        return Err(UrbrainError::Validation(format!("Expected {}", what)));
    }
    Ok(args.join(" "))
}
