use clap::{CommandFactory, Parser};
use flexi_logger::{Logger, LoggerHandle};
use std::io::{self, BufRead};
use taskboard_cli::cli::{Cli, Command, collect_config_overrides};
use taskboard_cli::render;
use taskboard_core::board::Board;
use taskboard_core::config::{self, Config, Palette, merge_overrides, palette_for_theme};
use taskboard_core::error::AppError;
use taskboard_core::form::{EditForm, TaskForm};
use taskboard_core::model::Task;
use taskboard_core::seed;
use taskboard_core::storage::storage_from_env;
use taskboard_core::task_store::{DropLocation, DropResult, TaskStore};

const DEBUG_ENV_VAR: &str = "TASKBOARD_DEBUG";

struct Session {
    store: TaskStore,
    palette: Palette,
}

impl Session {
    fn open(config: &Config) -> Self {
        let storage = storage_from_env(config.store_path.as_deref());
        let fallback = if config.seed_examples {
            seed::example_tasks()
        } else {
            Vec::new()
        };
        let mut store = TaskStore::initialize_with_fallback(storage, fallback);
        report_persist_error(&mut store);

        Self {
            store,
            palette: palette_for_theme(config.theme.as_deref()),
        }
    }
}

fn init_logging(debug: bool) -> Option<LoggerHandle> {
    let env_debug = std::env::var(DEBUG_ENV_VAR)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let level = if debug || env_debug { "debug" } else { "warn" };

    match Logger::try_with_env_or_str(level).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("WARNING: logging unavailable: {err}");
            None
        }
    }
}

fn load_config(raw_overrides: &[String]) -> Result<Config, AppError> {
    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error {
        log::warn!("ignoring config file: {err}");
    }
    let overrides = collect_config_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    Ok(merge_overrides(&loaded.config, &overrides))
}

fn report_persist_error(store: &mut TaskStore) {
    if let Some(err) = store.take_persist_error() {
        eprintln!("WARNING: task storage unavailable, changes are kept for this session only: {err}");
    }
}

fn not_found() -> AppError {
    AppError::invalid_input("task not found")
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(task)?);
    Ok(())
}

fn print_outcome(json: bool, verb: &str, task: &Task) -> Result<(), AppError> {
    if json {
        print_task_json(task)
    } else {
        println!("{verb} task: {} ({})", task.title, task.id);
        Ok(())
    }
}

fn print_board(session: &Session, json: bool) -> Result<(), AppError> {
    let board = Board::from_tasks(session.store.tasks());
    if json {
        println!("{}", render::board_json(&board)?);
    } else {
        println!("{}", render::board_table(&board, &session.palette));
    }
    Ok(())
}

fn run_command(cli: Cli, session: &mut Session) -> Result<(), AppError> {
    let json = cli.json;
    match cli.command {
        Command::Board => print_board(session, json)?,
        Command::List { status } => {
            let tasks = session.store.by_status(status);
            if json {
                println!("{}", serde_json::to_string(&tasks)?);
            } else {
                for task in tasks {
                    println!("{}", render::task_line(task));
                }
            }
        }
        Command::Show { id } => {
            let task = session.store.get(&id).ok_or_else(not_found)?;
            if json {
                print_task_json(task)?;
            } else {
                println!("{}", render::task_details(task));
            }
        }
        Command::Add {
            title,
            description,
            status,
            priority,
        } => {
            let form = TaskForm {
                title: title.unwrap_or_default(),
                description: description.unwrap_or_default(),
                status,
                priority,
            };
            let task = session.store.add(form.submit()?)?;
            print_outcome(json, "Added", &task)?;
        }
        Command::Edit {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let mut form = EditForm::new(session.store.get(&id).ok_or_else(not_found)?);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(status) = status {
                form.status = status;
            }
            if let Some(priority) = priority {
                form.priority = priority;
            }

            let edited = form.submit()?;
            if !session.store.update(edited.clone())? {
                return Err(not_found());
            }
            print_outcome(json, "Updated", &edited)?;
        }
        Command::Delete { id } => {
            let removed = session.store.remove(&id).ok_or_else(not_found)?;
            print_outcome(json, "Deleted", &removed)?;
        }
        Command::Move { id, status } => {
            if session.store.get(&id).is_none() {
                return Err(not_found());
            }
            let moved = session.store.move_task(&id, status);
            let task = session.store.get(&id).ok_or_else(not_found)?;
            if json {
                print_task_json(task)?;
            } else if moved {
                println!(
                    "Moved task: {} ({}) to {}",
                    task.title,
                    task.id,
                    status.column_title()
                );
            } else {
                println!(
                    "Task already in {}: {} ({})",
                    status.column_title(),
                    task.title,
                    task.id
                );
            }
        }
        Command::Drop {
            id,
            from,
            from_index,
            to,
            index,
        } => {
            if session.store.get(&id).is_none() {
                return Err(not_found());
            }
            let result = DropResult {
                task_id: id.clone(),
                source: DropLocation {
                    column: from,
                    index: from_index,
                },
                destination: Some(DropLocation { column: to, index }),
            };
            let changed = session.store.apply_drop(&result);
            let task = session.store.get(&id).ok_or_else(not_found)?;
            if json {
                print_task_json(task)?;
            } else if changed {
                println!(
                    "Dropped task: {} ({}) on {} at position {}",
                    task.title,
                    task.id,
                    to.column_title(),
                    index
                );
            } else {
                println!("No change: {} ({})", task.title, task.id);
            }
        }
    }

    report_persist_error(&mut session.store);
    Ok(())
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        match ch {
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            ch if ch.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

/// One board session: the store is opened once and every line is a gesture
/// against it. Mutations re-render the board.
fn run_interactive() -> Result<(), AppError> {
    let config = load_config(&[])?;
    let mut session = Session::open(&config);

    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) if args.is_empty() => continue,
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        let argv = std::iter::once("taskboard".to_string()).chain(args);
        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if !err.use_stderr() => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if !cli.config_override.is_empty() {
            log::warn!("config overrides only apply when the board is opened");
        }

        let rerender = cli.command.is_mutation() && !cli.json;
        match run_command(cli, &mut session) {
            Ok(()) if rerender => {
                if let Err(err) = print_board(&session, false) {
                    eprintln!("ERROR: {}", err);
                }
            }
            Ok(()) => {}
            Err(err) => eprintln!("ERROR: {}", err),
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        let _logger = init_logging(false);
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let _logger = init_logging(cli.debug);
    let config = match load_config(&cli.config_override) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
    };

    let mut session = Session::open(&config);
    if let Err(err) = run_command(cli, &mut session) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
