use clap::{Parser, Subcommand};
use taskboard_core::config::{ConfigOverrides, canonical_key};
use taskboard_core::model::{Priority, TaskStatus};

#[derive(Parser, Debug)]
#[command(name = "taskboard", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log store activity to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the three-column board
    ///
    /// Example: taskboard board
    Board,
    /// List the tasks of one column
    ///
    /// Example: taskboard list in-progress
    List { status: TaskStatus },
    /// Show details of a task
    ///
    /// Example: taskboard show 3
    Show { id: String },
    /// Add a new task
    ///
    /// Example: taskboard add "Write docs" "Document the API" --priority high
    Add {
        title: Option<String>,
        description: Option<String>,
        #[arg(long, default_value = "todo")]
        status: TaskStatus,
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Edit a task; omitted fields keep their current value
    ///
    /// Example: taskboard edit 3 --title "API reference" --priority low
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Delete a task
    ///
    /// Example: taskboard delete 3
    Delete { id: String },
    /// Move a task to another column
    ///
    /// Example: taskboard move 3 done
    Move { id: String, status: TaskStatus },
    /// Drop a dragged card at a position in a column
    ///
    /// Example: taskboard drop 3 --from todo --to done --index 0
    Drop {
        id: String,
        #[arg(long)]
        from: TaskStatus,
        #[arg(long = "from-index", default_value_t = 0)]
        from_index: usize,
        #[arg(long)]
        to: TaskStatus,
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

impl Command {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Edit { .. }
                | Self::Delete { .. }
                | Self::Move { .. }
                | Self::Drop { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    SeedExamples,
    StorePath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let (key_raw, value_raw) = raw
        .trim()
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let target = match canonical_key(key_raw).as_str() {
        "" => return Err("override key cannot be empty".to_string()),
        "theme" => ConfigOverrideTarget::Theme,
        "seed_examples" | "seed" => ConfigOverrideTarget::SeedExamples,
        "store_path" | "store" => ConfigOverrideTarget::StorePath,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` argument into one override set; later
/// arguments win.
pub fn collect_config_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::SeedExamples => {
                overrides.seed_examples = Some(parse_flag(&parsed.value)?)
            }
            ConfigOverrideTarget::StorePath => overrides.store_path = Some(parsed.value),
        }
    }
    Ok(overrides)
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("expected true or false, got '{other}'")),
    }
}
