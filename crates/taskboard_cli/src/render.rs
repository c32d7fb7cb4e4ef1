use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;
use taskboard_core::board::Board;
use taskboard_core::config::Palette;
use taskboard_core::error::AppError;
use taskboard_core::model::{Priority, Task};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;

/// Card date as shown on the board, e.g. `Jan 15, 2024`. Unparseable
/// timestamps are shown verbatim.
pub fn display_date(created_at: &str) -> String {
    let format = format_description!("[month repr:short] [day padding:none], [year]");
    OffsetDateTime::parse(created_at, &Rfc3339)
        .ok()
        .and_then(|parsed| parsed.format(&format).ok())
        .unwrap_or_else(|| created_at.to_string())
}

fn priority_tag(priority: Priority, palette: &Palette) -> String {
    let tag = format!("[{}]", priority.label());
    match priority {
        Priority::High => palette.highlight(&tag),
        Priority::Medium => tag,
        Priority::Low => palette.mute(&tag),
    }
}

pub fn card_text(task: &Task, palette: &Palette) -> String {
    let mut lines = vec![
        format!("{} {}", priority_tag(task.priority, palette), task.title),
        palette.mute(&task.id),
    ];
    if !task.description.is_empty() {
        lines.push(task.description.clone());
    }
    lines.push(display_date(&task.created_at));
    lines.join("\n")
}

pub fn board_table(board: &Board<'_>, palette: &Palette) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        board
            .columns
            .iter()
            .map(|column| format!("{} ({})", column.title, column.tasks.len())),
    );

    for row in 0..board.depth() {
        builder.push_record(board.columns.iter().map(|column| {
            column
                .tasks
                .get(row)
                .map(|task| card_text(task, palette))
                .unwrap_or_default()
        }));
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

pub fn board_json(board: &Board<'_>) -> Result<Value, AppError> {
    let mut columns = Map::new();
    for column in &board.columns {
        columns.insert(
            column.status.as_str().to_string(),
            serde_json::to_value(&column.tasks)?,
        );
    }
    Ok(Value::Object(columns))
}

pub fn task_line(task: &Task) -> String {
    format!(
        "{} | {} | {} | {} | {}",
        task.id,
        task.title,
        task.status,
        task.priority,
        display_date(&task.created_at)
    )
}

pub fn task_details(task: &Task) -> String {
    format!(
        "{}\n  id: {}\n  column: {}\n  priority: {}\n  created: {}\n\n  {}",
        task.title,
        task.id,
        task.status.column_title(),
        task.priority.label(),
        display_date(&task.created_at),
        task.description
    )
}
