use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::Value;
use snipx::api::{CmdMessage, MessageLevel, ModeInfo};
use snipx::dispatch::Execution;
use snipx::model::Snippet;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const MODE_WIDTH: usize = 14;
const PIN_MARKER: &str = "⚲";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub fn print_snippets(snippets: &[Snippet]) {
    if snippets.is_empty() {
        println!("No snippets found.");
        return;
    }

    let mut last_was_pinned = false;
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 && last_was_pinned && !snippet.pinned {
            println!();
        }
        last_was_pinned = snippet.pinned;

        let left_prefix = if snippet.pinned {
            format!("  {} ", PIN_MARKER)
        } else {
            "    ".to_string()
        };

        let mode = truncate_to_width(&snippet.execution_mode, MODE_WIDTH);
        let mode = format!("{:<width$}", mode, width = MODE_WIDTH);

        let category = snippet
            .category
            .as_deref()
            .map(|c| format!("[{}] ", c))
            .unwrap_or_default();
        let preview: String = snippet
            .code
            .chars()
            .take(50)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        let label = format!("{} {}{}", snippet.name, category, preview);

        let fixed_width = left_prefix.width() + MODE_WIDTH + 1 + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let label = truncate_to_width(label.trim_end(), available);
        let padding = available.saturating_sub(label.width());

        // Bold the name, leave the rest plain.
        let (name_part, rest) = if label.starts_with(&snippet.name) {
            label.split_at(snippet.name.len())
        } else {
            (label.as_str(), "")
        };

        println!(
            "{}{} {}{}{}{}",
            left_prefix,
            mode.cyan(),
            name_part.bold(),
            rest,
            " ".repeat(padding),
            format_time_ago(snippet.edited_at).dimmed()
        );
    }
}

pub fn print_full_snippets(snippets: &[Snippet]) {
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            println!("\n================================\n");
        }
        let category = snippet
            .category
            .as_deref()
            .map(|c| format!(" [{}]", c))
            .unwrap_or_default();
        println!(
            "{} {}{}",
            snippet.name.bold(),
            snippet.execution_mode.cyan(),
            category.dimmed()
        );
        println!("--------------------------------");
        println!("{}", snippet.code);
    }
}

pub fn print_execution(execution: &Execution) {
    for value in &execution.results {
        match value {
            Value::String(s) => println!("{}", s),
            other => println!("{}", other),
        }
    }
}

pub fn print_modes(modes: &[ModeInfo]) {
    if modes.is_empty() {
        println!("No execution modes registered.");
        return;
    }
    for mode in modes {
        match &mode.description {
            Some(description) => println!("  {:<16} {}", mode.name.bold(), description.dimmed()),
            None => println!("  {}", mode.name.bold()),
        }
    }
}

pub fn print_categories(categories: &[String]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    for category in categories {
        println!("  {}", category);
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
    }

    #[test]
    fn test_truncate_wide_chars() {
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
    }
}
