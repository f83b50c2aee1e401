//! Message formatting for Telegram notifications.

use crate::domain::judgment::Decision;
use crate::domain::report::{NotificationEntry, NotificationPayload};

/// Telegram rejects messages longer than 4096 characters.
const MAX_MESSAGE_CHARS: usize = 4000;
const TITLE_CHARS: usize = 80;
const RATIONALE_CHARS: usize = 200;

/// Format a payload into one or more `MarkdownV2` messages.
///
/// Entries are never split across messages; a long payload is continued in
/// follow-up messages.
pub fn format_payload(payload: &NotificationPayload) -> Vec<String> {
    let header = format!(
        "📊 *Prediction Market Opportunities*\n\
        \n\
        🕒 {}\n\
        🎯 Found `{}` opportunit{}\n",
        escape_markdown(&payload.run_at.format("%Y-%m-%d %H:%M UTC").to_string()),
        payload.entries.len(),
        if payload.entries.len() == 1 { "y" } else { "ies" },
    );

    let mut messages = Vec::new();
    let mut current = header;
    for (rank, entry) in payload.entries.iter().enumerate() {
        let block = format_entry(rank + 1, entry);
        if current.chars().count() + block.chars().count() > MAX_MESSAGE_CHARS {
            messages.push(std::mem::take(&mut current));
        }
        current.push_str(&block);
    }
    if !current.is_empty() {
        messages.push(current);
    }
    messages
}

fn format_entry(rank: usize, entry: &NotificationEntry) -> String {
    let emoji = match entry.decision {
        Decision::Yes => "🟢",
        Decision::No => "🔴",
        Decision::Abstain => "⚪",
    };
    let mut block = format!(
        "\n{}\\. {} *{}* {}\n\
        📈 Market `{}%` → Est `{}%` \\(edge `{}` pts\\)\n\
        ⭐ Score `{}` · {} confidence\n",
        rank,
        emoji,
        entry.decision,
        escape_markdown(&truncate(&entry.title, TITLE_CHARS)),
        escape_markdown(&format!("{:.1}", entry.implied_probability * 100.0)),
        escape_markdown(&format!("{:.1}", entry.estimated_probability * 100.0)),
        escape_markdown(&format!("{:.1}", entry.edge * 100.0)),
        escape_markdown(&format!("{:.2}", entry.score)),
        entry.confidence,
    );
    if !entry.rationale.is_empty() {
        block.push_str(&format!(
            "💡 _{}_\n",
            escape_markdown(&truncate(&entry.rationale, RATIONALE_CHARS))
        ));
    }
    block.push_str(&format!("🔗 {}\n", escape_markdown(&entry.url)));
    block
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}
