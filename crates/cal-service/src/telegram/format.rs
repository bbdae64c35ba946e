//! Due-task digest formatting (Telegram MarkdownV2)

use chrono::NaiveDate;

use cal_core::Event;

/// Characters MarkdownV2 reserves outside of entities
const RESERVED: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escape free text for a MarkdownV2 message
pub fn escape_markdown_v2(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the digest for `day`, or `None` when nothing is due
///
/// ```text
/// *Tasks Due Today (2024-05-01):*
///
/// *- Ship release* (in-progress)
/// ```
pub fn build_digest(day: NaiveDate, events: &[Event]) -> Option<String> {
    if events.is_empty() {
        return None;
    }

    let date = escape_markdown_v2(&day.format("%Y-%m-%d").to_string());
    let mut text = format!("*Tasks Due Today \\({date}\\):*\n\n");
    for event in events {
        text.push_str(&format!(
            "*\\- {}* \\({}\\)\n",
            escape_markdown_v2(&event.title),
            escape_markdown_v2(event.status.as_str()),
        ));
    }
    Some(text)
}
