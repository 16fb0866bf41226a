// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Markdown quoting for untrusted values.
//!
//! Commit subjects, author names and model output end up in PR comments and
//! check run text. Everything here guarantees the value stays inside the
//! construct it was placed in.

/// Replace control characters with visible escapes.
pub fn visible_controls(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn longest_backtick_run(value: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in value.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Render a value as an inline code span.
///
/// The fence is one backtick longer than any run inside the value, and the
/// value is padded when a backtick or a space at its edges would otherwise
/// be eaten by the code span rules.
pub fn code_span(value: &str) -> String {
    let value = visible_controls(value);
    if value.is_empty() {
        return "*(empty)*".to_string();
    }

    let fence = "`".repeat(longest_backtick_run(&value) + 1);
    let needs_padding = value.starts_with('`')
        || value.ends_with('`')
        || (value.starts_with(' ') && value.ends_with(' ') && !value.trim().is_empty());

    if needs_padding {
        format!("{fence} {value} {fence}")
    } else {
        format!("{fence}{value}{fence}")
    }
}

/// Render a value as a fenced code block.
pub fn code_block(value: &str, info: &str) -> String {
    let fence = "`".repeat((longest_backtick_run(value) + 1).max(3));
    format!("{fence}{info}\n{value}\n{fence}")
}

/// Escape a value for use as plain Markdown text on a single line.
pub fn escape_inline(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in visible_controls(value).chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\\' | '`' | '*' | '_' | '[' | ']' | '#' | '|' | '~' | '!' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
