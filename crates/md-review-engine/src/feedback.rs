//! Serialising comments into the final feedback transcript.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::comments::Comment;

/// Context longer than this is cut and suffixed with `...`.
pub const MAX_CONTEXT_CHARS: usize = 50;

/// A finished transcript and the number of remarks it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(rename = "feedback")]
    pub text: String,
    pub count: usize,
}

fn truncate_context(context: &str) -> String {
    if context.chars().count() > MAX_CONTEXT_CHARS {
        let cut: String = context.chars().take(MAX_CONTEXT_CHARS).collect();
        format!("{cut}...")
    } else {
        context.to_string()
    }
}

/// `L<start>[-<end>] [<context>]: <text>`
pub fn comment_line(comment: &Comment) -> String {
    format!(
        "{} [{}]: {}",
        comment.lines().label(),
        truncate_context(&comment.context),
        comment.text
    )
}

fn sorted<'a>(comments: &[&'a Comment]) -> Vec<&'a Comment> {
    let mut sorted = comments.to_vec();
    sorted.sort_by_key(|c| c.start_line);
    sorted
}

/// Transcript for a single document.
pub fn format_single(comments: &[&Comment], general: &str, label: &str) -> Feedback {
    let mut out = format!("Feedback on: {label}\n\n");
    for comment in sorted(comments) {
        let _ = writeln!(out, "{}", comment_line(comment));
    }
    if !general.is_empty() {
        let _ = write!(out, "\nGeneral: {general}\n");
    }
    Feedback {
        text: out,
        count: comments.len() + usize::from(!general.is_empty()),
    }
}

/// Transcript for a folder, grouped by file in first-seen order.
pub fn format_folder(comments: &[&Comment], general: &str, label: &str) -> Feedback {
    let mut groups: Vec<(&str, Vec<&Comment>)> = vec![];
    for &comment in comments {
        match groups.iter_mut().find(|(f, _)| *f == comment.filename) {
            Some((_, group)) => group.push(comment),
            None => groups.push((comment.filename.as_str(), vec![comment])),
        }
    }

    let mut out = format!("Feedback on: {label}/\n\n");
    for (filename, group) in &groups {
        let _ = writeln!(out, "{filename}:");
        for comment in sorted(group) {
            let _ = writeln!(out, "  {}", comment_line(comment));
        }
        out.push('\n');
    }
    if !general.is_empty() {
        let _ = writeln!(out, "General: {general}");
    }
    Feedback {
        text: format!("{}\n", out.trim_end()),
        count: comments.len() + usize::from(!general.is_empty()),
    }
}
