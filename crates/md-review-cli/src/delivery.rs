//! Handing the finished transcript back to the terminal and clipboard.

use md_review_engine::Feedback;

pub const BANNER: &str = "=== md-review feedback ===";

/// The transcript between banner lines, as printed to stdout.
pub fn framed(feedback: &Feedback) -> String {
    format!(
        "\n{BANNER}\n{}{}\n",
        feedback.text,
        "=".repeat(BANNER.len())
    )
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

/// Prints the transcript and copies it to the clipboard.
///
/// Clipboard failures are logged; delivery is best effort.
pub fn deliver(feedback: &Feedback, copy_to_clipboard: bool) {
    if feedback.count == 0 {
        println!("\n(No comments, clipboard unchanged)");
        return;
    }
    print!("{}", framed(feedback));
    log::info!("Feedback finished with {} remark(s)", feedback.count);

    if !copy_to_clipboard {
        return;
    }
    match copy(&feedback.text) {
        Ok(()) => println!(
            "✓ {} comment{} copied to clipboard",
            feedback.count,
            plural(feedback.count)
        ),
        Err(e) => log::warn!("Could not copy feedback to clipboard: {e}"),
    }
}

fn copy(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_owned())
}
