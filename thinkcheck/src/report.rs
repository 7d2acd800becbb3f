//! Console status-line output.
//!
//! The runner talks to a human: emoji-annotated lines, not structured logs.
//! Diagnostics go through `tracing`; these lines are the product.

use std::io::Write;

use crate::checks::CheckOutcome;

/// Characters of content shown on a one-line preview.
const PREVIEW_CHARS: usize = 200;

/// Characters of the API key shown before masking.
const KEY_PREFIX_CHARS: usize = 10;

/// Print the run banner.
pub fn banner(title: &str) {
    println!("🎯 {title}");
    println!("{}", "=".repeat(60));
}

/// Print a scenario heading.
pub fn heading(title: &str) {
    println!();
    println!("{title}…");
    println!("{}", "-".repeat(50));
}

/// A passed step.
pub fn pass(msg: &str) {
    println!("✅ {msg}");
}

/// A failed step.
pub fn fail(msg: &str) {
    println!("❌ {msg}");
}

/// A warning that does not fail the scenario.
pub fn warn(msg: &str) {
    println!("⚠️  {msg}");
}

/// Neutral information.
pub fn info(msg: &str) {
    println!("ℹ️  {msg}");
}

/// Print a streamed fragment without a trailing newline.
pub fn fragment(tag: &str, text: &str) {
    print!("{tag} {text}");
    let _ = std::io::stdout().flush();
}

/// First characters of content for one-line display.
#[must_use]
pub fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_CHARS).collect()
}

/// Mask an API key for display, keeping only a short prefix.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let prefix: String = key.chars().take(KEY_PREFIX_CHARS).collect();
    format!("{prefix}…")
}

/// Print the final per-scenario summary.
pub fn summary(outcomes: &[CheckOutcome]) {
    println!();
    println!("{}", "=".repeat(60));
    for outcome in outcomes {
        println!("{} {}", if outcome.passed { "✅" } else { "❌" }, outcome.name);
    }
    let passed = outcomes.iter().filter(|o| o.passed).count();
    println!("🎉 {passed}/{} scenarios passed", outcomes.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long: String = "思".repeat(300);
        let shown = preview(&long);
        assert_eq!(shown.chars().count(), 200);
    }

    #[test]
    fn preview_keeps_short_content_whole() {
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn mask_key_keeps_prefix_only() {
        let masked = mask_key("ak_f246de96ea05dca6e3a1e4c82f7adb25");
        assert_eq!(masked, "ak_f246de9…");
    }

    #[test]
    fn mask_key_handles_short_keys() {
        assert_eq!(mask_key("ak"), "ak…");
    }
}
