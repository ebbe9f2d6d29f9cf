// Colored terminal output for one-off CLI moderation runs.
//
// The `check` subcommand delegates display here; the web layer never
// touches this module.

use colored::Colorize;

use crate::moderation::verdict::{BatchStats, Verdict};

/// Display a single verdict, colored by outcome.
pub fn display_verdict(index: usize, verdict: &Verdict) {
    let status = if verdict.is_toxic {
        verdict.status.as_str().red().bold()
    } else {
        verdict.status.as_str().green()
    };

    println!("{:>3}. [{}]", index + 1, status);
    println!("     Text: \"{}\"", truncate_chars(&verdict.text, 80));
    println!("     Toxicity confidence: {}%", verdict.confidence);
    println!();
}

/// Display batch statistics as a summary banner.
pub fn display_stats(stats: &BatchStats) {
    println!("{}", "=== Moderation Statistics ===".bold());
    println!("  Total texts:  {}", stats.total);
    println!("  {}         {}", "Safe:".green(), stats.safe);
    println!("  {}      {}", "Flagged:".red(), stats.flagged);
    println!("  Flagged rate: {}%", stats.flagged_percentage);
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or accented letters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
