use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::rules::Heat;
use crate::scoring::{Category, ScoreResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with one decimal, trimming a trailing ".0" (54.5, 35)
pub fn format_score(score: f64) -> String {
    let formatted = format!("{:.1}", score);
    formatted
        .strip_suffix(".0")
        .map(str::to_string)
        .unwrap_or(formatted)
}

/// Format a signed delta ("+19.5", "-35", "+0")
pub fn format_delta(delta: f64) -> String {
    let magnitude = format_score(delta.abs());
    if delta < 0.0 && magnitude != "0" {
        format!("-{}", magnitude)
    } else {
        format!("+{}", magnitude)
    }
}

/// Format a heat bucket as "warm (2)"
pub fn format_heat(heat: Heat, use_colors: bool) -> String {
    let text = format!("{} ({})", heat.label(), heat.as_u8());
    if !use_colors {
        return text;
    }
    match heat {
        Heat::Hot => text.red().bold().to_string(),
        Heat::Warm => text.yellow().to_string(),
        Heat::Cool => text.cyan().to_string(),
        Heat::Cold => text.blue().to_string(),
    }
}

fn category_name(category: Category) -> &'static str {
    match category {
        Category::Clamp => "clamp",
        Category::StageBase => "stage",
        Category::Referral => "referral",
        Category::Outreach => "outreach",
        Category::Application => "application",
    }
}

/// Human-readable explanation of a score: a summary line, then one line per
/// breakdown entry with its signed delta.
///
/// ```text
/// Score 54.5, heat warm (2), decay x0.25
///   stage        +35     stage APPLIED
///   outreach     +19.5   POSITIVE via EMAIL (21d idle, x0.25)
/// ```
pub fn format_explanation(result: &ScoreResult, use_colors: bool) -> String {
    let score = format_score(result.score);
    let decay = format!("x{:.2}", result.decay_factor);
    let summary = if use_colors {
        format!(
            "Score {}, heat {}, decay {}",
            score.bold(),
            format_heat(result.heat, true),
            decay.dimmed()
        )
    } else {
        format!(
            "Score {}, heat {}, decay {}",
            score,
            format_heat(result.heat, false),
            decay
        )
    };

    let lines = result.breakdown.iter().map(|entry| {
        let name = format!("{:<12}", category_name(entry.category));
        let delta = format!("{:<7}", format_delta(entry.delta));
        if use_colors {
            let delta = if entry.delta < 0.0 {
                delta.red().to_string()
            } else {
                delta.green().to_string()
            };
            format!("  {} {} {}", name.dimmed(), delta, entry.label)
        } else {
            format!("  {} {} {}", name, delta, entry.label)
        }
    });

    std::iter::once(summary)
        .chain(lines)
        .collect::<Vec<_>>()
        .join("\n")
}
