use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::rank::{RankOutcome, ScoredRequirement};
use crate::scoring::ScoreBreakdown;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals, the precision explanations use
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a ranking as a table with columns: Index, Score, Requirement,
/// followed by any information requests and the comparative explanation.
/// Index column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 7 chars wide (fits "-3.33" and "1234.56")
pub fn format_ranked_table(outcome: &RankOutcome, use_colors: bool) -> String {
    if outcome.ranked.is_empty() {
        return "No requirements to rank.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 3;
    let score_width = 7;
    let separator = "  ";
    let fixed_width = index_width + 1 + score_width + separator.len();

    let mut sections = vec![outcome
        .ranked
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!("{:>width$}", format_score(item.score), width = score_width);

            let requirement = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_text(&item.requirement, width - fixed_width)
                }
                // Very narrow terminal
                Some(_) => truncate_text(&item.requirement, 20),
                // No terminal (pipe), don't truncate
                None => item.requirement.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    requirement
                )
            } else {
                format!("{} {}{}{}", index_str, score_padded, separator, requirement)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")];

    if !outcome.information_requests.is_empty() {
        let heading = if use_colors {
            "Needs clarification:".yellow().to_string()
        } else {
            "Needs clarification:".to_string()
        };
        let lines: Vec<String> = outcome
            .information_requests
            .iter()
            .map(|request| format!("  - {}", request))
            .collect();
        sections.push(format!("{}\n{}", heading, lines.join("\n")));
    }

    sections.extend(outcome.explanations.iter().cloned());
    sections.join("\n\n")
}

/// Format a ranking as tab-separated values for scripting
/// Columns: rank, score, requirement (no headers, no colors)
pub fn format_tsv(ranked: &[ScoredRequirement]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            format!(
                "{}\t{}\t{}",
                idx + 1,
                format_score(item.score),
                item.requirement.replace(['\t', '\n'], " ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format how a score was put together, one term per line
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines = vec![format!("  Policy: {}", breakdown.policy.as_str())];
    for factor in &breakdown.factors {
        lines.push(format!(
            "  {:<20} {:>14}  {:>7} -> {:>7}",
            factor.label,
            factor.description,
            format_score(factor.before),
            format_score(factor.after)
        ));
    }
    lines.join("\n")
}

/// Format a single ranked requirement with detailed multi-line output
/// (explanation, score breakdown, narrative)
pub fn format_detail(rank: usize, item: &ScoredRequirement, use_colors: bool) -> String {
    let heading = format!("{}. {} ({})", rank, item.requirement, item.id);
    let heading = if use_colors {
        heading.bold().to_string()
    } else {
        heading
    };

    format!(
        "{}\n  Score: {}\n\n{}\n\nBreakdown:\n{}\n\nNarrative:\n  {}",
        heading,
        format_score(item.score),
        item.explanation,
        format_breakdown(&item.breakdown),
        item.narrative
    )
}
