//! Plain-text rendering of a finished run.

use std::collections::BTreeMap;
use std::io::{self, Write};

use rdash_pipeline::{NoticeLevel, RunResult};

const BAR_WIDTH: usize = 40;
const SAMPLE_CHARS: usize = 60;

/// Print every dashboard section in display order.
///
/// A halted run prints its notices only.
pub(crate) fn dashboard(out: &mut impl Write, run: &RunResult) -> io::Result<()> {
    writeln!(
        out,
        "Reddit NLP Dashboard (run {}, {})",
        run.version, run.phase
    )?;
    writeln!(out)?;
    notices(out, run)?;

    if !run.completed {
        writeln!(out, "Analysis halted; no dashboard data.")?;
        return Ok(());
    }

    topic_table(out, run)?;
    let selector = run.selector_topics();
    if selector.is_empty() {
        writeln!(out, "Word cloud topics: none")?;
    } else {
        let ids: Vec<String> = selector.iter().map(ToString::to_string).collect();
        writeln!(out, "Word cloud topics: {}", ids.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "Topic Coherence Score (C_v): {:.4}", run.coherence)?;
    writeln!(out)?;

    let sentiment = run.sentiment();
    bars(out, "Sentiment Distribution (classifier)", &sentiment.overall)?;
    bars(out, "Sentiment Distribution (lexicon)", &sentiment.lexicon)?;

    if !sentiment.by_topic.is_empty() {
        writeln!(out, "Sentiment by Topic")?;
        let labels: Vec<&String> = sentiment.by_topic[0].counts.keys().collect();
        write!(out, "  {:<8}", "TOPIC")?;
        for label in &labels {
            write!(out, "{label:<12}")?;
        }
        writeln!(out)?;
        for entry in &sentiment.by_topic {
            write!(out, "  {:<8}", entry.topic)?;
            for label in &labels {
                let count = entry.counts.get(label.as_str()).copied().unwrap_or(0);
                write!(out, "{count:<12}")?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn notices(out: &mut impl Write, run: &RunResult) -> io::Result<()> {
    writeln!(out, "Notices")?;
    for notice in &run.notices {
        let level = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "success",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "  [{level}] {}: {}", notice.phase, notice.message)?;
    }
    writeln!(out)
}

fn topic_table(out: &mut impl Write, run: &RunResult) -> io::Result<()> {
    writeln!(out, "Topic Summary")?;
    let summaries = run.topic_summaries();
    if summaries.is_empty() {
        writeln!(out, "  No topics found.")?;
        return writeln!(out);
    }
    writeln!(out, "  {:<8}{:<6}{:<45}SAMPLE", "TOPIC", "ROWS", "KEYWORDS")?;
    for summary in &summaries {
        writeln!(
            out,
            "  {:<8}{:<6}{:<45}{}",
            summary.topic,
            summary.count,
            summary.top_keywords,
            truncate(summary.sample_text(), SAMPLE_CHARS)
        )?;
    }
    writeln!(out)
}

fn bars(out: &mut impl Write, title: &str, counts: &BTreeMap<String, usize>) -> io::Result<()> {
    writeln!(out, "{title}")?;
    let max = counts.values().copied().max().unwrap_or(0);
    for (label, count) in counts {
        writeln!(out, "  {label:<10}{} {count}", "#".repeat(bar_len(*count, max)))?;
    }
    writeln!(out)
}

/// Bar length scaled to the largest count; non-zero counts get at least one mark.
fn bar_len(count: usize, max: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    (count * BAR_WIDTH / max).max(1)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
