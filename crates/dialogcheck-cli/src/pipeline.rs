//! Tagging pipeline: read a transcript table, tag it, aggregate, write out.

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use dialogcheck_core::{ConversationReport, TagVector, TaggedLine};
use dialogcheck_nlp::DialogueTagger;
use dialogcheck_nlp::report::passed_count;
use dialogcheck_store::{combine, read_table, tagged_lines, transcript_lines, with_tags, write_table};

/// Input columns plus line tags, and the same tags keyed by conversation.
pub struct Tagged {
    pub table: RecordBatch,
    pub lines: Vec<TaggedLine>,
}

/// Read a transcript table and tag every row.
pub fn tag_file(path: &Path, tagger: &DialogueTagger) -> anyhow::Result<Tagged> {
    let batches = read_table(path).with_context(|| format!("reading {}", path.display()))?;
    let input = combine(&batches).context("combining input batches")?;
    let rows = transcript_lines(std::slice::from_ref(&input))
        .with_context(|| format!("loading transcript from {}", path.display()))?;

    let lines = tagger.tag_lines(&rows);
    let tags: Vec<TagVector> = lines.iter().map(|l| l.tags.clone()).collect();
    let table = with_tags(&input, &tags).context("appending tag columns")?;

    Ok(Tagged { table, lines })
}

/// Read a table that already carries tag columns.
pub fn read_tagged(path: &Path) -> anyhow::Result<Vec<TaggedLine>> {
    let batches = read_table(path).with_context(|| format!("reading {}", path.display()))?;
    tagged_lines(&batches).with_context(|| format!("loading tags from {}", path.display()))
}

/// Write `batch` to `output`, or pretty-print it to stdout when there is none.
pub fn emit(batch: &RecordBatch, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            write_table(path, batch).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", pretty_format_batches(std::slice::from_ref(batch))?),
    }
    Ok(())
}

/// Counts printed to stderr after a run.
#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub conversations: usize,
    pub passed: usize,
}

impl Summary {
    pub fn new(lines: usize, reports: &[ConversationReport]) -> Self {
        Self {
            lines,
            conversations: reports.len(),
            passed: passed_count(reports),
        }
    }

    pub fn print(&self, started: Instant) {
        eprintln!(
            "  {} lines, {} conversations, {} passed ({:.2}s)",
            self.lines,
            self.conversations,
            self.passed,
            started.elapsed().as_secs_f64()
        );
    }
}
