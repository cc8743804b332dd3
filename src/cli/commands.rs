//! CLI command execution.
//!
//! Documents arrive pre-tokenized and queries pre-parsed (JSON Lines), so
//! the commands here are thin shells around the index writer, reader, and
//! query evaluator. Per-record failures are logged and skipped; only
//! index-integrity and I/O failures abort.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::sync::Arc;

use log::warn;

use crate::cli::args::{CaselexArgs, Command, IndexArgs, SearchArgs, StatsArgs};
use crate::document::DocumentTokens;
use crate::error::Result;
use crate::index::{IndexConfig, IndexReader, IndexWriter};
use crate::query::{ParsedQuery, QueryEvaluator, SearchConfig};
use crate::storage::{FileStorage, Storage, StorageConfig};

/// Execute the parsed command.
pub fn execute_command(args: CaselexArgs) -> Result<()> {
    match args.command {
        Command::Index(index_args) => execute_index(index_args),
        Command::Search(search_args) => execute_search(search_args),
        Command::Stats(stats_args) => execute_stats(stats_args),
    }
}

fn open_storage(dir: &std::path::Path) -> Result<Arc<dyn Storage>> {
    Ok(Arc::new(FileStorage::new(dir, StorageConfig::default())?))
}

fn execute_index(args: IndexArgs) -> Result<()> {
    let storage = open_storage(&args.index_dir)?;
    let config = match args.memory_limit {
        Some(memory_limit) => IndexConfig { memory_limit },
        None => IndexConfig::default(),
    };
    let mut writer = IndexWriter::new(storage, config);

    let input = BufReader::new(File::open(&args.input)?);
    let mut skipped = 0u64;
    for (line_no, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<DocumentTokens>(&line) {
            Ok(doc) => writer.add_document(&doc)?,
            Err(e) => {
                warn!("skipping malformed document on line {}: {e}", line_no + 1);
                skipped += 1;
            }
        }
    }

    let doc_count = writer.doc_count();
    writer.commit()?;

    println!("indexed {doc_count} documents ({skipped} skipped)");
    Ok(())
}

fn execute_search(args: SearchArgs) -> Result<()> {
    let storage = open_storage(&args.index_dir)?;
    let reader = IndexReader::open(storage.as_ref())?;

    let config = match args.top_k {
        Some(top_k) => SearchConfig {
            top_k,
            ..Default::default()
        },
        None => SearchConfig::default(),
    };
    let evaluator = QueryEvaluator::with_config(&reader, config);

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let queries = BufReader::new(File::open(&args.queries)?);
    for (line_no, line) in queries.lines().enumerate() {
        let line = line?;
        let doc_ids = match serde_json::from_str::<ParsedQuery>(&line) {
            Ok(query) => evaluator.evaluate(&query)?,
            Err(e) => {
                warn!("invalid query on line {}: {e}", line_no + 1);
                Vec::new()
            }
        };

        // One line per query; a blank line for invalid or empty results.
        let rendered: Vec<String> = doc_ids.iter().map(u64::to_string).collect();
        writeln!(output, "{}", rendered.join(" "))?;
    }
    output.flush()?;

    Ok(())
}

fn execute_stats(args: StatsArgs) -> Result<()> {
    let storage = open_storage(&args.index_dir)?;
    let reader = IndexReader::open(storage.as_ref())?;

    println!("documents: {}", reader.doc_count());
    println!("terms:     {}", reader.term_count());
    Ok(())
}
