use anyhow::Result;
use clap::Args;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::classifier::{ClassificationRecord, Classifier};
use crate::cli::Output;
use crate::config::SniffConfig;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Files or directories to classify
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Descend into directories and classify every entry
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Show the full facet table for each entry
    #[arg(long)]
    pub long: bool,

    /// Show statistics after classifying
    #[arg(long)]
    pub stats: bool,

    /// Worker threads for recursive classification (0 = auto-detect)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

pub fn execute(args: ClassifyArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let config = SniffConfig::load_with_custom_config(config_path)?;
    let classifier = Classifier::from_config(&config)?;

    let roots = if args.paths.is_empty() { vec![PathBuf::from(".")] } else { args.paths.clone() };

    let follow_symlinks = config.get_bool("scan.follow_symlinks").unwrap_or(false);

    let start_time = Instant::now();
    let targets = collect_targets(&roots, args.recursive, follow_symlinks, output);

    let threads = match args.threads {
        Some(threads) => threads,
        None => config.get_usize("scan.threads").unwrap_or(0),
    };
    let threads = if threads == 0 { num_cpus::get() } else { threads };

    let records: Vec<Arc<ClassificationRecord>> = if targets.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
        pool.install(|| targets.par_iter().map(|path| classifier.classify(path)).collect())
    } else {
        targets.iter().map(|path| classifier.classify(path)).collect()
    };
    let elapsed = start_time.elapsed();

    match args.format {
        OutputFormat::Json => {
            let plain: Vec<&ClassificationRecord> = records.iter().map(|record| record.as_ref()).collect();
            println!("{}", serde_json::to_string_pretty(&plain)?);
        }
        OutputFormat::Yaml => {
            let plain: Vec<&ClassificationRecord> = records.iter().map(|record| record.as_ref()).collect();
            print!("{}", serde_yml::to_string(&plain)?);
        }
        OutputFormat::Text => {
            print_text(&records, args.long, output);
        }
    }

    if args.stats {
        print_stats(&records, elapsed, output);
    }

    Ok(())
}

/// Expand the root paths: in recursive mode directories contribute
/// every descendant entry (files, subdirectories, symlinks alike).
fn collect_targets(
    roots: &[PathBuf],
    recursive: bool,
    follow_symlinks: bool,
    output: &Output,
) -> Vec<PathBuf> {
    let mut targets = Vec::new();
    for root in roots {
        if recursive && root.is_dir() {
            let walker = WalkBuilder::new(root)
                .hidden(false)
                .ignore(false)
                .git_ignore(false)
                .git_global(false)
                .git_exclude(false)
                .parents(false)
                .follow_links(follow_symlinks)
                .build();
            for entry in walker {
                match entry {
                    Ok(entry) => targets.push(entry.into_path()),
                    Err(err) => output.warning(&format!("Walk error: {err}")),
                }
            }
        } else {
            targets.push(root.clone());
        }
    }
    targets
}

fn print_text(records: &[Arc<ClassificationRecord>], long: bool, output: &Output) {
    for record in records {
        let summary = summarize(record);
        println!(
            "{} {}",
            console::style(format!("{}:", record.path)).cyan().bold(),
            summary
        );

        if long {
            // one row per field, in the serialization order
            if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(record.as_ref()) {
                for (key, value) in map {
                    if key == "path" {
                        continue;
                    }
                    output.table_row(&key, &value.to_string());
                }
            }
        }
    }
}

/// One-line summary: kind, description, language, standout facets.
fn summarize(record: &ClassificationRecord) -> String {
    if !record.exists() {
        return "no such file or directory".to_string();
    }
    if record.is_dir() {
        return format!("directory, {} bytes total", record.size);
    }
    if record.is_link() {
        let state = if record.is_broken_link() { "broken symbolic link" } else { "symbolic link" };
        return format!("{} to {}", state, record.link_target);
    }
    if record.is_special() {
        return format!("{:?}", record.kind).to_lowercase();
    }

    let mut parts = vec![record.native_filetype.clone()];
    if !record.lexer_language.is_empty() {
        parts.push(format!("[{}]", record.lexer_language));
    }
    for (facet, label) in [
        (record.is_source, "source"),
        (record.is_script, "script"),
        (record.is_archive, "archive"),
        (record.is_media, "media"),
    ] {
        if facet {
            parts.push(label.to_string());
        }
    }
    parts.join(" ")
}

fn print_stats(
    records: &[Arc<ClassificationRecord>],
    elapsed: std::time::Duration,
    output: &Output,
) {
    let count = |predicate: fn(&ClassificationRecord) -> bool| {
        records.iter().filter(|r| predicate(r)).count()
    };

    output.category("Classification Statistics");
    output.summary_stats("Entries classified:", records.len());
    output.summary_stats("Text files:", count(|r| r.is_text));
    output.summary_stats("Binary files:", count(|r| r.is_binary));
    output.summary_stats("Source files:", count(|r| r.is_source));
    output.summary_stats("Archives:", count(|r| r.is_archive));
    output.summary_stats("Media files:", count(|r| r.is_media));
    output.key_value("Elapsed:", &format!("{}ms", elapsed.as_millis()), false);
}
