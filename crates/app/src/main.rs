use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pdf_finder_core::{
    load_corpus, match_corpus_with_progress, reveal_in_file_manager, CorpusOptions,
    LopdfExtractor, MatchMode, PartialMatcher, Query, ResultTable, DEFAULT_FUZZY_THRESHOLD,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdf-finder", version)]
#[command(about = "Find PDFs whose text matches a phrase")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Similar phrases, scored 0-100 against the best line.
    Fuzzy,
    /// Case-insensitive phrase on a single line.
    Exact,
    /// Words starting with any search word of four or more letters.
    Partial,
}

#[derive(Subcommand)]
enum Command {
    /// Search a folder of PDFs recursively.
    Search {
        /// Folder that contains PDFs recursively.
        #[arg(long, env = "PDF_FINDER_FOLDER")]
        folder: PathBuf,
        /// Search phrase.
        #[arg(long)]
        phrase: String,
        /// Matching mode.
        #[arg(long, value_enum, default_value_t = ModeArg::Fuzzy)]
        mode: ModeArg,
        /// Similarity threshold in percent, fuzzy mode only.
        #[arg(
            long,
            env = "PDF_FINDER_THRESHOLD",
            default_value_t = DEFAULT_FUZZY_THRESHOLD,
            value_parser = clap::value_parser!(u8).range(0..=100)
        )]
        threshold: u8,
        /// Write the ranked results to this CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
        /// Print results as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Number of PDFs parsed at the same time.
        #[arg(long, env = "PDF_FINDER_MAX_CONCURRENT_EXTRACTIONS", default_value = "4")]
        max_concurrent_extractions: usize,
    },
    /// Show a file in the platform file manager.
    Reveal {
        #[arg(long)]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "pdf-finder boot"
    );

    match cli.command {
        Command::Search {
            folder,
            phrase,
            mode,
            threshold,
            export,
            json,
            max_concurrent_extractions,
        } => {
            let mode = match mode {
                ModeArg::Fuzzy => MatchMode::Fuzzy { threshold },
                ModeArg::Exact => MatchMode::Exact,
                ModeArg::Partial => MatchMode::Partial,
            };
            let query = Query::new(mode, &phrase)?;
            if query.mode == MatchMode::Partial {
                // Reject unusable partial queries before parsing any PDF.
                PartialMatcher::new(&query.phrase)?;
            }

            let root = tokio::fs::canonicalize(&folder)
                .await
                .with_context(|| format!("cannot open folder {}", folder.display()))?;
            let options = CorpusOptions {
                max_concurrent_extractions,
            };

            let report = load_corpus(&root, Arc::new(LopdfExtractor), &options).await?;
            if !report.skipped_files.is_empty() {
                warn!(
                    "skipped_files={} for folder={}",
                    report.skipped_files.len(),
                    root.display()
                );
            }
            if report.corpus.is_empty() {
                println!("No PDF files were found in {}", root.display());
                return Ok(());
            }

            info!(
                folder = %root.display(),
                documents = report.corpus.len(),
                with_text = report.documents_with_text(),
                mode = query.mode.name(),
                "matching documents"
            );

            let results = match_corpus_with_progress(&report.corpus, &query, |progress| {
                debug!(
                    position = progress.position,
                    total = progress.total,
                    document = progress.document_id,
                    matched = progress.matched,
                    "scanned"
                );
            })?;

            let table = ResultTable::new(&results, &query, &root);
            if table.is_empty() {
                println!("No matches found for the given criteria.");
                return Ok(());
            }

            if json {
                println!("{}", serde_json::to_string_pretty(table.rows())?);
            } else {
                for row in table.rows() {
                    println!("[{}] {} {}", row.sr_no, row.match_info, row.file_name);
                    println!("  match: {}", row.best_match);
                    println!("  path: {}", row.file_path);
                }
            }

            if let Some(path) = export {
                table.export_csv(&path)?;
                info!(path = %path.display(), rows = table.len(), "exported results");
                println!("Results saved to {}", path.display());
            }
        }
        Command::Reveal { path } => {
            reveal_in_file_manager(&path).await?;
        }
    }

    Ok(())
}
