use crate::error::CorpusError;
use crate::extractor::PdfExtractor;
use crate::models::{Corpus, CorpusOptions, DocumentId};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn document_id(root: &Path, path: &Path) -> DocumentId {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}

#[derive(Debug)]
pub struct SkippedPdf {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct CorpusReport {
    /// Every discovered PDF; unreadable ones map to empty text.
    pub corpus: Corpus,
    pub skipped_files: Vec<SkippedPdf>,
}

impl CorpusReport {
    pub fn documents_with_text(&self) -> usize {
        self.corpus.values().filter(|text| !text.is_empty()).count()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("extractor panicked: {detail}")
}

/// Extracts the text of every PDF below `root` on the blocking pool.
///
/// Per-file failures never abort the load: the document keeps an empty text
/// and is listed in `skipped_files`.
pub async fn load_corpus<E>(
    root: &Path,
    extractor: Arc<E>,
    options: &CorpusOptions,
) -> Result<CorpusReport, CorpusError>
where
    E: PdfExtractor + Send + Sync + 'static,
{
    let metadata = tokio::fs::metadata(root).await.map_err(|error| {
        CorpusError::InvalidArgument(format!("cannot read folder {}: {error}", root.display()))
    })?;
    if !metadata.is_dir() {
        return Err(CorpusError::InvalidArgument(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let walk_root = root.to_path_buf();
    let files = tokio::task::spawn_blocking(move || discover_pdf_files(&walk_root)).await?;
    debug!(root = %root.display(), files = files.len(), "discovered pdf files");

    let limit = Arc::new(Semaphore::new(options.max_concurrent_extractions.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = Arc::clone(&limit).acquire_owned().await?;
        let extractor = Arc::clone(&extractor);
        tasks.spawn_blocking(move || {
            let extracted = catch_unwind(AssertUnwindSafe(|| extractor.extract_text(&path)))
                .unwrap_or_else(|payload| Err(CorpusError::PdfParse(panic_message(payload))));
            drop(permit);
            (path, extracted)
        });
    }

    let mut report = CorpusReport::default();
    while let Some(joined) = tasks.join_next().await {
        let (path, extracted) = joined?;
        let id = document_id(root, &path);

        let text = match extracted {
            Ok(text) => {
                if text.is_empty() {
                    debug!(document = %id, "pdf has no extractable text");
                }
                text
            }
            Err(error) => {
                warn!(path = %path.display(), reason = %error, "could not extract pdf text");
                report.skipped_files.push(SkippedPdf {
                    path,
                    reason: error.to_string(),
                });
                String::new()
            }
        };

        report.corpus.insert(id, text);
    }

    report
        .skipped_files
        .sort_unstable_by(|left, right| left.path.cmp(&right.path));
    Ok(report)
}
