use crate::engine::rank;
use crate::error::ExportError;
use crate::models::{MatchResults, Query};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const CSV_HEADER: [&str; 6] = [
    "SrNo",
    "File Name",
    "Search Phrase",
    "Match Info",
    "Best Match Found",
    "File Path",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultRow {
    pub sr_no: usize,
    pub file_name: String,
    pub search_phrase: String,
    pub match_info: String,
    pub best_match: String,
    pub file_path: String,
}

/// Ranked, numbered view of one search run, ready to display or export.
#[derive(Debug, Clone, Default)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new(results: &MatchResults, query: &Query, root: &Path) -> Self {
        let rows = rank(results)
            .into_iter()
            .enumerate()
            .map(|(index, hit)| {
                let relative = Path::new(&hit.document_id);
                let file_name = relative
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_else(|| hit.document_id.clone());

                ResultRow {
                    sr_no: index + 1,
                    file_name,
                    search_phrase: query.phrase.clone(),
                    match_info: hit.score_label(),
                    best_match: hit.matched_text,
                    file_path: root.join(relative).to_string_lossy().to_string(),
                }
            })
            .collect();

        Self { rows }
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Full path of the row with the given 1-based sequence number.
    pub fn path_of(&self, sr_no: usize) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.sr_no == sr_no)
            .map(|row| row.file_path.as_str())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn export_csv(&self, path: &Path) -> Result<(), ExportError> {
        let file = File::create(path)?;
        self.write_csv(file)
    }
}
