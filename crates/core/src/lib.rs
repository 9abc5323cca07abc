pub mod corpus;
pub mod engine;
pub mod error;
pub mod export;
pub mod extractor;
pub mod models;
pub mod reveal;
pub mod similarity;
pub mod text;

pub use corpus::{discover_pdf_files, document_id, load_corpus, CorpusReport, SkippedPdf};
pub use engine::{
    match_corpus, match_corpus_with_progress, rank, DocumentMatcher, ExactMatcher, FuzzyMatcher,
    PartialMatcher, MIN_PARTIAL_WORD_CHARS,
};
pub use error::{CorpusError, ExportError, MatchError, RevealError};
pub use export::{ResultRow, ResultTable, CSV_HEADER};
pub use extractor::{LopdfExtractor, PdfExtractor};
pub use models::{
    Corpus, CorpusOptions, DocumentId, MatchMode, MatchProgress, MatchResult, MatchResults,
    MatchScore, Query, DEFAULT_FUZZY_THRESHOLD, MAX_THRESHOLD,
};
pub use reveal::{reveal_command, reveal_in_file_manager};
pub use similarity::{partial_ratio, partial_ratio_percent, ratio};
