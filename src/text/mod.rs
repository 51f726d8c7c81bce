//! Text processing
//!
//! - `processor`: cleanup, sentence splitting, chunking, statistics
//! - `extract`: plain-text extraction from uploaded PDF/DOCX/TXT files

pub mod extract;
pub mod processor;

pub use extract::{extract_text, resolve_content_type, DocumentKind, ExtractError};
pub use processor::{
    chunk_text, detect_language, preprocess, split_sentences, statistics, word_count, Language,
    TextStatistics,
};
