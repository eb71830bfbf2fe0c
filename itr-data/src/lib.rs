//! Boundary glue around `itr-core`: reading income from CSV files and
//! extractor output, loading rule sets, logging setup and reports.

pub mod config;
pub mod documents;
pub mod extraction;
pub mod income_csv;
pub mod logging;
pub mod report;

pub use config::{RulesConfigError, load_rules, rules_from_toml_str};
pub use documents::{
    DocumentKind, DocumentUpload, ProcessedDocument, aggregate, is_supported_upload, preview,
    process_upload, process_uploads,
};
pub use extraction::{
    ExtractedFields, ExtractionError, extract_fields, extract_with_patterns, parse_model_response,
};
pub use income_csv::{IncomeCsvError, LineCategory};
