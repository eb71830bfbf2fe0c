//! Uploaded-document helpers: classification, upload filtering, previews and
//! merging per-document extractions into one set of inputs.

use std::fmt;
use std::path::Path;

use itr_core::{AmountMap, IncomeInputs};
use tracing::{debug, info, warn};

use crate::extraction::{
    ExtractedFields, ExtractionError, extract_fields, extract_with_patterns, parse_model_response,
};

const PREVIEW_CHARS: usize = 1000;

const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "png", "jpg", "jpeg", "txt"];

/// What an uploaded document appears to be, judged from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    SalarySlip,
    Form16,
    Receipt,
    InvestmentStatement,
    FinancialDocument,
}

impl DocumentKind {
    /// Classifies by case-insensitive keywords in the file name. Checks run
    /// in order, so `salary_form16.pdf` is a salary slip.
    ///
    /// # Examples
    ///
    /// ```
    /// use itr_data::documents::DocumentKind;
    ///
    /// assert_eq!(DocumentKind::from_file_name("March_Payslip.pdf"), DocumentKind::SalarySlip);
    /// assert_eq!(DocumentKind::from_file_name("Form 16 FY24.pdf"), DocumentKind::Form16);
    /// assert_eq!(DocumentKind::from_file_name("scan.png"), DocumentKind::FinancialDocument);
    /// ```
    pub fn from_file_name(file_name: &str) -> Self {
        let name = file_name.to_lowercase();

        if name.contains("salary") || name.contains("payslip") {
            Self::SalarySlip
        } else if name.contains("form 16") || name.contains("form16") || name.contains("form-16")
        {
            Self::Form16
        } else if name.contains("receipt") || name.contains("bill") {
            Self::Receipt
        } else if name.contains("statement") || name.contains("portfolio") {
            Self::InvestmentStatement
        } else {
            Self::FinancialDocument
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalarySlip => "Salary Slip",
            Self::Form16 => "Form 16",
            Self::Receipt => "Receipt",
            Self::InvestmentStatement => "Investment Statement",
            Self::FinancialDocument => "Financial Document",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the file extension is one the extractor accepts.
pub fn is_supported_upload(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// First 1000 characters of `content`, with `...` appended when truncated.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

/// Raw material for one upload: the document text (when readable here) and
/// the extractor's response (when one was produced).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content: Option<String>,
    pub model_response: Option<String>,
}

/// One processed upload, as listed back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    /// See [`preview`].
    pub preview: String,
    pub fields: ExtractedFields,
}

impl ProcessedDocument {
    pub fn new(
        file_name: impl Into<String>,
        content: &str,
        fields: ExtractedFields,
    ) -> Self {
        let file_name = file_name.into();
        let kind = DocumentKind::from_file_name(&file_name);
        Self {
            file_name,
            kind,
            preview: preview(content),
            fields,
        }
    }
}

/// Extracts fields from one upload.
///
/// With both text and a response, an unusable response falls back to
/// pattern matching over the text. With only a response it must parse. With
/// only text, patterns are used and the summary is the document kind.
///
/// # Errors
///
/// The parse error for a lone unusable response, or
/// [`ExtractionError::NothingToExtract`] when the upload is empty.
pub fn process_upload(upload: &DocumentUpload) -> Result<ProcessedDocument, ExtractionError> {
    let kind = DocumentKind::from_file_name(&upload.file_name);

    let (shown, fields) = match (&upload.content, &upload.model_response) {
        (Some(content), Some(response)) => (content, extract_fields(content, response)),
        (None, Some(response)) => (response, parse_model_response(response)?),
        (Some(content), None) => (content, extract_with_patterns(content, kind.as_str())),
        (None, None) => {
            return Err(ExtractionError::NothingToExtract(upload.file_name.clone()));
        }
    };

    Ok(ProcessedDocument::new(upload.file_name.as_str(), shown, fields))
}

/// Processes every upload, logging and skipping the ones that fail.
pub fn process_uploads(uploads: &[DocumentUpload]) -> Vec<ProcessedDocument> {
    uploads
        .iter()
        .filter_map(|upload| match process_upload(upload) {
            Ok(document) => {
                info!(
                    file = %document.file_name,
                    kind = %document.kind,
                    summary = %document.fields.summary,
                    "processed document"
                );
                debug!(file = %document.file_name, preview = %document.preview);
                Some(document)
            }
            Err(error) => {
                warn!(file = %upload.file_name, %error, "skipping document");
                None
            }
        })
        .collect()
}

/// Merges every document's mappings into one [`IncomeInputs`]. Documents are
/// applied in order and a later document's value replaces an earlier one for
/// the same key.
///
/// # Errors
///
/// [`ExtractionError::NoDocuments`] when `documents` is empty.
pub fn aggregate<'a, I>(documents: I) -> Result<IncomeInputs, ExtractionError>
where
    I: IntoIterator<Item = &'a ExtractedFields>,
{
    let mut inputs = IncomeInputs::default();
    let mut count = 0usize;

    for fields in documents {
        merge_into(&mut inputs.salary_components, &fields.salary_components);
        merge_into(&mut inputs.other_income, &fields.other_income);
        merge_into(&mut inputs.deductions, &fields.deductions);
        count += 1;
    }

    if count == 0 {
        return Err(ExtractionError::NoDocuments);
    }

    debug!(documents = count, "aggregated extracted documents");
    Ok(inputs)
}

fn merge_into(
    target: &mut AmountMap,
    source: &AmountMap,
) {
    for (key, amount) in source {
        target.insert(key.clone(), *amount);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn fields(
        salary: &[(&str, rust_decimal::Decimal)],
        deductions: &[(&str, rust_decimal::Decimal)],
    ) -> ExtractedFields {
        ExtractedFields {
            salary_components: salary.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            other_income: AmountMap::new(),
            deductions: deductions.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            summary: String::new(),
        }
    }

    // =========================================================================
    // DocumentKind tests
    // =========================================================================

    #[test]
    fn classifies_by_keyword() {
        let cases = [
            ("salary_april.pdf", DocumentKind::SalarySlip),
            ("PAYSLIP-05.png", DocumentKind::SalarySlip),
            ("form 16.pdf", DocumentKind::Form16),
            ("Form16_2025.pdf", DocumentKind::Form16),
            ("lic_receipt.jpg", DocumentKind::Receipt),
            ("hospital bill.pdf", DocumentKind::Receipt),
            ("elss statement.pdf", DocumentKind::InvestmentStatement),
            ("mf_portfolio.txt", DocumentKind::InvestmentStatement),
            ("IMG_0042.jpeg", DocumentKind::FinancialDocument),
        ];

        for (name, expected) in cases {
            assert_eq!(DocumentKind::from_file_name(name), expected, "{name}");
        }
    }

    #[test]
    fn salary_keyword_wins_over_later_checks() {
        assert_eq!(
            DocumentKind::from_file_name("salary statement.pdf"),
            DocumentKind::SalarySlip
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(DocumentKind::Form16.to_string(), "Form 16");
    }

    // =========================================================================
    // upload filter tests
    // =========================================================================

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_upload("a.pdf"));
        assert!(is_supported_upload("B.JPG"));
        assert!(is_supported_upload("notes.txt"));
    }

    #[test]
    fn unsupported_or_missing_extension() {
        assert!(!is_supported_upload("sheet.xlsx"));
        assert!(!is_supported_upload("README"));
        assert!(!is_supported_upload("archive.pdf.zip"));
    }

    // =========================================================================
    // preview tests
    // =========================================================================

    #[test]
    fn short_content_is_unchanged() {
        assert_eq!(preview("Basic 50,000"), "Basic 50,000");
    }

    #[test]
    fn exactly_limit_is_not_truncated() {
        let content = "x".repeat(PREVIEW_CHARS);

        assert_eq!(preview(&content), content);
    }

    #[test]
    fn long_content_is_truncated_on_char_boundary() {
        let content = "₹".repeat(PREVIEW_CHARS + 5);

        let shown = preview(&content);

        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }

    // =========================================================================
    // aggregate tests
    // =========================================================================

    #[test]
    fn aggregate_requires_documents() {
        let none: Vec<ExtractedFields> = Vec::new();

        assert!(matches!(aggregate(&none), Err(ExtractionError::NoDocuments)));
    }

    #[test]
    fn aggregate_merges_disjoint_keys() {
        let docs = vec![
            fields(&[("basic", dec!(600000))], &[]),
            fields(&[("hra", dec!(200000))], &[("80c", dec!(150000))]),
        ];

        let inputs = aggregate(&docs).unwrap();

        assert_eq!(inputs.total_salary().unwrap(), dec!(800000));
        assert_eq!(inputs.deductions["80c"], dec!(150000));
    }

    #[test]
    fn aggregate_later_document_overwrites() {
        let docs = vec![
            fields(&[("basic", dec!(50000))], &[]),
            fields(&[("basic", dec!(600000))], &[]),
        ];

        let inputs = aggregate(&docs).unwrap();

        assert_eq!(inputs.salary_components["basic"], dec!(600000));
    }

    // =========================================================================
    // process_upload tests
    // =========================================================================

    fn upload(
        file_name: &str,
        content: Option<&str>,
        model_response: Option<&str>,
    ) -> DocumentUpload {
        DocumentUpload {
            file_name: file_name.to_string(),
            content: content.map(str::to_string),
            model_response: model_response.map(str::to_string),
        }
    }

    #[test]
    fn processed_document_classifies_itself() {
        let doc = ProcessedDocument::new("Form 16.pdf", "", ExtractedFields::default());

        assert_eq!(doc.kind, DocumentKind::Form16);
    }

    #[test]
    fn response_only_upload_is_parsed() {
        let doc = process_upload(&upload(
            "form16.pdf",
            None,
            Some(r#"{"deductions": {"80c": 150000}, "summary": "Form 16"}"#),
        ))
        .unwrap();

        assert_eq!(doc.fields.deductions["80c"], dec!(150000));
        assert_eq!(doc.fields.summary, "Form 16");
    }

    #[test]
    fn response_only_upload_propagates_parse_error() {
        let result = process_upload(&upload("form16.pdf", None, Some("no data here")));

        assert!(matches!(result, Err(ExtractionError::NoJsonObject)));
    }

    #[test]
    fn bad_response_with_text_falls_back_to_patterns() {
        let doc = process_upload(&upload(
            "payslip.txt",
            Some("Basic 6,00,000"),
            Some("Sorry, I cannot read this."),
        ))
        .unwrap();

        assert_eq!(doc.fields.salary_components["basic"], dec!(600000));
        assert_eq!(doc.preview, "Basic 6,00,000");
    }

    #[test]
    fn text_only_upload_uses_kind_as_summary() {
        let doc = process_upload(&upload("lic_receipt.txt", Some("LIC premium 24,000"), None))
            .unwrap();

        assert_eq!(doc.fields.deductions["lic"], dec!(24000));
        assert_eq!(doc.fields.summary, "Receipt");
    }

    #[test]
    fn empty_upload_is_an_error() {
        let result = process_upload(&upload("scan.png", None, None));

        assert!(matches!(result, Err(ExtractionError::NothingToExtract(name)) if name == "scan.png"));
    }

    #[test]
    fn process_uploads_skips_failures() {
        let uploads = [
            upload("broken.pdf", None, Some("{not json")),
            upload("payslip.pdf", None, Some(r#"{"salary_components": {"basic": 700000}}"#)),
        ];

        let processed = process_uploads(&uploads);

        assert_eq!(processed.len(), 1);
        assert_eq!(processed[0].file_name, "payslip.pdf");
        assert_eq!(processed[0].kind, DocumentKind::SalarySlip);
    }
}
