use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use itr_core::{AgeGroup, TaxEngine, TaxpayerProfile};
use itr_data::{
    DocumentUpload, ExtractedFields, aggregate, income_csv, is_supported_upload, load_rules,
    logging, process_uploads, report,
};
use tracing::{info, warn};

/// Compare old- and new-regime income tax for one taxpayer.
///
/// Income can come from any mix of sources; later sources overwrite earlier
/// ones for the same key, in the order CSV, extracted JSON, then documents.
/// A document that cannot be processed is logged and skipped.
///
/// The income CSV has the columns `category,name,amount` where `category` is
/// `salary`, `other_income` or `deduction`.
#[derive(Parser, Debug)]
#[command(name = "itr-calc")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file of income and deduction line items
    #[arg(short, long)]
    income: Option<PathBuf>,

    /// Extractor responses (JSON with salary_components, other_income, deductions)
    #[arg(short, long, num_args = 1..)]
    extracted: Vec<PathBuf>,

    /// Plain-text documents to scan for well-known salary and deduction labels
    #[arg(short, long, num_args = 1..)]
    document: Vec<PathBuf>,

    /// Age group: below_60, senior or super_senior
    #[arg(short, long, default_value = "below_60")]
    age_group: String,

    /// Financial year, used to pick the rebate rule
    #[arg(short, long, default_value = "2025-26")]
    financial_year: String,

    /// TOML rules file; the Budget 2025 tables are used when omitted
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Print the comparison as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// Also append log output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    logging::init_logging(level, args.log_file.as_deref())?;

    let age_group: AgeGroup = args
        .age_group
        .parse()
        .with_context(|| format!("Invalid --age-group: {}", args.age_group))?;
    let profile = TaxpayerProfile::new(age_group, args.financial_year.as_str());

    let rules = load_rules(args.rules.as_deref()).with_context(|| match &args.rules {
        Some(path) => format!("Failed to load rules from: {}", path.display()),
        None => "Failed to build default rules".to_string(),
    })?;
    let engine = TaxEngine::new(rules).context("Rules failed validation")?;

    let sources = collect_sources(&args)?;
    info!(sources = sources.len(), "collected income sources");

    let inputs = aggregate(&sources).context(
        "No valid documents were processed; pass --income, --extracted or --document",
    )?;
    let comparison = engine
        .compute(&inputs, &profile)
        .context("Failed to compute tax")?;

    info!(
        recommended = %comparison.recommended_regime,
        savings = %comparison.savings,
        "comparison complete"
    );

    if args.json {
        let json = serde_json::to_string_pretty(&comparison)
            .context("Failed to serialize comparison")?;
        println!("{json}");
    } else {
        print!("{}", report::Report(&comparison));
    }

    Ok(())
}

fn collect_sources(args: &Args) -> Result<Vec<ExtractedFields>> {
    let mut sources = Vec::new();

    if let Some(path) = &args.income {
        let inputs = income_csv::load_from_file(path)
            .with_context(|| format!("Failed to load income CSV: {}", path.display()))?;
        sources.push(ExtractedFields {
            salary_components: inputs.salary_components,
            other_income: inputs.other_income,
            deductions: inputs.deductions,
            summary: format!("CSV {}", path.display()),
        });
    }

    let uploads = collect_uploads(args)?;
    if !uploads.is_empty() {
        let processed = process_uploads(&uploads);
        info!(
            uploaded = uploads.len(),
            processed = processed.len(),
            "processed documents"
        );
        sources.extend(processed.into_iter().map(|document| document.fields));
    }

    Ok(sources)
}

/// Pairs each `--extracted` response with the `--document` of the same file
/// stem, so a response that fails to parse can fall back to the document text.
fn collect_uploads(args: &Args) -> Result<Vec<DocumentUpload>> {
    let mut uploads = Vec::new();
    let mut paired = vec![false; args.document.len()];

    for path in &args.extracted {
        let response = read(path)?;
        let partner = args
            .document
            .iter()
            .position(|document| document.file_stem() == path.file_stem());

        let upload = match partner {
            Some(index) => {
                paired[index] = true;
                let document = &args.document[index];
                DocumentUpload {
                    file_name: file_name(document),
                    content: read_text_document(document)?,
                    model_response: Some(response),
                }
            }
            None => DocumentUpload {
                file_name: file_name(path),
                content: None,
                model_response: Some(response),
            },
        };
        uploads.push(upload);
    }

    for (path, _) in args
        .document
        .iter()
        .zip(&paired)
        .filter(|(_, paired)| !**paired)
    {
        match read_text_document(path)? {
            Some(content) => uploads.push(DocumentUpload {
                file_name: file_name(path),
                content: Some(content),
                model_response: None,
            }),
            None => warn!(
                file = %path.display(),
                "no readable text and no extractor output; skipping"
            ),
        }
    }

    Ok(uploads)
}

/// Text of a supported `.txt` document; other formats need extractor output.
fn read_text_document(path: &Path) -> Result<Option<String>> {
    let name = file_name(path);
    if !is_supported_upload(&name) {
        warn!(file = %path.display(), "unsupported document type");
        return Ok(None);
    }
    if !name.to_lowercase().ends_with(".txt") {
        return Ok(None);
    }
    read(path).map(Some)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to open: {}", path.display()))
}
