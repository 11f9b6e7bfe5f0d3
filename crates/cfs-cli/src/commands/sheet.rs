use clap::{Args, ValueEnum};
use tracing::debug;

use cfs_core::dataset::cell::SignPolicy;
use cfs_core::dataset::grid::InputFormat;
use cfs_core::{load_companies, CompanyDataset, LoaderOptions};

use crate::input;

/// Arguments shared by every command that reads a score sheet
#[derive(Args)]
pub struct SheetArgs {
    /// Path to the CFS workbook (xlsx/xls/ods) or CSV/TSV export
    #[arg(long)]
    pub workbook: String,

    /// YAML or JSON file with loader options
    #[arg(long)]
    pub config: Option<String>,

    /// Sheet to read from a workbook
    #[arg(long)]
    pub sheet: Option<String>,

    /// Exact label of the company-name column
    #[arg(long)]
    pub identifier_label: Option<String>,

    /// Keep minus signs in text cells instead of stripping them
    #[arg(long)]
    pub preserve_sign: bool,

    /// Input format (auto-detected by default)
    #[arg(long)]
    pub format: Option<SheetFormat>,

    /// Field delimiter for CSV/TSV input
    #[arg(long)]
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum SheetFormat {
    Auto,
    Xlsx,
    Csv,
}

impl From<SheetFormat> for InputFormat {
    fn from(f: SheetFormat) -> Self {
        match f {
            SheetFormat::Auto => InputFormat::Auto,
            SheetFormat::Xlsx => InputFormat::Xlsx,
            SheetFormat::Csv => InputFormat::Csv,
        }
    }
}

/// Config file first, then flags on top.
pub fn loader_options(args: &SheetArgs) -> Result<LoaderOptions, Box<dyn std::error::Error>> {
    let mut opts: LoaderOptions = match args.config {
        Some(ref path) => input::file::read_config(path)?,
        None => LoaderOptions::default(),
    };

    if let Some(ref sheet) = args.sheet {
        opts.sheet_name = sheet.clone();
    }
    if let Some(ref label) = args.identifier_label {
        opts.identifier_label = label.clone();
    }
    if args.preserve_sign {
        opts.sign_policy = SignPolicy::Preserve;
    }
    if let Some(ref format) = args.format {
        opts.format = format.clone().into();
    }
    if let Some(delimiter) = args.delimiter {
        opts.delimiter = delimiter;
    }
    Ok(opts)
}

/// Load the sheet without failing on loader errors.
///
/// A missing sheet or header row yields an empty dataset plus a warning;
/// only an unreadable path or config is a hard error.
pub fn load_sheet(
    args: &SheetArgs,
) -> Result<(CompanyDataset, Vec<String>), Box<dyn std::error::Error>> {
    let opts = loader_options(args)?;
    let bytes = input::file::read_bytes(&args.workbook)?;
    debug!(path = %args.workbook, bytes = bytes.len(), "read score sheet");

    let outcome = load_companies(&bytes, &opts);
    let mut warnings = Vec::new();
    if let Some(e) = outcome.error {
        warnings.push(format!("No data: {e}"));
    }
    Ok((outcome.dataset, warnings))
}
