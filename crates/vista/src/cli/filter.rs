//! The `vista filter` command for finding images by keyword.

use clap::Args;
use std::path::PathBuf;
use vista_core::filter_by_keywords;
use vista_core::pipeline::persist::METADATA_DIR;
use vista_core::OutputFormat;

/// Arguments for the `filter` command.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Keywords matched against description and title (case-insensitive)
    #[arg(required = true)]
    pub keywords: Vec<String>,

    /// Dataset directory (defaults to `general.output_dir` from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Metadata CSV to read (defaults to metadata/dataset_metadata.csv)
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Execute the filter command. Prints one matching filename per line.
pub async fn execute(args: FilterArgs) -> anyhow::Result<()> {
    let csv_path = match args.csv {
        Some(path) => path,
        None => super::resolve_output_dir(args.output_dir.as_deref())?
            .join(METADATA_DIR)
            .join(OutputFormat::Csv.metadata_file_name()),
    };

    if !csv_path.exists() {
        tracing::warn!(
            "No metadata CSV at {} (collect with `--format csv` first)",
            csv_path.display()
        );
    }

    let matches = filter_by_keywords(&csv_path, &args.keywords)?;
    tracing::info!("{} image(s) match {:?}", matches.len(), args.keywords);
    for filename in matches {
        println!("{filename}");
    }
    Ok(())
}
