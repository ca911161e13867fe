//! The `vista template` command for writing the annotation scaffold.

use clap::Args;
use std::path::PathBuf;
use vista_core::pipeline::persist::ANNOTATIONS_DIR;
use vista_core::write_annotation_template;

/// Arguments for the `template` command.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Dataset directory (defaults to `general.output_dir` from config)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Execute the template command.
pub async fn execute(args: TemplateArgs) -> anyhow::Result<()> {
    let output_dir = super::resolve_output_dir(args.output_dir.as_deref())?;
    let path = write_annotation_template(&output_dir.join(ANNOTATIONS_DIR))?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_template_lands_under_annotations() {
        let dir = tempfile::tempdir().unwrap();
        execute(TemplateArgs {
            output_dir: Some(dir.path().to_path_buf()),
        })
        .await
        .unwrap();

        assert!(dir
            .path()
            .join("annotations")
            .join("annotation_template.csv")
            .is_file());
    }
}
