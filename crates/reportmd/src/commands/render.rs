//! `reportmd render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use reportmd_renderer::render_markdown;

use crate::config::Config;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown report files to render.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover reportmd.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for resolving relative links and images (overrides config).
    #[arg(short, long)]
    base_url: Option<String>,

    /// Output file for a single input (default: stdout).
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Output directory, one `<stem>.html` per input (overrides config).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Enable verbose output (timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an input cannot be read,
    /// or a rendered fragment cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        if self.inputs.len() > 1 && self.output.is_some() {
            return Err(CliError::Validation(
                "--output accepts a single input file; use --out-dir for batches".to_owned(),
            ));
        }

        // Load config; CLI flags win over file values
        let config = Config::load(self.config.as_deref())?;
        let base_url = self.base_url.or(config.base_url).unwrap_or_default();
        let out_dir = self.out_dir.or(config.out_dir);

        if let Some(dir) = &out_dir {
            std::fs::create_dir_all(dir)?;
        }
        if self.inputs.len() > 1 {
            output.info(&format!("Rendering {} reports", self.inputs.len()));
        }

        for input in &self.inputs {
            let markdown = std::fs::read_to_string(input)?;
            if markdown.trim().is_empty() {
                output.warning(&format!(
                    "{}: no content, rendering placeholder",
                    input.display()
                ));
            }

            let started = Instant::now();
            let html = render_markdown(&markdown, &base_url);
            tracing::debug!(
                input = %input.display(),
                bytes = markdown.len(),
                elapsed = ?started.elapsed(),
                "rendered report"
            );

            match destination(input, self.output.as_deref(), out_dir.as_deref()) {
                Some(path) => {
                    std::fs::write(&path, &html)?;
                    output.success(&format!("{} -> {}", input.display(), path.display()));
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(html.as_bytes())?;
                    stdout.write_all(b"\n")?;
                }
            }
        }

        Ok(())
    }
}

/// Resolve where a rendered fragment is written.
///
/// An explicit `--output` path wins, then an output directory with the
/// input's stem, otherwise stdout (`None`).
fn destination(input: &Path, output: Option<&Path>, out_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = output {
        return Some(path.to_path_buf());
    }
    out_dir.map(|dir| {
        // file_stem keeps interior dots, so run-1.quiz.md maps to
        // run-1.quiz.html
        let stem = input
            .file_stem()
            .map_or_else(|| "report".to_owned(), |s| s.to_string_lossy().into_owned());
        dir.join(format!("{stem}.html"))
    })
}
