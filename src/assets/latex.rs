use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::Context as _;

use crate::foundation::error::{DeckError, DeckResult};

/// Preamble used when `latex()` is called without a header.
pub const DEFAULT_LATEX_HEADER: &str = r"\documentclass[varwidth,border=1pt]{standalone}
\usepackage[utf8]{inputenc}
\usepackage{amsmath}
\usepackage{amsfonts}
\usepackage{amssymb}
\usepackage{graphicx}
\begin{document}";

/// Closing used when `latex()` is called without a tail.
pub const DEFAULT_LATEX_TAIL: &str = r"\end{document}";

/// Typesetting collaborator turning a complete LaTeX document into SVG text.
pub trait LatexRenderer {
    /// Render `document` (header, body and tail already joined).
    fn render(&self, document: &str) -> DeckResult<String>;
}

/// Renders through external `pdflatex` and `pdf2svg` processes.
#[derive(Clone, Debug)]
pub struct CommandLatexRenderer {
    /// Program producing a PDF from the `.tex` file.
    pub latex_program: String,
    /// Program converting the PDF into SVG.
    pub pdf2svg_program: String,
    /// Parent of the per-call working directories.
    pub work_root: PathBuf,
}

impl Default for CommandLatexRenderer {
    fn default() -> Self {
        Self {
            latex_program: "pdflatex".to_string(),
            pdf2svg_program: "pdf2svg".to_string(),
            work_root: std::env::temp_dir(),
        }
    }
}

impl CommandLatexRenderer {
    /// Whether both external programs can be started.
    pub fn is_available(&self) -> bool {
        [&self.latex_program, &self.pdf2svg_program]
            .iter()
            .all(|p| {
                Command::new(p)
                    .arg("--version")
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .is_ok()
            })
    }

    fn work_dir(&self) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        self.work_root
            .join(format!("slidebox_latex_{}_{nanos}", std::process::id()))
    }
}

impl LatexRenderer for CommandLatexRenderer {
    #[tracing::instrument(skip(self, document), fields(len = document.len()))]
    fn render(&self, document: &str) -> DeckResult<String> {
        let dir = self.work_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create latex work dir '{}'", dir.display()))?;
        let result = render_in(self, &dir, document);
        let _ = std::fs::remove_dir_all(&dir);
        result
    }
}

fn render_in(r: &CommandLatexRenderer, dir: &Path, document: &str) -> DeckResult<String> {
    std::fs::write(dir.join("doc.tex"), document)
        .with_context(|| format!("failed to write latex source into '{}'", dir.display()))?;

    run(
        Command::new(&r.latex_program)
            .current_dir(dir)
            .args(["-interaction=nonstopmode", "-halt-on-error", "doc.tex"]),
        &r.latex_program,
    )?;
    run(
        Command::new(&r.pdf2svg_program)
            .current_dir(dir)
            .args(["doc.pdf", "doc.svg"]),
        &r.pdf2svg_program,
    )?;

    std::fs::read_to_string(dir.join("doc.svg"))
        .map_err(|e| DeckError::resource(format!("latex produced no svg output: {e}")))
}

fn run(cmd: &mut Command, program: &str) -> DeckResult<()> {
    tracing::debug!(program, "running external process");
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|e| DeckError::resource(format!("failed to start '{program}': {e}")))?;
    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DeckError::resource(format!(
            "'{program}' exited with status {}: {} {}",
            output.status,
            stdout.trim(),
            stderr.trim()
        )));
    }
    Ok(())
}

/// Join header, body and tail into one document.
pub fn latex_document(body: &str, header: Option<&str>, tail: Option<&str>) -> String {
    [
        header.unwrap_or(DEFAULT_LATEX_HEADER),
        body,
        tail.unwrap_or(DEFAULT_LATEX_TAIL),
    ]
    .join("\n")
}

#[cfg(test)]
#[path = "../../tests/unit/assets/latex.rs"]
mod tests;
