use anyhow::Context;
use mpi_core::models::SelectedFile;
use std::path::{Path, PathBuf};

const BAR_WIDTH: usize = 20;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line of upload progress, e.g. `cam_1.mp4  [##########----------]  50%`.
pub fn progress_line(file_name: &str, percent: f64) -> String {
    let percent = percent.clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "{:<32} [{}{}] {:>3.0}%",
        truncate_string(file_name, 32),
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Where to write a matched frame. A directory gets a file named after the result.
pub fn image_output_path(output: &Path, result_id: &str, extension: &str) -> PathBuf {
    if output.is_dir() {
        output.join(format!("match_{}.{}", result_id, extension))
    } else {
        output.to_path_buf()
    }
}

/// Read every footage file of a batch into memory.
///
/// All paths are checked before any file is read, so a typo in the last path fails
/// without first loading the others.
pub fn load_footage(paths: &[PathBuf]) -> anyhow::Result<Vec<SelectedFile>> {
    let mut total: u64 = 0;
    for path in paths {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Video file {} is not readable", path.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("{} is not a file", path.display());
        }
        total += metadata.len();
    }
    tracing::info!(files = paths.len(), total_bytes = total, "Loading footage");

    paths
        .iter()
        .map(|path| {
            SelectedFile::from_path(path)
                .with_context(|| format!("Read video file {}", path.display()))
        })
        .collect()
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
