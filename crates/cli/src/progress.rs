use assetscope_api::ProgressSink;
use std::path::Path;
use tracing::info;

/// Logs one `"{percent}% - {file}"` line per asset.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, path: &str, fraction: f32) {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        info!("{}% - {}", (fraction * 100.0).floor() as u32, name);
    }

    fn finish(&self) {
        info!("Scan finished");
    }
}
