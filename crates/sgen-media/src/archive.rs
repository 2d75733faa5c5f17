//! Zip bundling of rendered shorts.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use sgen_models::RenderedShort;

use crate::error::{MediaError, MediaResult};

/// Deterministic bundle file name.
pub const BUNDLE_FILE_NAME: &str = "shorts_bundle.zip";

/// Package rendered shorts into one zip bundle in `dest_dir`.
///
/// Entries are added in the order given (callers pass shorts already
/// sorted by score), named by their file name. Returns the bundle path.
pub async fn bundle_shorts(
    shorts: &[RenderedShort],
    dest_dir: impl AsRef<Path>,
) -> MediaResult<PathBuf> {
    let bundle_path = dest_dir.as_ref().join(BUNDLE_FILE_NAME);
    let entries: Vec<(String, PathBuf)> = shorts
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let name = s
                .file_name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("short_{}.mp4", i + 1));
            (name, s.file.clone())
        })
        .collect();

    let path = bundle_path.clone();
    tokio::task::spawn_blocking(move || write_bundle(&path, &entries))
        .await
        .map_err(|e| MediaError::archive_failed(e.to_string()))??;

    info!(
        bundle = %bundle_path.display(),
        entries = shorts.len(),
        "Bundle written"
    );

    Ok(bundle_path)
}

fn write_bundle(bundle_path: &Path, entries: &[(String, PathBuf)]) -> MediaResult<()> {
    let file = File::create(bundle_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    for (name, path) in entries {
        if !path.exists() {
            return Err(MediaError::FileNotFound(path.clone()));
        }
        writer.start_file(name.as_str(), options)?;
        let mut input = File::open(path)?;
        io::copy(&mut input, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}
