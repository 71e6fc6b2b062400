//! Export entry points: assemble, resolve, encode, write.

use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use crate::build::{build_document, ExportContext, ExportSettings, SceneData};
use crate::encode::encode;
use crate::scene::resolve;
use crate::util::Result;

/// Export a scene to an in-memory payload in the selected format.
///
/// Assembles the document in one call tree, runs the resolver once, then
/// encodes. Pure and deterministic: identical inputs yield identical
/// bytes.
pub fn export_scene(scene: &SceneData, settings: &ExportSettings) -> Result<String> {
    info!(file = %settings.filename, format = %settings.format, "starting export");
    let start = std::time::Instant::now();

    let mut ctx = ExportContext::new(settings.clone());
    let mut doc = build_document(scene, &mut ctx)?;
    resolve(&mut doc)?;
    let payload = encode(&doc, settings.format)?;

    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        bytes = payload.len(),
        "finished export"
    );
    Ok(payload)
}

/// Write an encoded payload to disk, gzip-compressed on request.
///
/// Failures surface as errors; the write is not retried.
pub fn write_file(payload: &str, path: impl AsRef<Path>, compress: bool) -> Result<()> {
    if compress {
        let file = std::fs::File::create(path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(payload.as_bytes())?;
        encoder.finish()?;
    } else {
        std::fs::write(path, payload)?;
    }
    Ok(())
}

/// Export a scene straight to a file.
pub fn save(scene: &SceneData, settings: &ExportSettings, path: impl AsRef<Path>) -> Result<()> {
    let payload = export_scene(scene, settings)?;
    write_file(&payload, path, settings.compress)
}
