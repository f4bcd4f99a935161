//! Export an artifact to the gallery.

use std::path::PathBuf;

use snaplapse_common::config::AppConfig;
use snaplapse_gallery::{export_artifact, FsGallery};

pub fn run(path: PathBuf, album: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let album = album.unwrap_or_else(|| config.build.album.clone());
    let gallery = FsGallery::new(&config.gallery_dir);

    println!("Exporting: {}", path.display());
    println!("  Album: {album}");

    export_artifact(&gallery, &path, &album)?;

    println!("Export complete: {}", gallery.root().display());
    Ok(())
}
