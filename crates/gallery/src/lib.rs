//! Snaplapse Gallery
//!
//! The storage collaborator boundary: a completed artifact is handed to
//! an authorization-gated gateway that persists it and files it under a
//! named album. Export failures never invalidate or delete the
//! underlying artifact; it stays on local storage either way.

pub mod fs;

use std::path::Path;

use snaplapse_common::error::{SnapError, SnapResult};

pub use fs::FsGallery;

/// External persistent-storage collaborator.
///
/// Implementations require an explicit authorization grant before any
/// write operation.
pub trait StorageGateway {
    /// Request authorization to write to the gallery.
    fn request_authorization(&self) -> bool;

    /// Persist a file as a new asset; returns the asset identifier.
    fn save_asset(&self, artifact: &Path) -> SnapResult<String>;

    /// Look up an album by name, creating it if it does not exist;
    /// returns the album identifier.
    fn find_or_create_album(&self, name: &str) -> SnapResult<String>;

    /// Append an existing asset to an album.
    fn append_to_album(&self, album: &str, asset: &str) -> SnapResult<()>;
}

/// Export a completed artifact to the gallery.
///
/// If the authorization grant is denied the export fails with a
/// permission error and the artifact is left untouched on local
/// storage. A named album that does not yet exist is created and the
/// artifact becomes its first member; otherwise the artifact is
/// appended.
pub fn export_artifact(
    gateway: &dyn StorageGateway,
    artifact: &Path,
    album: &str,
) -> SnapResult<()> {
    if !artifact.exists() {
        return Err(SnapError::FileNotFound {
            path: artifact.to_path_buf(),
        });
    }

    if !gateway.request_authorization() {
        return Err(SnapError::permission_denied(format!(
            "Gallery access not granted; artifact remains at {}",
            artifact.display()
        )));
    }

    let asset = gateway.save_asset(artifact)?;
    let album_id = gateway.find_or_create_album(album)?;
    gateway.append_to_album(&album_id, &asset)?;

    tracing::info!(
        artifact = %artifact.display(),
        album = %album_id,
        asset = %asset,
        "Artifact exported to gallery"
    );
    Ok(())
}
