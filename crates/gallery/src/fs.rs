//! Filesystem-backed gallery gateway.

use std::path::{Path, PathBuf};

use snaplapse_common::error::{SnapError, SnapResult};

use crate::StorageGateway;

/// A local gallery rooted at a directory.
///
/// Layout: `assets/` holds one copy of every persisted artifact;
/// `albums/<name>/` holds per-album membership copies. Authorization
/// for a filesystem gallery is the ability to create and write the
/// root.
pub struct FsGallery {
    root: PathBuf,
}

impl FsGallery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Gallery root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    fn albums_dir(&self) -> PathBuf {
        self.root.join("albums")
    }

    /// Derive a collision-resistant asset name from the artifact path.
    ///
    /// Every session produces the same output file name, so the parent
    /// directory name is folded in: `<session>/timelapse.mp4` becomes
    /// `<session>-timelapse.mp4`.
    fn asset_name(artifact: &Path) -> SnapResult<String> {
        let file_name = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| SnapError::export("Artifact path has no file name"))?;

        match artifact
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        {
            Some(parent) => Ok(format!("{parent}-{file_name}")),
            None => Ok(file_name.to_string()),
        }
    }
}

impl StorageGateway for FsGallery {
    fn request_authorization(&self) -> bool {
        std::fs::create_dir_all(&self.root).is_ok()
    }

    fn save_asset(&self, artifact: &Path) -> SnapResult<String> {
        let name = Self::asset_name(artifact)?;
        let assets = self.assets_dir();
        std::fs::create_dir_all(&assets)?;
        std::fs::copy(artifact, assets.join(&name))?;
        tracing::debug!(asset = %name, "Saved gallery asset");
        Ok(name)
    }

    fn find_or_create_album(&self, name: &str) -> SnapResult<String> {
        let album_dir = self.albums_dir().join(name);
        if !album_dir.exists() {
            std::fs::create_dir_all(&album_dir)?;
            tracing::info!(album = %name, "Created gallery album");
        }
        Ok(name.to_string())
    }

    fn append_to_album(&self, album: &str, asset: &str) -> SnapResult<()> {
        let source = self.assets_dir().join(asset);
        if !source.exists() {
            return Err(SnapError::export(format!("Unknown asset '{asset}'")));
        }
        std::fs::copy(&source, self.albums_dir().join(album).join(asset))?;
        Ok(())
    }
}
