//! Build a timelapse from a session directory.

use std::path::PathBuf;

use snaplapse_build_engine::{BuildJob, FrameRate, ProgressCallback, Session};
use snaplapse_common::config::AppConfig;
use snaplapse_gallery::{export_artifact, FsGallery};

pub async fn run(
    path: PathBuf,
    fps: Option<String>,
    export: bool,
    album: Option<String>,
) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let rate = match fps {
        Some(ref input) => FrameRate::resolve(Some(input)),
        None => FrameRate::new(config.build.fps),
    };

    println!("Building timelapse from: {}", path.display());
    println!("  Frame rate: {rate} fps");

    let session = Session::new(path);
    let mut job = BuildJob::new(session, rate);

    let progress: ProgressCallback = Box::new(|line| println!("  {line}"));

    match job.run(Some(progress)).await {
        Ok(artifact) => {
            println!("Build complete: {}", artifact.display());

            if export {
                let album = album.unwrap_or_else(|| config.build.album.clone());
                let gallery = FsGallery::new(&config.gallery_dir);
                export_artifact(&gallery, &artifact, &album)?;
                println!("Exported to album '{album}' in {}", gallery.root().display());
            }
            Ok(())
        }
        Err(e) => {
            println!("Build failed: {e}");
            Err(e.into())
        }
    }
}
