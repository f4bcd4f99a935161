//! Show session information.

use std::path::PathBuf;

use snaplapse_build_engine::scanner::count_frames;
use snaplapse_build_engine::Session;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let session = Session::new(path);

    println!("Session: {}", session.dir().display());

    let frames = count_frames(session.dir())
        .map_err(|e| anyhow::anyhow!("Failed to scan session: {e}"))?;
    println!("  Frames: {frames}");
    println!("  Input pattern: {}", session.frame_pattern().display());

    let output = session.output_path();
    println!(
        "  Artifact: {} ({})",
        output.display(),
        if output.exists() { "present" } else { "not built" }
    );

    Ok(())
}
