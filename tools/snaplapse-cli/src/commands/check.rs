//! Check system capabilities.

use snaplapse_build_engine::command::DEFAULT_ENCODER;
use snaplapse_build_engine::runner::encoder_available;
use snaplapse_common::config::{config_file_path, AppConfig};
use snaplapse_gallery::{FsGallery, StorageGateway};

pub fn run() -> anyhow::Result<()> {
    println!("Snaplapse System Check");
    println!("{}", "=".repeat(50));

    let encoder_ok = encoder_available(DEFAULT_ENCODER);
    if encoder_ok {
        println!("[OK] Encoder: {DEFAULT_ENCODER} found in PATH");
    } else {
        println!("[FAIL] Encoder: {DEFAULT_ENCODER} not found in PATH");
    }

    let config = AppConfig::load();
    println!("[OK] Config: {}", config_file_path().display());

    let gallery = FsGallery::new(&config.gallery_dir);
    if gallery.request_authorization() {
        println!("[OK] Gallery: {} is writable", gallery.root().display());
    } else {
        println!("[FAIL] Gallery: {} is not writable", gallery.root().display());
    }

    println!();
    if encoder_ok {
        println!("All required capabilities are available. Snaplapse is ready.");
    } else {
        println!("Install ffmpeg to enable timelapse builds.");
    }

    Ok(())
}
