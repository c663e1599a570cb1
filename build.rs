use anyhow::Result;
use fs_extra::{copy_items, dir::CopyOptions};
use std::{env, path::PathBuf};

/// Copy `assets/` (model, backgrounds, optional `logo.json`) next to the build output.
fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/*");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.exists() {
        println!("cargo:warning=no assets/ directory, the logo will load nothing locally");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    copy_items(&[assets], out_dir, &options)?;
    Ok(())
}
