//! God-ray demo viewer.
//!
//! Usage: `godrays [preset]`, where `preset` is a TOML file or the name of
//! a preset in `assets/presets/`.

use std::path::{Path, PathBuf};

use godrays::options::Options;
use godrays::Viewer;

const PRESET_DIR: &str = "assets/presets";

/// Resolve a preset argument: an existing file path, or the name of a
/// preset in `assets/presets/`.
fn resolve_preset_path(input: &str) -> Result<PathBuf, String> {
    let path = Path::new(input);
    if path.exists() {
        return Ok(path.to_path_buf());
    }

    let dir = Path::new(PRESET_DIR);
    let named = dir.join(format!("{input}.toml"));
    if named.exists() {
        return Ok(named);
    }

    Err(format!(
        "No preset file or named preset '{input}' (available: {})",
        Options::list_presets(dir).join(", ")
    ))
}

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(arg) => {
            match resolve_preset_path(&arg).and_then(|path| {
                Options::load(&path).map_err(|e| e.to_string())
            }) {
                Ok(options) => options,
                Err(e) => {
                    log::error!("{e}");
                    std::process::exit(1);
                }
            }
        }
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
