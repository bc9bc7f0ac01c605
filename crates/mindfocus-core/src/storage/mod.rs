mod config;

pub use config::Config;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the directory holding `config.toml`.
///
/// `MINDFOCUS_CONFIG_DIR` overrides the location outright. Otherwise this is
/// `~/.config/mindfocus[-dev]/`, with the `-dev` suffix selected by
/// `MINDFOCUS_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MINDFOCUS_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MINDFOCUS_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("mindfocus-dev")
            } else {
                base_dir.join("mindfocus")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
