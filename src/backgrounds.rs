//! Background image uploads
//!
//! The settings panel uploads custom backgrounds as data URLs. Images are
//! written under `www/mirage_backgrounds/` in the host config directory,
//! which the host serves at `/local/`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Web-servable directory under the host config dir
pub const WWW_DIR: &str = "www";
/// Directory under [`WWW_DIR`] holding uploaded backgrounds
pub const BACKGROUNDS_DIR: &str = "mirage_backgrounds";
/// URL prefix the host serves [`WWW_DIR`] under
pub const PUBLIC_URL_PREFIX: &str = "/local";

/// Error type for uploads
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("file data is not a data URL")]
    MissingPayload,
    #[error("invalid base64 data: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("invalid file name: {0:?}")]
    InvalidFileName(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where uploaded backgrounds are written
pub fn backgrounds_dir(ha_config_dir: &Path) -> PathBuf {
    ha_config_dir.join(WWW_DIR).join(BACKGROUNDS_DIR)
}

/// Public URL of an uploaded background
pub fn public_url(file_name: &str) -> String {
    format!("{}/{}/{}", PUBLIC_URL_PREFIX, BACKGROUNDS_DIR, file_name)
}

/// Decode the base64 payload of a data URL (`data:<mime>;base64,<payload>`).
///
/// Everything after the first comma is the payload.
pub fn decode_data_url(file_data: &str) -> Result<Vec<u8>, UploadError> {
    let (_, payload) = file_data
        .split_once(',')
        .ok_or(UploadError::MissingPayload)?;
    Ok(STANDARD.decode(payload.trim())?)
}

/// Reject names that would escape the backgrounds directory.
fn check_file_name(file_name: &str) -> Result<(), UploadError> {
    let mut components = Path::new(file_name).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    );
    if file_name.is_empty() || !is_plain || file_name.contains(['/', '\\']) {
        return Err(UploadError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Save an uploaded background and return its public URL.
pub fn save_background(
    ha_config_dir: &Path,
    file_name: &str,
    file_data: &str,
) -> Result<String, UploadError> {
    check_file_name(file_name)?;
    let bytes = decode_data_url(file_data)?;

    let dir = backgrounds_dir(ha_config_dir);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(file_name), bytes)?;

    let url = public_url(file_name);
    log::info!("Background image saved to {}", url);
    Ok(url)
}

/// Delete every uploaded background.
///
/// Returns `false` if there was nothing to remove.
pub fn remove_backgrounds(ha_config_dir: &Path) -> Result<bool, UploadError> {
    let dir = backgrounds_dir(ha_config_dir);
    if !dir.is_dir() {
        return Ok(false);
    }
    fs::remove_dir_all(&dir)?;
    log::debug!("Removed background image directory: {}", dir.display());
    Ok(true)
}
