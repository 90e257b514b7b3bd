use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

const SECRET_KEY_BYTES: usize = 64;

/// Reads the signing key persisted at `path`, generating and storing one when absent.
///
/// Failures to persist are logged and the freshly generated key is still returned, so a
/// read-only checkout can boot (tokens then do not survive a restart).
pub(super) fn load_or_create_secret_key(path: &Path) -> String {
    if let Some(existing) = read_key(path) {
        return existing;
    }

    let new_key = generate_secret_key();

    match persist_key(path, &new_key) {
        Ok(()) => new_key,
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            // Another process won the race; use its key.
            read_key(path).unwrap_or(new_key)
        }
        Err(err) => {
            tracing::warn!(error = %err, path = %path.display(), "Failed to persist secret key");
            new_key
        }
    }
}

pub(super) fn default_secret_path() -> PathBuf {
    PathBuf::from(".secret_key")
}

fn read_key(path: &Path) -> Option<String> {
    let value = fs::read_to_string(path).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn persist_key(path: &Path, key: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = fs::OpenOptions::new().write(true).create_new(true).open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        if let Err(err) = file.set_permissions(fs::Permissions::from_mode(0o600)) {
            tracing::warn!(error = %err, path = %path.display(), "Failed to restrict secret key file");
        }
    }

    file.write_all(key.as_bytes())
}

fn generate_secret_key() -> String {
    let mut bytes = [0u8; SECRET_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
