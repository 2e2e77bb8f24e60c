//! Credential storage for the client library configuration
//!
//! The engine reads and replaces credential fields through the
//! `CredentialStore` trait. `FileCredentialStore` backs it with a TOML file:
//!
//! ```toml
//! client_id = "123-abc.apps.googleusercontent.com"
//! client_secret = "..."
//! developer_token = "..."
//! login_customer_id = "1234567890"   # optional
//! refresh_token = "1//0g..."
//! ```
//!
//! Writes replace one whole field, go through an atomic temp-file + rename,
//! and keep every other key of the file untouched.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

/// A named credential in the client library configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialField {
    ClientId,
    ClientSecret,
    DeveloperToken,
    /// Read-only for the doctor
    LoginCustomerId,
    RefreshToken,
}

impl CredentialField {
    pub const ALL: [CredentialField; 5] = [
        Self::ClientId,
        Self::ClientSecret,
        Self::DeveloperToken,
        Self::LoginCustomerId,
        Self::RefreshToken,
    ];

    /// Key used in the configuration file.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ClientId => "client_id",
            Self::ClientSecret => "client_secret",
            Self::DeveloperToken => "developer_token",
            Self::LoginCustomerId => "login_customer_id",
            Self::RefreshToken => "refresh_token",
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Self::LoginCustomerId)
    }
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read/replace access to persisted credentials.
pub trait CredentialStore {
    /// Current value of `field`. Absent and blank values are both `None`.
    fn get(&self, field: CredentialField) -> Option<String>;

    /// Replace `field` with `value` and persist it.
    fn replace(&mut self, field: CredentialField, value: &str) -> Result<()> {
        self.replace_many(&[(field, value)])
    }

    /// Replace several fields in one write. Either every field is persisted
    /// or none is, and the in-memory view only changes once the write has
    /// succeeded.
    fn replace_many(&mut self, updates: &[(CredentialField, &str)]) -> Result<()>;

    /// Where the credentials live, for operator messages.
    fn location(&self) -> String;
}

/// TOML-file backed credential store.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    table: toml::Table,
}

impl FileCredentialStore {
    /// Load credentials from `path`. A missing file is an error: the doctor
    /// diagnoses an existing configuration, it never creates one.
    pub fn load(path: PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::StoreIo(format!("reading {}: {e}", path.display()))
        })?;
        let table: toml::Table = toml::from_str(&contents).map_err(|e| {
            Error::StoreParse(format!("parsing {}: {e}", path.display()))
        })?;

        let present = CredentialField::ALL
            .iter()
            .filter(|field| table.contains_key(field.key()))
            .count();
        info!(path = %path.display(), fields = present, "loaded client library configuration");

        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, field: CredentialField) -> Option<String> {
        let value = match self.table.get(field.key())? {
            toml::Value::String(s) => s.trim().to_owned(),
            toml::Value::Integer(n) => n.to_string(),
            _ => return None,
        };
        (!value.is_empty()).then_some(value)
    }

    fn replace_many(&mut self, updates: &[(CredentialField, &str)]) -> Result<()> {
        if let Some((field, _)) = updates.iter().find(|(field, _)| !field.is_writable()) {
            return Err(Error::ReadOnlyField(field.key()));
        }

        let mut updated = self.table.clone();
        for (field, value) in updates {
            updated.insert(field.key().to_owned(), toml::Value::String((*value).to_owned()));
        }
        write_atomic(&self.path, &updated)?;
        self.table = updated;

        for (field, _) in updates {
            info!(path = %self.path.display(), field = field.key(), "replaced credential");
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write the table atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. Sets file permissions to 0600 since the file holds the
/// client secret and refresh token.
fn write_atomic(path: &Path, table: &toml::Table) -> Result<()> {
    let contents = toml::to_string_pretty(table)
        .map_err(|e| Error::StoreParse(format!("serializing credentials: {e}")))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp_path = dir.join(format!(".oauth-doctor.tmp.{}", std::process::id()));

    std::fs::write(&tmp_path, contents.as_bytes())
        .map_err(|e| Error::StoreIo(format!("writing temp credential file: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&tmp_path, perms)
            .map_err(|e| Error::StoreIo(format!("setting credential file permissions: {e}")))?;
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(Error::StoreIo(format!("renaming temp credential file: {e}")));
    }

    debug!(path = %path.display(), "persisted credentials");
    Ok(())
}
