//! Settings persistence: load, normalize and save `auth.json`.
//!
//! # Load
//! ```text
//! read file (absent → keep defaults)
//!     → validate (optional, diagnostics only)
//!     → merge document over current values
//!     → resolve device identity
//!     → save back (unless skipped)
//! ```
//!
//! Parse failures are logged and swallowed: the in-memory settings keep the
//! values they had before the failed merge and the file on disk is left alone.
//! An unknown device package is the only hard error a well-formed file can
//! produce.

use std::cell::OnceCell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::model::{AuthConfig, DeviceConfig, ProxyConfig};
use crate::config::schema::{render_schema, settings_schema};
use crate::config::validation::{validate_document, ValidationError};
use crate::device::{resolve_device, DeviceCatalog, DeviceError};
use crate::lifecycle::operator::{Operator, Review, UnattendedOperator};

/// Keys whose unquoted values get a targeted hint on parse failure.
const CREDENTIAL_KEYS: [&str; 4] = ["PtcUsername", "PtcPassword", "GoogleUsername", "GooglePassword"];

/// Error type for settings persistence.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings could not be serialized.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The device block names an unusable profile.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// The operator chose to abort after reviewing validation errors.
    #[error("{file} was rejected after review ({} validation errors)", .errors.len())]
    Rejected {
        file: String,
        errors: Vec<ValidationError>,
    },
}

/// Options for [`AuthSettings::load`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Do not write the normalized document back.
    pub skip_save: bool,
    /// Validate the file against the schema before merging it.
    pub validate: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DocumentRef<'a> {
    auth_config: &'a AuthConfig,
    proxy_config: &'a ProxyConfig,
    device_config: &'a DeviceConfig,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Document {
    auth_config: AuthConfig,
    proxy_config: ProxyConfig,
    device_config: DeviceConfig,
}

/// Credentials, proxy and device settings of one client session.
pub struct AuthSettings {
    pub auth_config: AuthConfig,
    pub proxy_config: ProxyConfig,
    pub device_config: DeviceConfig,
    file_path: Option<PathBuf>,
    schema: OnceCell<Value>,
    catalog: Arc<DeviceCatalog>,
    operator: Arc<dyn Operator>,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("auth_config", &self.auth_config)
            .field("proxy_config", &self.proxy_config)
            .field("device_config", &self.device_config)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSettings {
    /// Settings with every declared default applied.
    pub fn new() -> Self {
        Self {
            auth_config: AuthConfig::default(),
            proxy_config: ProxyConfig::default(),
            device_config: DeviceConfig::default(),
            file_path: None,
            schema: OnceCell::new(),
            catalog: Arc::new(DeviceCatalog::builtin()),
            operator: Arc::new(UnattendedOperator),
        }
    }

    /// Who reviews validation failures. Defaults to [`UnattendedOperator`].
    pub fn with_operator(mut self, operator: Arc<dyn Operator>) -> Self {
        self.operator = operator;
        self
    }

    /// Device profiles used for resolution. Defaults to the built-in tables.
    pub fn with_catalog(mut self, catalog: Arc<DeviceCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Path remembered by the last [`load`](Self::load).
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// The settings schema, built on first use.
    pub fn json_schema(&self) -> &Value {
        self.schema.get_or_init(settings_schema)
    }

    /// Pretty-printed document, every field included.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.document())
    }

    fn document(&self) -> DocumentRef<'_> {
        DocumentRef {
            auth_config: &self.auth_config,
            proxy_config: &self.proxy_config,
            device_config: &self.device_config,
        }
    }

    /// Loads `path` on top of the current values.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Device`] for an unknown device package,
    /// [`SettingsError::Rejected`] when the operator aborts after validation,
    /// [`SettingsError::Io`] when the file exists but cannot be read or the
    /// normalized document cannot be written. Malformed JSON, or a file that
    /// is not UTF-8, is logged and leaves the current values untouched.
    pub fn load(&mut self, path: impl AsRef<Path>, options: LoadOptions) -> Result<(), SettingsError> {
        let path = path.as_ref();
        self.file_path = Some(path.to_path_buf());

        if path.exists() {
            let bytes = fs::read(path).map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let input = match String::from_utf8(bytes) {
                Ok(input) => input,
                Err(e) => {
                    tracing::error!(
                        path = %path.display(),
                        "JSON Exception: {} is not valid UTF-8 ({})",
                        path.display(),
                        e.utf8_error()
                    );
                    return Ok(());
                }
            };

            if options.validate {
                self.review(path, &input)?;
            }

            if let Err(e) = self.merge(&input) {
                tracing::error!(path = %path.display(), "{}", describe_parse_error(&input, &e));
                return Ok(());
            }
        } else {
            tracing::info!(path = %path.display(), "No settings file found, using defaults");
        }

        resolve_device(&mut self.device_config, &self.catalog)?;

        if !options.skip_save {
            self.save_to(path, false)?;
        }
        Ok(())
    }

    /// Document values win; members absent from `input` keep their current value.
    fn merge(&mut self, input: &str) -> Result<(), serde_json::Error> {
        let overlay: Value = serde_json::from_str(input)?;
        let mut merged = serde_json::to_value(self.document())?;
        merge_json(&mut merged, overlay);

        let document: Document = serde_json::from_value(merged)?;
        self.auth_config = document.auth_config;
        self.proxy_config = document.proxy_config;
        self.device_config = document.device_config;
        Ok(())
    }

    /// Writes the document and its companion schema to `path`.
    ///
    /// The schema file is written on every save, whether or not `validate` is set.
    pub fn save_to(&self, path: impl AsRef<Path>, validate: bool) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let output = self.to_json()?;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, &output).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let schema_file = schema_path(path);
        fs::write(&schema_file, render_schema(self.json_schema())?).map_err(|source| {
            SettingsError::Io {
                path: schema_file.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "Settings saved");

        if validate {
            self.review(path, &output)?;
        }
        Ok(())
    }

    /// Saves to the remembered path. Does nothing if nothing was ever loaded.
    pub fn save(&self) -> Result<(), SettingsError> {
        match &self.file_path {
            Some(path) => self.save_to(path, false),
            None => Ok(()),
        }
    }

    /// Logs schema diagnostics for `text` and lets the operator decide.
    fn review(&self, path: &Path, text: &str) -> Result<(), SettingsError> {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("Validating {}...", file);

        // Unparseable text is reported by the merge step.
        let Ok(errors) = validate_document(text, self.json_schema()) else {
            return Ok(());
        };
        if errors.is_empty() {
            return Ok(());
        }

        for error in &errors {
            tracing::error!("{} {}", file, error);
        }
        match self.operator.review_validation(&file, &errors) {
            Review::Continue => Ok(()),
            Review::Abort => Err(SettingsError::Rejected { file, errors }),
        }
    }
}

/// Companion schema path: `dir/auth.json` → `dir/auth.schema.json`.
pub fn schema_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.schema.json", stem))
}

/// Recursively overlays `overlay` onto `base`. Objects merge, everything else replaces.
fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Operator-facing message for a document that failed to parse.
fn describe_parse_error(input: &str, error: &serde_json::Error) -> String {
    if error.is_syntax() || error.is_eof() {
        let line = input.lines().nth(error.line().saturating_sub(1)).unwrap_or_default();
        if let Some(key) = CREDENTIAL_KEYS.iter().find(|k| line.contains(&format!("\"{}\"", k))) {
            return format!(
                "JSON Exception: You need to properly configure your {} using quotations.",
                key
            );
        }
    }
    format!("JSON Exception: {}", error)
}
