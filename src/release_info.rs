use std::path::{Path, PathBuf};
use std::{fmt, fs, io};

use serde_json::{Map, Value};

use crate::assets::{self, AssetDto, AssetRule};
use crate::global::{FIELD_ASSETS, FIELD_ASSETS_NEW, FIELD_BODY, FIELD_BODY_MARKDOWN};
use crate::release_notes;

#[derive(Debug)]
pub enum ReleaseInfoError {
    FileSystem {
        path: PathBuf,
        operation: String,
        source: io::Error,
    },

    Parse {
        context: String,
        source: serde_json::Error,
    },

    MissingField {
        field: &'static str,
    },

    Markdown {
        reason: String,
    },
}

impl fmt::Display for ReleaseInfoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseInfoError::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {} on path '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            ReleaseInfoError::Parse { context, source } => {
                write!(f, "Parse error in {}: {}", context, source)
            }
            ReleaseInfoError::MissingField { field } => {
                write!(f, "Release info has no string field '{}'", field)
            }
            ReleaseInfoError::Markdown { reason } => {
                write!(f, "Could not render release notes: {}", reason)
            }
        }
    }
}

impl std::error::Error for ReleaseInfoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReleaseInfoError::FileSystem { source, .. } => Some(source),
            ReleaseInfoError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type ReleaseInfoResult<T> = Result<T, ReleaseInfoError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitSummary {
    pub moved: usize,
    pub total: usize,
}

/// Release metadata as written by the release job.
///
/// Kept as an ordered JSON object: rewritten fields stay where they were and
/// new ones (`bodyMarkdown`, `assetsNew`) are appended.
#[derive(Clone, Debug, PartialEq)]
pub struct ReleaseInfo {
    fields: Map<String, Value>,
}

impl ReleaseInfo {
    pub fn from_json(json: &str, context: &str) -> ReleaseInfoResult<Self> {
        let fields = serde_json::from_str(json).map_err(|source| ReleaseInfoError::Parse {
            context: context.to_string(),
            source,
        })?;
        Ok(ReleaseInfo { fields })
    }

    pub fn to_json(&self) -> ReleaseInfoResult<String> {
        serde_json::to_string(&self.fields).map_err(|source| ReleaseInfoError::Parse {
            context: "release info serialization".to_string(),
            source,
        })
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn body(&self) -> ReleaseInfoResult<&str> {
        self.fields
            .get(FIELD_BODY)
            .and_then(Value::as_str)
            .ok_or(ReleaseInfoError::MissingField { field: FIELD_BODY })
    }

    /// Moves the markdown to `bodyMarkdown` and replaces `body` with quoted HTML.
    pub fn convert_body(&mut self) -> ReleaseInfoResult<()> {
        let markdown = self.body()?.to_string();
        let html = release_notes::convert_body(&markdown)
            .map_err(|reason| ReleaseInfoError::Markdown { reason })?;

        self.fields.insert(FIELD_BODY.to_string(), Value::String(html));
        self.fields
            .insert(FIELD_BODY_MARKDOWN.to_string(), Value::String(markdown));
        Ok(())
    }

    /// Moves assets matching `rule` to `assetsNew`, replacing whatever was there.
    pub fn split_assets(&mut self, rule: &AssetRule) -> ReleaseInfoResult<SplitSummary> {
        let assets_value = self
            .fields
            .get_mut(FIELD_ASSETS)
            .map(Value::take)
            .ok_or(ReleaseInfoError::MissingField {
                field: FIELD_ASSETS,
            })?;
        let assets: Vec<AssetDto> =
            serde_json::from_value(assets_value).map_err(|source| ReleaseInfoError::Parse {
                context: FIELD_ASSETS.to_string(),
                source,
            })?;

        let total = assets.len();
        let (kept, moved) = assets::partition(assets, rule);
        for asset in &moved {
            log::debug!("Moving asset {} to {}", asset.name(), FIELD_ASSETS_NEW);
        }
        let summary = SplitSummary {
            moved: moved.len(),
            total,
        };

        self.fields
            .insert(FIELD_ASSETS.to_string(), Self::assets_to_value(kept)?);
        self.fields
            .insert(FIELD_ASSETS_NEW.to_string(), Self::assets_to_value(moved)?);
        Ok(summary)
    }

    fn assets_to_value(assets: Vec<AssetDto>) -> ReleaseInfoResult<Value> {
        serde_json::to_value(assets).map_err(|source| ReleaseInfoError::Parse {
            context: "asset serialization".to_string(),
            source,
        })
    }
}

pub fn load(path: &Path) -> ReleaseInfoResult<ReleaseInfo> {
    let json = fs::read_to_string(path).map_err(|source| ReleaseInfoError::FileSystem {
        path: path.to_path_buf(),
        operation: "read".to_string(),
        source,
    })?;
    log::debug!("Read {} bytes from {}", json.len(), path.display());
    ReleaseInfo::from_json(&json, &path.display().to_string())
}

pub fn save(path: &Path, info: &ReleaseInfo) -> ReleaseInfoResult<()> {
    let json = info.to_json()?;
    fs::write(path, json.as_str()).map_err(|source| ReleaseInfoError::FileSystem {
        path: path.to_path_buf(),
        operation: "write".to_string(),
        source,
    })?;
    log::debug!("Wrote {} bytes to {}", json.len(), path.display());
    Ok(())
}
