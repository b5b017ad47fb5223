use serde_json::{Map, Value};

use crate::global::FIELD_NAME;

/// A release asset. Only `name` is interpreted, every field is carried through
/// as-is and in input order.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(
    try_from = "serde_json::Map<String, serde_json::Value>",
    into = "serde_json::Map<String, serde_json::Value>"
)]
pub struct AssetDto {
    fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for AssetDto {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        match fields.get(FIELD_NAME) {
            Some(Value::String(_)) => Ok(AssetDto { fields }),
            Some(other) => Err(format!("asset `{FIELD_NAME}` must be a string, got {other}")),
            None => Err(format!("asset has no `{FIELD_NAME}` field")),
        }
    }
}

impl From<AssetDto> for Map<String, Value> {
    fn from(asset: AssetDto) -> Self {
        asset.fields
    }
}

impl AssetDto {
    pub fn name(&self) -> &str {
        self.fields
            .get(FIELD_NAME)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        let mut fields = Map::new();
        fields.insert(FIELD_NAME.to_string(), Value::from(name));
        AssetDto { fields }
    }
}

/// Decides which assets legacy clients must not see.
///
/// Old clients expect exactly one asset per platform extension, so packages for
/// the newer Linux architectures are listed separately.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetRule {
    pub extension: String,
    pub architectures: Vec<String>,
}

impl Default for AssetRule {
    fn default() -> Self {
        Self {
            extension: crate::global::DEFAULT_ASSET_EXTENSION.to_string(),
            architectures: crate::global::DEFAULT_LEGACY_ARCHITECTURES
                .iter()
                .map(|arch| arch.to_string())
                .collect(),
        }
    }
}

impl AssetRule {
    /// plain substring test on the file name
    pub fn matches(&self, name: &str) -> bool {
        name.contains(self.extension.as_str())
            && self
                .architectures
                .iter()
                .any(|arch| name.contains(arch.as_str()))
    }
}

/// Stable partition: returns `(kept, moved)`, both in original order.
pub fn partition(assets: Vec<AssetDto>, rule: &AssetRule) -> (Vec<AssetDto>, Vec<AssetDto>) {
    assets
        .into_iter()
        .partition(|asset| !rule.matches(asset.name()))
}
