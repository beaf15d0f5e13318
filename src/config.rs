//! Pager configuration loaded from YAML or JSON
//!
//! Only the numeric settings live here; loaders are bound in code. Unset
//! fields keep the pager defaults.
//!
//! ```yaml
//! page_size: 50
//! total: 1200
//! start_offset: 100
//! ```

use crate::error::{Error, Result};
use crate::pagination::PagerOption;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Numeric pager settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PagerConfig {
    /// Offset of the first fetch
    #[serde(default, alias = "start", skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<i64>,

    /// Elements requested per fetch
    #[serde(default, alias = "limit", skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,

    /// Total element count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl PagerConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start offset
    #[must_use]
    pub fn with_start_offset(mut self, offset: i64) -> Self {
        self.start_offset = Some(offset);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, size: i64) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Set the total
    #[must_use]
    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }

    /// Parse from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str(&std::fs::read_to_string(path)?),
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?),
            _ => Err(Error::unsupported_format(path.display().to_string())),
        }
    }

    /// The options this config sets, in a fixed order
    ///
    /// Values are not checked here; [`Pager::new`](crate::Pager::new) does that.
    pub fn options<T>(&self) -> Vec<PagerOption<T>> {
        let mut options = Vec::with_capacity(3);
        if let Some(offset) = self.start_offset {
            options.push(PagerOption::StartOffset(offset));
        }
        if let Some(size) = self.page_size {
            options.push(PagerOption::PageSize(size));
        }
        if let Some(total) = self.total {
            options.push(PagerOption::Total(total));
        }
        options
    }
}
