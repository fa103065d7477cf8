//! CMS content pages.

use serde::{Deserialize, Serialize};

use super::id::CmsPageId;

/// Publication status of a CMS page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CmsStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl CmsStatus {
    /// Parse the wire representation. Unknown values are treated as `Draft`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "PUBLISHED" => Self::Published,
            "ARCHIVED" => Self::Archived,
            _ => Self::Draft,
        }
    }
}

/// A CMS page (shipping policy, returns, about...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CmsPage {
    pub id: CmsPageId,
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub status: CmsStatus,
    pub published_at: Option<String>,
    pub updated_at: String,
}

impl CmsPage {
    /// Only published pages are shown to customers.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.status == CmsStatus::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_wire() {
        assert_eq!(CmsStatus::from_wire("PUBLISHED"), CmsStatus::Published);
        assert_eq!(CmsStatus::from_wire("archived"), CmsStatus::Archived);
        assert_eq!(CmsStatus::from_wire("LIVE"), CmsStatus::Draft);
    }
}
