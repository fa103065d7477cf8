use serde_json::Value;

use crate::types::{CmsPage, CmsPageId, CmsStatus};

use super::{coerce_optional_string, coerce_string, field, is_record, list};

/// Normalize a CMS page. A null page (unknown slug) yields `None`.
#[must_use]
pub fn normalize_cms_page(value: &Value) -> Option<CmsPage> {
    is_record(value).then(|| CmsPage {
        id: CmsPageId::from(coerce_string(field(value, "id"))),
        slug: coerce_string(field(value, "slug")),
        title: coerce_string(field(value, "title")),
        excerpt: coerce_optional_string(field(value, "excerpt")),
        body: coerce_string(field(value, "body")),
        status: CmsStatus::from_wire(&coerce_string(field(value, "status"))),
        published_at: coerce_optional_string(field(value, "publishedAt")),
        updated_at: coerce_string(field(value, "updatedAt")),
    })
}

/// Normalize a list of CMS pages, skipping entries that are not records.
#[must_use]
pub fn normalize_cms_pages(value: &Value) -> Vec<CmsPage> {
    list(value).iter().filter_map(normalize_cms_page).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_normalize_cms_page() {
        let page = normalize_cms_page(&json!({
            "id": "cms-returns",
            "slug": "returns",
            "title": "Returns",
            "body": "30 days",
            "status": "PUBLISHED"
        }))
        .unwrap_or_default();
        assert_eq!(page.slug, "returns");
        assert!(page.is_visible());
        assert_eq!(page.updated_at, "");
    }

    #[test]
    fn test_null_page() {
        assert!(normalize_cms_page(&Value::Null).is_none());
    }

    #[test]
    fn test_pages_skip_non_records() {
        let pages = normalize_cms_pages(&json!([{"id": "a"}, null, "b"]));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].status, CmsStatus::Draft);
    }
}
