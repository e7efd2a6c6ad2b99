// Content record types
// Immutable value records served by the content endpoints

use serde::{Deserialize, Serialize};

/// A service offering shown on the solutions page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Inline SVG markup
    pub icon: String,
    /// Color-name tag used by the front end for theming
    pub color: String,
}

/// A community activity shown on the enrichment page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub image_alt: String,
}

impl Solution {
    pub fn new(id: &str, title: &str, description: &str, icon: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
        }
    }
}

impl Enrichment {
    pub fn new(id: &str, title: &str, description: &str, image_url: &str, image_alt: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: image_url.to_string(),
            image_alt: image_alt.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enrichment_uses_camel_case_fields() {
        let item = Enrichment::new("9", "Chess", "Weekly club", "https://img/x.png", "Board");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["imageUrl"], "https://img/x.png");
        assert_eq!(json["imageAlt"], "Board");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_solution_field_order() {
        let item = Solution::new("1", "T", "D", "<svg/>", "teal");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","title":"T","description":"D","icon":"<svg/>","color":"teal"}"#
        );
    }
}
