//! Published service identity and search results

use serde::{Deserialize, Serialize};

/// Weak reference to the provider that owns a service.
///
/// Carries just enough to display and rank; the full provider record is
/// looked up platform-side and never owned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRef {
    pub id: String,
    pub name: String,
    #[serde(default = "default_certification")]
    pub certification: String,
}

fn default_certification() -> String {
    "none".to_string()
}

/// A published service, immutable once listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ordered trust tier; higher means more vetted.
    #[serde(default)]
    pub certification_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderRef>,
}

impl Service {
    /// Case-insensitive match against name, description, and tags.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        self.name.to_lowercase().contains(&keyword)
            || self.description.to_lowercase().contains(&keyword)
            || self
                .tags
                .iter()
                .any(|t| t.to_lowercase().contains(&keyword))
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    /// Total matches across all pages.
    pub total: usize,
    /// Services on this page, in ranking order.
    #[serde(default)]
    pub list: Vec<Service>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tea_shop() -> Service {
        Service {
            id: "tea_1".into(),
            name: "示例奶茶店".into(),
            service_type: "food_delivery".into(),
            description: "奶茶、果茶外送".into(),
            tags: vec!["milk-tea".into(), "delivery".into()],
            certification_level: 2,
            provider: None,
        }
    }

    #[test]
    fn test_keyword_matches_name_and_tags() {
        let svc = tea_shop();
        assert!(svc.matches_keyword("奶茶"));
        assert!(svc.matches_keyword("Milk-Tea"));
        assert!(!svc.matches_keyword("pizza"));
    }

    #[test]
    fn test_provider_ref_default_certification() {
        let p: ProviderRef = serde_json::from_str(r#"{"id":"p1","name":"Acme"}"#).unwrap();
        assert_eq!(p.certification, "none");
    }
}
