use serde::{Deserialize, Serialize};

use crate::api::page::PageConfig;
use crate::api::types::{ElementId, Rect};
use crate::core::elements::{Element, ElementStore, Role};

/// Page manifest describing every element the choreography touches.
/// Sent by the host as JSON at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageManifest {
    #[serde(default)]
    pub elements: Vec<ElementDescriptor>,
    /// Overrides for tuning constants.
    #[serde(default)]
    pub config: Option<PageConfig>,
}

/// One page element. Its id is its index in the manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementDescriptor {
    /// DOM id, used to resolve anchor fragments.
    #[serde(default)]
    pub dom_id: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Layout box in document coordinates.
    #[serde(default)]
    pub rect: Rect,
}

impl PageManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the element store. Element ids are manifest indices.
    pub fn build_store(&self) -> ElementStore {
        let mut store = ElementStore::new();
        for (index, desc) in self.elements.iter().enumerate() {
            let mut element = Element::new(ElementId(index as u32)).with_rect(desc.rect);
            if let Some(dom_id) = &desc.dom_id {
                element = element.with_dom_id(dom_id.clone());
            }
            if let Some(href) = &desc.href {
                element = element.with_href(href.clone());
            }
            for &role in &desc.roles {
                element = element.with_role(role);
            }
            store.insert(element);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_roles_and_config() {
        let json = r##"{
            "elements": [
                { "roles": ["cursor_outer"] },
                { "dom_id": "about", "rect": { "x": 0, "y": 900, "width": 1280, "height": 600 } },
                { "href": "#about", "roles": ["anchor", "hover_trigger"] }
            ],
            "config": { "follower_smoothing": 0.2 }
        }"##;
        let manifest = PageManifest::from_json(json).unwrap();
        assert_eq!(manifest.elements.len(), 3);
        let config = manifest.config.as_ref().unwrap();
        assert!((config.follower_smoothing - 0.2).abs() < 1e-6);
        assert_eq!(config.loading_interval_ms, PageConfig::default().loading_interval_ms);

        let store = manifest.build_store();
        assert_eq!(store.first_with_role(Role::CursorOuter), Some(ElementId(0)));
        assert_eq!(store.find_by_dom_id("about").unwrap().rect.y, 900.0);
        let link = store.get(ElementId(2)).unwrap();
        assert_eq!(link.href.as_deref(), Some("#about"));
        assert!(link.has_role(Role::HoverTrigger));
    }

    #[test]
    fn empty_object_is_empty_page() {
        let manifest = PageManifest::from_json("{}").unwrap();
        assert!(manifest.build_store().is_empty());
        assert!(manifest.config.is_none());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PageManifest::from_json("{ elements: ").is_err());
    }
}
