//! Components shared by content definitions.
//!
//! JSON definitions are composed of optional components. Only
//! [`DefinitionComponent`] is mandatory; everything else is merged
//! component-by-component when a later module overrides a definition.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity and presentation of a definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefinitionComponent {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
}

impl DefinitionComponent {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
        }
    }

    /// Takes each presentation field from `incoming` only when it is set.
    ///
    /// An override file that omits `display_name` or `description` keeps the
    /// existing text; the id never changes.
    pub(crate) fn merge(&mut self, incoming: DefinitionComponent) {
        if !incoming.display_name.is_empty() {
            self.display_name = incoming.display_name;
        }
        if !incoming.description.is_empty() {
            self.description = incoming.description;
        }
    }
}

/// Free-form components keyed by name, for data no built-in component covers.
pub type CustomComponents = Map<String, Value>;

/// Overlays `incoming` onto `existing` key by key.
pub(crate) fn merge_custom(existing: &mut CustomComponents, incoming: CustomComponents) {
    for (key, value) in incoming {
        existing.insert(key, value);
    }
}

/// Replaces `existing` only if `incoming` is present.
pub(crate) fn merge_component<T>(existing: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *existing = incoming;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_components_merge_per_key() {
        let mut existing = json!({"glow": 1, "sound": "hum"})
            .as_object()
            .cloned()
            .unwrap();
        let incoming = json!({"glow": 3, "tint": "red"}).as_object().cloned().unwrap();
        merge_custom(&mut existing, incoming);

        assert_eq!(existing["glow"], 3);
        assert_eq!(existing["sound"], "hum");
        assert_eq!(existing["tint"], "red");
    }

    #[test]
    fn definition_merge_keeps_unset_text() {
        let mut existing = DefinitionComponent::new("lamp", "Lamp");
        existing.description = "Lights the way.".to_owned();

        existing.merge(DefinitionComponent::new("lamp", ""));
        assert_eq!(existing.display_name, "Lamp");
        assert_eq!(existing.description, "Lights the way.");

        existing.merge(DefinitionComponent::new("lamp", "Oil Lamp"));
        assert_eq!(existing.display_name, "Oil Lamp");
        assert_eq!(existing.description, "Lights the way.");
    }

    #[test]
    fn absent_component_keeps_existing() {
        let mut existing = Some(1);
        merge_component(&mut existing, None);
        assert_eq!(existing, Some(1));
        merge_component(&mut existing, Some(2));
        assert_eq!(existing, Some(2));
    }
}
