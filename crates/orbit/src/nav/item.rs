use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemId(String);

crate::impl_string_newtype!(ItemId);

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: ItemId,
    pub label: String,
    pub href: String,
    pub position: usize,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub external: bool,
}

impl NavigationItem {
    pub fn new(
        id: impl Into<ItemId>,
        label: impl Into<String>,
        href: impl Into<String>,
        position: usize,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            href: href.into(),
            position,
            disabled: false,
            external: false,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn is_selectable(&self) -> bool {
        !self.disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_flags_default_to_false() {
        let item: NavigationItem = serde_json::from_str(
            r##"{"id":"about","label":"About","href":"#about","position":1}"##,
        )
        .unwrap();

        assert_eq!(item.id, ItemId::from("about"));
        assert!(!item.disabled);
        assert!(!item.external);
        assert!(item.is_selectable());
    }

    #[test]
    fn test_item_id_is_transparent() {
        let json = serde_json::to_string(&ItemId::new("contact")).unwrap();
        assert_eq!(json, "\"contact\"");
    }
}
