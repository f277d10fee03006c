//! Game state - flags, inventory and reading progress for one session.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::entities::{DocumentData, DocumentId, FlagName, ItemId};

/// Everything the rules know about the player's progress.
///
/// Lives for one session and is wiped by [`GameState::reset`]. Flags are
/// independent of each other: no flag is derived from another here, only
/// rules decide what a combination means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameState {
    /// Boolean world flags. Absent means `false`.
    flags: HashMap<FlagName, bool>,

    /// Held items. Sorted so the inventory lists in a stable order.
    inventory: BTreeSet<ItemId>,

    /// Documents viewable from the inventory, keyed by item.
    item_documents: HashMap<ItemId, DocumentData>,

    /// Documents the player has opened at least once.
    read_documents: HashSet<DocumentId>,

    /// What was typed into the keypad on the last submission.
    last_keypad_entry: String,
}

impl GameState {
    /// Create a fresh game state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a flag. Blank names are ignored.
    pub fn set_flag(&mut self, name: impl AsRef<str>, value: bool) {
        if let Some(key) = FlagName::parse(name.as_ref()) {
            self.flags.insert(key, value);
        }
    }

    /// Read a flag. Unknown names are `false`.
    pub fn flag(&self, name: impl AsRef<str>) -> bool {
        FlagName::parse(name.as_ref())
            .and_then(|key| self.flags.get(&key).copied())
            .unwrap_or(false)
    }

    /// Add an item, optionally with a document to view it later.
    ///
    /// Returns `true` if the item was not held before. Re-adding without a
    /// document keeps the previously attached one.
    pub fn add_item(&mut self, item: &str, document: Option<DocumentData>) -> bool {
        let Some(key) = ItemId::parse(item) else {
            return false;
        };
        if let Some(doc) = document {
            self.item_documents.insert(key.clone(), doc);
        }
        self.inventory.insert(key)
    }

    /// Remove an item and its document. Returns `true` if it was held.
    pub fn remove_item(&mut self, item: &str) -> bool {
        let Some(key) = ItemId::parse(item) else {
            return false;
        };
        self.item_documents.remove(&key);
        self.inventory.remove(&key)
    }

    /// Check whether an item is held.
    pub fn has_item(&self, item: &str) -> bool {
        ItemId::parse(item)
            .map(|key| self.inventory.contains(&key))
            .unwrap_or(false)
    }

    /// The document attached to a held item, if any.
    pub fn item_document(&self, item: &str) -> Option<&DocumentData> {
        ItemId::parse(item).and_then(|key| self.item_documents.get(&key))
    }

    /// Held item names in display form.
    pub fn inventory(&self) -> impl Iterator<Item = &str> {
        self.inventory.iter().map(|key| key.as_str())
    }

    /// Number of held items.
    pub fn inventory_len(&self) -> usize {
        self.inventory.len()
    }

    /// Record that a document has been read.
    pub fn mark_read(&mut self, document: &str) {
        if let Some(key) = DocumentId::parse(document) {
            self.read_documents.insert(key);
        }
    }

    /// Check whether a document has been read.
    pub fn has_read(&self, document: &str) -> bool {
        DocumentId::parse(document)
            .map(|key| self.read_documents.contains(&key))
            .unwrap_or(false)
    }

    pub fn last_keypad_entry(&self) -> &str {
        &self.last_keypad_entry
    }

    /// Store a keypad submission (trimmed).
    pub fn record_keypad_entry(&mut self, entry: &str) {
        self.last_keypad_entry = entry.trim().to_string();
    }

    /// Forget the last keypad submission so a new session can't match it.
    pub fn clear_keypad_entry(&mut self) {
        self.last_keypad_entry.clear();
    }

    /// Restore every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::GameFlag;
    use proptest::prelude::*;

    #[test]
    fn test_unknown_flag_is_false() {
        let state = GameState::new();
        assert!(!state.flag("neverSet"));
        assert!(!state.flag(""));
        assert!(!state.flag(GameFlag::DoorUnlocked));
    }

    #[test]
    fn test_flags_are_case_insensitive() {
        let mut state = GameState::new();
        state.set_flag(GameFlag::CircuitFixed, true);

        assert!(state.flag("circuitfixed"));
        assert!(state.flag(" CIRCUITFIXED "));
        assert!(!state.flag(GameFlag::DoorUnlocked));
    }

    #[test]
    fn test_inventory_round_trip() {
        let mut state = GameState::new();

        assert!(state.add_item("Key", None));
        assert!(state.has_item("key"));
        assert!(!state.add_item(" KEY ", None));
        assert_eq!(state.inventory_len(), 1);

        assert!(state.remove_item("KEY"));
        assert!(!state.has_item("Key"));
        assert!(!state.remove_item("Key"));
    }

    #[test]
    fn test_blank_item_ignored() {
        let mut state = GameState::new();
        assert!(!state.add_item("  ", None));
        assert_eq!(state.inventory_len(), 0);
        assert!(!state.has_item(""));
    }

    #[test]
    fn test_item_document_kept_on_readd() {
        let mut state = GameState::new();
        let doc = DocumentData::new("photo_doc", "Old Photo");

        state.add_item("Photo", Some(doc.clone()));
        state.add_item("photo", None);
        assert_eq!(state.item_document("PHOTO"), Some(&doc));

        state.remove_item("Photo");
        assert!(state.item_document("Photo").is_none());
    }

    #[test]
    fn test_inventory_display_names() {
        let mut state = GameState::new();
        state.add_item("Wristband", None);
        state.add_item("Doll", None);

        let items: Vec<_> = state.inventory().collect();
        assert_eq!(items, vec!["Doll", "Wristband"]);
    }

    #[test]
    fn test_read_documents() {
        let mut state = GameState::new();
        state.mark_read(" Consent ");
        assert!(state.has_read("consent"));
        assert!(!state.has_read("diary"));
        assert!(!state.has_read(""));
    }

    #[test]
    fn test_keypad_entry_trimmed_and_cleared() {
        let mut state = GameState::new();
        state.record_keypad_entry(" 251012 ");
        assert_eq!(state.last_keypad_entry(), "251012");

        state.clear_keypad_entry();
        assert_eq!(state.last_keypad_entry(), "");
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut state = GameState::new();
        state.set_flag(GameFlag::InChase, true);
        state.add_item("Doll", Some(DocumentData::new("doll", "Doll")));
        state.mark_read("doll");
        state.record_keypad_entry("0000");

        state.reset();
        assert_eq!(state, GameState::new());
    }

    proptest! {
        #[test]
        fn prop_set_then_get_flag(name in "[A-Za-z][A-Za-z0-9_]{0,15}", value: bool) {
            let mut state = GameState::new();
            state.set_flag(&name, value);
            prop_assert_eq!(state.flag(&name), value);
            prop_assert_eq!(state.flag(name.to_uppercase()), value);
        }

        #[test]
        fn prop_reset_idempotent(
            flags in proptest::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..8),
            items in proptest::collection::vec("[A-Za-z]{1,8}", 0..8),
        ) {
            let mut state = GameState::new();
            for (name, value) in &flags {
                state.set_flag(name, *value);
            }
            for item in &items {
                state.add_item(item, None);
                state.mark_read(item);
            }

            state.reset();
            let once = state.clone();
            state.reset();
            prop_assert_eq!(state, once);
        }

        #[test]
        fn prop_inventory_ignores_case(item in "[A-Za-z]{1,12}") {
            let mut state = GameState::new();
            state.add_item(&item, None);
            prop_assert!(state.has_item(&item.to_lowercase()));
            state.remove_item(&item.to_uppercase());
            prop_assert!(!state.has_item(&item));
        }
    }
}
