use std::time::{SystemTime, UNIX_EPOCH};

use crate::gateway::Storage;
use crate::model::{Fragment, RecordId, SlotKey, StoreKey, StoreValue, Tag, TagId};

#[cfg(test)]
mod tests;

/// the fragments, tags and theme of one user, kept in memory and persisted through a [`Storage`].
///
/// Every mutation changes the in-memory copy first and then saves the whole affected collection.
/// The returned `bool` is whether saving worked; the in-memory copy is kept either way
pub struct Wallet {
    storage: Box<dyn Storage>,
    fragments: Vec<Fragment>,
    tags: Vec<Tag>,
    dark_mode: bool,
}

impl Wallet {
    /// reads everything from `storage`
    pub fn load(storage: Box<dyn Storage>) -> Wallet {
        let mut wallet = Wallet {
            storage,
            fragments: Vec::new(),
            tags: Vec::new(),
            dark_mode: false,
        };
        wallet.reload();
        wallet
    }

    /// replaces the in-memory copies with what is currently persisted
    pub fn reload(&mut self) {
        self.fragments = self
            .storage
            .get(SlotKey::primary(StoreKey::Fragments))
            .and_then(StoreValue::into_fragments)
            .unwrap_or_default();
        self.tags = self
            .storage
            .get(SlotKey::primary(StoreKey::Tags))
            .and_then(StoreValue::into_tags)
            .unwrap_or_default();
        self.dark_mode = self
            .storage
            .get(SlotKey::primary(StoreKey::DarkMode))
            .and_then(|value| value.as_dark_mode())
            .unwrap_or(false);
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn fragment(&self, id: &RecordId) -> Option<&Fragment> {
        self.fragments.iter().find(|fragment| &fragment.id == id)
    }

    /// every fragment carrying the tag with `tag_id`
    pub fn fragments_tagged(&self, tag_id: TagId) -> Vec<&Fragment> {
        self.fragments
            .iter()
            .filter(|fragment| fragment.has_tag(tag_id))
            .collect()
    }

    /// replaces the fragment with the same id, or appends `fragment` if there is none
    pub fn add_or_edit_fragment(&mut self, fragment: Fragment) -> bool {
        match self.fragments.iter_mut().find(|it| it.id == fragment.id) {
            Some(existing) => *existing = fragment,
            None => self.fragments.push(fragment),
        }
        self.save_fragments()
    }

    pub fn delete_fragment(&mut self, id: &RecordId) -> bool {
        self.fragments.retain(|fragment| &fragment.id != id);
        self.save_fragments()
    }

    /// creates a tag named `name`. Blank names are ignored and nothing is saved.
    ///
    /// # Returns
    /// - `None` if `name` is blank
    /// - `Some((tag, saved))` otherwise, where `saved` is whether the tags could be persisted.
    ///   The tag is kept in memory either way
    pub fn add_tag(&mut self, name: &str) -> Option<(Tag, bool)> {
        if name.trim().is_empty() {
            return None;
        }
        let tag = Tag {
            id: self.next_tag_id(),
            name: name.to_string(),
        };
        self.tags.push(tag.clone());
        let saved = self.save_tags();
        if !saved {
            log::warn!("Tag {} was created but could not be saved", tag.id);
        }
        Some((tag, saved))
    }

    /// replaces the tag with the same id as `tag`. Unknown ids change nothing
    pub fn edit_tag(&mut self, tag: Tag) -> bool {
        if let Some(existing) = self.tags.iter_mut().find(|it| it.id == tag.id) {
            *existing = tag;
        }
        self.save_tags()
    }

    /// removes the tag, and removes it from every fragment that had it
    pub fn delete_tag(&mut self, id: TagId) -> bool {
        self.tags.retain(|tag| tag.id != id);
        let tags_saved = self.save_tags();
        for fragment in self.fragments.iter_mut() {
            fragment.tags.retain(|tag_id| *tag_id != id);
        }
        let fragments_saved = self.save_fragments();
        tags_saved && fragments_saved
    }

    pub fn set_dark_mode(&mut self, dark_mode: bool) -> bool {
        self.dark_mode = dark_mode;
        self.storage.set(
            SlotKey::primary(StoreKey::DarkMode),
            &StoreValue::DarkMode(dark_mode),
        )
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.set_dark_mode(!self.dark_mode)
    }

    /// gives back the storage, e.g. to close it
    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }

    /// the current unix time in milliseconds, unless that would not sort after every existing tag id.
    /// Once the largest id is [`TagId::MAX`] ids stop increasing, and the first free id from now on is used
    fn next_tag_id(&self) -> TagId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as TagId)
            .unwrap_or(0);
        match self.tags.iter().map(|tag| tag.id).max() {
            Some(latest) if latest >= now => latest
                .checked_add(1)
                .unwrap_or_else(|| self.first_unused_tag_id(now)),
            _ => now,
        }
    }

    fn first_unused_tag_id(&self, start: TagId) -> TagId {
        let unused = |id: &TagId| !self.tags.iter().any(|tag| tag.id == *id);
        (start..=TagId::MAX)
            .find(unused)
            .or_else(|| (TagId::MIN..start).find(unused))
            .unwrap_or(start)
    }

    fn save_fragments(&self) -> bool {
        self.storage.set(
            SlotKey::primary(StoreKey::Fragments),
            &StoreValue::Fragments(self.fragments.clone()),
        )
    }

    fn save_tags(&self) -> bool {
        self.storage.set(
            SlotKey::primary(StoreKey::Tags),
            &StoreValue::Tags(self.tags.clone()),
        )
    }
}
