use super::backend::StorageBackend;
use crate::error::Result;
use crate::model::{
    now_ms, CategoryDeletePolicy, DraftSnippet, Snippet, StoreData, STORE_VERSION,
};
use crate::naming::names_eq;
use std::collections::HashMap;
use uuid::Uuid;

/// Called after every commit.
pub type Observer = Box<dyn Fn(&StoreData)>;

/// The canonical, in-memory collection of snippets and categories.
///
/// Every mutator takes a `notify` flag. With `notify = true` the change is
/// committed right away: the whole record goes to the backend and observers
/// run. With `notify = false` the store is only marked dirty, so callers can
/// batch several changes and finish with [`SnippetStore::commit`].
///
/// Unknown ids or names never error; they yield `None`/`false`. Errors only
/// come from the backend.
pub struct SnippetStore<B: StorageBackend> {
    pub(crate) backend: B,
    snippets: HashMap<Uuid, Snippet>,
    order: Vec<Uuid>,
    categories: Vec<String>,
    draft: DraftSnippet,
    dirty: bool,
    observers: Vec<Observer>,
}

impl<B: StorageBackend> SnippetStore<B> {
    pub fn with_backend(backend: B) -> Result<Self> {
        let mut store = Self {
            backend,
            snippets: HashMap::new(),
            order: Vec::new(),
            categories: Vec::new(),
            draft: DraftSnippet::default(),
            dirty: false,
            observers: Vec::new(),
        };
        store.reload()?;
        Ok(store)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replace the in-memory state with whatever the backend holds.
    pub fn reload(&mut self) -> Result<()> {
        let data = self.backend.load()?.unwrap_or_default();
        self.replace(data);
        self.dirty = false;
        Ok(())
    }

    /// Drop everything and persist an empty record.
    pub fn reset(&mut self) -> Result<()> {
        self.replace(StoreData::default());
        self.commit()
    }

    fn replace(&mut self, data: StoreData) {
        self.snippets.clear();
        self.order.clear();
        self.categories.clear();
        self.draft = data.new_snippet;

        for category in data.categories {
            self.adopt_category(&category);
        }
        for snippet in data.snippets {
            if self.snippets.contains_key(&snippet.id) {
                log::warn!("Skipping duplicate snippet id {} on load", snippet.id);
                continue;
            }
            if let Some(category) = snippet.category.clone() {
                self.adopt_category(&category);
            }
            self.order.push(snippet.id);
            self.snippets.insert(snippet.id, snippet);
        }
    }

    /// Snapshot of the full state, as it would be persisted.
    pub fn to_data(&self) -> StoreData {
        StoreData {
            version: STORE_VERSION,
            categories: self.categories.clone(),
            new_snippet: self.draft.clone(),
            snippets: self.snippets().cloned().collect(),
        }
    }

    /// Persist now and notify observers.
    pub fn commit(&mut self) -> Result<()> {
        let data = self.to_data();
        self.backend.save(&data)?;
        self.dirty = false;
        for observer in &self.observers {
            observer(&data);
        }
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn subscribe(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn changed(&mut self, notify: bool) -> Result<()> {
        self.dirty = true;
        if notify {
            self.commit()?;
        }
        Ok(())
    }

    // --- Snippets ---

    /// All snippets in insertion order.
    pub fn snippets(&self) -> impl Iterator<Item = &Snippet> {
        self.order.iter().filter_map(|id| self.snippets.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Create a snippet with a fresh id. Name uniqueness is the caller's job;
    /// an empty name becomes "Unnamed".
    pub fn add_snippet(
        &mut self,
        code: &str,
        name: &str,
        mode: Option<&str>,
        category: Option<&str>,
        notify: bool,
    ) -> Result<Snippet> {
        let mut snippet = Snippet::new(name.to_string(), code.to_string())
            .with_category(category.map(str::to_string));
        if let Some(mode) = mode.filter(|m| !m.is_empty()) {
            snippet.execution_mode = mode.to_string();
        }
        if let Some(category) = snippet.category.clone() {
            self.adopt_category(&category);
        }

        self.order.push(snippet.id);
        self.snippets.insert(snippet.id, snippet.clone());
        self.changed(notify)?;
        Ok(snippet)
    }

    pub fn get_snippet(&self, id: &Uuid) -> Option<&Snippet> {
        self.snippets.get(id)
    }

    /// Case-insensitive exact name match, optionally restricted to one mode.
    pub fn get_snippet_by_name(&self, name: &str, mode: Option<&str>) -> Option<&Snippet> {
        self.snippets().find(|s| {
            names_eq(&s.name, name)
                && mode.map_or(true, |m| names_eq(&s.execution_mode, m))
        })
    }

    pub fn has_snippet_name(&self, name: &str) -> bool {
        self.get_snippet_by_name(name, None).is_some()
    }

    pub fn remove_snippet(&mut self, id: &Uuid, notify: bool) -> Result<Option<Snippet>> {
        let removed = self.snippets.remove(id);
        if removed.is_some() {
            self.order.retain(|o| o != id);
            self.changed(notify)?;
        }
        Ok(removed)
    }

    pub fn remove_snippets(&mut self, ids: &[Uuid], notify: bool) -> Result<Vec<Snippet>> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(snippet) = self.snippets.remove(id) {
                removed.push(snippet);
            }
        }
        if !removed.is_empty() {
            self.order.retain(|o| self.snippets.contains_key(o));
            self.changed(notify)?;
        }
        Ok(removed)
    }

    pub fn remove_snippets_in_category(
        &mut self,
        category: &str,
        notify: bool,
    ) -> Result<Vec<Snippet>> {
        let ids: Vec<Uuid> = self
            .snippets()
            .filter(|s| s.in_category(category))
            .map(|s| s.id)
            .collect();
        self.remove_snippets(&ids, notify)
    }

    fn update<F>(&mut self, id: &Uuid, notify: bool, apply: F) -> Result<bool>
    where
        F: FnOnce(&mut Snippet),
    {
        match self.snippets.get_mut(id) {
            Some(snippet) => {
                apply(snippet);
                self.changed(notify)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_snippet_name(&mut self, id: &Uuid, name: &str, notify: bool) -> Result<bool> {
        self.update(id, notify, |s| s.name = name.to_string())
    }

    pub fn set_snippet_code(&mut self, id: &Uuid, code: &str, notify: bool) -> Result<bool> {
        self.update(id, notify, |s| {
            s.code = code.to_string();
            s.edited_at = now_ms();
        })
    }

    pub fn set_snippet_mode(&mut self, id: &Uuid, mode: &str, notify: bool) -> Result<bool> {
        self.update(id, notify, |s| s.execution_mode = mode.to_string())
    }

    pub fn set_snippet_pinned(&mut self, id: &Uuid, pinned: bool, notify: bool) -> Result<bool> {
        self.update(id, notify, |s| s.pinned = pinned)
    }

    /// Assign (or clear, with `None`) a snippet's category. An unknown
    /// category is created on the fly.
    pub fn set_snippet_category(
        &mut self,
        id: &Uuid,
        category: Option<&str>,
        notify: bool,
    ) -> Result<bool> {
        if !self.snippets.contains_key(id) {
            return Ok(false);
        }
        let category = category.filter(|c| !c.is_empty()).map(str::to_string);
        if let Some(c) = &category {
            self.adopt_category(c);
        }
        self.update(id, notify, |s| s.category = category)
    }

    // --- Categories ---

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.find_category(name).is_some()
    }

    fn find_category(&self, name: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| names_eq(c, name))
    }

    /// Records a category without marking the store dirty. Returns true when
    /// it was new.
    fn adopt_category(&mut self, name: &str) -> bool {
        if name.is_empty() || self.has_category(name) {
            return false;
        }
        self.categories.push(name.to_string());
        true
    }

    pub fn add_category(&mut self, name: &str, notify: bool) -> Result<bool> {
        if !self.adopt_category(name) {
            return Ok(false);
        }
        self.changed(notify)?;
        Ok(true)
    }

    /// Remove a category, dealing with its members per `policy`.
    pub fn remove_category(
        &mut self,
        name: &str,
        policy: CategoryDeletePolicy,
        notify: bool,
    ) -> Result<bool> {
        let Some(pos) = self.find_category(name) else {
            return Ok(false);
        };
        self.categories.remove(pos);

        match policy {
            CategoryDeletePolicy::DeleteMembers => {
                self.remove_snippets_in_category(name, false)?;
            }
            CategoryDeletePolicy::ClearMembers => {
                for snippet in self.snippets.values_mut() {
                    if snippet.in_category(name) {
                        snippet.category = None;
                    }
                }
            }
        }
        self.changed(notify)?;
        Ok(true)
    }

    /// Rename a category and every snippet's reference to it. Renaming onto an
    /// existing category merges the two.
    pub fn rename_category(&mut self, old: &str, new: &str, notify: bool) -> Result<bool> {
        let Some(pos) = self.find_category(old) else {
            return Ok(false);
        };
        if new.is_empty() {
            return Ok(false);
        }

        // Merging keeps the spelling already on record.
        let target = match self.find_category(new) {
            Some(existing) if existing != pos => {
                let kept = self.categories[existing].clone();
                self.categories.remove(pos);
                kept
            }
            _ => {
                self.categories[pos] = new.to_string();
                new.to_string()
            }
        };

        for snippet in self.snippets.values_mut() {
            if snippet.in_category(old) {
                snippet.category = Some(target.clone());
            }
        }
        self.changed(notify)?;
        Ok(true)
    }

    // --- Draft ---

    pub fn draft(&self) -> &DraftSnippet {
        &self.draft
    }

    pub fn set_draft_code(&mut self, code: &str, notify: bool) -> Result<()> {
        self.draft.code = code.to_string();
        self.changed(notify)
    }

    pub fn set_draft_mode(&mut self, mode: &str, notify: bool) -> Result<()> {
        self.draft.mode = mode.to_string();
        self.changed(notify)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnipxError;
    use crate::store::mem_backend::MemBackend;
    use std::cell::Cell;
    use std::rc::Rc;

    fn store() -> SnippetStore<MemBackend> {
        SnippetStore::with_backend(MemBackend::new()).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = store();
        let s = store
            .add_snippet("print(1)", "One", Some("Lua"), None, true)
            .unwrap();

        assert_eq!(store.get_snippet(&s.id), Some(&s));
        assert_eq!(store.len(), 1);
        assert_eq!(s.execution_mode, "Lua");
    }

    #[test]
    fn test_add_with_empty_name_uses_default() {
        let mut store = store();
        let s = store.add_snippet("", "", None, None, false).unwrap();
        assert_eq!(s.name, "Unnamed");
        assert_eq!(s.execution_mode, "None");
    }

    #[test]
    fn test_add_does_not_enforce_uniqueness() {
        let mut store = store();
        let a = store.add_snippet("", "Same", None, None, false).unwrap();
        let b = store.add_snippet("", "Same", None, None, false).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_by_name_is_case_insensitive_with_mode_filter() {
        let mut store = store();
        store
            .add_snippet("", "Hello", Some("Lua"), None, false)
            .unwrap();

        assert!(store.get_snippet_by_name("hello", None).is_some());
        assert!(store.get_snippet_by_name("HELLO", Some("lua")).is_some());
        assert!(store.get_snippet_by_name("hello", Some("Rust")).is_none());
        assert!(store.get_snippet_by_name("missing", None).is_none());
    }

    #[test]
    fn test_unknown_ids_are_not_errors() {
        let mut store = store();
        let id = Uuid::new_v4();
        assert!(store.remove_snippet(&id, true).unwrap().is_none());
        assert!(!store.set_snippet_code(&id, "x", true).unwrap());
        assert!(!store.set_snippet_category(&id, Some("c"), true).unwrap());
        assert!(!store.rename_category("nope", "other", true).unwrap());
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn test_notify_false_defers_persistence() {
        let mut store = store();
        store.add_snippet("", "A", None, None, false).unwrap();
        store.add_snippet("", "B", None, None, false).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.backend().save_count(), 0);

        store.commit().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(store.backend().save_count(), 1);
        assert_eq!(store.backend().saved().unwrap().snippets.len(), 2);
    }

    #[test]
    fn test_observers_run_on_commit() {
        let mut store = store();
        let seen = Rc::new(Cell::new(0));
        let counter = seen.clone();
        store.subscribe(Box::new(move |data| counter.set(data.snippets.len())));

        store.add_snippet("", "A", None, None, false).unwrap();
        assert_eq!(seen.get(), 0);
        store.add_snippet("", "B", None, None, true).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_set_code_bumps_edited_at() {
        let mut store = store();
        let s = store.add_snippet("old", "A", None, None, false).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        store.set_snippet_code(&s.id, "new", false).unwrap();

        let updated = store.get_snippet(&s.id).unwrap();
        assert_eq!(updated.code, "new");
        assert!(updated.edited_at > s.edited_at);
        assert_eq!(updated.created_at, s.created_at);
    }

    #[test]
    fn test_set_category_auto_creates() {
        let mut store = store();
        let s = store.add_snippet("", "A", None, None, false).unwrap();
        store.set_snippet_category(&s.id, Some("Tools"), false).unwrap();

        assert!(store.has_category("tools"));
        assert_eq!(
            store.get_snippet(&s.id).unwrap().category.as_deref(),
            Some("Tools")
        );

        store.set_snippet_category(&s.id, None, false).unwrap();
        assert!(store.get_snippet(&s.id).unwrap().category.is_none());
        assert!(store.has_category("Tools"));
    }

    #[test]
    fn test_rename_category_cascades() {
        let mut store = store();
        let a = store.add_snippet("", "A", None, Some("X"), false).unwrap();
        let b = store.add_snippet("", "B", None, Some("x"), false).unwrap();
        let c = store.add_snippet("", "C", None, Some("Other"), false).unwrap();

        assert!(store.rename_category("X", "Y", true).unwrap());

        assert!(!store.has_category("X"));
        assert!(store.has_category("Y"));
        for id in [a.id, b.id] {
            assert_eq!(store.get_snippet(&id).unwrap().category.as_deref(), Some("Y"));
        }
        assert_eq!(
            store.get_snippet(&c.id).unwrap().category.as_deref(),
            Some("Other")
        );
    }

    #[test]
    fn test_rename_category_onto_existing_merges() {
        let mut store = store();
        store.add_snippet("", "A", None, Some("X"), false).unwrap();
        store.add_snippet("", "B", None, Some("Y"), false).unwrap();

        store.rename_category("X", "Y", false).unwrap();
        assert_eq!(store.categories(), &["Y".to_string()]);
        assert!(store.snippets().all(|s| s.in_category("Y")));
    }

    #[test]
    fn test_merge_keeps_stored_category_spelling() {
        let mut store = store();
        let a = store.add_snippet("", "A", None, Some("X"), false).unwrap();
        store.add_snippet("", "B", None, Some("Tools"), false).unwrap();

        store.rename_category("X", "tOOLS", false).unwrap();
        assert_eq!(store.categories(), &["Tools".to_string()]);
        assert!(store
            .snippets()
            .all(|s| s.category.as_deref() == Some("Tools")));
        assert_eq!(
            store.get_snippet(&a.id).unwrap().category.as_deref(),
            Some("Tools")
        );
    }

    #[test]
    fn test_remove_category_clear_members() {
        let mut store = store();
        let a = store.add_snippet("", "A", None, Some("X"), false).unwrap();
        assert!(store
            .remove_category("x", CategoryDeletePolicy::ClearMembers, false)
            .unwrap());
        assert!(!store.has_category("X"));
        assert!(store.get_snippet(&a.id).unwrap().category.is_none());
    }

    #[test]
    fn test_remove_category_delete_members() {
        let mut store = store();
        store.add_snippet("", "A", None, Some("X"), false).unwrap();
        store.add_snippet("", "B", None, Some("X"), false).unwrap();
        let keep = store.add_snippet("", "C", None, None, false).unwrap();

        store
            .remove_category("X", CategoryDeletePolicy::DeleteMembers, true)
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_snippet(&keep.id).is_some());
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_remove_snippets_in_category() {
        let mut store = store();
        store.add_snippet("", "A", None, Some("X"), false).unwrap();
        store.add_snippet("", "B", None, Some("X"), false).unwrap();
        let removed = store.remove_snippets_in_category("X", false).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.is_empty());
        assert!(store.has_category("X"));
    }

    #[test]
    fn test_persisted_state_survives_reload() {
        let mut store = store();
        let s = store
            .add_snippet("return 1", "A", Some("Lua"), Some("Tools"), false)
            .unwrap();
        store.set_snippet_pinned(&s.id, true, false).unwrap();
        store.set_draft_code("draft", false).unwrap();
        store.commit().unwrap();

        let saved = store.backend().saved().unwrap();
        let reloaded = SnippetStore::with_backend(MemBackend::with_data(saved)).unwrap();
        let again = reloaded.get_snippet(&s.id).unwrap();
        assert!(again.pinned);
        assert_eq!(again.code, "return 1");
        assert_eq!(reloaded.draft().code, "draft");
        assert!(reloaded.has_category("Tools"));
    }

    #[test]
    fn test_load_adopts_categories_referenced_by_snippets() {
        let mut data = StoreData::default();
        data.snippets
            .push(Snippet::new("A".into(), String::new()).with_category(Some("Orphan".into())));
        let store = SnippetStore::with_backend(MemBackend::with_data(data)).unwrap();
        assert!(store.has_category("Orphan"));
    }

    #[test]
    fn test_reset_empties_and_persists() {
        let mut store = store();
        store.add_snippet("", "A", None, Some("X"), true).unwrap();
        store.reset().unwrap();
        assert!(store.is_empty());
        assert!(store.categories().is_empty());
        assert!(store.backend().saved().unwrap().snippets.is_empty());
    }

    #[test]
    fn test_write_error_surfaces_only_on_commit() {
        let mut store = store();
        store.backend().set_simulate_write_error(true);

        store.add_snippet("", "A", None, None, false).unwrap();
        let err = store.add_snippet("", "B", None, None, true).unwrap_err();
        assert!(matches!(err, SnipxError::Store(_)));
        assert!(store.is_dirty());
    }
}
