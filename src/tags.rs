//! Shared per-gym tag lists.
//!
//! The remote store is the source of truth: the client never applies a
//! mutation locally, it only installs whatever list the server echoes
//! back. Each mutation carries a monotonic sequence number so a stale
//! echo that completes out of order is discarded instead of clobbering
//! a newer one.

use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

const TAGS_URL: &str = "/api/gym-tags";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagError {
    /// Backend not configured; reads still succeed with an empty map.
    Unavailable,
    /// Request rejected before any store mutation (blank field, bad index).
    Rejected,
    /// Network or write failure; the local cache is left untouched.
    Failed,
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::Unavailable => write!(f, "標籤後端未設定"),
            TagError::Rejected => write!(f, "標籤內容無效"),
            TagError::Failed => write!(f, "標籤儲存失敗"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct TagMapBody {
    #[serde(default)]
    tags: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct TagListBody {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBody<'a> {
    gym_key: &'a str,
    tag: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveBody<'a> {
    gym_key: &'a str,
    index: usize,
}

/// Full tag map, fetched once at startup. Any failure degrades to an
/// empty map; the app stays usable with zero tags.
pub async fn fetch_all() -> HashMap<String, Vec<String>> {
    let Ok(resp) = Request::get(TAGS_URL).send().await else {
        return HashMap::new();
    };
    if !resp.ok() {
        return HashMap::new();
    }
    resp.json::<TagMapBody>().await.unwrap_or_default().tags
}

fn status_error(status: u16) -> TagError {
    match status {
        503 => TagError::Unavailable,
        400 => TagError::Rejected,
        _ => TagError::Failed,
    }
}

/// Upserts one tag; resolves to the server's full list for the key.
pub async fn push_add(gym_key: &str, tag: &str) -> Result<Vec<String>, TagError> {
    let req = Request::post(TAGS_URL)
        .json(&AddBody { gym_key, tag })
        .map_err(|_| TagError::Failed)?;
    let resp = req.send().await.map_err(|_| TagError::Failed)?;
    if !resp.ok() {
        return Err(status_error(resp.status()));
    }
    Ok(resp
        .json::<TagListBody>()
        .await
        .map_err(|_| TagError::Failed)?
        .tags)
}

/// Removes by position in the server-known list; an emptied list means
/// the server deleted the row and echoes `[]`.
pub async fn push_remove(gym_key: &str, index: usize) -> Result<Vec<String>, TagError> {
    let req = Request::delete(TAGS_URL)
        .json(&RemoveBody { gym_key, index })
        .map_err(|_| TagError::Failed)?;
    let resp = req.send().await.map_err(|_| TagError::Failed)?;
    if !resp.ok() {
        return Err(status_error(resp.status()));
    }
    Ok(resp
        .json::<TagListBody>()
        .await
        .map_err(|_| TagError::Failed)?
        .tags)
}

/// Local cache of the remote tag map. An identity is either absent or
/// holds a non-empty list; a server echo of `[]` deletes the entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagCache {
    entries: HashMap<String, Vec<String>>,
    applied: HashMap<String, u64>,
}

impl TagCache {
    pub fn tags(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn install(&mut self, key: &str, seq: u64, tags: Vec<String>) -> bool {
        if seq <= self.applied.get(key).copied().unwrap_or(0) {
            return false;
        }
        self.applied.insert(key.to_string(), seq);
        if tags.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), tags);
        }
        true
    }
}

#[derive(Clone, Debug)]
pub enum TagCacheAction {
    /// Startup snapshot; entries with empty lists are dropped.
    Loaded(HashMap<String, Vec<String>>),
    /// A mutation's server echo, tagged with its issue sequence.
    Applied {
        key: String,
        seq: u64,
        tags: Vec<String>,
    },
}

impl Reducible for TagCache {
    type Action = TagCacheAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            TagCacheAction::Loaded(map) => {
                new.entries = map.into_iter().filter(|(_, v)| !v.is_empty()).collect();
            }
            TagCacheAction::Applied { key, seq, tags } => {
                new.install(&key, seq, tags);
            }
        }
        Rc::new(new)
    }
}

/// The tag-store contract this client consumes: key to ordered list,
/// duplicate adds echo the list unchanged, removing the last tag
/// deletes the row. Backs the contract tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TagStore {
    rows: BTreeMap<String, Vec<String>>,
}

impl TagStore {
    pub fn snapshot(&self) -> HashMap<String, Vec<String>> {
        self.rows
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn contains(&self, gym_key: &str) -> bool {
        self.rows.contains_key(gym_key)
    }

    pub fn add(&mut self, gym_key: &str, tag: &str) -> Result<Vec<String>, TagError> {
        let key = gym_key.trim();
        let tag = tag.trim();
        if key.is_empty() || tag.is_empty() {
            return Err(TagError::Rejected);
        }
        let row = self.rows.entry(key.to_string()).or_default();
        if !row.iter().any(|t| t == tag) {
            row.push(tag.to_string());
        }
        Ok(row.clone())
    }

    pub fn remove(&mut self, gym_key: &str, index: usize) -> Result<Vec<String>, TagError> {
        let key = gym_key.trim();
        if key.is_empty() {
            return Err(TagError::Rejected);
        }
        let Some(row) = self.rows.get_mut(key) else {
            return Ok(Vec::new());
        };
        if index < row.len() {
            row.remove(index);
        }
        if row.is_empty() {
            self.rows.remove(key);
            return Ok(Vec::new());
        }
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(cache: TagCache, action: TagCacheAction) -> TagCache {
        (*Rc::new(cache).reduce(action)).clone()
    }

    #[test]
    fn add_is_idempotent_for_duplicates() {
        let mut store = TagStore::default();
        let echoed = store.add("台北站|X攀岩", "好停車").unwrap();
        assert_eq!(echoed, vec!["好停車".to_string()]);
        let echoed = store.add("台北站|X攀岩", "好停車").unwrap();
        assert_eq!(echoed, vec!["好停車".to_string()]);
    }

    #[test]
    fn blank_fields_rejected_before_mutation() {
        let mut store = TagStore::default();
        assert_eq!(store.add("k", "   "), Err(TagError::Rejected));
        assert_eq!(store.add("  ", "tag"), Err(TagError::Rejected));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn removing_last_tag_deletes_the_identity() {
        let mut store = TagStore::default();
        store.add("key", "a").unwrap();
        let echoed = store.remove("key", 0).unwrap();
        assert!(echoed.is_empty());
        assert!(!store.contains("key"));
        assert!(!store.snapshot().contains_key("key"));
        // Absent -> Absent on a repeated remove.
        assert_eq!(store.remove("key", 0).unwrap(), Vec::<String>::new());
    }

    #[test]
    fn out_of_range_remove_leaves_list_unchanged() {
        let mut store = TagStore::default();
        store.add("key", "a").unwrap();
        store.add("key", "b").unwrap();
        let echoed = store.remove("key", 9).unwrap();
        assert_eq!(echoed, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn insertion_order_preserved() {
        let mut store = TagStore::default();
        store.add("key", "c").unwrap();
        store.add("key", "a").unwrap();
        store.add("key", "b").unwrap();
        assert_eq!(
            store.snapshot()["key"],
            vec!["c".to_string(), "a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn cache_tracks_identity_lifecycle() {
        let mut cache = TagCache::default();
        assert!(!cache.contains("key"));
        assert!(cache.install("key", 1, vec!["a".to_string()]));
        assert!(cache.contains("key"));
        assert!(cache.install("key", 2, Vec::new()));
        assert!(!cache.contains("key"));
        assert!(cache.tags("key").is_empty());
    }

    #[test]
    fn stale_echo_is_discarded() {
        let mut cache = TagCache::default();
        assert!(cache.install("key", 2, vec!["new".to_string()]));
        // An older in-flight response lands afterwards.
        assert!(!cache.install("key", 1, vec!["old".to_string()]));
        assert_eq!(cache.tags("key"), ["new".to_string()]);
    }

    #[test]
    fn load_drops_present_but_empty_entries() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), vec!["x".to_string()]);
        map.insert("b".to_string(), Vec::new());
        let cache = apply(TagCache::default(), TagCacheAction::Loaded(map));
        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn mutation_round_trip_against_store() {
        // Client cache fed only by store echoes stays convergent.
        let mut store = TagStore::default();
        let mut cache = TagCache::default();
        let echoed = store.add("台北站|X攀岩", "好停車").unwrap();
        cache.install("台北站|X攀岩", 1, echoed);
        assert_eq!(cache.tags("台北站|X攀岩"), ["好停車".to_string()]);
        let echoed = store.remove("台北站|X攀岩", 0).unwrap();
        cache.install("台北站|X攀岩", 2, echoed);
        assert!(!cache.contains("台北站|X攀岩"));
        assert!(!store.contains("台北站|X攀岩"));
    }
}
