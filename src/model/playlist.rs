//! Ordered, observable playlist of video ids

use std::collections::HashSet;
use std::sync::Arc;

use super::error::FeedError;

/// Receives playlist changes synchronously, before the mutating call returns.
///
/// Implementations must not mutate the playlist from inside a callback.
pub trait PlaylistObserver: Send + Sync {
    fn on_videos_inserted(&self, index: usize, ids: &[String]);
    fn on_videos_removed(&self, index: usize, ids: &[String]);
    fn on_video_moved(&self, from: usize, to: usize, id: &str);
    fn on_videos_changed(&self, index: usize, ids: &[String]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistItem {
    pub id: String,
    pub position: usize,
}

#[derive(Default)]
pub struct Playlist {
    ids: Vec<String>,
    observers: Vec<(SubscriptionId, Arc<dyn PlaylistObserver>)>,
    next_subscription: u64,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(ids: Vec<String>) -> Result<Self, FeedError> {
        ensure_unique(&[], &ids)?;
        Ok(Self {
            ids,
            ..Default::default()
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn get(&self, index: usize) -> Option<PlaylistItem> {
        self.ids.get(index).map(|id| PlaylistItem {
            id: id.clone(),
            position: index,
        })
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|existing| existing == id)
    }

    pub fn subscribe(&mut self, observer: Arc<dyn PlaylistObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        tracing::debug!(subscription = id.0, observers = self.observers.len(), "Playlist observer added");
        id
    }

    /// Returns false when the subscription was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        let removed = self.observers.len() != before;
        tracing::debug!(subscription = id.0, removed, observers = self.observers.len(), "Playlist observer removed");
        removed
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn insert(&mut self, index: usize, ids: Vec<String>) -> Result<(), FeedError> {
        if index > self.ids.len() {
            return Err(FeedError::OutOfRange { index, len: self.ids.len() });
        }
        ensure_unique(&self.ids, &ids)?;
        if ids.is_empty() {
            return Ok(());
        }

        self.ids.splice(index..index, ids.iter().cloned());
        for (_, observer) in &self.observers {
            observer.on_videos_inserted(index, &ids);
        }
        Ok(())
    }

    /// Removes `count` ids starting at `index` and returns them.
    pub fn remove(&mut self, index: usize, count: usize) -> Result<Vec<String>, FeedError> {
        let end = index.checked_add(count).filter(|end| *end <= self.ids.len());
        let Some(end) = end else {
            return Err(FeedError::OutOfRange { index, len: self.ids.len() });
        };
        if count == 0 {
            return Ok(Vec::new());
        }

        let removed: Vec<String> = self.ids.drain(index..end).collect();
        for (_, observer) in &self.observers {
            observer.on_videos_removed(index, &removed);
        }
        Ok(removed)
    }

    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), FeedError> {
        let len = self.ids.len();
        if from >= len {
            return Err(FeedError::OutOfRange { index: from, len });
        }
        if to >= len {
            return Err(FeedError::OutOfRange { index: to, len });
        }
        if from == to {
            return Ok(());
        }

        let id = self.ids.remove(from);
        self.ids.insert(to, id.clone());
        for (_, observer) in &self.observers {
            observer.on_video_moved(from, to, &id);
        }
        Ok(())
    }

    /// In-place content update: same number of ids, no structural change.
    pub fn replace(&mut self, index: usize, ids: Vec<String>) -> Result<(), FeedError> {
        let end = index.checked_add(ids.len()).filter(|end| *end <= self.ids.len());
        let Some(end) = end else {
            return Err(FeedError::OutOfRange { index, len: self.ids.len() });
        };
        let untouched: Vec<String> = self.ids[..index]
            .iter()
            .chain(&self.ids[end..])
            .cloned()
            .collect();
        ensure_unique(&untouched, &ids)?;
        if ids.is_empty() {
            return Ok(());
        }

        self.ids[index..end].clone_from_slice(&ids);
        for (_, observer) in &self.observers {
            observer.on_videos_changed(index, &ids);
        }
        Ok(())
    }
}

fn ensure_unique(existing: &[String], incoming: &[String]) -> Result<(), FeedError> {
    let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
    for id in incoming {
        if !seen.insert(id) {
            return Err(FeedError::DuplicateId(id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, PartialEq)]
    enum Change {
        Inserted(usize, Vec<String>),
        Removed(usize, Vec<String>),
        Moved(usize, usize, String),
        Changed(usize, Vec<String>),
    }

    #[derive(Default)]
    struct Recorder {
        changes: Mutex<Vec<Change>>,
    }

    impl PlaylistObserver for Recorder {
        fn on_videos_inserted(&self, index: usize, ids: &[String]) {
            self.changes.lock().push(Change::Inserted(index, ids.to_vec()));
        }
        fn on_videos_removed(&self, index: usize, ids: &[String]) {
            self.changes.lock().push(Change::Removed(index, ids.to_vec()));
        }
        fn on_video_moved(&self, from: usize, to: usize, id: &str) {
            self.changes.lock().push(Change::Moved(from, to, id.to_string()));
        }
        fn on_videos_changed(&self, index: usize, ids: &[String]) {
            self.changes.lock().push(Change::Changed(index, ids.to_vec()));
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn each_mutation_notifies_once_with_its_range() {
        let mut playlist = Playlist::from_ids(ids(&["a", "b", "c"])).unwrap();
        let observer = Arc::new(Recorder::default());
        playlist.subscribe(observer.clone());

        playlist.insert(1, ids(&["x", "y"])).unwrap();
        playlist.remove(0, 1).unwrap();
        playlist.move_item(0, 3).unwrap();
        playlist.replace(1, ids(&["b2"])).unwrap();

        assert_eq!(playlist.ids(), ["y", "b2", "c", "x"]);
        assert_eq!(
            *observer.changes.lock(),
            vec![
                Change::Inserted(1, ids(&["x", "y"])),
                Change::Removed(0, ids(&["a"])),
                Change::Moved(0, 3, "x".to_string()),
                Change::Changed(1, ids(&["b2"])),
            ]
        );
    }

    #[test]
    fn rejected_mutations_do_not_notify() {
        let mut playlist = Playlist::from_ids(ids(&["a", "b"])).unwrap();
        let observer = Arc::new(Recorder::default());
        playlist.subscribe(observer.clone());

        assert_eq!(playlist.insert(3, ids(&["c"])), Err(FeedError::OutOfRange { index: 3, len: 2 }));
        assert_eq!(playlist.insert(0, ids(&["b"])), Err(FeedError::DuplicateId("b".to_string())));
        assert_eq!(playlist.remove(1, 2), Err(FeedError::OutOfRange { index: 1, len: 2 }));
        assert_eq!(playlist.replace(0, ids(&["b"])), Err(FeedError::DuplicateId("b".to_string())));
        playlist.move_item(1, 1).unwrap();
        playlist.insert(0, Vec::new()).unwrap();

        assert!(observer.changes.lock().is_empty());
        assert_eq!(playlist.ids(), ["a", "b"]);
    }

    #[test]
    fn replace_may_keep_its_own_ids() {
        let mut playlist = Playlist::from_ids(ids(&["a", "b", "c"])).unwrap();
        playlist.replace(0, ids(&["a", "b"])).unwrap();
        assert_eq!(playlist.position("c"), Some(2));
        assert_eq!(playlist.get(1), Some(PlaylistItem { id: "b".to_string(), position: 1 }));
    }

    #[test]
    fn subscribe_and_unsubscribe_pair_up() {
        let mut playlist = Playlist::new();
        let first = playlist.subscribe(Arc::new(Recorder::default()));
        let second = playlist.subscribe(Arc::new(Recorder::default()));
        assert_eq!(playlist.observer_count(), 2);

        assert!(playlist.unsubscribe(first));
        assert!(!playlist.unsubscribe(first));
        assert!(playlist.unsubscribe(second));
        assert_eq!(playlist.observer_count(), 0);
    }
}
