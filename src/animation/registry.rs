//! Animation registry and deferred lookups.
//!
//! Animations are registered under their element id. A consumer may ask
//! for an id before its `<animation>` element has been parsed; the request
//! is queued and resolved when the id is registered.
//!
//! Callbacks are fallible. A failure during a drain does not stop the
//! remaining callbacks; the first error is returned from
//! [`AnimationRegistry::register`] and later ones are logged.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::animation::record::AnimationRecord;
use crate::errors::Result;

/// A deferred consumer of an animation. `C` is the context the registry
/// owner hands in when callbacks run (the document passes its scene).
pub type AvailableCallback<C> = Box<dyn FnOnce(&mut C, &Arc<AnimationRecord>) -> Result<()>>;

type PendingList<C> = SmallVec<[AvailableCallback<C>; 2]>;

pub struct AnimationRegistry<C> {
    records: FxHashMap<String, Arc<AnimationRecord>>,
    pending: FxHashMap<String, PendingList<C>>,
}

impl<C> Default for AnimationRegistry<C> {
    fn default() -> Self {
        Self {
            records: FxHashMap::default(),
            pending: FxHashMap::default(),
        }
    }
}

impl<C> AnimationRegistry<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `record` under `id`, replacing any previous record, then runs
    /// the callbacks waiting for `id` in the order they were queued.
    ///
    /// The drained pending entry stays in the map, empty. The record stays
    /// registered even when a callback fails.
    pub fn register(&mut self, id: &str, record: AnimationRecord, ctx: &mut C) -> Result<Arc<AnimationRecord>> {
        let record = Arc::new(record);
        if self.records.insert(id.to_string(), record.clone()).is_some() {
            log::debug!("Animation `{id}` redefined");
        }

        if let Some(list) = self.pending.get_mut(id) {
            let callbacks = std::mem::take(list);
            if !callbacks.is_empty() {
                log::debug!("Resolving {} deferred binding(s) for `{id}`", callbacks.len());
            }
            let mut first_error = None;
            for callback in callbacks {
                if let Err(e) = callback(ctx, &record) {
                    if first_error.is_none() {
                        first_error = Some(e);
                    } else {
                        log::error!("Deferred consumer of `{id}` failed: {e}");
                    }
                }
            }
            if let Some(e) = first_error {
                return Err(e);
            }
        }

        Ok(record)
    }

    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<Arc<AnimationRecord>> {
        self.records.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Runs `callback` now if `id` is registered, otherwise queues it until
    /// [`register`](Self::register) is called for `id`.
    ///
    /// Only an immediate run can fail here; queued callbacks report through
    /// `register`.
    pub fn on_available<F>(&mut self, id: &str, ctx: &mut C, callback: F) -> Result<()>
    where
        F: FnOnce(&mut C, &Arc<AnimationRecord>) -> Result<()> + 'static,
    {
        if let Some(record) = self.records.get(id) {
            return callback(ctx, record);
        }
        self.pending
            .entry(id.to_string())
            .or_default()
            .push(Box::new(callback));
        Ok(())
    }

    /// Drops the callbacks waiting for `id`. Returns how many were dropped.
    pub fn cancel_pending(&mut self, id: &str) -> usize {
        self.pending.get_mut(id).map_or(0, |list| {
            let dropped = list.len();
            list.clear();
            dropped
        })
    }

    /// Number of callbacks waiting for `id`.
    #[must_use]
    pub fn pending_count(&self, id: &str) -> usize {
        self.pending.get(id).map_or(0, SmallVec::len)
    }

    /// Ids that still have callbacks waiting, sorted.
    #[must_use]
    pub fn unresolved_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .pending
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(id, _)| id.as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
