//! Shader material cache.
//!
//! Custom shader materials whose sources live at URLs are compiled once per
//! `(vertex URL, fragment URL)` pair. The first request issues both fetches;
//! later requests for the same pair only queue their callback. The fetch
//! that completes second compiles the material and drains the callbacks in
//! the order they were queued.

use std::fmt;
use std::sync::Arc;

use futures::channel::oneshot;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::assets::io::SourceFetcher;
use crate::errors::{PrismError, Result};
use crate::resources::shader::{ShaderMaterial, Uniforms};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderKey {
    pub vertex_url: String,
    pub fragment_url: String,
}

impl ShaderKey {
    #[must_use]
    pub fn new(vertex_url: &str, fragment_url: &str) -> Self {
        Self {
            vertex_url: vertex_url.to_string(),
            fragment_url: fragment_url.to_string(),
        }
    }
}

impl fmt::Display for ShaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.vertex_url, self.fragment_url)
    }
}

pub type ShaderCallback = Box<dyn FnOnce(Arc<ShaderMaterial>) + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

#[derive(Default)]
struct ShaderEntry {
    material: Option<Arc<ShaderMaterial>>,
    loading: bool,
    /// Bumped for every fetch pair so completions of an abandoned pair are
    /// ignored.
    generation: u64,
    vertex_source: Option<String>,
    fragment_source: Option<String>,
    uniforms: Uniforms,
    callbacks: SmallVec<[ShaderCallback; 2]>,
}

type EntryMap = FxHashMap<ShaderKey, ShaderEntry>;

/// Cache of compiled shader materials. Cloning shares the cache.
#[derive(Clone)]
pub struct ShaderCache {
    entries: Arc<Mutex<EntryMap>>,
    fetcher: Arc<dyn SourceFetcher>,
}

impl ShaderCache {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(EntryMap::default())),
            fetcher,
        }
    }

    #[must_use]
    pub fn get(&self, key: &ShaderKey) -> Option<Arc<ShaderMaterial>> {
        self.entries.lock().get(key).and_then(|e| e.material.clone())
    }

    #[must_use]
    pub fn is_loading(&self, key: &ShaderKey) -> bool {
        self.entries.lock().get(key).is_some_and(|e| e.loading)
    }

    /// Number of callbacks waiting for `key`.
    #[must_use]
    pub fn pending_count(&self, key: &ShaderKey) -> usize {
        self.entries.lock().get(key).map_or(0, |e| e.callbacks.len())
    }

    /// Returns the cached material, or queues `callback` and returns `None`.
    ///
    /// The callback is dropped without being called when the material is
    /// already cached. `uniforms` are used by whichever request starts the
    /// fetch pair.
    pub fn request(&self, key: ShaderKey, uniforms: Uniforms, callback: ShaderCallback) -> Option<Arc<ShaderMaterial>> {
        let generation = {
            let mut entries = self.entries.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let Some(material) = &entry.material {
                return Some(material.clone());
            }

            entry.callbacks.push(callback);
            if entry.loading {
                log::debug!("Shader {key} already loading, {} waiting", entry.callbacks.len());
                return None;
            }

            entry.loading = true;
            entry.generation += 1;
            entry.uniforms = uniforms;
            entry.generation
        };

        // Fetchers may complete synchronously, so the lock must be released.
        self.fetch_stage(&key, generation, Stage::Vertex);
        self.fetch_stage(&key, generation, Stage::Fragment);
        None
    }

    /// Like [`request`](Self::request), as a future. Resolves to
    /// [`PrismError::Cancelled`] if the request is cancelled.
    pub async fn request_async(&self, key: ShaderKey, uniforms: Uniforms) -> Result<Arc<ShaderMaterial>> {
        let (tx, rx) = oneshot::channel();
        let callback: ShaderCallback = Box::new(move |material| {
            let _ = tx.send(material);
        });
        if let Some(material) = self.request(key.clone(), uniforms, callback) {
            return Ok(material);
        }
        rx.await.map_err(|_| PrismError::Cancelled(key.to_string()))
    }

    /// Drops the callbacks waiting for `key`. An in-flight fetch pair still
    /// completes and caches the material. Returns how many were dropped.
    pub fn cancel(&self, key: &ShaderKey) -> usize {
        let dropped = {
            let mut entries = self.entries.lock();
            entries
                .get_mut(key)
                .map(|e| std::mem::take(&mut e.callbacks))
                .unwrap_or_default()
        };
        dropped.len()
    }

    fn fetch_stage(&self, key: &ShaderKey, generation: u64, stage: Stage) {
        let url = match stage {
            Stage::Vertex => &key.vertex_url,
            Stage::Fragment => &key.fragment_url,
        };
        let entries = Arc::clone(&self.entries);
        let key = key.clone();
        self.fetcher.fetch_text(
            url,
            Box::new(move |result| complete(&entries, &key, generation, stage, result)),
        );
    }
}

fn complete(entries: &Mutex<EntryMap>, key: &ShaderKey, generation: u64, stage: Stage, result: Result<String>) {
    let (material, callbacks) = {
        let mut entries = entries.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if !entry.loading || entry.generation != generation {
            log::debug!("Ignoring stale {stage} source for shader {key}");
            return;
        }

        let source = match result {
            Ok(source) => source,
            Err(e) => {
                log::error!("Failed to load {stage} shader for {key}: {e}");
                entry.loading = false;
                entry.vertex_source = None;
                entry.fragment_source = None;
                return;
            }
        };

        match stage {
            Stage::Vertex => entry.vertex_source = Some(source),
            Stage::Fragment => entry.fragment_source = Some(source),
        }

        // Wait for the other stage.
        let (Some(vertex), Some(fragment)) = (&entry.vertex_source, &entry.fragment_source) else {
            return;
        };

        let material = Arc::new(ShaderMaterial::new(
            vertex.clone(),
            fragment.clone(),
            std::mem::take(&mut entry.uniforms),
        ));
        entry.vertex_source = None;
        entry.fragment_source = None;
        entry.material = Some(material.clone());
        entry.loading = false;
        (material, std::mem::take(&mut entry.callbacks))
    };

    log::debug!("Compiled shader {key}, notifying {} waiter(s)", callbacks.len());
    for callback in callbacks {
        callback(material.clone());
    }
}
