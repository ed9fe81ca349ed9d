//! Asset requests, the loader seam and the "all required assets settled"
//! barrier.
//!
//! Loads are fire-and-forget from the frame loop's point of view: the
//! front-end spawns each one and reports the outcome to the session, which
//! uses a [`LoadBarrier`] to decide when a population step is complete.

use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;

use fnv::FnvHashMap;

use crate::error::AssetError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Model,
    Texture,
    Video,
}

impl AssetKind {
    /// Guess the kind from a file extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "glb" | "gltf" => Some(AssetKind::Model),
            "png" | "jpg" | "jpeg" | "webp" => Some(AssetKind::Texture),
            "mp4" | "webm" | "mov" => Some(AssetKind::Video),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub kind: AssetKind,
    pub path: &'static str,
}

impl AssetRequest {
    pub const fn model(path: &'static str) -> Self {
        Self {
            kind: AssetKind::Model,
            path,
        }
    }

    pub const fn texture(path: &'static str) -> Self {
        Self {
            kind: AssetKind::Texture,
            path,
        }
    }

    pub const fn video(path: &'static str) -> Self {
        Self {
            kind: AssetKind::Video,
            path,
        }
    }
}

/// A loaded asset. `root` is whatever handle the front-end's engine uses for
/// the loaded object (a scene node, a texture).
#[derive(Clone, Debug)]
pub struct SceneAsset<H> {
    pub request: AssetRequest,
    pub root: H,
    /// Named animation clips (models only).
    pub animations: Vec<String>,
}

pub type LoadFuture<'a, H> = Pin<Box<dyn Future<Output = Result<SceneAsset<H>, AssetError>> + 'a>>;

/// Something that can fetch assets without blocking the caller.
pub trait AssetSource {
    type Handle;

    fn load(&self, request: &AssetRequest) -> LoadFuture<'_, Self::Handle>;
}

/// Load several assets in order. Failures are returned in place rather than
/// short-circuiting, so callers can skip just the entities that failed.
pub async fn load_all<S: AssetSource>(
    source: &S,
    requests: &[AssetRequest],
) -> Vec<Result<SceneAsset<S::Handle>, AssetError>> {
    let mut out = Vec::with_capacity(requests.len());
    for request in requests {
        let result = source.load(request).await;
        if let Err(e) = &result {
            log::warn!("[assets] {}", e);
        }
        out.push(result);
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    Pending { required: bool },
    Loaded,
    Failed { required: bool },
}

/// Tracks the loads of one population step.
///
/// The barrier opens once every *required* load has settled, whether it
/// succeeded or not. Optional loads never hold it closed.
#[derive(Debug)]
pub struct LoadBarrier<K> {
    slots: FnvHashMap<K, Slot>,
}

impl<K: Copy + Eq + Hash> Default for LoadBarrier<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> LoadBarrier<K> {
    pub fn new() -> Self {
        Self {
            slots: FnvHashMap::default(),
        }
    }

    pub fn expect(&mut self, key: K, required: bool) {
        self.slots.insert(key, Slot::Pending { required });
    }

    /// Record an outcome. Returns `false` for keys the barrier is not
    /// tracking (e.g. a load that resolved after a reset).
    pub fn settle(&mut self, key: K, ok: bool) -> bool {
        let Some(slot) = self.slots.get_mut(&key) else {
            return false;
        };
        let Slot::Pending { required } = *slot else {
            return false;
        };
        *slot = if ok {
            Slot::Loaded
        } else {
            Slot::Failed { required }
        };
        true
    }

    pub fn forget(&mut self, key: K) {
        self.slots.remove(&key);
    }

    pub fn is_open(&self) -> bool {
        self.pending_required() == 0
    }

    pub fn pending_required(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Pending { required: true }))
            .count()
    }

    pub fn failed_required(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Failed { required: true }))
            .count()
    }

    pub fn is_tracking(&self, key: K) -> bool {
        self.slots.contains_key(&key)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
