//! Background asset loader with stale-result suppression.
//!
//! Fetching and parsing run on a dedicated worker thread so the render
//! loop never blocks; the render thread calls [`AssetLoader::poll`] once per
//! frame to collect settled loads.
//!
//! Every [`request`](AssetLoader::request) bumps a load generation. A load
//! that settles after the generation has moved on is still memoized in the
//! cache but never becomes visible. Cancellation is advisory: queued
//! requests superseded before the worker reaches them are skipped, and a
//! request already in flight runs to completion and is then discarded.

use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;
use web_time::Instant;

use super::scene::LoadedScene;
use super::source::{AssetSource, DefaultSource};
use super::{AssetKind, ResolvedAsset};
use crate::error::{AnatomicaError, AssetLoadError};
use crate::options::LoaderOptions;

/// Lifecycle of the current load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetLoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// The current generation has not settled.
    Loading,
    /// The current generation resolved successfully.
    Ready,
    /// The current generation failed.
    Failed,
}

/// Receipt for a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    /// Generation assigned to the request.
    pub generation: u64,
    /// State right after the request (already `Ready` for cache hits and
    /// flat images).
    pub state: AssetLoadState,
}

/// A load of the current generation settled.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// The asset resolved.
    Ready {
        /// Generation that settled.
        generation: u64,
        /// The resolved asset.
        asset: ResolvedAsset,
    },
    /// The asset could not be resolved.
    Failed {
        /// Generation that settled.
        generation: u64,
        /// Why it failed.
        error: AssetLoadError,
    },
}

/// Load-generation bookkeeping.
///
/// Kept separate from the worker so that settlement in any order can be
/// reasoned about (and tested) without threads.
#[derive(Debug, Clone, Default)]
pub struct LoadTracker {
    generation: u64,
    state: AssetLoadState,
}

impl LoadTracker {
    /// Start a new generation; the state becomes `Loading`.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.state = AssetLoadState::Loading;
        self.generation
    }

    /// Latest generation handed out (0 before the first request).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AssetLoadState {
        self.state
    }

    /// Whether `generation` is the latest one.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Record that `generation` settled. Returns `false` (and changes
    /// nothing) when the generation is stale or already settled.
    pub fn settle(&mut self, generation: u64, succeeded: bool) -> bool {
        if !self.is_current(generation) || self.state != AssetLoadState::Loading
        {
            return false;
        }
        self.state = if succeeded {
            AssetLoadState::Ready
        } else {
            AssetLoadState::Failed
        };
        true
    }
}

/// Request sent from the render thread to the worker.
enum WorkerRequest {
    Load { generation: u64, asset_ref: String },
    Shutdown,
}

/// Settled load sent back from the worker.
struct LoadOutcome {
    generation: u64,
    asset_ref: String,
    result: Result<LoadedScene, AssetLoadError>,
}

/// Resolves asset references to scenes or flat images.
pub struct AssetLoader {
    tracker: LoadTracker,
    current_ref: Option<String>,
    resolved: Option<ResolvedAsset>,
    error: Option<AssetLoadError>,
    cache: FxHashMap<String, Arc<LoadedScene>>,
    request_tx: mpsc::Sender<WorkerRequest>,
    result_rx: mpsc::Receiver<LoadOutcome>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl AssetLoader {
    /// Spawn the worker thread around `source`.
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::ThreadSpawn`] if the worker fails to spawn.
    pub fn new(source: Box<dyn AssetSource>) -> Result<Self, AnatomicaError> {
        let (request_tx, request_rx) = mpsc::channel::<WorkerRequest>();
        let (result_tx, result_rx) = mpsc::channel::<LoadOutcome>();

        let thread = std::thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || {
                Self::thread_loop(source, &request_rx, &result_tx);
            })
            .map_err(AnatomicaError::ThreadSpawn)?;

        Ok(Self {
            tracker: LoadTracker::default(),
            current_ref: None,
            resolved: None,
            error: None,
            cache: FxHashMap::default(),
            request_tx,
            result_rx,
            thread: Some(thread),
        })
    }

    /// Spawn a loader reading through a [`DefaultSource`].
    ///
    /// # Errors
    ///
    /// [`AnatomicaError::ThreadSpawn`] if the worker fails to spawn.
    pub fn from_options(options: &LoaderOptions) -> Result<Self, AnatomicaError> {
        Self::new(Box::new(DefaultSource::from_options(options)))
    }

    /// Begin resolving `asset_ref` as a new generation.
    ///
    /// Flat images and cached scenes settle immediately; everything else
    /// goes to the worker and settles in a later [`poll`](Self::poll).
    pub fn request(&mut self, asset_ref: &str) -> LoadTicket {
        let generation = self.tracker.begin();
        self.current_ref = Some(asset_ref.to_owned());
        self.resolved = None;
        self.error = None;

        match AssetKind::of(asset_ref) {
            AssetKind::FlatImage => {
                log::debug!("[gen {generation}] {asset_ref}: flat image");
                let _ = self.finish(
                    generation,
                    Ok(ResolvedAsset::FlatImage(asset_ref.to_owned())),
                );
            }
            AssetKind::Scene => {
                if let Some(scene) = self.cache.get(asset_ref).cloned() {
                    log::debug!("[gen {generation}] {asset_ref}: cache hit");
                    let _ =
                        self.finish(generation, Ok(ResolvedAsset::Scene(scene)));
                } else {
                    log::debug!("[gen {generation}] {asset_ref}: loading");
                    let sent = self.request_tx.send(WorkerRequest::Load {
                        generation,
                        asset_ref: asset_ref.to_owned(),
                    });
                    if sent.is_err() {
                        let _ = self.finish(
                            generation,
                            Err(AssetLoadError::WorkerUnavailable),
                        );
                    }
                }
            }
        }

        LoadTicket {
            generation,
            state: self.tracker.state(),
        }
    }

    /// Collect settled loads without blocking.
    ///
    /// Returns the event for the current generation if it settled during
    /// this call. Stale results are cached (when successful) and dropped.
    pub fn poll(&mut self) -> Option<LoadEvent> {
        let mut event = None;
        loop {
            match self.result_rx.try_recv() {
                Ok(outcome) => {
                    if let Some(e) = self.handle_outcome(outcome) {
                        event = Some(e);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if let Some(e) = self.fail_if_loading() {
                        event = Some(e);
                    }
                    break;
                }
            }
        }
        event
    }

    /// Block until the current generation settles or `timeout` elapses.
    ///
    /// Intended for headless drivers and tests; interactive hosts should
    /// call [`poll`](Self::poll) from their frame loop instead.
    pub fn wait(&mut self, timeout: Duration) -> Option<LoadEvent> {
        let deadline = Instant::now() + timeout;
        while self.tracker.state() == AssetLoadState::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.result_rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    if let Some(event) = self.handle_outcome(outcome) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => {
                    return self.fail_if_loading();
                }
            }
        }
        None
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> AssetLoadState {
        self.tracker.state()
    }

    /// Latest generation handed out.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.tracker.generation()
    }

    /// Reference of the current generation.
    #[must_use]
    pub fn current_ref(&self) -> Option<&str> {
        self.current_ref.as_deref()
    }

    /// The resolved asset, when the state is `Ready`.
    #[must_use]
    pub fn resolved(&self) -> Option<&ResolvedAsset> {
        self.resolved.as_ref()
    }

    /// The failure, when the state is `Failed`.
    #[must_use]
    pub fn error(&self) -> Option<&AssetLoadError> {
        self.error.as_ref()
    }

    /// Whether a parsed scene for `asset_ref` is memoized.
    #[must_use]
    pub fn is_cached(&self, asset_ref: &str) -> bool {
        self.cache.contains_key(asset_ref)
    }

    /// Forget all memoized scenes. The current resolved asset stays alive.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Shut down the worker thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn handle_outcome(&mut self, outcome: LoadOutcome) -> Option<LoadEvent> {
        let LoadOutcome {
            generation,
            asset_ref,
            result,
        } = outcome;

        let result = result.map(|scene| {
            let scene = Arc::new(scene);
            drop(self.cache.insert(asset_ref.clone(), Arc::clone(&scene)));
            ResolvedAsset::Scene(scene)
        });

        if !self.tracker.is_current(generation) {
            log::debug!(
                "[gen {generation}] {asset_ref}: discarded, current is gen {}",
                self.tracker.generation()
            );
            return None;
        }
        self.finish(generation, result)
    }

    fn fail_if_loading(&mut self) -> Option<LoadEvent> {
        if self.tracker.state() != AssetLoadState::Loading {
            return None;
        }
        self.finish(
            self.tracker.generation(),
            Err(AssetLoadError::WorkerUnavailable),
        )
    }

    fn finish(
        &mut self,
        generation: u64,
        result: Result<ResolvedAsset, AssetLoadError>,
    ) -> Option<LoadEvent> {
        if !self.tracker.settle(generation, result.is_ok()) {
            return None;
        }
        match result {
            Ok(asset) => {
                log::debug!("[gen {generation}] ready");
                self.resolved = Some(asset.clone());
                Some(LoadEvent::Ready { generation, asset })
            }
            Err(error) => {
                log::warn!("[gen {generation}] {error}");
                self.error = Some(error.clone());
                Some(LoadEvent::Failed { generation, error })
            }
        }
    }

    /// Worker main loop: fetch + parse the latest queued request.
    fn thread_loop(
        mut source: Box<dyn AssetSource>,
        request_rx: &mpsc::Receiver<WorkerRequest>,
        result_tx: &mpsc::Sender<LoadOutcome>,
    ) {
        while let Ok(request) = request_rx.recv() {
            match drain_latest(request, request_rx) {
                WorkerRequest::Shutdown => break,
                WorkerRequest::Load {
                    generation,
                    asset_ref,
                } => {
                    let result = source.fetch(&asset_ref).and_then(|bytes| {
                        LoadedScene::from_gltf_with_source(
                            &asset_ref,
                            &bytes,
                            source.as_mut(),
                        )
                    });
                    let outcome = LoadOutcome {
                        generation,
                        asset_ref,
                        result,
                    };
                    if result_tx.send(outcome).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain queued requests, keeping only the latest. A queued shutdown is
/// never replaced.
fn drain_latest(
    initial: WorkerRequest,
    rx: &mpsc::Receiver<WorkerRequest>,
) -> WorkerRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if matches!(latest, WorkerRequest::Shutdown) {
            continue;
        }
        if let WorkerRequest::Load {
            generation,
            asset_ref,
        } = &latest
        {
            log::debug!("[gen {generation}] {asset_ref}: superseded before start");
        }
        latest = newer;
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::asset::fixtures::{triangle_bin, TRIANGLE_GLTF, TRIANGLE_GLTF_EXTERNAL};
    use crate::asset::source::MemorySource;

    const WAIT: Duration = Duration::from_secs(5);

    /// Serves fixtures; references with a gate block until it is released.
    struct GatedSource {
        assets: HashMap<String, Vec<u8>>,
        gates: HashMap<String, mpsc::Receiver<()>>,
    }

    impl AssetSource for GatedSource {
        fn fetch(&mut self, asset_ref: &str) -> Result<Vec<u8>, AssetLoadError> {
            if let Some(gate) = self.gates.remove(asset_ref) {
                let _ = gate.recv();
            }
            self.assets
                .get(asset_ref)
                .cloned()
                .ok_or_else(|| AssetLoadError::fetch(asset_ref, "not found"))
        }
    }

    fn gated(gated_ref: &str, refs: &[&str]) -> (AssetLoader, mpsc::Sender<()>) {
        let (release, gate) = mpsc::channel();
        let source = GatedSource {
            assets: refs
                .iter()
                .map(|r| ((*r).to_owned(), TRIANGLE_GLTF.as_bytes().to_vec()))
                .collect(),
            gates: HashMap::from([(gated_ref.to_owned(), gate)]),
        };
        (AssetLoader::new(Box::new(source)).unwrap(), release)
    }

    fn memory_loader() -> AssetLoader {
        let source = MemorySource::new()
            .with_asset("a.gltf", TRIANGLE_GLTF)
            .with_asset("b.gltf", TRIANGLE_GLTF)
            .with_asset("broken.glb", b"nope".to_vec());
        AssetLoader::new(Box::new(source)).unwrap()
    }

    fn scene_ref(event: &LoadEvent) -> &str {
        match event {
            LoadEvent::Ready {
                asset: ResolvedAsset::Scene(scene),
                ..
            } => &scene.asset_ref,
            other => panic!("expected a scene, got {other:?}"),
        }
    }

    #[test]
    fn tracker_accepts_only_the_latest_generation() {
        let mut tracker = LoadTracker::default();
        let a = tracker.begin();
        let b = tracker.begin();

        // B settles first, then A: A must be ignored.
        assert!(tracker.settle(b, true));
        assert!(!tracker.settle(a, false));
        assert_eq!(tracker.state(), AssetLoadState::Ready);

        // A then B: A ignored, B applied.
        let c = tracker.begin();
        let d = tracker.begin();
        assert!(!tracker.settle(c, true));
        assert_eq!(tracker.state(), AssetLoadState::Loading);
        assert!(tracker.settle(d, false));
        assert_eq!(tracker.state(), AssetLoadState::Failed);
    }

    #[test]
    fn tracker_ignores_double_settlement() {
        let mut tracker = LoadTracker::default();
        let g = tracker.begin();
        assert!(tracker.settle(g, true));
        assert!(!tracker.settle(g, false));
        assert_eq!(tracker.state(), AssetLoadState::Ready);
    }

    #[test]
    fn flat_images_resolve_without_fetching() {
        let mut loader = AssetLoader::new(Box::new(MemorySource::new())).unwrap();
        let ticket = loader.request("https://example.org/skeleton.png");
        assert_eq!(ticket.state, AssetLoadState::Ready);
        assert_eq!(
            loader.resolved(),
            Some(&ResolvedAsset::FlatImage(
                "https://example.org/skeleton.png".to_owned()
            ))
        );
    }

    #[test]
    fn scene_loads_then_hits_cache() {
        let mut loader = memory_loader();
        assert_eq!(loader.state(), AssetLoadState::Idle);

        let ticket = loader.request("a.gltf");
        assert_eq!(ticket.state, AssetLoadState::Loading);
        let event = loader.wait(WAIT).unwrap();
        assert_eq!(scene_ref(&event), "a.gltf");
        assert!(loader.is_cached("a.gltf"));

        let _ = loader.request("b.gltf");
        let _ = loader.wait(WAIT).unwrap();
        let ticket = loader.request("a.gltf");
        assert_eq!(ticket.state, AssetLoadState::Ready);
        assert!(loader.poll().is_none());
    }

    #[test]
    fn gltf_with_external_buffer_loads_through_the_same_source() {
        let source = MemorySource::new()
            .with_asset("models/tri.gltf", TRIANGLE_GLTF_EXTERNAL)
            .with_asset("models/tri.bin", triangle_bin());
        let mut loader = AssetLoader::new(Box::new(source)).unwrap();

        let _ = loader.request("models/tri.gltf");
        let event = loader.wait(WAIT).unwrap();
        assert_eq!(scene_ref(&event), "models/tri.gltf");
        assert_eq!(loader.state(), AssetLoadState::Ready);
        match loader.resolved() {
            Some(ResolvedAsset::Scene(scene)) => assert_eq!(scene.vertex_count(), 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_external_buffer_is_a_fetch_failure() {
        let source =
            MemorySource::new().with_asset("models/tri.gltf", TRIANGLE_GLTF_EXTERNAL);
        let mut loader = AssetLoader::new(Box::new(source)).unwrap();

        let _ = loader.request("models/tri.gltf");
        let event = loader.wait(WAIT).unwrap();
        assert!(matches!(event, LoadEvent::Failed { .. }));
        assert!(matches!(loader.error(), Some(AssetLoadError::Fetch { .. })));
    }

    #[test]
    fn parse_failure_moves_to_failed() {
        let mut loader = memory_loader();
        let _ = loader.request("broken.glb");
        let event = loader.wait(WAIT).unwrap();
        assert!(matches!(event, LoadEvent::Failed { .. }));
        assert_eq!(loader.state(), AssetLoadState::Failed);
        assert!(matches!(loader.error(), Some(AssetLoadError::Parse { .. })));
        assert!(loader.resolved().is_none());
    }

    #[test]
    fn switch_while_loading_ends_on_the_newer_request() {
        let (mut loader, release) = gated("a.gltf", &["a.gltf", "b.gltf"]);
        let a = loader.request("a.gltf");
        let b = loader.request("b.gltf");
        assert!(b.generation > a.generation);

        release.send(()).unwrap();
        let event = loader.wait(WAIT).unwrap();
        assert_eq!(scene_ref(&event), "b.gltf");
        assert_eq!(loader.current_ref(), Some("b.gltf"));
        assert_eq!(loader.state(), AssetLoadState::Ready);
    }

    #[test]
    fn late_completion_of_older_load_is_discarded() {
        let (mut loader, release) = gated("a.gltf", &["a.gltf", "b.gltf"]);

        // Warm the cache with B (A is gated, so load B first).
        let _ = loader.request("b.gltf");
        let _ = loader.wait(WAIT).unwrap();

        // A goes in flight, then B resolves instantly from cache.
        let _ = loader.request("a.gltf");
        let b = loader.request("b.gltf");
        assert_eq!(b.state, AssetLoadState::Ready);

        // A finishes afterwards and must not replace B.
        release.send(()).unwrap();
        let deadline = Instant::now() + WAIT;
        while !loader.is_cached("a.gltf") && Instant::now() < deadline {
            assert!(loader.poll().is_none());
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(loader.is_cached("a.gltf"));
        assert_eq!(loader.state(), AssetLoadState::Ready);
        match loader.resolved() {
            Some(ResolvedAsset::Scene(scene)) => {
                assert_eq!(scene.asset_ref, "b.gltf");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
