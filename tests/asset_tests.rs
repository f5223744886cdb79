//! Shader Asset Tests
//!
//! Tests for:
//! - ShaderCache: one fetch pair per key, shared material, ordered callbacks
//! - Fetch failures: callbacks kept, in-flight flag cleared, retry
//! - Cancellation and the future based API
//! - MaterialFactory: built-in kinds, inline shader sources, URL sources

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use prism::assets::io::{FetchCallback, SourceFetcher};
use prism::assets::material_factory::{MaterialFactory, MaterialOutcome};
use prism::assets::shader_cache::{ShaderCache, ShaderCallback, ShaderKey};
use prism::errors::{PrismError, Result};
use prism::markup::{Element, StyleMap};
use prism::resources::material::{Material, ShaderKind};
use prism::resources::shader::{ShaderMaterial, UniformValue, Uniforms};

// ============================================================================
// Helpers
// ============================================================================

/// Holds fetches until the test completes them.
#[derive(Default)]
struct ManualFetcher {
    issued: AtomicUsize,
    pending: Mutex<Vec<(String, FetchCallback)>>,
}

impl ManualFetcher {
    fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    fn complete(&self, url: &str, result: Result<String>) {
        let callback = {
            let mut pending = self.pending.lock();
            let index = pending
                .iter()
                .position(|(u, _)| u == url)
                .unwrap_or_else(|| panic!("no pending fetch for {url}"));
            pending.remove(index).1
        };
        callback(result);
    }

    fn succeed(&self, url: &str) {
        self.complete(url, Ok(format!("// source of {url}")));
    }
}

impl SourceFetcher for ManualFetcher {
    fn fetch_text(&self, url: &str, on_done: FetchCallback) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().push((url.to_string(), on_done));
    }
}

/// Answers every fetch synchronously.
struct ImmediateFetcher;

impl SourceFetcher for ImmediateFetcher {
    fn fetch_text(&self, url: &str, on_done: FetchCallback) {
        on_done(Ok(format!("// {url}")));
    }
}

type Received = Arc<Mutex<Vec<(u32, Arc<ShaderMaterial>)>>>;

fn recorder(received: &Received, tag: u32) -> ShaderCallback {
    let received = Arc::clone(received);
    Box::new(move |material| received.lock().push((tag, material)))
}

fn manual_cache() -> (Arc<ManualFetcher>, ShaderCache) {
    let fetcher = Arc::new(ManualFetcher::default());
    let cache = ShaderCache::new(fetcher.clone());
    (fetcher, cache)
}

fn water_key() -> ShaderKey {
    ShaderKey::new("water.vs", "water.fs")
}

// ============================================================================
// ShaderCache
// ============================================================================

#[test]
fn concurrent_requests_share_one_fetch_pair() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();

    assert!(cache.request(water_key(), Uniforms::default(), recorder(&received, 1)).is_none());
    assert!(cache.request(water_key(), Uniforms::default(), recorder(&received, 2)).is_none());
    assert_eq!(fetcher.issued(), 2, "exactly one vertex + fragment pair");
    assert!(cache.is_loading(&water_key()));

    fetcher.succeed("water.vs");
    assert!(received.lock().is_empty(), "waits for the fragment source");

    fetcher.succeed("water.fs");
    let received = received.lock();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].0, 1);
    assert_eq!(received[1].0, 2);
    assert!(Arc::ptr_eq(&received[0].1, &received[1].1));
    assert!(!cache.is_loading(&water_key()));
}

#[test]
fn fragment_may_arrive_first() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    let mut uniforms = Uniforms::default();
    uniforms.insert("time".into(), UniformValue::Float(0.0));

    cache.request(water_key(), uniforms, recorder(&received, 1));
    fetcher.succeed("water.fs");
    fetcher.succeed("water.vs");

    let material = cache.get(&water_key()).expect("compiled");
    assert_eq!(material.vertex_shader, "// source of water.vs");
    assert_eq!(material.fragment_shader, "// source of water.fs");
    assert_eq!(material.uniforms.get("time"), Some(&UniformValue::Float(0.0)));
    assert_eq!(received.lock().len(), 1);
}

#[test]
fn cached_material_is_returned_synchronously() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    cache.request(water_key(), Uniforms::default(), recorder(&received, 1));
    fetcher.succeed("water.vs");
    fetcher.succeed("water.fs");

    let cached = cache
        .request(water_key(), Uniforms::default(), recorder(&received, 2))
        .expect("cached");
    assert_eq!(fetcher.issued(), 2, "no new fetches");
    assert!(Arc::ptr_eq(&cached, &received.lock()[0].1));
    assert_eq!(received.lock().len(), 1, "callback not invoked for a cache hit");
}

#[test]
fn keys_are_structured_pairs() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    cache.request(ShaderKey::new("ab", "c"), Uniforms::default(), recorder(&received, 1));
    cache.request(ShaderKey::new("a", "bc"), Uniforms::default(), recorder(&received, 2));
    assert_eq!(fetcher.issued(), 4, "no collision between ab+c and a+bc");
}

#[test]
fn failed_fetch_keeps_callbacks_and_allows_retry() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    cache.request(water_key(), Uniforms::default(), recorder(&received, 1));

    fetcher.succeed("water.vs");
    fetcher.complete(
        "water.fs",
        Err(PrismError::HttpResponse {
            url: "water.fs".into(),
            status: 404,
        }),
    );

    assert!(cache.get(&water_key()).is_none(), "no partial completion");
    assert!(!cache.is_loading(&water_key()));
    assert_eq!(cache.pending_count(&water_key()), 1);
    assert!(received.lock().is_empty());

    cache.request(water_key(), Uniforms::default(), recorder(&received, 2));
    assert_eq!(fetcher.issued(), 4, "retry issues a new pair");

    fetcher.succeed("water.vs");
    fetcher.succeed("water.fs");
    let tags: Vec<u32> = received.lock().iter().map(|(tag, _)| *tag).collect();
    assert_eq!(tags, [1, 2]);
}

#[test]
fn completion_of_an_abandoned_pair_is_ignored() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    cache.request(water_key(), Uniforms::default(), recorder(&received, 1));

    fetcher.complete(
        "water.vs",
        Err(PrismError::Fetch {
            url: "water.vs".into(),
            message: "connection reset".into(),
        }),
    );
    // The fragment of the failed pair arrives late.
    fetcher.succeed("water.fs");
    assert!(!cache.is_loading(&water_key()));
    assert!(cache.get(&water_key()).is_none());
}

#[test]
fn cancel_drops_waiting_callbacks() {
    let (fetcher, cache) = manual_cache();
    let received = Received::default();
    cache.request(water_key(), Uniforms::default(), recorder(&received, 1));
    cache.request(water_key(), Uniforms::default(), recorder(&received, 2));

    assert_eq!(cache.cancel(&water_key()), 2);
    fetcher.succeed("water.vs");
    fetcher.succeed("water.fs");

    assert!(received.lock().is_empty());
    assert!(cache.get(&water_key()).is_some(), "the in-flight pair still completes");
}

#[test]
fn request_async_resolves() {
    let cache = ShaderCache::new(Arc::new(ImmediateFetcher));
    let material = pollster::block_on(cache.request_async(water_key(), Uniforms::default())).expect("material");
    assert_eq!(material.vertex_shader, "// water.vs");

    let again = pollster::block_on(cache.request_async(water_key(), Uniforms::default())).expect("material");
    assert!(Arc::ptr_eq(&material, &again));
}

#[test]
fn request_async_reports_cancellation() {
    let (_fetcher, cache) = manual_cache();
    pollster::block_on(async {
        let mut request = std::pin::pin!(cache.request_async(water_key(), Uniforms::default()));
        assert!(futures::poll!(request.as_mut()).is_pending());

        assert_eq!(cache.cancel(&water_key()), 1);
        let err = request.await.expect_err("cancelled");
        assert!(matches!(err, PrismError::Cancelled(_)));
    });
}

// ============================================================================
// MaterialFactory
// ============================================================================

fn no_callback() -> ShaderCallback {
    Box::new(|_| panic!("unexpected shader callback"))
}

#[test]
fn factory_without_style_is_basic() {
    let factory = MaterialFactory::new(Arc::new(ImmediateFetcher));
    let outcome = factory.create(None, &Element::new("scene"), no_callback());
    let material = outcome.into_material().expect("ready");
    assert_eq!(material.as_mesh().map(|m| m.kind), Some(ShaderKind::Basic));
}

#[test]
fn factory_selects_builtin_kind() {
    let factory = MaterialFactory::new(Arc::new(ImmediateFetcher));
    let style = StyleMap::parse_declarations("shader: lambert; color-diffuse: red");
    let material = factory
        .create(Some(&style), &Element::new("scene"), no_callback())
        .into_material()
        .expect("ready");
    let mesh = material.as_mesh().expect("mesh");
    assert_eq!(mesh.kind, ShaderKind::Lambert);
    assert_eq!(mesh.color.x, 1.0);
}

#[test]
fn factory_needs_all_three_shader_keys() {
    let factory = MaterialFactory::new(Arc::new(ImmediateFetcher));
    let style = StyleMap::parse_declarations("shader-vertex: url(a.vs); shader-fragment: url(a.fs)");
    let material = factory
        .create(Some(&style), &Element::new("scene"), no_callback())
        .into_material()
        .expect("ready");
    assert_eq!(material.as_mesh().map(|m| m.kind), Some(ShaderKind::Basic));
}

#[test]
fn factory_inline_sources_by_element_id() {
    let factory = MaterialFactory::new(Arc::new(ImmediateFetcher));
    let root = Element::new("scene")
        .with_child(Element::new("script").with_attr("id", "vs").with_text("void main() {}"))
        .with_child(Element::new("script").with_attr("id", "fs").with_text("void main() { }"));
    let style = StyleMap::parse_declarations(
        "shader-vertex: vs; shader-fragment: fs; shader-uniforms: speed f 2; envmap: url(sky.jpg)",
    );

    let outcome = factory.create(Some(&style), &root, no_callback());
    let Some(Material::Shader(shader)) = outcome.into_material() else {
        panic!("expected an inline shader material");
    };
    assert_eq!(shader.vertex_shader, "void main() {}");
    assert_eq!(shader.uniforms.get("speed"), Some(&UniformValue::Float(2.0)));
}

#[test]
fn factory_missing_inline_source_is_unavailable() {
    let factory = MaterialFactory::new(Arc::new(ImmediateFetcher));
    let style = StyleMap::parse_declarations("shader-vertex: vs; shader-fragment: fs; shader-uniforms: t f 1");
    let outcome = factory.create(Some(&style), &Element::new("scene"), no_callback());
    assert!(matches!(outcome, MaterialOutcome::Unavailable));
}

#[test]
fn factory_url_sources_go_through_cache() {
    let fetcher = Arc::new(ManualFetcher::default());
    let factory = MaterialFactory::new(fetcher.clone());
    let received = Received::default();
    let style = StyleMap::parse_declarations(
        "shader-vertex: url(glow.vs); shader-fragment: url(glow.fs); shader-uniforms: glow f 0.5",
    );
    let root = Element::new("scene");

    assert!(matches!(
        factory.create(Some(&style), &root, recorder(&received, 1)),
        MaterialOutcome::Pending
    ));
    assert!(matches!(
        factory.create(Some(&style), &root, recorder(&received, 2)),
        MaterialOutcome::Pending
    ));
    assert_eq!(fetcher.issued(), 2);

    fetcher.succeed("glow.vs");
    fetcher.succeed("glow.fs");
    assert_eq!(received.lock().len(), 2);

    let ready = factory.create(Some(&style), &root, no_callback());
    let Some(Material::Shader(shader)) = ready.into_material() else {
        panic!("expected the cached shader material");
    };
    assert!(Arc::ptr_eq(&shader, &received.lock()[0].1));
    assert!(factory.shader_cache().get(&ShaderKey::new("glow.vs", "glow.fs")).is_some());
}
