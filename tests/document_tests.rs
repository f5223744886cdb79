//! Document Compilation Tests
//!
//! Tests for:
//! - Node construction: ids, groups, transforms, hierarchy
//! - `<animation>` elements defined before and after the nodes using them
//! - Style driven animations through `<style>` rules and `@keyframes`
//! - Deferred shader materials delivered on update
//! - Runtime attribute changes

use std::sync::Arc;

use parking_lot::Mutex;

use prism::assets::io::{FetchCallback, SourceFetcher};
use prism::document::Document;
use prism::errors::PrismError;
use prism::markup::Element;
use prism::resources::material::{Material, ShaderKind};
use prism::scene::NodeHandle;

const EPSILON: f32 = 1e-3;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct ManualFetcher {
    pending: Mutex<Vec<(String, FetchCallback)>>,
}

impl ManualFetcher {
    fn succeed(&self, url: &str) {
        let callback = {
            let mut pending = self.pending.lock();
            let index = pending
                .iter()
                .position(|(u, _)| u == url)
                .unwrap_or_else(|| panic!("no pending fetch for {url}"));
            pending.remove(index).1
        };
        callback(Ok(format!("// {url}")));
    }
}

impl SourceFetcher for ManualFetcher {
    fn fetch_text(&self, url: &str, on_done: FetchCallback) {
        self.pending.lock().push((url.to_string(), on_done));
    }
}

fn document() -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    Document::new(Arc::new(ManualFetcher::default()))
}

fn keyframe(time: &str, value: &str) -> Element {
    Element::new("keyframe").with_attr("time", time).with_attr("value", value)
}

fn slide_animation() -> Element {
    Element::new("animation")
        .with_attr("id", "slide")
        .with_attr("duration", "1s")
        .with_child(keyframe("0%", "x:0"))
        .with_child(keyframe("100%", "x:10"))
}

fn fade_animation() -> Element {
    let material_frame = |time: &str, value: &str| keyframe(time, value).with_attr("property", "material");
    Element::new("animation")
        .with_attr("id", "fade")
        .with_child(material_frame("0%", "opacity: 1"))
        .with_child(material_frame("100%", "opacity: 0"))
}

fn node(doc: &Document, id: &str) -> NodeHandle {
    doc.node_by_id(id).unwrap_or_else(|| panic!("node `{id}` missing"))
}

fn position_x(doc: &Document, id: &str) -> f32 {
    doc.scene().get_node(node(doc, id)).expect("node").transform.position.x
}

// ============================================================================
// Nodes
// ============================================================================

#[test]
fn elements_become_nodes() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(
            Element::new("group")
                .with_attr("id", "rig")
                .with_attr("transform", "x:5")
                .with_child(Element::new("cube").with_attr("id", "box").with_attr("transform", "x:1 sy:2")),
        )
        .with_child(Element::new("script").with_attr("id", "vs").with_text("void main() {}"))
        .with_child(Element::new("keyframe"));

    doc.compile(&root).expect("compile");
    assert_eq!(doc.scene().nodes.len(), 2, "script and stray keyframe build nothing");

    let rig = doc.scene().get_node(node(&doc, "rig")).expect("rig");
    assert!(rig.visuals.is_empty(), "groups carry no visual");

    let cube = doc.scene().get_node(node(&doc, "box")).expect("box");
    assert_eq!(cube.parent(), Some(node(&doc, "rig")));
    assert_eq!(cube.visuals.len(), 1);
    assert_eq!(cube.mesh_material().map(|m| m.kind), Some(ShaderKind::Basic));
    assert!(approx(cube.transform.scale.y, 2.0));

    doc.update(0.0);
    let world = doc.scene().get_node(node(&doc, "box")).expect("box").world_matrix();
    assert!(approx(world.translation.x, 6.0));
}

#[test]
fn styles_apply_to_nodes_built_before_the_style_element() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(Element::new("sphere").with_attr("id", "ball"))
        .with_child(Element::new("style").with_text("#ball { shader: phong; color-diffuse: #0000ff; opacity: 0.5 }"));

    doc.compile(&root).expect("compile");
    let ball = doc.scene().get_node(node(&doc, "ball")).expect("ball");
    let material = ball.mesh_material().expect("mesh material");
    assert_eq!(material.kind, ShaderKind::Phong);
    assert!(approx(material.color.z, 1.0));
    assert!(approx(material.opacity, 0.5));
}

// ============================================================================
// Animation Elements
// ============================================================================

#[test]
fn animation_defined_before_node_binds_immediately() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(slide_animation())
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("animation", "slide"));

    doc.compile(&root).expect("compile");
    assert!(doc.animations().contains("slide"));
    assert_eq!(doc.scene().animators_of(node(&doc, "box")).count(), 1);

    doc.update(500.0);
    assert!(approx(position_x(&doc, "box"), 5.0));
}

#[test]
fn animation_defined_after_node_binds_on_registration() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(Element::new("cube").with_attr("id", "early").with_attr("animation", "slide"))
        .with_child(Element::new("cube").with_attr("id", "also").with_attr("animation", "slide"))
        .with_child(slide_animation());

    doc.compile(&root).expect("compile");
    assert!(doc.unresolved_animations().is_empty());
    assert_eq!(doc.scene().animators_of(node(&doc, "early")).count(), 1);
    assert_eq!(doc.scene().animators_of(node(&doc, "also")).count(), 1);

    doc.update(250.0);
    assert!(approx(position_x(&doc, "early"), 2.5));
    assert!(approx(position_x(&doc, "also"), 2.5));
}

#[test]
fn one_shot_animation_holds_final_value() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(slide_animation())
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("animation", "slide"));
    doc.compile(&root).expect("compile");

    doc.update(1500.0);
    assert!(approx(position_x(&doc, "box"), 10.0));
    let running = doc.scene().animators_of(node(&doc, "box")).any(|a| a.is_running());
    assert!(!running);
}

#[test]
fn undefined_animation_is_reported() {
    let mut doc = document();
    let root = Element::new("scene").with_child(Element::new("cube").with_attr("animation", "ghost"));

    doc.compile(&root).expect("compile");
    assert_eq!(doc.unresolved_animations(), ["ghost"]);
}

#[test]
fn material_animation_on_group_is_an_error() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(fade_animation())
        .with_child(Element::new("group").with_attr("animation", "fade"));

    let err = doc.compile(&root).expect_err("groups have no material");
    assert!(matches!(err, PrismError::MissingTarget { .. }));
}

#[test]
fn deferred_material_animation_on_group_is_an_error() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(Element::new("group").with_attr("id", "rig").with_attr("animation", "fade"))
        .with_child(fade_animation());

    let err = doc.compile(&root).expect_err("groups have no material");
    assert!(matches!(err, PrismError::MissingTarget { .. }));
    assert_eq!(doc.scene().animators_of(node(&doc, "rig")).count(), 0);
}

#[test]
fn deferred_failure_still_binds_other_waiting_nodes() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(Element::new("group").with_attr("id", "rig").with_attr("animation", "fade"))
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("animation", "fade"))
        .with_child(fade_animation());

    assert!(doc.compile(&root).is_err());
    assert_eq!(doc.scene().animators_of(node(&doc, "box")).count(), 1);
    assert!(doc.animations().contains("fade"));
    assert!(doc.unresolved_animations().is_empty());
}

#[test]
fn material_animation_fades_opacity() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(fade_animation())
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("animation", "fade"));
    doc.compile(&root).expect("compile");

    doc.update(250.0);
    let material = doc
        .scene()
        .get_node(node(&doc, "box"))
        .and_then(|n| n.mesh_material())
        .expect("mesh material");
    assert!(approx(material.opacity, 0.75));
}

// ============================================================================
// Style Animations
// ============================================================================

#[test]
fn style_shorthand_drives_keyframes() {
    let mut doc = document();
    let css = ".spin { animation: turn 2s linear 0s infinite }
               @keyframes turn { from { transform: rz:0 } to { transform: rz:90deg } }";
    let root = Element::new("scene")
        .with_child(Element::new("style").with_text(css))
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("class", "spin"));
    doc.compile(&root).expect("compile");

    let animator = doc
        .scene()
        .animators_of(node(&doc, "box"))
        .next()
        .expect("animator bound from style");
    assert!(animator.looping);
    assert!(approx(animator.duration, 2000.0));

    doc.update(1000.0);
    let rz = doc
        .scene()
        .get_node(node(&doc, "box"))
        .expect("box")
        .transform
        .rotation_euler()
        .z;
    assert!(approx(rz, 45_f32.to_radians()));

    // Wraps around instead of stopping.
    doc.update(1500.0);
    assert!(doc.scene().animators_of(node(&doc, "box")).all(|a| a.is_running()));
}

#[test]
fn animation_attribute_wins_over_style() {
    let mut doc = document();
    let css = "#box { animation: turn 1s } @keyframes turn { from { transform: rz:0 } to { transform: rz:1 } }";
    doc.add_style_sheet(css);
    let root = Element::new("scene")
        .with_child(slide_animation())
        .with_child(Element::new("cube").with_attr("id", "box").with_attr("animation", "slide"));
    doc.compile(&root).expect("compile");

    doc.update(500.0);
    let cube = doc.scene().get_node(node(&doc, "box")).expect("box");
    assert!(approx(cube.transform.position.x, 5.0));
    assert!(approx(cube.transform.rotation_euler().z, 0.0));
}

// ============================================================================
// Shader Materials
// ============================================================================

#[test]
fn fetched_shader_material_arrives_on_update() {
    let _ = env_logger::builder().is_test(true).try_init();
    let fetcher = Arc::new(ManualFetcher::default());
    let mut doc = Document::new(fetcher.clone());
    let css = ".glow { shader-vertex: url(glow.vs); shader-fragment: url(glow.fs); shader-uniforms: k f 1 }";
    let root = Element::new("scene")
        .with_child(Element::new("style").with_text(css))
        .with_child(Element::new("plane").with_attr("id", "a").with_attr("class", "glow"))
        .with_child(Element::new("plane").with_attr("id", "b").with_attr("class", "glow"));
    doc.compile(&root).expect("compile");

    let material_of = |doc: &Document, id: &str| {
        doc.scene()
            .get_node(node(doc, id))
            .and_then(|n| n.visuals.first())
            .and_then(|v| v.material.clone())
    };
    assert!(material_of(&doc, "a").is_none(), "still loading");

    fetcher.succeed("glow.vs");
    fetcher.succeed("glow.fs");
    assert!(material_of(&doc, "a").is_none(), "applied on the next update");

    doc.update(16.0);
    let (Some(Material::Shader(a)), Some(Material::Shader(b))) = (material_of(&doc, "a"), material_of(&doc, "b")) else {
        panic!("both nodes should carry the shader material");
    };
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.vertex_shader, "// glow.vs");
}

// ============================================================================
// Runtime Attributes
// ============================================================================

#[test]
fn set_attribute_updates_diffuse_color() {
    let mut doc = document();
    let root = Element::new("scene")
        .with_child(Element::new("cube").with_attr("id", "box"))
        .with_child(Element::new("group").with_attr("id", "rig"));
    doc.compile(&root).expect("compile");
    let cube = node(&doc, "box");

    doc.set_attribute(cube, "color-diffuse", "#00ff00").expect("set");
    let color = doc.scene().get_node(cube).and_then(|n| n.mesh_material()).expect("material").color;
    assert!(approx(color.x, 0.0) && approx(color.y, 1.0) && approx(color.z, 0.0));

    doc.set_attribute(cube, "color-diffuse", "not-a-color").expect("ignored");
    doc.set_attribute(cube, "opacity", "0.1").expect("ignored");
    let material = doc.scene().get_node(cube).and_then(|n| n.mesh_material()).expect("material");
    assert!(approx(material.color.y, 1.0));
    assert!(approx(material.opacity, 1.0));

    let err = doc
        .set_attribute(node(&doc, "rig"), "color-diffuse", "red")
        .expect_err("groups have no material");
    assert!(matches!(err, PrismError::MissingTarget { .. }));
}
