//! Document compiler.
//!
//! A [`Document`] owns everything one compiled markup tree needs: the scene
//! graph, the style sheet, the animation registry and the material factory.
//! Nothing is process-wide, so several documents can live side by side.
//!
//! # Element handling
//!
//! | element | effect |
//! |---|---|
//! | `<style>` | text parsed into the style sheet (before any node is built) |
//! | `<animation id=..>` | built from `<keyframe>` children and registered |
//! | `<keyframe>`, `<script>` | skipped outside an animation |
//! | `<group>` | node without a visual |
//! | anything else | node with a visual whose material comes from the style |
//!
//! A node element with an `animation` attribute is bound to that animation
//! as soon as it is registered, whether it is defined before or after the
//! node. Without the attribute, an `animation` style property naming a
//! `@keyframes` block is used.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut doc = Document::with_http(DocumentSettings::default())?;
//! doc.compile(&root)?;
//! loop {
//!     doc.update(16.0);
//! }
//! ```

use std::sync::Arc;

use crate::animation::{AnimationRegistry, AnimationSystem, Binder, parse_animation_element, parse_animation_style};
use crate::animation::TargetPath;
use crate::assets::{MaterialFactory, MaterialOutcome, ShaderCallback, SourceFetcher};
use crate::errors::{PrismError, Result};
use crate::markup::{Element, StyleMap, StyleSheet, parse_transform};
use crate::resources::material::Material;
use crate::resources::shader::ShaderMaterial;
use crate::scene::{Node, NodeHandle, Scene, Visual};
use crate::settings::DocumentSettings;
use crate::utils::color::parse_color;

/// A shader material finished loading for a node.
#[derive(Debug, Clone)]
pub struct MaterialReady {
    pub node: NodeHandle,
    pub material: Arc<ShaderMaterial>,
}

pub struct Document {
    scene: Scene,
    styles: StyleSheet,
    animations: AnimationRegistry<Scene>,
    materials: MaterialFactory,
    settings: DocumentSettings,

    ready_tx: flume::Sender<MaterialReady>,
    ready_rx: flume::Receiver<MaterialReady>,
}

impl Document {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self::with_settings(fetcher, DocumentSettings::default())
    }

    #[must_use]
    pub fn with_settings(fetcher: Arc<dyn SourceFetcher>, settings: DocumentSettings) -> Self {
        let (ready_tx, ready_rx) = flume::unbounded();
        Self {
            scene: Scene::new(),
            styles: StyleSheet::new(),
            animations: AnimationRegistry::new(),
            materials: MaterialFactory::new(fetcher),
            settings,
            ready_tx,
            ready_rx,
        }
    }

    /// A document fetching shader sources over HTTP, relative to
    /// `settings.base_url`.
    #[cfg(feature = "http")]
    pub fn with_http(settings: DocumentSettings) -> Result<Self> {
        use crate::assets::HttpSourceFetcher;

        let fetcher = match &settings.base_url {
            Some(base) => HttpSourceFetcher::with_base_url(base)?,
            None => HttpSourceFetcher::new(),
        };
        Ok(Self::with_settings(Arc::new(fetcher), settings))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    #[must_use]
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    #[inline]
    #[must_use]
    pub fn animations(&self) -> &AnimationRegistry<Scene> {
        &self.animations
    }

    #[inline]
    #[must_use]
    pub fn materials(&self) -> &MaterialFactory {
        &self.materials
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &DocumentSettings {
        &self.settings
    }

    /// The node built for the element with this id.
    #[must_use]
    pub fn node_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.scene.find_node_by_name(id)
    }

    /// Animation ids referenced by nodes but never defined.
    #[must_use]
    pub fn unresolved_animations(&self) -> Vec<&str> {
        self.animations.unresolved_ids()
    }

    // ========================================================================
    // Compilation
    // ========================================================================

    /// Adds a style sheet. Later sheets override earlier rules.
    pub fn add_style_sheet(&mut self, css: &str) {
        self.styles.merge(StyleSheet::parse(css));
    }

    /// Compiles the children of `root` into the scene.
    ///
    /// Binding failures abort compilation, whether the animation was defined
    /// before the node or bound later when its `<animation>` element is
    /// reached.
    pub fn compile(&mut self, root: &Element) -> Result<()> {
        self.collect_styles(root);
        for child in root.children() {
            self.compile_element(child, None, root)?;
        }
        log::debug!(
            "Compiled document: {} node(s), {} animation(s)",
            self.scene.nodes.len(),
            self.animations.len()
        );
        Ok(())
    }

    fn collect_styles(&mut self, element: &Element) {
        for child in element.children() {
            if child.tag_name() == "style" {
                self.add_style_sheet(child.text());
            } else {
                self.collect_styles(child);
            }
        }
    }

    fn compile_element(&mut self, element: &Element, parent: Option<NodeHandle>, root: &Element) -> Result<()> {
        match element.tag_name() {
            "style" | "keyframe" | "script" => Ok(()),
            "animation" => self.define_animation(element),
            tag => {
                let handle = self.create_node(element, parent, root, tag != "group")?;
                for child in element.children() {
                    self.compile_element(child, Some(handle), root)?;
                }
                Ok(())
            }
        }
    }

    /// Builds and registers an `<animation>` element, binding every node
    /// that was waiting for it.
    ///
    /// Every waiting node is bound even if one fails; the first binding
    /// error is returned.
    pub fn define_animation(&mut self, element: &Element) -> Result<()> {
        let record = parse_animation_element(element, &self.settings.animation);
        let Some(id) = element.id() else {
            log::warn!("Ignoring <animation> without an id");
            return Ok(());
        };
        self.animations.register(id, record, &mut self.scene)?;
        Ok(())
    }

    fn create_node(
        &mut self,
        element: &Element,
        parent: Option<NodeHandle>,
        root: &Element,
        with_visual: bool,
    ) -> Result<NodeHandle> {
        let style = self.styles.resolve(element);

        let mut node = Node::new(element.id().unwrap_or(element.tag_name()));
        if let Some(transform) = element.attribute("transform") {
            node.transform.apply_components(&parse_transform(transform));
        }

        let handle = match parent {
            Some(parent) => self.scene.add_to_parent(node, parent),
            None => self.scene.add_node(node),
        };

        if with_visual {
            let material = self.create_material(handle, &style, root);
            if let Some(node) = self.scene.get_node_mut(handle) {
                node.visuals.push(Visual { material });
            }
        }

        self.attach_animation(element, &style, handle)?;
        Ok(handle)
    }

    fn create_material(&self, node: NodeHandle, style: &StyleMap, root: &Element) -> Option<Material> {
        let tx = self.ready_tx.clone();
        let on_ready: ShaderCallback = Box::new(move |material| {
            // The receiver lives as long as the document.
            let _ = tx.send(MaterialReady { node, material });
        });

        let style = (!style.is_empty()).then_some(style);
        match self.materials.create(style, root, on_ready) {
            MaterialOutcome::Ready(material) => Some(material),
            MaterialOutcome::Pending => {
                log::debug!("Material for node {node:?} is loading");
                None
            }
            MaterialOutcome::Unavailable => None,
        }
    }

    /// Binds the animation an element asks for to `node`.
    pub fn attach_animation(&mut self, element: &Element, style: &StyleMap, node: NodeHandle) -> Result<()> {
        if let Some(id) = element.attribute("animation") {
            if let Some(record) = self.animations.lookup(id) {
                Binder::bind(&mut self.scene, node, &record)?;
                return Ok(());
            }

            log::debug!("Animation `{id}` not defined yet, deferring binding of {node:?}");
            return self.animations.on_available(id, &mut self.scene, move |scene, record| {
                Binder::bind(scene, node, record).map(|_| ())
            });
        }

        if let Some(record) = parse_animation_style(style, &self.styles, &self.settings.animation) {
            Binder::bind(&mut self.scene, node, &record)?;
        }
        Ok(())
    }

    /// Applies a runtime attribute change to a compiled node. Only
    /// `color-diffuse` is live; other attributes are ignored.
    pub fn set_attribute(&mut self, node: NodeHandle, name: &str, value: &str) -> Result<()> {
        let target = self.scene.get_node_mut(node).ok_or(PrismError::NodeNotFound(node))?;

        match name {
            "color-diffuse" => {
                let Some(color) = parse_color(value) else {
                    log::warn!("Invalid color `{value}` for `{name}`");
                    return Ok(());
                };
                let material = target.mesh_material_mut().ok_or(PrismError::MissingTarget {
                    node,
                    target: TargetPath::Color,
                })?;
                material.set_color(color);
            }
            _ => log::debug!("Attribute `{name}` has no live effect"),
        }
        Ok(())
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Applies materials that finished loading, advances animators by `dt`
    /// milliseconds and refreshes world matrices.
    pub fn update(&mut self, dt: f32) {
        for ready in self.ready_rx.try_iter() {
            match self.scene.get_node_mut(ready.node) {
                Some(node) => node.set_material(Material::Shader(ready.material)),
                None => log::warn!("Node {:?} removed before its material loaded", ready.node),
            }
        }

        AnimationSystem::update(&mut self.scene, dt);
        self.scene.update_matrix_world();
    }
}
