//! Rendering collaborator interface.
//!
//! Layout and rasterisation belong to an external graph-drawing engine. This
//! module only turns an assembled graph into the engine's input: a
//! `GraphRenderer` receives a scene and returns bytes; `DotRenderer` emits
//! Graphviz DOT.

use polyloop_common::config::RankDirection;
use polyloop_common::entities::{ChemicalAttrs, Entity, NodeAttrs};
use polyloop_common::{PolyloopError, Result};
use std::fmt::Write;

use crate::graph::{ClusterView, KnowledgeGraph};

/// Everything a renderer needs for one diagram.
#[derive(Debug, Clone, Copy)]
pub struct RenderScene<'a> {
    pub graph: &'a KnowledgeGraph,
    pub clusters: &'a [ClusterView],
    pub direction: RankDirection,
}

impl<'a> RenderScene<'a> {
    pub fn new(graph: &'a KnowledgeGraph) -> Self {
        Self { graph, clusters: &[], direction: RankDirection::default() }
    }

    pub fn with_clusters(mut self, clusters: &'a [ClusterView]) -> Self {
        self.clusters = clusters;
        self
    }

    pub fn with_direction(mut self, direction: RankDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Trait for turning a scene into an image or an engine input document.
pub trait GraphRenderer: Send + Sync {
    /// File extension of the produced artifact.
    fn extension(&self) -> &'static str;

    fn render(&self, scene: &RenderScene<'_>) -> Result<Vec<u8>>;
}

/// Graphviz DOT writer.
#[derive(Debug, Clone)]
pub struct DotRenderer {
    pub font_name: String,
    pub font_size: u32,
    /// Border colour of highlighted chemicals
    pub highlight_color: String,
}

impl Default for DotRenderer {
    fn default() -> Self {
        Self {
            font_name: "Helvetica".to_string(),
            font_size: 16,
            highlight_color: "blue".to_string(),
        }
    }
}

impl DotRenderer {
    pub fn to_dot(&self, scene: &RenderScene<'_>) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_dot(&mut out, scene);
        out
    }

    fn write_dot(&self, out: &mut String, scene: &RenderScene<'_>) -> std::fmt::Result {
        writeln!(out, "digraph {{")?;
        writeln!(out, "\trankdir={};", scene.direction.as_rankdir())?;
        writeln!(
            out,
            "\tnode [fontname={}, fontsize={}];",
            quote(&self.font_name),
            self.font_size
        )?;

        for (i, cluster) in scene.clusters.iter().enumerate() {
            let name = if cluster.name.starts_with("cluster") {
                cluster.name.clone()
            } else {
                format!("cluster_{i}")
            };
            writeln!(out, "\tsubgraph {} {{", quote(&name))?;
            writeln!(out, "\t\tlabel={};", quote(&cluster.label))?;
            writeln!(out, "\t\tcolor={};", quote(&cluster.color))?;
            for member in cluster.members.iter().filter(|m| scene.graph.contains(m)) {
                writeln!(out, "\t\t{};", quote(member))?;
            }
            writeln!(out, "\t}}")?;
        }

        for entity in scene.graph.nodes() {
            writeln!(out, "\t{} [{}];", quote(&entity.id), self.node_attributes(entity))?;
        }

        for (src, dst, relation) in scene.graph.edges() {
            match relation.label.as_deref() {
                Some(label) => writeln!(out, "\t{} -> {} [label={}];", quote(src), quote(dst), quote(label))?,
                None => writeln!(out, "\t{} -> {};", quote(src), quote(dst))?,
            }
        }
        writeln!(out, "}}")
    }

    fn node_attributes(&self, entity: &Entity) -> String {
        let mut attrs = vec![format!("label={}", quote(&entity.label())), "shape=box".to_string()];
        if let NodeAttrs::Chemical(chem) = &entity.attrs {
            attrs.push("labelloc=b".to_string());
            if let Some(ref image) = chem.image {
                attrs.push(format!("image={}", quote(&image.to_string_lossy())));
            }
            if chem.highlighted {
                attrs.push(format!("color={}", quote(&self.highlight_color)));
            }
        }
        attrs.join(", ")
    }
}

impl GraphRenderer for DotRenderer {
    fn extension(&self) -> &'static str {
        "dot"
    }

    /// Fails when a structure image path cannot be written into DOT unchanged.
    fn render(&self, scene: &RenderScene<'_>) -> Result<Vec<u8>> {
        for entity in scene.graph.nodes() {
            if let NodeAttrs::Chemical(ChemicalAttrs { image: Some(image), .. }) = &entity.attrs {
                if image.to_str().is_none() {
                    return Err(PolyloopError::Render(format!(
                        "image path for {} is not valid UTF-8: {}",
                        entity.id,
                        image.display()
                    )));
                }
            }
        }
        Ok(self.to_dot(scene).into_bytes())
    }
}

/// DOT double-quoted string; newlines become centred line breaks.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
