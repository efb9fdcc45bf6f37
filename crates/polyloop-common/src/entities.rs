//! Typed node and edge records for the assembled knowledge graphs.
//! One attribute struct per node kind; an entity's kind is the variant of its attributes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placeholder rendered for a chemical whose display name is absent.
pub const MISSING_NAME: &str = "???";

/// Label drawn on every hierarchy edge.
pub const IS_A_LABEL: &str = "is-a";

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Chemical,
    Reaction,
    Publication,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Chemical    => "chemical",
            NodeKind::Reaction    => "reaction",
            NodeKind::Publication => "publication",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// chemical → reaction
    SubstrateOf,
    /// reaction → chemical
    ProductOf,
    /// chemical → reaction
    ReagentOf,
    /// child → parent
    IsA,
    /// citing → cited
    Cites,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::SubstrateOf => "substrate_of",
            RelationKind::ProductOf   => "product_of",
            RelationKind::ReagentOf   => "reagent_of",
            RelationKind::IsA         => "is_a",
            RelationKind::Cites       => "cites",
        }
    }
}

// ---------------------------------------------------------------------------
// Per-kind attributes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChemicalAttrs {
    pub name: Option<String>,
    /// Local structure image, when one was resolved.
    pub image: Option<PathBuf>,
    /// Member of the highlight set.
    pub highlighted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReactionAttrs {
    /// Reaction method / type text from the reaction table.
    pub method: Option<String>,
    /// `"{method} ({contributors})"` segments folded from the conditions table.
    pub condition_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PublicationAttrs {
    pub title: String,
    pub year: i32,
    /// Contributor surnames, display order.
    pub professors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeAttrs {
    Chemical(ChemicalAttrs),
    Reaction(ReactionAttrs),
    Publication(PublicationAttrs),
}

impl NodeAttrs {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeAttrs::Chemical(_)    => NodeKind::Chemical,
            NodeAttrs::Reaction(_)    => NodeKind::Reaction,
            NodeAttrs::Publication(_) => NodeKind::Publication,
        }
    }

    /// Merge `incoming` into `self`: last write wins for scalars, set union
    /// for label-contributing collections. Returns false when the kinds differ,
    /// in which case `incoming` replaces `self` wholesale.
    pub fn merge(&mut self, incoming: NodeAttrs) -> bool {
        match (self, incoming) {
            (NodeAttrs::Chemical(cur), NodeAttrs::Chemical(new)) => {
                if new.name.is_some() {
                    cur.name = new.name;
                }
                if new.image.is_some() {
                    cur.image = new.image;
                }
                cur.highlighted = new.highlighted;
                true
            }
            (NodeAttrs::Reaction(cur), NodeAttrs::Reaction(new)) => {
                if new.method.is_some() {
                    cur.method = new.method;
                }
                union_into(&mut cur.condition_groups, new.condition_groups);
                true
            }
            (NodeAttrs::Publication(cur), NodeAttrs::Publication(new)) => {
                cur.title = new.title;
                cur.year = new.year;
                union_into(&mut cur.professors, new.professors);
                true
            }
            (slot, new) => {
                *slot = new;
                false
            }
        }
    }
}

fn union_into(target: &mut Vec<String>, incoming: Vec<String>) {
    for item in incoming {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

// ---------------------------------------------------------------------------
// Entity / Relation
// ---------------------------------------------------------------------------

/// A graph node: identifier plus typed attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: String,
    pub attrs: NodeAttrs,
    /// Render-time label replacing the derived one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
}

impl Entity {
    pub fn new(id: impl Into<String>, attrs: NodeAttrs) -> Self {
        Self { id: id.into(), attrs, display_label: None }
    }

    pub fn kind(&self) -> NodeKind {
        self.attrs.kind()
    }

    /// Human-readable label: the override if set, otherwise derived from attributes.
    pub fn label(&self) -> String {
        if let Some(ref label) = self.display_label {
            return label.clone();
        }
        match &self.attrs {
            NodeAttrs::Chemical(c) => c
                .name
                .clone()
                .unwrap_or_else(|| MISSING_NAME.to_string()),
            NodeAttrs::Reaction(r) => {
                let mut parts: Vec<&str> = Vec::new();
                if let Some(ref method) = r.method {
                    parts.push(method);
                }
                parts.extend(r.condition_groups.iter().map(String::as_str));
                parts.join("\n")
            }
            NodeAttrs::Publication(p) => {
                format!("{}\n{} ({})", p.title, p.professors.join(", "), p.year)
            }
        }
    }

    pub fn as_publication(&self) -> Option<&PublicationAttrs> {
        match &self.attrs {
            NodeAttrs::Publication(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_chemical(&self) -> Option<&ChemicalAttrs> {
        match &self.attrs {
            NodeAttrs::Chemical(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_reaction(&self) -> Option<&ReactionAttrs> {
        match &self.attrs {
            NodeAttrs::Reaction(r) => Some(r),
            _ => None,
        }
    }
}

/// A directed, typed graph edge. Identity is (source, target, kind).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub kind: RelationKind,
    pub label: Option<String>,
}

impl Relation {
    pub fn new(kind: RelationKind) -> Self {
        Self { kind, label: None }
    }

    pub fn labelled(kind: RelationKind, label: impl Into<String>) -> Self {
        Self { kind, label: Some(label.into()) }
    }
}
