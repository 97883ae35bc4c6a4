use crate::value::{OptionItem, Path};
use serde::Serialize;
use serde_json::{Map, Value};

/// A leaf control bound to a presentation primitive, ready to be painted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundControl {
    /// The field type tag the control was built for.
    pub kind: String,
    /// The presentation primitive that paints it.
    pub primitive: String,
    pub name: Option<Path>,
    /// The prop the primitive reads its value from (`value`, `checked`, `fileList`).
    pub value_prop: String,
    /// `None` when the model has no value at the field's path.
    pub value: Option<Value>,
    pub disabled: bool,
    pub options: Option<Vec<OptionItem>>,
    /// Everything forwarded to the primitive, caller-supplied props included.
    pub props: Map<String, Value>,
}

/// What an item wraps: an engine-built control or custom content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "content", rename_all = "kebab-case")]
pub enum ItemContent {
    Control(BoundControl),
    Custom { node: Value },
}

/// A field item: a control plus its label and validation-display metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedItem {
    pub name: Path,
    pub label: Option<String>,
    pub tooltip: Option<String>,
    pub extra: Option<String>,
    pub required: bool,
    pub rules: Vec<Value>,
    pub dependencies: Vec<Path>,
    pub props: Map<String, Value>,
    pub content: ItemContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedColumn {
    /// Breakpoint sizing, e.g. `{"xs": 24, "md": 12}`.
    pub layout: Map<String, Value>,
    pub node: ResolvedNode,
}

/// One node of the resolved tree handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum ResolvedNode {
    Item(ResolvedItem),
    /// A control emitted without item chrome (`noItem`).
    Control(BoundControl),
    Custom {
        name: Option<Path>,
        content: Value,
    },
    Row {
        gutter: Value,
        align: Option<String>,
        justify: Option<String>,
        props: Map<String, Value>,
        columns: Vec<ResolvedColumn>,
    },
    Group {
        gap: Value,
        align: Option<String>,
        wrap: bool,
        props: Map<String, Value>,
        children: Vec<ResolvedNode>,
    },
    List {
        gap: Value,
        props: Map<String, Value>,
        children: Vec<ResolvedNode>,
    },
    Section {
        title: Option<String>,
        subtitle: Option<String>,
        card: bool,
        props: Map<String, Value>,
        children: Vec<ResolvedNode>,
    },
    Title {
        text: String,
        subtitle: Option<String>,
        level: u8,
    },
    Divider {
        text: Option<String>,
        dashed: bool,
        orientation: Option<String>,
    },
}

impl ResolvedNode {
    /// Direct children in declaration order.
    pub fn children(&self) -> Vec<&ResolvedNode> {
        match self {
            ResolvedNode::Row { columns, .. } => columns.iter().map(|c| &c.node).collect(),
            ResolvedNode::Group { children, .. }
            | ResolvedNode::List { children, .. }
            | ResolvedNode::Section { children, .. } => children.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Every bound control in this subtree, in declaration order.
    pub fn controls_mut(&mut self) -> Vec<&mut BoundControl> {
        match self {
            ResolvedNode::Item(ResolvedItem {
                content: ItemContent::Control(control),
                ..
            })
            | ResolvedNode::Control(control) => vec![control],
            ResolvedNode::Row { columns, .. } => columns.iter_mut().flat_map(|c| c.node.controls_mut()).collect(),
            ResolvedNode::Group { children, .. }
            | ResolvedNode::List { children, .. }
            | ResolvedNode::Section { children, .. } => {
                children.iter_mut().flat_map(ResolvedNode::controls_mut).collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            ResolvedNode::Item(_) | ResolvedNode::Control(_) | ResolvedNode::Custom { .. }
        )
    }

    /// The model path a leaf is bound to.
    pub fn name(&self) -> Option<&Path> {
        match self {
            ResolvedNode::Item(item) => Some(&item.name),
            ResolvedNode::Control(control) => control.name.as_ref(),
            ResolvedNode::Custom { name, .. } => name.as_ref(),
            _ => None,
        }
    }

    /// The bound control of a leaf, if the engine built one.
    pub fn control(&self) -> Option<&BoundControl> {
        match self {
            ResolvedNode::Item(ResolvedItem {
                content: ItemContent::Control(control),
                ..
            })
            | ResolvedNode::Control(control) => Some(control),
            _ => None,
        }
    }

    /// Collects leaves depth-first, left to right.
    pub fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a ResolvedNode>) {
        if self.is_leaf() {
            leaves.push(self);
        }
        for child in self.children() {
            child.collect_leaves(leaves);
        }
    }
}

/// A descriptor skipped during resolution, reported instead of aborting the pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// The node's tree position, e.g. `0.2.1`.
    pub position: String,
    pub message: String,
}

/// The result of one resolution pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub nodes: Vec<ResolvedNode>,
    /// Dynamic boundaries that were resolved afresh in this pass.
    pub recomputed: Vec<String>,
    /// Dynamic boundaries whose previous output was reused.
    pub reused: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    /// Initial values of visited fields whose path was still undefined.
    #[serde(skip)]
    pub(crate) seeds: Vec<(Path, Value)>,
}

impl Resolution {
    /// All resolved leaves in declaration order.
    pub fn leaves(&self) -> Vec<&ResolvedNode> {
        let mut leaves = Vec::new();
        for node in &self.nodes {
            node.collect_leaves(&mut leaves);
        }
        leaves
    }

    /// Finds the leaf bound to `name`.
    pub fn find(&self, name: impl Into<Path>) -> Option<&ResolvedNode> {
        let name = name.into();
        self.leaves().into_iter().find(|leaf| leaf.name() == Some(&name))
    }

    pub fn leaf_names(&self) -> Vec<String> {
        self.leaves()
            .into_iter()
            .filter_map(|leaf| leaf.name().map(|n| n.to_string()))
            .collect()
    }
}
