//! The meaning-representation tree.
//!
//! An [`MrTree`] is a mutable tree of typed nodes and literals, each an
//! instance of a vocabulary meaning. Nodes live in arena storage keyed by
//! [`NodeId`]; ids are unique and monotonically increasing for the lifetime
//! of a tree, so diagnostics and graph output can rely on them even after
//! subtrees are replaced. Every insertion is validated against the
//! vocabulary: a child must be the field's declared type or a subtype of it,
//! and raw literals only go into literal-typed fields (or `*ANY`).

mod error;
mod text;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub use error::TreeError;

use crate::vocabulary::{FieldId, FieldType, MeaningId, Vocabulary};

/// Handle to a node in an [`MrTree`].
///
/// Ids are never reused within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Stable numeric form, for diagnostics and graph output.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug)]
enum NodeKind {
    Typed {
        ty: MeaningId,
        children: BTreeMap<FieldId, NodeId>,
    },
    Str(String),
    Int(i64),
}

/// A mutable tree of meaning instances.
///
/// All node-taking methods panic if handed a [`NodeId`] that does not
/// belong to this tree (for example one left over from a deleted subtree).
#[derive(Debug, Default)]
pub struct MrTree {
    nodes: HashMap<NodeId, Node>,
    root: Option<NodeId>,
    next_id: u64,
}

impl MrTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[&id]
    }

    /// Whether the id currently names a node of this tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Replaces the whole tree with a fresh root of the given type.
    ///
    /// The previous root and all its descendants are discarded.
    pub fn set_root(&mut self, ty: MeaningId) -> NodeId {
        self.nodes.clear();
        let id = self.alloc(Node {
            parent: None,
            kind: NodeKind::Typed {
                ty,
                children: BTreeMap::new(),
            },
        });
        self.root = Some(id);
        id
    }

    /// Discards the root and all nodes.
    pub fn clear_root(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// The meaning a node instantiates, or `None` for literals.
    pub fn node_type(&self, id: NodeId) -> Option<MeaningId> {
        match &self.node(id).kind {
            NodeKind::Typed { ty, .. } => Some(*ty),
            NodeKind::Str(_) | NodeKind::Int(_) => None,
        }
    }

    /// Whether the node is a string or integer literal.
    pub fn is_literal(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Str(_) | NodeKind::Int(_))
    }

    /// Whether the node is a string literal.
    pub fn is_string_literal(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Str(_))
    }

    /// Whether the node is an integer literal.
    pub fn is_int_literal(&self, id: NodeId) -> bool {
        matches!(self.node(id).kind, NodeKind::Int(_))
    }

    /// The literal value as text, or `None` for typed nodes.
    pub fn literal_value(&self, id: NodeId) -> Option<String> {
        match &self.node(id).kind {
            NodeKind::Str(value) => Some(value.clone()),
            NodeKind::Int(value) => Some(value.to_string()),
            NodeKind::Typed { .. } => None,
        }
    }

    /// The parent node. `None` at the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The child stored under a field. Absence is not an error: callers
    /// decide whether an unfilled field is meaningful.
    pub fn child(&self, id: NodeId, field: FieldId) -> Option<NodeId> {
        match &self.node(id).kind {
            NodeKind::Typed { children, .. } => children.get(&field).copied(),
            NodeKind::Str(_) | NodeKind::Int(_) => None,
        }
    }

    /// The child under the field labelled `label` in `language`, resolving
    /// the label through the node type's supertype chain.
    pub fn child_by_label(
        &self,
        id: NodeId,
        label: &str,
        language: &str,
        vocab: &Vocabulary,
    ) -> Option<NodeId> {
        let ty = self.node_type(id)?;
        let field = vocab.field_of_opt(ty, label, language)?;
        self.child(id, field)
    }

    /// The fields of a node that currently hold a child, in field order.
    pub fn used_fields(&self, id: NodeId) -> Vec<FieldId> {
        match &self.node(id).kind {
            NodeKind::Typed { children, .. } => children.keys().copied().collect(),
            NodeKind::Str(_) | NodeKind::Int(_) => Vec::new(),
        }
    }

    /// The field of the parent this node sits in. `None` at the root.
    pub fn parent_field(&self, id: NodeId) -> Option<FieldId> {
        let parent = self.node(id).parent?;
        self.containing_field(parent, id)
    }

    /// The field of `id` (if any) holding `child`.
    pub fn containing_field(&self, id: NodeId, child: NodeId) -> Option<FieldId> {
        match &self.node(id).kind {
            NodeKind::Typed { children, .. } => children
                .iter()
                .find(|(_, held)| **held == child)
                .map(|(field, _)| *field),
            NodeKind::Str(_) | NodeKind::Int(_) => None,
        }
    }

    /// Attaches a typed child under a field, validating the subtype rule.
    pub fn add_typed_child(
        &mut self,
        parent: NodeId,
        field: FieldId,
        ty: MeaningId,
        vocab: &Vocabulary,
    ) -> Result<NodeId, TreeError> {
        let declared = vocab.field_type(field);
        if declared.is_literal() {
            return Err(TreeError::LiteralField {
                label: vocab.display_label(field, ""),
            });
        }
        if !vocab.matches_field_type(ty, declared) {
            return Err(TreeError::Typing {
                child: vocab.display_name(ty, ""),
                field_type: vocab.display_field_type(declared, ""),
                label: vocab.display_label(field, ""),
            });
        }
        let child = Node {
            parent: Some(parent),
            kind: NodeKind::Typed {
                ty,
                children: BTreeMap::new(),
            },
        };
        self.attach(parent, field, child)
    }

    /// Attaches a string literal under a `*STRING` or `*ANY` field.
    pub fn add_string_child(
        &mut self,
        parent: NodeId,
        field: FieldId,
        value: impl Into<String>,
        vocab: &Vocabulary,
    ) -> Result<NodeId, TreeError> {
        let declared = vocab.field_type(field);
        if !declared.is_string() && !declared.is_any() {
            return Err(TreeError::Typing {
                child: "a string literal".to_string(),
                field_type: vocab.display_field_type(declared, ""),
                label: vocab.display_label(field, ""),
            });
        }
        let child = Node {
            parent: Some(parent),
            kind: NodeKind::Str(value.into()),
        };
        self.attach(parent, field, child)
    }

    /// Attaches an integer literal under a `*INT` or `*ANY` field.
    pub fn add_int_child(
        &mut self,
        parent: NodeId,
        field: FieldId,
        value: i64,
        vocab: &Vocabulary,
    ) -> Result<NodeId, TreeError> {
        let declared = vocab.field_type(field);
        if !declared.is_int() && !declared.is_any() {
            return Err(TreeError::Typing {
                child: "an integer literal".to_string(),
                field_type: vocab.display_field_type(declared, ""),
                label: vocab.display_label(field, ""),
            });
        }
        let child = Node {
            parent: Some(parent),
            kind: NodeKind::Int(value),
        };
        self.attach(parent, field, child)
    }

    /// Attaches a child described as label and value text, the way the tree
    /// text format does. Literal-ness comes from the field's declared type,
    /// never from the value's own shape.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: &str,
        value: &str,
        language: &str,
        vocab: &Vocabulary,
    ) -> Result<NodeId, TreeError> {
        let Some(parent_ty) = self.node_type(parent) else {
            return Err(TreeError::LiteralParent);
        };
        let field = vocab.field_of(parent_ty, label, language)?;
        match vocab.field_type(field) {
            FieldType::Str => self.add_string_child(parent, field, unquote(value), vocab),
            FieldType::Int => {
                let parsed = parse_int(value)?;
                self.add_int_child(parent, field, parsed, vocab)
            }
            FieldType::Any => {
                // *ANY admits raw literals as well as any concrete type
                if value.starts_with('"') {
                    self.add_string_child(parent, field, unquote(value), vocab)
                } else if let Ok(parsed) = value.parse::<i64>() {
                    self.add_int_child(parent, field, parsed, vocab)
                } else {
                    let ty = vocab.lookup(value, language)?;
                    self.add_typed_child(parent, field, ty, vocab)
                }
            }
            FieldType::Meaning(_) => {
                let ty = vocab.lookup(value, language)?;
                self.add_typed_child(parent, field, ty, vocab)
            }
        }
    }

    fn attach(
        &mut self,
        parent: NodeId,
        field: FieldId,
        child: Node,
    ) -> Result<NodeId, TreeError> {
        if !matches!(self.node(parent).kind, NodeKind::Typed { .. }) {
            return Err(TreeError::LiteralParent);
        }
        let id = self.alloc(child);
        let mut replaced = None;
        if let Some(node) = self.nodes.get_mut(&parent)
            && let NodeKind::Typed { children, .. } = &mut node.kind
        {
            replaced = children.insert(field, id);
        }
        if let Some(old) = replaced {
            self.discard(old);
        }
        Ok(id)
    }

    /// Overwrites a literal node's value. Integer literals parse the text.
    pub fn set_literal_value(&mut self, id: NodeId, value: &str) -> Result<(), TreeError> {
        let parsed = match &self.node(id).kind {
            NodeKind::Typed { .. } => return Err(TreeError::NotALiteral),
            NodeKind::Str(_) => NodeKind::Str(value.to_string()),
            NodeKind::Int(_) => NodeKind::Int(parse_int(value)?),
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.kind = parsed;
        }
        Ok(())
    }

    /// Detaches the child under a field and discards its subtree.
    ///
    /// Returns whether a child was removed.
    pub fn delete_child(&mut self, parent: NodeId, field: FieldId) -> bool {
        let removed = match self.nodes.get_mut(&parent) {
            Some(node) => match &mut node.kind {
                NodeKind::Typed { children, .. } => children.remove(&field),
                NodeKind::Str(_) | NodeKind::Int(_) => None,
            },
            None => None,
        };
        match removed {
            Some(child) => {
                self.discard(child);
                true
            }
            None => false,
        }
    }

    fn discard(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current)
                && let NodeKind::Typed { children, .. } = node.kind
            {
                stack.extend(children.into_values());
            }
        }
    }

    /// The width this subtree occupies in a box layout: one unit per leaf,
    /// plus a spare unit at the selected node to reserve room for its
    /// unfilled fields. A pure query, for layout consumers.
    pub fn tree_width(&self, id: NodeId, selected: Option<NodeId>) -> usize {
        let mut width = match &self.node(id).kind {
            NodeKind::Typed { children, .. } if !children.is_empty() => children
                .values()
                .map(|child| self.tree_width(*child, selected))
                .sum(),
            _ => 1,
        };
        if selected == Some(id) {
            width += 1;
        }
        width
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int(value: &str) -> Result<i64, TreeError> {
    value.parse().map_err(|_| TreeError::NotAnInt {
        value: value.to_string(),
    })
}
