//! Captured element tree
//!
//! A snapshot is stored as an arena: every node keeps its parent as an index
//! and its children as an ordered list of indices. Nodes are only ever added
//! under a node that already exists, so the tree is acyclic by construction
//! and parent/child links are always consistent.

use crate::rule::MissingData;
use crate::types::{ControlType, PatternId, PropertyId, Rect, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_SNAPSHOT: AtomicU64 = AtomicU64::new(1);

/// Error while building a tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unknown parent handle {0}")]
    UnknownParent(usize),

    #[error("Handle {handle} belongs to another builder")]
    ForeignHandle { handle: usize },
}

/// Identity of an element, unique across snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementId {
    pub snapshot: u64,
    pub index: u32,
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.snapshot, self.index)
    }
}

/// Element description handed over by the capture layer
#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub control_type: ControlType,
    pub properties: BTreeMap<PropertyId, Value>,
    pub patterns: BTreeSet<PatternId>,
    pub children: Vec<ElementData>,
}

impl ElementData {
    pub fn new(control_type: ControlType) -> Self {
        Self {
            control_type,
            properties: BTreeMap::new(),
            patterns: BTreeSet::new(),
            children: Vec::new(),
        }
    }

    /// Set a property value. `ControlType` sets the control type itself;
    /// any other value for it is ignored.
    pub fn with_property(mut self, id: PropertyId, value: impl Into<Value>) -> Self {
        match (id, value.into()) {
            (PropertyId::ControlType, Value::ControlType(control_type)) => {
                self.control_type = control_type;
            }
            (PropertyId::ControlType, other) => {
                log::warn!("Ignoring non control type value {} for ControlType", other);
            }
            (id, value) => {
                self.properties.insert(id, value);
            }
        }
        self
    }

    pub fn with_name(self, name: &str) -> Self {
        self.with_property(PropertyId::Name, name)
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.with_property(PropertyId::BoundingRectangle, rect)
    }

    /// Mark the element as keyboard focusable
    pub fn focusable(self) -> Self {
        self.with_property(PropertyId::IsKeyboardFocusable, true)
    }

    pub fn with_pattern(mut self, pattern: PatternId) -> Self {
        self.patterns.insert(pattern);
        self
    }

    pub fn with_patterns(mut self, patterns: &[PatternId]) -> Self {
        self.patterns.extend(patterns.iter().copied());
        self
    }

    /// Append a child description
    pub fn with_child(mut self, child: ElementData) -> Self {
        self.children.push(child);
        self
    }
}

impl Drop for ElementData {
    // flatten so deeply nested descriptions do not drop recursively
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

#[derive(Debug)]
struct Node {
    control_type: ControlType,
    properties: BTreeMap<PropertyId, Value>,
    patterns: BTreeSet<PatternId>,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Handle to a node inside a [`TreeBuilder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle {
    snapshot: u64,
    index: usize,
}

/// Incremental tree construction for capture layers
#[derive(Debug)]
pub struct TreeBuilder {
    snapshot: u64,
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Start a tree with its root element. Children in `root` are ignored;
    /// add them with [`TreeBuilder::add_child`].
    pub fn new(root: ElementData) -> (Self, NodeHandle) {
        let snapshot = NEXT_SNAPSHOT.fetch_add(1, Ordering::Relaxed);
        let mut builder = Self {
            snapshot,
            nodes: Vec::new(),
        };
        builder.push(root, None);
        (builder, NodeHandle { snapshot, index: 0 })
    }

    /// Add `data` as the last child of `parent`
    pub fn add_child(
        &mut self,
        parent: NodeHandle,
        data: ElementData,
    ) -> Result<NodeHandle, TreeError> {
        if parent.snapshot != self.snapshot {
            return Err(TreeError::ForeignHandle {
                handle: parent.index,
            });
        }
        if parent.index >= self.nodes.len() {
            return Err(TreeError::UnknownParent(parent.index));
        }
        let index = self.push(data, Some(parent.index));
        self.nodes[parent.index].children.push(index);
        Ok(NodeHandle {
            snapshot: self.snapshot,
            index,
        })
    }

    /// Add `data` and all its nested children under `parent`, in pre-order
    pub fn add_subtree(
        &mut self,
        parent: NodeHandle,
        mut data: ElementData,
    ) -> Result<NodeHandle, TreeError> {
        let children = std::mem::take(&mut data.children);
        let handle = self.add_child(parent, data)?;

        let mut pending: Vec<(NodeHandle, ElementData)> =
            children.into_iter().rev().map(|c| (handle, c)).collect();
        while let Some((parent, mut data)) = pending.pop() {
            let children = std::mem::take(&mut data.children);
            let child = self.add_child(parent, data)?;
            pending.extend(children.into_iter().rev().map(|c| (child, c)));
        }

        Ok(handle)
    }

    fn push(&mut self, mut data: ElementData, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        let mut properties = std::mem::take(&mut data.properties);
        properties.remove(&PropertyId::ControlType);
        self.nodes.push(Node {
            control_type: data.control_type,
            properties,
            patterns: std::mem::take(&mut data.patterns),
            parent,
            children: Vec::new(),
        });
        index
    }

    /// Freeze the tree
    pub fn build(self) -> ElementTree {
        ElementTree {
            snapshot: self.snapshot,
            nodes: self.nodes,
        }
    }
}

/// An immutable captured element tree
#[derive(Debug)]
pub struct ElementTree {
    snapshot: u64,
    nodes: Vec<Node>,
}

impl ElementTree {
    /// Build a tree from a nested description (pre-order indices)
    pub fn from_root(mut root: ElementData) -> Self {
        let children = std::mem::take(&mut root.children);
        let (mut builder, handle) = TreeBuilder::new(root);
        for child in children {
            // handle was issued by this builder, so add_subtree cannot fail
            if let Err(e) = builder.add_subtree(handle, child) {
                log::error!("Failed to attach child: {}", e);
            }
        }
        builder.build()
    }

    pub fn root(&self) -> Element<'_> {
        Element {
            tree: self,
            index: 0,
        }
    }

    /// Snapshot number shared by every id in this tree
    pub fn snapshot(&self) -> u64 {
        self.snapshot
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up an element by id
    pub fn get(&self, id: ElementId) -> Option<Element<'_>> {
        if id.snapshot != self.snapshot {
            return None;
        }
        let index = id.index as usize;
        (index < self.nodes.len()).then_some(Element { tree: self, index })
    }

    /// All elements in pre-order
    pub fn iter(&self) -> impl Iterator<Item = Element<'_>> + '_ {
        std::iter::once(self.root()).chain(self.root().descendants())
    }
}

/// Borrowed view of one element of an [`ElementTree`]
#[derive(Clone, Copy)]
pub struct Element<'t> {
    tree: &'t ElementTree,
    index: usize,
}

impl<'t> Element<'t> {
    fn node(&self) -> &'t Node {
        &self.tree.nodes[self.index]
    }

    fn at(&self, index: usize) -> Element<'t> {
        Element {
            tree: self.tree,
            index,
        }
    }

    pub fn id(&self) -> ElementId {
        ElementId {
            snapshot: self.tree.snapshot,
            index: self.index as u32,
        }
    }

    /// Tree this element belongs to
    pub fn tree(&self) -> &'t ElementTree {
        self.tree
    }

    pub fn control_type(&self) -> ControlType {
        self.node().control_type
    }

    /// Property value, `None` when the property was not captured.
    /// The control type is read with [`Element::control_type`].
    pub fn property(&self, id: PropertyId) -> Option<&'t Value> {
        self.node().properties.get(&id)
    }

    /// Property value, or [`MissingData`] naming the absent property
    pub fn require(&self, id: PropertyId) -> Result<&'t Value, MissingData> {
        self.property(id).ok_or(MissingData::Absent(id))
    }

    /// String property, or [`MissingData`] if absent or not a string
    pub fn require_str(&self, id: PropertyId) -> Result<&'t str, MissingData> {
        self.require(id)?
            .as_str()
            .ok_or(MissingData::WrongType { id, expected: "string" })
    }

    pub fn require_rect(&self) -> Result<Rect, MissingData> {
        let id = PropertyId::BoundingRectangle;
        self.require(id)?
            .as_rect()
            .ok_or(MissingData::WrongType { id, expected: "rectangle" })
    }

    /// Owned property value, including the synthesized `ControlType`
    pub fn property_value(&self, id: PropertyId) -> Option<Value> {
        if id == PropertyId::ControlType {
            return Some(Value::ControlType(self.control_type()));
        }
        self.property(id).cloned()
    }

    pub fn properties(&self) -> &'t BTreeMap<PropertyId, Value> {
        &self.node().properties
    }

    pub fn has_pattern(&self, pattern: PatternId) -> bool {
        self.node().patterns.contains(&pattern)
    }

    pub fn patterns(&self) -> &'t BTreeSet<PatternId> {
        &self.node().patterns
    }

    pub fn name(&self) -> Option<&'t str> {
        self.property(PropertyId::Name).and_then(Value::as_str)
    }

    pub fn bounding_rectangle(&self) -> Option<Rect> {
        self.property(PropertyId::BoundingRectangle)
            .and_then(Value::as_rect)
    }

    /// Boolean property, `None` when absent or not a boolean
    pub fn bool_property(&self, id: PropertyId) -> Option<bool> {
        self.property(id).and_then(Value::as_bool)
    }

    pub fn string_property(&self, id: PropertyId) -> Option<&'t str> {
        self.property(id).and_then(Value::as_str)
    }

    pub fn parent(&self) -> Option<Element<'t>> {
        self.node().parent.map(|i| self.at(i))
    }

    pub fn children(&self) -> impl ExactSizeIterator<Item = Element<'t>> + DoubleEndedIterator + 't {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&index| Element { tree, index })
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self) -> Ancestors<'t> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Descendants in pre-order, excluding self
    pub fn descendants(&self) -> Descendants<'t> {
        let mut stack: Vec<Element<'t>> = self.children().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Other children of this element's parent, in order
    pub fn siblings(&self) -> impl Iterator<Item = Element<'t>> + 't {
        let index = self.index;
        self.parent()
            .into_iter()
            .flat_map(|p| p.children())
            .filter(move |e| e.index != index)
    }

    /// Distance from the root (root = 0)
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Nearest ancestor with the given control type
    pub fn nearest_ancestor_of_type(&self, control_type: ControlType) -> Option<Element<'t>> {
        self.ancestors().find(|a| a.control_type() == control_type)
    }

    /// Elements from the root down to and including self
    pub fn path_from_root(&self) -> Vec<Element<'t>> {
        let mut path: Vec<Element<'t>> = self.ancestors().collect();
        path.reverse();
        path.push(*self);
        path
    }

    /// Short label such as `Button 'OK'`
    pub fn glimpse(&self) -> String {
        match self.name() {
            Some(name) if !name.trim().is_empty() => {
                format!("{} '{}'", self.control_type(), name)
            }
            _ => self.control_type().to_string(),
        }
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Element<'_> {}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("id", &self.id())
            .field("control_type", &self.control_type())
            .field("name", &self.name())
            .finish()
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'t> {
    next: Option<Element<'t>>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = Element<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'t> {
    stack: Vec<Element<'t>>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Element<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children().rev());
        Some(current)
    }
}
