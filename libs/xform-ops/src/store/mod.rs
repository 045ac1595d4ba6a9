//! # Op-Value Store
//!
//! The boundary between the evaluator and whatever scene description owns the
//! transform stacks. [`TransformOpStore`] is the trait the evaluator and
//! manipulator consume; [`InMemoryOpStore`] is a self-contained
//! implementation used by tests and embedding hosts.
//!
//! ## Time Samples
//!
//! Reads at [`TimeCode::Sample`] return the latest sample at or before the
//! requested time, else the earliest sample, else the default value. Samples
//! are held, never interpolated.

use std::collections::HashMap;
use std::fmt;

use glam::DMat4;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::op::{OpValue, TransformOperation};

// =============================================================================
// HANDLES
// =============================================================================

/// Opaque handle to a node that owns a transform stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The time at which values are read or written.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum TimeCode {
    /// The untimed default value
    #[default]
    Default,
    /// A time sample
    Sample(f64),
}

// =============================================================================
// OP STACK
// =============================================================================

/// Snapshot of a node's ordered operations.
#[derive(Debug, Clone, PartialEq)]
pub struct OpStack {
    /// Owning node
    pub node: NodeId,
    /// Operations in evaluation order
    pub operations: Vec<TransformOperation>,
    /// When set, ancestor transforms do not apply to this node
    pub resets_parent_inheritance: bool,
}

impl OpStack {
    /// Number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// True when the stack has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operation at `index`.
    pub fn get(&self, index: usize) -> Option<&TransformOperation> {
        self.operations.get(index)
    }

    /// Index of the first operation with this exact name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.operations.iter().position(|op| op.name() == name)
    }

    /// Iterates over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, TransformOperation> {
        self.operations.iter()
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Typed access to transform stacks and their values.
///
/// Implementations own the values; callers never cache them across calls.
pub trait TransformOpStore {
    /// The node's operations in evaluation order.
    fn ordered_operations(&self, node: NodeId) -> StoreResult<OpStack>;

    /// The value stored under `name`, or `None` when it was never authored.
    fn operation_value(
        &self,
        node: NodeId,
        name: &str,
        time: TimeCode,
    ) -> StoreResult<Option<OpValue>>;

    /// Writes a value, validating its shape and truncating it to the
    /// operation's precision. Writing the same value twice is a no-op.
    fn set_operation_value(
        &mut self,
        node: NodeId,
        name: &str,
        value: OpValue,
        time: TimeCode,
    ) -> StoreResult<()>;

    /// World frame of the node's parent, stopping at the nearest ancestor
    /// that resets inheritance.
    fn ancestor_world_frame(&self, node: NodeId, time: TimeCode) -> StoreResult<DMat4>;

    /// The node's local transform as a plain product of per-op matrices.
    fn local_transformation(&self, node: NodeId, time: TimeCode) -> StoreResult<DMat4> {
        let stack = self.ordered_operations(node)?;
        let mut frame = DMat4::IDENTITY;
        for op in stack.iter() {
            let value = self.operation_value(node, op.name(), time)?;
            frame *= op.matrix(value.as_ref());
        }
        Ok(frame)
    }
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Attribute {
    default: Option<OpValue>,
    /// Sorted by time
    samples: Vec<(f64, OpValue)>,
}

impl Attribute {
    fn get(&self, time: TimeCode) -> Option<OpValue> {
        match time {
            TimeCode::Default => self.default,
            TimeCode::Sample(t) => self
                .samples
                .iter()
                .rev()
                .find(|(at, _)| *at <= t)
                .or_else(|| self.samples.first())
                .map(|(_, v)| *v)
                .or(self.default),
        }
    }

    fn set(&mut self, time: TimeCode, value: OpValue) {
        match time {
            TimeCode::Default => self.default = Some(value),
            TimeCode::Sample(t) => {
                match self.samples.binary_search_by(|(at, _)| at.total_cmp(&t)) {
                    Ok(i) => self.samples[i].1 = value,
                    Err(i) => self.samples.insert(i, (t, value)),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    parent: Option<NodeId>,
    operations: Vec<TransformOperation>,
    resets_parent_inheritance: bool,
    attributes: HashMap<String, Attribute>,
}

/// A [`TransformOpStore`] that keeps every node in memory.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use xform_ops::{InMemoryOpStore, OpValue, OperationKind, Precision, TimeCode,
///     TransformOpStore, TransformOperation};
///
/// let mut store = InMemoryOpStore::default();
/// let node = store.add_node(None).unwrap();
/// let op = TransformOperation::new(OperationKind::Translate, Precision::Double, None);
/// store.push_operation(node, op.clone()).unwrap();
/// assert_eq!(store.operation_value(node, op.name(), TimeCode::Default).unwrap(), None);
///
/// store.author(node, op.name(), OpValue::Vec3(DVec3::X), TimeCode::Default).unwrap();
/// assert_eq!(
///     store.operation_value(node, op.name(), TimeCode::Default).unwrap(),
///     Some(OpValue::Vec3(DVec3::X))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryOpStore {
    nodes: Vec<NodeData>,
}

impl InMemoryOpStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node under `parent` (or at the root) and returns its handle.
    pub fn add_node(&mut self, parent: Option<NodeId>) -> StoreResult<NodeId> {
        if let Some(parent) = parent {
            self.node(parent)?;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            parent,
            ..NodeData::default()
        });
        Ok(id)
    }

    /// Parent of a node.
    pub fn parent(&self, node: NodeId) -> StoreResult<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    /// Appends an operation to the node's stack and returns its index.
    ///
    /// An inverse operation needs a forward partner of the same kind and name
    /// already on the stack. Forward names must be unique.
    pub fn push_operation(&mut self, node: NodeId, op: TransformOperation) -> StoreResult<usize> {
        let data = self.node_mut(node)?;
        let partner = data
            .operations
            .iter()
            .find(|existing| !existing.is_inverse() && existing.name() == op.name());
        if op.is_inverse() {
            if partner.map(|p| p.kind()) != Some(op.kind()) {
                return Err(StoreError::MissingInversePartner {
                    node,
                    name: op.name().to_string(),
                    kind: op.kind(),
                });
            }
        } else if partner.is_some() {
            return Err(StoreError::DuplicateOperation {
                node,
                name: op.name().to_string(),
            });
        }
        data.operations.push(op);
        Ok(data.operations.len() - 1)
    }

    /// Authors a value on an operation. Equivalent to
    /// [`TransformOpStore::set_operation_value`].
    pub fn author(
        &mut self,
        node: NodeId,
        name: &str,
        value: OpValue,
        time: TimeCode,
    ) -> StoreResult<()> {
        let data = self.node_mut(node)?;
        let op = data
            .operations
            .iter()
            .find(|op| op.name() == name)
            .ok_or_else(|| StoreError::UnknownOperation {
                node,
                name: name.to_string(),
            })?;
        let expected = op.kind().value_shape();
        if value.shape() != expected {
            return Err(StoreError::ValueMismatch {
                name: name.to_string(),
                expected,
                found: value.shape(),
            });
        }
        let value = value.quantized(op.precision());
        trace!("node {node}: {name} <- {value:?} at {time:?}");
        data.attributes
            .entry(name.to_string())
            .or_default()
            .set(time, value);
        Ok(())
    }

    /// Sets whether ancestor transforms apply to this node.
    pub fn set_resets_parent_inheritance(&mut self, node: NodeId, resets: bool) -> StoreResult<()> {
        self.node_mut(node)?.resets_parent_inheritance = resets;
        Ok(())
    }

    fn node(&self, node: NodeId) -> StoreResult<&NodeData> {
        self.nodes
            .get(node.0 as usize)
            .ok_or(StoreError::UnknownNode(node))
    }

    fn node_mut(&mut self, node: NodeId) -> StoreResult<&mut NodeData> {
        self.nodes
            .get_mut(node.0 as usize)
            .ok_or(StoreError::UnknownNode(node))
    }
}

impl TransformOpStore for InMemoryOpStore {
    fn ordered_operations(&self, node: NodeId) -> StoreResult<OpStack> {
        let data = self.node(node)?;
        Ok(OpStack {
            node,
            operations: data.operations.clone(),
            resets_parent_inheritance: data.resets_parent_inheritance,
        })
    }

    fn operation_value(
        &self,
        node: NodeId,
        name: &str,
        time: TimeCode,
    ) -> StoreResult<Option<OpValue>> {
        let data = self.node(node)?;
        if !data.operations.iter().any(|op| op.name() == name) {
            return Err(StoreError::UnknownOperation {
                node,
                name: name.to_string(),
            });
        }
        Ok(data.attributes.get(name).and_then(|attr| attr.get(time)))
    }

    fn set_operation_value(
        &mut self,
        node: NodeId,
        name: &str,
        value: OpValue,
        time: TimeCode,
    ) -> StoreResult<()> {
        self.author(node, name, value, time)
    }

    fn ancestor_world_frame(&self, node: NodeId, time: TimeCode) -> StoreResult<DMat4> {
        let mut frame = DMat4::IDENTITY;
        let mut current = self.node(node)?.parent;
        while let Some(id) = current {
            frame = self.local_transformation(id, time)? * frame;
            let data = self.node(id)?;
            if data.resets_parent_inheritance {
                break;
            }
            current = data.parent;
        }
        Ok(frame)
    }
}
