//! Committed writes, returned so a host can assemble its own undo stack.

use serde::{Deserialize, Serialize};

use xform_ops::{NodeId, OpValue, OperationKind, StoreResult, TimeCode, TransformOpStore};

/// One value written to one operation.
///
/// ## Example
///
/// ```rust
/// use glam::DVec3;
/// use xform_manip::Edit;
/// use xform_ops::{NodeId, OpValue, OperationKind, TimeCode};
///
/// let edit = Edit {
///     node: NodeId(0),
///     op_name: "xformOp:translate".to_string(),
///     kind: OperationKind::Translate,
///     time: TimeCode::Default,
///     previous: None,
///     new: OpValue::Vec3(DVec3::X),
/// };
/// // an unset value is restored as the identity
/// assert_eq!(edit.inverse().new, OpValue::Vec3(DVec3::ZERO));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edit {
    /// Node owning the operation
    pub node: NodeId,
    /// Full operation name
    pub op_name: String,
    /// Kind of the operation
    pub kind: OperationKind,
    /// Time the value was written at
    pub time: TimeCode,
    /// Value before the write, `None` when it was never authored
    pub previous: Option<OpValue>,
    /// Value that was written
    pub new: OpValue,
}

impl Edit {
    /// The edit that restores the previous value.
    pub fn inverse(&self) -> Edit {
        Edit {
            node: self.node,
            op_name: self.op_name.clone(),
            kind: self.kind,
            time: self.time,
            previous: Some(self.new),
            new: self.previous.unwrap_or_else(|| self.kind.identity_value()),
        }
    }

    /// Writes the new value to `store`.
    pub fn apply<S: TransformOpStore + ?Sized>(&self, store: &mut S) -> StoreResult<()> {
        store.set_operation_value(self.node, &self.op_name, self.new, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use xform_ops::{InMemoryOpStore, Precision, TransformOperation};

    fn scale_edit(node: NodeId) -> Edit {
        Edit {
            node,
            op_name: "xformOp:scale".to_string(),
            kind: OperationKind::Scale,
            time: TimeCode::Default,
            previous: Some(OpValue::Vec3(DVec3::new(1.0, 2.0, 3.0))),
            new: OpValue::Vec3(DVec3::new(2.0, 4.0, 6.0)),
        }
    }

    /// Test that applying an edit and then its inverse restores the value.
    #[test]
    fn test_apply_and_revert() {
        let mut store = InMemoryOpStore::new();
        let node = store.add_node(None).unwrap();
        let op = TransformOperation::new(OperationKind::Scale, Precision::Double, None);
        store.push_operation(node, op.clone()).unwrap();
        let edit = scale_edit(node);

        edit.apply(&mut store).unwrap();
        let read = |store: &InMemoryOpStore| {
            store
                .operation_value(node, op.name(), TimeCode::Default)
                .unwrap()
        };
        assert_eq!(read(&store), Some(edit.new));
        edit.inverse().apply(&mut store).unwrap();
        assert_eq!(read(&store), edit.previous);
        assert_eq!(edit.inverse().inverse(), edit);
    }

    /// Test that edits survive serialization.
    #[test]
    fn test_serde_round_trip() {
        let edit = scale_edit(NodeId(3));
        let json = serde_json::to_string(&edit).unwrap();
        let back: Edit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, edit);
    }
}
