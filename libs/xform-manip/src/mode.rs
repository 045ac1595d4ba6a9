//! Manipulation modes and the spaces a delta can be expressed in.

use std::fmt;

use serde::{Deserialize, Serialize};

use xform_ops::OperationKind;

/// What kind of edit a manipulator applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManipMode {
    /// Translation edits
    Translate,
    /// Rotation edits
    Rotate,
    /// Scale edits
    Scale,
}

impl ManipMode {
    /// The mode a tool would pick for an operation kind.
    ///
    /// Matrix operations are ambiguous and default to translation.
    ///
    /// # Examples
    /// ```
    /// use xform_manip::ManipMode;
    /// use xform_ops::OperationKind;
    /// assert_eq!(ManipMode::guess(OperationKind::Orient), ManipMode::Rotate);
    /// assert_eq!(ManipMode::guess(OperationKind::Matrix), ManipMode::Translate);
    /// ```
    pub fn guess(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Translate | OperationKind::Matrix => ManipMode::Translate,
            OperationKind::Scale => ManipMode::Scale,
            _ => ManipMode::Rotate,
        }
    }

    /// True when an operation of `kind` can be edited in this mode.
    pub fn supports(self, kind: OperationKind) -> bool {
        match self {
            ManipMode::Translate => {
                matches!(kind, OperationKind::Translate | OperationKind::Matrix)
            }
            ManipMode::Scale => matches!(kind, OperationKind::Scale | OperationKind::Matrix),
            ManipMode::Rotate => kind.is_rotation() || kind == OperationKind::Matrix,
        }
    }
}

impl fmt::Display for ManipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ManipMode::Translate => "translate",
            ManipMode::Rotate => "rotate",
            ManipMode::Scale => "scale",
        })
    }
}

/// Coordinate space a delta is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Space {
    /// The operation's own parametrization
    Transform,
    /// The frame formed by the ops before this one on the same stack
    Parent,
    /// The ancestor world frame composed with the ops before this one
    World,
    /// The frame formed by the ops after this one (object space)
    PostTransform,
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Space::Transform => "transform",
            Space::Parent => "parent",
            Space::World => "world",
            Space::PostTransform => "post-transform",
        })
    }
}
