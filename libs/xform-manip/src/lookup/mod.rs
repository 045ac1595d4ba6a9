//! # Operation Lookup
//!
//! Resolves which operation on a stack a manipulator edits.
//!
//! A tool usually does not know the index of the op it should drive. With
//! [`OpSelector::Primary`] the op is picked per mode:
//!
//! 1. the first op carrying the configured suffix for that mode
//! 2. the first op with one of the canonical unsuffixed names
//! 3. the first matrix op

use log::debug;

use xform_ops::op::OP_NAME_PREFIX;
use xform_ops::{OpStack, OperationKind, RotationOrder};

use crate::error::{ManipulatorError, ManipulatorResult};
use crate::mode::ManipMode;

/// How a manipulator picks its operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpSelector<'a> {
    /// Position on the stack
    Index(usize),
    /// Full operation name, e.g. `xformOp:rotateXYZ:spin`
    Name(&'a str),
    /// The op a host tool would pick for the mode
    Primary(&'a PrimaryOpNames),
}

/// Suffixes and canonical names used by [`OpSelector::Primary`].
///
/// Built once by the host and passed explicitly.
///
/// ## Example
///
/// ```rust
/// use xform_manip::PrimaryOpNames;
/// let names = PrimaryOpNames::default().with_rotate_suffix("spin");
/// assert_eq!(names.rotate_suffix(), Some("spin"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryOpNames {
    translate_suffix: Option<String>,
    rotate_suffix: Option<String>,
    scale_suffix: Option<String>,
    translate_names: Vec<String>,
    rotate_names: Vec<String>,
    scale_names: Vec<String>,
}

impl Default for PrimaryOpNames {
    fn default() -> Self {
        let name = |token: &str| format!("{OP_NAME_PREFIX}:{token}");
        let mut rotate_names = vec![name(OperationKind::Orient.token())];
        rotate_names.extend(
            [OperationKind::RotateX, OperationKind::RotateY, OperationKind::RotateZ]
                .iter()
                .map(|kind| name(kind.token())),
        );
        let orders = RotationOrder::ALL.map(OperationKind::from_order);
        rotate_names.extend(orders.iter().map(|kind| name(kind.token())));
        rotate_names.extend(orders.iter().map(|kind| format!("{}:rotate", name(kind.token()))));

        Self {
            translate_suffix: None,
            rotate_suffix: None,
            scale_suffix: None,
            translate_names: vec![name("translate"), name("translate:translate")],
            rotate_names,
            scale_names: vec![name("scale"), name("scale:scale")],
        }
    }
}

impl PrimaryOpNames {
    /// Prefers ops named `…:<suffix>` for translation.
    pub fn with_translate_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.translate_suffix = non_empty(suffix.into());
        self
    }

    /// Prefers ops named `…:<suffix>` for rotation.
    pub fn with_rotate_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.rotate_suffix = non_empty(suffix.into());
        self
    }

    /// Prefers ops named `…:<suffix>` for scale.
    pub fn with_scale_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.scale_suffix = non_empty(suffix.into());
        self
    }

    /// Configured translation suffix.
    pub fn translate_suffix(&self) -> Option<&str> {
        self.translate_suffix.as_deref()
    }

    /// Configured rotation suffix.
    pub fn rotate_suffix(&self) -> Option<&str> {
        self.rotate_suffix.as_deref()
    }

    /// Configured scale suffix.
    pub fn scale_suffix(&self) -> Option<&str> {
        self.scale_suffix.as_deref()
    }

    fn suffix(&self, mode: ManipMode) -> Option<&str> {
        match mode {
            ManipMode::Translate => self.translate_suffix(),
            ManipMode::Rotate => self.rotate_suffix(),
            ManipMode::Scale => self.scale_suffix(),
        }
    }

    /// Canonical unsuffixed names for a mode, in lookup order.
    pub fn canonical_names(&self, mode: ManipMode) -> &[String] {
        match mode {
            ManipMode::Translate => &self.translate_names,
            ManipMode::Rotate => &self.rotate_names,
            ManipMode::Scale => &self.scale_names,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// True when a suffixed op of `kind` may be picked for `mode`.
fn suffix_candidate(mode: ManipMode, kind: OperationKind) -> bool {
    match mode {
        // a suffixed matrix is never the primary rotation
        ManipMode::Rotate => kind.is_rotation(),
        _ => mode.supports(kind),
    }
}

/// Resolves a selector to an index on `stack`.
///
/// # Errors
///
/// [`ManipulatorError::Unresolvable`] when nothing matches, or when
/// [`OpSelector::Primary`] is used without a mode.
pub fn resolve_op_index(
    stack: &OpStack,
    selector: OpSelector<'_>,
    mode: Option<ManipMode>,
) -> ManipulatorResult<usize> {
    let found = match selector {
        OpSelector::Index(index) => (index < stack.len()).then_some(index),
        OpSelector::Name(name) => stack.position(name),
        OpSelector::Primary(names) => {
            let mode = mode.ok_or_else(|| {
                ManipulatorError::Unresolvable("a primary op needs an explicit mode".to_string())
            })?;
            primary_index(stack, names, mode)
        }
    };
    found.ok_or_else(|| {
        debug!("node {}: no op for {selector:?}", stack.node);
        ManipulatorError::Unresolvable(format!("{selector:?} on node {}", stack.node))
    })
}

fn primary_index(stack: &OpStack, names: &PrimaryOpNames, mode: ManipMode) -> Option<usize> {
    let by_suffix = names.suffix(mode).and_then(|suffix| {
        stack
            .iter()
            .position(|op| op.has_suffix(suffix) && suffix_candidate(mode, op.kind()))
    });
    by_suffix
        .or_else(|| {
            let canonical = names.canonical_names(mode);
            stack
                .iter()
                .position(|op| canonical.iter().any(|name| name == op.name()))
        })
        .or_else(|| stack.iter().position(|op| op.kind() == OperationKind::Matrix))
}
