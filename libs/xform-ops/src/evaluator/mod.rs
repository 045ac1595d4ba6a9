//! # Coordinate Frame Evaluator
//!
//! Computes the cumulative frame of a prefix (or any sub-range) of an op stack.
//!
//! ## Grouping
//!
//! Runs of operations from the same family are folded before they touch the
//! running matrix:
//!
//! - translations are summed
//! - scales multiply componentwise
//! - rotations compose as one quaternion
//!
//! Each run is flushed with a single matrix multiply. Matrix operations flush
//! the pending run and multiply directly. The result equals the plain per-op
//! product that [`TransformOpStore::local_transformation`] computes.

use glam::{DMat4, DQuat, DVec3};
use log::trace;

use crate::error::{EvalError, EvalResult};
use crate::op::OperationKind;
use crate::store::{OpStack, TimeCode, TransformOpStore};

/// A run of same-family operations waiting to be applied.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Empty,
    Translate(DVec3),
    Scale(DVec3),
    Rotate(DQuat),
}

impl Pending {
    fn matrix(self) -> Option<DMat4> {
        match self {
            Pending::Empty => None,
            Pending::Translate(t) => Some(DMat4::from_translation(t)),
            Pending::Scale(s) => Some(DMat4::from_scale(s)),
            Pending::Rotate(q) => Some(DMat4::from_quat(q)),
        }
    }
}

/// Folds ops into a frame, one family run at a time.
struct Accumulator {
    frame: DMat4,
    pending: Pending,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            frame: DMat4::IDENTITY,
            pending: Pending::Empty,
        }
    }

    fn flush(&mut self) {
        if let Some(m) = self.pending.matrix() {
            self.frame *= m;
        }
        self.pending = Pending::Empty;
    }

    fn translate(&mut self, t: DVec3) {
        let pending = self.pending;
        self.pending = match pending {
            Pending::Translate(acc) => Pending::Translate(acc + t),
            _ => {
                self.flush();
                Pending::Translate(t)
            }
        };
    }

    fn scale(&mut self, s: DVec3) {
        let pending = self.pending;
        self.pending = match pending {
            Pending::Scale(acc) => Pending::Scale(acc * s),
            _ => {
                self.flush();
                Pending::Scale(s)
            }
        };
    }

    fn rotate(&mut self, q: DQuat) {
        let pending = self.pending;
        self.pending = match pending {
            Pending::Rotate(acc) => Pending::Rotate(acc * q),
            _ => {
                self.flush();
                Pending::Rotate(q)
            }
        };
    }

    fn matrix(&mut self, m: DMat4) {
        self.flush();
        self.frame *= m;
    }

    fn finish(mut self) -> DMat4 {
        self.flush();
        self.frame
    }
}

/// Evaluates coordinate frames against a [`TransformOpStore`].
///
/// Values are read from the store on every call; nothing is cached.
pub struct CoordinateFrameEvaluator<'s, S: TransformOpStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: TransformOpStore + ?Sized> CoordinateFrameEvaluator<'s, S> {
    /// Creates an evaluator reading from `store`.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Frame formed by `ops[0..index)`.
    ///
    /// `index == 0` is the identity and `index == stack.len()` is the full
    /// local transform.
    ///
    /// # Errors
    ///
    /// [`EvalError::IndexOutOfRange`] when `index > stack.len()`, and any
    /// store failure while reading values.
    pub fn frame_for_index(
        &self,
        stack: &OpStack,
        index: usize,
        time: TimeCode,
    ) -> EvalResult<DMat4> {
        if index > stack.len() {
            return Err(EvalError::IndexOutOfRange {
                index,
                len: stack.len(),
            });
        }
        self.frame_for_range(stack, 0, index, time)
    }

    /// Frame formed by `ops[start..end)`.
    ///
    /// # Errors
    ///
    /// [`EvalError::InvalidRange`] when `start > end` or `end > stack.len()`.
    pub fn frame_for_range(
        &self,
        stack: &OpStack,
        start: usize,
        end: usize,
        time: TimeCode,
    ) -> EvalResult<DMat4> {
        if start > end || end > stack.len() {
            return Err(EvalError::InvalidRange {
                start,
                end,
                len: stack.len(),
            });
        }

        let mut acc = Accumulator::new();
        for op in &stack.operations[start..end] {
            let value = self.store.operation_value(stack.node, op.name(), time)?;
            let value = value.as_ref();
            match op.kind() {
                OperationKind::Translate => acc.translate(op.translation(value)),
                OperationKind::Scale => acc.scale(op.scale(value)),
                OperationKind::Matrix => acc.matrix(op.matrix(value)),
                _ => match op.rotation(value) {
                    Some(q) => acc.rotate(q),
                    None => acc.matrix(op.matrix(value)),
                },
            }
        }
        let frame = acc.finish();
        trace!("node {}: frame [{start}, {end}) = {frame:?}", stack.node);
        Ok(frame)
    }
}
