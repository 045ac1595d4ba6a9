//! Transform manipulator unit tests.

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_1_SQRT_2;

    use approx::assert_abs_diff_eq;
    use glam::{DMat4, DQuat, DVec3, DVec4};
    use xform_ops::{
        InMemoryOpStore, NodeId, OpValue, OperationKind, Precision, TimeCode, TransformOpStore,
        TransformOperation,
    };

    use crate::error::ManipulatorError;
    use crate::lookup::OpSelector;
    use crate::manipulator::TransformManipulator;
    use crate::mode::{ManipMode, Space};

    fn op(kind: OperationKind) -> TransformOperation {
        TransformOperation::new(kind, Precision::Double, None)
    }

    /// One node holding `ops`, each authored when a value is given.
    fn node_with(ops: &[(TransformOperation, Option<OpValue>)]) -> (InMemoryOpStore, NodeId) {
        let mut store = InMemoryOpStore::default();
        let node = store.add_node(None).unwrap();
        for (op, value) in ops {
            store.push_operation(node, op.clone()).unwrap();
            if let Some(value) = value {
                store
                    .author(node, op.name(), *value, TimeCode::Default)
                    .unwrap();
            }
        }
        (store, node)
    }

    fn vec3(store: &InMemoryOpStore, node: NodeId, name: &str) -> DVec3 {
        store
            .operation_value(node, name, TimeCode::Default)
            .unwrap()
            .and_then(|v| v.as_vec3())
            .unwrap()
    }

    /// `Rx(45°)·diag(4, 5, 6)` translated to (1, 2, 3).
    fn sheared_matrix() -> DMat4 {
        DMat4::from_cols(
            DVec4::new(4.0, 0.0, 0.0, 0.0),
            DVec4::new(0.0, 5.0 * FRAC_1_SQRT_2, 5.0 * FRAC_1_SQRT_2, 0.0),
            DVec4::new(0.0, -6.0 * FRAC_1_SQRT_2, 6.0 * FRAC_1_SQRT_2, 0.0),
            DVec4::new(1.0, 2.0, 3.0, 1.0),
        )
    }

    fn manip(store: &InMemoryOpStore, node: NodeId, index: usize) -> TransformManipulator {
        TransformManipulator::new(store, node, OpSelector::Index(index), None, TimeCode::Default)
            .unwrap()
    }

    // =========================================================================
    // CONSTRUCTION AND MODES
    // =========================================================================

    /// Test that the mode is guessed from the op kind.
    #[test]
    fn test_mode_guess() {
        let (store, node) = node_with(&[
            (op(OperationKind::Translate), None),
            (op(OperationKind::RotateZXY), None),
            (op(OperationKind::Scale), None),
            (op(OperationKind::Matrix), None),
        ]);
        let modes: Vec<_> = (0..4).map(|i| manip(&store, node, i).mode()).collect();
        assert_eq!(
            modes,
            vec![
                ManipMode::Translate,
                ManipMode::Rotate,
                ManipMode::Scale,
                ManipMode::Translate
            ]
        );
    }

    /// Test that an incompatible explicit mode is rejected up front.
    #[test]
    fn test_incompatible_mode() {
        let (store, node) = node_with(&[(op(OperationKind::Translate), None)]);
        let result = TransformManipulator::new(
            &store,
            node,
            OpSelector::Index(0),
            Some(ManipMode::Scale),
            TimeCode::Default,
        );
        assert!(matches!(
            result,
            Err(ManipulatorError::IncompatibleMode {
                mode: ManipMode::Scale,
                kind: OperationKind::Translate,
                ..
            })
        ));
    }

    /// Test that a non-matrix op rejects edits of another mode.
    #[test]
    fn test_edit_in_other_mode_rejected() {
        let (mut store, node) = node_with(&[(op(OperationKind::Translate), None)]);
        let mut m = manip(&store, node, 0);
        let result = m.scale(&mut store, DVec3::splat(2.0), Space::Transform);
        assert!(matches!(result, Err(ManipulatorError::IncompatibleMode { .. })));
        let result = m.rotate_x(&mut store, 0.5, Space::World);
        assert!(matches!(result, Err(ManipulatorError::IncompatibleMode { .. })));
        assert_eq!(
            store
                .operation_value(node, "xformOp:translate", TimeCode::Default)
                .unwrap(),
            None
        );
    }

    /// Test that a matrix op switches mode on demand.
    #[test]
    fn test_matrix_switches_mode() {
        let (mut store, node) =
            node_with(&[(op(OperationKind::Matrix), Some(OpValue::Matrix(sheared_matrix())))]);
        let mut m = manip(&store, node, 0);
        assert_eq!(m.mode(), ManipMode::Translate);
        assert_eq!(m.manipulator_frame(), DMat4::IDENTITY);

        m.scale(&mut store, DVec3::new(2.0, 1.0, 3.0), Space::Transform)
            .unwrap()
            .unwrap();
        assert_eq!(m.mode(), ManipMode::Scale);

        m.rotate_x(&mut store, 0.1, Space::Transform).unwrap().unwrap();
        assert_eq!(m.mode(), ManipMode::Rotate);
        assert_eq!(
            m.manipulator_frame().w_axis,
            DVec4::new(1.0, 2.0, 3.0, 1.0)
        );
    }

    /// Test that inverse ops refuse edits.
    #[test]
    fn test_inverse_op_rejected() {
        let pivot =
            TransformOperation::new(OperationKind::Translate, Precision::Float, Some("pivot"));
        let (mut store, node) = node_with(&[
            (pivot.clone(), Some(OpValue::Vec3(DVec3::ONE))),
            (op(OperationKind::RotateX), None),
            (pivot.clone().inverted(), None),
        ]);
        let mut m = manip(&store, node, 2);
        assert!(!m.can_translate());
        let result = m.translate(&mut store, DVec3::X, Space::Transform);
        assert!(matches!(result, Err(ManipulatorError::InverseOperation { .. })));
        assert_eq!(vec3(&store, node, pivot.name()), DVec3::ONE);
    }

    // =========================================================================
    // CAPABILITIES AND VALUES
    // =========================================================================

    /// Test the capability queries for single-axis, multi-axis and matrix ops.
    #[test]
    fn test_capabilities() {
        let (store, node) = node_with(&[
            (op(OperationKind::RotateY), None),
            (op(OperationKind::RotateXYZ), None),
            (op(OperationKind::Matrix), None),
            (op(OperationKind::Scale), None),
        ]);
        let y = manip(&store, node, 0);
        assert!(y.can_rotate() && y.can_rotate_y());
        assert!(!y.can_rotate_x() && !y.can_rotate_z());
        assert!(!y.can_translate() && !y.can_scale());

        let xyz = manip(&store, node, 1);
        assert!(xyz.can_rotate_x() && xyz.can_rotate_y() && xyz.can_rotate_z());

        let matrix = manip(&store, node, 2);
        assert!(matrix.can_translate() && matrix.can_rotate() && matrix.can_scale());

        let scale = manip(&store, node, 3);
        assert!(scale.can_scale() && !scale.can_rotate());
    }

    /// Test the value queries of a matrix op.
    #[test]
    fn test_matrix_values() {
        let (store, node) =
            node_with(&[(op(OperationKind::Matrix), Some(OpValue::Matrix(sheared_matrix())))]);
        let m = manip(&store, node, 0);
        assert_abs_diff_eq!(
            m.current_translation(&store).unwrap(),
            DVec3::new(1.0, 2.0, 3.0),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            m.current_scale(&store).unwrap(),
            DVec3::new(4.0, 5.0, 6.0),
            epsilon = 1e-12
        );
        let q = m.current_rotation(&store).unwrap();
        assert!(q.abs_diff_eq(DQuat::from_rotation_x(45f64.to_radians()), 1e-9));
    }

    /// Test that unset ops report identity values.
    #[test]
    fn test_unset_values() {
        let (store, node) = node_with(&[
            (op(OperationKind::Translate), None),
            (op(OperationKind::Orient), None),
        ]);
        let t = manip(&store, node, 0);
        assert_eq!(t.current_translation(&store).unwrap(), DVec3::ZERO);
        assert_eq!(t.current_scale(&store).unwrap(), DVec3::ONE);
        assert_eq!(t.current_rotation(&store).unwrap(), DQuat::IDENTITY);
        let orient = manip(&store, node, 1);
        assert_eq!(orient.current_rotation(&store).unwrap(), DQuat::IDENTITY);
    }

    // =========================================================================
    // FRAMES
    // =========================================================================

    /// Test the matrix-op frames for each mode.
    #[test]
    fn test_matrix_frames() {
        let (store, node) =
            node_with(&[(op(OperationKind::Matrix), Some(OpValue::Matrix(sheared_matrix())))]);
        let frame = |mode| {
            let selector = OpSelector::Index(0);
            TransformManipulator::new(&store, node, selector, Some(mode), TimeCode::Default)
                .unwrap()
                .manipulator_frame()
        };
        assert_eq!(frame(ManipMode::Translate), DMat4::IDENTITY);
        assert_eq!(
            frame(ManipMode::Rotate),
            DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0))
        );
        let expected = DMat4::from_cols(
            DVec4::new(1.0, 0.0, 0.0, 0.0),
            DVec4::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0),
            DVec4::new(0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.0),
            DVec4::new(1.0, 2.0, 3.0, 1.0),
        );
        assert!(frame(ManipMode::Scale).abs_diff_eq(expected, 1e-12));
    }

    /// Test how the frame queries relate on a stack with a parent.
    #[test]
    fn test_frame_queries() {
        let mut store = InMemoryOpStore::default();
        let parent = store.add_node(None).unwrap();
        let translate = op(OperationKind::Translate);
        store.push_operation(parent, translate.clone()).unwrap();
        store
            .author(
                parent,
                translate.name(),
                OpValue::Vec3(DVec3::new(0.0, 5.0, 0.0)),
                TimeCode::Default,
            )
            .unwrap();

        let child = store.add_node(Some(parent)).unwrap();
        let scale = op(OperationKind::Scale);
        let rotate = op(OperationKind::RotateZ);
        store.push_operation(child, scale.clone()).unwrap();
        store.push_operation(child, rotate.clone()).unwrap();
        store.push_operation(child, translate.clone()).unwrap();
        store
            .author(child, scale.name(), OpValue::Vec3(DVec3::splat(2.0)), TimeCode::Default)
            .unwrap();
        store
            .author(child, rotate.name(), OpValue::Scalar(90.0), TimeCode::Default)
            .unwrap();

        let m = manip(&store, child, 1);
        assert!(m
            .coordinate_frame()
            .abs_diff_eq(DMat4::from_scale(DVec3::splat(2.0)), 1e-12));
        assert!(m
            .inv_coordinate_frame()
            .abs_diff_eq(DMat4::from_scale(DVec3::splat(0.5)), 1e-12));
        assert_eq!(
            m.parent_frame(),
            DMat4::from_translation(DVec3::new(0.0, 5.0, 0.0))
        );
        assert_eq!(m.world_frame(), m.parent_frame() * m.coordinate_frame());
        assert!(m.post_transform_frame().abs_diff_eq(DMat4::IDENTITY, 1e-12));
        assert!(m.inv_post_transform_frame().abs_diff_eq(DMat4::IDENTITY, 1e-12));
        assert!(m
            .manipulator_matrix()
            .abs_diff_eq(m.coordinate_frame() * m.op_matrix(), 1e-12));
        assert!(m
            .op_matrix()
            .abs_diff_eq(DMat4::from_rotation_z(90f64.to_radians()), 1e-12));
    }

    /// Test that a node resetting inheritance ignores its parent.
    #[test]
    fn test_reset_inheritance() {
        let mut store = InMemoryOpStore::default();
        let parent = store.add_node(None).unwrap();
        let rotate = op(OperationKind::RotateX);
        store.push_operation(parent, rotate.clone()).unwrap();
        store
            .author(parent, rotate.name(), OpValue::Scalar(90.0), TimeCode::Default)
            .unwrap();
        let child = store.add_node(Some(parent)).unwrap();
        let translate = op(OperationKind::Translate);
        store.push_operation(child, translate.clone()).unwrap();
        store.set_resets_parent_inheritance(child, true).unwrap();

        let mut m = manip(&store, child, 0);
        assert_eq!(m.parent_frame(), DMat4::IDENTITY);
        assert_eq!(m.world_frame(), m.coordinate_frame());
        m.translate(&mut store, DVec3::Y, Space::World).unwrap();
        assert_eq!(vec3(&store, child, translate.name()), DVec3::Y);
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    /// Test that the op is found again by name when the stack changes.
    #[test]
    fn test_refresh_follows_name() {
        let translate = op(OperationKind::Translate);
        let (store, node) = node_with(&[(translate.clone(), None)]);
        let mut m = manip(&store, node, 0);

        let (mut grown, same) = node_with(&[
            (op(OperationKind::RotateX), Some(OpValue::Scalar(10.0))),
            (translate.clone(), None),
        ]);
        assert_eq!(same, node);
        m.translate(&mut grown, DVec3::X, Space::Transform).unwrap();
        assert_eq!(m.op_index(), 1);
        assert_eq!(vec3(&grown, node, translate.name()), DVec3::X);

        let (mut other, _) = node_with(&[(op(OperationKind::Scale), None)]);
        let result = m.translate(&mut other, DVec3::X, Space::Transform);
        assert!(matches!(result, Err(ManipulatorError::Unresolvable(_))));
    }

    /// Test that update_to_time reads time samples.
    #[test]
    fn test_update_to_time() {
        let scale = op(OperationKind::Scale);
        let translate = op(OperationKind::Translate);
        let (mut store, node) = node_with(&[(scale.clone(), None), (translate.clone(), None)]);
        store
            .author(node, scale.name(), OpValue::Vec3(DVec3::splat(2.0)), TimeCode::Sample(1.0))
            .unwrap();
        store
            .author(node, scale.name(), OpValue::Vec3(DVec3::splat(4.0)), TimeCode::Sample(5.0))
            .unwrap();

        let mut m = TransformManipulator::new(
            &store,
            node,
            OpSelector::Index(1),
            None,
            TimeCode::Sample(1.0),
        )
        .unwrap();
        assert!(m
            .coordinate_frame()
            .abs_diff_eq(DMat4::from_scale(DVec3::splat(2.0)), 1e-12));

        m.update_to_time(&store, TimeCode::Sample(6.0), None).unwrap();
        assert_eq!(m.time(), TimeCode::Sample(6.0));
        assert!(m
            .coordinate_frame()
            .abs_diff_eq(DMat4::from_scale(DVec3::splat(4.0)), 1e-12));

        let edit = m
            .translate(&mut store, DVec3::new(4.0, 0.0, 0.0), Space::Parent)
            .unwrap()
            .unwrap();
        assert_eq!(edit.time, TimeCode::Sample(6.0));
        assert_eq!(edit.new, OpValue::Vec3(DVec3::X));
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// Test that negligible deltas leave the store untouched.
    #[test]
    fn test_negligible_deltas_ignored() {
        let (mut store, node) = node_with(&[
            (op(OperationKind::Translate), None),
            (op(OperationKind::RotateXYZ), None),
            (op(OperationKind::Scale), None),
        ]);
        let mut t = manip(&store, node, 0);
        assert_eq!(t.translate(&mut store, DVec3::splat(1e-9), Space::World).unwrap(), None);
        let mut r = manip(&store, node, 1);
        assert_eq!(r.rotate(&mut store, DQuat::IDENTITY, Space::World).unwrap(), None);
        assert_eq!(r.rotate_z(&mut store, 0.0, Space::Transform).unwrap(), None);
        let mut s = manip(&store, node, 2);
        assert_eq!(s.scale(&mut store, DVec3::ONE, Space::Transform).unwrap(), None);
        for name in ["xformOp:translate", "xformOp:rotateXYZ", "xformOp:scale"] {
            assert_eq!(store.operation_value(node, name, TimeCode::Default).unwrap(), None);
        }
    }

    /// Test that an edit reports previous and new values and can be undone.
    #[test]
    fn test_edit_round_trip() {
        let translate = op(OperationKind::Translate);
        let (mut store, node) = node_with(&[(translate.clone(), None)]);
        let mut m = manip(&store, node, 0);

        let first = m
            .translate(&mut store, DVec3::new(1.0, 2.0, 3.0), Space::Transform)
            .unwrap()
            .unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.kind, OperationKind::Translate);
        let second = m
            .translate(&mut store, DVec3::ONE, Space::Transform)
            .unwrap()
            .unwrap();
        assert_eq!(second.previous, Some(OpValue::Vec3(DVec3::new(1.0, 2.0, 3.0))));

        second.inverse().apply(&mut store).unwrap();
        first.inverse().apply(&mut store).unwrap();
        assert_eq!(vec3(&store, node, translate.name()), DVec3::ZERO);
    }

    /// Test that the committed value is the one the store kept.
    #[test]
    fn test_edit_reports_quantized_value() {
        let translate = TransformOperation::new(OperationKind::Translate, Precision::Float, None);
        let (mut store, node) = node_with(&[(translate, None)]);
        let mut m = manip(&store, node, 0);
        let edit = m
            .translate(&mut store, DVec3::splat(0.1), Space::Transform)
            .unwrap()
            .unwrap();
        assert_eq!(edit.new, OpValue::Vec3(DVec3::splat(0.1f32 as f64)));
    }

    /// Test that single-axis ops keep winding past 180 degrees.
    #[test]
    fn test_single_axis_winding() {
        let rotate = op(OperationKind::RotateZ);
        let (mut store, node) = node_with(&[(rotate.clone(), Some(OpValue::Scalar(170.0)))]);
        let mut m = manip(&store, node, 0);
        let delta = DQuat::from_rotation_z(20f64.to_radians());
        let edit = m.rotate(&mut store, delta, Space::Parent).unwrap().unwrap();
        assert_abs_diff_eq!(edit.new.as_scalar().unwrap(), 190.0, epsilon = 1e-9);

        let edit = m.rotate_z(&mut store, 200f64.to_radians(), Space::Transform).unwrap().unwrap();
        assert_abs_diff_eq!(edit.new.as_scalar().unwrap(), 390.0, epsilon = 1e-9);
    }

    /// Test that single-axis ops reject rotations about other axes.
    #[test]
    fn test_axis_mismatch() {
        let (mut store, node) = node_with(&[(op(OperationKind::RotateX), None)]);
        let mut m = manip(&store, node, 0);
        let result = m.rotate_y(&mut store, 0.3, Space::Transform);
        assert!(matches!(
            result,
            Err(ManipulatorError::AxisMismatch {
                axis: xform_ops::RotationAxis::X,
                ..
            })
        ));
        let result = m.rotate(&mut store, DQuat::from_rotation_z(0.3), Space::World);
        assert!(matches!(result, Err(ManipulatorError::AxisMismatch { .. })));
        assert_eq!(
            store
                .operation_value(node, "xformOp:rotateX", TimeCode::Default)
                .unwrap(),
            None
        );

        let edit = m.rotate_x(&mut store, 0.25, Space::World).unwrap().unwrap();
        assert_abs_diff_eq!(
            edit.new.as_scalar().unwrap(),
            0.25f64.to_degrees(),
            epsilon = 1e-9
        );
    }

    /// Test that an orient op composes world rotations under a rotated parent.
    #[test]
    fn test_orient_world_rotation() {
        let mut store = InMemoryOpStore::default();
        let parent = store.add_node(None).unwrap();
        let spin = op(OperationKind::RotateZ);
        store.push_operation(parent, spin.clone()).unwrap();
        store
            .author(parent, spin.name(), OpValue::Scalar(90.0), TimeCode::Default)
            .unwrap();
        let child = store.add_node(Some(parent)).unwrap();
        let orient = op(OperationKind::Orient);
        store.push_operation(child, orient.clone()).unwrap();

        let mut m = manip(&store, child, 0);
        // a world X rotation is a local -Y rotation under the parent's Z spin
        let delta = DQuat::from_rotation_x(30f64.to_radians());
        let edit = m.rotate(&mut store, delta, Space::World).unwrap().unwrap();
        let expected = DQuat::from_rotation_y(-30f64.to_radians());
        assert!(edit.new.as_quat().unwrap().abs_diff_eq(expected, 1e-9));

        let world = store.ancestor_world_frame(child, TimeCode::Default).unwrap()
            * store.local_transformation(child, TimeCode::Default).unwrap();
        let expected = DMat4::from_quat(delta) * DMat4::from_rotation_z(90f64.to_radians());
        assert!(world.abs_diff_eq(expected, 1e-9));
    }

    // =========================================================================
    // ABSOLUTE EDITS
    // =========================================================================

    /// Test that set_translation reaches the target in every space.
    #[test]
    fn test_set_translation() {
        let mut store = InMemoryOpStore::default();
        let parent = store.add_node(None).unwrap();
        let shift = op(OperationKind::Translate);
        store.push_operation(parent, shift.clone()).unwrap();
        store
            .author(parent, shift.name(), OpValue::Vec3(DVec3::X * 10.0), TimeCode::Default)
            .unwrap();
        let child = store.add_node(Some(parent)).unwrap();
        let grow = op(OperationKind::Scale);
        let t = TransformOperation::new(OperationKind::Translate, Precision::Double, Some("move"));
        let post = TransformOperation::new(OperationKind::Scale, Precision::Double, Some("post"));
        for (o, value) in [
            (grow.clone(), Some(DVec3::splat(2.0))),
            (t.clone(), Some(DVec3::ONE)),
            (post.clone(), Some(DVec3::new(1.0, 2.0, 4.0))),
        ] {
            store.push_operation(child, o.clone()).unwrap();
            if let Some(value) = value {
                store
                    .author(child, o.name(), OpValue::Vec3(value), TimeCode::Default)
                    .unwrap();
            }
        }
        let mut m = manip(&store, child, 1);

        m.set_translation(&mut store, DVec3::new(3.0, 0.0, -1.0), Space::Transform)
            .unwrap();
        assert_eq!(vec3(&store, child, t.name()), DVec3::new(3.0, 0.0, -1.0));

        m.set_translation(&mut store, DVec3::new(1.0, 2.0, 3.0), Space::Parent)
            .unwrap();
        assert_abs_diff_eq!(
            vec3(&store, child, t.name()),
            DVec3::new(0.5, 1.0, 1.5),
            epsilon = 1e-12
        );

        m.set_translation(&mut store, DVec3::new(11.0, 2.0, 2.0), Space::World)
            .unwrap();
        assert_abs_diff_eq!(
            vec3(&store, child, t.name()),
            DVec3::new(0.5, 1.0, 1.0),
            epsilon = 1e-12
        );

        m.set_translation(&mut store, DVec3::ONE, Space::PostTransform)
            .unwrap();
        assert_abs_diff_eq!(
            vec3(&store, child, t.name()),
            DVec3::new(1.0, 2.0, 4.0),
            epsilon = 1e-12
        );

        // already there
        let edit = m
            .set_translation(&mut store, DVec3::new(1.0, 2.0, 4.0), Space::Transform)
            .unwrap();
        assert_eq!(edit, None);
    }

    /// Test that set_rotation reaches the target orientation.
    #[test]
    fn test_set_rotation() {
        let (mut store, node) = node_with(&[
            (op(OperationKind::RotateXYZ), None),
            (op(OperationKind::RotateY), None),
            (op(OperationKind::Matrix), Some(OpValue::Matrix(sheared_matrix()))),
        ]);

        let target = DQuat::from_rotation_z(30f64.to_radians())
            * DQuat::from_rotation_y(20f64.to_radians())
            * DQuat::from_rotation_x(10f64.to_radians());
        let mut euler = manip(&store, node, 0);
        euler.set_rotation(&mut store, target, Space::Transform).unwrap();
        assert_abs_diff_eq!(
            vec3(&store, node, "xformOp:rotateXYZ"),
            DVec3::new(10.0, 20.0, 30.0),
            epsilon = 1e-9
        );

        let mut single = manip(&store, node, 1);
        let edit = single
            .set_rotation(&mut store, DQuat::from_rotation_y(40f64.to_radians()), Space::Transform)
            .unwrap()
            .unwrap();
        assert_abs_diff_eq!(edit.new.as_scalar().unwrap(), 40.0, epsilon = 1e-9);
        let result = single.set_rotation(&mut store, DQuat::from_rotation_x(0.3), Space::Transform);
        assert!(matches!(result, Err(ManipulatorError::AxisMismatch { .. })));

        // the matrix keeps its scale and translation
        let mut matrix = manip(&store, node, 2);
        matrix
            .set_rotation(&mut store, DQuat::IDENTITY, Space::Transform)
            .unwrap();
        let expected = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0))
            * DMat4::from_scale(DVec3::new(4.0, 5.0, 6.0));
        let stored = store
            .operation_value(node, "xformOp:transform", TimeCode::Default)
            .unwrap()
            .and_then(|v| v.as_matrix())
            .unwrap();
        assert!(stored.abs_diff_eq(expected, 1e-9));
    }

    /// Test that a world orientation accounts for the parent's rotation.
    #[test]
    fn test_set_rotation_world() {
        let mut store = InMemoryOpStore::default();
        let parent = store.add_node(None).unwrap();
        let spin = op(OperationKind::RotateZ);
        store.push_operation(parent, spin.clone()).unwrap();
        store
            .author(parent, spin.name(), OpValue::Scalar(90.0), TimeCode::Default)
            .unwrap();
        let child = store.add_node(Some(parent)).unwrap();
        store.push_operation(child, op(OperationKind::Orient)).unwrap();

        let target = DQuat::from_rotation_x(0.4) * DQuat::from_rotation_y(-0.2);
        let mut m = manip(&store, child, 0);
        m.set_rotation(&mut store, target, Space::World).unwrap();
        let world = store.ancestor_world_frame(child, TimeCode::Default).unwrap()
            * store.local_transformation(child, TimeCode::Default).unwrap();
        assert!(world.abs_diff_eq(DMat4::from_quat(target), 1e-9));

        let edit = m.set_rotation(&mut store, target, Space::World).unwrap();
        assert_eq!(edit, None);
    }

    /// Test that set_scale reaches the target factors.
    #[test]
    fn test_set_scale() {
        let (mut store, node) = node_with(&[
            (op(OperationKind::RotateZ), Some(OpValue::Scalar(30.0))),
            (op(OperationKind::Scale), Some(OpValue::Vec3(DVec3::new(2.0, 0.0, 2.0)))),
        ]);
        let mut m = manip(&store, node, 1);

        m.set_scale(&mut store, DVec3::new(4.0, 3.0, 1.0), Space::Transform)
            .unwrap();
        // a zero axis cannot be multiplied back
        assert_abs_diff_eq!(
            vec3(&store, node, "xformOp:scale"),
            DVec3::new(4.0, 0.0, 1.0),
            epsilon = 1e-12
        );

        let result = m.set_scale(&mut store, DVec3::new(1.0, 0.0, 4.0), Space::Parent);
        assert!(matches!(result, Err(ManipulatorError::NonUniformScale { .. })));
        assert_eq!(vec3(&store, node, "xformOp:scale"), DVec3::new(4.0, 0.0, 1.0));
    }
}
