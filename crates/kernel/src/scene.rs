use crate::state::AppState;
use blocky_common::{Color, Transform, TransformOp};

/// Index of a node inside a [`SceneArena`]. Only valid for the frame it was
/// issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("scene arena full (capacity {capacity})")]
    CapacityExceeded { capacity: usize },
    #[error("parent node {parent} does not exist (arena holds {len} nodes)")]
    UnknownParent { parent: usize, len: usize },
}

/// A composed scene node.
///
/// `basis` is the inheritance point: the node's pivot transform, before any
/// local scale or offset. Children start from a copy of it. `model` is what
/// gets drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub label: &'static str,
    pub color: Color,
    pub parent: Option<NodeIndex>,
    pub basis: Transform,
    pub model: Transform,
}

/// Description of a node to insert.
#[derive(Debug, Clone, Copy)]
pub struct NodeDesc<'a> {
    pub label: &'static str,
    pub color: Color,
    pub parent: Option<NodeIndex>,
    /// Applied to the inherited basis (or identity). Result is the node's basis.
    pub pivot: &'a [TransformOp],
    /// Applied to a copy of the basis. Result is the node's model transform.
    pub shape: &'a [TransformOp],
}

/// Fixed-capacity node arena, reset and refilled every frame.
///
/// Resetting keeps the allocation, so steady-state frames never allocate.
#[derive(Debug, Clone)]
pub struct SceneArena {
    nodes: Vec<SceneNode>,
    capacity: usize,
}

impl SceneArena {
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order, which is also draw order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn get(&self, index: NodeIndex) -> Option<&SceneNode> {
        self.nodes.get(index.0)
    }

    pub fn insert(&mut self, desc: NodeDesc<'_>) -> Result<NodeIndex, SceneError> {
        if self.nodes.len() >= self.capacity {
            return Err(SceneError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let mut basis = match desc.parent {
            Some(parent) => {
                self.get(parent)
                    .ok_or(SceneError::UnknownParent {
                        parent: parent.0,
                        len: self.nodes.len(),
                    })?
                    .basis
            }
            None => Transform::IDENTITY,
        };
        basis.apply_all(desc.pivot);

        let mut model = basis;
        model.apply_all(desc.shape);

        let index = NodeIndex(self.nodes.len());
        self.nodes.push(SceneNode {
            label: desc.label,
            color: desc.color,
            parent: desc.parent,
            basis,
            model,
        });
        Ok(index)
    }

    /// FNV-1a over every node's model and basis bits, in draw order.
    /// Equal inputs give equal fingerprints on every platform.
    pub fn fingerprint(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for node in &self.nodes {
            mix(&mut h, node.label.as_bytes());
            for e in node.basis.elements().iter().chain(node.model.elements().iter()) {
                mix(&mut h, &e.to_le_bytes());
            }
        }
        h
    }
}

/// Node handles of the composed animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockyAnimal {
    pub body: NodeIndex,
    pub yellow: NodeIndex,
    pub magenta: NodeIndex,
}

/// Number of nodes [`compose_blocky_animal`] inserts.
pub const BLOCKY_ANIMAL_NODES: usize = 3;

/// Reset `arena` and fill it with the animal for the given state, in draw
/// order: body, yellow limb, magenta block (child of the limb).
pub fn compose_blocky_animal(
    state: &AppState,
    arena: &mut SceneArena,
) -> Result<BlockyAnimal, SceneError> {
    arena.reset();

    let body = arena.insert(NodeDesc {
        label: "body",
        color: Color::RED,
        parent: None,
        pivot: &[TransformOp::translate(-0.25, -0.75, 0.0)],
        shape: &[TransformOp::scale(0.5, 0.3, 0.5)],
    })?;

    let yellow = arena.insert(NodeDesc {
        label: "yellow",
        color: Color::YELLOW,
        parent: None,
        pivot: &[
            TransformOp::translate(0.0, -0.5, 0.003),
            TransformOp::rotate(-5.0, 1.0, 0.0, 0.0),
            TransformOp::rotate(-state.yellow_angle, 0.0, 0.0, 1.0),
        ],
        shape: &[
            TransformOp::scale(0.25, 0.7, 0.5),
            TransformOp::translate(-0.5, 0.0, 0.0),
        ],
    })?;

    let magenta = arena.insert(NodeDesc {
        label: "magenta",
        color: Color::MAGENTA,
        parent: Some(yellow),
        pivot: &[
            TransformOp::translate(0.0, 0.65, 0.0),
            TransformOp::rotate(state.magenta_angle, 0.0, 0.0, 1.0),
        ],
        shape: &[
            TransformOp::scale(0.3, 0.3, 0.3),
            TransformOp::translate(-0.5, 0.0, -0.001),
        ],
    })?;

    Ok(BlockyAnimal {
        body,
        yellow,
        magenta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn compose(state: &AppState) -> (SceneArena, BlockyAnimal) {
        let mut arena = SceneArena::new(8);
        let animal = compose_blocky_animal(state, &mut arena).unwrap();
        (arena, animal)
    }

    #[test]
    fn composes_three_nodes_in_draw_order() {
        let (arena, animal) = compose(&AppState::new());
        assert_eq!(arena.len(), BLOCKY_ANIMAL_NODES);
        let labels: Vec<_> = arena.nodes().iter().map(|n| n.label).collect();
        assert_eq!(labels, ["body", "yellow", "magenta"]);
        assert_eq!(arena.get(animal.magenta).unwrap().parent, Some(animal.yellow));
        assert_eq!(arena.get(animal.body).unwrap().parent, None);
    }

    #[test]
    fn composition_is_bit_identical_for_equal_state() {
        let state = AppState::new();
        let (a, _) = compose(&state);
        let (b, _) = compose(&state);
        for (x, y) in a.nodes().iter().zip(b.nodes()) {
            assert_eq!(x.model.elements(), y.model.elements());
            assert_eq!(x.basis.elements(), y.basis.elements());
        }
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn angles_change_the_fingerprint() {
        let (a, _) = compose(&AppState::new());
        let state = AppState {
            magenta_angle: 10.0,
            ..AppState::new()
        };
        let (b, _) = compose(&state);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn child_inherits_parent_basis_not_its_scale() {
        let state = AppState {
            yellow_angle: 25.0,
            magenta_angle: -15.0,
            ..AppState::new()
        };
        let (arena, animal) = compose(&state);
        let yellow = arena.get(animal.yellow).unwrap();
        let magenta = arena.get(animal.magenta).unwrap();

        let mut expected = yellow.basis;
        expected
            .translate(0.0, 0.65, 0.0)
            .rotate(-15.0, 0.0, 0.0, 1.0);
        assert_eq!(magenta.basis.elements(), expected.elements());

        // The limb's own scale stays out of the child lineage.
        assert_ne!(magenta.basis.elements()[..12], yellow.model.elements()[..12]);
    }

    #[test]
    fn child_composition_leaves_parent_untouched() {
        let mut arena = SceneArena::new(4);
        let parent = arena
            .insert(NodeDesc {
                label: "parent",
                color: Color::WHITE,
                parent: None,
                pivot: &[TransformOp::translate(1.0, 2.0, 3.0)],
                shape: &[TransformOp::scale(2.0, 2.0, 2.0)],
            })
            .unwrap();
        let before = arena.get(parent).unwrap().clone();

        arena
            .insert(NodeDesc {
                label: "child",
                color: Color::WHITE,
                parent: Some(parent),
                pivot: &[TransformOp::rotate(90.0, 0.0, 1.0, 0.0)],
                shape: &[TransformOp::scale(9.0, 9.0, 9.0)],
            })
            .unwrap();

        assert_eq!(arena.get(parent).unwrap(), &before);
    }

    #[test]
    fn body_model_maps_unit_cube_corners() {
        let (arena, animal) = compose(&AppState::new());
        let body = arena.get(animal.body).unwrap();
        assert_eq!(body.model.transform_point(Vec3::ZERO), Vec3::new(-0.25, -0.75, 0.0));
        let far = body.model.transform_point(Vec3::ONE);
        assert!((far - Vec3::new(0.25, -0.45, 0.5)).length() < 1e-6);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut arena = SceneArena::new(2);
        let err = compose_blocky_animal(&AppState::new(), &mut arena).unwrap_err();
        assert_eq!(err, SceneError::CapacityExceeded { capacity: 2 });
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut arena = SceneArena::new(4);
        let err = arena
            .insert(NodeDesc {
                label: "orphan",
                color: Color::WHITE,
                parent: Some(NodeIndex(3)),
                pivot: &[],
                shape: &[],
            })
            .unwrap_err();
        assert_eq!(err, SceneError::UnknownParent { parent: 3, len: 0 });
    }

    #[test]
    fn reset_reuses_the_allocation() {
        let mut arena = SceneArena::new(8);
        compose_blocky_animal(&AppState::new(), &mut arena).unwrap();
        let ptr = arena.nodes().as_ptr();
        compose_blocky_animal(&AppState::new(), &mut arena).unwrap();
        assert_eq!(arena.nodes().as_ptr(), ptr);
        assert_eq!(arena.len(), BLOCKY_ANIMAL_NODES);
    }
}
