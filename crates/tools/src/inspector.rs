use blocky_kernel::{AppState, NodeIndex, SceneArena};

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against the composed scene and the application
/// state for debug panels and CLI output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene and state.
    pub fn summary(arena: &SceneArena, state: &AppState) -> SceneSummary {
        SceneSummary {
            node_count: arena.len(),
            capacity: arena.capacity(),
            fingerprint: arena.fingerprint(),
            global_angle: state.global_angle,
            yellow_angle: state.yellow_angle,
            magenta_angle: state.magenta_angle,
            yellow_animation: state.yellow_animation,
            magenta_animation: state.magenta_animation,
        }
    }

    /// Details of one node, if it exists.
    pub fn inspect_node(arena: &SceneArena, index: NodeIndex) -> Option<NodeInfo> {
        arena.get(index).map(|node| {
            let origin = node.model.transform_point(glam::Vec3::ZERO);
            NodeInfo {
                index,
                label: node.label,
                parent: node.parent,
                origin: origin.to_array(),
                color: node.color.to_array(),
            }
        })
    }

    /// All node labels in draw order.
    pub fn list_nodes(arena: &SceneArena) -> Vec<&'static str> {
        arena.nodes().iter().map(|n| n.label).collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub node_count: usize,
    pub capacity: usize,
    pub fingerprint: u64,
    pub global_angle: f32,
    pub yellow_angle: f32,
    pub magenta_angle: f32,
    pub yellow_animation: bool,
    pub magenta_animation: bool,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={}/{} global={:.1} yellow={:.1}{} magenta={:.1}{} hash={:#018x}",
            self.node_count,
            self.capacity,
            self.global_angle,
            self.yellow_angle,
            if self.yellow_animation { "~" } else { "" },
            self.magenta_angle,
            if self.magenta_animation { "~" } else { "" },
            self.fingerprint,
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub index: NodeIndex,
    pub label: &'static str,
    pub parent: Option<NodeIndex>,
    /// Where the unit cube's origin corner lands in world space.
    pub origin: [f32; 3],
    pub color: [f32; 4],
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parent = match self.parent {
            Some(p) => p.0.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "Node [{}] {} parent={} origin=({:.3}, {:.3}, {:.3}) color=({:.2}, {:.2}, {:.2}, {:.2})",
            self.index.0,
            self.label,
            parent,
            self.origin[0],
            self.origin[1],
            self.origin[2],
            self.color[0],
            self.color[1],
            self.color[2],
            self.color[3],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocky_kernel::compose_blocky_animal;

    fn composed() -> (SceneArena, AppState) {
        let state = AppState::new();
        let mut arena = SceneArena::new(8);
        compose_blocky_animal(&state, &mut arena).unwrap();
        (arena, state)
    }

    #[test]
    fn summary_empty_scene() {
        let arena = SceneArena::new(4);
        let summary = SceneInspector::summary(&arena, &AppState::new());
        assert_eq!(summary.node_count, 0);
        assert_eq!(summary.capacity, 4);
    }

    #[test]
    fn summary_with_animal() {
        let (arena, mut state) = composed();
        state.yellow_animation = true;
        let summary = SceneInspector::summary(&arena, &state);
        assert_eq!(summary.node_count, 3);
        assert_eq!(summary.fingerprint, arena.fingerprint());
        assert!(summary.yellow_animation);
    }

    #[test]
    fn inspect_node_found() {
        let (arena, _) = composed();
        let info = SceneInspector::inspect_node(&arena, NodeIndex(0)).unwrap();
        assert_eq!(info.label, "body");
        assert_eq!(info.origin, [-0.25, -0.75, 0.0]);
        assert_eq!(info.parent, None);
    }

    #[test]
    fn inspect_node_not_found() {
        let (arena, _) = composed();
        assert!(SceneInspector::inspect_node(&arena, NodeIndex(42)).is_none());
    }

    #[test]
    fn list_nodes_in_draw_order() {
        let (arena, _) = composed();
        assert_eq!(
            SceneInspector::list_nodes(&arena),
            ["body", "yellow", "magenta"]
        );
    }

    #[test]
    fn summary_display() {
        let (arena, state) = composed();
        let s = format!("{}", SceneInspector::summary(&arena, &state));
        assert!(s.contains("nodes=3/8"));
        assert!(s.contains("hash=0x"));
    }

    #[test]
    fn node_display_marks_parent() {
        let (arena, _) = composed();
        let info = SceneInspector::inspect_node(&arena, NodeIndex(2)).unwrap();
        assert!(info.to_string().contains("magenta parent=1"));
    }
}
