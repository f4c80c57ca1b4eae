//! Arena-backed scene graph
//!
//! Nodes are stored in a [`SlotMap`] and linked through parent ids and
//! ordered child id lists. Every traversal (update, render, initialise,
//! shutdown, find) walks the same pre-order: a node, then its children in
//! insertion order.

use slotmap::SlotMap;
use thiserror::Error;

use crate::foundation::math::Mat4;
use crate::render::{FrameContext, RenderBackend, RenderError};
use crate::scene::node::{Drawable, NodeId, NodeKind, NodeState, SceneNode};

/// Errors raised by scene graph operations
#[derive(Error, Debug)]
pub enum SceneError {
    /// The id does not refer to a node in this graph
    #[error("Unknown scene node {0:?}")]
    UnknownNode(NodeId),

    /// Children can only be added to group nodes
    #[error("Node '{0}' is not a group and cannot hold children")]
    NotAGroup(String),

    /// The operation is not valid in the graph's current lifecycle state
    #[error("{operation} requires an initialised scene graph, graph is {state:?}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the graph was in
        state: NodeState,
    },

    /// The node failed an earlier initialisation and cannot be initialised again
    #[error("Node '{0}' failed to initialise earlier")]
    FailedNode(String),

    /// A drawable failed to create its backend resources
    #[error("Failed to initialise node '{node}': {source}")]
    Initialisation {
        /// Name of the failing node
        node: String,
        /// Backend error
        source: RenderError,
    },

    /// The backend rejected a draw
    #[error("Backend error: {0}")]
    Backend(#[from] RenderError),
}

/// Result type for scene graph operations
pub type SceneResult<T> = Result<T, SceneError>;

/// Hierarchy of named nodes rooted at a single group
pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
    state: NodeState,
    /// Drawables removed while holding backend resources, released at shutdown
    retired: Vec<(String, Box<dyn Drawable>)>,
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("nodes", &self.nodes.len())
            .field("state", &self.state)
            .field("retired", &self.retired.len())
            .finish()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new("Root")
    }
}

impl SceneGraph {
    /// Create a graph containing only a root group
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::group(root_name));
        Self {
            nodes,
            root,
            state: NodeState::Uninitialised,
            retired: Vec::new(),
        }
    }

    /// The root group
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Lifecycle state of the graph as a whole
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root remains
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether `id` refers to a node in this graph
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    /// Append `node` as the last child of `parent`
    pub fn add(&mut self, parent: NodeId, node: SceneNode) -> SceneResult<NodeId> {
        let parent_node = self.nodes.get(parent).ok_or(SceneError::UnknownNode(parent))?;
        if !parent_node.is_group() {
            return Err(SceneError::NotAGroup(parent_node.name.clone()));
        }
        Ok(self.link(parent, node))
    }

    /// Append `node` under the root
    pub fn add_to_root(&mut self, node: SceneNode) -> NodeId {
        self.link(self.root, node)
    }

    fn link(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        node.parent = Some(parent);
        log::debug!("Adding node '{}' under {:?}", node.name, parent);
        let id = self.nodes.insert(node);
        if let Some(NodeKind::Group(children)) = self.nodes.get_mut(parent).map(|p| &mut p.kind) {
            children.push(id);
        }
        id
    }

    /// Detach a node and its subtree
    ///
    /// Returns false for the root and for ids not in the graph. Removed
    /// drawables that have not been shut down yet are kept aside and released
    /// by [`SceneGraph::shutdown`].
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root {
            log::warn!("Refusing to remove the scene root");
            return false;
        }
        let Some(parent) = self.nodes.get(id).and_then(SceneNode::parent) else {
            return false;
        };

        if let Some(NodeKind::Group(children)) = self.nodes.get_mut(parent).map(|p| &mut p.kind) {
            children.retain(|&child| child != id);
        }

        let subtree: Vec<NodeId> = self.descendants(id).map(|(node_id, _)| node_id).collect();
        for node_id in subtree {
            let Some(node) = self.nodes.remove(node_id) else {
                continue;
            };
            log::debug!("Removed node '{}'", node.name);
            if let NodeKind::Drawable(drawable) = node.kind {
                if matches!(node.state, NodeState::Uninitialised | NodeState::Initialised) {
                    self.retired.push((node.name, drawable));
                }
            }
        }
        true
    }

    /// First node named `name` in pre-order from the root
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.find_from(self.root, name)
    }

    /// First node named `name` in pre-order within the subtree at `start`
    pub fn find_from(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(start)
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Set a node's transform relative to its parent
    pub fn set_local_transform(&mut self, id: NodeId, transform: Mat4) -> SceneResult<()> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))?;
        node.local = transform;
        Ok(())
    }

    /// A node's transform relative to its parent
    pub fn local_transform(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(id).map(|node| node.local)
    }

    /// A node's combined transform from the last update
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        self.nodes.get(id).map(|node| node.world)
    }

    /// Pre-order walk of the whole graph
    pub fn iter(&self) -> PreOrder<'_> {
        self.descendants(self.root)
    }

    /// Pre-order walk of the subtree rooted at `start` (inclusive)
    pub fn descendants(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder {
            graph: self,
            stack: vec![start],
        }
    }

    /// Node ids in traversal order
    pub fn traversal_order(&self) -> Vec<NodeId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Create backend resources for every uninitialised node
    ///
    /// Stops at the first failing drawable. Its partial resources are
    /// released at once and it is marked [`NodeState::Failed`]; later calls
    /// report it with [`SceneError::FailedNode`] instead of retrying. Nodes
    /// visited before it stay initialised, nodes after it are left untouched
    /// and the graph keeps its previous state.
    pub fn initialise(&mut self, backend: &mut dyn RenderBackend) -> SceneResult<()> {
        if self.state == NodeState::Shutdown {
            return Err(SceneError::InvalidState {
                operation: "initialise",
                state: self.state,
            });
        }

        for id in self.traversal_order() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            match node.state {
                NodeState::Uninitialised => {}
                NodeState::Failed => return Err(SceneError::FailedNode(node.name.clone())),
                NodeState::Initialised | NodeState::Shutdown => continue,
            }
            if let NodeKind::Drawable(drawable) = &mut node.kind {
                if let Err(source) = drawable.initialise(&node.name, backend) {
                    log::error!("Initialisation of '{}' failed: {}", node.name, source);
                    drawable.shutdown(backend);
                    node.state = NodeState::Failed;
                    return Err(SceneError::Initialisation {
                        node: node.name.clone(),
                        source,
                    });
                }
            }
            node.state = NodeState::Initialised;
        }

        if self.state != NodeState::Initialised {
            log::info!("Scene graph initialised ({} nodes)", self.nodes.len());
        }
        self.state = NodeState::Initialised;
        Ok(())
    }

    /// Recompute every combined transform as `parent * local`
    pub fn update(&mut self, parent: &Mat4) -> SceneResult<()> {
        self.require_initialised("update")?;

        let mut stack = vec![(self.root, *parent)];
        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.world = parent_world * node.local;
            if let NodeKind::Group(children) = &node.kind {
                let world = node.world;
                stack.extend(children.iter().rev().map(|&child| (child, world)));
            }
        }
        Ok(())
    }

    /// Draw every initialised drawable with its combined transform
    pub fn render(&self, frame: &mut FrameContext<'_>) -> SceneResult<()> {
        self.require_initialised("render")?;

        for (_, node) in self.iter() {
            if let NodeKind::Drawable(drawable) = &node.kind {
                if node.state == NodeState::Initialised {
                    drawable.render(&node.world, frame)?;
                } else {
                    log::trace!("Skipping '{}' ({:?})", node.name, node.state);
                }
            }
        }
        Ok(())
    }

    /// Release backend resources held by every node
    ///
    /// Each drawable, including those removed while initialised, is shut
    /// down exactly once. Later calls do nothing.
    pub fn shutdown(&mut self, backend: &mut dyn RenderBackend) {
        if self.state == NodeState::Shutdown {
            return;
        }

        for id in self.traversal_order() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            match node.state {
                NodeState::Shutdown => continue,
                // Released when its initialisation failed
                NodeState::Failed => {}
                NodeState::Uninitialised | NodeState::Initialised => {
                    if let NodeKind::Drawable(drawable) = &mut node.kind {
                        log::debug!("Shutting down '{}'", node.name);
                        drawable.shutdown(backend);
                    }
                }
            }
            node.state = NodeState::Shutdown;
        }

        for (name, mut drawable) in self.retired.drain(..) {
            log::debug!("Shutting down removed node '{}'", name);
            drawable.shutdown(backend);
        }

        self.state = NodeState::Shutdown;
        log::info!("Scene graph shut down");
    }

    fn require_initialised(&self, operation: &'static str) -> SceneResult<()> {
        if self.state == NodeState::Initialised {
            Ok(())
        } else {
            Err(SceneError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}

/// Lazy pre-order iterator over graph nodes
pub struct PreOrder<'a> {
    graph: &'a SceneGraph,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, &'a SceneNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.graph.nodes.get(id) {
                self.stack.extend(node.children().iter().rev().copied());
                return Some((id, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec3, Vec4};
    use crate::render::{BackendResult, Camera, RecordingBackend};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<String>>>;

    #[derive(Debug)]
    struct Tracker {
        log: CallLog,
        fail_init: bool,
    }

    impl Tracker {
        fn new(log: &CallLog) -> Self {
            Self { log: Rc::clone(log), fail_init: false }
        }

        fn failing(log: &CallLog) -> Self {
            Self { log: Rc::clone(log), fail_init: true }
        }
    }

    impl Drawable for Tracker {
        fn initialise(&mut self, label: &str, _backend: &mut dyn RenderBackend) -> BackendResult<()> {
            self.log.borrow_mut().push(format!("init {}", label));
            if self.fail_init {
                return Err(RenderError::ResourceCreation {
                    kind: "pipeline",
                    label: label.to_string(),
                    reason: "refused".to_string(),
                });
            }
            Ok(())
        }

        fn render(&self, world: &Mat4, _frame: &mut FrameContext<'_>) -> BackendResult<()> {
            let origin = world * Vec4::new(0.0, 0.0, 0.0, 1.0);
            self.log.borrow_mut().push(format!("render {} {}", origin.x, origin.y));
            Ok(())
        }

        fn shutdown(&mut self, _backend: &mut dyn RenderBackend) {
            self.log.borrow_mut().push("shutdown".to_string());
        }
    }

    fn calls(log: &CallLog, prefix: &str) -> Vec<String> {
        log.borrow().iter().filter(|c| c.starts_with(prefix)).cloned().collect()
    }

    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    #[test]
    fn test_child_transform_composes_with_parent() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let a = graph.add_to_root(SceneNode::group("A").with_local_transform(translation(1.0, 0.0, 0.0)));
        let b = graph
            .add(a, SceneNode::drawable("B", Tracker::new(&log)).with_local_transform(translation(0.0, 1.0, 0.0)))
            .unwrap();

        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();
        graph.update(&Mat4::identity()).unwrap();

        let origin = graph.world_transform(b).unwrap() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(origin, Vec4::new(1.0, 1.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_update_uses_caller_parent_for_root() {
        let mut graph = SceneGraph::new("Root");
        let a = graph.add_to_root(SceneNode::group("A"));
        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();

        let parent = translation(0.0, 0.0, 5.0);
        graph.update(&parent).unwrap();
        assert_relative_eq!(graph.world_transform(a).unwrap(), parent, epsilon = 1e-6);
    }

    #[test]
    fn test_add_under_drawable_is_rejected() {
        let log = CallLog::default();
        let mut graph = SceneGraph::default();
        let leaf = graph.add_to_root(SceneNode::drawable("leaf", Tracker::new(&log)));

        let result = graph.add(leaf, SceneNode::group("child"));
        assert!(matches!(result, Err(SceneError::NotAGroup(name)) if name == "leaf"));
    }

    #[test]
    fn test_add_under_removed_parent_is_rejected() {
        let mut graph = SceneGraph::default();
        let group = graph.add_to_root(SceneNode::group("G"));
        assert!(graph.remove(group));
        assert!(matches!(graph.add(group, SceneNode::group("x")), Err(SceneError::UnknownNode(_))));
    }

    #[test]
    fn test_find_returns_first_preorder_match() {
        let mut graph = SceneGraph::new("Root");
        let first = graph.add_to_root(SceneNode::group("A"));
        let nested = graph.add(first, SceneNode::group("dup")).unwrap();
        let _later = graph.add_to_root(SceneNode::group("dup"));

        assert_eq!(graph.find("dup"), Some(nested));
        assert_eq!(graph.find("Root"), Some(graph.root()));
        assert_eq!(graph.find("missing"), None);
    }

    #[test]
    fn test_find_from_searches_subtree_only() {
        let mut graph = SceneGraph::new("Root");
        let left = graph.add_to_root(SceneNode::group("L"));
        let right = graph.add_to_root(SceneNode::group("R"));
        let target = graph.add(right, SceneNode::group("T")).unwrap();

        assert_eq!(graph.find_from(left, "T"), None);
        assert_eq!(graph.find_from(right, "T"), Some(target));
    }

    #[test]
    fn test_remove_then_find_misses() {
        let mut graph = SceneGraph::new("Root");
        let cube = graph.add_to_root(SceneNode::group("Cube"));
        let nested = graph.add(cube, SceneNode::group("Inner")).unwrap();

        assert!(graph.remove(cube));
        assert_eq!(graph.find("Cube"), None);
        assert!(!graph.contains(nested));
        assert!(!graph.remove(cube));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut graph = SceneGraph::new("Root");
        assert!(!graph.remove(graph.root()));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_render_order_matches_insertion_order() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let group = graph.add_to_root(SceneNode::group("G"));
        graph.add(group, SceneNode::drawable("first", Tracker::new(&log)).with_local_transform(translation(1.0, 0.0, 0.0))).unwrap();
        graph.add_to_root(SceneNode::drawable("third", Tracker::new(&log)).with_local_transform(translation(3.0, 0.0, 0.0)));
        graph.add(group, SceneNode::drawable("second", Tracker::new(&log)).with_local_transform(translation(2.0, 0.0, 0.0))).unwrap();

        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();
        graph.update(&Mat4::identity()).unwrap();
        let camera = Camera::new();
        let mut frame = FrameContext::new(&camera, Mat4::identity(), &mut backend);
        graph.render(&mut frame).unwrap();

        assert_eq!(calls(&log, "render"), vec!["render 1 0", "render 2 0", "render 3 0"]);
        assert_eq!(calls(&log, "init"), vec!["init first", "init second", "init third"]);
    }

    #[test]
    fn test_render_before_initialise_is_rejected() {
        let graph = SceneGraph::default();
        let mut backend = RecordingBackend::new();
        let camera = Camera::new();
        let mut frame = FrameContext::new(&camera, Mat4::identity(), &mut backend);
        assert!(matches!(
            graph.render(&mut frame),
            Err(SceneError::InvalidState { operation: "render", state: NodeState::Uninitialised })
        ));
    }

    #[test]
    fn test_initialise_stops_at_first_failure() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let a = graph.add_to_root(SceneNode::drawable("A", Tracker::new(&log)));
        let b = graph.add_to_root(SceneNode::drawable("B", Tracker::failing(&log)));
        let c = graph.add_to_root(SceneNode::drawable("C", Tracker::new(&log)));

        let mut backend = RecordingBackend::new();
        let result = graph.initialise(&mut backend);

        assert!(matches!(result, Err(SceneError::Initialisation { ref node, .. }) if node == "B"));
        assert_eq!(graph.get(a).unwrap().state(), NodeState::Initialised);
        assert_eq!(graph.get(b).unwrap().state(), NodeState::Failed);
        assert_eq!(graph.get(c).unwrap().state(), NodeState::Uninitialised);
        assert_eq!(calls(&log, "init"), vec!["init A", "init B"]);
        assert_eq!(graph.state(), NodeState::Uninitialised);
    }

    #[test]
    fn test_failed_node_is_released_once_and_never_retried() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        graph.add_to_root(SceneNode::drawable("A", Tracker::new(&log)));
        graph.add_to_root(SceneNode::drawable("B", Tracker::failing(&log)));
        graph.add_to_root(SceneNode::drawable("C", Tracker::new(&log)));

        let mut backend = RecordingBackend::new();
        assert!(graph.initialise(&mut backend).is_err());
        assert_eq!(calls(&log, "shutdown").len(), 1);

        let again = graph.initialise(&mut backend);
        assert!(matches!(again, Err(SceneError::FailedNode(ref name)) if name == "B"));
        assert_eq!(calls(&log, "init"), vec!["init A", "init B"]);

        graph.shutdown(&mut backend);
        // A and C now, B only at its failure
        assert_eq!(calls(&log, "shutdown").len(), 3);
    }

    #[test]
    fn test_removed_uninitialised_node_still_shut_down() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let pending = graph.add_to_root(SceneNode::drawable("pending", Tracker::new(&log)));

        assert!(graph.remove(pending));
        let mut backend = RecordingBackend::new();
        graph.shutdown(&mut backend);

        assert_eq!(calls(&log, "shutdown"), vec!["shutdown"]);
        assert!(calls(&log, "init").is_empty());
    }

    #[test]
    fn test_nodes_added_later_are_initialised_on_next_call() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        graph.add_to_root(SceneNode::drawable("early", Tracker::new(&log)));
        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();

        let late = graph.add_to_root(SceneNode::drawable("late", Tracker::new(&log)));
        assert_eq!(graph.get(late).unwrap().state(), NodeState::Uninitialised);

        graph.initialise(&mut backend).unwrap();
        assert_eq!(calls(&log, "init"), vec!["init early", "init late"]);
    }

    #[test]
    fn test_shutdown_reaches_every_drawable_once() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let group = graph.add_to_root(SceneNode::group("G"));
        graph.add(group, SceneNode::drawable("kept", Tracker::new(&log))).unwrap();
        let removed = graph.add_to_root(SceneNode::drawable("removed", Tracker::new(&log)));

        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();
        assert!(graph.remove(removed));

        graph.shutdown(&mut backend);
        graph.shutdown(&mut backend);

        assert_eq!(calls(&log, "shutdown").len(), 2);
        assert_eq!(graph.state(), NodeState::Shutdown);
        assert!(graph.update(&Mat4::identity()).is_err());
        assert!(graph.initialise(&mut backend).is_err());
    }

    #[test]
    fn test_removal_between_frames_skips_removed_node() {
        let log = CallLog::default();
        let mut graph = SceneGraph::new("Root");
        let first = graph.add_to_root(SceneNode::drawable("first", Tracker::new(&log)));
        graph.add_to_root(SceneNode::drawable("second", Tracker::new(&log)).with_local_transform(translation(2.0, 0.0, 0.0)));

        let mut backend = RecordingBackend::new();
        graph.initialise(&mut backend).unwrap();
        for id in graph.traversal_order() {
            if graph.get(id).map(SceneNode::name) == Some("first") {
                assert!(graph.remove(id));
            }
        }
        assert!(!graph.contains(first));

        graph.update(&Mat4::identity()).unwrap();
        let camera = Camera::new();
        let mut frame = FrameContext::new(&camera, Mat4::identity(), &mut backend);
        graph.render(&mut frame).unwrap();
        assert_eq!(calls(&log, "render"), vec!["render 2 0"]);
    }
}
