//! Scene node types
//!
//! A [`SceneNode`] is either a group holding ordered children or a leaf
//! wrapping a [`Drawable`]. Nodes live in the [`SceneGraph`](super::SceneGraph)
//! arena and refer to each other by [`NodeId`].

use std::fmt;

use crate::foundation::math::Mat4;
use crate::render::{BackendResult, FrameContext, RenderBackend};

slotmap::new_key_type! {
    /// Stable handle to a node stored in a scene graph
    pub struct NodeId;
}

/// Lifecycle of a node or of the whole graph
///
/// Transitions only move forward: `Uninitialised → Initialised → Shutdown`,
/// or `Uninitialised → Failed → Shutdown` when initialisation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// Created, no backend resources yet
    #[default]
    Uninitialised,
    /// Backend resources created
    Initialised,
    /// Initialisation failed; partial resources were released and the node
    /// is never initialised or drawn again
    Failed,
    /// Resources released; the node will not be drawn again
    Shutdown,
}

/// Something that can be drawn by the scene graph
///
/// The graph calls `initialise` at most once per node lifetime before any
/// `render`, and `shutdown` exactly once. A failed `initialise` may leave
/// partial resources behind; the graph calls `shutdown` straight away, so it
/// must release whatever was created.
pub trait Drawable: fmt::Debug {
    /// Create backend resources. `label` is the owning node's name.
    fn initialise(&mut self, label: &str, backend: &mut dyn RenderBackend) -> BackendResult<()>;

    /// Submit draws for this frame using the node's combined transform
    fn render(&self, world: &Mat4, frame: &mut FrameContext<'_>) -> BackendResult<()>;

    /// Release backend resources
    fn shutdown(&mut self, backend: &mut dyn RenderBackend);
}

pub(crate) enum NodeKind {
    Group(Vec<NodeId>),
    Drawable(Box<dyn Drawable>),
}

/// A named node with a local and a combined transform
pub struct SceneNode {
    pub(crate) name: String,
    pub(crate) local: Mat4,
    pub(crate) world: Mat4,
    pub(crate) state: NodeState,
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            local: Mat4::identity(),
            world: Mat4::identity(),
            state: NodeState::Uninitialised,
            parent: None,
            kind,
        }
    }

    /// Create an empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group(Vec::new()))
    }

    /// Create a leaf node wrapping a drawable
    pub fn drawable(name: impl Into<String>, drawable: impl Drawable + 'static) -> Self {
        Self::with_kind(name, NodeKind::Drawable(Box::new(drawable)))
    }

    /// Set the initial transform relative to the parent
    pub fn with_local_transform(mut self, transform: Mat4) -> Self {
        self.local = transform;
        self
    }

    /// Node name; names are not required to be unique
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Mat4 {
        &self.local
    }

    /// Combined transform from the last graph update
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Lifecycle state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Parent node, `None` for the root and for detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Whether this node can hold children
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// Children in render order; empty for drawables
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group(children) => children,
            NodeKind::Drawable(_) => &[],
        }
    }
}

impl fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            NodeKind::Group(children) => format!("Group({} children)", children.len()),
            NodeKind::Drawable(drawable) => format!("{:?}", drawable),
        };
        f.debug_struct("SceneNode")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("parent", &self.parent)
            .field("kind", &kind)
            .finish()
    }
}
