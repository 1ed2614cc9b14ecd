use crate::{core::id::NodeId, geom::Rect, widget::Widget};

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior and state. `None` while a handler on this node runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
    /// Widget name, cached for logging.
    pub(crate) name: &'static str,

    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, in paint order.
    pub(crate) children: Vec<NodeId>,

    /// Rectangle relative to the parent's origin.
    pub(crate) rect: Rect,

    /// Node visibility. Hidden nodes hide their whole subtree.
    pub(crate) hidden: bool,
    /// The node needs repainting.
    pub(crate) dirty: bool,
    /// The node can take key focus.
    pub(crate) focusable: bool,
    /// Whether the widget mount hook has run.
    pub(crate) mounted: bool,
}

impl Node {
    /// Return the node's widget name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Return the node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Return the node's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Return the rectangle relative to the parent.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Return true if the node is hidden.
    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// Return true if the node needs repainting.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Return true if the node can take focus.
    pub fn focusable(&self) -> bool {
        self.focusable
    }

    /// Return true if the widget mount hook has run.
    pub fn mounted(&self) -> bool {
        self.mounted
    }
}
