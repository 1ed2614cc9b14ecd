use super::{
    focus::FocusManager,
    id::{NodeId, TypedId},
    world::Core,
};
use crate::{
    config::Config,
    error::Result,
    geom::{Rect, Size},
    widget::Widget,
};

/// Read-only context available to widgets during paint.
pub trait ViewContext {
    /// The node currently being painted or handled.
    fn node_id(&self) -> NodeId;

    /// The root node of the tree.
    fn root_id(&self) -> NodeId;

    /// Rectangle of the current node relative to its parent.
    fn rect(&self) -> Rect;

    /// Rectangle of the current node in screen coordinates.
    fn screen_rect(&self) -> Rect {
        self.node_screen_rect(self.node_id()).unwrap_or_default()
    }

    /// Size of the current node.
    fn size(&self) -> Size {
        self.rect().size()
    }

    /// Rectangle of a specific node in screen coordinates.
    fn node_screen_rect(&self, node: NodeId) -> Option<Rect>;

    /// Does the current node have focus?
    fn is_focused(&self) -> bool {
        self.node_is_focused(self.node_id())
    }

    /// Does the specified node have focus?
    fn node_is_focused(&self, node: NodeId) -> bool;

    /// Children of the current node in tree order.
    fn children(&self) -> Vec<NodeId> {
        self.children_of(self.node_id())
    }

    /// Children of a specific node in tree order.
    fn children_of(&self, node: NodeId) -> Vec<NodeId>;

    /// Return the parent of a node, or `None` if it is the root or not found.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;

    /// Screen and layout configuration.
    fn config(&self) -> &Config;
}

/// Mutable context available to widgets during event handling.
pub trait Context: ViewContext {
    /// Focus a node. Returns `true` if focus changed.
    fn set_focus(&mut self, node: NodeId) -> bool;

    /// Focus the first focusable node in the current node's subtree.
    fn focus_first(&mut self) -> bool {
        self.focus_first_in(self.node_id())
    }

    /// Focus the first focusable node in the specified subtree.
    fn focus_first_in(&mut self, root: NodeId) -> bool;

    /// Run another node's focus hook.
    fn focus_node(&mut self, node: NodeId) -> Result<()>;

    /// Clear focus.
    fn blur(&mut self);

    /// Mark the current node for repaint.
    fn set_dirty(&mut self) {
        self.set_dirty_of(self.node_id())
    }

    /// Mark a specific node for repaint.
    fn set_dirty_of(&mut self, node: NodeId);

    /// Set a node's hidden flag. Returns `true` if visibility changed.
    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> bool;

    /// Add a boxed widget as a child of `parent`.
    fn add_child_to_boxed(
        &mut self,
        parent: NodeId,
        widget: Box<dyn Widget>,
        rect: Rect,
    ) -> Result<NodeId>;

    /// Remove a node and its descendants from the arena.
    fn remove_subtree(&mut self, node: NodeId) -> Result<()>;

    /// Direct access to the arena, for navigation operations.
    fn core(&mut self) -> &mut Core;
}

impl dyn Context + '_ {
    /// Add a widget as a child of the current node.
    pub fn add_child<W>(&mut self, widget: W, rect: Rect) -> Result<TypedId<W>>
    where
        W: Widget + 'static,
    {
        let parent = self.node_id();
        let id = self.add_child_to_boxed(parent, Box::new(widget), rect)?;
        Ok(TypedId::new(id))
    }

    /// Execute a closure with mutable access to a widget of type `W`.
    pub fn with_widget<W, R>(
        &mut self,
        node: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> R,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        self.core().with_widget(node, f)
    }
}

/// Mutable context bound to one node.
pub struct CoreContext<'a> {
    /// Core state reference.
    core: &'a mut Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreContext<'a> {
    /// Create a new context for a node.
    pub fn new(core: &'a mut Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }

    /// A read-only view of this context.
    fn view(&self) -> CoreViewContext<'_> {
        CoreViewContext::new(&*self.core, self.node_id)
    }
}

impl<'a> ViewContext for CoreContext<'a> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> NodeId {
        self.core.root
    }

    fn rect(&self) -> Rect {
        self.view().rect()
    }

    fn node_screen_rect(&self, node: NodeId) -> Option<Rect> {
        self.core.screen_rect(node)
    }

    fn node_is_focused(&self, node: NodeId) -> bool {
        self.core.is_focused(node)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core.children_of(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.parent_of(node)
    }

    fn config(&self) -> &Config {
        self.core.config()
    }
}

impl<'a> Context for CoreContext<'a> {
    fn set_focus(&mut self, node: NodeId) -> bool {
        self.core.set_focus(node)
    }

    fn focus_first_in(&mut self, root: NodeId) -> bool {
        self.core.focus_first(root)
    }

    fn focus_node(&mut self, node: NodeId) -> Result<()> {
        self.core.focus_node(node)
    }

    fn blur(&mut self) {
        self.core.blur();
    }

    fn set_dirty_of(&mut self, node: NodeId) {
        self.core.set_dirty(node);
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) -> bool {
        self.core.set_hidden(node, hidden)
    }

    fn add_child_to_boxed(
        &mut self,
        parent: NodeId,
        widget: Box<dyn Widget>,
        rect: Rect,
    ) -> Result<NodeId> {
        self.core.add_child_to_boxed(parent, widget, rect)
    }

    fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        self.core.remove_subtree(node)
    }

    fn core(&mut self) -> &mut Core {
        &mut *self.core
    }
}

/// Read-only context bound to one node.
pub struct CoreViewContext<'a> {
    /// Core state reference.
    core: &'a Core,
    /// Node bound to this context.
    node_id: NodeId,
}

impl<'a> CoreViewContext<'a> {
    /// Create a new read-only context for a node.
    pub fn new(core: &'a Core, node_id: NodeId) -> Self {
        Self { core, node_id }
    }
}

impl<'a> ViewContext for CoreViewContext<'a> {
    fn node_id(&self) -> NodeId {
        self.node_id
    }

    fn root_id(&self) -> NodeId {
        self.core.root
    }

    fn rect(&self) -> Rect {
        self.core
            .nodes
            .get(self.node_id)
            .map(|node| node.rect)
            .unwrap_or_default()
    }

    fn node_screen_rect(&self, node: NodeId) -> Option<Rect> {
        self.core.screen_rect(node)
    }

    fn node_is_focused(&self, node: NodeId) -> bool {
        self.core.is_focused(node)
    }

    fn children_of(&self, node: NodeId) -> Vec<NodeId> {
        self.core.children_of(node)
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.core.parent_of(node)
    }

    fn config(&self) -> &Config {
        self.core.config()
    }
}
