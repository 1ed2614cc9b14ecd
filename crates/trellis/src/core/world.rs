use std::{
    any::{Any, type_name},
    collections::HashSet,
    mem,
};

use slotmap::{SecondaryMap, SlotMap};
use tracing::{debug, trace};

use super::{focus::FocusManager, nav::ViewStack};
use crate::{
    Context,
    config::Config,
    core::{
        context::CoreContext,
        id::{NodeId, TypedId},
        node::Node,
    },
    error::{Error, Result},
    event::{Key, TouchEvent},
    geom::Rect,
    widget::{EventOutcome, Widget},
};

/// Core state: the node arena, focus, and navigation stacks.
pub struct Core {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    pub(crate) root: NodeId,
    /// Currently focused node.
    pub(crate) focus: Option<NodeId>,
    /// View stacks, keyed by the navigation node that owns them.
    pub(crate) stacks: SecondaryMap<NodeId, ViewStack>,
    /// Screen and layout configuration.
    config: Config,
    /// Number of widget handlers currently running.
    handler_depth: usize,
    /// Callbacks held back until the outermost handler has returned.
    deferred: Vec<Box<dyn FnOnce()>>,
}

impl Core {
    /// Create a new Core with a root node covering the configured screen.
    pub fn new(config: Config) -> Self {
        let mut nodes = SlotMap::with_key();
        let root_widget = RootContainer;
        let name = root_widget.name();
        let root = nodes.insert(Node {
            widget: Some(Box::new(root_widget)),
            name,
            parent: None,
            children: Vec::new(),
            rect: config.screen_rect(),
            hidden: false,
            dirty: true,
            focusable: false,
            mounted: true,
        });

        Self {
            nodes,
            root,
            focus: None,
            stacks: SecondaryMap::new(),
            config,
            handler_depth: 0,
            deferred: Vec::new(),
        }
    }

    /// Return the root node ID.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Return the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return a reference to a node by id.
    pub fn node(&self, node_id: impl Into<NodeId>) -> Option<&Node> {
        self.nodes.get(node_id.into())
    }

    /// Does the arena still hold this node?
    pub fn contains(&self, node_id: impl Into<NodeId>) -> bool {
        self.nodes.contains_key(node_id.into())
    }

    /// Number of nodes in the arena, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return a node's children, or an empty list if the node does not exist.
    pub fn children_of(&self, node_id: impl Into<NodeId>) -> Vec<NodeId> {
        self.nodes
            .get(node_id.into())
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    /// Return a node's parent.
    pub fn parent_of(&self, node_id: impl Into<NodeId>) -> Option<NodeId> {
        self.nodes.get(node_id.into()).and_then(|node| node.parent)
    }

    /// Add a boxed widget to the arena and return its node ID.
    fn add_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        let name = widget.name();
        let focusable = widget.accept_focus();
        self.nodes.insert(Node {
            widget: Some(widget),
            name,
            parent: None,
            children: Vec::new(),
            rect: Rect::default(),
            hidden: false,
            dirty: true,
            focusable,
            mounted: false,
        })
    }

    /// Create a node in the arena detached from the tree.
    pub fn create_detached<W>(&mut self, widget: W) -> TypedId<W>
    where
        W: Widget + 'static,
    {
        TypedId::new(self.add_boxed(Box::new(widget)))
    }

    /// Create a node in the arena detached from the tree using a boxed widget.
    pub fn create_detached_boxed(&mut self, widget: Box<dyn Widget>) -> NodeId {
        self.add_boxed(widget)
    }

    /// Add a widget as a child of `parent`, placed at `rect` in the parent's
    /// coordinates.
    pub fn add_child_to<W>(
        &mut self,
        parent: impl Into<NodeId>,
        widget: W,
        rect: Rect,
    ) -> Result<TypedId<W>>
    where
        W: Widget + 'static,
    {
        let id = self.add_child_to_boxed(parent, Box::new(widget), rect)?;
        Ok(TypedId::new(id))
    }

    /// Add a boxed widget as a child of `parent` and return the new node ID.
    pub fn add_child_to_boxed(
        &mut self,
        parent: impl Into<NodeId>,
        widget: Box<dyn Widget>,
        rect: Rect,
    ) -> Result<NodeId> {
        let parent = parent.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let child = self.create_detached_boxed(widget);
        if let Some(node) = self.nodes.get_mut(child) {
            node.rect = rect;
        }
        if let Err(e) = self.attach(parent, child) {
            self.nodes.remove(child);
            return Err(e);
        }
        Ok(child)
    }

    /// Attach a detached child as the last child of a parent. If the parent
    /// is attached to the root, unmounted nodes in the child's subtree are
    /// mounted in pre-order.
    pub fn attach(&mut self, parent: impl Into<NodeId>, child: impl Into<NodeId>) -> Result<()> {
        let parent = parent.into();
        let child = child.into();
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        if child == self.root || self.nodes.get(child).and_then(|n| n.parent).is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }

        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }

        if self.is_attached_to_root(parent) {
            self.mount_subtree_pre_order(child)?;
        }
        Ok(())
    }

    /// Detach a child from its parent, keeping it in the arena. Focus held
    /// inside the detached subtree is released.
    pub fn detach(&mut self, child: impl Into<NodeId>) -> Result<()> {
        let child = child.into();
        if !self.nodes.contains_key(child) {
            return Err(Error::NodeNotFound(child));
        }
        let Some(parent) = self.nodes.get(child).and_then(|node| node.parent) else {
            return Ok(());
        };
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.retain(|id| *id != child);
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.ensure_focus_valid();
        Ok(())
    }

    /// Run the mount hook for a node if it has not been mounted yet.
    pub(crate) fn mount_node(&mut self, node_id: NodeId) -> Result<()> {
        let should_mount = self.nodes.get(node_id).is_some_and(|node| !node.mounted);
        if !should_mount {
            return Ok(());
        }
        // Flag first so children added by the hook are not mounted twice.
        if let Some(node) = self.nodes.get_mut(node_id) {
            node.mounted = true;
        }
        trace!(node = ?node_id, "mount");
        self.with_widget_mut(node_id, |widget, core| {
            let mut ctx = CoreContext::new(core, node_id);
            widget.on_mount(&mut ctx)
        })?
    }

    /// Mount unmounted nodes in a subtree using pre-order traversal.
    fn mount_subtree_pre_order(&mut self, root: NodeId) -> Result<()> {
        let mut stack = vec![root];
        while let Some(node_id) = stack.pop() {
            if !self.nodes.contains_key(node_id) {
                continue;
            }
            self.mount_node(node_id)?;
            for child in self.children_of(node_id).into_iter().rev() {
                stack.push(child);
            }
        }
        Ok(())
    }

    /// Remove a node and all descendants from the arena, dropping their
    /// widgets children-first. Views held on the stacks of navigation nodes
    /// in the subtree are removed too. Focus inside the subtree is released.
    pub fn remove_subtree(&mut self, root_id: impl Into<NodeId>) -> Result<()> {
        let root_id = root_id.into();
        if root_id == self.root {
            return Err(Error::InvalidOperation("cannot remove root".into()));
        }
        if !self.nodes.contains_key(root_id) {
            return Err(Error::NodeNotFound(root_id));
        }

        let post_order = self.subtree_post_order(root_id);
        let members: HashSet<NodeId> = post_order.iter().copied().collect();

        // Views parked on a removed navigation node's stack are detached, so
        // they are not part of the subtree walk.
        for node_id in &post_order {
            let Some(stack) = self.stacks.remove(*node_id) else {
                continue;
            };
            for view in stack.into_views() {
                if !members.contains(&view) && self.nodes.contains_key(view) {
                    self.remove_subtree(view)?;
                }
            }
        }

        if let Some(parent) = self.nodes.get(root_id).and_then(|node| node.parent)
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.children.retain(|id| *id != root_id);
        }

        if self.focus.is_some_and(|f| members.contains(&f)) {
            self.focus = None;
        }

        for node_id in &post_order {
            self.nodes.remove(*node_id);
        }
        debug!(node = ?root_id, removed = post_order.len(), "removed subtree");
        Ok(())
    }

    /// Collect a subtree in post-order, including the root.
    fn subtree_post_order(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((node_id, visited)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            if visited {
                out.push(node_id);
                continue;
            }
            stack.push((node_id, true));
            for child in node.children.iter().rev() {
                stack.push((*child, false));
            }
        }
        out
    }

    /// Return true if `ancestor` appears in the parent chain of `node`.
    pub(crate) fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Return true if `node_id` is attached to the root.
    pub fn is_attached_to_root(&self, node_id: impl Into<NodeId>) -> bool {
        self.is_ancestor(self.root, node_id.into())
    }

    /// Return true if the node and all of its ancestors are visible.
    pub fn is_visible(&self, node_id: impl Into<NodeId>) -> bool {
        let mut current = Some(node_id.into());
        while let Some(id) = current {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if node.hidden {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// Set a node's hidden flag. Returns `true` if visibility changed.
    pub fn set_hidden(&mut self, node_id: impl Into<NodeId>, hidden: bool) -> bool {
        let node_id = node_id.into();
        let Some(node) = self.nodes.get_mut(node_id) else {
            return false;
        };
        let changed = node.hidden != hidden;
        node.hidden = hidden;
        if changed {
            node.dirty = true;
            if let Some(parent) = node.parent {
                self.set_dirty(parent);
            }
        }
        changed
    }

    /// Hide a node. Returns `true` if visibility changed.
    pub fn hide(&mut self, node_id: impl Into<NodeId>) -> bool {
        self.set_hidden(node_id, true)
    }

    /// Show a node. Returns `true` if visibility changed.
    pub fn show(&mut self, node_id: impl Into<NodeId>) -> bool {
        self.set_hidden(node_id, false)
    }

    /// Mark a node as needing repaint. Unknown nodes are ignored.
    pub fn set_dirty(&mut self, node_id: impl Into<NodeId>) {
        if let Some(node) = self.nodes.get_mut(node_id.into()) {
            node.dirty = true;
        }
    }

    /// Return true if the node is marked for repaint.
    pub fn is_dirty(&self, node_id: impl Into<NodeId>) -> bool {
        self.nodes.get(node_id.into()).is_some_and(|node| node.dirty)
    }

    /// Set a node's rectangle, relative to its parent.
    pub fn set_rect(&mut self, node_id: impl Into<NodeId>, rect: Rect) -> Result<()> {
        let node_id = node_id.into();
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        if node.rect != rect {
            node.rect = rect;
            node.dirty = true;
        }
        Ok(())
    }

    /// Return a node's rectangle in screen coordinates.
    pub fn screen_rect(&self, node_id: impl Into<NodeId>) -> Option<Rect> {
        let node_id = node_id.into();
        let mut rect = self.nodes.get(node_id)?.rect;
        let mut current = self.nodes.get(node_id)?.parent;
        while let Some(id) = current {
            let node = self.nodes.get(id)?;
            rect = rect.translate(node.rect.tl);
            current = node.parent;
        }
        Some(rect)
    }

    /// Take a mutable reference to a widget for a single call.
    ///
    /// The widget is out of its slot for the duration of `f`. If `f` removes
    /// the node, the widget is dropped after `f` returns. Callbacks deferred
    /// during `f` run once the outermost call has settled its widget.
    pub(crate) fn with_widget_mut<R>(
        &mut self,
        node_id: NodeId,
        f: impl FnOnce(&mut dyn Widget, &mut Self) -> R,
    ) -> Result<R> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        let mut widget = node
            .widget
            .take()
            .ok_or(Error::ReentrantWidgetBorrow(node_id))?;
        self.handler_depth += 1;
        let out = f(widget.as_mut(), self);
        self.handler_depth -= 1;
        match self.nodes.get_mut(node_id) {
            Some(node) if node.widget.is_none() => node.widget = Some(widget),
            _ => drop(widget),
        }
        if self.handler_depth == 0 {
            self.run_deferred();
        }
        Ok(out)
    }

    /// Run `f` now if no widget handler is active, otherwise after the
    /// outermost handler returns and any widget it removed has been dropped.
    pub(crate) fn defer(&mut self, f: Box<dyn FnOnce()>) {
        if self.handler_depth == 0 {
            f();
        } else {
            self.deferred.push(f);
        }
    }

    fn run_deferred(&mut self) {
        for f in mem::take(&mut self.deferred) {
            f();
        }
    }

    /// Run a closure on a concrete widget with a context bound to its node.
    pub fn with_widget<W, R>(
        &mut self,
        node_id: impl Into<NodeId>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> R,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        let node_id = node_id.into();
        self.with_widget_mut(node_id, |widget, core| {
            let any = widget as &mut dyn Any;
            let widget = any
                .downcast_mut::<W>()
                .ok_or(Error::WidgetType(type_name::<W>()))?;
            let mut ctx = CoreContext::new(core, node_id);
            Ok(f(widget, &mut ctx))
        })?
    }

    /// Run a closure on a concrete widget addressed by a typed id.
    pub fn with_typed<W, R>(
        &mut self,
        id: TypedId<W>,
        f: impl FnOnce(&mut W, &mut dyn Context) -> R,
    ) -> Result<R>
    where
        W: Widget + 'static,
    {
        self.with_widget(id, f)
    }

    /// Run a node's focus hook.
    pub fn focus_node(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let node_id = node_id.into();
        match self.with_widget_mut(node_id, |widget, core| {
            widget.focus(&mut CoreContext::new(core, node_id));
        }) {
            // The widget is already running a handler; fall back to the
            // default focus behavior for its subtree.
            Err(Error::ReentrantWidgetBorrow(_)) => {
                self.focus_first(node_id);
                Ok(())
            }
            other => other,
        }
    }

    /// Deliver a touch event to one node.
    pub fn dispatch_touch(&mut self, node_id: NodeId, event: TouchEvent) -> Result<EventOutcome> {
        self.with_widget_mut(node_id, |widget, core| {
            widget.on_touch(event, &mut CoreContext::new(core, node_id))
        })
    }

    /// Deliver a key press to one node.
    pub fn dispatch_key(&mut self, node_id: NodeId, key: Key) -> Result<EventOutcome> {
        self.with_widget_mut(node_id, |widget, core| {
            widget.on_key(key, &mut CoreContext::new(core, node_id))
        })
    }

    /// Deliver an encoder step to one node.
    pub fn dispatch_encoder(&mut self, node_id: NodeId, delta: i32) -> Result<EventOutcome> {
        self.with_widget_mut(node_id, |widget, core| {
            widget.on_encoder(delta, &mut CoreContext::new(core, node_id))
        })
    }

    /// Deliver a keyboard character to one node.
    pub fn dispatch_keyboard(&mut self, node_id: NodeId, ch: u8) -> Result<EventOutcome> {
        self.with_widget_mut(node_id, |widget, core| {
            widget.on_keyboard(ch, &mut CoreContext::new(core, node_id))
        })
    }

    /// Run a node's frame-sync hook.
    pub fn framesync(&mut self, node_id: impl Into<NodeId>) -> Result<()> {
        let node_id = node_id.into();
        self.with_widget_mut(node_id, |widget, core| {
            widget.on_framesync(&mut CoreContext::new(core, node_id));
        })
    }
}

#[derive(Default)]
/// Root widget container used for the implicit root node.
struct RootContainer;

impl Widget for RootContainer {
    fn name(&self) -> &'static str {
        "root"
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    struct Leaf {
        drops: Rc<Cell<usize>>,
        mounts: Rc<Cell<usize>>,
    }

    impl Widget for Leaf {
        fn accept_focus(&self) -> bool {
            true
        }

        fn on_mount(&mut self, _ctx: &mut dyn Context) -> Result<()> {
            self.mounts.set(self.mounts.get() + 1);
            Ok(())
        }
    }

    impl Drop for Leaf {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    fn leaf(drops: &Rc<Cell<usize>>, mounts: &Rc<Cell<usize>>) -> Leaf {
        Leaf {
            drops: drops.clone(),
            mounts: mounts.clone(),
        }
    }

    #[test]
    fn mount_runs_once_on_attach_to_root() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));

        let a = core.create_detached(leaf(&drops, &mounts));
        assert_eq!(mounts.get(), 0);
        core.attach(core.root_id(), a)?;
        assert_eq!(mounts.get(), 1);

        core.detach(a)?;
        core.attach(core.root_id(), a)?;
        assert_eq!(mounts.get(), 1);
        Ok(())
    }

    #[test]
    fn attach_rejects_cycles_and_double_parents() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::default())?;
        let b = core.add_child_to(a, leaf(&drops, &mounts), Rect::default())?;

        assert!(matches!(
            core.attach(core.root_id(), b),
            Err(Error::AlreadyAttached(_))
        ));
        core.detach(a)?;
        assert!(matches!(
            core.attach(b, a),
            Err(Error::WouldCreateCycle { .. })
        ));
        Ok(())
    }

    #[test]
    fn remove_subtree_drops_every_widget() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::default())?;
        let b = core.add_child_to(a, leaf(&drops, &mounts), Rect::default())?;
        core.add_child_to(b, leaf(&drops, &mounts), Rect::default())?;

        core.set_focus(b.id());
        core.remove_subtree(a)?;
        assert_eq!(drops.get(), 3);
        assert_eq!(core.node_count(), 1);
        assert!(core.focus_widget().is_none());
        assert!(matches!(
            core.remove_subtree(core.root_id()),
            Err(Error::InvalidOperation(_))
        ));
        Ok(())
    }

    #[test]
    fn screen_rect_accumulates_offsets() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::new(10, 20, 100, 100))?;
        let b = core.add_child_to(a, leaf(&drops, &mounts), Rect::new(5, 5, 10, 10))?;
        assert_eq!(core.screen_rect(b), Some(Rect::new(15, 25, 10, 10)));
        Ok(())
    }

    #[test]
    fn widget_may_remove_its_own_node() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::default())?;

        core.with_typed(a, |_, ctx| ctx.core().remove_subtree(a))??;
        assert_eq!(drops.get(), 1);
        assert!(!core.contains(a));
        assert!(matches!(
            core.with_typed(a, |_, _| ()),
            Err(Error::NodeNotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn deferred_callback_runs_after_removed_widget_drops() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::default())?;

        let seen = Rc::new(Cell::new(None));
        let (s, d) = (seen.clone(), drops.clone());
        core.with_typed(a, move |_, ctx| -> Result<()> {
            let core = ctx.core();
            core.remove_subtree(a)?;
            core.defer(Box::new(move || s.set(Some(d.get()))));
            Ok(())
        })??;
        assert_eq!(seen.get(), Some(1));

        let (s, d) = (seen.clone(), drops.clone());
        core.defer(Box::new(move || s.set(Some(d.get() + 10))));
        assert_eq!(seen.get(), Some(11));
        Ok(())
    }

    #[test]
    fn reentrant_access_is_an_error() -> Result<()> {
        let mut core = Core::new(Config::default());
        let (drops, mounts) = (Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        let a = core.add_child_to(core.root_id(), leaf(&drops, &mounts), Rect::default())?;

        let inner = core.with_typed(a, |_, ctx| ctx.core().with_typed(a, |_, _| ()))?;
        assert!(matches!(inner, Err(Error::ReentrantWidgetBorrow(_))));
        Ok(())
    }
}
