//! The navigation view and its stack of full-screen views.
//!
//! A [`NavigationView`] node owns an ordered stack of views. Only the top
//! view is attached as the navigation node's child; the views beneath it stay
//! alive in the arena, detached, until they are popped or the navigation
//! node is removed. The stack is never empty once mounted, and its base entry
//! cannot be popped.

use tracing::{debug, warn};

use crate::{
    Context, ViewContext,
    core::{
        focus::FocusManager,
        id::{NodeId, TypedId},
        world::Core,
    },
    error::{Error, Result},
    geom::Rect,
    paint::Painter,
    style::Style,
    widget::{View, Widget, view_title},
    widgets::modal::{ChoiceFn, ModalKind, ModalMessageView},
};

/// Callback run after a view has been popped and destroyed.
pub type OnPop = Box<dyn FnOnce()>;

/// Reads the title of a type-erased view.
type TitleFn = fn(&dyn Widget) -> Option<String>;

/// Typed handle to a navigation view node.
pub type NavId = TypedId<NavigationView>;

/// One owned view on a navigation stack.
struct ViewStackEntry {
    /// The view's node.
    view: NodeId,
    /// At most one callback, run when this entry is popped.
    on_pop: Option<OnPop>,
    /// Title accessor for the concrete view type.
    title: TitleFn,
}

/// The stack of views owned by one navigation node.
#[derive(Default)]
pub(crate) struct ViewStack {
    entries: Vec<ViewStackEntry>,
}

impl ViewStack {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn top(&self) -> Option<&ViewStackEntry> {
        self.entries.last()
    }

    /// Consume the stack, yielding every owned view from the base up.
    pub(crate) fn into_views(self) -> Vec<NodeId> {
        self.entries.into_iter().map(|e| e.view).collect()
    }
}

/// Container widget that shows the top view of its stack.
#[derive(Debug, Default)]
pub struct NavigationView {
    style: Style,
}

impl Widget for NavigationView {
    fn paint(&mut self, painter: &mut dyn Painter, ctx: &dyn ViewContext) -> Result<()> {
        painter.fill_rect(ctx.screen_rect(), self.style.bg)
    }

    fn focus(&mut self, ctx: &mut dyn Context) {
        if let Some(view) = ctx.children().first().copied()
            && let Err(e) = ctx.focus_node(view)
        {
            warn!(error = %e, "focusing mounted view");
        }
    }

    fn on_framesync(&mut self, ctx: &mut dyn Context) {
        if let Some(view) = ctx.children().first().copied()
            && let Err(e) = ctx.core().framesync(view)
        {
            warn!(error = %e, "forwarding frame sync");
        }
    }
}

/// Stack operations on navigation views stored in the arena.
pub trait Navigator {
    /// Create a navigation view under `parent` at `rect`, with `base` as its
    /// permanent bottom view. The base view is mounted and focused.
    fn mount_navigation<V: View>(
        &mut self,
        parent: NodeId,
        rect: Rect,
        base: impl FnOnce(NavId) -> V,
    ) -> Result<NavId>;

    /// Push a view, transferring ownership to the navigation stack. The
    /// previous top is unmounted but kept. The new view is mounted, focused,
    /// and marked for repaint.
    fn push<V: View>(&mut self, nav: NavId, view: V) -> Result<TypedId<V>>;

    /// Build a view with the navigation handle, then push it.
    fn push_with<V: View>(
        &mut self,
        nav: NavId,
        build: impl FnOnce(NavId) -> V,
    ) -> Result<TypedId<V>> {
        let view = build(nav);
        self.push(nav, view)
    }

    /// Pop and destroy the top view. Does nothing on a stack holding only
    /// its base view. When `trigger_update` is false the new top is not
    /// remounted, so a caller can pop again without an intermediate mount.
    /// The on-pop callback runs after the view has been dropped, which is
    /// after the current handler returns when a view pops itself.
    /// Returns `true` if a view was popped.
    fn pop(&mut self, nav: NavId, trigger_update: bool) -> bool;

    /// Pop the top view, then push `view`.
    fn replace<V: View>(&mut self, nav: NavId, view: V) -> Result<TypedId<V>> {
        self.pop(nav, true);
        self.push(nav, view)
    }

    /// Register a callback for when the top view is popped. Fails when only
    /// the base view is present or a callback is already registered.
    fn set_on_pop(&mut self, nav: NavId, on_pop: impl FnOnce() + 'static) -> bool;

    /// Push an informational dialog with a single OK button.
    fn display_modal(
        &mut self,
        nav: NavId,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<TypedId<ModalMessageView>> {
        self.display_modal_with(nav, title, message, ModalKind::Info, None, false)
    }

    /// Push a dialog of the given kind. `on_choice` receives the user's
    /// answer before the dialog is popped.
    fn display_modal_with(
        &mut self,
        nav: NavId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: ModalKind,
        on_choice: Option<ChoiceFn>,
        compact: bool,
    ) -> Result<TypedId<ModalMessageView>> {
        self.push_with(nav, |nav| {
            ModalMessageView::new(nav, title, message, kind, on_choice, compact)
        })
    }

    /// Does the stack hold only its base view?
    fn is_top(&self, nav: NavId) -> bool;

    /// Number of views on the stack.
    fn depth(&self, nav: NavId) -> usize;

    /// The view at the top of the stack.
    fn top_view(&self, nav: NavId) -> Option<NodeId>;

    /// The view currently attached under the navigation node.
    fn mounted_view(&self, nav: NavId) -> Option<NodeId>;

    /// Title of the top view.
    fn nav_title(&self, nav: NavId) -> Option<String>;
}

impl Navigator for Core {
    fn mount_navigation<V: View>(
        &mut self,
        parent: NodeId,
        rect: Rect,
        base: impl FnOnce(NavId) -> V,
    ) -> Result<NavId> {
        let nav = self.create_detached(NavigationView::default());
        self.set_rect(nav, rect)?;
        self.stacks.insert(nav.id(), ViewStack::default());

        let view = self.create_detached(base(nav));
        if let Some(stack) = self.stacks.get_mut(nav.id()) {
            stack.entries.push(ViewStackEntry {
                view: view.id(),
                on_pop: None,
                title: view_title::<V>,
            });
        }
        self.attach(parent, nav)?;
        update_view(self, nav.id())?;
        debug!(nav = ?nav.id(), "mounted navigation view");
        Ok(nav)
    }

    fn push<V: View>(&mut self, nav: NavId, view: V) -> Result<TypedId<V>> {
        let id = push_boxed(self, nav.id(), Box::new(view), view_title::<V>)?;
        Ok(TypedId::new(id))
    }

    fn pop(&mut self, nav: NavId, trigger_update: bool) -> bool {
        let nav = nav.id();
        let Some(stack) = self.stacks.get_mut(nav) else {
            debug!(nav = ?nav, "pop on a node without a view stack");
            return false;
        };
        if stack.len() <= 1 {
            debug!(nav = ?nav, "refusing to pop the base view");
            return false;
        }
        let Some(entry) = stack.entries.pop() else {
            return false;
        };
        let depth = stack.len();

        self.blur();
        if let Err(e) = self.remove_subtree(entry.view) {
            warn!(view = ?entry.view, error = %e, "destroying popped view");
        }
        if trigger_update && let Err(e) = update_view(self, nav) {
            warn!(nav = ?nav, error = %e, "remounting view after pop");
        }
        debug!(nav = ?nav, depth, "popped view");

        if let Some(on_pop) = entry.on_pop {
            self.defer(on_pop);
        }
        true
    }

    fn set_on_pop(&mut self, nav: NavId, on_pop: impl FnOnce() + 'static) -> bool {
        let Some(stack) = self.stacks.get_mut(nav.id()) else {
            return false;
        };
        if stack.len() <= 1 {
            debug!("on-pop callback refused for the base view");
            return false;
        }
        match stack.entries.last_mut() {
            Some(entry) if entry.on_pop.is_none() => {
                entry.on_pop = Some(Box::new(on_pop));
                true
            }
            _ => {
                debug!("on-pop callback already registered");
                false
            }
        }
    }

    fn is_top(&self, nav: NavId) -> bool {
        self.depth(nav) == 1
    }

    fn depth(&self, nav: NavId) -> usize {
        self.stacks.get(nav.id()).map_or(0, ViewStack::len)
    }

    fn top_view(&self, nav: NavId) -> Option<NodeId> {
        self.stacks.get(nav.id())?.top().map(|e| e.view)
    }

    fn mounted_view(&self, nav: NavId) -> Option<NodeId> {
        self.node(nav)?.children().first().copied()
    }

    fn nav_title(&self, nav: NavId) -> Option<String> {
        let entry = self.stacks.get(nav.id())?.top()?;
        let widget = self.nodes.get(entry.view)?.widget.as_deref()?;
        (entry.title)(widget)
    }
}

/// Park the mounted view and push a new one on top.
fn push_boxed(core: &mut Core, nav: NodeId, view: Box<dyn Widget>, title: TitleFn) -> Result<NodeId> {
    if !core.stacks.contains_key(nav) {
        return Err(Error::NotNavigation(nav));
    }
    core.blur();
    if let Some(current) = core.children_of(nav).first().copied() {
        core.detach(current)?;
    }

    let id = core.create_detached_boxed(view);
    let depth = match core.stacks.get_mut(nav) {
        Some(stack) => {
            stack.entries.push(ViewStackEntry {
                view: id,
                on_pop: None,
                title,
            });
            stack.len()
        }
        None => return Err(Error::NotNavigation(nav)),
    };
    update_view(core, nav)?;
    debug!(nav = ?nav, view = ?id, depth, "pushed view");
    Ok(id)
}

/// Size, mount, focus and dirty the top view. The base view leaves the info
/// bar strip free at the bottom of the navigation area.
fn update_view(core: &mut Core, nav: NodeId) -> Result<()> {
    let stack = core.stacks.get(nav).ok_or(Error::NotNavigation(nav))?;
    let Some(top) = stack.top().map(|e| e.view) else {
        return Ok(());
    };
    let reserve_info_bar = stack.len() == 1;

    let mut size = core.node(nav).ok_or(Error::NodeNotFound(nav))?.rect().size();
    if reserve_info_bar {
        size = size.shrink_height(core.config().info_bar_height);
    }
    core.set_rect(top, size.rect())?;
    if core.parent_of(top) != Some(nav) {
        core.attach(nav, top)?;
    }
    core.focus_node(top)?;
    core.set_dirty(top);
    core.set_dirty(nav);
    Ok(())
}
