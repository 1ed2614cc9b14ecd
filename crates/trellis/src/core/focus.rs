use tracing::trace;

use crate::{
    core::{id::NodeId, world::Core},
    event::Key,
    geom::{Direction, Rect},
};

/// Trait for managing the single focused widget.
pub trait FocusManager {
    /// The focused node, if it is still in the arena and attached to the root.
    fn focus_widget(&self) -> Option<NodeId>;

    /// Does the node have focus?
    fn is_focused(&self, node: NodeId) -> bool;

    /// Focus a node. Returns `true` if focus changed. Nodes that are missing,
    /// unfocusable, hidden, or detached from the root are refused.
    fn set_focus(&mut self, node: NodeId) -> bool;

    /// Clear focus, returning the node that held it.
    fn blur(&mut self) -> Option<NodeId>;

    /// Focus the first node that accepts focus in the pre-order traversal of
    /// the subtree at `root`.
    fn focus_first(&mut self, root: NodeId) -> bool;

    /// Move focus in a direction within the subtree at `root`. Returns `true`
    /// if focus changed.
    fn focus_dir(&mut self, root: NodeId, dir: Direction) -> bool;

    /// Re-navigate from the current focus in response to an unhandled key.
    /// Only arrow keys move focus.
    fn focus_update(&mut self, root: NodeId, key: Key) -> bool;

    /// Drop focus if it no longer refers to a live, attached node.
    fn ensure_focus_valid(&mut self);
}

impl FocusManager for Core {
    fn focus_widget(&self) -> Option<NodeId> {
        self.focus
            .filter(|id| self.nodes.contains_key(*id) && self.is_attached_to_root(*id))
    }

    fn is_focused(&self, node: NodeId) -> bool {
        self.focus_widget() == Some(node)
    }

    fn set_focus(&mut self, node: NodeId) -> bool {
        if self.is_focused(node) {
            return false;
        }
        if !is_focus_candidate(self, node) || !self.is_attached_to_root(node) {
            trace!(node = ?node, "refusing focus");
            return false;
        }
        if let Some(old) = self.focus {
            self.set_dirty(old);
        }
        self.set_dirty(node);
        self.focus = Some(node);
        true
    }

    fn blur(&mut self) -> Option<NodeId> {
        let old = self.focus.take()?;
        self.set_dirty(old);
        Some(old)
    }

    fn focus_first(&mut self, root: NodeId) -> bool {
        match first_focusable(self, root) {
            Some(target) => self.set_focus(target),
            None => false,
        }
    }

    fn focus_dir(&mut self, root: NodeId, dir: Direction) -> bool {
        let focusables = focusables(self, root);

        let Some(current) = self.focus_widget() else {
            return match focusables.first() {
                Some(first) => self.set_focus(*first),
                None => false,
            };
        };
        let Some(current_rect) = self.screen_rect(current) else {
            return false;
        };
        let current_center = current_rect.center();

        let in_direction: Vec<(NodeId, Rect)> = focusables
            .into_iter()
            .filter(|id| *id != current)
            .filter_map(|id| self.screen_rect(id).map(|r| (id, r)))
            .filter(|(_, rect)| {
                let center = rect.center();
                match dir {
                    Direction::Right => center.0 > current_center.0,
                    Direction::Left => center.0 < current_center.0,
                    Direction::Down => center.1 > current_center.1,
                    Direction::Up => center.1 < current_center.1,
                }
            })
            .collect();

        let overlaps = |rect: &Rect| match dir {
            Direction::Right | Direction::Left => rect.overlaps_vertical(current_rect),
            Direction::Down | Direction::Up => rect.overlaps_horizontal(current_rect),
        };
        let (overlapping, others): (Vec<_>, Vec<_>) =
            in_direction.into_iter().partition(|(_, rect)| overlaps(rect));
        let mut candidates = if overlapping.is_empty() {
            others
        } else {
            overlapping
        };

        candidates.sort_by_key(|(_, rect)| {
            let center = rect.center();
            let (edge_dist, cross_dist) = match dir {
                Direction::Right => (
                    (rect.left() as i64 - current_rect.right() as i64).max(0),
                    current_center.1.abs_diff(center.1),
                ),
                Direction::Left => (
                    (current_rect.left() as i64 - rect.right() as i64).max(0),
                    current_center.1.abs_diff(center.1),
                ),
                Direction::Down => (
                    (rect.top() as i64 - current_rect.bottom() as i64).max(0),
                    current_center.0.abs_diff(center.0),
                ),
                Direction::Up => (
                    (current_rect.top() as i64 - rect.bottom() as i64).max(0),
                    current_center.0.abs_diff(center.0),
                ),
            };
            (edge_dist, cross_dist)
        });

        match candidates.first() {
            Some((target, _)) => self.set_focus(*target),
            None => false,
        }
    }

    fn focus_update(&mut self, root: NodeId, key: Key) -> bool {
        let dir = match key {
            Key::Right => Direction::Right,
            Key::Left => Direction::Left,
            Key::Down => Direction::Down,
            Key::Up => Direction::Up,
            Key::Select | Key::Dfu | Key::Back => return false,
        };
        if self.focus_widget().is_none() {
            return false;
        }
        self.focus_dir(root, dir)
    }

    fn ensure_focus_valid(&mut self) {
        if self.focus.is_some() && self.focus_widget().is_none() {
            self.focus = None;
        }
    }
}

/// Collect focus candidates under `root` in pre-order, skipping hidden
/// subtrees.
fn focusables(core: &Core, root: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = core.nodes.get(id) else {
            continue;
        };
        if node.hidden {
            continue;
        }
        if node.focusable {
            out.push(id);
        }
        for child in node.children.iter().rev() {
            stack.push(*child);
        }
    }
    out
}

fn first_focusable(core: &Core, root: NodeId) -> Option<NodeId> {
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let Some(node) = core.nodes.get(id) else {
            continue;
        };
        if node.hidden {
            continue;
        }
        if node.focusable {
            return Some(id);
        }
        for child in node.children.iter().rev() {
            stack.push(*child);
        }
    }
    None
}

fn is_focus_candidate(core: &Core, node_id: NodeId) -> bool {
    core.nodes.get(node_id).is_some_and(|node| node.focusable) && core.is_visible(node_id)
}
