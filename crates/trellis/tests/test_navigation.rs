//! Integration tests for the navigation view stack.

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use proptest::prelude::*;
    use trellis::{
        App, Config, Navigator,
        error::Result,
        geom::Rect,
        testing::{Probe, ProbeView, ProbeWidget, RecordingPainter, init_tracing},
    };

    fn app_with_base(probe: &Probe) -> Result<App> {
        let probe = probe.clone();
        App::new(Config::default(), move |_| {
            ProbeView::new("base", probe).with_child(
                ProbeWidget::new(Probe::default()).focusable(),
                Rect::new(0, 0, 40, 20),
            )
        })
    }

    #[test]
    fn base_view_is_mounted_and_focused() -> Result<()> {
        init_tracing();
        let base = Probe::default();
        let app = app_with_base(&base)?;
        let nav = app.nav();

        assert_eq!(app.core.depth(nav), 1);
        assert_eq!(base.mounts.get(), 1);
        assert_eq!(base.focuses.get(), 1);
        let view = app.core.top_view(nav);
        assert_eq!(app.core.mounted_view(nav), view);
        let child = view.and_then(|v| app.core.children_of(v).first().copied());
        assert_eq!(app.focus_widget(), child);
        assert_eq!(app.core.nav_title(nav).as_deref(), Some("base"));
        Ok(())
    }

    #[test]
    fn pop_remounts_and_refocuses_previous_view() -> Result<()> {
        init_tracing();
        let mut app = app_with_base(&Probe::default())?;
        let nav = app.nav();
        let mut painter = RecordingPainter::default();

        let a = Probe::default();
        let a_child = Probe::default();
        let a_id = app.core.push(
            nav,
            ProbeView::new("A", a.clone()).with_child(
                ProbeWidget::new(a_child.clone()).focusable(),
                Rect::new(10, 10, 40, 20),
            ),
        )?;
        app.paint(&mut painter)?;
        let b = Probe::default();
        let b_id = app.core.push(nav, ProbeView::new("B", b.clone()))?;
        app.paint(&mut painter)?;

        assert_eq!(app.core.depth(nav), 3);
        assert_eq!(app.core.parent_of(a_id), None);
        let (paints, focuses) = (a.paints.get(), a.focuses.get());

        assert!(app.core.pop(nav, true));
        app.paint(&mut painter)?;

        assert_eq!(app.core.depth(nav), 2);
        assert!(!app.core.contains(b_id));
        assert_eq!(b.drops.get(), 1);
        assert_eq!(app.core.mounted_view(nav), Some(a_id.id()));
        assert_eq!(a.paints.get(), paints + 1);
        assert_eq!(a.focuses.get(), focuses + 1);
        assert_eq!(a.mounts.get(), 1);
        let focused = app.focus_widget();
        assert!(focused.is_some());
        assert_eq!(focused, app.core.children_of(a_id).first().copied());
        assert_eq!(app.core.nav_title(nav).as_deref(), Some("A"));
        Ok(())
    }

    #[test]
    fn replace_swaps_the_top_view() -> Result<()> {
        let mut app = app_with_base(&Probe::default())?;
        let nav = app.nav();
        let first = Probe::default();
        app.core.push(nav, ProbeView::new("first", first.clone()))?;

        let second = Probe::default();
        let id = app.core.replace(nav, ProbeView::new("second", second.clone()))?;
        assert_eq!(app.core.depth(nav), 2);
        assert_eq!(first.drops.get(), 1);
        assert_eq!(app.core.mounted_view(nav), Some(id.id()));

        // Replacing on a base-only stack pushes without popping.
        app.core.pop(nav, true);
        app.core.replace(nav, ProbeView::new("third", Probe::default()))?;
        assert_eq!(app.core.depth(nav), 2);
        Ok(())
    }

    #[test]
    fn push_with_receives_the_navigation_handle() -> Result<()> {
        let mut app = app_with_base(&Probe::default())?;
        let nav = app.nav();
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        app.core.push_with(nav, move |handle| {
            *s.borrow_mut() = Some(handle);
            ProbeView::new("child", Probe::default())
        })?;
        assert_eq!(*seen.borrow(), Some(nav));
        Ok(())
    }

    #[test]
    fn pop_without_update_leaves_nothing_mounted() -> Result<()> {
        let mut app = app_with_base(&Probe::default())?;
        let nav = app.nav();
        app.core.push(nav, ProbeView::new("a", Probe::default()))?;
        assert!(app.core.pop(nav, false));
        assert_eq!(app.core.mounted_view(nav), None);
        assert_eq!(app.focus_widget(), None);
        assert_eq!(app.core.depth(nav), 1);
        Ok(())
    }

    #[test]
    fn on_pop_fires_once_per_registration() -> Result<()> {
        let mut app = app_with_base(&Probe::default())?;
        let nav = app.nav();
        let fired = Rc::new(RefCell::new(Vec::new()));

        app.core.push(nav, ProbeView::new("a", Probe::default()))?;
        let f = fired.clone();
        assert!(app.core.set_on_pop(nav, move || f.borrow_mut().push("a")));
        app.core.push(nav, ProbeView::new("b", Probe::default()))?;
        let f = fired.clone();
        assert!(app.core.set_on_pop(nav, move || f.borrow_mut().push("b")));

        app.core.pop(nav, true);
        app.core.pop(nav, true);
        app.core.pop(nav, true);
        assert_eq!(*fired.borrow(), vec!["b", "a"]);
        Ok(())
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push,
        Pop,
        PopQuiet,
        Replace,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Push),
            Just(Op::Pop),
            Just(Op::PopQuiet),
            Just(Op::Replace),
        ]
    }

    proptest! {
        #[test]
        fn stack_invariants_hold(ops in prop::collection::vec(op(), 0..40)) {
            let probe = Probe::default();
            let mut app = app_with_base(&Probe::default())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let nav = app.nav();
            let mut created = 0usize;

            for op in ops {
                match op {
                    Op::Push => {
                        app.core
                            .push(nav, ProbeView::new("v", probe.clone()))
                            .map_err(|e| TestCaseError::fail(e.to_string()))?;
                        created += 1;
                    }
                    Op::Pop => {
                        app.core.pop(nav, true);
                    }
                    Op::PopQuiet => {
                        app.core.pop(nav, false);
                    }
                    Op::Replace => {
                        app.core
                            .replace(nav, ProbeView::new("v", probe.clone()))
                            .map_err(|e| TestCaseError::fail(e.to_string()))?;
                        created += 1;
                    }
                }

                let depth = app.core.depth(nav);
                prop_assert!(depth >= 1);
                let children = app.core.children_of(nav);
                prop_assert!(children.len() <= 1);
                if let Some(child) = children.first() {
                    prop_assert_eq!(Some(*child), app.core.top_view(nav));
                }
                // Every view that left the stack was destroyed.
                prop_assert_eq!(created - (depth - 1), probe.drops.get());
            }
        }
    }
}
