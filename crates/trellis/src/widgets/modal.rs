//! Modal message dialogs pushed onto a navigation stack.

use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    Context, Navigator, TypedId, ViewContext,
    config::Config,
    core::nav::NavId,
    error::Result,
    geom::{Point, Rect, Size},
    paint::Painter,
    style::{Color, Style},
    widget::{View, Widget},
    widgets::button::Button,
};

/// Callback receiving the user's answer to a dialog.
pub type ChoiceFn = Box<dyn FnOnce(bool)>;

/// Shared slot for the choice callback, taken by whichever button fires first.
type SharedChoice = Rc<RefCell<Option<ChoiceFn>>>;

/// The buttons a dialog offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModalKind {
    /// A single OK button that dismisses the dialog.
    #[default]
    Info,
    /// YES and NO buttons.
    YesNo,
    /// A single OK button that dismisses the dialog and the view beneath it.
    Abort,
}

/// How a button leaves the navigation stack.
#[derive(Debug, Clone, Copy)]
enum Dismiss {
    /// Pop the dialog.
    Dialog,
    /// Pop the dialog and the view beneath it.
    DialogAndParent,
}

/// A full-screen dialog with a title, a message and one or two buttons.
pub struct ModalMessageView {
    /// Navigation stack that owns this dialog.
    nav: NavId,
    /// Dialog title.
    title: String,
    /// Message text, split on newlines when painted.
    message: String,
    /// Which buttons to offer.
    kind: ModalKind,
    /// Answer callback, shared with the buttons.
    on_choice: SharedChoice,
    /// Start the message near the top instead of mid-screen.
    compact: bool,
    /// Dialog colors.
    style: Style,
    /// The OK button of Info and Abort dialogs.
    button_ok: Option<TypedId<Button>>,
    /// The YES button of YesNo dialogs.
    button_yes: Option<TypedId<Button>>,
    /// The NO button of YesNo dialogs.
    button_no: Option<TypedId<Button>>,
}

impl ModalMessageView {
    /// Construct a dialog owned by `nav`.
    pub fn new(
        nav: NavId,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: ModalKind,
        on_choice: Option<ChoiceFn>,
        compact: bool,
    ) -> Self {
        Self {
            nav,
            title: title.into(),
            message: message.into(),
            kind,
            on_choice: Rc::new(RefCell::new(on_choice)),
            compact,
            style: Style::new(Color::WHITE, Color::DARK_GREY),
            button_ok: None,
            button_yes: None,
            button_no: None,
        }
    }

    /// The dialog kind.
    pub fn kind(&self) -> ModalKind {
        self.kind
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The OK button, once mounted.
    pub fn button_ok(&self) -> Option<TypedId<Button>> {
        self.button_ok
    }

    /// The YES button, once mounted.
    pub fn button_yes(&self) -> Option<TypedId<Button>> {
        self.button_yes
    }

    /// The NO button, once mounted.
    pub fn button_no(&self) -> Option<TypedId<Button>> {
        self.button_no
    }

    /// Build a button action that answers with `value` and then dismisses.
    fn answer(&self, value: bool, dismiss: Dismiss) -> impl FnMut(&mut dyn Context) + 'static {
        let nav = self.nav;
        let choice = Rc::clone(&self.on_choice);
        move |ctx| {
            let on_choice = choice.borrow_mut().take();
            if let Some(on_choice) = on_choice {
                on_choice(value);
            }
            debug!(value, ?dismiss, "modal answered");
            let core = ctx.core();
            match dismiss {
                Dismiss::Dialog => {
                    core.pop(nav, true);
                }
                Dismiss::DialogAndParent if core.depth(nav) > 2 => {
                    core.pop(nav, false);
                    core.pop(nav, true);
                }
                // Only the base view is beneath, and it must be remounted.
                Dismiss::DialogAndParent => {
                    core.pop(nav, true);
                }
            }
        }
    }
}

/// Rectangle of a dialog button `cells` wide, centred and shifted by
/// `offset` cells, sitting five lines above the bottom of the view.
fn button_rect(view: Size, config: &Config, cells: u32, offset: i32) -> Rect {
    let w = config.cells_wide(cells);
    let x = (view.w / 2) as i32 - (w / 2) as i32 + offset * config.char_width as i32;
    let y = view.h as i32 - config.lines_high(5) as i32;
    Rect::new(x, y, w, config.lines_high(3))
}

impl Widget for ModalMessageView {
    fn on_mount(&mut self, ctx: &mut dyn Context) -> Result<()> {
        let size = ctx.size();
        let config = ctx.config().clone();
        match self.kind {
            ModalKind::Info | ModalKind::Abort => {
                let dismiss = if self.kind == ModalKind::Abort {
                    Dismiss::DialogAndParent
                } else {
                    Dismiss::Dialog
                };
                let ok = Button::new("OK").with_on_select(self.answer(true, dismiss));
                self.button_ok = Some(ctx.add_child(ok, button_rect(size, &config, 10, 0))?);
            }
            ModalKind::YesNo => {
                let yes = Button::new("YES").with_on_select(self.answer(true, Dismiss::Dialog));
                let no = Button::new("NO").with_on_select(self.answer(false, Dismiss::Dialog));
                self.button_yes = Some(ctx.add_child(yes, button_rect(size, &config, 8, -6))?);
                self.button_no = Some(ctx.add_child(no, button_rect(size, &config, 8, 6))?);
            }
        }
        Ok(())
    }

    fn focus(&mut self, ctx: &mut dyn Context) {
        let target = match self.kind {
            ModalKind::YesNo => self.button_yes,
            ModalKind::Info | ModalKind::Abort => self.button_ok,
        };
        match target {
            Some(button) => {
                ctx.set_focus(button.id());
            }
            None => {
                ctx.focus_first();
            }
        }
    }

    fn paint(&mut self, painter: &mut dyn Painter, ctx: &dyn ViewContext) -> Result<()> {
        let rect = ctx.screen_rect();
        painter.fill_rect(rect, self.style.bg)?;

        let config = ctx.config();
        let left = rect.left() + config.char_width as i32;
        painter.draw_string(
            Point::new(left, rect.top() + config.modal_title_top as i32),
            self.style,
            &self.title,
        )?;

        let top = if self.compact {
            config.modal_compact_text_top
        } else {
            config.modal_text_top
        };
        for (i, line) in self.message.split('\n').enumerate() {
            let y = rect.top() + (top + config.lines_high(i as u32)) as i32;
            painter.draw_string(Point::new(left, y), self.style, line)?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "modal"
    }
}

impl View for ModalMessageView {
    fn title(&self) -> String {
        self.title.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_geometry() {
        let config = Config::default();
        let view = Size::new(240, 320);
        assert_eq!(button_rect(view, &config, 10, 0), Rect::new(80, 240, 80, 48));
        assert_eq!(button_rect(view, &config, 8, -6), Rect::new(40, 240, 64, 48));
        assert_eq!(button_rect(view, &config, 8, 6), Rect::new(136, 240, 64, 48));
    }
}
