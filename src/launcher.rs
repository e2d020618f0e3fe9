// src/launcher.rs
// Launcher window and the launcher/overlay visibility toggle.

use druid::widget::{Button, Flex, Label};
use druid::{Env, EventCtx, Widget, WidgetExt, commands};

use crate::app::{AppState, SHOW_OVERLAY};

/// Which surface is up. `Arming` is the gap between a show request and the
/// snapshot being ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Launcher,
    Arming,
    Overlay,
}

#[derive(Debug, Default)]
pub struct VisibilityToggle {
    state: Visibility,
}

impl VisibilityToggle {
    pub fn state(&self) -> Visibility {
        self.state
    }

    /// Only one overlay at a time: false if one is already on its way.
    pub fn request_show(&mut self) -> bool {
        match self.state {
            Visibility::Launcher => {
                self.state = Visibility::Arming;
                true
            }
            Visibility::Arming | Visibility::Overlay => false,
        }
    }

    pub fn overlay_ready(&mut self) -> bool {
        match self.state {
            Visibility::Arming => {
                self.state = Visibility::Overlay;
                true
            }
            Visibility::Launcher | Visibility::Overlay => false,
        }
    }

    pub fn overlay_gone(&mut self) -> bool {
        let was_up = self.state != Visibility::Launcher;
        self.state = Visibility::Launcher;
        was_up
    }
}

pub fn build() -> impl Widget<AppState> {
    let capture = Button::new("New capture")
        .on_click(|ctx: &mut EventCtx, _data: &mut AppState, _env: &Env| ctx.submit_command(SHOW_OVERLAY))
        .disabled_if(|data: &AppState, _env: &Env| data.overlay_visible);
    let exit = Button::new("Exit")
        .on_click(|ctx: &mut EventCtx, _data: &mut AppState, _env: &Env| {
            ctx.submit_command(commands::QUIT_APP)
        });
    let status = Label::new(|data: &AppState, _env: &Env| data.status.clone()).with_text_size(13.0);

    Flex::column()
        .with_child(
            Flex::row()
                .with_child(capture)
                .with_spacer(8.0)
                .with_child(exit),
        )
        .with_spacer(10.0)
        .with_child(status)
        .padding(12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_then_ready_then_gone() {
        let mut t = VisibilityToggle::default();
        assert_eq!(t.state(), Visibility::Launcher);
        assert!(t.request_show());
        assert_eq!(t.state(), Visibility::Arming);
        assert!(t.overlay_ready());
        assert_eq!(t.state(), Visibility::Overlay);
        assert!(t.overlay_gone());
        assert_eq!(t.state(), Visibility::Launcher);
    }

    #[test]
    fn second_show_request_is_refused() {
        let mut t = VisibilityToggle::default();
        assert!(t.request_show());
        assert!(!t.request_show());
        t.overlay_ready();
        assert!(!t.request_show());
    }

    #[test]
    fn stale_snapshot_is_not_ready() {
        let mut t = VisibilityToggle::default();
        assert!(!t.overlay_ready());
        assert!(!t.overlay_gone());
        assert_eq!(t.state(), Visibility::Launcher);
    }

    #[test]
    fn failed_snapshot_returns_to_launcher() {
        let mut t = VisibilityToggle::default();
        t.request_show();
        assert!(t.overlay_gone());
        assert!(t.request_show());
    }
}
