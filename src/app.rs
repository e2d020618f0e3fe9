// src/app.rs
// Shared app data, commands, and the delegate that owns the window handles.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use druid::{
    AppDelegate, Command, Data, DelegateCtx, Env, Handled, Point, Screen, Selector, Size, Target,
    WindowDesc, WindowHandle, WindowId, commands,
};
use log::{debug, error, info, warn};
use rfd::{MessageDialog, MessageLevel};

use crate::actions::MenuAction;
use crate::capture::{FrozenScreen, SystemClipboard};
use crate::config::Config;
use crate::launcher::VisibilityToggle;
use crate::overlay::OverlayWidget;

/// Launcher button, tray entry or shortcut asked for the overlay.
pub const SHOW_OVERLAY: Selector = Selector::new("regionshot.show-overlay");
/// Snapshot worker is done.
pub const SNAPSHOT_READY: Selector<Result<FrozenScreen, String>> =
    Selector::new("regionshot.snapshot-ready");
/// Overlay hid itself; payload is the status line for the launcher.
pub const OVERLAY_FINISHED: Selector<String> = Selector::new("regionshot.overlay-finished");
/// Context menu choice, targeted at the overlay window.
pub const MENU_ACTION: Selector<MenuAction> = Selector::new("regionshot.menu-action");

#[derive(Clone, Data)]
pub struct AppState {
    pub status: String,
    pub overlay_visible: bool,
}

pub struct Delegate {
    config: Config,
    launcher_id: WindowId,
    launcher: Option<WindowHandle>,
    overlay: Option<WindowId>,
    toggle: VisibilityToggle,
    clipboard: Rc<RefCell<SystemClipboard>>,
}

impl Delegate {
    pub fn new(config: Config, launcher_id: WindowId) -> Self {
        Delegate {
            config,
            launcher_id,
            launcher: None,
            overlay: None,
            toggle: VisibilityToggle::default(),
            clipboard: Rc::new(RefCell::new(SystemClipboard::default())),
        }
    }

    fn show_overlay(&mut self, ctx: &mut DelegateCtx) {
        if !self.toggle.request_show() {
            debug!("overlay already {:?}, ignoring show request", self.toggle.state());
            return;
        }
        if let Some(launcher) = &self.launcher {
            launcher.hide();
        }

        // give the launcher time to disappear before grabbing the screen
        let sink = ctx.get_external_handle();
        let delay = Duration::from_millis(self.config.launcher.capture_delay_ms);
        thread::spawn(move || {
            thread::sleep(delay);
            let result = FrozenScreen::capture_primary().map_err(|e| e.to_string());
            if let Err(e) = sink.submit_command(SNAPSHOT_READY, result, Target::Auto) {
                error!("Failed to deliver snapshot: {}", e);
            }
        });
    }

    fn open_overlay(&mut self, ctx: &mut DelegateCtx, data: &mut AppState, snapshot: Result<FrozenScreen, String>) {
        let screen = match snapshot {
            Ok(screen) => screen,
            Err(e) => {
                error!("screen capture failed: {}", e);
                self.toggle.overlay_gone();
                self.reshow_launcher();
                data.status = format!("Screen capture failed: {e}");
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Screen capture failed")
                    .set_description(&e)
                    .show();
                return;
            }
        };
        if !self.toggle.overlay_ready() {
            warn!("snapshot arrived with no pending show request, dropping it");
            return;
        }

        let (origin, size) = overlay_geometry(&screen);
        let widget = OverlayWidget::new(
            screen,
            self.config.overlay.clone(),
            self.config.save.clone(),
            Rc::clone(&self.clipboard),
        );
        let window = WindowDesc::new(widget)
            .title("regionshot")
            .show_titlebar(false)
            .resizable(false)
            .set_always_on_top(true)
            .set_position(origin)
            .window_size(size);
        self.overlay = Some(window.id);
        ctx.new_window(window);
        data.overlay_visible = true;
        info!("overlay shown at {:?} size {:?}", origin, size);
    }

    fn close_overlay(&mut self, ctx: &mut DelegateCtx, data: &mut AppState, status: String) {
        if let Some(id) = self.overlay.take() {
            ctx.submit_command(commands::CLOSE_WINDOW.to(id));
        }
        self.toggle.overlay_gone();
        data.overlay_visible = false;
        data.status = status;
        if self.config.launcher.reshow_after_capture {
            self.reshow_launcher();
        }
    }

    fn reshow_launcher(&self) {
        if let Some(launcher) = &self.launcher {
            launcher.show();
            launcher.bring_to_front_and_focus();
        }
    }
}

/// Overlay covers the primary monitor. Sizes are in display points, which is
/// what druid windows use; the snapshot may have more pixels than that.
fn overlay_geometry(screen: &FrozenScreen) -> (Point, Size) {
    let monitors = Screen::get_monitors();
    match monitors.iter().find(|m| m.is_primary()).or_else(|| monitors.first()) {
        Some(monitor) => {
            let rect = monitor.virtual_rect();
            (rect.origin(), rect.size())
        }
        None => {
            let (w, h) = screen.dimensions();
            (Point::ORIGIN, Size::new(w as f64, h as f64))
        }
    }
}

impl AppDelegate<AppState> for Delegate {
    fn command(
        &mut self,
        ctx: &mut DelegateCtx,
        _target: Target,
        cmd: &Command,
        data: &mut AppState,
        _env: &Env,
    ) -> Handled {
        if cmd.is(SHOW_OVERLAY) {
            self.show_overlay(ctx);
            Handled::Yes
        } else if let Some(snapshot) = cmd.get(SNAPSHOT_READY) {
            self.open_overlay(ctx, data, snapshot.clone());
            Handled::Yes
        } else if let Some(status) = cmd.get(OVERLAY_FINISHED) {
            info!("{}", status);
            self.close_overlay(ctx, data, status.clone());
            Handled::Yes
        } else {
            Handled::No
        }
    }

    fn window_added(
        &mut self,
        id: WindowId,
        handle: WindowHandle,
        _data: &mut AppState,
        _env: &Env,
        ctx: &mut DelegateCtx,
    ) {
        if id != self.launcher_id {
            return;
        }
        if self.config.launcher.start_hidden {
            handle.hide();
        }
        self.launcher = Some(handle);
        if self.config.launcher.capture_on_start {
            ctx.submit_command(SHOW_OVERLAY);
        }
    }

    fn window_removed(&mut self, id: WindowId, data: &mut AppState, _env: &Env, _ctx: &mut DelegateCtx) {
        // closed by the window manager rather than through OVERLAY_FINISHED
        if self.overlay == Some(id) {
            self.overlay = None;
            self.toggle.overlay_gone();
            data.overlay_visible = false;
            data.status = "Capture closed".to_string();
            self.reshow_launcher();
        }
    }
}
