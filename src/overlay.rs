// src/overlay.rs
// Full-screen overlay: frozen snapshot, dim mask, selection spotlight.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use druid::menu::MenuEventCtx;
use druid::piet::{ImageFormat, InterpolationMode, PietImage};
use druid::{
    BoxConstraints, Color, Cursor, Env, Event, EventCtx, KbKey, LayoutCtx, LifeCycle,
    LifeCycleCtx, Menu, MenuItem, MouseButton, PaintCtx, Rect, RenderContext, Size, UpdateCtx,
    Widget, WindowHandle, WindowId,
};
use log::{debug, error};
use rfd::{FileDialog, MessageDialog, MessageLevel};

use crate::actions::{self, CaptureHost, MenuAction, RgbaImage};
use crate::app::{AppState, MENU_ACTION, OVERLAY_FINISHED};
use crate::capture::{FrozenScreen, SystemClipboard};
use crate::config::{OverlayStyle, Rgba, SaveSettings};
use crate::error::CaptureError;
use crate::selection::{Bounds, CaptureRegion, Point, SelectionRect, mask_bands};
use crate::selection_logic::{Button, Response, SelectionMachine};

pub struct OverlayWidget {
    screen: FrozenScreen,
    machine: SelectionMachine,
    style: OverlayStyle,
    save: SaveSettings,
    clipboard: Rc<RefCell<SystemClipboard>>,
    cached_image: Option<PietImage>,
    previous_rect: Option<SelectionRect>,
    finished: bool,
}

impl OverlayWidget {
    pub fn new(
        screen: FrozenScreen,
        style: OverlayStyle,
        save: SaveSettings,
        clipboard: Rc<RefCell<SystemClipboard>>,
    ) -> Self {
        // real surface size arrives with the first layout
        let (w, h) = screen.dimensions();
        OverlayWidget {
            screen,
            machine: SelectionMachine::new(Bounds::new(w as f64, h as f64)),
            style,
            save,
            clipboard,
            cached_image: None,
            previous_rect: None,
            finished: false,
        }
    }

    fn apply(&mut self, ctx: &mut EventCtx, response: Response, pos: druid::Point) {
        match response {
            Response::Ignored => {}
            Response::Repaint => self.repaint_selection(ctx),
            Response::OpenMenu => {
                debug!("context menu at {:?}, state {:?}", pos, self.machine.state());
                ctx.set_cursor(&Cursor::Arrow);
                ctx.show_context_menu(make_context_menu(ctx.window_id()), pos);
            }
            Response::Hide => self.finish(ctx, "Capture cancelled".to_string()),
        }
    }

    fn repaint_selection(&mut self, ctx: &mut EventCtx) {
        let current = self.machine.spotlight();
        match (self.previous_rect, current) {
            // only the area around the old and new rectangle changes
            (Some(old), Some(new)) => {
                let dirty = old.union(new).inflate(self.style.border_width + 2.0);
                ctx.request_paint_rect(to_rect(dirty));
            }
            // idle mask <-> spotlight touches every pixel
            _ => ctx.request_paint(),
        }
        self.previous_rect = current;
    }

    fn run_action(&mut self, ctx: &mut EventCtx, action: MenuAction) {
        let mut host = OverlayHost {
            window: ctx.window().clone(),
            screen: &self.screen,
            surface: self.machine.bounds(),
            clipboard: &self.clipboard,
            hidden: false,
        };
        let status = match actions::dispatch(action, &mut self.machine, &mut host, &self.save) {
            Ok(outcome) => outcome.describe(),
            Err(e) => {
                error!("{} failed: {}", action.label(), e);
                MessageDialog::new()
                    .set_level(MessageLevel::Error)
                    .set_title("Capture failed")
                    .set_description(e.to_string())
                    .show();
                format!("Capture failed: {e}")
            }
        };
        self.finish(ctx, status);
    }

    /// Hides the overlay and hands control back to the launcher.
    fn finish(&mut self, ctx: &mut EventCtx, status: String) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.previous_rect = None;
        ctx.clear_cursor();
        ctx.window().hide();
        ctx.request_paint();
        ctx.submit_command(OVERLAY_FINISHED.with(status));
    }
}

impl Widget<AppState> for OverlayWidget {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, _data: &mut AppState, _env: &Env) {
        match event {
            Event::WindowConnected => {
                ctx.request_focus();
                ctx.set_cursor(&Cursor::Crosshair);
            }
            Event::MouseDown(e) => {
                let response = self.machine.press(button(&e.button), point(e.pos));
                self.apply(ctx, response, e.pos);
                ctx.set_cursor(&Cursor::Crosshair);
            }
            Event::MouseMove(e) => {
                let response = self.machine.motion(point(e.pos));
                self.apply(ctx, response, e.pos);
            }
            Event::MouseUp(e) => {
                let response = self.machine.release(button(&e.button), point(e.pos));
                self.apply(ctx, response, e.pos);
            }
            Event::KeyDown(key) if key.key == KbKey::Escape => {
                let response = self.machine.escape();
                self.apply(ctx, response, druid::Point::ZERO);
            }
            Event::Command(cmd) if cmd.is(MENU_ACTION) => {
                ctx.set_handled();
                if let Some(action) = cmd.get(MENU_ACTION) {
                    self.run_action(ctx, *action);
                }
            }
            _ => {}
        }
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, _data: &AppState, _env: &Env) {
        if let LifeCycle::BuildFocusChain = event {
            ctx.register_for_focus();
        }
    }

    fn update(&mut self, _ctx: &mut UpdateCtx, _old: &AppState, _data: &AppState, _env: &Env) {}

    fn layout(&mut self, _ctx: &mut LayoutCtx, bc: &BoxConstraints, _data: &AppState, _env: &Env) -> Size {
        let size = bc.max();
        self.machine.resize(Bounds::new(size.width, size.height));
        size
    }

    fn paint(&mut self, ctx: &mut PaintCtx, _data: &AppState, _env: &Env) {
        let full_rect = ctx.size().to_rect();

        if self.cached_image.is_none() {
            let (w, h) = self.screen.dimensions();
            let buf = self.screen.image().to_rgba8();
            self.cached_image = ctx
                .make_image(w as usize, h as usize, buf.as_raw(), ImageFormat::RgbaSeparate)
                .ok();
        }
        if let Some(img) = &self.cached_image {
            ctx.draw_image(img, full_rect, InterpolationMode::Bilinear);
        }

        match self.machine.spotlight() {
            Some(sel) => {
                let mask = color(self.style.mask);
                for band in mask_bands(self.machine.bounds(), sel) {
                    ctx.fill(to_rect(band), &mask);
                }
                let r = to_rect(sel);
                ctx.fill(r, &color(self.style.selection_fill));
                ctx.stroke(r, &color(self.style.border), self.style.border_width);
            }
            None => ctx.fill(full_rect, &color(self.style.idle_mask)),
        }
    }
}

/// Host side of the context-menu actions.
struct OverlayHost<'a> {
    window: WindowHandle,
    screen: &'a FrozenScreen,
    surface: Bounds,
    clipboard: &'a RefCell<SystemClipboard>,
    hidden: bool,
}

impl CaptureHost for OverlayHost<'_> {
    fn grab(&mut self, region: CaptureRegion) -> Result<RgbaImage, CaptureError> {
        self.screen.crop(region, self.surface)
    }

    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), CaptureError> {
        self.clipboard.borrow_mut().set_image(image)
    }

    fn prompt_save_path(&mut self, suggested: &Path) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Save capture")
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"]);
        if let Some(dir) = suggested.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = suggested.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }
        dialog.save_file()
    }

    fn hide_overlay(&mut self) {
        if !self.hidden {
            self.window.hide();
            self.hidden = true;
        }
    }

    fn notify(&mut self, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .show();
    }
}

fn make_context_menu(window: WindowId) -> Menu<AppState> {
    MenuAction::ALL.into_iter().fold(Menu::empty(), |menu, action| {
        menu.entry(MenuItem::new(action.label()).on_activate(
            move |ctx: &mut MenuEventCtx, _data: &mut AppState, _env: &Env| {
                ctx.submit_command(MENU_ACTION.with(action).to(window));
            },
        ))
    })
}

fn button(b: &MouseButton) -> Button {
    if b.is_left() {
        Button::Left
    } else if b.is_right() {
        Button::Right
    } else {
        Button::Other
    }
}

fn point(p: druid::Point) -> Point {
    Point::new(p.x, p.y)
}

fn to_rect(r: SelectionRect) -> Rect {
    Rect::new(r.begin.x, r.begin.y, r.end.x, r.end.y)
}

fn color(c: Rgba) -> Color {
    Color::rgba8(c.0, c.1, c.2, c.3)
}
