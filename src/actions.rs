// src/actions.rs
// Context-menu actions. Host calls (grab, clipboard, dialog) go through
// `CaptureHost` so the flow can run without a window.

use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgba};
use log::{info, warn};

use crate::config::{SaveMode, SaveSettings};
use crate::error::CaptureError;
use crate::export::{self, ExportFormat};
use crate::selection::CaptureRegion;
use crate::selection_logic::SelectionMachine;

pub type RgbaImage = ImageBuffer<Rgba<u8>, Vec<u8>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Copy,
    Save,
    Cancel,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Copy, MenuAction::Save, MenuAction::Cancel];

    pub fn label(self) -> &'static str {
        match self {
            MenuAction::Copy => "Copy to clipboard",
            MenuAction::Save => "Save to file…",
            MenuAction::Cancel => "Cancel",
        }
    }
}

pub trait CaptureHost {
    /// Pixels for `region`, in overlay surface coordinates.
    fn grab(&mut self, region: CaptureRegion) -> Result<RgbaImage, CaptureError>;
    fn copy_image(&mut self, image: &RgbaImage) -> Result<(), CaptureError>;
    /// Blocks until the user picks a path or dismisses the dialog.
    fn prompt_save_path(&mut self, suggested: &Path) -> Option<PathBuf>;
    /// Must be safe to call more than once.
    fn hide_overlay(&mut self);
    fn notify(&mut self, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Copied(CaptureRegion),
    Saved {
        path: PathBuf,
        format: ExportFormat,
        defaulted: bool,
    },
    SaveCancelled,
    Cancelled,
    /// Nothing selected, nothing captured.
    Empty,
}

impl ActionOutcome {
    pub fn describe(&self) -> String {
        match self {
            ActionOutcome::Copied(r) => {
                format!("Copied {}x{} region to clipboard", r.width, r.height)
            }
            ActionOutcome::Saved { path, format, .. } => {
                format!("Saved {} to {}", format.label(), path.display())
            }
            ActionOutcome::SaveCancelled => "Save cancelled".to_string(),
            ActionOutcome::Cancelled => "Capture cancelled".to_string(),
            ActionOutcome::Empty => "Nothing selected".to_string(),
        }
    }
}

/// Runs `action` on the current selection. The machine is reset and the
/// overlay hidden whatever the result.
pub fn dispatch<H: CaptureHost>(
    action: MenuAction,
    machine: &mut SelectionMachine,
    host: &mut H,
    save: &SaveSettings,
) -> Result<ActionOutcome, CaptureError> {
    let region = machine.capture_region();
    machine.finish();

    let result = run(action, region, host, save);
    host.hide_overlay();

    match &result {
        Ok(outcome) => info!("{:?}: {}", action, outcome.describe()),
        Err(e) => warn!("{:?} failed: {}", action, e),
    }
    result
}

fn run<H: CaptureHost>(
    action: MenuAction,
    region: Option<CaptureRegion>,
    host: &mut H,
    save: &SaveSettings,
) -> Result<ActionOutcome, CaptureError> {
    match action {
        MenuAction::Cancel => Ok(ActionOutcome::Cancelled),
        MenuAction::Copy => {
            let Some(region) = region else {
                return Ok(ActionOutcome::Empty);
            };
            let image = host.grab(region)?;
            host.copy_image(&image)?;
            Ok(ActionOutcome::Copied(region))
        }
        MenuAction::Save => {
            let Some(region) = region else {
                return Ok(ActionOutcome::Empty);
            };
            save_region(region, host, save)
        }
    }
}

fn save_region<H: CaptureHost>(
    region: CaptureRegion,
    host: &mut H,
    save: &SaveSettings,
) -> Result<ActionOutcome, CaptureError> {
    let image = host.grab(region)?;
    // the dialog must not sit under the overlay
    host.hide_overlay();

    let now = chrono::Local::now().naive_local();
    // two captures in the same second must not overwrite each other
    let suggested = export::next_free_path(export::timestamp_path(
        &save.resolved_directory(),
        now,
        save.default_format,
    ));
    let chosen = match save.mode {
        SaveMode::Dialog => host.prompt_save_path(&suggested),
        SaveMode::Timestamp => Some(suggested),
    };
    let Some(path) = chosen else {
        return Ok(ActionOutcome::SaveCancelled);
    };

    let target = export::resolve_target(path, save.default_format);
    export::write_image(&image, &target)?;
    if target.defaulted {
        host.notify(
            "Saved",
            &format!(
                "No supported extension given, saved as {} to {}",
                target.format.label(),
                target.path.display()
            ),
        );
    }
    Ok(ActionOutcome::Saved {
        path: target.path,
        format: target.format,
        defaulted: target.defaulted,
    })
}
