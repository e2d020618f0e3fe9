// src/tray.rs
// System tray icon (StatusNotifierItem via ksni) with "Show capture overlay"
// and "Exit". Only available on Linux.

#[cfg(target_os = "linux")]
pub use linux::{TrayHandle, spawn};

#[cfg(not(target_os = "linux"))]
pub struct TrayHandle;

#[cfg(not(target_os = "linux"))]
pub fn spawn(_sink: druid::ExtEventSink) -> Option<TrayHandle> {
    log::info!("Tray icon is only available on Linux");
    None
}

#[cfg(target_os = "linux")]
mod linux {
    use druid::{ExtEventSink, Target, commands};
    use ksni::{Icon, MenuItem, Tray, blocking::TrayMethods, menu::StandardItem};

    use crate::app::SHOW_OVERLAY;

    /// Actions that can be triggered from the tray
    #[derive(Debug, Clone, Copy)]
    pub enum TrayAction {
        ShowOverlay,
        Exit,
    }

    pub struct RegionTray {
        sink: ExtEventSink,
        icon: Vec<Icon>,
    }

    impl RegionTray {
        pub fn new(sink: ExtEventSink) -> Self {
            Self {
                sink,
                icon: create_selection_icon(),
            }
        }

        fn send(&self, action: TrayAction) {
            log::info!("Tray: {:?}", action);
            let result = match action {
                TrayAction::ShowOverlay => self.sink.submit_command(SHOW_OVERLAY, (), Target::Auto),
                TrayAction::Exit => self.sink.submit_command(commands::QUIT_APP, (), Target::Global),
            };
            if let Err(e) = result {
                log::error!("Failed to send {:?}: {}", action, e);
            }
        }
    }

    /// Icons at several sizes for DPI scaling
    fn create_selection_icon() -> Vec<Icon> {
        [16, 22, 24, 32, 48, 64]
            .into_iter()
            .map(selection_icon)
            .collect()
    }

    /// Dashed white square on a dark tile, like a selection frame.
    pub(super) fn selection_icon(size: i32) -> Icon {
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let inset = (size / 6).max(2);
        let far = size - 1 - inset;
        let dash = (size / 8).max(2);

        for y in 0..size {
            for x in 0..size {
                let on_x_edge = (x == inset || x == far) && (inset..=far).contains(&y);
                let on_y_edge = (y == inset || y == far) && (inset..=far).contains(&x);
                let along = if on_x_edge { y } else { x };
                let frame = (on_x_edge || on_y_edge) && (along / dash) % 2 == 0;

                // ARGB, network byte order
                if frame {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[220, 40, 44, 52]);
                }
            }
        }

        Icon {
            width: size,
            height: size,
            data,
        }
    }

    impl Tray for RegionTray {
        fn id(&self) -> String {
            "regionshot".to_string()
        }

        fn title(&self) -> String {
            "regionshot".to_string()
        }

        fn icon_pixmap(&self) -> Vec<Icon> {
            self.icon.clone()
        }

        fn activate(&mut self, _x: i32, _y: i32) {
            self.send(TrayAction::ShowOverlay);
        }

        fn tool_tip(&self) -> ksni::ToolTip {
            ksni::ToolTip {
                title: "regionshot".to_string(),
                description: "Click to capture a region".to_string(),
                icon_name: String::new(),
                icon_pixmap: Vec::new(),
            }
        }

        fn menu(&self) -> Vec<MenuItem<Self>> {
            vec![
                MenuItem::Standard(StandardItem {
                    label: "Show capture overlay".to_string(),
                    activate: Box::new(|tray: &mut Self| tray.send(TrayAction::ShowOverlay)),
                    ..Default::default()
                }),
                MenuItem::Standard(StandardItem {
                    label: "Exit".to_string(),
                    activate: Box::new(|tray: &mut Self| tray.send(TrayAction::Exit)),
                    ..Default::default()
                }),
            ]
        }
    }

    pub type TrayHandle = ksni::blocking::Handle<RegionTray>;

    /// `None` when no StatusNotifier host is running.
    pub fn spawn(sink: ExtEventSink) -> Option<TrayHandle> {
        match RegionTray::new(sink).spawn() {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("Tray icon unavailable: {}", e);
                None
            }
        }
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::linux::selection_icon;

    #[test]
    fn icon_has_argb_pixels_for_its_size() {
        for size in [16, 48] {
            let icon = selection_icon(size);
            assert_eq!(icon.width, size);
            assert_eq!(icon.data.len(), (size * size * 4) as usize);
        }
    }

    #[test]
    fn icon_frame_is_opaque_white() {
        // 24px: frame inset 4, dashes 3px long, (4, 6) starts a dash
        let icon = selection_icon(24);
        let idx = ((6 * 24 + 4) * 4) as usize;
        assert_eq!(&icon.data[idx..idx + 4], &[255, 255, 255, 255]);
    }
}
