use crate::settings::{NotificationPosition, NotificationSettings};
use eframe::egui;
use egui_notify::{Anchor, Toast, Toasts};
use jobtree_app::NotificationSink;
use std::time::Duration;

/// Notification manager wrapper around egui-notify
pub struct NotificationManager {
    toasts: Toasts,
    success_duration: Duration,
    error_duration: Duration,
    /// Toasts raised since startup.
    shown: usize,
}

fn anchor_for(position: NotificationPosition) -> Anchor {
    match position {
        NotificationPosition::TopLeft => Anchor::TopLeft,
        NotificationPosition::TopRight => Anchor::TopRight,
        NotificationPosition::BottomLeft => Anchor::BottomLeft,
        NotificationPosition::BottomRight => Anchor::BottomRight,
    }
}

impl NotificationManager {
    pub fn new(settings: &NotificationSettings) -> Self {
        let toasts = Toasts::new()
            .with_anchor(anchor_for(settings.position))
            .with_margin(egui::vec2(8.0, 8.0));

        Self {
            toasts,
            success_duration: Duration::from_secs(settings.success_secs),
            error_duration: Duration::from_secs(settings.error_secs),
            shown: 0,
        }
    }

    pub fn shown(&self) -> usize {
        self.shown
    }

    fn push(&mut self, mut toast: Toast, duration: Duration) {
        toast.duration(Some(duration));
        self.toasts.add(toast);
        self.shown += 1;
    }

    /// Render notifications (call once per frame)
    pub fn render(&mut self, ctx: &egui::Context) {
        self.toasts.show(ctx);
    }
}

impl NotificationSink for NotificationManager {
    fn success(&mut self, message: String) {
        self.push(Toast::success(message), self.success_duration);
    }

    fn error(&mut self, message: String) {
        tracing::warn!("{}", message);
        self.push(Toast::error(message), self.error_duration);
    }
}
