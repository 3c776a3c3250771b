use crate::upload::{NotificationSink, Toast, ToastVariant};
use eframe::egui::{self, Align2, Color32, RichText};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(5);

struct ActiveToast {
    toast: Toast,
    shown_at: Instant,
}

/// Toast stack drawn in the bottom-right corner of the window.
pub struct ToastBoard {
    toasts: Mutex<Vec<ActiveToast>>,
    ctx: egui::Context,
}

impl ToastBoard {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            toasts: Mutex::new(Vec::new()),
            ctx,
        }
    }

    pub fn render(&self, ctx: &egui::Context) {
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        prune(&mut toasts, now);
        if toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .show(ctx, |ui| {
                for active in toasts.iter() {
                    egui::Frame::none()
                        .fill(variant_color(active.toast.variant))
                        .rounding(6.0)
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.label(RichText::new(&active.toast.text).color(Color32::WHITE));
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some(next_expiry) = toasts
            .iter()
            .map(|active| TOAST_LIFETIME.saturating_sub(now - active.shown_at))
            .min()
        {
            ctx.request_repaint_after(next_expiry);
        }
    }
}

impl NotificationSink for ToastBoard {
    fn publish(&self, toast: Toast) {
        tracing::debug!(variant = ?toast.variant, text = %toast.text, "toast");
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ActiveToast {
                toast,
                shown_at: Instant::now(),
            });
        self.ctx.request_repaint();
    }
}

fn prune(toasts: &mut Vec<ActiveToast>, now: Instant) {
    toasts.retain(|active| now.duration_since(active.shown_at) < TOAST_LIFETIME);
}

fn variant_color(variant: ToastVariant) -> Color32 {
    match variant {
        ToastVariant::Success => Color32::from_rgb(0, 150, 60),
        ToastVariant::Warning => Color32::from_rgb(200, 130, 0),
        ToastVariant::Danger => Color32::from_rgb(200, 40, 40),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_toasts_are_dropped() {
        let now = Instant::now();
        let mut toasts = vec![
            ActiveToast {
                toast: Toast::new(ToastVariant::Success, "old"),
                shown_at: now - TOAST_LIFETIME,
            },
            ActiveToast {
                toast: Toast::new(ToastVariant::Danger, "fresh"),
                shown_at: now,
            },
        ];

        prune(&mut toasts, now);

        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].toast.text, "fresh");
    }

    #[test]
    fn publish_queues_toast() {
        let board = ToastBoard::new(egui::Context::default());
        board.publish(Toast::new(ToastVariant::Warning, "Please add files to upload"));
        assert_eq!(board.toasts.lock().unwrap().len(), 1);
    }
}
