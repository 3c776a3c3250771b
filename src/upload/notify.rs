#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub variant: ToastVariant,
    pub text: String,
}

impl Toast {
    pub fn new(variant: ToastVariant, text: impl Into<String>) -> Self {
        Self {
            variant,
            text: text.into(),
        }
    }
}

/// Receives transient user notifications. Delivery is fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, toast: Toast);
}
