use rfd::{MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

const DIALOG_TITLE: &str = "Image Processing Dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Info,
    Error,
}

/// Blocking user prompts.
pub trait Dialogs {
    fn alert(&self, level: AlertLevel, message: &str);
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn alert(&self, level: AlertLevel, message: &str) {
        let level = match level {
            AlertLevel::Info => MessageLevel::Info,
            AlertLevel::Error => MessageLevel::Error,
        };
        MessageDialog::new()
            .set_title(DIALOG_TITLE)
            .set_description(message)
            .set_level(level)
            .set_buttons(MessageButtons::Ok)
            .show();
    }

    fn confirm(&self, message: &str) -> bool {
        let result = MessageDialog::new()
            .set_title(DIALOG_TITLE)
            .set_description(message)
            .set_level(MessageLevel::Warning)
            .set_buttons(MessageButtons::OkCancel)
            .show();
        matches!(result, MessageDialogResult::Ok | MessageDialogResult::Yes)
    }
}
