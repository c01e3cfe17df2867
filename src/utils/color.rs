use crate::api::TaskState;
use crate::app::MessageKind;
use eframe::egui::Color32;

pub const ACCENT: Color32 = Color32::from_rgb(161, 89, 225);

const SUCCESS: Color32 = Color32::from_rgb(46, 158, 79);
const FAILURE: Color32 = Color32::from_rgb(214, 69, 69);
const PENDING: Color32 = Color32::from_rgb(217, 162, 27);
const PROGRESS: Color32 = Color32::from_rgb(58, 123, 213);
const UNKNOWN: Color32 = Color32::from_rgb(138, 138, 138);

/// Card colour for a task status.
pub fn status_color(state: TaskState) -> Color32 {
    match state {
        TaskState::Success => SUCCESS,
        TaskState::Failure => FAILURE,
        TaskState::Pending => PENDING,
        TaskState::Progress => PROGRESS,
        TaskState::Unknown => UNKNOWN,
    }
}

pub fn message_color(kind: MessageKind) -> Color32 {
    match kind {
        MessageKind::Info => Color32::from_rgb(90, 150, 220),
        MessageKind::Success => Color32::from_rgb(0, 180, 0),
        MessageKind::Error => Color32::from_rgb(220, 50, 50),
    }
}
