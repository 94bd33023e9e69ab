//! Operator input events and the feedback states shown on the strip.

use dispenser_traits::{Color, SwitchState};

/// What one switch sample asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputEvent {
    #[default]
    None,
    /// Switch 1: check (and dispense) on the next tick.
    ForceDispense,
    /// Switch 2: restart the interval.
    ResetTimer,
}

impl From<SwitchState> for InputEvent {
    /// Switches are mutually exclusive per sample; switch 1 wins when both
    /// are held.
    fn from(s: SwitchState) -> Self {
        if s.switch_1() {
            InputEvent::ForceDispense
        } else if s.switch_2() {
            InputEvent::ResetTimer
        } else {
            InputEvent::None
        }
    }
}

/// Strip state for each controller transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    Idle,
    PresenceConfirmed,
    Dispensing,
    DispenseComplete,
    Absent,
}

impl FeedbackState {
    pub const fn color(self) -> Color {
        match self {
            FeedbackState::Idle => Color::White,
            FeedbackState::PresenceConfirmed => Color::Green,
            FeedbackState::Dispensing => Color::Blue,
            FeedbackState::DispenseComplete => Color::Cyan,
            FeedbackState::Absent => Color::Red,
        }
    }
}
