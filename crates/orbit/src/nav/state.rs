use super::item::{ItemId, NavigationItem};
use serde::Serialize;
use strum::{Display as StrumDisplay, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, StrumDisplay,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MenuPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl MenuPhase {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub phase: MenuPhase,
    pub is_open: bool,
    pub is_animating: bool,
    pub active_item: Option<ItemId>,
    pub hovered_item: Option<ItemId>,
    pub focused_item: Option<ItemId>,
    pub keyboard_mode: bool,
}

impl NavigationState {
    /// The item that should be drawn emphasized. Keyboard focus wins while
    /// the last input came from the keyboard, pointer hover otherwise.
    pub fn emphasized_item(&self) -> Option<&ItemId> {
        if self.keyboard_mode {
            self.focused_item.as_ref()
        } else {
            self.hovered_item.as_ref()
        }
    }

    pub(crate) fn set_phase(&mut self, phase: MenuPhase) {
        self.phase = phase;
        self.is_open = phase.is_open();
        self.is_animating = phase.is_animating();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Open,
    Close,
    Navigate,
    Hover,
    Focus,
    Settle,
    Modality,
    Configure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavigationEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<NavigationItem>,
    pub state: NavigationState,
    /// Unix time in milliseconds.
    pub timestamp: u64,
}
