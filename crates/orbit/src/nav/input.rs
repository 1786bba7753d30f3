use super::geometry::HitTarget;
use super::item::ItemId;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Key {
    #[strum(serialize = "ArrowRight", serialize = "right")]
    ArrowRight,
    #[strum(serialize = "ArrowDown", serialize = "down")]
    ArrowDown,
    #[strum(serialize = "ArrowLeft", serialize = "left")]
    ArrowLeft,
    #[strum(serialize = "ArrowUp", serialize = "up")]
    ArrowUp,
    Tab,
    #[strum(serialize = "BackTab", serialize = "shift-tab")]
    BackTab,
    Home,
    End,
    #[strum(serialize = "Escape", serialize = "esc")]
    Escape,
    #[strum(serialize = "Enter", serialize = "return")]
    Enter,
    Space,
}

/// What a key asks the menu to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    FocusNext,
    FocusPrevious,
    FocusFirst,
    FocusLast,
    Dismiss,
    Activate,
}

impl Key {
    pub fn action(self) -> KeyAction {
        match self {
            Self::ArrowRight | Self::ArrowDown | Self::Tab => KeyAction::FocusNext,
            Self::ArrowLeft | Self::ArrowUp | Self::BackTab => KeyAction::FocusPrevious,
            Self::Home => KeyAction::FocusFirst,
            Self::End => KeyAction::FocusLast,
            Self::Escape => KeyAction::Dismiss,
            Self::Enter | Self::Space => KeyAction::Activate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    Center,
    Item(ItemId),
    Outside,
}

impl From<HitTarget> for PressTarget {
    fn from(hit: HitTarget) -> Self {
        match hit {
            HitTarget::Center => Self::Center,
            HitTarget::Item(id) => Self::Item(id),
            HitTarget::Outside => Self::Outside,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Hover(Option<ItemId>),
    Press {
        target: PressTarget,
        source: PointerSource,
    },
}
