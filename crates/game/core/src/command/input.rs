use strum::Display;

use crate::state::EntityId;

/// What a primary select does while a unit is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandMode {
    /// Primary select picks a unit.
    #[default]
    Default,
    /// Primary select moves the selected unit to the clicked cell.
    MoveTo,
    /// Primary select attacks the unit on the clicked cell.
    Attack,
}

/// Pointer-driven selection state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandInput {
    pub selected: Option<EntityId>,
    pub mode: CommandMode,
}

impl CommandInput {
    pub fn deselect(&mut self) {
        self.selected = None;
        self.mode = CommandMode::Default;
    }
}
