use crate::state::Position;

use super::node::CoverKind;

/// Design-time cover declaration between two adjacent cells.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverProp {
    /// Label used in diagnostics.
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub a: Position,
    pub b: Position,
    #[cfg_attr(feature = "serde", serde(default = "CoverProp::default_kind"))]
    pub kind: CoverKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub blocks_movement: bool,
}

impl CoverProp {
    pub fn new(a: Position, b: Position, kind: CoverKind) -> Self {
        Self {
            name: String::new(),
            a,
            b,
            kind,
            blocks_movement: false,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn blocking_movement(mut self) -> Self {
        self.blocks_movement = true;
        self
    }

    #[cfg(feature = "serde")]
    fn default_kind() -> CoverKind {
        CoverKind::Full
    }
}
