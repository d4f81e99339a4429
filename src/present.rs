//! Maps filter flags to a presentation decision at render time.

use crate::filter::{FilterFlags, FilterMode, FilterState};
use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Normal,
    Dimmed,
    /// Not laid out at all.
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Presentation {
    pub matched: bool,
    /// Ancestor of a match, or on a kept path below one.
    pub ancestor: bool,
    pub hidden: bool,
    pub visibility: Visibility,
}

/// Single-valued summary of a [`Presentation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationState {
    Normal,
    Matched,
    AncestorOfMatch,
    Dimmed,
    Hidden,
}

impl Presentation {
    pub const UNFILTERED: Self = Self {
        matched: false,
        ancestor: false,
        hidden: false,
        visibility: Visibility::Normal,
    };

    pub fn is_laid_out(&self) -> bool {
        self.visibility != Visibility::Removed
    }

    pub fn state(&self) -> PresentationState {
        match self.visibility {
            Visibility::Removed => PresentationState::Hidden,
            Visibility::Dimmed => PresentationState::Dimmed,
            Visibility::Normal if self.matched => PresentationState::Matched,
            Visibility::Normal if self.ancestor => PresentationState::AncestorOfMatch,
            Visibility::Normal => PresentationState::Normal,
        }
    }
}

pub fn present(flags: &FilterFlags, state: &FilterState) -> Presentation {
    if !state.is_active() {
        return Presentation::UNFILTERED;
    }

    let visibility = match (flags.hide, state.options().mode) {
        (false, _) => Visibility::Normal,
        (true, FilterMode::Dim) => Visibility::Dimmed,
        (true, FilterMode::Hide) => Visibility::Removed,
    };

    Presentation {
        matched: flags.matched,
        ancestor: flags.sub_match || flags.child_sub_match,
        hidden: flags.hide,
        visibility,
    }
}

impl<T> Tree<T> {
    pub fn presentation(&self, id: NodeId) -> Presentation {
        present(self.node(id).flags(), self.filter_state())
    }
}
