//! Group hover: elements sharing a group id highlight together.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Attribute carrying the group id on rendered elements.
pub const GROUP_ATTRIBUTE: &str = "data-hover-group";
/// Set on the timeline container while any group is active.
pub const CONTAINER_HOVERED_CLASS: &str = "element-hovered";
/// Set on highlighted members of the active group.
pub const MEMBER_HOVERED_CLASS: &str = "i-hovered";
/// Extra class for labels of the active group.
pub const LABEL_HOVERED_CLASS: &str = "label-hovered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoverGroupId {
    /// Marker and label of the event at this sorted index.
    Event(usize),
    /// The full-canvas bounds overlay.
    Bounds,
}

impl fmt::Display for HoverGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoverGroupId::Event(index) => write!(f, "{index}"),
            HoverGroupId::Bounds => f.write_str("-1"),
        }
    }
}

impl FromStr for HoverGroupId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-1" {
            return Ok(HoverGroupId::Bounds);
        }
        s.parse().map(HoverGroupId::Event)
    }
}

/// One registration of an element into a hover group.
///
/// `highlight` and `label` are independent: the bounds overlay joins its
/// group without taking any of the member styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverTarget {
    pub group: HoverGroupId,
    /// Receives [`MEMBER_HOVERED_CLASS`] while its group is active.
    pub highlight: bool,
    /// Receives [`LABEL_HOVERED_CLASS`] while its group is active.
    pub label: bool,
}

impl HoverTarget {
    pub fn marker(index: usize) -> Self {
        Self {
            group: HoverGroupId::Event(index),
            highlight: true,
            label: false,
        }
    }

    pub fn label(index: usize) -> Self {
        Self {
            group: HoverGroupId::Event(index),
            highlight: true,
            label: true,
        }
    }

    pub fn bounds() -> Self {
        Self {
            group: HoverGroupId::Bounds,
            highlight: false,
            label: false,
        }
    }

    /// State classes this element carries for the given active group.
    pub fn classes(&self, active: Option<HoverGroupId>) -> Vec<&'static str> {
        if active != Some(self.group) {
            return Vec::new();
        }
        let mut classes = Vec::with_capacity(2);
        if self.highlight {
            classes.push(MEMBER_HOVERED_CLASS);
        }
        if self.label {
            classes.push(LABEL_HOVERED_CLASS);
        }
        classes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    Unchanged,
    Activated {
        previous: Option<HoverGroupId>,
        current: HoverGroupId,
    },
    Cleared {
        previous: HoverGroupId,
    },
}

/// The single active hover group, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverState {
    active: Option<HoverGroupId>,
}

impl HoverState {
    pub fn active(&self) -> Option<HoverGroupId> {
        self.active
    }

    pub fn container_hovered(&self) -> bool {
        self.active.is_some()
    }

    pub fn enter(&mut self, group: HoverGroupId) -> HoverChange {
        if self.active == Some(group) {
            return HoverChange::Unchanged;
        }
        let previous = self.active.replace(group);
        HoverChange::Activated {
            previous,
            current: group,
        }
    }

    pub fn leave(&mut self) -> HoverChange {
        match self.active.take() {
            Some(previous) => HoverChange::Cleared { previous },
            None => HoverChange::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Vec<HoverTarget> {
        let mut targets = Vec::new();
        for index in 0..6 {
            targets.push(HoverTarget::marker(index));
            targets.push(HoverTarget::label(index));
        }
        targets.push(HoverTarget::bounds());
        targets
    }

    fn members(targets: &[HoverTarget], group: HoverGroupId) -> Vec<&HoverTarget> {
        targets.iter().filter(|t| t.group == group).collect()
    }

    fn snapshot(targets: &[HoverTarget], state: &HoverState) -> Vec<Vec<&'static str>> {
        targets.iter().map(|t| t.classes(state.active())).collect()
    }

    #[test]
    fn reentering_same_group_is_idempotent() {
        let targets = board();
        let mut state = HoverState::default();
        let group = HoverGroupId::Event(3);

        assert!(matches!(state.enter(group), HoverChange::Activated { previous: None, .. }));
        let first = snapshot(&targets, &state);

        assert_eq!(state.enter(group), HoverChange::Unchanged);
        assert_eq!(snapshot(&targets, &state), first);
    }

    #[test]
    fn switching_groups_leaves_no_residue() {
        let targets = board();
        let mut state = HoverState::default();
        state.enter(HoverGroupId::Event(3));

        let change = state.enter(HoverGroupId::Event(5));
        assert_eq!(
            change,
            HoverChange::Activated {
                previous: Some(HoverGroupId::Event(3)),
                current: HoverGroupId::Event(5),
            }
        );

        for target in members(&targets, HoverGroupId::Event(3)) {
            assert!(target.classes(state.active()).is_empty());
        }
        for target in members(&targets, HoverGroupId::Event(5)) {
            assert!(target.classes(state.active()).contains(&MEMBER_HOVERED_CLASS));
        }
    }

    #[test]
    fn leave_clears_everything() {
        let targets = board();
        let mut state = HoverState::default();
        state.enter(HoverGroupId::Event(1));
        assert!(state.container_hovered());

        assert_eq!(
            state.leave(),
            HoverChange::Cleared {
                previous: HoverGroupId::Event(1)
            }
        );
        assert!(!state.container_hovered());
        assert!(snapshot(&targets, &state).iter().all(Vec::is_empty));
        assert_eq!(state.leave(), HoverChange::Unchanged);
    }

    #[test]
    fn bounds_group_activates_without_member_styling() {
        let targets = board();
        let mut state = HoverState::default();
        state.enter(HoverGroupId::Bounds);

        assert!(state.container_hovered());
        assert_eq!(members(&targets, HoverGroupId::Bounds).len(), 1);
        assert!(snapshot(&targets, &state).iter().all(Vec::is_empty));
    }

    #[test]
    fn only_labels_take_the_label_class() {
        let active = Some(HoverGroupId::Event(2));
        assert_eq!(HoverTarget::marker(2).classes(active), [MEMBER_HOVERED_CLASS]);
        assert_eq!(
            HoverTarget::label(2).classes(active),
            [MEMBER_HOVERED_CLASS, LABEL_HOVERED_CLASS]
        );
    }

    #[test]
    fn group_ids_round_trip_through_attribute() {
        for group in [HoverGroupId::Event(0), HoverGroupId::Event(42), HoverGroupId::Bounds] {
            assert_eq!(group.to_string().parse::<HoverGroupId>().unwrap(), group);
        }
        assert!("x".parse::<HoverGroupId>().is_err());
    }
}
