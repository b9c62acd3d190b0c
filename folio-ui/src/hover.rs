#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use folio_core::{HoverChange, HoverGroupId, HoverState, HoverTarget};
use yew::prelude::*;

pub enum HoverAction {
    Enter(HoverGroupId),
    Leave,
}

#[derive(Debug, Default, PartialEq)]
pub struct HoverModel {
    state: HoverState,
}

impl HoverModel {
    pub fn active(&self) -> Option<HoverGroupId> {
        self.state.active()
    }

    pub fn container_hovered(&self) -> bool {
        self.state.container_hovered()
    }
}

impl Reducible for HoverModel {
    type Action = HoverAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.state;
        let change = match action {
            HoverAction::Enter(group) => state.enter(group),
            HoverAction::Leave => state.leave(),
        };
        if change == HoverChange::Unchanged {
            return self;
        }
        tracing::trace!(?change, "hover group changed");
        Rc::new(Self { state })
    }
}

/// Everything an element needs to take part in group hover.
pub struct HoverAttrs {
    pub group: AttrValue,
    pub classes: Classes,
    pub onmouseenter: Callback<MouseEvent>,
    pub onmouseleave: Callback<MouseEvent>,
}

/// Handle passed down to every rendered timeline element.
#[derive(Clone)]
pub struct HoverLinker {
    active: Option<HoverGroupId>,
    dispatcher: UseReducerDispatcher<HoverModel>,
}

impl HoverLinker {
    pub fn new(model: &UseReducerHandle<HoverModel>) -> Self {
        Self {
            active: model.active(),
            dispatcher: model.dispatcher(),
        }
    }

    /// Register an element in its hover group.
    pub fn register_hover_target(&self, target: HoverTarget) -> HoverAttrs {
        let group = target.group;
        let enter = self.dispatcher.clone();
        let leave = self.dispatcher.clone();
        HoverAttrs {
            group: AttrValue::from(group.to_string()),
            classes: Classes::from_iter(target.classes(self.active)),
            onmouseenter: Callback::from(move |_: MouseEvent| {
                enter.dispatch(HoverAction::Enter(group))
            }),
            onmouseleave: Callback::from(move |_: MouseEvent| leave.dispatch(HoverAction::Leave)),
        }
    }
}
