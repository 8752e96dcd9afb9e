//! Page-global handles.
//!
//! `thread_local!` storage, WASM is single-threaded. The controller owns the
//! session; this module only keeps it reachable from event closures.

use mint_session::MintSessionController;
use mint_types::SessionSnapshot;
use std::cell::RefCell;
use std::rc::Rc;

use crate::ethereum::{InjectedContractFactory, InjectedProviderLookup};

pub type Controller = MintSessionController<InjectedProviderLookup, InjectedContractFactory>;

thread_local! {
    static CONTROLLER: RefCell<Option<Rc<Controller>>> = const { RefCell::new(None) };
    static LAST_RENDERED: RefCell<Option<SessionSnapshot>> = const { RefCell::new(None) };
}

pub fn controller() -> Option<Rc<Controller>> {
    CONTROLLER.with(|c| c.borrow().clone())
}

pub fn set_controller(controller: Rc<Controller>) {
    CONTROLLER.with(|c| *c.borrow_mut() = Some(controller));
}

/// Record `snapshot` as rendered; `false` if it equals the previous one.
pub fn mark_rendered(snapshot: &SessionSnapshot) -> bool {
    LAST_RENDERED.with(|last| {
        let mut last = last.borrow_mut();
        if last.as_ref() == Some(snapshot) {
            return false;
        }
        *last = Some(snapshot.clone());
        true
    })
}
