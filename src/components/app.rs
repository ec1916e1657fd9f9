use std::cell::RefCell;
use std::rc::Rc;

use super::{gm_view::GmView, player_view::PlayerView};
use crate::config::MapConfig;
use crate::state::{MapSession, SessionAction};
use yew::prelude::*;

#[derive(PartialEq, Clone, Copy)]
enum View {
    Gm,
    Player,
}

/// Bumped after every session mutation that needs a re-render.
#[derive(Default, PartialEq)]
pub struct Version(pub u64);

impl Reducible for Version {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Version(self.0.wrapping_add(1)))
    }
}

/// Shared access to one map session. The GM session is provided to the tree
/// as context by [`App`]. Compares by identity + version so
/// components re-render exactly when the session reports a change.
#[derive(Clone)]
pub struct SessionHandle {
    pub session: Rc<RefCell<MapSession>>,
    pub version: u64,
    notify: Callback<()>,
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session) && self.version == other.version
    }
}

impl SessionHandle {
    pub fn new(session: Rc<RefCell<MapSession>>, version: u64, notify: Callback<()>) -> Self {
        Self {
            session,
            version,
            notify,
        }
    }

    pub fn dispatch(&self, action: SessionAction) {
        let changed = self.session.borrow_mut().apply(action);
        if changed {
            self.notify.emit(());
        }
    }

    /// Run `f` against the session; re-render if it reports a change.
    pub fn update(&self, f: impl FnOnce(&mut MapSession) -> bool) {
        let changed = f(&mut self.session.borrow_mut());
        if changed {
            self.notify.emit(());
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let view = use_state(|| View::Gm);
    let session = use_mut_ref(|| {
        let config = MapConfig::load();
        let seed = config.seed_demo_tokens;
        let mut s = MapSession::new_gm(config);
        if seed {
            s.seed_demo_tokens();
        }
        s
    });
    let version = use_reducer(Version::default);
    let handle = {
        let version = version.clone();
        SessionHandle::new(
            session.clone(),
            version.0,
            Callback::from(move |()| version.dispatch(())),
        )
    };

    // Persist brush preferences
    {
        let brush = session.borrow().brush();
        let session = session.clone();
        use_effect_with((brush.size, brush.fog_opacity), move |_| {
            session.borrow().config().save();
            || ()
        });
    }

    let to_gm = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Gm))
    };
    let to_player = {
        let view = view.clone();
        Callback::from(move |_| view.set(View::Player))
    };
    let tab_style = |active: bool| {
        if active {
            "border-color:#58a6ff; color:#58a6ff;"
        } else {
            ""
        }
    };

    let content = match *view {
        View::Gm => html! { <GmView /> },
        View::Player => html! { <PlayerView /> },
    };

    html! {<div style="display:flex; flex-direction:column; height:100vh;">
        <div id="top-bar" style="display:flex; align-items:center; gap:8px; padding:8px 12px; background:#161b22; border-bottom:1px solid #30363d;">
            <span style="font-weight:bold; margin-right:12px;">{"Battle Map"}</span>
            <button onclick={to_gm} style={tab_style(*view == View::Gm)}>{"GM Screen"}</button>
            <button onclick={to_player} style={tab_style(*view == View::Player)}>{"Player View"}</button>
        </div>
        <ContextProvider<SessionHandle> context={handle}>
            <div style="flex:1; min-height:0;">{ content }</div>
        </ContextProvider<SessionHandle>>
    </div>}
}
