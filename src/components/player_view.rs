use yew::prelude::*;

use super::app::{SessionHandle, Version};
use super::map_view::MapView;
use crate::config::MapConfig;
use crate::state::MapSession;

/// Read-only view of the GM session: fogged tokens are hidden, fog is opaque,
/// and only the local viewport can change.
#[function_component]
pub fn PlayerView() -> Html {
    let gm = use_context::<SessionHandle>();
    let mirror = use_mut_ref(|| match &gm {
        Some(gm) => gm.session.borrow().player_mirror(),
        None => MapSession::new_gm(MapConfig::default()).player_mirror(),
    });
    let local = use_reducer(Version::default);

    if let Some(gm) = &gm {
        mirror.borrow_mut().sync_from(&gm.session.borrow());
    }

    // Redraw on either a GM change or a local pan/zoom
    let version = gm
        .as_ref()
        .map_or(0, |gm| gm.version)
        .wrapping_shl(32)
        ^ local.0;
    let handle = {
        let local = local.clone();
        SessionHandle::new(mirror, version, Callback::from(move |()| local.dispatch(())))
    };

    html! {<div style="display:flex; flex-direction:column; height:100%;">
        <div style="padding:6px 12px; font-size:12px; opacity:0.7; background:#161b22; border-bottom:1px solid #30363d;">
            {"Player View: only revealed areas and tokens are shown. Scroll to zoom; the camera buttons pan."}
        </div>
        <div style="flex:1; min-height:0; position:relative;">
            <MapView {handle} />
        </div>
    </div>}
}
