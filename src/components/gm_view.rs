use yew::prelude::*;

use super::app::SessionHandle;
use super::brush_panel::BrushPanel;
use super::map_import_panel::MapImportPanel;
use super::map_view::MapView;
use super::token_edit_modal::TokenEditModal;
use super::token_library::TokenLibrary;
use crate::model::{Token, TokenPatch};
use crate::state::SessionAction;

#[function_component]
pub fn GmView() -> Html {
    let editing = use_state(|| None::<String>);
    let Some(handle) = use_context::<SessionHandle>() else {
        tracing::error!("GmView rendered without a session");
        return html! {};
    };

    let on_edit_token = {
        let editing = editing.clone();
        Callback::from(move |t: Token| editing.set(Some(t.id)))
    };
    let on_close = {
        let editing = editing.clone();
        Callback::from(move |()| editing.set(None))
    };
    let on_save = {
        let handle = handle.clone();
        Callback::from(move |(id, patch): (String, TokenPatch)| {
            handle.dispatch(SessionAction::UpdateToken { id, patch })
        })
    };
    let on_delete = {
        let handle = handle.clone();
        let editing = editing.clone();
        Callback::from(move |id: String| {
            handle.dispatch(SessionAction::RemoveToken { id });
            editing.set(None);
        })
    };

    // The token may have been removed since the editor opened
    let edited = editing
        .as_deref()
        .and_then(|id| handle.session.borrow().tokens().get(id).cloned());

    html! {<div style="display:flex; height:100%; position:relative;">
        <div style="flex:1; min-width:0; position:relative;">
            <MapView handle={handle.clone()} {on_edit_token} />
        </div>
        <aside style="width:260px; padding:10px; display:flex; flex-direction:column; gap:10px; overflow-y:auto; background:#0d1117; border-left:1px solid #30363d;">
            <TokenLibrary />
            <BrushPanel handle={handle.clone()} />
            <MapImportPanel handle={handle.clone()} />
        </aside>
        { if let Some(token) = edited {
            let key = token.id.clone();
            html! { <TokenEditModal key={key} {token} {on_save} {on_delete} {on_close} /> }
        } else { html!{} } }
    </div>}
}
