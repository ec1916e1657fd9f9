use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{HtmlImageElement, HtmlInputElement};
use yew::prelude::*;

use super::app::SessionHandle;
use crate::model::MapImage;
use crate::state::SessionAction;

#[derive(Properties, PartialEq, Clone)]
pub struct MapImportPanelProps {
    pub handle: SessionHandle,
}

/// Load `url` off-screen and hand its natural size to the session.
fn load_image(url: String, handle: SessionHandle, status: UseStateHandle<Option<String>>) {
    let Ok(img) = HtmlImageElement::new() else {
        tracing::warn!("could not create image element");
        return;
    };
    let onload = {
        let img = img.clone();
        let url = url.clone();
        let status = status.clone();
        Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let image = MapImage {
                url: url.clone(),
                width_px: img.natural_width(),
                height_px: img.natural_height(),
            };
            tracing::debug!(w = image.width_px, h = image.height_px, "map image loaded");
            status.set(None);
            handle.dispatch(SessionAction::LoadMap(image));
        }))
    };
    let onerror = {
        let url = url.clone();
        Closure::<dyn FnMut()>::wrap(Box::new(move || {
            tracing::warn!(%url, "map image failed to load");
            status.set(Some("Could not load that image.".to_string()));
        }))
    };
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    img.set_src(&url);
    onload.forget();
    onerror.forget();
}

#[function_component]
pub fn MapImportPanel(props: &MapImportPanelProps) -> Html {
    let url = use_state(String::new);
    let status = use_state(|| None::<String>);
    let (current, grid) = {
        let s = props.handle.session.borrow();
        (s.image().map(|img| img.url.clone()), s.grid())
    };

    let url_cb = {
        let url = url.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                url.set(input.value());
            }
        })
    };
    let load_cb = {
        let url = url.clone();
        let status = status.clone();
        let handle = props.handle.clone();
        Callback::from(move |_| {
            let trimmed = url.trim();
            if trimmed.is_empty() {
                return;
            }
            status.set(Some("Loading…".to_string()));
            load_image(trimmed.to_string(), handle.clone(), status.clone());
        })
    };
    let clear_cb = {
        let handle = props.handle.clone();
        Callback::from(move |_| handle.dispatch(SessionAction::ClearMap))
    };

    html! {<div style="background:#161b22; border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <div style="font-weight:bold;">{"Map"}</div>
        <input type="url" placeholder="https://…/map.png" value={(*url).clone()} oninput={url_cb} />
        <div style="display:flex; gap:6px;">
            <button onclick={load_cb} style="flex:1;">{"Load Map"}</button>
            <button onclick={clear_cb} disabled={current.is_none()}>{"Clear"}</button>
        </div>
        { if let Some(txt) = &*status { html!{ <div style="font-size:11px; opacity:0.8;">{ txt.clone() }</div> } } else { html!{} } }
        <div style="font-size:11px; opacity:0.7;">{ format!("Grid: {} x {} cells", grid.width, grid.height) }</div>
    </div>}
}
