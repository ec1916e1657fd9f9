use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::model::{MAX_TOKEN_SIZE, TOKEN_COLORS, Token, TokenPatch};

#[derive(Properties, PartialEq, Clone)]
pub struct TokenEditModalProps {
    /// Snapshot of the token being edited; render with `key` = token id.
    pub token: Token,
    pub on_save: Callback<(String, TokenPatch)>,
    pub on_delete: Callback<String>,
    pub on_close: Callback<()>,
}

/// Only fields that differ from the snapshot end up in the patch.
fn build_patch(token: &Token, name: &str, size: u32, color: &str) -> TokenPatch {
    let name = name.trim();
    TokenPatch {
        name: (!name.is_empty() && name != token.name).then(|| name.to_string()),
        size: (size != token.size).then_some(size),
        color: (color != token.color).then(|| color.to_string()),
        ..TokenPatch::default()
    }
}

#[function_component]
pub fn TokenEditModal(props: &TokenEditModalProps) -> Html {
    let name = use_state(|| props.token.name.clone());
    let size = use_state(|| props.token.size.clamp(1, MAX_TOKEN_SIZE));
    let color = use_state(|| props.token.color.clone());

    let name_cb = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                name.set(input.value());
            }
        })
    };
    let size_cb = {
        let size = size.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(v) = e
                .target_dyn_into::<HtmlInputElement>()
                .and_then(|input| input.value().parse::<u32>().ok())
            {
                size.set(v.clamp(1, MAX_TOKEN_SIZE));
            }
        })
    };
    let color_cb = {
        let color = color.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                color.set(select.value());
            }
        })
    };
    let save_cb = {
        let token = props.token.clone();
        let (name, size, color) = (name.clone(), size.clone(), color.clone());
        let on_save = props.on_save.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_| {
            let patch = build_patch(&token, &name, *size, &color);
            if !patch.is_empty() {
                on_save.emit((token.id.clone(), patch));
            }
            on_close.emit(());
        })
    };
    let delete_cb = {
        let id = props.token.id.clone();
        let on_delete = props.on_delete.clone();
        Callback::from(move |_| on_delete.emit(id.clone()))
    };
    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let swatch = format!(
        "width:18px; height:18px; border-radius:50%; border:1px solid #30363d; background:{};",
        *color
    );
    // A color not in the palette (e.g. from a kind default) still shows up as an option
    let custom = (!TOKEN_COLORS.iter().any(|(_, css)| *css == color.as_str())).then(|| {
        html! { <option value={(*color).clone()} selected=true>{"Custom"}</option> }
    });

    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:320px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{ format!("Edit {}", props.token.name) }</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <label style="display:flex; flex-direction:column; gap:4px; font-size:12px;">
                <span>{"Name"}</span>
                <input type="text" value={(*name).clone()} oninput={name_cb} />
            </label>
            <label style="display:flex; flex-direction:column; gap:4px; font-size:12px;">
                <span>{ format!("Size: {0}x{0}", *size) }</span>
                <input type="range" min="1" max={MAX_TOKEN_SIZE.to_string()} value={size.to_string()} oninput={size_cb} />
            </label>
            <label style="display:flex; align-items:center; gap:8px; font-size:12px;">
                <span>{"Color"}</span>
                <select onchange={color_cb}>
                    { for custom }
                    { for TOKEN_COLORS.iter().map(|(label, css)| html! {
                        <option value={*css} selected={*css == color.as_str()}>{ *label }</option>
                    }) }
                </select>
                <span style={swatch}></span>
            </label>
            <div style="display:flex; gap:8px;">
                <button onclick={delete_cb} style="background:#f85149; border:1px solid #b62324; color:#fff;">{"Delete"}</button>
                <span style="flex:1;"></span>
                <button onclick={close_cb}>{"Cancel"}</button>
                <button onclick={save_cb} style="border-color:#58a6ff; color:#58a6ff;">{"Save"}</button>
            </div>
        </div>
    </div>}
}
