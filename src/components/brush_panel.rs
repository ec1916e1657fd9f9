use web_sys::HtmlInputElement;
use yew::prelude::*;

use super::app::SessionHandle;
use crate::model::BrushSettings;
use crate::state::SessionAction;

#[derive(Properties, PartialEq, Clone)]
pub struct BrushPanelProps {
    pub handle: SessionHandle,
}

fn slider_value(e: &InputEvent) -> Option<u32> {
    let input: HtmlInputElement = e.target_dyn_into()?;
    input.value().parse::<u32>().ok()
}

#[function_component]
pub fn BrushPanel(props: &BrushPanelProps) -> Html {
    let (brush, revealed, total) = {
        let s = props.handle.session.borrow();
        (s.brush(), s.fog().revealed_count(), s.grid().cell_count())
    };

    let toggle_cb = {
        let handle = props.handle.clone();
        Callback::from(move |_| handle.dispatch(SessionAction::SetBrushActive(!brush.active)))
    };
    let size_cb = {
        let handle = props.handle.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(v) = slider_value(&e) {
                handle.dispatch(SessionAction::SetBrushSize(v));
            }
        })
    };
    let opacity_cb = {
        let handle = props.handle.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(v) = slider_value(&e) {
                handle.dispatch(SessionAction::SetFogOpacity(v.min(100) as u8));
            }
        })
    };
    let reveal_all_cb = {
        let handle = props.handle.clone();
        Callback::from(move |_| handle.dispatch(SessionAction::SetAllFog { revealed: true }))
    };
    let fog_all_cb = {
        let handle = props.handle.clone();
        Callback::from(move |_| handle.dispatch(SessionAction::SetAllFog { revealed: false }))
    };

    let toggle_style = if brush.active {
        "background:#1f6feb; border-color:#58a6ff; color:#fff;"
    } else {
        ""
    };

    html! {<div style="background:#161b22; border:1px solid #30363d; border-radius:8px; padding:10px; display:flex; flex-direction:column; gap:8px;">
        <div style="font-weight:bold;">{"Fog of War"}</div>
        <button onclick={toggle_cb} style={toggle_style}>
            { if brush.active { "Brush: On" } else { "Brush: Off" } }
        </button>
        <label style="display:flex; flex-direction:column; gap:2px; font-size:12px;">
            <span>{ format!("Brush Size: {}", brush.size) }</span>
            <input type="range" min={BrushSettings::MIN_SIZE.to_string()} max={BrushSettings::MAX_SIZE.to_string()}
                value={brush.size.to_string()} oninput={size_cb} />
        </label>
        <label style="display:flex; flex-direction:column; gap:2px; font-size:12px;">
            <span>{ format!("Fog Opacity: {}%", brush.fog_opacity) }</span>
            <input type="range" min="0" max="100" value={brush.fog_opacity.to_string()} oninput={opacity_cb} />
        </label>
        <div style="display:flex; gap:6px;">
            <button onclick={reveal_all_cb} style="flex:1;">{"Reveal All"}</button>
            <button onclick={fog_all_cb} style="flex:1;">{"Fog All"}</button>
        </div>
        <div style="font-size:11px; opacity:0.7;">{ format!("Revealed {revealed} of {total} cells") }</div>
        <div style="font-size:11px; opacity:0.7;">{"Left-drag reveals, right-drag hides. Hotkey: 'B' toggles the brush."}</div>
    </div>}
}
