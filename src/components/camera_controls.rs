use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    /// Current zoom as a whole percentage.
    pub percent: u32,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    pub on_pan_left: Callback<()>,
    pub on_pan_right: Callback<()>,
    pub on_pan_up: Callback<()>,
    pub on_pan_down: Callback<()>,
    pub on_reset: Callback<()>,
}

fn button(label: &'static str, title: &'static str, cb: &Callback<()>) -> Html {
    let cb = cb.clone();
    let onclick = Callback::from(move |e: MouseEvent| {
        e.stop_propagation();
        cb.emit(());
    });
    // Keep clicks from reaching the map's pointer handlers
    let onpointerdown = Callback::from(|e: PointerEvent| e.stop_propagation());
    html! { <button {title} {onclick} {onpointerdown}>{ label }</button> }
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:flex; gap:6px; align-items:center;">
        { button("-", "Zoom out", &props.on_zoom_out) }
        <span style="min-width:44px; text-align:center; font-size:12px;">{ format!("{}%", props.percent) }</span>
        { button("+", "Zoom in", &props.on_zoom_in) }
        <span style="width:8px;"></span>
        { button("←", "Pan left", &props.on_pan_left) }
        { button("↑", "Pan up", &props.on_pan_up) }
        { button("↓", "Pan down", &props.on_pan_down) }
        { button("→", "Pan right", &props.on_pan_right) }
        <span style="width:8px;"></span>
        { button("Reset", "Reset view", &props.on_reset) }
    </div>}
}
