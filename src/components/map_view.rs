use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CanvasRenderingContext2d, DragEvent, Element, HtmlCanvasElement, HtmlInputElement,
    KeyboardEvent, MouseEvent, PointerEvent, WheelEvent,
};
use yew::prelude::*;

use super::app::SessionHandle;
use super::camera_controls::CameraControls;
use crate::icons::{GlyphTable, IconResolver};
use crate::model::{ScreenPoint, Token};
use crate::state::interaction::Interaction;
use crate::state::transform::{cell_screen_size, grid_to_screen};
use crate::state::{
    DragPayload, MOVE_TOKEN_KEY, MapSession, NEW_TOKEN_KEY, PointerButton, SessionAction,
};

const BACKGROUND: &str = "#0e1116";
const PAN_STEP_PX: f64 = 64.0;

#[derive(Properties, PartialEq, Clone)]
pub struct MapViewProps {
    pub handle: SessionHandle,
    /// Right-click on a placed token (GM, brush off).
    #[prop_or_default]
    pub on_edit_token: Callback<Token>,
}

/// Pointer position relative to the map container.
fn local_point(container: &NodeRef, e: &MouseEvent) -> Option<ScreenPoint> {
    let el = container.cast::<Element>()?;
    let rect = el.get_bounding_client_rect();
    Some(ScreenPoint::new(
        e.client_x() as f64 - rect.left(),
        e.client_y() as f64 - rect.top(),
    ))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Clear and switch the context to grid units (one unit = one cell).
fn begin_grid_space(
    canvas: &HtmlCanvasElement,
    session: &MapSession,
) -> Option<(CanvasRenderingContext2d, f64)> {
    let ctx = context_2d(canvas)?;
    let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
    let vp = session.viewport();
    let scale_px = cell_screen_size(vp, session.cell_size_px());
    let _ = ctx.set_transform(scale_px, 0.0, 0.0, scale_px, vp.offset.x, vp.offset.y);
    Some((ctx, scale_px))
}

fn draw_grid(canvas: &HtmlCanvasElement, session: &MapSession) {
    let Some((ctx, scale_px)) = begin_grid_space(canvas, session) else {
        return;
    };
    let gs = session.grid();
    if session.image().is_none() {
        ctx.set_fill_style_str("#161b22");
        ctx.fill_rect(0.0, 0.0, gs.width as f64, gs.height as f64);
    }
    ctx.set_stroke_style_str("rgba(88,166,255,0.22)");
    ctx.set_line_width((1.0 / scale_px).max(0.001));
    for x in 0..=gs.width {
        ctx.begin_path();
        ctx.move_to(x as f64, 0.0);
        ctx.line_to(x as f64, gs.height as f64);
        ctx.stroke();
    }
    for y in 0..=gs.height {
        ctx.begin_path();
        ctx.move_to(0.0, y as f64);
        ctx.line_to(gs.width as f64, y as f64);
        ctx.stroke();
    }
}

fn draw_fog(canvas: &HtmlCanvasElement, session: &MapSession) {
    let Some((ctx, _)) = begin_grid_space(canvas, session) else {
        return;
    };
    let color = if session.is_gm() {
        format!("rgba(33,33,33,{:.2})", session.brush().fog_opacity as f64 / 100.0)
    } else {
        BACKGROUND.to_string()
    };
    ctx.set_fill_style_str(&color);
    let fog = session.fog();
    for y in 0..fog.size().height {
        // one rect per run of fogged cells avoids seams between neighbours
        let row = fog.row(y);
        let mut x = 0;
        while x < row.len() {
            if !row[x] {
                x += 1;
                continue;
            }
            let start = x;
            while x < row.len() && row[x] {
                x += 1;
            }
            ctx.fill_rect(start as f64, y as f64, (x - start) as f64, 1.0);
        }
    }
}

#[function_component(MapView)]
pub fn map_view(props: &MapViewProps) -> Html {
    let container_ref = use_node_ref();
    let grid_canvas_ref = use_node_ref();
    let fog_canvas_ref = use_node_ref();
    let surface_size = use_state(|| (0u32, 0u32));
    // Latest handle for listeners registered once on mount
    let handle_ref = use_mut_ref(|| props.handle.clone());
    *handle_ref.borrow_mut() = props.handle.clone();

    // Mount: sizing, wheel zoom, hotkeys
    {
        let container_ref = container_ref.clone();
        let grid_canvas_ref = grid_canvas_ref.clone();
        let fog_canvas_ref = fog_canvas_ref.clone();
        let surface_size = surface_size.clone();
        let handle_ref = handle_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let fit = {
                let container_ref = container_ref.clone();
                move || {
                    let Some(el) = container_ref.cast::<Element>() else {
                        return;
                    };
                    let w = el.client_width().max(0) as u32;
                    let h = el.client_height().max(0) as u32;
                    for canvas_ref in [&grid_canvas_ref, &fog_canvas_ref] {
                        if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                            canvas.set_width(w);
                            canvas.set_height(h);
                        }
                    }
                    surface_size.set((w, h));
                }
            };
            fit();
            let resize_cb = Closure::wrap(Box::new(fit) as Box<dyn FnMut()>);

            let wheel_cb = {
                let container_ref = container_ref.clone();
                let handle_ref = handle_ref.clone();
                Closure::wrap(Box::new(move |e: WheelEvent| {
                    e.prevent_default();
                    let Some(p) = local_point(&container_ref, &e) else {
                        return;
                    };
                    let handle = handle_ref.borrow().clone();
                    handle.update(|s| s.wheel(p, e.delta_y()));
                }) as Box<dyn FnMut(_)>)
            };

            let keydown_cb = {
                let handle_ref = handle_ref.clone();
                Closure::wrap(Box::new(move |e: KeyboardEvent| {
                    // typing into the side panels
                    let in_field = e
                        .target()
                        .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                        .is_some();
                    if in_field {
                        return;
                    }
                    let handle = handle_ref.borrow().clone();
                    let (is_gm, brush_active) = {
                        let s = handle.session.borrow();
                        (s.is_gm(), s.brush().active)
                    };
                    match e.key().as_str() {
                        "b" | "B" if is_gm => {
                            handle.dispatch(SessionAction::SetBrushActive(!brush_active))
                        }
                        "0" => handle.dispatch(SessionAction::ResetView),
                        _ => {}
                    }
                }) as Box<dyn FnMut(_)>)
            };

            let container = container_ref.cast::<Element>();
            if let Some(el) = &container {
                let _ = el.add_event_listener_with_callback(
                    "wheel",
                    wheel_cb.as_ref().unchecked_ref(),
                );
            }
            if let Some(win) = &window {
                let _ = win.add_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                let _ = win.add_event_listener_with_callback(
                    "keydown",
                    keydown_cb.as_ref().unchecked_ref(),
                );
            }

            move || {
                if let Some(el) = &container {
                    let _ = el.remove_event_listener_with_callback(
                        "wheel",
                        wheel_cb.as_ref().unchecked_ref(),
                    );
                }
                if let Some(win) = &window {
                    let _ = win.remove_event_listener_with_callback(
                        "resize",
                        resize_cb.as_ref().unchecked_ref(),
                    );
                    let _ = win.remove_event_listener_with_callback(
                        "keydown",
                        keydown_cb.as_ref().unchecked_ref(),
                    );
                }
                let _keep_alive = (&wheel_cb, &resize_cb, &keydown_cb);
            }
        });
    }

    // Redraw canvases whenever the session or the surface size changes
    {
        let handle = props.handle.clone();
        let grid_canvas_ref = grid_canvas_ref.clone();
        let fog_canvas_ref = fog_canvas_ref.clone();
        use_effect_with((props.handle.version, *surface_size), move |_| {
            let session = handle.session.borrow();
            if let Some(canvas) = grid_canvas_ref.cast::<HtmlCanvasElement>() {
                draw_grid(&canvas, &session);
            }
            if let Some(canvas) = fog_canvas_ref.cast::<HtmlCanvasElement>() {
                draw_fog(&canvas, &session);
            }
            || ()
        });
    }

    let onpointerdown = {
        let handle = props.handle.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: PointerEvent| {
            let Some(p) = local_point(&container_ref, &e) else {
                return;
            };
            let button = PointerButton::from_dom(e.button());
            if button == PointerButton::Middle {
                // no autoscroll
                e.prevent_default();
            }
            handle.update(|s| s.pointer_down(button, p));
        })
    };
    let onpointermove = {
        let handle = props.handle.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: PointerEvent| {
            if let Some(p) = local_point(&container_ref, &e) {
                handle.update(|s| s.pointer_move(p));
            }
        })
    };
    let onpointerup = {
        let handle = props.handle.clone();
        Callback::from(move |_e: PointerEvent| handle.update(|s| s.pointer_up()))
    };
    let onpointerleave = {
        let handle = props.handle.clone();
        Callback::from(move |_e: PointerEvent| handle.update(|s| s.pointer_leave()))
    };
    let oncontextmenu = {
        let handle = props.handle.clone();
        let container_ref = container_ref.clone();
        let on_edit = props.on_edit_token.clone();
        Callback::from(move |e: MouseEvent| {
            let token = {
                let session = handle.session.borrow();
                if session.suppresses_context_menu() {
                    e.prevent_default();
                    return;
                }
                local_point(&container_ref, &e).and_then(|p| session.editable_token_at(p).cloned())
            };
            if let Some(token) = token {
                e.prevent_default();
                on_edit.emit(token);
            }
        })
    };
    let ondragover = {
        let handle = props.handle.clone();
        Callback::from(move |e: DragEvent| {
            if handle.session.borrow().is_gm() {
                e.prevent_default();
            }
        })
    };
    let ondrop = {
        let handle = props.handle.clone();
        let container_ref = container_ref.clone();
        Callback::from(move |e: DragEvent| {
            e.prevent_default();
            let Some(p) = local_point(&container_ref, &e) else {
                return;
            };
            let dt = e.data_transfer();
            let json = dt.as_ref().and_then(|d| d.get_data(NEW_TOKEN_KEY).ok());
            let id = dt.as_ref().and_then(|d| d.get_data(MOVE_TOKEN_KEY).ok());
            let payload = DragPayload::decode(json.as_deref(), id.as_deref());
            handle.update(|s| s.drop_payload(payload, p).is_some());
        })
    };

    let session = props.handle.session.borrow();
    let vp = *session.viewport();
    let cell_px = cell_screen_size(&vp, session.cell_size_px());
    let is_gm = session.is_gm();
    let brush = session.brush();
    let can_drag = is_gm && !brush.active;

    let background = session.image().map(|img| {
        let style = format!(
            "position:absolute; left:{:.1}px; top:{:.1}px; width:{:.1}px; height:{:.1}px; pointer-events:none; user-select:none;",
            vp.offset.x,
            vp.offset.y,
            img.width_px as f64 * vp.effective_scale(),
            img.height_px as f64 * vp.effective_scale(),
        );
        html! { <img src={img.url.clone()} draggable="false" alt="" style={style} /> }
    });

    let tokens_html: Html = session
        .visible_tokens()
        .into_iter()
        .map(|t| {
            let pos = grid_to_screen(t.anchor(), &vp, session.cell_size_px());
            let side = t.size as f64 * cell_px;
            let style = format!(
                "position:absolute; left:{:.1}px; top:{:.1}px; width:{:.1}px; height:{:.1}px; box-sizing:border-box; background:{}; border:2px solid rgba(255,255,255,0.5); border-radius:{}; box-shadow:0 0 10px {}, 0 0 2px black; display:flex; align-items:center; justify-content:center; font-size:{:.1}px; user-select:none; cursor:{};",
                pos.x,
                pos.y,
                side,
                side,
                t.color,
                if t.size > 1 { "8px" } else { "50%" },
                t.color,
                side * 0.55,
                if can_drag { "grab" } else { "default" },
            );
            let ondragstart = {
                let handle = props.handle.clone();
                let id = t.id.clone();
                Callback::from(move |e: DragEvent| {
                    let started = handle.session.borrow_mut().begin_token_drag(&id);
                    if !started {
                        e.prevent_default();
                        return;
                    }
                    if let Some(dt) = e.data_transfer() {
                        let _ = dt.set_data(MOVE_TOKEN_KEY, &id);
                        dt.set_effect_allowed("move");
                    }
                })
            };
            let ondragend = {
                let handle = props.handle.clone();
                Callback::from(move |_e: DragEvent| handle.session.borrow_mut().end_token_drag())
            };
            html! {
                <div key={t.id.clone()} title={t.name.clone()} draggable={if can_drag { "true" } else { "false" }}
                    style={style} {ondragstart} {ondragend}>
                    { GlyphTable.resolve(&t.icon).symbol() }
                </div>
            }
        })
        .collect();

    let center = ScreenPoint::new(surface_size.0 as f64 / 2.0, surface_size.1 as f64 / 2.0);
    let zoom_step = session.config().zoom_step;
    let zoom_cb = |factor: f64| {
        let handle = props.handle.clone();
        Callback::from(move |()| handle.dispatch(SessionAction::ZoomBy { point: center, factor }))
    };
    let pan_cb = |dx: f64, dy: f64| {
        let handle = props.handle.clone();
        Callback::from(move |()| handle.dispatch(SessionAction::PanBy { dx, dy }))
    };
    let reset_cb = {
        let handle = props.handle.clone();
        Callback::from(move |()| handle.dispatch(SessionAction::ResetView))
    };

    let cursor = match session.interaction() {
        Interaction::Panning { .. } => "grabbing",
        Interaction::FogPainting(_) => "crosshair",
        _ if is_gm && brush.active => "crosshair",
        _ => "default",
    };
    let status = is_gm.then(|| {
        let gs = session.grid();
        format!(
            "Grid: {}px | {}x{} | Tokens: {} | Revealed: {}/{}",
            session.cell_size_px(),
            gs.width,
            gs.height,
            session.tokens().len(),
            session.fog().revealed_count(),
            gs.cell_count(),
        )
    });
    let layer = "position:absolute; inset:0; pointer-events:none;";

    html! {<div ref={container_ref} style={format!("position:relative; width:100%; height:100%; overflow:hidden; background:{BACKGROUND}; cursor:{cursor}; touch-action:none;")}
        {onpointerdown} {onpointermove} {onpointerup} {onpointerleave} {oncontextmenu} {ondragover} {ondrop}>
        { for background }
        <canvas ref={grid_canvas_ref} style={layer}></canvas>
        <div style="position:absolute; inset:0;">{ tokens_html }</div>
        <canvas ref={fog_canvas_ref} style={layer}></canvas>
        { if let Some(text) = status { html!{ <div style="position:absolute; top:8px; left:8px; background:rgba(22,27,34,0.85); border:1px solid #30363d; border-radius:6px; padding:2px 8px; font-size:11px; opacity:0.8; pointer-events:none;">{ text }</div> } } else { html!{} } }
        <CameraControls percent={vp.percent()}
            on_zoom_in={zoom_cb(zoom_step)} on_zoom_out={zoom_cb(1.0 / zoom_step)}
            on_pan_left={pan_cb(PAN_STEP_PX, 0.0)} on_pan_right={pan_cb(-PAN_STEP_PX, 0.0)}
            on_pan_up={pan_cb(0.0, PAN_STEP_PX)} on_pan_down={pan_cb(0.0, -PAN_STEP_PX)}
            on_reset={reset_cb} />
    </div>}
}
