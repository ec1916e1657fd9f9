mod components;
mod config;
mod icons;
mod logging;
mod model;
mod state;
mod util;

use components::app::App;

fn main() {
    logging::init(tracing::Level::DEBUG);
    yew::Renderer::<App>::new().render();
}
