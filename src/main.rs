mod components;
mod data;
mod model;
mod state;
mod tags;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}
