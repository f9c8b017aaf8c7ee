mod app;
mod config;
mod dom;
mod error;
mod leaflet;
mod legend;
mod markers;
mod ready;
mod viewport;

fn main() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(app::boot());
}
