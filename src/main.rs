//! Phone Showcase - interactive 3D phone model viewer
//!
//! Opens a winit window with an egui side panel listing the phone catalog.
//! Picking a phone loads its glTF asset on a worker thread, applies the
//! catalog placement and shows its name, description and specs while the
//! viewport frames the model.

mod app;
mod assets;
mod catalog;
mod config;
mod render;
mod scene;
mod ui;
mod viewer;

fn main() {
    app::run();
}
