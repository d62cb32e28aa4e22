use dioxus::prelude::*;

mod api;
mod components;
mod views;

use views::Home;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        Home {}
    }
}
