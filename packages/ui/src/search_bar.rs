use dioxus::prelude::*;

use crate::icons::FaMagnifyingGlass;
use crate::Icon;

#[component]
pub fn SearchBar(
    value: String,
    #[props(default = "Search...".to_string())] placeholder: String,
    on_input: EventHandler<String>,
) -> Element {
    rsx! {
        div {
            class: "search-bar",
            Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
            input {
                r#type: "search",
                placeholder: "{placeholder}",
                value: "{value}",
                oninput: move |evt: FormEvent| on_input.call(evt.value()),
            }
        }
    }
}
