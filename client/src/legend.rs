use std::any::Any;
use std::cell::RefCell;

use leptos::mount::mount_to;
use leptos::prelude::*;
use web_sys::HtmlElement;

use plotmap_shared::CategoryColors;
use plotmap_shared::legend::{LegendEntry, legend_entries};

thread_local! {
    static LEGEND_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

/// Replace the container's content with one row per category.
pub fn render(container: HtmlElement, colors: &CategoryColors) {
    let entries = legend_entries(colors);
    LEGEND_MOUNT_HANDLE.with(move |slot| {
        // Unmount the previous legend before clearing whatever the server rendered.
        let _old = slot.borrow_mut().take();
        container.set_inner_html("");
        let handle = mount_to(container, move || view! { <Legend entries=entries /> });
        *slot.borrow_mut() = Some(Box::new(handle));
    });
}

#[component]
fn Legend(entries: Vec<LegendEntry>) -> impl IntoView {
    view! {
        <div class="plotmap-legend">
            {entries
                .into_iter()
                .map(|entry| {
                    let style = entry.swatch_style();
                    view! {
                        <div class="plotmap-legend__item">
                            <span class="plotmap-legend__swatch" style=style></span>
                            <span class="plotmap-legend__label">{entry.label}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
