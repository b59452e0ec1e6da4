//! Pin Modal Component
//!
//! Creation form shown after a map click in add-pin mode.

use leptos::prelude::*;
use pin_sync::{Category, PinDraft, PinError};

use crate::context::use_map_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn CategoryPicker(
    current: ReadSignal<Category>,
    on_change: impl Fn(Category) + Copy + 'static,
) -> impl IntoView {
    view! {
        <div class="category-picker">
            {Category::SELECTABLE.iter().map(|&category| {
                view! {
                    <label class="category-option" data-category=category.as_str()>
                        <input
                            type="radio"
                            name="pin-category"
                            value=category.as_str()
                            prop:checked=move || current.get() == category
                            on:change=move |_| on_change(category)
                        />
                        <i class=category.glyph()></i>
                        " "
                        {category.label()}
                    </label>
                }
            }).collect_view()}
        </div>
    }
}

#[component]
fn PinForm() -> impl IntoView {
    let ctx = use_map_context();

    let (title, set_title) = signal(String::new());
    let (note, set_note) = signal(String::new());
    let (category, set_category) = signal(Category::Quest);

    let save = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = PinDraft {
            title: title.get(),
            note: note.get(),
            category: category.get(),
        };
        match ctx.save_new_pin(&draft) {
            Ok(()) => {}
            Err(PinError::InvalidInput(_)) => {
                if let Some(window) = web_sys::window() {
                    let _ = window.alert_with_message("Please enter a title for the pin.");
                }
            }
            Err(e) => log::error!("{}", e),
        }
    };

    view! {
        <form class="pin-form" on:submit=save>
            <label for="pin-title">"Title"</label>
            <input
                id="pin-title"
                type="text"
                placeholder="Abandoned mine"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <label for="pin-note">"Note"</label>
            <textarea
                id="pin-note"
                placeholder="What happened here?"
                prop:value=move || note.get()
                on:input=move |ev| set_note.set(event_target_value(&ev))
            ></textarea>
            <CategoryPicker current=category on_change=move |c| set_category.set(c) />
            <button type="submit" class="western-button">"Save"</button>
        </form>
    }
}

#[component]
pub fn PinModal() -> impl IntoView {
    let ctx = use_map_context();
    let store = use_app_store();

    view! {
        // Remounted on each open so the form starts empty
        <Show when=move || store.add_mode().get().is_modal_open()>
            <div class="modal-backdrop" on:click=move |_| ctx.cancel_new_pin()>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <button class="modal-close" on:click=move |_| ctx.cancel_new_pin()>"×"</button>
                    <h2>"New Pin"</h2>
                    <PinForm />
                </div>
            </div>
        </Show>
    }
}
