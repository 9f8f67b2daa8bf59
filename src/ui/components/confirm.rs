use dioxus::prelude::*;

/// Modal yes/no gate in front of destructive actions. Pages own the "is it
/// open, and for what" state; this component only renders and reports.
#[component]
pub fn ConfirmDialog(
    title: String,
    message: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "dialog-backdrop",
            div { class: "dialog",
                h3 { class: "dialog-title", "{title}" }
                p { class: "dialog-text", "{message}" }
                div { class: "dialog-actions",
                    button {
                        class: "btn btn-ghost",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| on_confirm.call(()),
                        "Confirm"
                    }
                }
            }
        }
    }
}
