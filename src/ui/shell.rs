use dioxus::prelude::*;

use crate::app::{persist_snapshot, Route};
use crate::domain::AppState;
use crate::infra::supabase::AuthSession;
use crate::util::version::APP_NAME;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let session = use_context::<Signal<Option<AuthSession>>>();

    let theme = state.with(|s| s.theme);
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let mut state_mut = state;
    let account_label = session
        .with(|s| s.as_ref().map(|active| active.email.clone()))
        .unwrap_or_else(|| "local only".to_string());

    rsx! {
        div { class: "{theme.body_class()}",
            header { class: "header",
                div { class: "header-inner",
                    div { class: "brand",
                        span { class: "brand-icon", "🧁" }
                        div {
                            h1 { class: "brand-title", "{APP_NAME}" }
                            p { class: "brand-sub", "{account_label}" }
                        }
                    }
                    nav { class: "nav",
                        NavButton {
                            active: matches!(current_route, Route::Team {}),
                            onclick: move |_| { nav.push(Route::Team {}); },
                            label: "👥 Team",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Timeline {}),
                            onclick: move |_| { nav.push(Route::Timeline {}); },
                            label: "🗓️ Timeline",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Calculator {}),
                            onclick: move |_| { nav.push(Route::Calculator {}); },
                            label: "💰 Calculator",
                        }
                        NavButton {
                            active: matches!(current_route, Route::Settings {}),
                            onclick: move |_| { nav.push(Route::Settings {}); },
                            label: "⚙️",
                        }
                        button {
                            class: "btn btn-ghost theme-toggle",
                            title: "Switch theme",
                            onclick: move |_| {
                                state_mut.with_mut(|s| s.theme = s.theme.toggled());
                                persist_snapshot(&state_mut);
                            },
                            "{theme.toggle_icon()}"
                        }
                    }
                }
            }
            main { class: "page",
                {children}
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    let class = if active { "nav-btn active" } else { "nav-btn" };

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
