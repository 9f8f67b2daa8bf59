use dioxus::prelude::*;

use crate::{
    app::persist_mutation,
    domain::{AppState, Member},
    infra::{
        supabase::{AuthSession, SupabaseClient},
        sync::RemoteWrite,
    },
    ui::components::toast::{push_toast, ToastKind, ToastMessage},
    util::new_entity_id,
};

#[component]
pub fn TeamPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let mut name_input = use_signal(String::new);
    let members = state.with(|st| st.members.clone());

    let on_add = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        move |_| {
            let name = name_input().trim().to_string();
            if name.is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "Type a name first.");
                return;
            }
            let member = Member {
                id: new_entity_id(),
                name,
            };
            state.with_mut(|st| st.members.push(member.clone()));
            name_input.set(String::new());
            persist_mutation(
                &state,
                &client,
                &session,
                toasts.clone(),
                Some(RemoteWrite::InsertMember(member)),
            );
        }
    };

    rsx! {
        section { class: "card",
            h2 { class: "card-title", "The crew" }
            p { class: "card-sub", "Who is running this bake sale?" }

            if members.is_empty() {
                p { class: "empty-note", "No members yet. Add the first one below." }
            }

            div { class: "chip-row",
                for member in members {
                    MemberChip { key: "{member.id}", member: member.clone() }
                }
            }

            form { class: "input-row",
                onsubmit: {
                    let mut on_add = on_add.clone();
                    move |evt: FormEvent| {
                        evt.prevent_default();
                        on_add(());
                    }
                },
                input {
                    class: "input",
                    placeholder: "New member name",
                    value: "{name_input}",
                    oninput: move |evt| name_input.set(evt.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", "Add" }
            }
        }
    }
}

#[component]
fn MemberChip(member: Member) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let mut state_mut = state;
    let id = member.id.clone();

    rsx! {
        span { class: "chip",
            "{member.name}"
            button {
                class: "chip-remove",
                title: "Remove member",
                onclick: move |_| {
                    let target = id.clone();
                    state_mut.with_mut(|st| st.members.retain(|m| m.id != target));
                    persist_mutation(
                        &state_mut,
                        &client,
                        &session,
                        toasts.clone(),
                        Some(RemoteWrite::DeleteMember(target)),
                    );
                },
                "✕"
            }
        }
    }
}
