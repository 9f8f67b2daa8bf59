use dioxus::prelude::*;

use crate::{
    app::{persist_mutation, persist_snapshot},
    domain::{AppState, PersistedState},
    infra::{
        supabase::{AuthSession, SignUpOutcome, SupabaseClient},
        sync::RemoteWrite,
    },
    ui::components::{
        confirm::ConfirmDialog,
        toast::{push_toast, ToastKind, ToastMessage},
    },
    util::{persistence::clear_persisted_state, version::{version_label, APP_NAME}},
};

#[component]
pub fn SettingsPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let confirm_reset = use_signal(|| false);

    let signed_in = session.with(|s| s.clone());
    let label = version_label();

    let on_confirm_reset = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let mut confirm_reset = confirm_reset.clone();
        move |_| {
            confirm_reset.set(false);
            if let Err(err) = clear_persisted_state() {
                println!("[persist] failed to clear snapshot: {err}");
            }
            let seed = PersistedState::seed();
            state.with_mut(|st| st.apply_persisted(seed.clone()));
            persist_mutation(
                &state,
                &client,
                &session,
                toasts.clone(),
                Some(RemoteWrite::ResetPlan(Box::new(seed))),
            );
            push_toast(toasts.clone(), ToastKind::Success, "Plan reset to defaults.");
        }
    };

    rsx! {
        section { class: "card",
            h2 { class: "card-title", "Account" }
            match (client.is_some(), signed_in) {
                (false, _) => rsx! {
                    p { class: "card-sub",
                        "Remote sync is not configured on this machine; everything stays in the local snapshot. "
                        "Set BAKEPLAN_SUPABASE_URL and BAKEPLAN_SUPABASE_ANON_KEY to enable it."
                    }
                },
                (true, Some(active)) => rsx! {
                    SignedInCard { active }
                },
                (true, None) => rsx! {
                    AuthForm {}
                },
            }
        }

        section { class: "card",
            h2 { class: "card-title", "Data" }
            p { class: "card-sub",
                "Resetting restores the starter plan: the default tasks, ingredients and extra costs."
            }
            button {
                class: "btn btn-danger",
                onclick: {
                    let mut confirm_reset = confirm_reset.clone();
                    move |_| confirm_reset.set(true)
                },
                "Reset all data"
            }
        }

        section { class: "card",
            h2 { class: "card-title", "About" }
            p { class: "card-sub", "{APP_NAME} {label}" }
        }

        if confirm_reset() {
            ConfirmDialog {
                title: "Reset all data?",
                message: "This wipes your plan and restores the defaults. There is no undo.",
                on_confirm: on_confirm_reset,
                on_cancel: {
                    let mut confirm_reset = confirm_reset.clone();
                    move |_| confirm_reset.set(false)
                },
            }
        }
    }
}

#[component]
fn SignedInCard(active: AuthSession) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();

    let mut session_mut = session;

    rsx! {
        p { class: "card-sub", "Signed in as {active.email}. Changes sync to this account." }
        button {
            class: "btn btn-ghost",
            onclick: move |_| {
                session_mut.set(None);
                // Keep showing whatever was loaded; it is already in the
                // local snapshot.
                persist_snapshot(&state);
                push_toast(toasts.clone(), ToastKind::Info, "Signed out. Back to local-only mode.");
            },
            "Sign out"
        }
    }
}

#[component]
fn AuthForm() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let mut email_input = use_signal(String::new);
    let mut password_input = use_signal(String::new);
    let mut login_mode = use_signal(|| true);
    let mut busy = use_signal(|| false);

    let heading = if login_mode() { "Sign in" } else { "Create account" };
    let submit_label = if login_mode() { "Sign in" } else { "Sign up" };
    let switch_label = if login_mode() {
        "Create an account instead"
    } else {
        "I already have an account"
    };

    let on_submit = {
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let email = email_input().trim().to_string();
            let password = password_input();
            if email.is_empty() || password.is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "Fill in both fields.");
                return;
            }
            let Some(client) = client.clone() else { return };
            if busy() {
                return;
            }
            busy.set(true);

            let mut session = session.clone();
            let toasts = toasts.clone();
            let mut busy = busy.clone();
            let is_login = login_mode();
            spawn(async move {
                let result = if is_login {
                    client.sign_in(&email, &password).await.map(Some)
                } else {
                    match client.sign_up(&email, &password).await {
                        Ok(SignUpOutcome::SignedIn(active)) => Ok(Some(active)),
                        Ok(SignUpOutcome::ConfirmationRequired) => Ok(None),
                        Err(err) => Err(err),
                    }
                };

                match result {
                    Ok(Some(active)) => {
                        println!("[auth] signed in as {}", active.email);
                        session.set(Some(active));
                    }
                    Ok(None) => {
                        push_toast(
                            toasts.clone(),
                            ToastKind::Info,
                            "Check your email to confirm the account, then sign in.",
                        );
                    }
                    Err(err) => {
                        println!("[auth] request failed: {err}");
                        push_toast(toasts.clone(), ToastKind::Error, format!("{err}"));
                    }
                }
                busy.set(false);
            });
        }
    };

    rsx! {
        p { class: "card-sub", "Sign in to keep the plan on your account instead of this machine." }
        form { class: "auth-form",
            onsubmit: on_submit,
            h3 { class: "dialog-title", "{heading}" }
            label { class: "field-label", "Email" }
            input {
                class: "input",
                r#type: "email",
                value: "{email_input}",
                oninput: move |evt| email_input.set(evt.value()),
            }
            label { class: "field-label", "Password" }
            input {
                class: "input",
                r#type: "password",
                value: "{password_input}",
                oninput: move |evt| password_input.set(evt.value()),
            }
            div { class: "dialog-actions",
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    onclick: move |_| login_mode.set(!login_mode()),
                    "{switch_label}"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    "{submit_label}"
                }
            }
        }
    }
}
