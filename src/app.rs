use dioxus::{prelude::*, signals::Signal};

use crate::{
    domain::{AppState, PersistedState},
    infra::{
        supabase::{AuthSession, SupabaseClient},
        sync::RemoteWrite,
    },
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{CalculatorPage, SettingsPage, TeamPage, TimelinePage},
        shell::Shell,
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    #[route("/team")]
    Team {},
    #[route("/timeline")]
    Timeline {},
    #[route("/calculator")]
    Calculator {},
    #[route("/settings")]
    Settings {},
}

#[component]
pub fn App() -> Element {
    let state = use_signal(AppState::default);
    use_hook({
        let mut state = state.clone();
        move || {
            if let Some(saved) = load_persisted_state() {
                state.with_mut(|st| st.apply_persisted(saved));
            }
        }
    });
    use_context_provider(|| state.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts.clone());

    // Active account, if any. None means the local snapshot is the only
    // persistence path.
    let session = use_signal(|| None::<AuthSession>);
    use_context_provider(|| session.clone());

    // Built once at startup; stays None when the backend is not configured,
    // which the settings page reports.
    let client = use_hook(|| match SupabaseClient::new() {
        Ok(client) => Some(client),
        Err(err) => {
            println!("[sync] remote persistence disabled: {err}");
            None
        }
    });
    use_context_provider(|| client.clone());

    let _remote_plan = use_resource({
        let state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        move || {
            let client = client.clone();
            async move { load_account_plan(state.clone(), toasts.clone(), session.clone(), client).await }
        }
    });

    rsx! {
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

/// Write the whole in-memory snapshot to disk. Runs after every mutation in
/// both modes so the last view survives a restart.
pub fn persist_snapshot(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        println!("[persist] failed to save snapshot: {err}");
    }
}

/// The second half of every mutation: save the snapshot locally and, when an
/// account is signed in, fire the matching backend write in the background.
/// The local edit already rendered; a failed write only produces a toast.
pub fn persist_mutation(
    state: &Signal<AppState>,
    client: &Option<SupabaseClient>,
    session: &Signal<Option<AuthSession>>,
    toasts: Signal<Vec<ToastMessage>>,
    write: Option<RemoteWrite>,
) {
    persist_snapshot(state);

    let Some(write) = write else { return };
    let active = session.with(|s| s.clone());
    let (Some(client), Some(active)) = (client.clone(), active) else {
        return;
    };

    spawn(async move {
        let label = write.describe();
        if let Err(err) = write.execute(&client, &active).await {
            println!("[sync] {label} failed: {err}");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Sync failed ({label}): {err}"),
            );
        }
    });
}

/// Runs whenever the session changes: pull the account's rows and replace
/// the in-memory plan with them. A brand-new account gets the seed plan.
async fn load_account_plan(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    session: Signal<Option<AuthSession>>,
    client: Option<SupabaseClient>,
) -> Option<()> {
    let Some(active) = session() else {
        return None;
    };
    let Some(client) = client else {
        return None;
    };

    match client.fetch_plan(&active).await {
        Ok(plan) => {
            let account_is_empty = plan.members.is_empty()
                && plan.tasks.is_empty()
                && plan.ingredients.is_empty()
                && plan.extra_costs.is_empty();

            if account_is_empty {
                let seed = PersistedState::seed();
                state.with_mut(|st| {
                    st.replace_plan(
                        seed.members.clone(),
                        seed.tasks.clone(),
                        seed.ingredients.clone(),
                        seed.extra_costs.clone(),
                    )
                });
                persist_snapshot(&state);
                if let Err(err) = RemoteWrite::ResetPlan(Box::new(seed))
                    .execute(&client, &active)
                    .await
                {
                    println!("[sync] seeding new account failed: {err}");
                    push_toast(
                        toasts,
                        ToastKind::Error,
                        format!("Could not seed the new account: {err}"),
                    );
                    return None;
                }
                push_toast(
                    toasts,
                    ToastKind::Info,
                    "Started a fresh plan for this account.",
                );
            } else {
                state.with_mut(|st| {
                    st.replace_plan(plan.members, plan.tasks, plan.ingredients, plan.extra_costs)
                });
                persist_snapshot(&state);
            }
            Some(())
        }
        Err(err) => {
            println!("[sync] failed to load account plan: {err}");
            push_toast(
                toasts,
                ToastKind::Error,
                format!("Failed to load account data: {err}"),
            );
            None
        }
    }
}

#[component]
pub fn Team() -> Element {
    rsx! { Shell { TeamPage {} } }
}

#[component]
pub fn Timeline() -> Element {
    rsx! { Shell { TimelinePage {} } }
}

#[component]
pub fn Calculator() -> Element {
    rsx! { Shell { CalculatorPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
