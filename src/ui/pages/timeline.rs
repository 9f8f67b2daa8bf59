use dioxus::prelude::*;

use crate::{
    app::persist_mutation,
    domain::{
        progress_percent, tasks_in_phase, AppState, Task, TaskStatus, PHASES,
    },
    infra::{
        supabase::{AuthSession, SupabaseClient},
        sync::RemoteWrite,
    },
    ui::components::{
        confirm::ConfirmDialog,
        toast::{push_toast, ToastKind, ToastMessage},
    },
    util::new_entity_id,
};

/// Form state for the task editor dialog. `id` is None while creating.
#[derive(Clone, Debug, PartialEq)]
struct TaskDraft {
    id: Option<String>,
    phase_id: String,
    title: String,
    description: String,
    assignee: String,
    status: TaskStatus,
}

impl TaskDraft {
    fn new_for_phase(phase_id: &str) -> Self {
        Self {
            id: None,
            phase_id: phase_id.to_string(),
            title: String::new(),
            description: String::new(),
            assignee: String::new(),
            status: TaskStatus::Todo,
        }
    }

    fn editing(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            phase_id: task.phase_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            assignee: task.assignee.clone().unwrap_or_default(),
            status: task.status,
        }
    }
}

#[component]
pub fn TimelinePage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let draft = use_signal(|| None::<TaskDraft>);
    let pending_delete = use_signal(|| None::<String>);

    let tasks = state.with(|st| st.tasks.clone());
    let percent = progress_percent(&tasks);

    // Editor identity: task id when editing, phase id when creating. Keying
    // on it remounts the dialog with fresh field state per task.
    let editor = draft();
    let editor_key = editor
        .as_ref()
        .map(|d| {
            d.id
                .clone()
                .unwrap_or_else(|| format!("new-{}", d.phase_id))
        })
        .unwrap_or_default();

    let on_confirm_delete = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let mut pending_delete = pending_delete.clone();
        move |_| {
            let Some(id) = pending_delete() else { return };
            pending_delete.set(None);
            state.with_mut(|st| st.tasks.retain(|t| t.id != id));
            persist_mutation(
                &state,
                &client,
                &session,
                toasts.clone(),
                Some(RemoteWrite::DeleteTask(id)),
            );
        }
    };

    rsx! {
        section { class: "card",
            div { class: "progress-head",
                h2 { class: "card-title", "Overall progress" }
                span { class: "progress-label", "{percent}%" }
            }
            div { class: "progress-track",
                div { class: "progress-fill", style: "width: {percent}%" }
            }
        }

        div { class: "phase-grid",
            for phase in PHASES {
                PhaseCard {
                    phase_id: phase.id,
                    title: phase.title,
                    dates: phase.dates,
                    icon: phase.icon,
                    draft: draft.clone(),
                    pending_delete: pending_delete.clone(),
                }
            }
        }

        if let Some(current) = editor {
            TaskEditor {
                key: "{editor_key}",
                draft_value: current.clone(),
                draft: draft.clone(),
            }
        }

        if pending_delete().is_some() {
            ConfirmDialog {
                title: "Delete task?",
                message: "This removes the task from the timeline for good.",
                on_confirm: on_confirm_delete,
                on_cancel: {
                    let mut pending_delete = pending_delete.clone();
                    move |_| pending_delete.set(None)
                },
            }
        }
    }
}

#[component]
fn PhaseCard(
    phase_id: &'static str,
    title: &'static str,
    dates: &'static str,
    icon: &'static str,
    draft: Signal<Option<TaskDraft>>,
    pending_delete: Signal<Option<String>>,
) -> Element {
    let state = use_context::<Signal<AppState>>();
    let tasks = state.with(|st| {
        tasks_in_phase(&st.tasks, phase_id)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>()
    });

    let mut draft_mut = draft;

    rsx! {
        section { class: "card phase-card",
            div { class: "phase-head",
                span { class: "phase-icon", "{icon}" }
                div {
                    h3 { class: "phase-title", "{title}" }
                    p { class: "phase-dates", "{dates}" }
                }
            }
            div { class: "task-list",
                for task in tasks {
                    TaskRowView {
                        key: "{task.id}",
                        task: task.clone(),
                        draft: draft.clone(),
                        pending_delete: pending_delete.clone(),
                    }
                }
            }
            button {
                class: "btn btn-ghost",
                onclick: move |_| draft_mut.set(Some(TaskDraft::new_for_phase(phase_id))),
                "+ New task"
            }
        }
    }
}

#[component]
fn TaskRowView(
    task: Task,
    draft: Signal<Option<TaskDraft>>,
    pending_delete: Signal<Option<String>>,
) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let mut state_mut = state;
    let mut draft_mut = draft;
    let mut pending_delete_mut = pending_delete;

    let row_class = match task.status {
        TaskStatus::Done => "task-item done",
        TaskStatus::Todo => "task-item",
    };
    let check_icon = match task.status {
        TaskStatus::Done => "✅",
        TaskStatus::Todo => "⭕",
    };

    let toggle_id = task.id.clone();
    let edit_task = task.clone();
    let delete_id = task.id.clone();

    rsx! {
        div { class: "{row_class}",
            button {
                class: "btn-icon",
                title: "Toggle status",
                onclick: move |_| {
                    let target = toggle_id.clone();
                    let mut updated = None;
                    state_mut.with_mut(|st| {
                        if let Some(found) = st.tasks.iter_mut().find(|t| t.id == target) {
                            found.status = found.status.toggled();
                            updated = Some(found.clone());
                        }
                    });
                    if let Some(task) = updated {
                        persist_mutation(
                            &state_mut,
                            &client,
                            &session,
                            toasts.clone(),
                            Some(RemoteWrite::UpdateTask(task)),
                        );
                    }
                },
                "{check_icon}"
            }
            span {
                class: "task-title",
                onclick: move |_| draft_mut.set(Some(TaskDraft::editing(&edit_task))),
                "{task.title}"
            }
            if let Some(assignee) = task.assignee.as_ref() {
                span { class: "chip chip-small", "{assignee}" }
            }
            button {
                class: "btn-icon",
                title: "Delete task",
                onclick: move |_| pending_delete_mut.set(Some(delete_id.clone())),
                "🗑️"
            }
        }
    }
}

#[component]
fn TaskEditor(draft_value: TaskDraft, draft: Signal<Option<TaskDraft>>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let members = state.with(|st| st.members.clone());
    let is_editing = draft_value.id.is_some();
    let heading = if is_editing { "Edit task" } else { "New task" };

    let mut title_input = use_signal(|| draft_value.title.clone());
    let mut description_input = use_signal(|| draft_value.description.clone());
    let mut assignee_input = use_signal(|| draft_value.assignee.clone());
    let mut status_input = use_signal(|| draft_value.status);

    let mut draft_mut = draft;

    let on_save = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let draft_value = draft_value.clone();
        move |_| {
            let title = title_input().trim().to_string();
            if title.is_empty() {
                push_toast(toasts.clone(), ToastKind::Warning, "A task needs a title.");
                return;
            }
            let assignee = {
                let raw = assignee_input().trim().to_string();
                if raw.is_empty() { None } else { Some(raw) }
            };

            let write = match draft_value.id.clone() {
                Some(id) => {
                    let mut updated = None;
                    state.with_mut(|st| {
                        if let Some(found) = st.tasks.iter_mut().find(|t| t.id == id) {
                            found.title = title.clone();
                            found.description = description_input().trim().to_string();
                            found.assignee = assignee.clone();
                            found.status = status_input();
                            updated = Some(found.clone());
                        }
                    });
                    updated.map(RemoteWrite::UpdateTask)
                }
                None => {
                    let task = Task {
                        id: new_entity_id(),
                        phase_id: draft_value.phase_id.clone(),
                        title: title.clone(),
                        description: description_input().trim().to_string(),
                        assignee: assignee.clone(),
                        status: TaskStatus::Todo,
                    };
                    state.with_mut(|st| st.tasks.push(task.clone()));
                    Some(RemoteWrite::InsertTask(task))
                }
            };

            persist_mutation(&state, &client, &session, toasts.clone(), write);
            draft_mut.set(None);
        }
    };

    rsx! {
        div { class: "dialog-backdrop",
            div { class: "dialog",
                h3 { class: "dialog-title", "{heading}" }
                label { class: "field-label", "Title" }
                input {
                    class: "input",
                    value: "{title_input}",
                    oninput: move |evt| title_input.set(evt.value()),
                }
                label { class: "field-label", "Description" }
                textarea {
                    class: "input",
                    value: "{description_input}",
                    oninput: move |evt| description_input.set(evt.value()),
                }
                label { class: "field-label", "Assignee" }
                select {
                    class: "select",
                    value: "{assignee_input}",
                    onchange: move |evt| assignee_input.set(evt.value()),
                    option { value: "", "Nobody" }
                    for member in members {
                        option { value: "{member.name}", "{member.name}" }
                    }
                }
                if is_editing {
                    label { class: "field-label", "Status" }
                    select {
                        class: "select",
                        value: "{status_input().as_str()}",
                        onchange: move |evt| status_input.set(TaskStatus::from_str(&evt.value())),
                        option { value: "todo", "To do" }
                        option { value: "done", "Done" }
                    }
                }
                div { class: "dialog-actions",
                    button {
                        class: "btn btn-ghost",
                        onclick: move |_| draft_mut.set(None),
                        "Cancel"
                    }
                    button { class: "btn btn-primary", onclick: on_save, "Save" }
                }
            }
        }
    }
}
