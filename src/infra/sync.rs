//! Deferred remote writes.
//!
//! Mutations update the in-memory snapshot first and render immediately; the
//! matching backend write is queued as a [`RemoteWrite`] and executed on its
//! own, so a network failure can never un-render a local edit.

use crate::domain::{ExtraCost, Ingredient, Member, PersistedState, Task};

use super::supabase::{AuthSession, SupabaseClient, SupabaseError};

/// One backend write, captured as data at the moment the local mutation
/// happened. Executed fire-and-forget by the app shell.
#[derive(Clone, Debug)]
pub enum RemoteWrite {
    InsertMember(Member),
    DeleteMember(String),
    InsertTask(Task),
    UpdateTask(Task),
    DeleteTask(String),
    InsertIngredient(Ingredient),
    UpdateIngredient(Ingredient),
    DeleteIngredient(String),
    InsertExtraCost(ExtraCost),
    UpdateExtraCost(ExtraCost),
    DeleteExtraCost(String),
    ResetPlan(Box<PersistedState>),
}

impl RemoteWrite {
    /// Short label for log lines and error toasts.
    pub fn describe(&self) -> &'static str {
        match self {
            RemoteWrite::InsertMember(_) => "add member",
            RemoteWrite::DeleteMember(_) => "remove member",
            RemoteWrite::InsertTask(_) => "add task",
            RemoteWrite::UpdateTask(_) => "update task",
            RemoteWrite::DeleteTask(_) => "delete task",
            RemoteWrite::InsertIngredient(_) => "add ingredient",
            RemoteWrite::UpdateIngredient(_) => "update ingredient",
            RemoteWrite::DeleteIngredient(_) => "delete ingredient",
            RemoteWrite::InsertExtraCost(_) => "add extra cost",
            RemoteWrite::UpdateExtraCost(_) => "update extra cost",
            RemoteWrite::DeleteExtraCost(_) => "delete extra cost",
            RemoteWrite::ResetPlan(_) => "reset plan",
        }
    }

    pub async fn execute(
        self,
        client: &SupabaseClient,
        session: &AuthSession,
    ) -> Result<(), SupabaseError> {
        match self {
            RemoteWrite::InsertMember(member) => client.insert_member(session, &member).await,
            RemoteWrite::DeleteMember(id) => client.delete_member(session, &id).await,
            RemoteWrite::InsertTask(task) => client.insert_task(session, &task).await,
            RemoteWrite::UpdateTask(task) => client.update_task(session, &task).await,
            RemoteWrite::DeleteTask(id) => client.delete_task(session, &id).await,
            RemoteWrite::InsertIngredient(item) => client.insert_ingredient(session, &item).await,
            RemoteWrite::UpdateIngredient(item) => client.update_ingredient(session, &item).await,
            RemoteWrite::DeleteIngredient(id) => client.delete_ingredient(session, &id).await,
            RemoteWrite::InsertExtraCost(item) => client.insert_extra_cost(session, &item).await,
            RemoteWrite::UpdateExtraCost(item) => client.update_extra_cost(session, &item).await,
            RemoteWrite::DeleteExtraCost(id) => client.delete_extra_cost(session, &id).await,
            RemoteWrite::ResetPlan(seed) => client.reset_plan(session, &seed).await,
        }
    }
}
