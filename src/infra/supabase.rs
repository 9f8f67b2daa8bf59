#![allow(dead_code)]

//! Thin asynchronous client for the hosted Supabase backend.
//!
//! - GoTrue password auth (sign in / sign up) yielding a bearer session.
//! - Typed CRUD over the four plan tables, keyed by the signed-in user.
//!
//! Calls are independent and non-transactional; a failed write is reported
//! to the caller and otherwise dropped.

use std::env;

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::domain::{
    ExtraCost, FundingSource, Ingredient, Member, PersistedState, Task, TaskStatus,
};
use crate::util::version::{APP_NAME, APP_VERSION};

pub const URL_ENV: &str = "BAKEPLAN_SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "BAKEPLAN_SUPABASE_ANON_KEY";

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("missing environment variable {0}")]
    MissingConfig(&'static str),
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

/// An authenticated user. Present iff the remote persistence path is active.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthSession {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
}

pub enum SignUpOutcome {
    SignedIn(AuthSession),
    /// Account created but the backend wants an email confirmation first.
    ConfirmationRequired,
}

/// All plan rows belonging to one account.
#[derive(Clone, Debug, Default)]
pub struct RemotePlan {
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
    pub ingredients: Vec<Ingredient>,
    pub extra_costs: Vec<ExtraCost>,
}

#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client from the environment. A missing variable is an error
    /// here so the UI can report "remote sync unavailable" exactly once and
    /// fall back to the local snapshot.
    pub fn new() -> Result<Self, SupabaseError> {
        let base = env::var(URL_ENV).map_err(|_| SupabaseError::MissingConfig(URL_ENV))?;
        let anon_key =
            env::var(ANON_KEY_ENV).map_err(|_| SupabaseError::MissingConfig(ANON_KEY_ENV))?;
        Self::with_config(&base, &anon_key)
    }

    pub fn with_config(base: &str, anon_key: &str) -> Result<Self, SupabaseError> {
        // Url::join drops the last path segment without a trailing slash.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base_url = Url::parse(&normalized)?;
        let http = Client::builder()
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()?;
        Ok(Self {
            http,
            base_url,
            anon_key: anon_key.to_string(),
        })
    }

    // ----- auth -----

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, SupabaseError> {
        let mut url = self.base_url.join("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response: TokenResponse = self
            .send_json(
                self.http
                    .post(url)
                    .header("apikey", &self.anon_key)
                    .json(&Credentials { email, password }),
            )
            .await?;

        Ok(AuthSession {
            access_token: response.access_token,
            user_id: response.user.id,
            email: response.user.email.unwrap_or_else(|| email.to_string()),
        })
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, SupabaseError> {
        let url = self.base_url.join("auth/v1/signup")?;

        let response: SignUpResponse = self
            .send_json(
                self.http
                    .post(url)
                    .header("apikey", &self.anon_key)
                    .json(&Credentials { email, password }),
            )
            .await?;

        match (response.access_token, response.user) {
            (Some(access_token), Some(user)) => Ok(SignUpOutcome::SignedIn(AuthSession {
                access_token,
                user_id: user.id,
                email: user.email.unwrap_or_else(|| email.to_string()),
            })),
            _ => Ok(SignUpOutcome::ConfirmationRequired),
        }
    }

    // ----- plan data -----

    /// Fetch every table for the signed-in user. Rows come back in creation
    /// order so lists render the way they were built up.
    pub async fn fetch_plan(&self, session: &AuthSession) -> Result<RemotePlan, SupabaseError> {
        let members = self.fetch_rows::<MemberRow>(session, "members").await?;
        let tasks = self.fetch_rows::<TaskRow>(session, "tasks").await?;
        let ingredients = self.fetch_rows::<IngredientRow>(session, "ingredients").await?;
        let extra_costs = self.fetch_rows::<ExtraCostRow>(session, "extra_costs").await?;

        Ok(RemotePlan {
            members: members.into_iter().map(Member::from).collect(),
            tasks: tasks.into_iter().map(Task::from).collect(),
            ingredients: ingredients.into_iter().map(Ingredient::from).collect(),
            extra_costs: extra_costs.into_iter().map(ExtraCost::from).collect(),
        })
    }

    /// Replace the account's plan with the seed defaults. Four deletes, then
    /// the inserts; each call independent, first failure wins.
    pub async fn reset_plan(
        &self,
        session: &AuthSession,
        seed: &PersistedState,
    ) -> Result<(), SupabaseError> {
        for table in ["members", "tasks", "ingredients", "extra_costs"] {
            self.delete_all(session, table).await?;
        }
        for member in &seed.members {
            self.insert_member(session, member).await?;
        }
        for task in &seed.tasks {
            self.insert_task(session, task).await?;
        }
        for item in &seed.ingredients {
            self.insert_ingredient(session, item).await?;
        }
        for item in &seed.extra_costs {
            self.insert_extra_cost(session, item).await?;
        }
        Ok(())
    }

    pub async fn insert_member(
        &self,
        session: &AuthSession,
        member: &Member,
    ) -> Result<(), SupabaseError> {
        self.insert_row(
            session,
            "members",
            &NewMemberRow {
                id: &member.id,
                user_id: &session.user_id,
                name: &member.name,
            },
        )
        .await
    }

    pub async fn delete_member(&self, session: &AuthSession, id: &str) -> Result<(), SupabaseError> {
        self.delete_row(session, "members", id).await
    }

    pub async fn insert_task(&self, session: &AuthSession, task: &Task) -> Result<(), SupabaseError> {
        self.insert_row(
            session,
            "tasks",
            &NewTaskRow {
                id: &task.id,
                user_id: &session.user_id,
                phase_id: &task.phase_id,
                title: &task.title,
                description: &task.description,
                assignee: task.assignee.as_deref(),
                status: task.status.as_str(),
            },
        )
        .await
    }

    pub async fn update_task(&self, session: &AuthSession, task: &Task) -> Result<(), SupabaseError> {
        self.update_row(
            session,
            "tasks",
            &task.id,
            &TaskChanges {
                title: &task.title,
                description: &task.description,
                assignee: task.assignee.as_deref(),
                status: task.status.as_str(),
            },
        )
        .await
    }

    pub async fn delete_task(&self, session: &AuthSession, id: &str) -> Result<(), SupabaseError> {
        self.delete_row(session, "tasks", id).await
    }

    pub async fn insert_ingredient(
        &self,
        session: &AuthSession,
        item: &Ingredient,
    ) -> Result<(), SupabaseError> {
        self.insert_row(
            session,
            "ingredients",
            &NewIngredientRow {
                id: &item.id,
                user_id: &session.user_id,
                name: &item.name,
                price: item.price_per_kg,
                grams: item.grams,
                source: item.source.as_str(),
            },
        )
        .await
    }

    pub async fn update_ingredient(
        &self,
        session: &AuthSession,
        item: &Ingredient,
    ) -> Result<(), SupabaseError> {
        self.update_row(
            session,
            "ingredients",
            &item.id,
            &IngredientChanges {
                name: &item.name,
                price: item.price_per_kg,
                grams: item.grams,
                source: item.source.as_str(),
            },
        )
        .await
    }

    pub async fn delete_ingredient(
        &self,
        session: &AuthSession,
        id: &str,
    ) -> Result<(), SupabaseError> {
        self.delete_row(session, "ingredients", id).await
    }

    pub async fn insert_extra_cost(
        &self,
        session: &AuthSession,
        item: &ExtraCost,
    ) -> Result<(), SupabaseError> {
        self.insert_row(
            session,
            "extra_costs",
            &NewExtraCostRow {
                id: &item.id,
                user_id: &session.user_id,
                name: &item.name,
                cost: item.amount,
                source: item.source.as_str(),
            },
        )
        .await
    }

    pub async fn update_extra_cost(
        &self,
        session: &AuthSession,
        item: &ExtraCost,
    ) -> Result<(), SupabaseError> {
        self.update_row(
            session,
            "extra_costs",
            &item.id,
            &ExtraCostChanges {
                name: &item.name,
                cost: item.amount,
                source: item.source.as_str(),
            },
        )
        .await
    }

    pub async fn delete_extra_cost(
        &self,
        session: &AuthSession,
        id: &str,
    ) -> Result<(), SupabaseError> {
        self.delete_row(session, "extra_costs", id).await
    }

    // ----- request plumbing -----

    async fn fetch_rows<T>(&self, session: &AuthSession, table: &str) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned + CreatedAt,
    {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("user_id", &format!("eq.{}", session.user_id));

        let mut rows: Vec<T> = self
            .send_json(self.authed(self.http.get(url), session))
            .await?;
        // The backend does not guarantee an order without an explicit clause;
        // creation time is the one the lists were built in.
        rows.sort_by_key(|row| row.created_at());
        Ok(rows)
    }

    async fn insert_row<B: Serialize>(
        &self,
        session: &AuthSession,
        table: &str,
        body: &B,
    ) -> Result<(), SupabaseError> {
        let url = self.table_url(table)?;
        self.expect_success(self.authed(self.http.post(url), session).json(body))
            .await
    }

    async fn update_row<B: Serialize>(
        &self,
        session: &AuthSession,
        table: &str,
        id: &str,
        body: &B,
    ) -> Result<(), SupabaseError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        self.expect_success(self.authed(self.http.patch(url), session).json(body))
            .await
    }

    async fn delete_row(
        &self,
        session: &AuthSession,
        table: &str,
        id: &str,
    ) -> Result<(), SupabaseError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        self.expect_success(self.authed(self.http.delete(url), session))
            .await
    }

    async fn delete_all(&self, session: &AuthSession, table: &str) -> Result<(), SupabaseError> {
        let mut url = self.table_url(table)?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", session.user_id));
        self.expect_success(self.authed(self.http.delete(url), session))
            .await
    }

    fn table_url(&self, table: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("rest/v1/{table}"))
    }

    fn authed(
        &self,
        builder: reqwest::RequestBuilder,
        session: &AuthSession,
    ) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
    }

    async fn send_json<T>(&self, builder: reqwest::RequestBuilder) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseError::Api(Self::error_message(status, response).await));
        }
        Ok(response.json().await?)
    }

    async fn expect_success(&self, builder: reqwest::RequestBuilder) -> Result<(), SupabaseError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SupabaseError::Api(Self::error_message(status, response).await));
        }
        Ok(())
    }

    async fn error_message(status: reqwest::StatusCode, response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or(body);
        if detail.is_empty() {
            status.to_string()
        } else {
            format!("{status}: {detail}")
        }
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUserDto,
}

#[derive(Deserialize)]
struct SignUpResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    user: Option<AuthUserDto>,
}

#[derive(Deserialize)]
struct AuthUserDto {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// GoTrue and PostgREST disagree on the error field name; take whichever is
/// present.
#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.message).or(self.msg)
    }
}

// ----- table rows -----

trait CreatedAt {
    fn created_at(&self) -> Option<OffsetDateTime>;
}

fn parse_timestamp(value: &Option<String>) -> Option<OffsetDateTime> {
    value
        .as_deref()
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
}

#[derive(Debug, Deserialize)]
struct MemberRow {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    name: String,
    #[serde(default)]
    created_at: Option<String>,
}

impl CreatedAt for MemberRow {
    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Serialize)]
struct NewMemberRow<'a> {
    id: &'a str,
    user_id: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct TaskRow {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    phase_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl CreatedAt for TaskRow {
    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Self {
            id: row.id,
            phase_id: row.phase_id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            assignee: row.assignee.filter(|name| !name.is_empty()),
            status: row
                .status
                .as_deref()
                .map(TaskStatus::from_str)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct NewTaskRow<'a> {
    id: &'a str,
    user_id: &'a str,
    phase_id: &'a str,
    title: &'a str,
    description: &'a str,
    assignee: Option<&'a str>,
    status: &'a str,
}

#[derive(Serialize)]
struct TaskChanges<'a> {
    title: &'a str,
    description: &'a str,
    assignee: Option<&'a str>,
    status: &'a str,
}

#[derive(Debug, Deserialize)]
struct IngredientRow {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    name: String,
    #[serde(default)]
    price: f64,
    #[serde(default)]
    grams: f64,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl CreatedAt for IngredientRow {
    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price_per_kg: row.price,
            grams: row.grams,
            source: row
                .source
                .as_deref()
                .map(FundingSource::from_str)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct NewIngredientRow<'a> {
    id: &'a str,
    user_id: &'a str,
    name: &'a str,
    price: f64,
    grams: f64,
    source: &'a str,
}

#[derive(Serialize)]
struct IngredientChanges<'a> {
    name: &'a str,
    price: f64,
    grams: f64,
    source: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExtraCostRow {
    #[serde(deserialize_with = "string_from_json")]
    id: String,
    name: String,
    #[serde(default)]
    cost: f64,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

impl CreatedAt for ExtraCostRow {
    fn created_at(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.created_at)
    }
}

impl From<ExtraCostRow> for ExtraCost {
    fn from(row: ExtraCostRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            amount: row.cost,
            source: row
                .source
                .as_deref()
                .map(FundingSource::from_str)
                .unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct NewExtraCostRow<'a> {
    id: &'a str,
    user_id: &'a str,
    name: &'a str,
    cost: f64,
    source: &'a str,
}

#[derive(Serialize)]
struct ExtraCostChanges<'a> {
    name: &'a str,
    cost: f64,
    source: &'a str,
}

/// Row ids may arrive as numbers (legacy serial columns) or strings (uuid);
/// normalize both to the string form the rest of the app uses.
fn string_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported id type: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_is_a_constructor_error() {
        std::env::remove_var(URL_ENV);
        std::env::remove_var(ANON_KEY_ENV);
        assert!(matches!(
            SupabaseClient::new(),
            Err(SupabaseError::MissingConfig(_))
        ));
    }

    #[test]
    fn base_url_joins_with_or_without_trailing_slash() {
        let client = SupabaseClient::with_config("https://example.supabase.co", "anon").unwrap();
        assert_eq!(
            client.table_url("members").unwrap().as_str(),
            "https://example.supabase.co/rest/v1/members"
        );

        let client = SupabaseClient::with_config("https://example.supabase.co/", "anon").unwrap();
        assert_eq!(
            client.table_url("tasks").unwrap().as_str(),
            "https://example.supabase.co/rest/v1/tasks"
        );
    }

    #[test]
    fn task_rows_decode_and_default_missing_fields() {
        let json = r#"[
            {"id": 7, "user_id": "u1", "phase_id": "p2", "title": "Buy ingredients",
             "assignee": "", "status": "todo", "created_at": "2024-11-25T10:00:00Z"},
            {"id": "b7f1", "user_id": "u1", "phase_id": "p3", "title": "Bake", "status": "done"}
        ]"#;
        let rows: Vec<TaskRow> = serde_json::from_str(json).expect("decode");
        let tasks: Vec<Task> = rows.into_iter().map(Task::from).collect();

        assert_eq!(tasks[0].id, "7");
        assert_eq!(tasks[0].assignee, None);
        assert_eq!(tasks[0].status, TaskStatus::Todo);
        assert_eq!(tasks[1].id, "b7f1");
        assert_eq!(tasks[1].status, TaskStatus::Done);
        assert_eq!(tasks[1].description, "");
    }

    #[test]
    fn ingredient_rows_map_source_strings() {
        let json = r#"{"id": "a", "name": "Sugar", "price": 4.5, "grams": 100, "source": "self",
                       "created_at": "2024-11-20T08:30:00+00:00"}"#;
        let row: IngredientRow = serde_json::from_str(json).expect("decode");
        assert!(row.created_at().is_some());

        let ingredient = Ingredient::from(row);
        assert_eq!(ingredient.source, FundingSource::SelfFunded);
        assert_eq!(ingredient.price_per_kg, 4.5);
    }

    #[test]
    fn error_bodies_yield_whichever_field_is_present() {
        let gotrue: ApiErrorBody =
            serde_json::from_str(r#"{"error_description": "Invalid login credentials"}"#).unwrap();
        assert_eq!(
            gotrue.into_message().as_deref(),
            Some("Invalid login credentials")
        );

        let postgrest: ApiErrorBody =
            serde_json::from_str(r#"{"message": "permission denied for table tasks"}"#).unwrap();
        assert_eq!(
            postgrest.into_message().as_deref(),
            Some("permission denied for table tasks")
        );
    }
}
