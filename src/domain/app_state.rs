#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use super::entities::{ExtraCost, FundingSource, Ingredient, Member, ProductionParams, Task, TaskStatus};
use crate::util::new_entity_id;

/// UI color scheme. Stored with the rest of the snapshot so the choice
/// survives restarts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn body_class(&self) -> &'static str {
        match self {
            Theme::Light => "shell",
            Theme::Dark => "shell dark",
        }
    }

    pub fn toggle_icon(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

/// In-memory working set for the whole app. Owned by the root component as a
/// single signal; the calculator and other domain functions only ever see
/// borrowed snapshots of it.
#[derive(Clone, Debug)]
pub struct AppState {
    pub members: Vec<Member>,
    pub tasks: Vec<Task>,
    pub ingredients: Vec<Ingredient>,
    pub extra_costs: Vec<ExtraCost>,
    pub production: ProductionParams,
    pub theme: Theme,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            members: Vec::new(),
            tasks: Vec::new(),
            ingredients: Vec::new(),
            extra_costs: Vec::new(),
            production: ProductionParams::default(),
            theme: Theme::default(),
        };
        state.apply_persisted(PersistedState::seed());
        state
    }
}

impl AppState {
    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.theme = persisted.theme;
        self.members = persisted.members;
        self.tasks = persisted.tasks;
        self.ingredients = persisted.ingredients;
        self.extra_costs = persisted.extra_costs;
        self.production = persisted.production;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            theme: self.theme,
            members: self.members.clone(),
            tasks: self.tasks.clone(),
            ingredients: self.ingredients.clone(),
            extra_costs: self.extra_costs.clone(),
            production: self.production.clone(),
        }
    }

    /// Replace all plan data with the given collections, keeping the theme.
    /// Used when a signed-in account's rows arrive from the backend.
    pub fn replace_plan(
        &mut self,
        members: Vec<Member>,
        tasks: Vec<Task>,
        ingredients: Vec<Ingredient>,
        extra_costs: Vec<ExtraCost>,
    ) {
        self.members = members;
        self.tasks = tasks;
        self.ingredients = ingredients;
        self.extra_costs = extra_costs;
    }
}

/// The on-disk (or per-account) snapshot of everything worth keeping.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub extra_costs: Vec<ExtraCost>,
    #[serde(default)]
    pub production: ProductionParams,
}

impl PersistedState {
    /// Starter plan for a fresh install or after a reset: six tasks across
    /// the four phases and the usual cookie-dough shopping list.
    pub fn seed() -> Self {
        let task = |phase_id: &str, title: &str, assignee: Option<&str>, status: TaskStatus| Task {
            id: new_entity_id(),
            phase_id: phase_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            assignee: assignee.map(str::to_string),
            status,
        };
        let ingredient = |name: &str, price_per_kg: f64, grams: f64| Ingredient {
            id: new_entity_id(),
            name: name.to_string(),
            price_per_kg,
            grams,
            source: FundingSource::Business,
        };
        let extra = |name: &str, amount: f64, source: FundingSource| ExtraCost {
            id: new_entity_id(),
            name: name.to_string(),
            amount,
            source,
        };

        Self {
            theme: Theme::default(),
            members: Vec::new(),
            tasks: vec![
                task("p1", "Pick the duo & persona", Some("Everyone"), TaskStatus::Done),
                task("p1", "Design a name and logo", None, TaskStatus::Todo),
                task("p2", "Buy ingredients", None, TaskStatus::Todo),
                task("p2", "Publish the order page", None, TaskStatus::Todo),
                task("p3", "Bake the first batch", None, TaskStatus::Todo),
                task("p3", "Package the products", None, TaskStatus::Todo),
            ],
            ingredients: vec![
                ingredient("Wheat flour", 5.00, 300.0),
                ingredient("Sugar", 4.50, 100.0),
                ingredient("Butter", 60.00, 200.0),
            ],
            extra_costs: vec![
                extra("Extra ingredients", 0.0, FundingSource::Business),
                extra("Packaging", 0.0, FundingSource::Business),
                extra("Gas / electricity", 5.00, FundingSource::SelfFunded),
            ],
            production: ProductionParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::domain::schedule::phase_by_id;

    #[test]
    fn seed_tasks_reference_real_phases() {
        let seed = PersistedState::seed();
        assert_eq!(seed.tasks.len(), 6);
        assert!(seed
            .tasks
            .iter()
            .all(|task| phase_by_id(&task.phase_id).is_some()));
    }

    #[test]
    fn seed_ids_are_unique() {
        let seed = PersistedState::seed();
        let mut ids = HashSet::new();
        for id in seed
            .tasks
            .iter()
            .map(|t| &t.id)
            .chain(seed.ingredients.iter().map(|i| &i.id))
            .chain(seed.extra_costs.iter().map(|e| &e.id))
        {
            assert!(ids.insert(id.clone()), "duplicate seed id {id}");
        }
    }

    #[test]
    fn snapshot_roundtrips_through_persisted_form() {
        let mut state = AppState::default();
        state.theme = Theme::Dark;
        state.production.margin_percent = 42.5;

        let mut restored = AppState::default();
        restored.apply_persisted(state.to_persisted());

        assert_eq!(restored.theme, Theme::Dark);
        assert_eq!(restored.production, state.production);
        assert_eq!(restored.tasks, state.tasks);
        assert_eq!(restored.ingredients, state.ingredients);
    }

    #[test]
    fn persisted_json_roundtrip() {
        let seed = PersistedState::seed();
        let json = serde_json::to_string(&seed).expect("serialize");
        let back: PersistedState = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.tasks, seed.tasks);
        assert_eq!(back.extra_costs, seed.extra_costs);
    }
}
