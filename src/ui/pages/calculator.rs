use dioxus::prelude::*;

use crate::{
    app::{persist_mutation, persist_snapshot},
    domain::{
        price_plan, profit_outlook, AppState, ExtraCost, FundingSource, Ingredient,
    },
    infra::{
        supabase::{AuthSession, SupabaseClient},
        sync::RemoteWrite,
    },
    ui::components::{
        confirm::ConfirmDialog,
        kpi_card::KpiCard,
        outlook_badge::OutlookBadge,
        toast::ToastMessage,
    },
    util::{
        new_entity_id,
        numeric::{parse_count, parse_decimal, parse_decimal_or},
    },
};

/// Which cost line a pending delete confirmation refers to.
#[derive(Clone, Debug, PartialEq)]
enum PendingDelete {
    Ingredient(String),
    ExtraCost(String),
}

#[component]
pub fn CalculatorPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let pending_delete = use_signal(|| None::<PendingDelete>);

    // One immutable snapshot per render; the calculator never sees the live
    // signal.
    let (ingredients, extra_costs, params) =
        state.with(|st| (st.ingredients.clone(), st.extra_costs.clone(), st.production.clone()));
    let breakdown = price_plan(&ingredients, &extra_costs, &params);
    let outlook = profit_outlook(&breakdown);

    let on_add_ingredient = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        move |_| {
            let item = Ingredient {
                id: new_entity_id(),
                name: "New ingredient".to_string(),
                price_per_kg: 0.0,
                grams: 0.0,
                source: FundingSource::Business,
            };
            state.with_mut(|st| st.ingredients.push(item.clone()));
            persist_mutation(
                &state,
                &client,
                &session,
                toasts.clone(),
                Some(RemoteWrite::InsertIngredient(item)),
            );
        }
    };

    let on_add_extra = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        move |_| {
            let item = ExtraCost {
                id: new_entity_id(),
                name: "New cost".to_string(),
                amount: 0.0,
                source: FundingSource::Business,
            };
            state.with_mut(|st| st.extra_costs.push(item.clone()));
            persist_mutation(
                &state,
                &client,
                &session,
                toasts.clone(),
                Some(RemoteWrite::InsertExtraCost(item)),
            );
        }
    };

    let on_confirm_delete = {
        let mut state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let mut pending_delete = pending_delete.clone();
        move |_| {
            let Some(pending) = pending_delete() else { return };
            pending_delete.set(None);
            let write = match pending {
                PendingDelete::Ingredient(id) => {
                    state.with_mut(|st| st.ingredients.retain(|item| item.id != id));
                    RemoteWrite::DeleteIngredient(id)
                }
                PendingDelete::ExtraCost(id) => {
                    state.with_mut(|st| st.extra_costs.retain(|item| item.id != id));
                    RemoteWrite::DeleteExtraCost(id)
                }
            };
            persist_mutation(&state, &client, &session, toasts.clone(), Some(write));
        }
    };

    rsx! {
        section { class: "card",
            h2 { class: "card-title", "Ingredients" }
            p { class: "card-sub", "Prices per kilogram; usage in grams." }
            div { class: "cost-rows",
                for item in ingredients.iter() {
                    IngredientRow {
                        key: "{item.id}",
                        item: item.clone(),
                        pending_delete: pending_delete.clone(),
                    }
                }
            }
            button { class: "btn btn-ghost", onclick: on_add_ingredient, "+ Add ingredient" }
        }

        section { class: "card",
            h2 { class: "card-title", "Extra costs" }
            p { class: "card-sub", "Packaging, gas, fees, anything without a weight." }
            div { class: "cost-rows",
                for item in extra_costs.iter() {
                    ExtraCostRow {
                        key: "{item.id}",
                        item: item.clone(),
                        pending_delete: pending_delete.clone(),
                    }
                }
            }
            button { class: "btn btn-ghost", onclick: on_add_extra, "+ Add cost" }
        }

        ParamsCard {}

        section { class: "card",
            h2 { class: "card-title", "Results" }
            div { class: "kpi-grid",
                KpiCard {
                    title: "Business costs",
                    value: format!("{:.2}", breakdown.cost_business),
                    description: Some("Advanced by the business".to_string()),
                }
                KpiCard {
                    title: "Out-of-pocket costs",
                    value: format!("{:.2}", breakdown.cost_self),
                    description: Some("Paid from home".to_string()),
                }
                KpiCard {
                    title: "Cost per unit",
                    value: format!("{:.2}", breakdown.unit_cost),
                    description: Some(format!("Total {:.2} over {} planned", breakdown.total_cost, params.target_quantity)),
                }
                KpiCard {
                    title: "Break-even price",
                    value: format!("{:.2}", breakdown.break_even_price),
                    description: Some("Recovers all costs at the current sales count".to_string()),
                }
                KpiCard {
                    title: "Final price",
                    value: format!("{:.2}", breakdown.final_price),
                    description: Some(format!("Unit cost + {:.0}% markup", params.margin_percent)),
                }
                KpiCard {
                    title: "Package price",
                    value: format!("{:.2}", breakdown.package_price),
                    description: Some(format!("{} units per package", params.units_per_package)),
                }
                KpiCard {
                    title: "Profit per unit",
                    value: format!("{:.2}", breakdown.profit_per_unit),
                    description: Some("Final price minus unit cost".to_string()),
                }
                KpiCard {
                    title: "Revenue",
                    value: format!("{:.2}", breakdown.total_revenue),
                    description: Some(format!("{} units sold", params.units_sold)),
                }
            }
            OutlookBadge { outlook }
        }

        if pending_delete().is_some() {
            ConfirmDialog {
                title: "Delete cost line?",
                message: "This removes the line and its cost from the plan.",
                on_confirm: on_confirm_delete,
                on_cancel: {
                    let mut pending_delete = pending_delete.clone();
                    move |_| pending_delete.set(None)
                },
            }
        }
    }
}

/// Production knobs. Device-local: they persist in the snapshot but are not
/// synced per account.
#[component]
fn ParamsCard() -> Element {
    let state = use_context::<Signal<AppState>>();
    let params = state.with(|st| st.production.clone());

    let mut quantity_input = use_signal(|| format_amount(params.target_quantity));
    let mut sold_input = use_signal(|| format_amount(params.units_sold));
    let mut package_input = use_signal(|| params.units_per_package.to_string());

    let mut state_q = state;
    let mut state_m = state;
    let mut state_p = state;
    let mut state_s = state;

    let margin_display = format!("{:.0}", params.margin_percent);

    rsx! {
        section { class: "card",
            h2 { class: "card-title", "Production & pricing" }
            div { class: "param-grid",
                div {
                    label { class: "field-label", "Planned quantity" }
                    input {
                        class: "input",
                        inputmode: "decimal",
                        value: "{quantity_input}",
                        oninput: move |evt| {
                            quantity_input.set(evt.value());
                            // An empty or broken field falls back to 1 so the
                            // unit cost keeps a denominator.
                            let parsed = parse_decimal_or(&evt.value(), 1.0);
                            state_q.with_mut(|st| st.production.target_quantity = parsed);
                            persist_snapshot(&state_q);
                        },
                    }
                }
                div {
                    label { class: "field-label", "Margin: {margin_display}%" }
                    input {
                        class: "slider",
                        r#type: "range",
                        min: "0",
                        max: "200",
                        value: "{params.margin_percent}",
                        oninput: move |evt| {
                            let parsed = parse_decimal(&evt.value());
                            state_m.with_mut(|st| st.production.margin_percent = parsed);
                            persist_snapshot(&state_m);
                        },
                    }
                }
                div {
                    label { class: "field-label", "Units per package" }
                    input {
                        class: "input",
                        inputmode: "numeric",
                        value: "{package_input}",
                        oninput: move |evt| {
                            package_input.set(evt.value());
                            let parsed = parse_count(&evt.value());
                            state_p.with_mut(|st| st.production.units_per_package = parsed);
                            persist_snapshot(&state_p);
                        },
                    }
                }
                div {
                    label { class: "field-label", "Units sold" }
                    input {
                        class: "input",
                        inputmode: "decimal",
                        value: "{sold_input}",
                        oninput: move |evt| {
                            sold_input.set(evt.value());
                            let parsed = parse_decimal(&evt.value());
                            state_s.with_mut(|st| st.production.units_sold = parsed);
                            persist_snapshot(&state_s);
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn IngredientRow(item: Ingredient, pending_delete: Signal<Option<PendingDelete>>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    // Raw field text stays local so mid-edit values like "3," survive the
    // re-render; only the parsed number reaches the snapshot.
    let mut name_input = use_signal(|| item.name.clone());
    let mut price_input = use_signal(|| format_amount(item.price_per_kg));
    let mut grams_input = use_signal(|| format_amount(item.grams));

    let mut pending_delete_mut = pending_delete;
    let id = item.id.clone();

    let apply = {
        let state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let id = id.clone();
        move |update: &dyn Fn(&mut Ingredient)| {
            let mut state = state;
            let mut changed = None;
            state.with_mut(|st| {
                if let Some(found) = st.ingredients.iter_mut().find(|i| i.id == id) {
                    update(found);
                    changed = Some(found.clone());
                }
            });
            if let Some(item) = changed {
                persist_mutation(
                    &state,
                    &client,
                    &session,
                    toasts.clone(),
                    Some(RemoteWrite::UpdateIngredient(item)),
                );
            }
        }
    };

    let apply_name = apply.clone();
    let apply_price = apply.clone();
    let apply_grams = apply.clone();
    let apply_source = apply;

    rsx! {
        div { class: "input-row cost-row",
            input {
                class: "input",
                placeholder: "Ingredient",
                value: "{name_input}",
                oninput: move |evt| {
                    name_input.set(evt.value());
                    let value = evt.value();
                    apply_name(&|item: &mut Ingredient| item.name = value.trim().to_string());
                },
            }
            input {
                class: "input input-amount",
                inputmode: "decimal",
                placeholder: "Price/kg",
                value: "{price_input}",
                oninput: move |evt| {
                    price_input.set(evt.value());
                    let parsed = parse_decimal(&evt.value());
                    apply_price(&move |item: &mut Ingredient| item.price_per_kg = parsed);
                },
            }
            input {
                class: "input input-amount",
                inputmode: "decimal",
                placeholder: "Grams",
                value: "{grams_input}",
                oninput: move |evt| {
                    grams_input.set(evt.value());
                    let parsed = parse_decimal(&evt.value());
                    apply_grams(&move |item: &mut Ingredient| item.grams = parsed);
                },
            }
            SourceSelect {
                value: item.source,
                onchange: move |source| {
                    apply_source(&move |item: &mut Ingredient| item.source = source);
                },
            }
            button {
                class: "btn-icon",
                title: "Delete ingredient",
                onclick: move |_| pending_delete_mut.set(Some(PendingDelete::Ingredient(id.clone()))),
                "🗑️"
            }
        }
    }
}

#[component]
fn ExtraCostRow(item: ExtraCost, pending_delete: Signal<Option<PendingDelete>>) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let session = use_context::<Signal<Option<AuthSession>>>();
    let client = use_context::<Option<SupabaseClient>>();

    let mut name_input = use_signal(|| item.name.clone());
    let mut amount_input = use_signal(|| format_amount(item.amount));

    let mut pending_delete_mut = pending_delete;
    let id = item.id.clone();

    let apply = {
        let state = state.clone();
        let toasts = toasts.clone();
        let session = session.clone();
        let client = client.clone();
        let id = id.clone();
        move |update: &dyn Fn(&mut ExtraCost)| {
            let mut state = state;
            let mut changed = None;
            state.with_mut(|st| {
                if let Some(found) = st.extra_costs.iter_mut().find(|e| e.id == id) {
                    update(found);
                    changed = Some(found.clone());
                }
            });
            if let Some(item) = changed {
                persist_mutation(
                    &state,
                    &client,
                    &session,
                    toasts.clone(),
                    Some(RemoteWrite::UpdateExtraCost(item)),
                );
            }
        }
    };

    let apply_name = apply.clone();
    let apply_amount = apply.clone();
    let apply_source = apply;

    rsx! {
        div { class: "input-row cost-row",
            input {
                class: "input",
                placeholder: "Cost",
                value: "{name_input}",
                oninput: move |evt| {
                    name_input.set(evt.value());
                    let value = evt.value();
                    apply_name(&|item: &mut ExtraCost| item.name = value.trim().to_string());
                },
            }
            input {
                class: "input input-amount",
                inputmode: "decimal",
                placeholder: "Total cost",
                value: "{amount_input}",
                oninput: move |evt| {
                    amount_input.set(evt.value());
                    let parsed = parse_decimal(&evt.value());
                    apply_amount(&move |item: &mut ExtraCost| item.amount = parsed);
                },
            }
            SourceSelect {
                value: item.source,
                onchange: move |source| {
                    apply_source(&move |item: &mut ExtraCost| item.source = source);
                },
            }
            button {
                class: "btn-icon",
                title: "Delete cost",
                onclick: move |_| pending_delete_mut.set(Some(PendingDelete::ExtraCost(id.clone()))),
                "🗑️"
            }
        }
    }
}

#[component]
fn SourceSelect(value: FundingSource, onchange: EventHandler<FundingSource>) -> Element {
    rsx! {
        select {
            class: "select",
            value: "{value.as_str()}",
            onchange: move |evt| onchange.call(FundingSource::from_str(&evt.value())),
            option { value: "business", {FundingSource::Business.label()} }
            option { value: "self", {FundingSource::SelfFunded.label()} }
        }
    }
}

/// Trim trailing noise so `5` renders as "5", not "5.0".
fn format_amount(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
