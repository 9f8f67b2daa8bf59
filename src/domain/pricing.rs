//! Pricing math for the bake sale.
//!
//! Everything here is a pure function over a snapshot of the cost lines and
//! production parameters; pages recompute on every input event. Division by
//! zero and other non-finite intermediates collapse to `0.0` so the UI never
//! has to render a NaN mid-edit.

use super::entities::{ExtraCost, FundingSource, Ingredient, ProductionParams};

/// Full pricing breakdown, recomputed from scratch on every call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PricingBreakdown {
    /// Subtotal of costs the business advanced.
    pub cost_business: f64,
    /// Subtotal of costs paid out of pocket.
    pub cost_self: f64,
    pub total_cost: f64,
    /// Total cost spread over the units *planned*.
    pub unit_cost: f64,
    /// Price per unit that recovers total cost over the units *sold*.
    pub break_even_price: f64,
    /// Unit cost plus the configured markup.
    pub final_price: f64,
    pub package_price: f64,
    pub profit_per_unit: f64,
    pub total_revenue: f64,
    pub net_profit: f64,
}

/// Compute the pricing breakdown for one snapshot of the plan.
pub fn price_plan(
    ingredients: &[Ingredient],
    extra_costs: &[ExtraCost],
    params: &ProductionParams,
) -> PricingBreakdown {
    let mut cost_business = 0.0;
    let mut cost_self = 0.0;

    for item in ingredients {
        // Price is per kilogram, usage in grams.
        let cost = finite_or_zero((item.price_per_kg / 1000.0) * item.grams);
        match item.source {
            FundingSource::Business => cost_business += cost,
            FundingSource::SelfFunded => cost_self += cost,
        }
    }

    for item in extra_costs {
        let cost = finite_or_zero(item.amount);
        match item.source {
            FundingSource::Business => cost_business += cost,
            FundingSource::SelfFunded => cost_self += cost,
        }
    }

    let total_cost = cost_business + cost_self;

    let unit_cost = finite_or_zero(total_cost / params.target_quantity);

    let break_even_price = if params.units_sold > 0.0 {
        finite_or_zero(total_cost / params.units_sold)
    } else {
        0.0
    };

    let final_price = finite_or_zero(unit_cost * (1.0 + params.margin_percent / 100.0));
    let profit_per_unit = final_price - unit_cost;
    let total_revenue = finite_or_zero(final_price * params.units_sold);
    let net_profit = total_revenue - total_cost;
    let package_price = finite_or_zero(final_price * params.units_per_package as f64);

    PricingBreakdown {
        cost_business,
        cost_self,
        total_cost,
        unit_cost,
        break_even_price,
        final_price,
        package_price,
        profit_per_unit,
        total_revenue,
        net_profit,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitOutlook {
    pub status: OutlookStatus,
    pub net_profit: f64,
    pub rationale: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutlookStatus {
    Profit,
    BreakEven,
    Loss,
}

/// Classify a breakdown for the result badge. Anything within half a cent of
/// zero counts as break-even so float dust does not flip the badge.
pub fn profit_outlook(breakdown: &PricingBreakdown) -> ProfitOutlook {
    const TOLERANCE: f64 = 0.005;

    let status = if breakdown.net_profit > TOLERANCE {
        OutlookStatus::Profit
    } else if breakdown.net_profit < -TOLERANCE {
        OutlookStatus::Loss
    } else {
        OutlookStatus::BreakEven
    };

    let rationale = format!(
        "revenue {:.2} against costs {:.2}",
        breakdown.total_revenue, breakdown.total_cost
    );

    ProfitOutlook {
        status,
        net_profit: breakdown.net_profit,
        rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(price_per_kg: f64, grams: f64, source: FundingSource) -> Ingredient {
        Ingredient {
            id: "i".to_string(),
            name: "test".to_string(),
            price_per_kg,
            grams,
            source,
        }
    }

    fn extra(amount: f64, source: FundingSource) -> ExtraCost {
        ExtraCost {
            id: "e".to_string(),
            name: "test".to_string(),
            amount,
            source,
        }
    }

    fn params(target: f64, margin: f64, per_package: u32, sold: f64) -> ProductionParams {
        ProductionParams {
            target_quantity: target,
            margin_percent: margin,
            units_per_package: per_package,
            units_sold: sold,
        }
    }

    #[test]
    fn single_business_ingredient_sets_unit_cost() {
        let items = [ingredient(5.00, 300.0, FundingSource::Business)];
        let result = price_plan(&items, &[], &params(1.0, 0.0, 1, 0.0));

        assert_eq!(result.cost_business, 1.50);
        assert_eq!(result.cost_self, 0.0);
        assert_eq!(result.unit_cost, 1.50);
    }

    #[test]
    fn extra_costs_alone_split_across_planned_units() {
        let extras = [extra(5.00, FundingSource::SelfFunded)];
        let result = price_plan(&[], &extras, &params(2.0, 0.0, 1, 0.0));

        assert_eq!(result.total_cost, 5.00);
        assert_eq!(result.cost_self, 5.00);
        assert_eq!(result.unit_cost, 2.50);
    }

    #[test]
    fn margin_marks_up_unit_cost_additively() {
        // 100 of cost over 10 planned units, 20% markup.
        let extras = [extra(100.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(10.0, 20.0, 1, 0.0));

        assert_eq!(result.unit_cost, 10.0);
        assert_eq!(result.final_price, 12.0);
        assert_eq!(result.profit_per_unit, 2.0);
    }

    #[test]
    fn nothing_sold_means_no_revenue_and_full_loss() {
        let extras = [extra(100.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(10.0, 20.0, 1, 0.0));

        assert_eq!(result.break_even_price, 0.0);
        assert_eq!(result.total_revenue, 0.0);
        assert_eq!(result.net_profit, -100.0);
    }

    #[test]
    fn zero_target_quantity_collapses_instead_of_propagating() {
        let extras = [extra(100.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(0.0, 20.0, 4, 3.0));

        assert_eq!(result.unit_cost, 0.0);
        assert!(result.final_price.is_finite());
        assert_eq!(result.final_price, 0.0);
        assert_eq!(result.package_price, 0.0);
        assert!(result.net_profit.is_finite());
    }

    #[test]
    fn break_even_uses_units_sold_not_planned() {
        let extras = [extra(90.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(30.0, 0.0, 1, 45.0));

        assert_eq!(result.unit_cost, 3.0);
        assert_eq!(result.break_even_price, 2.0);
    }

    #[test]
    fn subtotals_partition_by_funding_source() {
        let items = [
            ingredient(5.00, 300.0, FundingSource::Business),
            ingredient(4.50, 100.0, FundingSource::SelfFunded),
        ];
        let extras = [
            extra(2.00, FundingSource::Business),
            extra(5.00, FundingSource::SelfFunded),
        ];
        let result = price_plan(&items, &extras, &params(6.0, 0.0, 1, 0.0));

        assert!((result.cost_business - 3.50).abs() < 1e-9);
        assert!((result.cost_self - 5.45).abs() < 1e-9);
        assert!((result.total_cost - (result.cost_business + result.cost_self)).abs() < 1e-12);
        assert!(result.cost_business >= 0.0 && result.cost_self >= 0.0);
    }

    #[test]
    fn identities_hold_for_mixed_input() {
        let items = [
            ingredient(8.20, 450.0, FundingSource::Business),
            ingredient(12.75, 80.0, FundingSource::SelfFunded),
        ];
        let extras = [extra(7.30, FundingSource::Business)];
        let result = price_plan(&items, &extras, &params(24.0, 35.0, 6, 18.0));

        assert_eq!(result.profit_per_unit, result.final_price - result.unit_cost);
        assert_eq!(result.package_price, result.final_price * 6.0);
        assert_eq!(result.net_profit, result.total_revenue - result.total_cost);
    }

    #[test]
    fn zero_margin_sells_at_cost() {
        let extras = [extra(48.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(16.0, 0.0, 1, 16.0));

        assert_eq!(result.final_price, result.unit_cost);
        assert_eq!(result.profit_per_unit, 0.0);
    }

    #[test]
    fn negative_margin_prices_below_cost() {
        let extras = [extra(100.0, FundingSource::Business)];
        let result = price_plan(&[], &extras, &params(10.0, -10.0, 1, 10.0));

        assert_eq!(result.final_price, 9.0);
        assert!(result.profit_per_unit < 0.0);
        assert!((result.net_profit - -10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_plan_is_all_zeroes() {
        let result = price_plan(&[], &[], &ProductionParams::default());
        assert_eq!(result, PricingBreakdown::default());
    }

    #[test]
    fn outlook_tracks_net_profit_sign() {
        let extras = [extra(100.0, FundingSource::Business)];

        let loss = price_plan(&[], &extras, &params(10.0, 20.0, 1, 0.0));
        assert_eq!(profit_outlook(&loss).status, OutlookStatus::Loss);

        let profit = price_plan(&[], &extras, &params(10.0, 20.0, 1, 10.0));
        assert_eq!(profit_outlook(&profit).status, OutlookStatus::Profit);

        // Selling everything at cost lands exactly on break-even.
        let even = price_plan(&[], &extras, &params(10.0, 0.0, 1, 10.0));
        assert_eq!(profit_outlook(&even).status, OutlookStatus::BreakEven);
    }
}
