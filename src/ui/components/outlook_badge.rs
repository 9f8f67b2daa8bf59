use dioxus::prelude::*;

use crate::domain::{OutlookStatus, ProfitOutlook};

/// Big colored verdict card for the calculator page: does this plan make
/// money at the configured price and sales volume.
#[component]
pub fn OutlookBadge(outlook: ProfitOutlook) -> Element {
    let (label, theme) = match outlook.status {
        OutlookStatus::Profit => ("Profit", "outlook profit"),
        OutlookStatus::BreakEven => ("Break-even", "outlook even"),
        OutlookStatus::Loss => ("Loss", "outlook loss"),
    };
    let net_display = format!("{:+.2}", outlook.net_profit);

    rsx! {
        div {
            class: "{theme}",
            div { class: "outlook-head",
                span { class: "outlook-caption", "Net profit" }
                span { class: "outlook-label", "{label}" }
            }
            p { class: "outlook-value", "{net_display}" }
            p { class: "outlook-rationale", "{outlook.rationale}" }
        }
    }
}
