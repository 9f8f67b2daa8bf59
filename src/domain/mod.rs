//! Domain logic for planning and pricing the bake sale lives here.

pub mod app_state;
pub mod entities;
pub mod pricing;
pub mod schedule;

#[allow(unused_imports)]
pub use app_state::{AppState, PersistedState, Theme};
#[allow(unused_imports)]
pub use entities::{
    ExtraCost, FundingSource, Ingredient, Member, ProductionParams, Task, TaskStatus,
};
#[allow(unused_imports)]
pub use pricing::{price_plan, profit_outlook, OutlookStatus, PricingBreakdown, ProfitOutlook};
#[allow(unused_imports)]
pub use schedule::{overall_progress, phase_by_id, progress_percent, tasks_in_phase, Phase, PHASES};
