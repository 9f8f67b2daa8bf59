pub mod confirm;
pub mod kpi_card;
pub mod outlook_badge;
pub mod toast;
