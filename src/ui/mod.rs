pub(crate) mod console;
pub(crate) mod table;
pub(crate) mod theme;
pub(crate) mod util;
mod views;

pub(crate) use console::Console;
pub(crate) use theme::Theme;
pub(crate) use views::{
    budget_warning, render_balance, render_budget_status, render_report, render_transactions,
};
