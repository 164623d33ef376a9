use anyhow::Result;

use crate::db::Database;
use crate::ui::{Console, Theme};

mod cli;
mod session;

pub(crate) use cli::as_cli;
use session::Session;

/// Interactive menu over stdin/stdout until the user's input runs out.
pub(crate) fn as_session(db: &Database, theme: Theme) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    Session::new(db, Console::stdio(theme), today).run()
}
