mod auth;
mod config;
mod db;
mod error;
mod models;
mod report;
mod run;
mod ui;

use anyhow::{Context, Result};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let settings = config::Settings::from_env()?;
    config::init_logging(&settings);

    let db = db::Database::open(&settings.db_path).with_context(|| {
        format!("Failed to open database: {}", settings.db_path.display())
    })?;
    let theme = ui::Theme::new(settings.color);

    match args.len() {
        1 => run::as_session(&db, theme),
        2.. => {
            let today = chrono::Local::now().date_naive();
            run::as_cli(&args, &db, &mut ui::Console::stdio(theme), today)
        }
        _ => {
            eprintln!("Usage: finman [command]");
            Ok(())
        }
    }
}
