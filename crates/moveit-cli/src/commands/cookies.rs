use clap::Subcommand;
use moveit_core::storage::{load_snapshot, save_snapshot};
use moveit_core::{CookieJar, Database};

#[derive(Subcommand)]
pub enum CookiesAction {
    /// Seed progress from a Cookie header, e.g. "level=3; currentXp=40"
    Import {
        header: String,
    },
    /// Print stored progress as Set-Cookie values
    Export,
}

pub fn run(action: CookiesAction, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        CookiesAction::Import { header } => {
            let jar = CookieJar::from_header(&header);
            let snapshot = load_snapshot(&jar)?;
            save_snapshot(&mut db, &snapshot)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!(
                    "Imported level {}, {} xp, {} completed",
                    snapshot.level, snapshot.current_xp, snapshot.challenges_completed
                );
            }
        }
        CookiesAction::Export => {
            let snapshot = load_snapshot(&db)?;
            let mut jar = CookieJar::new();
            save_snapshot(&mut jar, &snapshot)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "cookie": jar.header(),
                        "set_cookie": jar.set_cookie_headers(),
                    }))?
                );
            } else {
                for line in jar.set_cookie_headers() {
                    println!("Set-Cookie: {line}");
                }
            }
        }
    }
    Ok(())
}
