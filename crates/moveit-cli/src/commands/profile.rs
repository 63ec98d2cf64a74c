use moveit_core::view;

use super::{open_session, print_events, save_session};

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (session, ticked) = open_session()?;
    print_events(&ticked, json)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session.view())?);
    } else {
        println!("{}", view::render_page(&session.view()));
    }

    save_session(&session)?;
    Ok(())
}
