use clap::Subcommand;
use moveit_core::view;

use super::{open_session, print_events, save_session};

#[derive(Subcommand)]
pub enum CountdownAction {
    /// Start a focus cycle
    Start,
    /// Abandon the current cycle
    Reset,
    /// Show the remaining time
    Status,
}

pub fn run(action: CountdownAction, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, ticked) = open_session()?;
    print_events(&ticked, json)?;

    match action {
        CountdownAction::Start => match session.start_countdown() {
            Some(event) => print_events(&[event], json)?,
            None if !json => {
                if session.countdown().has_finished() {
                    println!("Cycle finished; reset it to start another");
                } else {
                    println!("Cycle already running");
                }
            }
            None => {}
        },
        CountdownAction::Reset => {
            let event = session.reset_countdown();
            print_events(&[event], json)?;
        }
        CountdownAction::Status => {
            if json {
                println!("{}", serde_json::to_string_pretty(session.countdown())?);
            } else {
                println!("{}", view::countdown(&session.view()));
            }
        }
    }

    save_session(&session)?;
    Ok(())
}
