use clap::Subcommand;
use moveit_core::view;

use super::{open_session, print_events, save_session};

#[derive(Subcommand)]
pub enum ModalAction {
    /// Show the level-up message if one is pending
    Show,
    /// Dismiss the level-up message
    Close,
}

pub fn run(action: ModalAction, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, ticked) = open_session()?;
    print_events(&ticked, json)?;

    match action {
        ModalAction::Show => {
            let modal = view::level_up_modal(&session.view());
            if json {
                println!("{}", serde_json::json!({ "open": modal.is_some(), "text": modal }));
            } else if let Some(text) = modal {
                println!("{text}");
            }
        }
        ModalAction::Close => {
            let event = session.close_level_up_modal()?;
            print_events(&event.into_iter().collect::<Vec<_>>(), json)?;
        }
    }

    save_session(&session)?;
    Ok(())
}
