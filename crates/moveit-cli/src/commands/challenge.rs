use clap::Subcommand;
use moveit_core::view;

use super::{open_session, print_events, save_session};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Draw a new challenge now (replaces the active one)
    Start,
    /// Complete the active challenge and collect its experience
    Complete,
    /// Discard the active challenge without reward
    Reset,
    /// Mark the challenge completed and start a fresh cycle
    Succeed,
    /// Mark the challenge failed and start a fresh cycle
    Fail,
    /// Show the active challenge
    Status,
    /// List every challenge in the catalog
    List,
}

pub fn run(action: ChallengeAction, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (mut session, ticked) = open_session()?;
    print_events(&ticked, json)?;

    match action {
        ChallengeAction::Start => {
            let event = session.start_new_challenge()?;
            print_events(&[event], json)?;
        }
        ChallengeAction::Complete => {
            let events = session.complete_challenge()?;
            if events.is_empty() && !json {
                println!("No active challenge");
            }
            print_events(&events, json)?;
        }
        ChallengeAction::Reset => {
            let event = session.reset_challenge()?;
            if event.is_none() && !json {
                println!("No active challenge");
            }
            print_events(&event.into_iter().collect::<Vec<_>>(), json)?;
        }
        ChallengeAction::Succeed => {
            let events = session.challenge_succeeded()?;
            print_events(&events, json)?;
        }
        ChallengeAction::Fail => {
            let events = session.challenge_failed()?;
            print_events(&events, json)?;
        }
        ChallengeAction::Status => {
            if json {
                print_events(&[session.snapshot()], json)?;
            } else {
                println!("{}", view::challenge_box(&session.view()));
            }
        }
        ChallengeAction::List => {
            if json {
                let all: Vec<_> = session.catalog().iter().collect();
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                for challenge in session.catalog().iter() {
                    println!(
                        "{:>4} xp  [{}]  {}",
                        challenge.amount,
                        challenge.challenge_type.label(),
                        challenge.description
                    );
                }
            }
        }
    }

    save_session(&session)?;
    Ok(())
}
