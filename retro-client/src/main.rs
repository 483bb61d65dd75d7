mod api;
mod command;
mod config;
mod dto;
mod error;
#[cfg(test)]
mod fake;
mod intent;
mod ordering;
mod poller;
mod render;
mod session;
mod view;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use std::sync::Arc;

use api::HttpBoardApi;
use command::Command;
use session::{Outcome, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Log setup, stdout is reserved for the board
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let cfg = config::load_config().inspect_err(|e| tracing::error!("Failed to load config: {e}"))?;
    tracing::info!("Connecting to retro board at {}", cfg.base_url);

    let api = HttpBoardApi::new(&cfg.base_url, cfg.request_timeout)?;
    let session = Arc::new(Session::new(api, cfg.user_name.clone(), cfg.notice_ttl));

    // Initial load
    session.refresh_boards().await;
    let initial = match cfg.board_id {
        Some(board_id) => Some(board_id),
        None => session.view().await.boards().first().map(|board| board.id.clone()),
    };
    if let Some(board_id) = initial {
        session.select_board(&board_id).await;
    }

    let poller = tokio::spawn(poller::run(session.clone(), cfg.poll_interval));

    {
        let view = session.view().await;
        print!("{}", render::boards(view.boards(), view.selected()));
        println!("{}", render::board(&view));
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let parsed = command::parse(&line, &*session.view().await);
        match parsed {
            Ok(Command::Quit) => break,
            Ok(Command::Help) => println!("{}", command::HELP),
            Ok(Command::ListBoards) => {
                session.refresh_boards().await;
                let view = session.view().await;
                print!("{}", render::boards(view.boards(), view.selected()));
            }
            Ok(Command::Show) => println!("{}", render::board(&*session.view().await)),
            Ok(Command::Run(intent)) => {
                if let Outcome::Busy = session.dispatch(intent).await {
                    println!("Still working on the previous request, try again in a moment.");
                }
                println!("{}", render::board(&*session.view().await));
            }
            Err(e) => println!("{e}"),
        }
    }

    poller.abort();
    Ok(())
}
