//! Interactive chat demo over the in-process store.
//!
//! Wires up the store, identity, and session at the process entry point
//! and drives them from a small command loop.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin masschat -- --name Alice
//! ```
//! Commands: `/create`, `/join CODE`, `/leave`, `/quit`; anything else is
//! sent to the active room.

use std::sync::Arc;

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};

use masschat::{
    ChatSession, IdentityContext, InMemoryBackingStore,
    domain::{ChatMessage, DisplayName, Identity, UserId},
    logger::setup_logger,
};

#[derive(Debug, Parser)]
#[command(name = "masschat", about = "Code-addressed chat rooms, in-process demo")]
struct Args {
    /// Display name to chat as
    #[arg(long)]
    name: String,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run(args).await {
        tracing::error!("fatal: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let identity = Identity::new(
        UserId::new(uuid::Uuid::new_v4().to_string())?,
        DisplayName::new(args.name)?,
    );
    println!("signed in as {}", identity.display_name);

    // The entry point owns the store handle; sessions only borrow it.
    let store = Arc::new(InMemoryBackingStore::new());
    let mut session = ChatSession::new(store, IdentityContext::signed_in(identity));

    let mut editor = DefaultEditor::new()?;
    loop {
        let prompt = match session.current_room() {
            Some(code) => format!("{code}> "),
            None => "> ".to_string(),
        };
        let (returned, line) = tokio::task::spawn_blocking(move || {
            let mut editor = editor;
            let line = editor.readline(&prompt);
            (editor, line)
        })
        .await?;
        editor = returned;

        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        match line.trim() {
            "" => {}
            "/quit" => break,
            "/create" => match session.create_room().await {
                Ok(code) => {
                    println!("room created, share this code: {code}");
                    watch_messages(&session);
                }
                Err(e) => println!("could not create a room: {e}"),
            },
            "/leave" => {
                session.leave_room();
                println!("left the room");
            }
            command if command.starts_with("/join") => {
                let code = command.trim_start_matches("/join").trim();
                match session.join_room(code).await {
                    Ok(code) => {
                        println!("joined room {code}");
                        watch_messages(&session);
                    }
                    Err(e) => println!("could not join: {e}"),
                }
            }
            text => {
                if let Err(e) = session.send_message(text).await {
                    println!("send failed: {e}");
                }
            }
        }
    }

    session.leave_room();
    Ok(())
}

/// Print messages as the live view picks them up; the task ends when the
/// room is left and the stream's channel closes.
fn watch_messages(session: &ChatSession) {
    let Some(mut rx) = session.messages() else {
        return;
    };
    tokio::spawn(async move {
        let mut printed = 0;
        loop {
            {
                let messages = rx.borrow_and_update();
                for message in messages.iter().skip(printed) {
                    println!("{} {}: {}", format_time(message), message.author_name, message.text);
                }
                printed = messages.len();
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
    });
}

fn format_time(message: &ChatMessage) -> String {
    chrono::DateTime::from_timestamp_millis(message.sent_at.value())
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| message.sent_at.to_string())
}
