//! Client execution logic.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::{mpsc, watch};

use crate::{
    domain::{Composer, InputCommand},
    error::ClientError,
    formatter::MessageFormatter,
    session::ClientSession,
    ui::{prompt, redisplay_prompt},
};

/// Run the interactive chat client until the user quits or the connection drops
///
/// A lost connection is reported as an error; there is no reconnection.
pub async fn run_client(
    url: String,
    origin: String,
    username: Option<String>,
) -> Result<(), ClientError> {
    let mut composer = Composer::random();
    if let Some(username) = username {
        composer.set_username(username);
    }

    tracing::info!("Connecting to {} as '{}'", url, composer.username());
    let (mut session, mut inbound) = ClientSession::connect(&url, &origin).await?;

    print!(
        "{}",
        MessageFormatter::format_welcome(composer.username(), &composer.avatar_url())
    );

    // rustyline blocks, so it runs on its own thread and reads the prompt from a watch
    let (prompt_tx, prompt_rx) = watch::channel(composer.username().to_string());
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let _readline_handle = std::thread::spawn(move || read_lines(prompt_rx, input_tx));

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                // Ctrl+C or Ctrl+D
                let Some(line) = line else {
                    break;
                };

                match InputCommand::parse(&line) {
                    InputCommand::Quit => break,
                    InputCommand::Rename(username) => {
                        composer.set_username(username);
                        prompt_tx.send_replace(composer.username().to_string());
                        print!("{}", MessageFormatter::format_renamed(composer.username()));
                    }
                    InputCommand::Usage(usage) => {
                        print!("{}", MessageFormatter::format_usage(usage));
                    }
                    InputCommand::Say(text) => {
                        composer.set_text(text);
                        session.submit(&mut composer)?;
                    }
                }
            }
            message = inbound.recv() => {
                let Some(message) = message else {
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                };

                let message = session.on_receive(message);
                print!(
                    "{}",
                    MessageFormatter::format_chat_message(message, composer.username())
                );
                redisplay_prompt(composer.username());
            }
        }
    }

    tracing::info!("Leaving chat");
    session.close().await;

    Ok(())
}

fn read_lines(prompt_rx: watch::Receiver<String>, input_tx: mpsc::UnboundedSender<String>) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize readline: {}", e);
            return;
        }
    };

    loop {
        let current_prompt = prompt(&prompt_rx.borrow());
        match rl.readline(&current_prompt) {
            Ok(line) => {
                if !line.is_empty() {
                    rl.add_history_entry(line.as_str()).ok();
                }
                if input_tx.send(line).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                tracing::info!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                tracing::info!("EOF");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {}", err);
                break;
            }
        }
    }
}
