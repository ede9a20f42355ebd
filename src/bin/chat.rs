use std::io::{IsTerminal, Write, stdin, stdout};

use anyhow::Context;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use prompt_relay::{
    config::ChatConfig,
    services::{
        chat_session::ChatSession, relay_client::RelayClient,
        transcript_view::render_transcript,
    },
};
use tokio::sync::mpsc::{Sender, channel};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const TITLE: &str = "Finetuned Model Chat";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ChatConfig::from_env().context("reading chat configuration")?;
    let relay = RelayClient::new(&config.relay_url, config.timeout)
        .context("building relay client")?;
    let color = stdout().is_terminal();

    let mut session = ChatSession::new();
    debug!(session = %session.id(), relay = %relay.endpoint(), "chat session started");

    // stdin is read on its own thread; lines arrive here one at a time.
    let (tx, mut rx) = channel(1);
    std::thread::spawn(move || read_lines(tx));

    redraw(&session, config.width, color)?;
    while let Some(line) = rx.recv().await {
        let command = line.trim();
        if command == "/quit" || command == "/exit" {
            break;
        }
        if command == "/reset" {
            session.reset();
        } else {
            session.set_input(line);
            session.submit_input(&relay).await;
        }
        redraw(&session, config.width, color)?;
    }

    debug!(session = %session.id(), entries = session.transcript().len(), "chat session ended");
    Ok(())
}

fn read_lines(tx: Sender<String>) {
    let mut buffer = String::new();
    loop {
        buffer.clear();
        match stdin().read_line(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let text = buffer.trim_end_matches(['\r', '\n']).to_string();
                if tx.blocking_send(text).is_err() {
                    break;
                }
            }
        }
    }
}

fn redraw(session: &ChatSession, width: usize, color: bool) -> std::io::Result<()> {
    draw(&mut stdout().lock(), session, width, color)
}

fn draw(out: &mut impl Write, session: &ChatSession, width: usize, color: bool) -> std::io::Result<()> {
    if color {
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    }
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{}", "=".repeat(TITLE.len()))?;
    let transcript = render_transcript(session.transcript(), width, color);
    if !transcript.is_empty() {
        writeln!(out, "{transcript}")?;
    }
    writeln!(out)?;
    write!(out, "Type your message... (/reset, /quit) > ")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_draw_clears_screen_first() {
        let mut out = Vec::new();
        draw(&mut out, &ChatSession::new(), 40, true).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("\x1b[2J"), "got {text:?}");
        assert!(text.contains("\x1b[1;1H"));
        assert!(text.contains(TITLE));
    }

    #[test]
    fn plain_draw_has_no_escape_codes() {
        let mut out = Vec::new();
        draw(&mut out, &ChatSession::new(), 40, false).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(!text.contains('\x1b'));
        assert!(text.starts_with(TITLE));
    }
}
