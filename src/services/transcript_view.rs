// src/services/transcript_view.rs
use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::chat_session::{Speaker, TranscriptEntry};

const BOT_PREFIX: &str = "🤖 Bot: ";

/// Lays out the whole transcript, oldest first. Your lines sit on the right
/// (light green), bot lines on the left (light grey).
pub fn render_transcript(entries: &[TranscriptEntry], width: usize, color: bool) -> String {
    let mut out = Vec::new();

    for entry in entries {
        match entry.speaker {
            Speaker::You => {
                for line in entry.text.lines() {
                    let pad = width.saturating_sub(line.width());
                    let styled = if color {
                        line.black().on_truecolor(220, 248, 198).to_string()
                    } else {
                        line.to_string()
                    };
                    out.push(format!("{}{}", " ".repeat(pad), styled));
                }
            }
            Speaker::Bot => {
                let text = if entry.text.is_empty() { " " } else { entry.text.as_str() };
                for (i, line) in text.lines().enumerate() {
                    let prefix = if i == 0 { BOT_PREFIX } else { "        " };
                    let line = format!("{prefix}{line}");
                    out.push(if color {
                        line.black().on_truecolor(241, 240, 240).to_string()
                    } else {
                        line
                    });
                }
            }
        }
    }

    out.join("\n")
}
