use std::io::{self, Write};

use anatomize_core::model::{
    CHAT_TARGET, Message, QUIZ_TARGET, QuizQuestion, Region, RegionProgress,
};
use services::ChatView;

/// Prints a chat view incrementally, so a reply being revealed appears word
/// by word on one line.
#[derive(Debug, Default)]
pub struct Transcript {
    printed: usize,
    partial: usize,
    started: bool,
}

impl Transcript {
    pub fn render(&mut self, view: &ChatView, out: &mut impl Write) -> io::Result<()> {
        let last = view.messages.len().saturating_sub(1);
        for (index, message) in view.messages.iter().enumerate().skip(self.printed) {
            if !self.started {
                write!(out, "{}: ", speaker(message))?;
                self.started = true;
            }
            write!(out, "{}", message.text.get(self.partial..).unwrap_or(""))?;
            self.partial = message.text.len();
            if view.revealing && index == last {
                break;
            }
            writeln!(out)?;
            self.printed += 1;
            self.partial = 0;
            self.started = false;
        }
        out.flush()
    }
}

fn speaker(message: &Message) -> &'static str {
    if message.is_user() { "you" } else { "tutor" }
}

pub fn progress_row(region: Region, progress: &RegionProgress) -> String {
    format!(
        "{:<11} summary {}  quiz {}/{QUIZ_TARGET}{}  chat {}/{CHAT_TARGET}{}",
        region.label(),
        if progress.summary_read() { "read" } else { "----" },
        progress.quiz_correct_count(),
        if progress.quiz_complete() { " *" } else { "  " },
        progress.chat_count(),
        if progress.chat_complete() { " *" } else { "  " },
    )
}

pub fn question_block(question: &QuizQuestion) -> String {
    let mut block = format!("{}\n", question.text());
    for (index, option) in question.options().iter().enumerate() {
        block.push_str(&format!("  {}. {option}\n", index + 1));
    }
    block
}
