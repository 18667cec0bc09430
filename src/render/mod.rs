use colored::*;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref HEADING_RE: Regex = Regex::new(r"^(#{1,6})\s+(.*)$").unwrap();
    static ref BULLET_RE: Regex = Regex::new(r"^(\s*)([-*])\s+(.*)$").unwrap();
    static ref INLINE_CODE_RE: Regex = Regex::new(r"`([^`]+)`").unwrap();
    static ref BOLD_RE: Regex = Regex::new(r"\*\*([^*]+)\*\*").unwrap();
}

/// Terminal Markdown highlighting for explain output. Strictly best-effort:
/// when colorization is off (non-tty, NO_COLOR, forced off) the input text
/// comes back unchanged.
pub struct Highlighter;

impl Highlighter {
    pub fn new() -> Self {
        Highlighter
    }

    pub fn try_highlight(&self, text: &str) -> String {
        if !control::SHOULD_COLORIZE.should_colorize() {
            return text.to_string();
        }

        let mut lines = Vec::new();
        let mut in_code_block = false;
        for line in text.lines() {
            if line.trim_start().starts_with("```") {
                in_code_block = !in_code_block;
                lines.push(line.dimmed().to_string());
                continue;
            }
            if in_code_block {
                lines.push(line.green().to_string());
                continue;
            }
            lines.push(self.highlight_line(line));
        }
        lines.join("\n")
    }

    fn highlight_line(&self, line: &str) -> String {
        if let Some(caps) = HEADING_RE.captures(line) {
            return format!("{} {}", &caps[1].bright_blue(), caps[2].bright_blue().bold());
        }

        let line = if let Some(caps) = BULLET_RE.captures(line) {
            format!("{}{} {}", &caps[1], caps[2].bright_yellow(), &caps[3])
        } else {
            line.to_string()
        };

        let line = INLINE_CODE_RE.replace_all(&line, |caps: &Captures<'_>| {
            caps[1].bright_cyan().to_string()
        });
        BOLD_RE
            .replace_all(&line, |caps: &Captures<'_>| caps[1].bold().to_string())
            .to_string()
    }
}
