use std::fmt;

const GENERATE_INSTRUCTION: &str = "You are a zsh shell expert, please write a ZSH command that solves my problem.\nYou should only output the completed command, no need to include any other explanation.";

const EXPLAIN_INSTRUCTION: &str = "You are a zsh shell expert, please briefly explain how the given command works. Be as concise as possible. Use Markdown syntax for formatting.";

/// Selects the system instruction and the output post-processing step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Generate,
    Explain,
}

impl Mode {
    pub fn parse(arg: &str) -> Option<Self> {
        match arg {
            "generate" => Some(Mode::Generate),
            "explain" => Some(Mode::Explain),
            _ => None,
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            Mode::Generate => GENERATE_INSTRUCTION,
            Mode::Explain => EXPLAIN_INSTRUCTION,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Generate => write!(f, "generate"),
            Mode::Explain => write!(f, "explain"),
        }
    }
}
