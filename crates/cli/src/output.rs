//! ANSI colour codes and stderr helpers shared by the command handlers.
//!
//! Colour is only emitted when the stream is a terminal, so piped output and
//! hook logs stay plain.

/// Escape sequences for one output stream. Every field is empty when the
/// stream is not a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
    pub bold: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Palette {
    const ANSI: Self = Self {
        red: "\x1b[31m",
        green: "\x1b[32m",
        yellow: "\x1b[33m",
        cyan: "\x1b[36m",
        bold: "\x1b[1m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };
    const PLAIN: Self = Self {
        red: "",
        green: "",
        yellow: "",
        cyan: "",
        bold: "",
        dim: "",
        reset: "",
    };

    pub fn new(colour: bool) -> Self {
        if colour {
            Self::ANSI
        } else {
            Self::PLAIN
        }
    }

    pub fn stdout() -> Self {
        Self::new(atty::is(atty::Stream::Stdout))
    }

    pub fn stderr() -> Self {
        Self::new(atty::is(atty::Stream::Stderr))
    }
}

pub fn warning(message: impl std::fmt::Display) {
    let Palette {
        bold,
        yellow,
        reset,
        ..
    } = Palette::stderr();
    eprintln!("{bold}{yellow}warning{reset} {message}");
}

pub fn failure(message: impl std::fmt::Display) {
    let Palette {
        bold, red, reset, ..
    } = Palette::stderr();
    eprintln!("{bold}{red}error{reset} {message}");
}
