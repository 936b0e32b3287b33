//! Logging to the terminal with colors
//!
//! Everything goes to stderr; stdout carries command replies only.

use crate::model::{Player, RatedPlayer};
use std::io::IsTerminal;
use std::sync::LazyLock;

const DEFAULT: &str = "\x1b[0m";
const FG_GRAY: &str = "\x1b[90m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_RED: &str = "\x1b[31m";
const FG_YELLOW: &str = "\x1b[33m";

pub enum Color {
    Default,
    Event,
    Internal,
    Error,
    Player,
    Glue,
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        // Only print colors when logging to a terminal
        static STDERR_IS_TERMINAL: LazyLock<bool> =
            LazyLock::new(|| std::io::stderr().is_terminal());

        if !*STDERR_IS_TERMINAL {
            return Ok(());
        }

        write!(
            f,
            "{}",
            match self {
                Color::Default => DEFAULT,
                Color::Event => FG_YELLOW,
                Color::Internal => FG_MAGENTA,
                Color::Error => FG_RED,
                Color::Player => FG_GREEN,
                Color::Glue => FG_GRAY,
            }
        )
    }
}

/// Something that happened to the ladder: a player joined, a match was recorded.
#[macro_export]
macro_rules! log_event {
    ($fmtstr:expr $(, $args:expr)* $(,)?) => {
        eprintln!(
            concat!("{}*{} ", $fmtstr),
            $crate::logging::Color::Event,
            $crate::logging::Color::Default
            $(, $args)*
        )
    };
}

/// Engine housekeeping, e.g. cache rebuilds.
#[macro_export]
macro_rules! log_internal {
    ($fmtstr:expr $(, $args:expr)* $(,)?) => {
        eprintln!(
            concat!("{}+{} ", $fmtstr),
            $crate::logging::Color::Internal,
            $crate::logging::Color::Default
            $(, $args)*
        )
    };
}

/// Failures that are reported and then survived.
#[macro_export]
macro_rules! log_error {
    ($fmtstr:expr $(, $args:expr)* $(,)?) => {
        eprintln!(
            concat!("{}!{} ", $fmtstr),
            $crate::logging::Color::Error,
            $crate::logging::Color::Default
            $(, $args)*
        )
    };
}

pub trait PrintColor {
    fn color(&self) -> String;
}

// Field separator
pub struct Glue;
impl PrintColor for Glue {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Glue, ":", Color::Default)
    }
}

impl PrintColor for Player {
    fn color(&self) -> String {
        format!("{}{}{}", Color::Player, self.name.as_str(), Color::Default)
    }
}

impl PrintColor for RatedPlayer {
    fn color(&self) -> String {
        format!(
            "{}{}{}{}{}",
            self.player.color(),
            Glue.color(),
            Color::Glue,
            self.elo.rating,
            Color::Default
        )
    }
}
