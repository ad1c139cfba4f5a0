//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait applies ANSI styling via the `colored` crate. It is implemented
//! for `&str` and `String` so literals and formatted text can be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to HUD text.
pub trait GameStyle {
    fn heart_style(&self) -> ColoredString;
    fn empty_heart_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn npc_style(&self) -> ColoredString;
    fn enemy_style(&self) -> ColoredString;
    fn dialogue_style(&self) -> ColoredString;
    fn message_style(&self) -> ColoredString;
    fn quest_active_style(&self) -> ColoredString;
    fn quest_complete_style(&self) -> ColoredString;
    fn solved_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn heart_style(&self) -> ColoredString {
        self.truecolor(230, 40, 60).bold()
    }
    fn empty_heart_style(&self) -> ColoredString {
        self.truecolor(90, 60, 60).dimmed()
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn npc_style(&self) -> ColoredString {
        self.truecolor(13, 130, 60).underline()
    }
    fn enemy_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10)
    }
    fn dialogue_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn message_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 30)
    }
    fn quest_active_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn quest_complete_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220).strikethrough()
    }
    fn solved_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn prompt_style(&self) -> ColoredString {
        self.truecolor(180, 180, 180).bold()
    }
}

impl GameStyle for String {
    fn heart_style(&self) -> ColoredString {
        self.as_str().heart_style()
    }
    fn empty_heart_style(&self) -> ColoredString {
        self.as_str().empty_heart_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn npc_style(&self) -> ColoredString {
        self.as_str().npc_style()
    }
    fn enemy_style(&self) -> ColoredString {
        self.as_str().enemy_style()
    }
    fn dialogue_style(&self) -> ColoredString {
        self.as_str().dialogue_style()
    }
    fn message_style(&self) -> ColoredString {
        self.as_str().message_style()
    }
    fn quest_active_style(&self) -> ColoredString {
        self.as_str().quest_active_style()
    }
    fn quest_complete_style(&self) -> ColoredString {
        self.as_str().quest_complete_style()
    }
    fn solved_style(&self) -> ColoredString {
        self.as_str().solved_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
}
