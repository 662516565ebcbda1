//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait applies ANSI styling via the `colored` crate.
//! Implementations for `&str` and `String` let literals be styled directly.

use colored::{ColoredString, Colorize};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn title_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn character_style(&self) -> ColoredString;
    fn enemy_style(&self) -> ColoredString;
    fn item_style(&self) -> ColoredString;
    fn quest_style(&self) -> ColoredString;
    fn quest_done_style(&self) -> ColoredString;
    fn gold_style(&self) -> ColoredString;
    fn xp_style(&self) -> ColoredString;
    fn health_style(&self) -> ColoredString;
    fn damage_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn success_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn error_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn title_style(&self) -> ColoredString {
        self.bold().truecolor(223, 77, 10)
    }
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn character_style(&self) -> ColoredString {
        self.truecolor(13, 130, 60).underline()
    }
    fn enemy_style(&self) -> ColoredString {
        self.bold().truecolor(200, 50, 50)
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn quest_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220)
    }
    fn quest_done_style(&self) -> ColoredString {
        self.truecolor(220, 40, 220).strikethrough()
    }
    fn gold_style(&self) -> ColoredString {
        self.truecolor(255, 215, 0)
    }
    fn xp_style(&self) -> ColoredString {
        self.truecolor(150, 230, 30)
    }
    fn health_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn damage_style(&self) -> ColoredString {
        self.bold().truecolor(230, 80, 80)
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn success_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 30)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
    fn error_style(&self) -> ColoredString {
        self.truecolor(230, 30, 30)
    }
}

impl GameStyle for String {
    fn title_style(&self) -> ColoredString {
        self.as_str().title_style()
    }
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn character_style(&self) -> ColoredString {
        self.as_str().character_style()
    }
    fn enemy_style(&self) -> ColoredString {
        self.as_str().enemy_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn quest_style(&self) -> ColoredString {
        self.as_str().quest_style()
    }
    fn quest_done_style(&self) -> ColoredString {
        self.as_str().quest_done_style()
    }
    fn gold_style(&self) -> ColoredString {
        self.as_str().gold_style()
    }
    fn xp_style(&self) -> ColoredString {
        self.as_str().xp_style()
    }
    fn health_style(&self) -> ColoredString {
        self.as_str().health_style()
    }
    fn damage_style(&self) -> ColoredString {
        self.as_str().damage_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn success_style(&self) -> ColoredString {
        self.as_str().success_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
    fn error_style(&self) -> ColoredString {
        self.as_str().error_style()
    }
}
