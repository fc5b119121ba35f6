//! Styling helpers for terminal output.
//!
//! The [`GameStyle`] trait provides a set of convenience methods for applying
//! ANSI styling via the `colored` crate. Implementations for `&str` and
//! `String` are provided so string literals can be styled directly.

use colored::{ColoredString, Colorize};
use textwrap::{Options, termwidth};

/// Convenience trait for applying color and style to text output.
pub trait GameStyle {
    fn item_style(&self) -> ColoredString;
    fn location_style(&self) -> ColoredString;
    fn location_titlebar_style(&self) -> ColoredString;
    fn description_style(&self) -> ColoredString;
    fn narrative_style(&self) -> ColoredString;
    fn command_style(&self) -> ColoredString;
    fn menu_style(&self) -> ColoredString;
    fn denied_style(&self) -> ColoredString;
    fn subheading_style(&self) -> ColoredString;
    fn prompt_style(&self) -> ColoredString;
    fn section_style(&self) -> ColoredString;
}

impl GameStyle for &str {
    fn section_style(&self) -> ColoredString {
        let bracketed = format!("[{self}]");
        bracketed.truecolor(75, 80, 75)
    }
    fn subheading_style(&self) -> ColoredString {
        self.underline()
    }
    fn item_style(&self) -> ColoredString {
        self.truecolor(220, 180, 40)
    }
    fn location_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10)
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.truecolor(223, 77, 10).underline()
    }
    fn description_style(&self) -> ColoredString {
        self.italic().truecolor(102, 208, 250)
    }
    fn narrative_style(&self) -> ColoredString {
        self.italic().truecolor(230, 230, 30)
    }
    fn command_style(&self) -> ColoredString {
        self.truecolor(110, 220, 110)
    }
    fn menu_style(&self) -> ColoredString {
        self.dimmed().truecolor(150, 150, 230)
    }
    fn denied_style(&self) -> ColoredString {
        self.italic().truecolor(230, 30, 30)
    }
    fn prompt_style(&self) -> ColoredString {
        self.bold().truecolor(220, 180, 40)
    }
}

impl GameStyle for String {
    fn section_style(&self) -> ColoredString {
        self.as_str().section_style()
    }
    fn subheading_style(&self) -> ColoredString {
        self.as_str().subheading_style()
    }
    fn item_style(&self) -> ColoredString {
        self.as_str().item_style()
    }
    fn location_style(&self) -> ColoredString {
        self.as_str().location_style()
    }
    fn location_titlebar_style(&self) -> ColoredString {
        self.as_str().location_titlebar_style()
    }
    fn description_style(&self) -> ColoredString {
        self.as_str().description_style()
    }
    fn narrative_style(&self) -> ColoredString {
        self.as_str().narrative_style()
    }
    fn command_style(&self) -> ColoredString {
        self.as_str().command_style()
    }
    fn menu_style(&self) -> ColoredString {
        self.as_str().menu_style()
    }
    fn denied_style(&self) -> ColoredString {
        self.as_str().denied_style()
    }
    fn prompt_style(&self) -> ColoredString {
        self.as_str().prompt_style()
    }
}

/// Wrapping options for ordinary paragraphs.
pub fn normal_block() -> Options<'static> {
    Options::new(termwidth().min(100))
}

/// Wrapping options for text nested under a heading.
pub fn indented_block() -> Options<'static> {
    normal_block().initial_indent("    ").subsequent_indent("    ")
}
