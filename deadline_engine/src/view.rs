//! View module.
//!
//! Handlers never print directly. They push [`ViewItem`]s describing what
//! happened, and the REPL flushes the view once per turn (and before any
//! nested prompt a minigame or teleport makes).

use colored::Colorize;
use log::info;
use textwrap::{fill, termwidth};
use variantly::Variantly;

use crate::helpers::plural_s;
use crate::style::{GameStyle, indented_block, normal_block};
use crate::world::LocationId;

const ICON_SUCCESS: &str = "\u{2611}";
const ICON_FAILURE: &str = "\u{274C}";
const ICON_NEGATIVE: &str = "➖";
const ICON_POSITIVE: &str = "➕";
const ICON_CELEBRATE: &str = "🎉";
const ICON_ENGINE: &str = "⚙";

/// One line of the `log` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub location_id: LocationId,
    pub location_name: String,
    /// The command chosen from that location.
    pub command: String,
}

/// One line of the inventory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLine {
    pub name: String,
    pub held: bool,
}

/// Final session report.
#[derive(Debug, Clone, PartialEq)]
pub struct EndingReport {
    pub banner: String,
    pub success: bool,
    pub score: usize,
    pub max_score: usize,
    pub visited: usize,
    pub total_locations: usize,
    pub rank: String,
    pub rank_description: String,
}

/// Each kind of information that may be displayed to the player.
#[derive(Debug, Clone, PartialEq, Variantly)]
pub enum ViewItem {
    ActionFailure(String),
    ActionSuccess(String),
    CommandMenu {
        menu: Vec<String>,
        location: Vec<String>,
    },
    Description(String),
    EndingSummary(EndingReport),
    EngineMessage(String),
    Inventory(Vec<InventoryLine>),
    ItemDescription {
        name: String,
        description: String,
    },
    LocationBanner {
        id: LocationId,
        name: String,
    },
    LocationItems(Vec<String>),
    LogEntries {
        entries: Vec<LogLine>,
        current: LogLine,
    },
    Narrative(String),
    PointsAwarded {
        amount: isize,
        reason: String,
    },
    Score {
        score: usize,
        moves_remaining: u32,
    },
}

/// Aggregates the output of one turn and displays it on `flush`.
#[derive(Debug, Clone)]
pub struct View {
    pub width: usize,
    pub items: Vec<ViewItem>,
}
impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

impl View {
    pub fn new() -> Self {
        Self {
            width: termwidth(),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, item: ViewItem) {
        self.items.push(item);
    }

    /// Discard pending output without displaying it.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Display everything pushed since the last flush, in push order.
    pub fn flush(&mut self) {
        // re-check terminal width in case it's been resized
        self.width = termwidth();
        let items = std::mem::take(&mut self.items);
        for item in &items {
            self.render(item);
        }
        if !items.is_empty() {
            println!();
        }
    }

    fn render(&self, item: &ViewItem) {
        match item {
            ViewItem::ActionFailure(msg) => {
                println!("{}", fill(&format!("{:<4}{}", ICON_FAILURE.red(), msg.denied_style()), normal_block()));
            },
            ViewItem::ActionSuccess(msg) => {
                println!("{}", fill(&format!("{:<4}{msg}", ICON_SUCCESS.green()), normal_block()));
            },
            ViewItem::CommandMenu { menu, location } => Self::command_menu(menu, location),
            ViewItem::Description(text) => {
                for paragraph in text.split('\n') {
                    println!("{}", fill(paragraph, normal_block()).description_style());
                }
            },
            ViewItem::EndingSummary(report) => self.ending_summary(report),
            ViewItem::EngineMessage(msg) => {
                println!("{}", fill(&format!("{ICON_ENGINE:<4}{msg}"), normal_block()));
            },
            ViewItem::Inventory(lines) => Self::inventory(lines),
            ViewItem::ItemDescription { name, description } => {
                println!("{}: {}", name.item_style(), description.description_style());
            },
            ViewItem::LocationBanner { id, name } => {
                println!(
                    "{:=>width$}\n{}",
                    "",
                    format!("Location {id}: {}", name.location_style()).location_titlebar_style(),
                    width = self.width.min(40)
                );
            },
            ViewItem::LocationItems(names) => {
                if names.is_empty() {
                    println!("{}", "Nothing here to pick up.".italic().dimmed());
                } else {
                    let styled: Vec<String> = names.iter().map(|name| name.item_style().to_string()).collect();
                    println!("You see: {}", styled.join(", "));
                }
            },
            ViewItem::LogEntries { entries, current } => Self::log_entries(entries, current),
            ViewItem::Narrative(text) => {
                for paragraph in text.split('\n') {
                    println!("{}", fill(paragraph, normal_block()).narrative_style());
                }
            },
            ViewItem::PointsAwarded { amount, reason } => Self::points_awarded(*amount, reason),
            ViewItem::Score { score, moves_remaining } => {
                println!(
                    "Score: {}   Moves remaining: {}",
                    score.to_string().bold(),
                    moves_remaining.to_string().yellow()
                );
            },
        }
    }

    fn command_menu(menu: &[String], location: &[String]) {
        println!("{} {}", "What to do? Choose from:".subheading_style(), menu.join(", ").menu_style());
        if location.is_empty() {
            return;
        }
        println!("At this location, you can also:");
        for entry in location {
            println!("  - {}", entry.command_style());
        }
    }

    fn inventory(lines: &[InventoryLine]) {
        println!("{}:", "Inventory".subheading_style());
        if lines.is_empty() {
            println!("   {}", "You aren't carrying anything.".italic().dimmed());
        }
        for line in lines {
            if line.held {
                println!("   {} {}", line.name.item_style(), "(held)".dimmed());
            } else {
                println!("   {}", line.name.item_style());
            }
        }
    }

    fn log_entries(entries: &[LogLine], current: &LogLine) {
        println!("{}:", "Log".subheading_style());
        for entry in entries {
            println!(
                "{}",
                fill(
                    &format!(
                        "Location: {} (id: {}), you chose to {}",
                        entry.location_name.location_style(),
                        entry.location_id,
                        entry.command.command_style()
                    ),
                    indented_block()
                )
            );
        }
        println!(
            "You are currently at Location {}: {}",
            current.location_id,
            current.location_name.location_style()
        );
    }

    fn points_awarded(amount: isize, reason: &str) {
        if amount.is_negative() {
            let text = format!("{reason} (-{} point{})", amount.abs(), plural_s(amount.abs())).bright_red();
            println!("{:<4}{text}", ICON_NEGATIVE.bright_red());
        } else if amount > 15 {
            let text = format!("{reason} (+{amount} point{}!)", plural_s(amount)).bright_blue();
            println!("{:<4}{text}", ICON_CELEBRATE.bright_blue());
        } else {
            let text = format!("{reason} (+{amount} point{})", plural_s(amount)).bright_green();
            println!("{:<4}{text}", ICON_POSITIVE.bright_green());
        }
    }

    fn ending_summary(&self, report: &EndingReport) {
        info!("displaying ending summary: {report:?}");
        println!("{:.>width$}\n", "game over".section_style(), width = self.width);
        let banner = fill(&report.banner, normal_block());
        if report.success {
            println!("{}", banner.bright_green().bold());
        } else {
            println!("{}", banner.bright_red());
        }
        println!(
            "\nFinal score: {} / {}",
            report.score.to_string().bold(),
            report.max_score
        );
        println!(
            "Locations visited: {} of {}",
            report.visited, report.total_locations
        );
        println!("Rank: {}", report.rank.subheading_style());
        println!("{}", fill(&report.rank_description, indented_block()).italic());
    }
}
