use owo_colors::OwoColorize;

use crate::advisor::Recommendation;
use crate::cards::{Card, Hand};
use crate::equity::EquityReport;
use crate::ev::{EvOutcome, Valuation};
use crate::game::Action;
use crate::range::Range;

/// Renders engine results for a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    pub no_color: bool,
}

impl Reporter {
    pub fn new(no_color: bool) -> Self {
        Self { no_color }
    }

    pub fn print_range(&self, spec: &str, range: &Range) {
        let combos = range.iter().map(Hand::to_string).collect::<Vec<_>>().join(" ");
        if self.no_color {
            println!("Range {spec}: {} combos", range.len());
        } else {
            println!(
                "{} {} {} {}",
                "Range".bold().cyan(),
                spec.bold().yellow(),
                range.len().bold().white(),
                "combos".bold().white()
            );
        }
        if !combos.is_empty() {
            println!("{combos}");
        }
    }

    pub fn print_equity(&self, hero: &Hand, board: &[Card], report: &EquityReport) {
        let board = describe_board(board, self.no_color);
        let hero = if self.no_color { hero.to_string() } else { hero.pretty() };
        if self.no_color {
            println!(
                "Hero {} | Board {} | Equity {:.2}% | win {:.2}% tie {:.2}% loss {:.2}% | {} sims over {} combos{}",
                hero,
                board,
                report.equity() * 100.0,
                report.win_probability() * 100.0,
                report.tie_probability() * 100.0,
                report.loss_probability() * 100.0,
                report.simulations(),
                report.combos,
                interrupted_note(report.interrupted)
            );
        } else {
            println!(
                "{} {} {} {} {} {:.2}% {} {}{}",
                "Hero".bold().white(),
                hero.bold().yellow(),
                "Board".bold().white(),
                board.bold().blue(),
                "Equity".bold().green(),
                report.equity() * 100.0,
                report.simulations().dimmed(),
                "sims".dimmed(),
                interrupted_note(report.interrupted).red()
            );
        }
    }

    pub fn print_ev(&self, outcome: &EvOutcome) {
        let unit = unit(&outcome.valuation);
        let action = describe_action(outcome.action, outcome.bet_size);
        let equity = outcome
            .equity
            .map(|equity| format!(" (equity {:.2}%)", equity * 100.0))
            .unwrap_or_default();
        if self.no_color {
            println!(
                "EV of {action}: {:.2} {unit}{equity}{}",
                outcome.ev,
                interrupted_note(outcome.interrupted())
            );
        } else {
            let ev = format!("{:.2}", outcome.ev);
            let ev = if outcome.ev >= 0.0 {
                ev.bold().green().to_string()
            } else {
                ev.bold().red().to_string()
            };
            println!(
                "{} {} {} {}{}{}",
                "EV".bold().cyan(),
                action.bold().yellow(),
                ev,
                unit,
                equity.dimmed(),
                interrupted_note(outcome.interrupted()).red()
            );
        }
    }

    pub fn print_recommendation(&self, recommendation: &Recommendation) {
        for candidate in &recommendation.candidates {
            self.print_ev(candidate);
        }
        let best = describe_action(recommendation.best.action, recommendation.best.bet_size);
        let unit = unit(&recommendation.best.valuation);
        if self.no_color {
            println!(
                "Optimal action: {best} (EV {:.2} {unit}){}",
                recommendation.best.ev,
                interrupted_note(recommendation.interrupted)
            );
        } else {
            println!(
                "{} {} {:.2} {}{}",
                "Optimal".bold().magenta(),
                best.bold().green(),
                recommendation.best.ev,
                unit,
                interrupted_note(recommendation.interrupted).red()
            );
        }
    }

    pub fn print_icm(&self, stacks: &[f64], values: &[f64]) {
        for (seat, (stack, value)) in stacks.iter().zip(values).enumerate() {
            if self.no_color {
                println!("Seat {}: stack {stack:.0} -> ICM {value:.2}", seat + 1);
            } else {
                println!(
                    "{} {} {:.0} {} {:.2}",
                    "Seat".bold().white(),
                    seat + 1,
                    stack,
                    "ICM".bold().cyan(),
                    value
                );
            }
        }
    }
}

fn describe_board(board: &[Card], no_color: bool) -> String {
    if board.is_empty() {
        return "--".to_string();
    }
    board
        .iter()
        .map(|card| if no_color { card.to_string() } else { card.pretty() })
        .collect::<Vec<_>>()
        .join(" ")
}

fn describe_action(action: Action, bet_size: f64) -> String {
    match action {
        Action::Fold => "Fold".to_string(),
        Action::Call => format!("Call {bet_size:.2}"),
        Action::Raise => format!("Raise {bet_size:.2}"),
    }
}

fn unit(valuation: &Valuation) -> &'static str {
    match valuation {
        Valuation::Chips => "chips",
        Valuation::Icm(_) => "$",
    }
}

fn interrupted_note(interrupted: bool) -> &'static str {
    if interrupted { " [interrupted, partial estimate]" } else { "" }
}
