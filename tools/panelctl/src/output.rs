//! Human and JSON output for panelctl

use anyhow::Result;
use colored::*;
use panel_model::{Breaker, ConflictResult, PositionInfo};
use panel_store::{BreakerWrite, MigrationReport, Panel};
use serde::Serialize;

/// Prints results either as colored text or as pretty JSON
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn classification(&self, info: &PositionInfo) -> Result<()> {
        if self.json {
            return self.print_json(info);
        }
        let status = if info.valid {
            "valid".green()
        } else {
            "invalid".red()
        };
        println!(
            "{:<10} {:<8} {:<13} {}",
            info.normalized.bright_yellow(),
            status,
            info.kind.name(),
            info.description
        );
        Ok(())
    }

    pub fn panels(&self, panels: &[Panel]) -> Result<()> {
        if self.json {
            return self.print_json(panels);
        }
        if panels.is_empty() {
            println!("{}", "No panels".yellow());
            return Ok(());
        }
        for panel in panels {
            println!("{:>4}  {}", panel.id, panel.name);
        }
        Ok(())
    }

    pub fn panel(&self, panel: &Panel) -> Result<()> {
        if self.json {
            return self.print_json(panel);
        }
        println!(
            "{} Panel {} created: {}",
            "OK".green(),
            panel.id,
            panel.name.bright_yellow()
        );
        Ok(())
    }

    pub fn breakers(&self, breakers: &[Breaker]) -> Result<()> {
        if self.json {
            return self.print_json(breakers);
        }
        if breakers.is_empty() {
            println!("{}", "No breakers".yellow());
            return Ok(());
        }
        println!(
            "{}",
            format!(
                "{:>4}  {:<10} {:>5} {:>5}  {:<4} {}",
                "ID", "POSITION", "AMPS", "POLES", "ON", "LABEL"
            )
            .bright_cyan()
        );
        for breaker in breakers {
            println!("{}", breaker_line(breaker));
        }
        Ok(())
    }

    pub fn write(&self, write: &BreakerWrite) -> Result<()> {
        if self.json {
            return self.print_json(write);
        }
        if write.sibling.is_some() {
            println!("{} Combined tandem split into two breakers", "OK".green());
        } else {
            println!("{} Breaker saved", "OK".green());
        }
        for breaker in write.records() {
            println!("{}", breaker_line(breaker));
        }
        Ok(())
    }

    pub fn conflict(&self, position: &str, result: &ConflictResult) -> Result<()> {
        if self.json {
            return self.print_json(result);
        }
        match result {
            ConflictResult::Ok => {
                println!("{} {} is free", "OK".green(), position.bright_yellow());
            },
            ConflictResult::ExactDuplicate { position } => {
                println!(
                    "{} {} is already in use",
                    "CONFLICT".red(),
                    position.bright_yellow()
                );
            },
            ConflictResult::RangeOverlap {
                conflicting_position,
                conflicting_slot,
            } => {
                println!(
                    "{} slot {} is bonded by {}",
                    "CONFLICT".red(),
                    conflicting_slot,
                    conflicting_position.bright_yellow()
                );
            },
        }
        Ok(())
    }

    pub fn migration(&self, report: &MigrationReport) -> Result<()> {
        if self.json {
            return self.print_json(report);
        }
        println!(
            "{} Panel {}: {} combined tandem(s) split",
            "OK".green(),
            report.panel_id,
            report.migrated
        );
        for skipped in &report.skipped {
            println!(
                "  {} breaker {} ({}): {}",
                "SKIPPED".yellow(),
                skipped.breaker_id,
                skipped.position,
                skipped.reason
            );
        }
        Ok(())
    }

    pub fn deleted(&self, id: i64) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "deleted": id }));
        }
        println!("{} Breaker {} deleted", "OK".green(), id);
        Ok(())
    }
}

/// One table row for a breaker
pub fn breaker_line(breaker: &Breaker) -> String {
    let on = if breaker.is_on { "on" } else { "off" };
    format!(
        "{:>4}  {:<10} {:>5} {:>5}  {:<4} {}",
        breaker.id, breaker.position, breaker.amperage, breaker.poles, on, breaker.label
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaker_line() {
        let breaker = Breaker {
            id: 12,
            panel_id: 1,
            position: "14A".to_string(),
            amperage: 20,
            poles: 1,
            label: "Kitchen (A)".to_string(),
            circuit_type: "general".to_string(),
            protection_type: "standard".to_string(),
            is_on: false,
            notes: None,
            sort_order: 0,
        };

        assert_eq!(
            breaker_line(&breaker),
            "  12  14A           20     1  off  Kitchen (A)"
        );
    }
}
