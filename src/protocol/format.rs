//! Line formatting for protocol output.

use std::io::{self, Write};

use crate::event::BattleEvent;
use crate::present::Presenter;
use crate::roster::{Side, UnitSnapshot};

/// `party 1 Fighter 30/36 alive`
pub fn roster_line(side: Side, index: usize, unit: &UnitSnapshot) -> String {
    format!(
        "{} {} {} {}/{} {}",
        side.label(),
        index + 1,
        unit.name,
        unit.health,
        unit.max_health,
        if unit.alive { "alive" } else { "dead" }
    )
}

/// `log Fighter hits Imp for 8.`
pub fn log_line(event: &BattleEvent) -> String {
    format!("log {}", event)
}

/// Writes protocol lines to any writer.
///
/// The presenter interface cannot fail, so the first write error is kept
/// and later writes are skipped until it is taken.
pub struct LineWriter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W) -> Self {
        LineWriter { out, error: None }
    }

    /// Writes one line.
    pub fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", text) {
            self.error = Some(e);
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for LineWriter<W> {
    fn log(&mut self, event: &BattleEvent) {
        self.line(&log_line(event));
    }

    fn snapshot(&mut self, party: &[UnitSnapshot], enemies: &[UnitSnapshot]) {
        for (i, unit) in party.iter().enumerate() {
            self.line(&roster_line(Side::Party, i, unit));
        }
        for (i, unit) in enemies.iter().enumerate() {
            self.line(&roster_line(Side::Enemy, i, unit));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(name: &str, health: u32, max_health: u32) -> UnitSnapshot {
        UnitSnapshot {
            name: name.to_string(),
            health,
            max_health,
            alive: health > 0,
        }
    }

    #[test]
    fn roster_lines_are_one_based() {
        assert_eq!(
            roster_line(Side::Enemy, 0, &snap("Imp", 0, 18)),
            "enemy 1 Imp 0/18 dead"
        );
        assert_eq!(
            roster_line(Side::Party, 2, &snap("W. Mage", 24, 24)),
            "party 3 W. Mage 24/24 alive"
        );
    }

    #[test]
    fn presenter_writes_lines() {
        let mut w = LineWriter::new(Vec::new());
        w.log(&BattleEvent::BattleStarted);
        w.snapshot(&[snap("Fighter", 36, 36)], &[snap("Imp", 18, 18)]);
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            "log A battle begins!\nparty 1 Fighter 36/36 alive\nenemy 1 Imp 18/18 alive\n"
        );
    }
}
