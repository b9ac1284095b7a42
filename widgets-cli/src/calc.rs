use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::info;
use widgets_core::{Calculator, Config, Theme, Widget, calculator::keymap};

/// Number of columns the display is right-aligned to.
const WIDTH: usize = 24;

pub fn run_keys(keys: &str, steps: bool) -> anyhow::Result<()> {
    let mut calc = Calculator::new();
    let mut out = io::stdout().lock();

    feed(&mut calc, keys, steps, &mut out)?;
    if !steps {
        paint(&calc, &mut out)?;
    }
    Ok(())
}

/// Reads lines from stdin until EOF or `quit`.
pub fn repl(steps: bool) -> anyhow::Result<()> {
    let mut calc = Calculator::new();
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    let theme = Config::load()?.theme(Widget::Calculator);

    writeln!(out, "{}", banner(theme))?;
    paint(&calc, &mut out)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if matches!(line.trim(), "quit" | "exit" | "q") {
            break;
        }

        feed(&mut calc, &line, steps, &mut out)?;
        if !steps {
            paint(&calc, &mut out)?;
        }
    }

    info!("calculator session ended");
    Ok(())
}

fn banner(theme: Theme) -> String {
    format!(
        "[{} theme] digits . + - * / = | c clear, < delete, ~ sign \
         (or: dot clear backspace sign equals), quit to exit",
        theme.label_for(Widget::Calculator)
    )
}

fn feed(calc: &mut Calculator, line: &str, steps: bool, out: &mut impl Write) -> io::Result<()> {
    for input in keymap::parse_keys(line) {
        calc.apply(input);
        if steps {
            paint(calc, &mut *out)?;
        }
    }
    Ok(())
}

fn paint(calc: &Calculator, out: &mut impl Write) -> io::Result<()> {
    let display = calc.display();
    writeln!(out, "{:>WIDTH$}", display.expression)?;
    writeln!(out, "{:>WIDTH$}", display.result)?;
    writeln!(out, "{}", "-".repeat(WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_paint_after_every_key() {
        let mut calc = Calculator::new();
        let mut out = Vec::new();

        feed(&mut calc, "1+2=", true, &mut out).expect("write to vec");

        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.lines().count(), 4 * 3);
        assert!(text.lines().any(|l| l.trim() == "1 +"));
        assert_eq!(calc.display().result, "3");
    }

    #[test]
    fn banner_names_stored_theme() {
        assert!(banner(Theme::Light).starts_with("[light theme]"));
        assert!(banner(Theme::default()).starts_with("[dark theme]"));
    }

    #[test]
    fn paint_right_aligns() {
        let mut out = Vec::new();
        paint(&Calculator::new(), &mut out).expect("write to vec");

        let text = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], format!("{:>WIDTH$}", "0"));
    }
}
