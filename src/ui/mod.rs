use anyhow::Error;
use std::io::{self, IsTerminal, Write};
use unicode_width::UnicodeWidthStr;

use crate::core::{Report, ScriptFinding};

pub const NOTHING_TO_DO: &str = "No init scripts found. Nothing needs to be done.";

const ADVISORY: &[&str] = &[
    "Once support for SysV init scripts is removed from the operating system:",
    "- `service <name>` and `rc<name>` no longer work for services that only ship an init script.",
    "- `insserv` and `chkconfig` no longer enable or disable anything.",
    "- The before-local, after-local and halt-local systemd units are removed, so boot.local, after.local and halt.local are no longer executed.",
];

const INDENT: &str = "  ";

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub wrap_width: usize,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn eprintln_error(err: &Error) {
    let color = io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    let line = format!("error: {err:#}");
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "{}", paint(&line, Tone::Red, color));
}

pub fn print_report(report: &Report, cfg: &UiConfig) {
    if cfg.quiet {
        return;
    }

    let text = format_report(report, cfg);
    let mut out = io::stdout().lock();
    let _ = out.write_all(text.as_bytes());
}

pub fn format_report(report: &Report, cfg: &UiConfig) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();

    if report.scripts.is_empty() {
        let _ = writeln!(out, "{NOTHING_TO_DO}");
    } else {
        let _ = writeln!(
            out,
            "Found {} init script(s) in {}, {} need action.",
            report.summary.script_count,
            report.directory,
            report.summary.action_needed_count
        );
        for script in &report.scripts {
            let _ = writeln!(out);
            write_script(&mut out, script, cfg);
        }
    }

    if cfg.verbose {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "System: {} {} (generated {})",
            report.os.name, report.os.version, report.generated_at
        );
        for note in &report.summary.notes {
            let _ = writeln!(out, "- {note}");
        }
    }

    let _ = writeln!(out);
    for line in ADVISORY {
        let _ = writeln!(out, "{}", paint(line, Tone::Yellow, cfg.color));
    }

    out
}

fn write_script(out: &mut String, script: &ScriptFinding, cfg: &UiConfig) {
    use std::fmt::Write as _;

    let _ = writeln!(out, "{}", paint(&script.path, Tone::Bold, cfg.color));
    let _ = writeln!(
        out,
        "{INDENT}Package: {}",
        script.package.as_deref().unwrap_or("")
    );
    let _ = writeln!(out, "{INDENT}Origin:  {}", script.origin);

    let tone = if script.remediation.action_needed {
        Tone::Red
    } else {
        Tone::Green
    };
    let width = cfg.wrap_width.saturating_sub(INDENT.len());
    for line in wrap_text(&script.remediation.text, width) {
        let _ = writeln!(out, "{INDENT}{}", paint(&line, tone, cfg.color));
    }
}

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_w = 0usize;
        for word in paragraph.split_whitespace() {
            let w = UnicodeWidthStr::width(word);
            if current.is_empty() {
                current.push_str(word);
                current_w = w;
            } else if current_w + 1 + w <= width {
                current.push(' ');
                current.push_str(word);
                current_w += 1 + w;
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
                current_w = w;
            }
        }
        lines.push(current);
    }

    lines
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Red,
    Green,
    Yellow,
    Bold,
}

fn paint(s: &str, tone: Tone, color: bool) -> String {
    if !color {
        return s.to_string();
    }

    let code = match tone {
        Tone::Red => "31",
        Tone::Green => "32",
        Tone::Yellow => "33",
        Tone::Bold => "1",
    };
    format!("\x1b[{code}m{s}\x1b[0m")
}
