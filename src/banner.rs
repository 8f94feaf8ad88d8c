//! Animated welcome screen shown when `pytok` is invoked with no arguments.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::thread;
use std::time::Duration;

// ── ASCII logo (PYTOK in box-drawing block font) ──────────────────────────────

const LOGO: &[&str] = &[
    " ██████╗ ██╗   ██╗████████╗ ██████╗ ██╗  ██╗",
    " ██╔══██╗╚██╗ ██╔╝╚══██╔══╝██╔═══██╗██║ ██╔╝",
    " ██████╔╝ ╚████╔╝    ██║   ██║   ██║█████╔╝ ",
    " ██╔═══╝   ╚██╔╝     ██║   ██║   ██║██╔═██╗ ",
    " ██║        ██║      ██║   ╚██████╔╝██║  ██╗",
    " ╚═╝        ╚═╝      ╚═╝    ╚═════╝ ╚═╝  ╚═╝",
];

// ── Token kind catalogue ───────────────────────────────────────────────────────

const KINDS: &[(&str, &str, &str)] = &[
    ("INDENT/DEDENT", "indentation levels", "if x:\\n    y"),
    ("NEWLINE/NL", "semantic vs. non-semantic line breaks", "(a +\\n b)"),
    ("FSTRING_*", "f-/t-string template pieces and holes", "f\"hi {name}\""),
    ("NUMBER", "int, float, complex, and radix literals", "0x1F, 3.14j"),
    ("OP", "operators, brackets, and punctuation", "+= -> := ..."),
    ("IDENTIFIER", "Unicode XID_Start/XID_Continue names", "café = 1"),
    ("COMMENT", "# to end of line", "x = 1  # note"),
    ("ENDMARKER", "exactly one, terminating every stream", ""),
];

// ── Helpers ───────────────────────────────────────────────────────────────────

#[inline]
fn sleep(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}

#[inline]
fn flush() {
    let _ = io::stdout().flush();
}

#[inline]
fn hide_cursor() {
    print!("\x1b[?25l");
    flush();
}

#[inline]
fn show_cursor() {
    print!("\x1b[?25h");
    flush();
}

/// Print without a trailing newline and flush immediately.
macro_rules! pf {
    ($($arg:tt)*) => {{
        print!($($arg)*);
        flush();
    }};
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Display the welcome screen.  Animates when stdout is a TTY; falls back to a
/// plain static print otherwise (e.g. piped output, CI, `--no-color` envs).
pub fn show_welcome() {
    if io::stdout().is_terminal() {
        // Restore cursor if we panic mid-animation.
        let _ = std::panic::catch_unwind(animated_welcome);
        show_cursor();
    } else {
        static_welcome();
    }
}

// ── Animated path (TTY) ───────────────────────────────────────────────────────

fn animated_welcome() {
    hide_cursor();

    // ── spinner intro ─────────────────────────────────────────────────────────
    let frames = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    for (i, frame) in frames.iter().enumerate() {
        pf!(
            "\r  {}  {}",
            frame.cyan().bold(),
            "Scanning for Python sources…".truecolor(120, 120, 120)
        );
        sleep(if i < 3 { 90 } else { 55 });
    }
    pf!("\r{}\r", " ".repeat(60));

    println!();

    // ── logo lines (revealed top-to-bottom) ───────────────────────────────────
    for (i, line) in LOGO.iter().enumerate() {
        let coloured = match i {
            0 | 5 => line.truecolor(20, 90, 160).bold(),
            1 | 4 => line.truecolor(30, 120, 200).bold(),
            _ => line.truecolor(60, 160, 230).bold(),
        };
        println!("  {coloured}");
        sleep(35);
    }

    println!();

    // ── tagline (character-by-character typing effect) ────────────────────────
    let version = env!("CARGO_PKG_VERSION");
    let tagline = format!("🐍  Byte-faithful Python tokenizer  —  v{version}");

    pf!("  ");
    for ch in tagline.chars() {
        pf!("{}", ch.to_string().white().bold());
        sleep(15);
    }
    println!();
    println!();

    // ── horizontal divider ────────────────────────────────────────────────────
    let rule = "─".repeat(70);
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();
    sleep(60);

    // ── token kinds ───────────────────────────────────────────────────────────
    println!("  {}", "Token kinds".bold().underline());
    println!();

    for (kind, desc, example) in KINDS {
        pf!(
            "    {} ",
            kind.to_string().on_truecolor(40, 40, 40).cyan().bold()
        );
        pf!("  {:<24}", desc.white().bold());
        if !example.is_empty() {
            pf!("  {}", format!("# {example}").truecolor(90, 90, 90));
        }
        println!();
        sleep(50);
    }

    println!();

    // ── divider ───────────────────────────────────────────────────────────────
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();
    sleep(40);

    // ── usage ─────────────────────────────────────────────────────────────────
    println!("  {}", "Usage".bold().underline());
    println!();

    let cmds: &[(&str, &str)] = &[
        ("pytok file.py --tokenize", "print one line per token"),
        ("pytok src/ lib/ --tokenize", "tokenize specific paths"),
        ("pytok . --json", "walk a directory, emit JSON status"),
        ("pytok --exclude tests,vendor", "skip directories by name"),
        ("pytok --no-exit-code", "always exit 0  (useful in CI)"),
    ];

    for (cmd, desc) in cmds {
        println!(
            "    {}  {}",
            format!("{cmd:<40}").green().bold(),
            desc.truecolor(120, 120, 120),
        );
        sleep(35);
    }

    println!();

    // ── closing divider ───────────────────────────────────────────────────────
    println!("  {}", rule.truecolor(60, 60, 60));
    println!();

    show_cursor();
}

// ── Static / non-TTY path ─────────────────────────────────────────────────────

fn static_welcome() {
    let version = env!("CARGO_PKG_VERSION");

    for line in LOGO {
        println!("  {line}");
    }

    println!();
    println!("  pytok v{version}  —  Byte-faithful Python tokenizer");
    println!();
    println!("  Token kinds:");
    for (kind, desc, _example) in KINDS {
        println!("    {kind}  {desc}");
    }
    println!();
    println!("  Usage:  pytok [PATH …] [OPTIONS]");
    println!("          pytok file.py --tokenize      print one token per line");
    println!("          pytok . --json                 directory-walk JSON status");
    println!("          pytok --exclude tests,vendor   skip directories by name");
    println!("          pytok --help                   full help text");
    println!();
}
