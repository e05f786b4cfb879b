//! Terminal output primitives for the pbgen CLI.

use console::style;

/// Palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const YELLOW: Color = Color::Color256(220);
    pub const GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}"; // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}"; // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}"; // ◉
    pub const TRIANGLE: &str = "\u{25B8}"; // ▸
    pub const DOT: &str = "\u{00B7}"; // ·
}

/// Print the compact version header
pub fn header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style("pbgen").fg(colors::CYAN).bold(),
        style(version).dim()
    );
    println!();
}

pub fn success(msg: &str) {
    println!("  {} {}", style(symbols::TARGET_FILLED).fg(colors::GREEN), msg);
}

pub fn info(msg: &str) {
    println!("  {} {}", style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN), msg);
}

/// Non-fatal compiler finding
pub fn warning(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::YELLOW),
        style(msg).fg(colors::YELLOW)
    );
}

/// Header printed before a diagnostic
pub fn failure_header() {
    println!();
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA).bold(),
        style("Schema rejected.").fg(colors::MAGENTA).bold()
    );
    println!();
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// One line per generated file
pub fn file_line(path: &str, is_last: bool) {
    let connector = if is_last {
        "\u{2570}\u{2500}\u{2500}" // ╰──
    } else {
        "\u{251C}\u{2500}\u{2500}" // ├──
    };
    println!(
        "  {}  {}",
        style(connector).fg(colors::DIM),
        style(path).fg(colors::CYAN)
    );
}

/// One line per collection: name, field count, dialect
pub fn collection_line(name: &str, fields: usize, dialect: &str) {
    println!(
        "  {}   {:24} {:>3} fields {} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(name).bold(),
        fields,
        symbols::DOT,
        style(dialect).dim()
    );
}

pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}

/// Pluralize a count: `1 field`, `2 fields`
pub fn count(n: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", n, if n == 1 { singular } else { plural })
}
