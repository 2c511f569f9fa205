//! Output formatting for CLI

use crate::{pipeline::TrainingResult, world::GridWorld};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format a count with its share of the total
pub fn format_share(count: u64, rate: f64) -> String {
    format!("{} ({:.1}%)", format_number(count), rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Print the outcome breakdown of a run
pub fn print_result(result: &TrainingResult) {
    let ratio = result
        .citizen_to_empty_ratio
        .map(|r| format!("{r:.3}"))
        .unwrap_or_else(|| "n/a".to_string());
    print_stats_table(&[
        ("Motion", result.motion.to_string()),
        ("Ticks", format_number(result.total_ticks)),
        (
            "Onto citizen",
            format_share(result.citizen_moves, result.citizen_move_rate),
        ),
        (
            "Onto empty",
            format_share(result.empty_moves, result.empty_move_rate),
        ),
        ("Stayed", format_share(result.stays, result.stay_rate)),
        (
            "Collisions",
            format_share(result.collisions, result.collision_rate),
        ),
        ("Citizen/empty", ratio),
        ("Mean reward", format!("{:.4}", result.mean_reward)),
        ("Table entries", format_number(result.table_entries as u64)),
        ("States visited", format_number(result.states_visited as u64)),
    ]);
}

/// Render the board as text, one row per line, with a border.
pub fn render_board(world: &GridWorld) -> String {
    let width = world.dimensions().width();
    let border = format!("+{}+", "-".repeat(width));
    let mut out = String::with_capacity((width + 3) * (world.dimensions().height() + 2));
    out.push_str(&border);
    out.push('\n');
    for line in world.to_string().lines() {
        out.push('|');
        out.push_str(line);
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}
