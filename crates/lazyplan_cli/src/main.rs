//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lazyplan_core` linkage.
//! - Resolve an optional time phrase against the local clock.

fn main() {
    println!("lazyplan_core ping={}", lazyplan_core::ping());
    println!("lazyplan_core version={}", lazyplan_core::core_version());

    let phrase = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if phrase.trim().is_empty() {
        return;
    }

    let now = chrono::Local::now();
    let resolved = lazyplan_core::resolve_time_detailed(&phrase, &now);
    println!(
        "lazyplan_core resolved={} rule={}",
        resolved.instant.format("%Y-%m-%d %H:%M:%S %:z"),
        resolved.rule.as_str()
    );
}
