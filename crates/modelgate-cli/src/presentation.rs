//! Table formatting utilities for CLI output.

/// Truncates a string to a maximum length, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use modelgate_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        // The cut must land on a char boundary; service names are not ASCII-only.
        let budget = max_len.saturating_sub(3);
        let cut = s
            .char_indices()
            .map(|(at, _)| at)
            .take_while(|at| *at <= budget)
            .last()
            .unwrap_or(0);
        format!("{}...", &s[..cut])
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}
