pub mod http;

/// Ten-cell bar for a 0..=100 value, e.g. `▰▰▰▰▰▰▰▱▱▱ 70%`.
pub fn progress_bar(percentage: u32) -> String {
    let percentage = percentage.min(100);
    let filled = (percentage / 10) as usize;
    format!("{}{} {}%", "▰".repeat(filled), "▱".repeat(10 - filled), percentage)
}

/// Name shown to other users: `@username` when present, else the first name.
pub fn display_name(username: Option<&str>, first_name: &str) -> String {
    match username {
        Some(u) if !u.is_empty() => format!("@{}", u),
        _ if !first_name.is_empty() => first_name.to_string(),
        _ => "Anonymous".to_string(),
    }
}
