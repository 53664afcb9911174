// Duration parsing for session lifetimes (e.g. "8h", "1d", "1h30m")

use anyhow::Result;

/// Parse a duration expression and return seconds
pub fn parse_duration(expr: &str) -> Result<i64> {
    let expr = expr.trim();
    if expr.is_empty() {
        anyhow::bail!("Duration cannot be empty");
    }

    let mut total_secs = 0i64;
    let mut digits = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let unit_secs = match c {
            'd' => 86400,
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => anyhow::bail!("Invalid duration format: {}", expr),
        };
        let value: i64 = digits
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration format: {}", expr))?;
        total_secs = value
            .checked_mul(unit_secs)
            .and_then(|secs| total_secs.checked_add(secs))
            .ok_or_else(|| anyhow::anyhow!("Duration too large: {}", expr))?;
        digits.clear();
    }

    // Trailing number without a unit
    if !digits.is_empty() {
        anyhow::bail!("Invalid duration format: {} (missing unit: d, h, m or s)", expr);
    }

    if total_secs == 0 {
        anyhow::bail!("Duration must be greater than 0");
    }

    Ok(total_secs)
}
