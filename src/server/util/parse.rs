/// Parses a human-readable byte size such as `50MB`, `512 KB` or `1024`.
///
/// Accepts the suffixes `B`, `KB`, `MB` and `GB` (case-insensitive, binary multiples).
/// A bare number is taken as bytes.
///
/// # Arguments
/// - `value` - The string to parse
///
/// # Returns
/// - `Ok(u64)` - Size in bytes
/// - `Err(String)` - Reason the value could not be parsed
pub fn parse_byte_size(value: &str) -> Result<u64, String> {
    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let number: u64 = number
        .parse()
        .map_err(|_| format!("'{}' does not start with a number", value))?;

    let multiplier: u64 = match unit.trim().to_ascii_uppercase().as_str() {
        "" | "B" => 1,
        "KB" => 1024,
        "MB" => 1024 * 1024,
        "GB" => 1024 * 1024 * 1024,
        other => return Err(format!("unknown size unit '{}'", other)),
    };

    number
        .checked_mul(multiplier)
        .ok_or_else(|| format!("'{}' is too large", value))
}
