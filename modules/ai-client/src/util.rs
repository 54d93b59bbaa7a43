/// Longest prefix of `s` that is at most `max_bytes` long and ends on a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}

/// The JSON object inside a free-text model reply.
///
/// Drops markdown fences and any prose around the outermost `{ ... }`. Text without braces is
/// returned trimmed so the caller's parse error shows what came back.
pub fn json_payload(reply: &str) -> &str {
    let unfenced = reply
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
