/// Escape text for use in HTML element content and quoted attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns the URL when it is safe to place in `src`/`href`: http(s),
/// protocol-relative excluded, root-relative or scheme-less relative paths.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    if url.is_empty() || url.starts_with("//") || url.chars().any(char::is_control) {
        return None;
    }
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(url);
    }
    // A colon before any path separator means a scheme (javascript:, data:, ...).
    let scheme_end = url.find(':');
    let path_start = url.find(['/', '?', '#']);
    match (scheme_end, path_start) {
        (None, _) => Some(url),
        (Some(colon), Some(slash)) if slash < colon => Some(url),
        _ => None,
    }
}

const INLINE_IMAGE_TYPES: [&str; 5] = ["png", "jpeg", "jpg", "gif", "webp"];

/// Like [`safe_url`], but also accepts base64 `data:` URLs of raster image
/// types, which is how listing photos are inlined into the page. Only valid
/// for `<img src>`.
pub fn safe_image_src(url: &str) -> Option<&str> {
    if let Some(url) = safe_url(url) {
        return Some(url);
    }
    let url = url.trim();
    let (head, body) = url.split_once(',')?;
    let media_type = head
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .and_then(|_| head[5..].strip_suffix(";base64"))?
        .to_ascii_lowercase();
    let subtype = media_type.strip_prefix("image/")?;
    let body_ok = !body.is_empty()
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='));
    (INLINE_IMAGE_TYPES.contains(&subtype) && body_ok).then_some(url)
}

/// Keep only the characters a `tel:` URI needs.
pub fn tel_digits(phone: &str) -> Option<String> {
    let trimmed = phone.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter(char::is_ascii_digit));
    if out.trim_start_matches('+').is_empty() {
        None
    } else {
        Some(out)
    }
}
