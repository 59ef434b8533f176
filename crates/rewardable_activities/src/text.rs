//! Chat text helpers: `&` colour codes and `{placeholder}` expansion.

/// Section sign used by game clients to introduce a formatting code.
pub const COLOR_CHAR: char = '§';

const COLOR_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRr";

/// Replaces `&` followed by a valid colour or format code with the section
/// sign and the lower-cased code.
///
/// An `&` that is not followed by a valid code is left as typed, so
/// `"Fish & Chips"` survives untouched.
///
/// # Examples
///
/// ```rust
/// use rewardable_activities::text::translate_color_codes;
///
/// assert_eq!(translate_color_codes("&cStop &Lnow"), "§cStop §lnow");
/// assert_eq!(translate_color_codes("Fish & Chips"), "Fish & Chips");
/// ```
pub fn translate_color_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match chars.peek() {
            Some(&code) if ch == '&' && COLOR_CODES.contains(code) => {
                out.push(COLOR_CHAR);
                out.push(code.to_ascii_lowercase());
                chars.next();
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Replaces every `{name}` in `template` with its value from `values`.
///
/// Unknown placeholders are kept verbatim.
pub fn expand_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
