//! Patient contact deep links.

use reqwest::Url;

/// Build a WhatsApp chat link for a phone number and greeting text.
///
/// The phone is reduced to its digits; returns `None` when nothing is left.
pub fn whatsapp_link(phone: &str, greeting: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let url = Url::parse_with_params(&format!("https://wa.me/{digits}"), [("text", greeting)]).ok()?;
    Some(url.to_string())
}
