//! Image slug encodings used in share URLs.
//!
//! The invisible style writes each byte of the slug as four zero-width characters,
//! two bits per character, so the link path looks empty when pasted into chat.

use entity::user::UrlStyle;

/// Zero-width characters indexed by the two-bit value they encode.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}'];

/// Renders a slug in the requested URL style.
pub fn encode_slug(slug: &str, style: UrlStyle) -> String {
    match style {
        UrlStyle::Default => slug.to_string(),
        UrlStyle::Invisible => slug
            .bytes()
            .flat_map(|byte| {
                [6, 4, 2, 0].map(|shift| ZERO_WIDTH[((byte >> shift) & 0b11) as usize])
            })
            .collect(),
    }
}

/// Recovers the plain slug from either URL style.
///
/// Returns `None` when the input mixes zero-width and visible characters, has a
/// length that is not a whole number of encoded bytes, or decodes to something
/// other than ASCII alphanumerics.
pub fn decode_slug(input: &str) -> Option<String> {
    let invisible = input.chars().filter(|c| ZERO_WIDTH.contains(c)).count();
    let total = input.chars().count();

    if invisible == 0 {
        return is_valid_slug(input).then(|| input.to_string());
    }
    if invisible != total || total % 4 != 0 {
        return None;
    }

    let values: Vec<u8> = input
        .chars()
        .filter_map(|c| ZERO_WIDTH.iter().position(|z| *z == c))
        .map(|idx| idx as u8)
        .collect();

    let decoded: String = values
        .chunks(4)
        .map(|chunk| chunk.iter().fold(0u8, |acc, bits| (acc << 2) | bits) as char)
        .collect();

    is_valid_slug(&decoded).then_some(decoded)
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric())
}
