//! Text canonicalization and color classification.
//!
//! Replies quote their root message in whatever formatting the host chose to
//! render, so roots and replies are only ever compared through [`Canonicalizer::text_key`].

/// Pure helpers the engine relies on. Same input, same output.
pub trait Canonicalizer {
    /// Formatting-independent comparison key for message text.
    fn text_key(&self, text: &str) -> String;

    /// Whether a CSS color value is a light color.
    fn is_light(&self, color: &str) -> bool;
}

/// Default canonicalizer.
///
/// Keys are the lowercased alphanumeric words of the entity-decoded text,
/// joined by single spaces. Punctuation, emphasis and ellipses vanish.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCanonicalizer;

impl Canonicalizer for TextCanonicalizer {
    fn text_key(&self, text: &str) -> String {
        let decoded = html_escape::decode_html_entities(text);
        let mut key = String::with_capacity(decoded.len());

        for word in decoded
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            if !key.is_empty() {
                key.push(' ');
            }
            key.extend(word.chars().flat_map(char::to_lowercase));
        }

        key
    }

    fn is_light(&self, color: &str) -> bool {
        // Unparseable colors count as light
        parse_color(color).map_or(true, |(r, g, b)| yiq_brightness(r, g, b) >= 128)
    }
}

/// Tags whose boundaries separate words when rendered.
const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "blockquote", "pre", "h1", "h2", "h3", "h4", "h5", "h6",
    "tr", "td", "th", "hr",
];

/// Remove markup tags, keeping text content.
///
/// Block-level tags become a single space, inline tags disappear, so
/// `al<b>pha</b>` reads as `alpha` and `a<br>b` as `a b`.
pub fn strip_html_tags(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            // Unterminated tag, keep it as text
            out.push_str(&rest[start..]);
            return out;
        };

        let tag = &rest[start + 1..start + len];
        if is_block_tag(tag) {
            out.push(' ');
        }
        rest = &rest[start + len + 1..];
    }

    out.push_str(rest);
    out
}

fn is_block_tag(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

/// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` and `rgba(r, g, b, a)`.
fn parse_color(color: &str) -> Option<(u8, u8, u8)> {
    let color = color.trim().to_ascii_lowercase();

    if let Some(hex) = color.strip_prefix('#') {
        if !hex.is_ascii() {
            return None;
        }
        return match hex.len() {
            3 => {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .ok()
                        .map(|v| v * 17)
                };
                Some((channel(0)?, channel(1)?, channel(2)?))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some((channel(0)?, channel(2)?, channel(4)?))
            }
            _ => None,
        };
    }

    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let mut channels = inner.split(',').map(|c| c.trim().parse::<f32>().ok());
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    let clamp = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Some((clamp(r), clamp(g), clamp(b)))
}

fn yiq_brightness(r: u8, g: u8, b: u8) -> u32 {
    (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_key_ignores_formatting() {
        let c = TextCanonicalizer;
        assert_eq!(c.text_key("Deploy  the *Alpha* build!"), "deploy the alpha build");
        assert_eq!(c.text_key("deploy the alpha build..."), "deploy the alpha build");
        assert_eq!(c.text_key("Deploy the alpha build…"), "deploy the alpha build");
    }

    #[test]
    fn test_text_key_decodes_entities() {
        let c = TextCanonicalizer;
        assert_eq!(c.text_key("Tom &amp; Jerry&#39;s"), c.text_key("Tom & Jerry's"));
    }

    #[test]
    fn test_text_key_is_deterministic() {
        let c = TextCanonicalizer;
        let text = "Ünïcode Straße 42";
        assert_eq!(c.text_key(text), c.text_key(text));
        assert_eq!(c.text_key(text), "ünïcode straße 42");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(strip_html_tags("<p>hello <b>wor</b>ld</p>"), " hello world ");
        assert_eq!(strip_html_tags("a<br/>b"), "a b");
        assert_eq!(strip_html_tags("plain"), "plain");
        assert_eq!(strip_html_tags("1 < 2"), "1 < 2");
    }

    #[test]
    fn test_stripped_root_matches_reference_text() {
        let c = TextCanonicalizer;
        let root = strip_html_tags("<p>Ship <strong>v2.1</strong> today?</p>");
        assert_eq!(c.text_key(&root), c.text_key("Ship v2.1 today?"));
    }

    #[test]
    fn test_is_light() {
        let c = TextCanonicalizer;
        assert!(c.is_light("rgb(255, 255, 255)"));
        assert!(c.is_light("#fff"));
        assert!(!c.is_light("rgb(47, 49, 54)"));
        assert!(!c.is_light("#1e1e1e"));
        assert!(!c.is_light("rgba(20, 20, 20, 0.9)"));
        assert!(c.is_light("transparent"));
    }
}
