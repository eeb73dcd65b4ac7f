//! Plaintext digest rendering.
//!
//! The digest is addressed to a German-speaking mailing list, so the framing
//! text is German. Rendering is pure: the same issues and settings always
//! produce byte-identical output.

use std::fmt::Write;

use crate::config::{DEFAULT_ISSUE_LIMIT, DEFAULT_WRAP_WIDTH};
use crate::github::Issue;

/// Character used for title underlines.
const UNDERLINE_CHAR: char = '•';

/// Horizontal rule framing the issue section.
const RULE: &str = "–––––––––––––––––––––––––––––––––––––––––––––––––––––––";

/// Separator between two rendered issues.
const ISSUE_SEPARATOR: &str = "\n\n\n";

/// Separator between preamble, issues and sign-off.
const SECTION_SEPARATOR: &str = "\n\n";

/// Renders issues into the digest mail body.
#[derive(Debug, Clone, Copy)]
pub struct DigestFormatter {
    limit: usize,
    wrap_width: usize,
}

impl Default for DigestFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_ISSUE_LIMIT, DEFAULT_WRAP_WIDTH)
    }
}

impl DigestFormatter {
    /// Create a formatter that includes at most `limit` issues and wraps
    /// bodies at `wrap_width` characters.
    #[must_use]
    pub const fn new(limit: usize, wrap_width: usize) -> Self {
        Self { limit, wrap_width }
    }

    /// Render the full digest: preamble, the first `limit` issues, sign-off.
    #[must_use]
    pub fn render(&self, issues: &[Issue], browse_url: &str) -> String {
        let rendered = issues
            .iter()
            .take(self.limit)
            .map(|issue| render_issue(issue, self.wrap_width))
            .collect::<Vec<_>>()
            .join(ISSUE_SEPARATOR);

        [preamble(self.limit, browse_url), rendered, sign_off()].join(SECTION_SEPARATOR)
    }

    /// Number of issues that [`render`](Self::render) will include.
    #[must_use]
    pub fn included(&self, available: usize) -> usize {
        available.min(self.limit)
    }
}

fn preamble(limit: usize, browse_url: &str) -> String {
    let mut text = String::new();
    let _ = write!(
        text,
        "Hallo $Menschen,

im Openlab sind in letzter Zeit einige Aufgaben angefallen, die gerne
erledigt werden möchten.

Die letzten {limit} Stück findet ihr hier, den Rest unter
{browse_url}

{RULE}
"
    );
    text
}

fn sign_off() -> String {
    format!("{RULE}\n\nHappy Hacking!\n")
}

/// Render one issue: title, underline, wrapped body, link.
#[must_use]
pub fn render_issue(issue: &Issue, wrap_width: usize) -> String {
    let body = chunk(&normalize_body(&issue.body), wrap_width).join("\n");

    [
        issue.title.clone(),
        format!(" {} ", underline(&issue.title)),
        body,
        issue.html_url.clone(),
    ]
    .join("\n")
}

/// Bullets for a title of `L` characters: `max(0, L - 2)` of them.
#[must_use]
pub fn underline(title: &str) -> String {
    let count = title.chars().count().saturating_sub(2);
    std::iter::repeat(UNDERLINE_CHAR).take(count).collect()
}

/// Replace every carriage return and line feed with a single space.
#[must_use]
pub fn normalize_body(body: &str) -> String {
    body.replace(['\r', '\n'], " ")
}

/// Split `text` into chunks of at most `width` characters.
///
/// This is a plain fixed-width cut that ignores word boundaries. Empty input
/// produces no chunks. A width of zero disables wrapping.
#[must_use]
pub fn chunk(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|piece| piece.iter().collect())
        .collect()
}
