use once_cell::sync::Lazy;
use regex::Regex;

// `[^\r\n]` rather than `.`: the regex crate's `.` matches `\r`.
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^\r\n]*?)\*\*").expect("valid bold pattern"));
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^\r\n]*?)\*").expect("valid italic pattern"));

/// Apply the lightweight markdown-like substitutions used for chat bubbles.
///
/// `**x**` becomes `<strong>x</strong>`, then `*x*` becomes `<em>x</em>`, then
/// every newline becomes `<br>`. Markers never pair across a line break. The
/// italic pass runs over what bold left behind, so a stray `**` reads as an
/// empty italic run. No other escaping is performed.
pub fn format_message(content: &str) -> String {
    let bolded = BOLD.replace_all(content, "<strong>${1}</strong>");
    let italic = ITALIC.replace_all(&bolded, "<em>${1}</em>");
    italic.replace('\n', "<br>")
}
