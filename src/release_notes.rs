//! Markdown release notes to the HTML form embedded by the update checker.
//!
//! The consumer places `body` inside a single-quoted string, so the HTML must
//! not contain `'` and arrives already wrapped in quotes.

const LIST_OPEN: &str = "<ul>";
const LIST_CLOSE: &str = "</ul>";

/// CommonMark to HTML. Raw HTML in the notes (`<br>`, `<details>`, ...) is passed
/// through, not escaped.
pub fn render_html(source: &str) -> Result<String, String> {
    let options = markdown::Options {
        compile: markdown::CompileOptions {
            allow_dangerous_html: true,
            allow_dangerous_protocol: true,
            ..markdown::CompileOptions::default()
        },
        ..markdown::Options::default()
    };
    markdown::to_html_with_options(source, &options).map_err(|message| message.to_string())
}

/// Replaces `'` with a backtick and drops one newline on each side of `<ul>` / `</ul>`.
pub fn correct_html(html: &str) -> String {
    let mut corrected = html.replace('\'', "`");
    for tag in [LIST_OPEN, LIST_CLOSE] {
        corrected = corrected
            .replace(&format!("\n{tag}"), tag)
            .replace(&format!("{tag}\n"), tag);
    }
    corrected
}

pub fn quote(html: &str) -> String {
    format!("'{html}'")
}

pub fn convert_body(source: &str) -> Result<String, String> {
    Ok(quote(&correct_html(&render_html(source)?)))
}
