use std::collections::HashMap;

use colored::{ColoredString, Colorize};
use once_cell::sync::Lazy;

pub struct PrintPrefix {
    pub text: ColoredString,
    pub padding: usize,
}

impl PrintPrefix {
    pub fn formatted(&self) -> String {
        format!("[{}]{:width$}", self.text, "", width = self.padding)
    }
}

static PREFIXES: Lazy<HashMap<&'static str, PrintPrefix>> = Lazy::new(|| {
    HashMap::from([
        (
            "info",
            PrintPrefix {
                text: "Info".bright_green(),
                padding: 4,
            },
        ),
        (
            "moved",
            PrintPrefix {
                text: "Moved".yellow(),
                padding: 3,
            },
        ),
        (
            "error",
            PrintPrefix {
                text: "Error".bright_red(),
                padding: 3,
            },
        ),
    ])
});

pub fn prefix(tag_name: &str) -> String {
    PREFIXES
        .get(tag_name)
        .map_or_else(|| tag_name.to_string(), |tag| tag.formatted())
}

/// Prints a prefixed status line and mirrors it to the log. `to_stderr` is set
/// when stdout carries the JSON result.
pub fn print_status(tag_name: &str, message: &str, to_stderr: bool) {
    let line = format!("{}{}", prefix(tag_name), message);
    if to_stderr {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
    log::info!("{}", message);
}

#[macro_export]
macro_rules! println_error {
    ($($arg:tt)*) => {{
        eprintln!("{}", format!("{}{}", $crate::misc::prefix("error"), format!($($arg)*)));
        log::error!($($arg)*);
    }}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> String {
        String::from_utf8(strip_ansi_escapes::strip(s)).unwrap()
    }

    #[test]
    fn test_known_prefixes_are_padded_to_same_width() {
        assert_eq!(plain(&prefix("info")), "[Info]    ");
        assert_eq!(plain(&prefix("moved")), "[Moved]   ");
        assert_eq!(plain(&prefix("error")), "[Error]   ");
    }

    #[test]
    fn test_unknown_prefix_is_passed_through() {
        assert_eq!(prefix("whatever"), "whatever");
    }
}
