//! CLI configuration loaded from environment variables.
//!
//! Command-line flags take precedence over these values.
//!
//! | Variable            | Default | Description                                  |
//! |---------------------|---------|----------------------------------------------|
//! | `TABULA_LOG_LEVEL`  | `warn`  | tracing filter (trace/debug/info/warn/error) |
//! | `TABULA_DELIMITER`  | `,`     | field delimiter (first byte is used)         |
//! | `TABULA_QUOTE`      | `"`     | quote character (first byte is used)         |
//! | `TABULA_NO_HEADERS` | `false` | treat the first line as data                 |

use tabula_frame::CsvOptions;

/// Runtime configuration for the `tabula` binary.
#[derive(Debug)]
pub struct Config {
    /// Tracing filter string, e.g. `"tabula_frame=debug,warn"`.
    pub log_level: String,

    /// Delimited-file dialect for both input and output.
    pub csv: CsvOptions,
}

impl Config {
    /// Load configuration from environment variables, applying defaults where
    /// a variable is absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = CsvOptions::default();
        Self {
            log_level: env_str("TABULA_LOG_LEVEL", "warn"),
            csv: CsvOptions {
                delimiter: env_byte("TABULA_DELIMITER", defaults.delimiter),
                quote: env_byte("TABULA_QUOTE", defaults.quote),
                has_headers: !env_bool("TABULA_NO_HEADERS"),
            },
        }
    }

    /// Apply a `--delimiter` flag on top of the environment.
    pub fn with_delimiter(mut self, delimiter: Option<char>) -> Self {
        if let Some(d) = delimiter.filter(char::is_ascii) {
            self.csv.delimiter = d as u8;
        }
        self
    }
}

fn env_bool(key: &str) -> bool {
    std::env::var(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false)
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_byte(key: &str, default: u8) -> u8 {
    match std::env::var(key).ok().as_deref() {
        Some("\\t") | Some("tab") => b'\t',
        Some(v) => v.bytes().next().unwrap_or(default),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::from_env();
        assert!(!cfg.log_level.is_empty());
        assert_ne!(cfg.csv.delimiter, 0);
    }

    #[test]
    fn env_override_applied() {
        std::env::set_var("TABULA_QUOTE", "'");
        let cfg = Config::from_env();
        assert_eq!(cfg.csv.quote, b'\'');
        std::env::remove_var("TABULA_QUOTE");
    }

    #[test]
    fn tab_alias_and_flag_override() {
        assert_eq!(env_byte("TABULA_TEST_UNSET_DELIMITER", b','), b',');
        std::env::set_var("TABULA_TEST_TAB_DELIMITER", "tab");
        assert_eq!(env_byte("TABULA_TEST_TAB_DELIMITER", b','), b'\t');
        std::env::remove_var("TABULA_TEST_TAB_DELIMITER");

        let cfg = Config::from_env().with_delimiter(Some(';'));
        assert_eq!(cfg.csv.delimiter, b';');
        let cfg = Config::from_env().with_delimiter(Some('é'));
        assert_ne!(cfg.csv.delimiter, 0xE9);
    }
}
