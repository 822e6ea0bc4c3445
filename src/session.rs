//! Session environment: temp directory and path variable expansion
//!
//! Working-directory strings pass through [`Session::expand`] before use, so
//! callers can reference environment variables as `${NAME}`. Unknown
//! variables are left verbatim rather than erased, which keeps a typo
//! visible in the resulting path instead of silently collapsing it.

use std::path::PathBuf;

/// Environment provider for an extraction run
pub trait Session: Send + Sync {
    /// Directory used as the working directory when the spec names none
    fn temp_dir(&self) -> PathBuf;

    /// Expand variable references in a path string
    fn expand(&self, input: &str) -> String;
}

/// Session backed by the current process environment
///
/// `temp_dir` is the OS temp directory; `expand` resolves `${NAME}`
/// references against process environment variables.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessSession;

impl Session for ProcessSession {
    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }

    fn expand(&self, input: &str) -> String {
        expand_env(input)
    }
}

/// Replace `${NAME}` references with process environment values.
/// Unset variables and unterminated references are left as-is.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
