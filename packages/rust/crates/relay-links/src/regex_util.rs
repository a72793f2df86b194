use regex::Regex;

/// Compile a hardcoded pattern; an invalid pattern degrades to one that never matches.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(compile_err) => {
            tracing::error!(pattern, error = %compile_err, "invalid built-in regex pattern");
            match Regex::new(r"$^") {
                Ok(fallback) => fallback,
                Err(fallback_err) => {
                    panic!("hardcoded fallback regex must compile: {fallback_err}")
                }
            }
        }
    }
}
