/// Parse and syntax-check a glob pattern given to `--watch` or `--ignore`.
///
/// The pattern is compiled with `globset` so typos such as an unclosed `[`
/// are reported at argument parsing time instead of silently matching
/// nothing.
///
/// # Examples
///
/// Valid patterns: `*`, `*.js`, `src/**/*.css`, `*.{html,css}`
/// Invalid patterns: `[abc`, `a{b`, ""
///
/// # Errors
///
/// Returns an error message if the pattern is empty or malformed.
pub fn parse_glob_pattern(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Pattern cannot be empty".to_string());
    }

    globset::Glob::new(s).map_err(|e| format!("Invalid glob pattern '{}': {}", s, e.kind()))?;

    Ok(s.to_string())
}
