//! Argument vector helpers for script entry points.

/// Copy of `args` with the first of `names` that occurs replaced by `new_name`.
///
/// `names` are tried in order and only one occurrence is replaced, e.g.
/// `["--out-dir", "-d"]` renames whichever spelling the caller used.
pub fn replace_argument_name<S: AsRef<str>>(args: &[String], names: &[S], new_name: &str) -> Vec<String> {
    let mut replaced = args.to_vec();
    let position = names
        .iter()
        .find_map(|name| replaced.iter().position(|arg| arg == name.as_ref()));
    if let Some(index) = position {
        replaced[index] = new_name.to_string();
    }
    replaced
}
