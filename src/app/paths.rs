use std::path::{Component, Path, PathBuf};

/// Path of `target` relative to `base`; both are expected to be absolute.
pub fn relative_to(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = base.components().collect();
    let target: Vec<Component<'_>> = target.components().collect();
    let common = base.iter().zip(&target).take_while(|(a, b)| a == b).count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for part in &target[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// `./`-prefixed form of [`relative_to`].
pub fn dot_relative(base: &Path, target: &Path) -> PathBuf {
    Path::new(".").join(relative_to(base, target))
}
