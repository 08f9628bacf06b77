/// Check a repository name supplied by an extension author.
///
/// Valid names start with an ASCII letter and continue with ASCII letters, digits,
/// `-`, `_` or `.`. Returns `false` for the empty string.
pub fn validate_user_provided_repo_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
