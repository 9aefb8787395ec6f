use crate::RefError;

/// Validate a branch name: rejects names starting with `.`, ending with
/// `.lock`, or containing `^`, `~`, `/`, `..`, or `@{`.
///
/// Unlike a full `git-check-ref-format` name, branch names here are flat:
/// a `/` is always rejected rather than treated as a hierarchy separator.
pub fn validate_branch_name(name: &str) -> Result<(), RefError> {
    if name.is_empty() {
        return Err(RefError::InvalidBranchName("name is empty".into()));
    }
    if name.starts_with('.') {
        return Err(RefError::InvalidBranchName(format!("'{name}' starts with '.'")));
    }
    if name.ends_with(".lock") {
        return Err(RefError::InvalidBranchName(format!("'{name}' ends with '.lock'")));
    }
    for bad in ["^", "~", "/", "..", "@{"] {
        if name.contains(bad) {
            return Err(RefError::InvalidBranchName(format!("'{name}' contains '{bad}'")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_name() {
        assert!(validate_branch_name("main").is_ok());
        assert!(validate_branch_name("feature-x").is_ok());
    }

    #[test]
    fn rejects_leading_dot() {
        assert!(validate_branch_name(".hidden").is_err());
    }

    #[test]
    fn rejects_lock_suffix() {
        assert!(validate_branch_name("main.lock").is_err());
    }

    #[test]
    fn rejects_slash() {
        assert!(validate_branch_name("feature/sub").is_err());
    }

    #[test]
    fn rejects_caret_tilde_dotdot_atbrace() {
        assert!(validate_branch_name("a^b").is_err());
        assert!(validate_branch_name("a~b").is_err());
        assert!(validate_branch_name("a..b").is_err());
        assert!(validate_branch_name("a@{0}").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(validate_branch_name("").is_err());
    }
}
