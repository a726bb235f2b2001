use regex::Regex;
use storyteller_error::{StorageError, StorageErrorKind, StorytellerResult};

/// Directory-safe identifier for a title.
///
/// Lowercases the title, replaces every run of characters outside `[a-z0-9]`
/// with a single `-`, and trims leading and trailing dashes.
///
/// # Examples
///
/// ```
/// use storyteller_storage::slugify;
///
/// assert_eq!(slugify("The Red Planet!").unwrap(), "the-red-planet");
/// assert_eq!(slugify("  Mars -- 2049  ").unwrap(), "mars-2049");
/// assert_eq!(slugify("Café").unwrap(), "caf");
/// assert_eq!(slugify("???").unwrap(), "");
/// ```
///
/// # Errors
///
/// Returns [`StorageErrorKind::SlugPattern`] if the separator pattern cannot
/// be compiled.
pub fn slugify(title: &str) -> StorytellerResult<String> {
    let separators = Regex::new("[^a-z0-9]+")
        .map_err(|e| StorageError::new(StorageErrorKind::SlugPattern(e.to_string())))?;
    let lowered = title.to_lowercase();
    Ok(separators
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_runs_collapse_to_one_dash() {
        assert_eq!(
            slugify("Mars: The 2nd Journey...").unwrap(),
            "mars-the-2nd-journey"
        );
    }

    #[test]
    fn accented_letters_are_separators() {
        assert_eq!(slugify("História do Brasil").unwrap(), "hist-ria-do-brasil");
    }
}
