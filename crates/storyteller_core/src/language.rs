//! Output language selection.

/// Language the story and image descriptions are written in.
///
/// # Examples
///
/// ```
/// use storyteller_core::Language;
///
/// assert_eq!(Language::from_region_code(Some("pt-BR")), Language::BrazilianPortuguese);
/// assert_eq!(Language::from_region_code(Some("de")), Language::English);
/// assert_eq!(Language::from_region_code(None).to_string(), "English");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum Language {
    /// Default output language
    #[default]
    #[display("English")]
    English,
    /// Selected by `pt`, `pt-br` or `pt_br`
    #[display("Brazilian Portuguese")]
    BrazilianPortuguese,
}

impl Language {
    /// Map a `LANGUAGE` setting to an output language. Unknown codes fall back to English.
    pub fn from_region_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_lowercase()).as_deref() {
            Some("pt-br" | "pt_br" | "pt") => Language::BrazilianPortuguese,
            _ => Language::English,
        }
    }
}
