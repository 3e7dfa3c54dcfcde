//! Web UI themes and the stylesheet fragment each one embeds.
use std::fmt;
use std::str::FromStr;

use super::TypeConstraintError;

const STANDARD_CSS: &str = r#"<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.4.1/css/bootstrap-theme.min.css" crossorigin="anonymous">"#;

const ADAPTIVE_CSS: &str = r#"<link rel="stylesheet" href="https://stackpath.bootstrapcdn.com/bootswatch/3.4.1/darkly/bootstrap.min.css" media="(prefers-color-scheme: dark)" crossorigin="anonymous">
<link rel="stylesheet" href="https://maxcdn.bootstrapcdn.com/bootstrap/3.4.1/css/bootstrap-theme.min.css" media="(prefers-color-scheme: light), (prefers-color-scheme: no-preference)" crossorigin="anonymous">"#;

const FLATLY_CSS: &str = r#"<link rel="stylesheet" href="https://stackpath.bootstrapcdn.com/bootswatch/3.4.1/flatly/bootstrap.min.css" crossorigin="anonymous">"#;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Theme {
    Standard,
    /// Follows the browser's light/dark preference.
    Adaptive,
    Flatly,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Standard => "standard",
            Theme::Adaptive => "adaptive",
            Theme::Flatly => "flatly",
        }
    }

    pub fn css(&self) -> ThemeCss {
        match self {
            Theme::Standard => ThemeCss(STANDARD_CSS),
            Theme::Adaptive => ThemeCss(ADAPTIVE_CSS),
            Theme::Flatly => ThemeCss(FLATLY_CSS),
        }
    }
}

impl FromStr for Theme {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(Theme::Standard),
            "adaptive" => Ok(Theme::Adaptive),
            "flatly" => Ok(Theme::Flatly),
            _ => Err(TypeConstraintError::UnknownTheme),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Markup to embed in the page `<head>`; trusted, not escaped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThemeCss(&'static str);

impl ThemeCss {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ThemeCss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_distinct_css() {
        let standard = "standard".parse::<Theme>().unwrap().css();
        let adaptive = "adaptive".parse::<Theme>().unwrap().css();
        let flatly = "flatly".parse::<Theme>().unwrap().css();

        for css in [standard, adaptive, flatly] {
            assert!(!css.as_str().is_empty());
        }
        assert_ne!(standard, adaptive);
        assert_ne!(standard, flatly);
        assert_ne!(adaptive, flatly);
    }

    #[test]
    fn css_is_deterministic() {
        assert_eq!(Theme::Flatly.css(), Theme::Flatly.css());
        assert!(Theme::Flatly.css().as_str().contains("flatly"));
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(matches!(
            "darkly".parse::<Theme>(),
            Err(TypeConstraintError::UnknownTheme)
        ));
        assert!("Standard".parse::<Theme>().is_err());
    }
}
