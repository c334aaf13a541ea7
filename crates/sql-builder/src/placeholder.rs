//! Placeholder styles.
//!
//! Dialects spell bind parameters differently. The formatter takes the style
//! as a value so that destinations with different dialects can coexist in one
//! process.

use std::fmt::{self, Write};
use thiserror::Error;

/// Writes the bind parameter for a 1-based argument position.
pub trait Placeholder {
    fn write_placeholder(&self, out: &mut String, position: usize) -> fmt::Result;
}

/// Built-in placeholder styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderFormat {
    /// `?` (MySQL, SQLite)
    Question,
    /// `$1`, `$2`, ... (PostgreSQL)
    #[default]
    Dollar,
    /// `:1`, `:2`, ... (Oracle)
    Colon,
    /// `@p1`, `@p2`, ... (SQL Server)
    AtP,
}

impl Placeholder for PlaceholderFormat {
    fn write_placeholder(&self, out: &mut String, position: usize) -> fmt::Result {
        match self {
            Self::Question => out.write_char('?'),
            Self::Dollar => write!(out, "${position}"),
            Self::Colon => write!(out, ":{position}"),
            Self::AtP => write!(out, "@p{position}"),
        }
    }
}

impl fmt::Display for PlaceholderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question => write!(f, "question"),
            Self::Dollar => write!(f, "dollar"),
            Self::Colon => write!(f, "colon"),
            Self::AtP => write!(f, "atp"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid placeholder format '{0}'. Expected 'question', 'dollar', 'colon' or 'atp'")]
pub struct ParsePlaceholderError(String);

impl std::str::FromStr for PlaceholderFormat {
    type Err = ParsePlaceholderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "question" | "?" => Ok(Self::Question),
            "dollar" | "$" => Ok(Self::Dollar),
            "colon" | ":" => Ok(Self::Colon),
            "atp" | "@p" => Ok(Self::AtP),
            _ => Err(ParsePlaceholderError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: PlaceholderFormat, position: usize) -> String {
        let mut out = String::new();
        format.write_placeholder(&mut out, position).unwrap();
        out
    }

    #[test]
    fn test_default_is_dollar() {
        assert_eq!(PlaceholderFormat::default(), PlaceholderFormat::Dollar);
    }

    #[test]
    fn test_write_placeholder() {
        assert_eq!(render(PlaceholderFormat::Question, 3), "?");
        assert_eq!(render(PlaceholderFormat::Dollar, 3), "$3");
        assert_eq!(render(PlaceholderFormat::Colon, 3), ":3");
        assert_eq!(render(PlaceholderFormat::AtP, 3), "@p3");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "dollar".parse::<PlaceholderFormat>().unwrap(),
            PlaceholderFormat::Dollar
        );
        assert_eq!(
            "Question".parse::<PlaceholderFormat>().unwrap(),
            PlaceholderFormat::Question
        );
        assert_eq!(
            "@p".parse::<PlaceholderFormat>().unwrap(),
            PlaceholderFormat::AtP
        );
        assert!("percent".parse::<PlaceholderFormat>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for format in [
            PlaceholderFormat::Question,
            PlaceholderFormat::Dollar,
            PlaceholderFormat::Colon,
            PlaceholderFormat::AtP,
        ] {
            assert_eq!(format.to_string().parse::<PlaceholderFormat>().unwrap(), format);
        }
    }
}
