//! Passenger discount categories.

use std::fmt;

/// Error returned when parsing an unknown passenger category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown passenger category: {0:?}")]
pub struct UnknownPassengerCategory(pub String);

/// The rider's fare category.
///
/// Each category maps to exactly one discount fraction applied to transit
/// fares (taxi fares are never discounted):
///
/// | Category | Discount |
/// |----------|----------|
/// | General  | 0.0      |
/// | Student  | 0.5      |
/// | Teacher  | 0.5      |
/// | Elderly  | 1.0      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PassengerCategory {
    #[default]
    General,
    Student,
    Teacher,
    Elderly,
}

impl PassengerCategory {
    /// All categories, in table order.
    pub const ALL: [PassengerCategory; 4] = [
        PassengerCategory::General,
        PassengerCategory::Student,
        PassengerCategory::Teacher,
        PassengerCategory::Elderly,
    ];

    /// Fraction of the transit fare waived for this category.
    pub fn discount(&self) -> f64 {
        match self {
            PassengerCategory::General => 0.0,
            PassengerCategory::Student => 0.5,
            PassengerCategory::Teacher => 0.5,
            PassengerCategory::Elderly => 1.0,
        }
    }

    /// Parse a category name.
    ///
    /// Accepts the Turkish names used by the web client (`"Genel"`,
    /// `"Ogrenci"`, `"Ogretmen"`, `"65+"`, with or without diacritics) as
    /// well as the English names. Matching is case-insensitive.
    pub fn parse(s: &str) -> Result<Self, UnknownPassengerCategory> {
        match s.trim().to_lowercase().as_str() {
            "genel" | "general" => Ok(PassengerCategory::General),
            "ogrenci" | "öğrenci" | "student" => Ok(PassengerCategory::Student),
            "ogretmen" | "öğretmen" | "teacher" => Ok(PassengerCategory::Teacher),
            "65+" | "yaşlı" | "yasli" | "elderly" => Ok(PassengerCategory::Elderly),
            _ => Err(UnknownPassengerCategory(s.to_string())),
        }
    }

    /// English name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PassengerCategory::General => "general",
            PassengerCategory::Student => "student",
            PassengerCategory::Teacher => "teacher",
            PassengerCategory::Elderly => "elderly",
        }
    }
}

impl fmt::Display for PassengerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_table() {
        assert_eq!(PassengerCategory::General.discount(), 0.0);
        assert_eq!(PassengerCategory::Student.discount(), 0.5);
        assert_eq!(PassengerCategory::Teacher.discount(), 0.5);
        assert_eq!(PassengerCategory::Elderly.discount(), 1.0);
    }

    #[test]
    fn discounts_are_fractions() {
        for category in PassengerCategory::ALL {
            let d = category.discount();
            assert!((0.0..=1.0).contains(&d), "{category}: {d}");
        }
    }

    #[test]
    fn parse_turkish_names() {
        assert_eq!(PassengerCategory::parse("Genel").unwrap(), PassengerCategory::General);
        assert_eq!(PassengerCategory::parse("Ogrenci").unwrap(), PassengerCategory::Student);
        assert_eq!(PassengerCategory::parse("Öğretmen").unwrap(), PassengerCategory::Teacher);
        assert_eq!(PassengerCategory::parse("65+").unwrap(), PassengerCategory::Elderly);
    }

    #[test]
    fn parse_english_names() {
        for category in PassengerCategory::ALL {
            assert_eq!(PassengerCategory::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn parse_unknown() {
        let err = PassengerCategory::parse("pilot").unwrap_err();
        assert_eq!(err.to_string(), "unknown passenger category: \"pilot\"");
    }

    #[test]
    fn default_is_general() {
        assert_eq!(PassengerCategory::default(), PassengerCategory::General);
    }
}
