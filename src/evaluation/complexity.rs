//! Big-O complexity classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::BoundaryError;

/// The complexity classes the evaluator grades against, in growth order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityClass {
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(log n)")]
    Logarithmic,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n²)")]
    Quadratic,
    #[serde(rename = "O(n³)")]
    Cubic,
    #[serde(rename = "O(2ⁿ)")]
    Exponential,
    #[serde(rename = "O(n!)")]
    Factorial,
}

impl ComplexityClass {
    pub const ALL: [ComplexityClass; 8] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Cubic,
        ComplexityClass::Exponential,
        ComplexityClass::Factorial,
    ];

    /// Canonical notation, as used on the wire.
    pub fn notation(&self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n²)",
            ComplexityClass::Cubic => "O(n³)",
            ComplexityClass::Exponential => "O(2ⁿ)",
            ComplexityClass::Factorial => "O(n!)",
        }
    }

    /// Reads a complexity as a student would type it.
    ///
    /// Whitespace and case are ignored, and ASCII exponents are accepted:
    /// `O(n^2)`, `o(N**2)`, `O(2^n)`, `O(nlogn)` and `O(n log(n))` all
    /// resolve to a class.
    pub fn parse(text: &str) -> Option<Self> {
        let key = normalize(text);
        Self::ALL
            .into_iter()
            .find(|class| normalize(class.notation()) == key)
    }
}

/// Collapses a complexity string to a comparison key.
fn normalize(text: &str) -> String {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    compact
        .replace("**", "^")
        .replace("^2", "²")
        .replace("^3", "³")
        .replace("2^n", "2ⁿ")
        .replace("log(n)", "logn")
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.notation())
    }
}

impl FromStr for ComplexityClass {
    type Err = BoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| BoundaryError::UnknownComplexity {
            found: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical() {
        for class in ComplexityClass::ALL {
            assert_eq!(ComplexityClass::parse(class.notation()), Some(class));
        }
    }

    #[test]
    fn test_parse_ascii_spellings() {
        assert_eq!(ComplexityClass::parse("O(n^2)"), Some(ComplexityClass::Quadratic));
        assert_eq!(ComplexityClass::parse("o(N**3)"), Some(ComplexityClass::Cubic));
        assert_eq!(ComplexityClass::parse("O(2^n)"), Some(ComplexityClass::Exponential));
        assert_eq!(ComplexityClass::parse("O(nlogn)"), Some(ComplexityClass::Linearithmic));
        assert_eq!(ComplexityClass::parse("O(log(n))"), Some(ComplexityClass::Logarithmic));
        assert_eq!(ComplexityClass::parse(" O( n ) "), Some(ComplexityClass::Linear));
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(ComplexityClass::parse("O(n^4)"), None);
        assert_eq!(ComplexityClass::parse("linear"), None);
        assert!("O(sqrt n)".parse::<ComplexityClass>().is_err());
    }

    #[test]
    fn test_serde_uses_unicode_notation() {
        let json = serde_json::to_string(&ComplexityClass::Exponential).unwrap();
        assert_eq!(json, "\"O(2ⁿ)\"");
        let class: ComplexityClass = serde_json::from_str("\"O(n²)\"").unwrap();
        assert_eq!(class, ComplexityClass::Quadratic);
    }

    #[test]
    fn test_growth_order() {
        assert!(ComplexityClass::Linear < ComplexityClass::Linearithmic);
        assert!(ComplexityClass::Exponential < ComplexityClass::Factorial);
    }
}
