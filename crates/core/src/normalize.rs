/// Options controlling phone-number normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Minimum digits a value must contain to count as a phone number.
    pub min_digits: usize,
    /// Canonical length; longer inputs keep only their trailing digits,
    /// which drops country and trunk prefixes.
    pub significant_digits: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        NormalizeOptions {
            min_digits: 7,
            significant_digits: 10,
        }
    }
}

impl NormalizeOptions {
    /// Set the minimum digit count
    #[must_use]
    pub fn with_min_digits(mut self, min_digits: usize) -> Self {
        self.min_digits = min_digits;
        self
    }

    /// Set the canonical digit length
    #[must_use]
    pub fn with_significant_digits(mut self, significant_digits: usize) -> Self {
        self.significant_digits = significant_digits;
        self
    }
}

/// Reduce a raw cell value to the canonical digits-only form used as the
/// deduplication key.
///
/// Returns `None` when the value does not contain enough digits to be a
/// phone number under the given options. Normalization is idempotent:
/// feeding a result back in returns it unchanged.
#[must_use]
pub fn normalize(raw: &str, options: &NormalizeOptions) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < options.min_digits {
        return None;
    }
    if digits.len() > options.significant_digits {
        Some(digits[digits.len() - options.significant_digits..].to_string())
    } else {
        Some(digits)
    }
}
