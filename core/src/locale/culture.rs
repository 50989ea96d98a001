//! Number formatting cultures.

use super::LocaleError;

/// Separators used when rendering numbers for a culture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Culture {
    pub name: &'static str,
    pub decimal_separator: char,
    pub group_separator: char,
}

const CULTURES: &[Culture] = &[
    Culture { name: "en-US", decimal_separator: '.', group_separator: ',' },
    Culture { name: "en-GB", decimal_separator: '.', group_separator: ',' },
    Culture { name: "fr-FR", decimal_separator: ',', group_separator: '\u{202f}' },
    Culture { name: "de-DE", decimal_separator: ',', group_separator: '.' },
    Culture { name: "es-ES", decimal_separator: ',', group_separator: '.' },
    Culture { name: "it-IT", decimal_separator: ',', group_separator: '.' },
    Culture { name: "pt-BR", decimal_separator: ',', group_separator: '.' },
    Culture { name: "ja-JP", decimal_separator: '.', group_separator: ',' },
    Culture { name: "zh-CN", decimal_separator: '.', group_separator: ',' },
];

impl Culture {
    /// The culture used when no locale is given.
    pub fn default_culture() -> &'static Culture {
        &CULTURES[0]
    }

    /// Render `value` with `decimals` fractional digits and grouped thousands.
    pub fn format_number(&self, value: f64, decimals: usize) -> String {
        // Midpoints round away from zero, unlike `format!`.
        let scale = 10f64.powi(decimals.min(15) as i32);
        let rounded = (value * scale).round() / scale;
        let rendered = format!("{:.*}", decimals, rounded.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (rendered.as_str(), None),
        };

        let mut out = String::with_capacity(rendered.len() + int_part.len() / 3 + 1);
        if value.is_sign_negative() && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
            out.push('-');
        }
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(digit);
        }
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }
}

/// Find a culture by name, case-insensitively.
pub fn lookup_culture(name: &str) -> Result<&'static Culture, LocaleError> {
    CULTURES
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| LocaleError::UnknownLocale(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_groups_thousands() {
        let us = Culture::default_culture();
        assert_eq!(us.format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(us.format_number(-1234.5, 0), "-1,235");
        assert_eq!(us.format_number(-0.001, 2), "0.00");
        assert_eq!(us.format_number(12.0, 3), "12.000");
    }

    #[test]
    fn test_culture_separators() {
        let de = lookup_culture("de-de").unwrap();
        assert_eq!(de.format_number(1234.5, 1), "1.234,5");
        let fr = lookup_culture("fr-FR").unwrap();
        assert_eq!(fr.format_number(1234.5, 1), "1\u{202f}234,5");
    }

    #[test]
    fn test_unknown_culture() {
        assert_eq!(
            lookup_culture("xx-XX").unwrap_err().to_string(),
            "xx-XX is not a valid locale"
        );
    }
}
