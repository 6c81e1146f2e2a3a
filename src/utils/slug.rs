// src/utils/slug.rs

/// Derives a URL-safe slug from a human-readable name.
///
/// Lowercases the input, drops everything that is not an ASCII letter, digit,
/// whitespace or hyphen, and collapses whitespace/hyphen runs into a single
/// hyphen with none at the ends. Pure and deterministic; uniqueness is
/// enforced by the UNIQUE column, not here.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' {
            pending_separator = true;
        }
        // Any other character is stripped outright.
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::slugify;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(slugify("Air Terjun Sekumpul"), "air-terjun-sekumpul");
    }

    #[test]
    fn strips_special_characters() {
        assert_eq!(slugify("Festival Panen Raya!!"), "festival-panen-raya");
        assert_eq!(slugify("Kopi & Keripik (Asli)"), "kopi-keripik-asli");
    }

    #[test]
    fn collapses_separator_runs() {
        assert_eq!(slugify("Bukit  --  Sanjaya"), "bukit-sanjaya");
        assert_eq!(slugify("  spasi awal dan akhir  "), "spasi-awal-dan-akhir");
    }

    #[test]
    fn keeps_digits() {
        assert_eq!(slugify("Pos 2 Pendakian Merbabu"), "pos-2-pendakian-merbabu");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(slugify("Café Sérieux"), "caf-srieux");
    }

    #[test]
    fn degenerate_input_yields_empty_slug() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn output_shape_holds() {
        for input in ["Air Terjun", "--a--b--", "A!B@C#1", "Wisata Alam 2025"] {
            let slug = slugify(input);
            assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            assert!(!slug.contains("--"));
            assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }
    }
}
