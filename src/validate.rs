//! Validation rule for task fields.
//!
//! Every submission passes through [`validate`] before it can enter the
//! model. The title is checked exhaustively before the description is
//! looked at, and only the first violation is reported.

use thiserror::Error;

/// Minimum title length in characters.
pub const TITLE_MIN: usize = 5;
/// Maximum title length in characters.
pub const TITLE_MAX: usize = 15;
/// Minimum description length in characters.
pub const DESC_MIN: usize = 5;
/// Maximum description length in characters.
pub const DESC_MAX: usize = 30;

/// The input field a [`ValidationError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

/// A rejected submission. The `Display` form is the user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must be at least 5 characters long")]
    TitleTooShort,
    #[error("Title must be no more than 15 characters long")]
    TitleTooLong,
    #[error("Title can only include letters, numbers, and spaces")]
    TitleInvalidChar,
    #[error("Description must be at least 5 characters long")]
    DescriptionTooShort,
    #[error("Description must be no more than 30 characters long")]
    DescriptionTooLong,
}

impl ValidationError {
    /// Which form field the violation belongs to.
    pub fn field(&self) -> Field {
        match self {
            Self::TitleTooShort | Self::TitleTooLong | Self::TitleInvalidChar => Field::Title,
            Self::DescriptionTooShort | Self::DescriptionTooLong => Field::Description,
        }
    }
}

/// Check a proposed title/description pair.
///
/// Length limits count Unicode scalars, not bytes. Checks run in a fixed
/// order: title too short, title too long, title character set, then the
/// description lengths. A title violation masks any description violation.
///
/// # Errors
///
/// Returns the first failing check's [`ValidationError`].
pub fn validate(title: &str, description: &str) -> Result<(), ValidationError> {
    let title_chars = title.chars().count();
    if title_chars < TITLE_MIN {
        return Err(ValidationError::TitleTooShort);
    }
    if title_chars > TITLE_MAX {
        return Err(ValidationError::TitleTooLong);
    }
    if !title.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(ValidationError::TitleInvalidChar);
    }

    let desc_chars = description.chars().count();
    if desc_chars < DESC_MIN {
        return Err(ValidationError::DescriptionTooShort);
    }
    if desc_chars > DESC_MAX {
        return Err(ValidationError::DescriptionTooLong);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GOOD_DESC: &str = "Milk eggs and bread";

    #[test]
    fn accepts_representative_pair() {
        assert_eq!(validate("Buy Groceries", GOOD_DESC), Ok(()));
    }

    #[test]
    fn accepts_boundary_title_lengths() {
        assert_eq!(validate("abcde", GOOD_DESC), Ok(()));
        assert_eq!(validate("a".repeat(15).as_str(), GOOD_DESC), Ok(()));
    }

    #[test]
    fn accepts_boundary_description_lengths() {
        assert_eq!(validate("Buy Milk", "abcde"), Ok(()));
        assert_eq!(validate("Buy Milk", "d".repeat(30).as_str()), Ok(()));
    }

    #[test]
    fn rejects_short_title_with_message() {
        let err = validate("Wash", GOOD_DESC).unwrap_err();
        assert_eq!(err, ValidationError::TitleTooShort);
        assert_eq!(err.to_string(), "Title must be at least 5 characters long");
        assert_eq!(err.field(), Field::Title);
    }

    #[test]
    fn rejects_long_title_with_message() {
        let err = validate("Reorganise the garage", GOOD_DESC).unwrap_err();
        assert_eq!(err, ValidationError::TitleTooLong);
        assert_eq!(
            err.to_string(),
            "Title must be no more than 15 characters long"
        );
    }

    #[test]
    fn rejects_punctuation_in_title() {
        let err = validate("Buy milk!", GOOD_DESC).unwrap_err();
        assert_eq!(err, ValidationError::TitleInvalidChar);
        assert_eq!(
            err.to_string(),
            "Title can only include letters, numbers, and spaces"
        );
    }

    #[test]
    fn rejects_non_ascii_letters_in_title() {
        // Charset is exactly [A-Za-z0-9 ]; accented letters are out.
        assert_eq!(
            validate("Caf\u{e9} run", GOOD_DESC),
            Err(ValidationError::TitleInvalidChar)
        );
    }

    #[test]
    fn rejects_tab_and_newline_in_title() {
        assert_eq!(
            validate("Buy\tmilk", GOOD_DESC),
            Err(ValidationError::TitleInvalidChar)
        );
        assert_eq!(
            validate("Buy\nmilk", GOOD_DESC),
            Err(ValidationError::TitleInvalidChar)
        );
    }

    #[test]
    fn length_checks_precede_charset_check() {
        // Four characters including one invalid: too-short wins.
        assert_eq!(validate("ab!c", GOOD_DESC), Err(ValidationError::TitleTooShort));
    }

    #[test]
    fn rejects_short_description_with_message() {
        let err = validate("Buy Milk", "abcd").unwrap_err();
        assert_eq!(err, ValidationError::DescriptionTooShort);
        assert_eq!(
            err.to_string(),
            "Description must be at least 5 characters long"
        );
        assert_eq!(err.field(), Field::Description);
    }

    #[test]
    fn rejects_long_description_with_message() {
        let err = validate("Buy Milk", "d".repeat(31).as_str()).unwrap_err();
        assert_eq!(err, ValidationError::DescriptionTooLong);
        assert_eq!(
            err.to_string(),
            "Description must be no more than 30 characters long"
        );
    }

    #[test]
    fn title_violation_masks_description_violation() {
        assert_eq!(validate("Hi", "x"), Err(ValidationError::TitleTooShort));
        assert_eq!(
            validate("Buy milk!", ""),
            Err(ValidationError::TitleInvalidChar)
        );
    }

    #[test]
    fn description_length_counts_chars_not_bytes() {
        // 30 multi-byte characters are within the limit.
        let desc: String = "\u{e9}".repeat(30);
        assert_eq!(validate("Buy Milk", &desc), Ok(()));
        let desc: String = "\u{e9}".repeat(31);
        assert_eq!(
            validate("Buy Milk", &desc),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    proptest! {
        #[test]
        fn any_valid_pair_passes(
            title in "[a-zA-Z0-9 ]{5,15}",
            desc in ".{5,30}",
        ) {
            prop_assert_eq!(validate(&title, &desc), Ok(()));
        }

        #[test]
        fn short_titles_always_rejected(
            title in "[a-zA-Z0-9 ]{0,4}",
            desc in ".{5,30}",
        ) {
            prop_assert_eq!(validate(&title, &desc), Err(ValidationError::TitleTooShort));
        }

        #[test]
        fn long_titles_always_rejected(
            title in "[a-zA-Z0-9 ]{16,40}",
            desc in ".{5,30}",
        ) {
            prop_assert_eq!(validate(&title, &desc), Err(ValidationError::TitleTooLong));
        }

        #[test]
        fn invalid_char_always_rejected(
            prefix in "[a-zA-Z0-9 ]{2,7}",
            bad in "[!-/:-@\\[-`{-~]",
            suffix in "[a-zA-Z0-9 ]{2,7}",
        ) {
            // Lengths 5..=15, exactly one character outside the charset.
            let title = format!("{prefix}{bad}{suffix}");
            prop_assert_eq!(
                validate(&title, "Milk eggs and bread"),
                Err(ValidationError::TitleInvalidChar)
            );
        }

        #[test]
        fn short_descriptions_always_rejected(desc in ".{0,4}") {
            prop_assert_eq!(
                validate("Buy Milk", &desc),
                Err(ValidationError::DescriptionTooShort)
            );
        }

        #[test]
        fn long_descriptions_always_rejected(desc in ".{31,64}") {
            prop_assert_eq!(
                validate("Buy Milk", &desc),
                Err(ValidationError::DescriptionTooLong)
            );
        }
    }
}
