//! Quantity encoding inside task titles
//!
//! A shopping-list task carries its quantity in the title itself:
//!
//! | Title | Name | Count |
//! |-------|------|-------|
//! | `Milk` | `Milk` | 1 |
//! | `3x Milk` | `Milk` | 3 |
//!
//! Grammar: `(<digits>x )?<name>`. Decoding never fails; a title without the
//! prefix has count 1. A product whose real name starts with `<digits>x `
//! is read as a count prefix. That ambiguity is accepted.

use serde::Serialize;

/// A task title split into product name and quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTitle {
    pub name: String,
    pub count: u32,
}

/// Encodes a quantity and product name into a task title
pub fn encode_title(count: u32, name: &str) -> String {
    if count == 1 {
        name.to_string()
    } else {
        format!("{}x {}", count, name)
    }
}

/// Decodes a task title into product name and quantity
pub fn decode_title(title: &str) -> DecodedTitle {
    match split_count_prefix(title) {
        Some((count, name)) => DecodedTitle {
            name: name.to_string(),
            count,
        },
        None => DecodedTitle {
            name: title.to_string(),
            count: 1,
        },
    }
}

/// Returns `(count, rest)` when the title starts with `<digits>x `
fn split_count_prefix(title: &str) -> Option<(u32, &str)> {
    let digits = title.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }

    let rest = title[digits..].strip_prefix("x ")?;
    // Counts that do not fit are treated as part of the name
    let count = title[..digits].parse().ok()?;
    Some((count, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn decoded(name: &str, count: u32) -> DecodedTitle {
        DecodedTitle {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn decode_plain_title_has_count_one() {
        assert_eq!(decode_title("Milk"), decoded("Milk", 1));
    }

    #[test]
    fn decode_strips_count_prefix() {
        assert_eq!(decode_title("3x Milk"), decoded("Milk", 3));
        assert_eq!(decode_title("12x Eggs, free range"), decoded("Eggs, free range", 12));
    }

    #[test]
    fn encode_omits_prefix_for_single_item() {
        assert_eq!(encode_title(1, "Milk"), "Milk");
        assert_eq!(encode_title(4, "Milk"), "4x Milk");
    }

    #[test]
    fn decode_requires_space_after_x() {
        assert_eq!(decode_title("3xMilk"), decoded("3xMilk", 1));
        assert_eq!(decode_title("3 Milk"), decoded("3 Milk", 1));
        assert_eq!(decode_title("x Milk"), decoded("x Milk", 1));
    }

    #[test]
    fn decode_empty_and_prefix_only_titles() {
        assert_eq!(decode_title(""), decoded("", 1));
        assert_eq!(decode_title("2x "), decoded("", 2));
    }

    #[test]
    fn decode_overflowing_count_keeps_whole_title() {
        let title = "99999999999x Milk";
        assert_eq!(decode_title(title), decoded(title, 1));
    }

    #[test]
    fn ambiguous_name_is_read_as_count() {
        // "7x Lager" the product, not seven lagers
        assert_eq!(decode_title("7x Lager"), decoded("Lager", 7));
    }

    proptest! {
        #[test]
        fn encode_then_decode_recovers_count_and_name(
            count in 1u32..10_000,
            name in "[A-Za-z][A-Za-z0-9 ,.-]{0,30}",
        ) {
            let title = encode_title(count, &name);
            prop_assert_eq!(decode_title(&title), decoded(&name, count));
        }

        #[test]
        fn decode_never_panics(title in ".*") {
            let result = decode_title(&title);
            prop_assert!(result.count >= 1 || title.starts_with('0'));
        }
    }
}
