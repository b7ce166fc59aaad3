//! Utils for conversions

use rug::Integer;

/// String to `u64` conversion (hexadecimal, as used by the generator parameter files)
pub fn str_to_u64(s: &str) -> u64 {
    u64::from_str_radix(s, 16).unwrap_or_else(|_| panic!("Incorrect value: {}", s))
}

/// Hexadecimal string to arbitrary-precision integer conversion
pub fn str_to_integer(s: &str) -> Integer {
    Integer::from_str_radix(s.trim(), 16).unwrap_or_else(|_| panic!("Incorrect value: {}", s))
}

/// Concatenates a list of arrays into one array
///
/// # Examples
/// ```rust
/// let a = [1, 2];
/// let b = [3, 4];
/// let a_and_b = concatenate(&[&a, &b]);
/// assert_eq!(a_and_b, [1, 2, 3, 4]);
/// ```
pub fn concatenate(arrays: &[&[u8]]) -> Vec<u8> {
    let mut result = vec![];
    for &array in arrays {
        result.extend(array);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_to_u64_parses_hex() {
        assert_eq!(str_to_u64("ff"), 255);
        assert_eq!(str_to_u64("0"), 0);
        assert_eq!(str_to_u64("100"), 256);
    }

    #[test]
    #[should_panic(expected = "Incorrect value")]
    fn str_to_u64_panics_on_non_hex_input() {
        str_to_u64("not-hex");
    }

    #[test]
    fn str_to_integer_parses_hex_and_trims_whitespace() {
        assert_eq!(str_to_integer("  ff\n"), Integer::from(255));
        assert_eq!(str_to_integer("10"), Integer::from(16));
    }

    #[test]
    fn str_to_integer_handles_values_wider_than_a_u64() {
        let huge = "1".repeat(40); // 40 hex 1s, well past 64 bits
        let expected = (Integer::from(1) << (4 * 40)) - Integer::from(1);
        let expected = Integer::from(&expected / 15);
        assert_eq!(str_to_integer(&huge), expected);
    }

    #[test]
    fn concatenate_joins_arrays_in_order() {
        let a = [1u8, 2];
        let b = [3u8, 4];
        assert_eq!(concatenate(&[&a, &b]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn concatenate_of_no_arrays_is_empty() {
        let empty: Vec<u8> = concatenate(&[]);
        assert!(empty.is_empty());
    }
}
