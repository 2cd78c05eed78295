//! Part number sequences
//!
//! Numbers advance with a successor rule that carries like an odometer over
//! each character class: `"9"` → `"10"`, `"Z"` → `"AA"`, `"AZ"` → `"BA"`.

/// Successor of a part number
///
/// The rightmost ASCII alphanumeric character is incremented. Digits wrap
/// `9` → `0`, letters wrap `z` → `a` and `Z` → `A`, and a wrap carries into
/// the next alphanumeric character to the left. A carry out of the leftmost
/// one inserts a new `1`, `a` or `A` in front of it. Strings without any
/// alphanumeric character get their last character bumped instead.
///
/// # Example
///
/// ```
/// use cutlist::numbering::successor;
///
/// assert_eq!(successor("1"), "2");
/// assert_eq!(successor("99"), "100");
/// assert_eq!(successor("Z"), "AA");
/// assert_eq!(successor("AZ"), "BA");
/// ```
pub fn successor(current: &str) -> String {
    let mut chars: Vec<char> = current.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let alnum: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_ascii_alphanumeric())
        .map(|(i, _)| i)
        .collect();

    if alnum.is_empty() {
        if let Some(last) = chars.last_mut() {
            *last = char::from_u32(*last as u32 + 1).unwrap_or(*last);
        }
        return chars.into_iter().collect();
    }

    for &i in alnum.iter().rev() {
        let (next, carried) = match chars[i] {
            '9' => ('0', true),
            'z' => ('a', true),
            'Z' => ('A', true),
            c => (char::from(c as u8 + 1), false),
        };
        chars[i] = next;
        if !carried {
            return chars.into_iter().collect();
        }
    }

    // Carried out of the leftmost alphanumeric character
    let first = alnum[0];
    let prefix = match chars[first] {
        '0' => '1',
        'a' => 'a',
        _ => 'A',
    };
    chars.insert(first, prefix);
    chars.into_iter().collect()
}

/// Endless sequence of part numbers starting at `"1"` or `"A"`
#[derive(Debug, Clone)]
pub struct PartNumberSequence {
    letters: bool,
    next: String,
}

impl PartNumberSequence {
    /// Start a sequence of digits or letters
    pub fn new(letters: bool) -> Self {
        Self {
            letters,
            next: Self::first(letters).to_string(),
        }
    }

    fn first(letters: bool) -> &'static str {
        if letters { "A" } else { "1" }
    }

    /// Restart at the first number
    pub fn reset(&mut self) {
        self.next = Self::first(self.letters).to_string();
    }
}

impl Iterator for PartNumberSequence {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let following = successor(&self.next);
        Some(std::mem::replace(&mut self.next, following))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_successor() {
        assert_eq!(successor("1"), "2");
        assert_eq!(successor("9"), "10");
        assert_eq!(successor("19"), "20");
        assert_eq!(successor("99"), "100");
    }

    #[test]
    fn test_letter_successor() {
        assert_eq!(successor("A"), "B");
        assert_eq!(successor("Z"), "AA");
        assert_eq!(successor("AZ"), "BA");
        assert_eq!(successor("ZZ"), "AAA");
        assert_eq!(successor("az"), "ba");
        assert_eq!(successor("zz"), "aaa");
    }

    #[test]
    fn test_mixed_successor() {
        assert_eq!(successor("A9"), "B0");
        assert_eq!(successor("Z9"), "AA0");
    }

    #[test]
    fn test_sequence_and_reset() {
        let mut sequence = PartNumberSequence::new(true);
        let first: Vec<String> = sequence.by_ref().take(3).collect();
        assert_eq!(first, vec!["A", "B", "C"]);

        sequence.reset();
        assert_eq!(sequence.next().as_deref(), Some("A"));

        let digits: Vec<String> = PartNumberSequence::new(false).take(11).collect();
        assert_eq!(digits.last().map(String::as_str), Some("11"));
        assert_eq!(digits[9], "10");
    }

    #[test]
    fn test_letters_roll_over_after_z() {
        let letters: Vec<String> = PartNumberSequence::new(true).take(28).collect();
        assert_eq!(letters[25], "Z");
        assert_eq!(letters[26], "AA");
        assert_eq!(letters[27], "AB");
    }
}
