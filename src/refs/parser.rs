// Task reference parsing
//
// Grammar, one reference at a time:
//   <digits>            numeric reference into the default (or --list) list
//   <letter><digits>    lettered reference, e.g. a1, b12
//   <letter> <digits>   the same, split across two tokens
// Letters are lowercase ASCII only.

use super::RefError;

/// A parsed task reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRef {
    pub letter: Option<char>,
    pub number: u32,
}

impl TaskRef {
    pub fn numeric(number: u32) -> Self {
        Self { letter: None, number }
    }

    pub fn lettered(letter: char, number: u32) -> Self {
        Self {
            letter: Some(letter),
            number,
        }
    }

    pub fn has_letter(&self) -> bool {
        self.letter.is_some()
    }
}

impl std::fmt::Display for TaskRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.letter {
            Some(letter) => write!(f, "{}{}", letter, self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// A token that is exactly one lowercase ASCII letter
fn lone_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_lowercase() => Some(c),
        _ => None,
    }
}

/// Parse the digit part of a reference; `token` is what gets reported on failure
fn parse_number(digits: &str, token: &str) -> Result<u32, RefError> {
    let number: u32 = digits
        .parse()
        .map_err(|_| RefError::InvalidReference(token.to_string()))?;
    if number == 0 {
        return Err(RefError::OutOfRange(0));
    }
    Ok(number)
}

/// Parse one reference starting at `args[0]`; returns it with the number of tokens consumed
fn parse_one(args: &[String]) -> Result<(TaskRef, usize), RefError> {
    let token = args.first().ok_or(RefError::ReferenceRequired)?;

    if is_all_digits(token) {
        return Ok((TaskRef::numeric(parse_number(token, token)?), 1));
    }

    if let Some(letter) = lone_letter(token) {
        return match args.get(1) {
            None => Err(RefError::InvalidReference(token.clone())),
            Some(next) if is_all_digits(next) => {
                let number = parse_number(next, &format!("{} {}", token, next))?;
                Ok((TaskRef::lettered(letter, number), 2))
            }
            Some(next) => Err(RefError::InvalidReference(format!("{} {}", token, next))),
        };
    }

    let mut chars = token.chars();
    if let Some(letter) = chars.next().filter(|c| c.is_ascii_lowercase()) {
        let digits = chars.as_str();
        if is_all_digits(digits) {
            return Ok((TaskRef::lettered(letter, parse_number(digits, token)?), 1));
        }
    }

    Err(RefError::InvalidReference(token.clone()))
}

/// Parse exactly one task reference (one or two tokens)
pub fn parse_task_ref(args: &[String]) -> Result<TaskRef, RefError> {
    let (task_ref, consumed) = parse_one(args)?;
    if let Some(extra) = args.get(consumed) {
        return Err(RefError::InvalidReference(extra.clone()));
    }
    Ok(task_ref)
}

/// Parse one or more task references, strictly left to right
pub fn parse_task_refs(args: &[String]) -> Result<Vec<TaskRef>, RefError> {
    if args.is_empty() {
        return Err(RefError::ReferenceRequired);
    }

    let mut refs = Vec::new();
    let mut rest = args;
    while !rest.is_empty() {
        let (task_ref, consumed) = parse_one(rest)?;
        refs.push(task_ref);
        rest = &rest[consumed..];
    }
    Ok(refs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_numeric_reference() {
        let r = parse_task_ref(&args(&["5"])).unwrap();
        assert!(!r.has_letter());
        assert_eq!(r.number, 5);
    }

    #[test]
    fn test_every_digit_token_is_numeric() {
        for n in [1u32, 9, 10, 99, 100, 101, 4096, u32::MAX] {
            let r = parse_task_ref(&args(&[&n.to_string()])).unwrap();
            assert_eq!(r, TaskRef::numeric(n));
        }
    }

    #[test]
    fn test_combined_reference() {
        assert_eq!(parse_task_ref(&args(&["a1"])).unwrap(), TaskRef::lettered('a', 1));
        assert_eq!(parse_task_ref(&args(&["b12"])).unwrap(), TaskRef::lettered('b', 12));
        assert_eq!(parse_task_ref(&args(&["z99"])).unwrap(), TaskRef::lettered('z', 99));
    }

    #[test]
    fn test_separated_reference() {
        assert_eq!(parse_task_ref(&args(&["c", "3"])).unwrap(), TaskRef::lettered('c', 3));
    }

    #[test]
    fn test_lone_letter_without_number_is_invalid() {
        let err = parse_task_ref(&args(&["a"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid task reference: a");
    }

    #[test]
    fn test_no_args_requires_reference() {
        assert!(matches!(parse_task_ref(&[]), Err(RefError::ReferenceRequired)));
        assert!(matches!(parse_task_refs(&[]), Err(RefError::ReferenceRequired)));
    }

    #[test]
    fn test_invalid_reference_message() {
        let err = parse_task_ref(&args(&["abc"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid task reference: abc");
    }

    #[test]
    fn test_uppercase_letters_are_rejected() {
        for token in ["A1", "B12", "Z9"] {
            assert!(matches!(
                parse_task_ref(&args(&[token])),
                Err(RefError::InvalidReference(_))
            ));
        }
        assert!(parse_task_ref(&args(&["A", "1"])).is_err());
    }

    #[test]
    fn test_letter_followed_by_word_is_invalid() {
        let err = parse_task_ref(&args(&["a", "xyz"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid task reference: a xyz");
    }

    #[test]
    fn test_zero_is_out_of_range() {
        assert!(matches!(parse_task_ref(&args(&["0"])), Err(RefError::OutOfRange(0))));
        assert!(matches!(parse_task_ref(&args(&["a0"])), Err(RefError::OutOfRange(0))));
    }

    #[test]
    fn test_overflow_is_invalid() {
        assert!(matches!(
            parse_task_ref(&args(&["99999999999999999999"])),
            Err(RefError::InvalidReference(_))
        ));
    }

    #[test]
    fn test_non_ascii_digits_are_invalid() {
        assert!(parse_task_ref(&args(&["١٢"])).is_err());
        assert!(parse_task_ref(&args(&["-1"])).is_err());
        assert!(parse_task_ref(&args(&["+1"])).is_err());
    }

    #[test]
    fn test_single_mode_rejects_leftovers() {
        let err = parse_task_ref(&args(&["1", "2"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid task reference: 2");
    }

    #[test]
    fn test_batch_mixes_forms_left_to_right() {
        let refs = parse_task_refs(&args(&["3", "a1", "b", "2", "c10"])).unwrap();
        assert_eq!(
            refs,
            vec![
                TaskRef::numeric(3),
                TaskRef::lettered('a', 1),
                TaskRef::lettered('b', 2),
                TaskRef::lettered('c', 10),
            ]
        );
    }

    #[test]
    fn test_batch_trailing_letter_is_an_error() {
        let err = parse_task_refs(&args(&["1", "x"])).unwrap_err();
        assert!(matches!(&err, RefError::InvalidReference(token) if token == "x"));
        assert_eq!(err.to_string(), "invalid task reference: x");
    }

    #[test]
    fn test_batch_stops_at_first_bad_token() {
        let err = parse_task_refs(&args(&["1", "x!", "2"])).unwrap_err();
        assert_eq!(err.to_string(), "invalid task reference: x!");
    }

    #[test]
    fn test_display_round_trips_the_compact_form() {
        assert_eq!(TaskRef::lettered('b', 7).to_string(), "b7");
        assert_eq!(TaskRef::numeric(12).to_string(), "12");
    }
}
