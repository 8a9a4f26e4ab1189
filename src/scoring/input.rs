//! Coercion of raw, user-typed text into the numbers the engine takes.
//!
//! Nothing here fails: empty or malformed counts become 0 and a malformed
//! prior score becomes `None` (the estimator substitutes its default).

use anyhow::{bail, Result};

/// Leading digits of `s` as a count, ignoring anything after them.
/// Negative, empty, or non-numeric input is 0; overflow saturates.
pub fn parse_count(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 0;
    }

    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Like [`parse_count`], but keeps "nothing typed" distinct from 0.
pub fn parse_count_field(s: &str) -> Option<u32> {
    if s.trim().is_empty() {
        None
    } else {
        Some(parse_count(s))
    }
}

/// Longest leading decimal number in `s` (`"18.5abc"` -> 18.5).
/// Returns `None` when there is no number or it is not finite.
pub fn parse_prior_score(s: &str) -> Option<f64> {
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    // Optional exponent, only taken when complete ("1e" stays "1")
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// One `--subject` entry from the command line, counts already coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectEntry {
    pub id: String,
    pub correct: Option<u32>,
    pub wrong: Option<u32>,
    pub unanswered: Option<u32>,
}

impl SubjectEntry {
    /// Parse `ID=CORRECT,WRONG[,UNANSWERED]`.
    ///
    /// Only the shape is checked (an id and `=` are required); the counts
    /// themselves are coerced leniently, so `math=10,x` means 10 right, 0 wrong.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((id, counts)) = s.split_once('=') else {
            bail!("Subject entry must look like ID=CORRECT,WRONG[,UNANSWERED]: {}", s)
        };

        let id = id.trim();
        if id.is_empty() {
            bail!("Subject entry is missing a subject id: {}", s)
        }

        let mut fields = counts.split(',');
        let correct = fields.next().and_then(parse_count_field);
        let wrong = fields.next().and_then(parse_count_field);
        let unanswered = fields.next().and_then(parse_count_field);

        Ok(SubjectEntry {
            id: id.to_string(),
            correct,
            wrong,
            unanswered,
        })
    }
}
