//! Answer validation for bounded-choice rounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an answer was rejected. The round repeats after any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidAnswer {
    /// Blank answer where a value is required.
    Empty,
    /// Not a label and not an integer.
    NonInteger,
    /// An integer outside `[0, option count)`.
    OutOfRange,
    /// Text that matches none of the presented labels.
    NotInOptions,
}

impl InvalidAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidAnswer::Empty => "Empty",
            InvalidAnswer::NonInteger => "NonInteger",
            InvalidAnswer::OutOfRange => "OutOfRange",
            InvalidAnswer::NotInOptions => "NotInOptions",
        }
    }
}

impl fmt::Display for InvalidAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            InvalidAnswer::Empty => "an answer is required",
            InvalidAnswer::NonInteger => "the answer must be an option number",
            InvalidAnswer::OutOfRange => "the option number is out of range",
            InvalidAnswer::NotInOptions => "the answer matches none of the options",
        };
        f.write_str(message)
    }
}

/// How answers to bounded rounds are matched against the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnswerMatching {
    /// Exact label or zero-based option index.
    #[default]
    LabelOrIndex,
    /// Zero-based option index only.
    IndexOnly,
}

/// A validated answer to a bounded round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Blank answer where stopping is allowed.
    Stop,
    /// One of the presented options.
    Option { index: usize, label: String },
}

/// Validate `answer` against `options`.
///
/// Accepts blank (only when `allow_stop`), an exact label (unless
/// [`AnswerMatching::IndexOnly`]) or an integer in `[0, options.len())`.
/// A label match wins over an index reading of the same text.
pub fn validate_choice(
    answer: &str,
    options: &[String],
    matching: AnswerMatching,
    allow_stop: bool,
) -> Result<Choice, InvalidAnswer> {
    let answer = answer.trim();
    if answer.is_empty() {
        return if allow_stop {
            Ok(Choice::Stop)
        } else {
            Err(InvalidAnswer::Empty)
        };
    }
    if matching == AnswerMatching::LabelOrIndex
        && let Some(index) = options.iter().position(|option| option == answer)
    {
        return Ok(Choice::Option {
            index,
            label: options[index].clone(),
        });
    }
    match answer.parse::<i64>() {
        Ok(number) => usize::try_from(number)
            .ok()
            .filter(|&index| index < options.len())
            .map(|index| Choice::Option {
                index,
                label: options[index].clone(),
            })
            .ok_or(InvalidAnswer::OutOfRange),
        Err(_) => match matching {
            AnswerMatching::LabelOrIndex => Err(InvalidAnswer::NotInOptions),
            AnswerMatching::IndexOnly => Err(InvalidAnswer::NonInteger),
        },
    }
}

/// Validate a freeform answer: anything but blank.
pub fn validate_freeform(answer: &str) -> Result<String, InvalidAnswer> {
    let answer = answer.trim();
    if answer.is_empty() {
        Err(InvalidAnswer::Empty)
    } else {
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["Name".into(), "Age".into(), "7".into()]
    }

    #[test]
    fn test_label_and_index_accepted() {
        let by_label = validate_choice("Age", &options(), AnswerMatching::LabelOrIndex, false);
        let by_index = validate_choice(" 1 ", &options(), AnswerMatching::LabelOrIndex, false);
        assert_eq!(by_label, by_index);
        assert_eq!(
            by_label.unwrap(),
            Choice::Option {
                index: 1,
                label: "Age".into()
            }
        );
    }

    #[test]
    fn test_label_wins_over_index() {
        let choice = validate_choice("7", &options(), AnswerMatching::LabelOrIndex, false);
        assert!(matches!(choice, Ok(Choice::Option { index: 2, .. })));
    }

    #[test]
    fn test_rejections() {
        let matching = AnswerMatching::LabelOrIndex;
        assert_eq!(
            validate_choice("", &options(), matching, false),
            Err(InvalidAnswer::Empty)
        );
        assert_eq!(
            validate_choice("3", &options(), matching, false),
            Err(InvalidAnswer::OutOfRange)
        );
        assert_eq!(
            validate_choice("-1", &options(), matching, false),
            Err(InvalidAnswer::OutOfRange)
        );
        assert_eq!(
            validate_choice("age", &options(), matching, false),
            Err(InvalidAnswer::NotInOptions)
        );
    }

    #[test]
    fn test_index_only_rejects_labels() {
        assert_eq!(
            validate_choice("Age", &options(), AnswerMatching::IndexOnly, false),
            Err(InvalidAnswer::NonInteger)
        );
        assert!(validate_choice("0", &options(), AnswerMatching::IndexOnly, false).is_ok());
    }

    #[test]
    fn test_blank_stops_when_allowed() {
        assert_eq!(
            validate_choice("  ", &options(), AnswerMatching::IndexOnly, true),
            Ok(Choice::Stop)
        );
        assert_eq!(validate_freeform(" 30 "), Ok("30".to_string()));
        assert_eq!(validate_freeform(""), Err(InvalidAnswer::Empty));
    }
}
