//! Tests de casos de router. Cada test devuelve `Some(valor)` cuando el
//! operando coincide; el valor es lo que se guarda como resultado.
use convo_core::errors::EvalError;
use once_cell::sync::Lazy;
use regex::RegexBuilder;

static NUMBER: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"-?\d+(?:\.\d+)?").unwrap());

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn expect_args<'a>(test: &str, arguments: &'a [String], count: usize) -> Result<&'a [String], EvalError> {
    if arguments.len() != count {
        return Err(EvalError::InvalidArguments { test: test.to_string(),
                                                 reason: format!("expected {count} argument(s), got {}",
                                                                 arguments.len()) });
    }
    Ok(arguments)
}

fn parse_number(test: &str, raw: &str) -> Result<f64, EvalError> {
    raw.trim().parse().map_err(|_| EvalError::InvalidArguments { test: test.to_string(),
                                                                reason: format!("'{raw}' isn't a number") })
}

/// Primer número del operando que cumple `accept`.
fn find_number(operand: &str, accept: impl Fn(f64) -> bool) -> Option<String> {
    NUMBER.find_iter(operand)
          .filter_map(|m| m.as_str().parse::<f64>().ok().map(|n| (m.as_str(), n)))
          .find(|(_, n)| accept(*n))
          .map(|(s, _)| s.to_string())
}

fn has_phrase(operand: &[String], phrase: &[String]) -> bool {
    phrase.is_empty() || operand.windows(phrase.len()).any(|w| w == phrase)
}

pub fn evaluate_case(test: &str, operand: &str, arguments: &[String]) -> Result<Option<String>, EvalError> {
    let result = match test {
        "has_text" => {
            expect_args(test, arguments, 0)?;
            Some(operand.trim().to_string()).filter(|t| !t.is_empty())
        }
        "has_any_word" => {
            let wanted = words(&expect_args(test, arguments, 1)?[0]);
            let matched: Vec<String> = words(operand).into_iter().filter(|w| wanted.contains(w)).collect();
            Some(matched.join(" ")).filter(|m| !m.is_empty())
        }
        "has_all_words" => {
            let wanted = words(&expect_args(test, arguments, 1)?[0]);
            let present = words(operand);
            let all = !wanted.is_empty() && wanted.iter().all(|w| present.contains(w));
            all.then(|| wanted.join(" "))
        }
        "has_phrase" => {
            let phrase = words(&expect_args(test, arguments, 1)?[0]);
            has_phrase(&words(operand), &phrase).then(|| phrase.join(" "))
        }
        "has_only_phrase" => {
            let phrase = words(&expect_args(test, arguments, 1)?[0]);
            (words(operand) == phrase).then(|| phrase.join(" "))
        }
        "has_beginning" => {
            let prefix = expect_args(test, arguments, 1)?[0].trim().to_lowercase();
            let trimmed = operand.trim_start();
            let head: String = trimmed.chars().take(prefix.chars().count()).collect();
            (!prefix.is_empty() && head.to_lowercase() == prefix).then_some(head)
        }
        "is_text_eq" => {
            let expected = &expect_args(test, arguments, 1)?[0];
            (operand == expected).then(|| operand.to_string())
        }
        "has_pattern" => {
            let pattern = &expect_args(test, arguments, 1)?[0];
            let re = RegexBuilder::new(pattern).case_insensitive(true)
                                               .build()
                                               .map_err(|e| EvalError::InvalidArguments { test: test.to_string(),
                                                                                          reason: e.to_string() })?;
            re.find(operand).map(|m| m.as_str().to_string())
        }
        "has_number" => {
            expect_args(test, arguments, 0)?;
            find_number(operand, |_| true)
        }
        "has_number_between" => {
            let args = expect_args(test, arguments, 2)?;
            let (min, max) = (parse_number(test, &args[0])?, parse_number(test, &args[1])?);
            find_number(operand, |n| n >= min && n <= max)
        }
        "has_number_lt" | "has_number_lte" | "has_number_gt" | "has_number_gte" | "has_number_eq" => {
            let bound = parse_number(test, &expect_args(test, arguments, 1)?[0])?;
            let accept: fn(f64, f64) -> bool = match test {
                "has_number_lt" => |n, b| n < b,
                "has_number_lte" => |n, b| n <= b,
                "has_number_gt" => |n, b| n > b,
                "has_number_gte" => |n, b| n >= b,
                _ => |n, b| (n - b).abs() < f64::EPSILON,
            };
            find_number(operand, |n| accept(n, bound))
        }
        other => return Err(EvalError::UnknownTest(other.to_string())),
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[rstest]
    #[case("has_any_word", "Yes please", &["yes"], Some("yes"))]
    #[case("has_any_word", "nope", &["yes y"], None)]
    #[case("has_all_words", "the quick brown fox", &["fox quick"], Some("fox quick"))]
    #[case("has_all_words", "the quick fox", &["fox brown"], None)]
    #[case("has_phrase", "I love the red color", &["red color"], Some("red color"))]
    #[case("has_phrase", "color red", &["red color"], None)]
    #[case("has_only_phrase", " Red  Color ", &["red color"], Some("red color"))]
    #[case("has_beginning", "  Yes sir", &["yes"], Some("Yes"))]
    #[case("has_beginning", "sir yes", &["yes"], None)]
    #[case("is_text_eq", "yes", &["yes"], Some("yes"))]
    #[case("is_text_eq", "Yes", &["yes"], None)]
    #[case("has_text", "  hi ", &[], Some("hi"))]
    #[case("has_text", "   ", &[], None)]
    #[case("has_pattern", "Code AB-123", &[r"[a-z]{2}-\d+"], Some("AB-123"))]
    #[case("has_number", "I am 23 years", &[], Some("23"))]
    #[case("has_number_between", "10 or 55", &["18", "65"], Some("55"))]
    #[case("has_number_gt", "age 17", &["18"], None)]
    #[case("has_number_lte", "-3.5 degrees", &["0"], Some("-3.5"))]
    #[case("has_number_eq", "it's 4", &["4"], Some("4"))]
    fn case_tests(#[case] test: &str,
                  #[case] operand: &str,
                  #[case] arguments: &[&str],
                  #[case] expected: Option<&str>) {
        let got = evaluate_case(test, operand, &args(arguments)).unwrap();
        assert_eq!(got.as_deref(), expected);
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(matches!(evaluate_case("has_number_between", "5", &args(&["a", "9"])),
                         Err(EvalError::InvalidArguments { .. })));
        assert!(matches!(evaluate_case("has_any_word", "5", &[]), Err(EvalError::InvalidArguments { .. })));
        assert!(matches!(evaluate_case("has_pattern", "x", &args(&["("])), Err(EvalError::InvalidArguments { .. })));
        assert_eq!(evaluate_case("has_vibes", "x", &[]), Err(EvalError::UnknownTest("has_vibes".into())));
    }
}
