//! Operator interaction
//!
//! Everything the engine asks or tells the person running the doctor goes
//! through `Operator`, line by line.

use crate::error::Result;

/// Line-based conversation with the operator.
pub trait Operator {
    /// Show a message.
    fn inform(&mut self, message: &str);

    /// Show `prompt` and read one line, without its trailing newline.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Block until the operator answers `prompt`; the answer is ignored.
    fn acknowledge(&mut self, prompt: &str) -> Result<()> {
        self.read_line(prompt).map(|_| ())
    }

    /// Ask a yes/no question; only an exact `Y` counts as yes.
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(prompt)?;
        Ok(is_affirmative(&answer))
    }
}

/// Drop one trailing `\n` or `\r\n`.
pub fn strip_newline(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    strip_newline(answer) == "Y"
}

/// Customer IDs are commonly written `123-456-7890`; the API wants digits.
pub fn normalize_customer_id(raw: &str) -> String {
    raw.trim().replace('-', "")
}

/// Prompt until the operator enters a non-empty customer ID.
pub fn read_customer_id(operator: &mut dyn Operator) -> Result<String> {
    loop {
        let line = operator.read_line("Please enter a Google Ads account ID: ")?;
        let customer_id = normalize_customer_id(&line);
        if !customer_id.is_empty() {
            return Ok(customer_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedOperator;

    #[test]
    fn strips_one_trailing_newline_only() {
        assert_eq!(strip_newline("abc\n"), "abc");
        assert_eq!(strip_newline("abc\r\n"), "abc");
        assert_eq!(strip_newline("abc"), "abc");
        assert_eq!(strip_newline(" abc \n"), " abc ");
    }

    #[test]
    fn only_exact_upper_y_is_affirmative() {
        assert!(is_affirmative("Y"));
        assert!(is_affirmative("Y\n"));
        for answer in ["y", "yes", "", "N", "YES", " Y"] {
            assert!(!is_affirmative(answer), "{answer:?} must decline");
        }
    }

    #[test]
    fn customer_id_dashes_are_removed() {
        assert_eq!(normalize_customer_id(" 123-456-7890\n"), "1234567890");
    }

    #[test]
    fn read_customer_id_reprompts_on_blank_input() {
        let mut operator = ScriptedOperator::new(&["", "   ", "123-456-7890"]);
        let id = read_customer_id(&mut operator).unwrap();
        assert_eq!(id, "1234567890");
        assert_eq!(operator.prompts.len(), 3);
    }

    #[test]
    fn read_customer_id_fails_when_input_ends() {
        let mut operator = ScriptedOperator::new(&[""]);
        assert!(read_customer_id(&mut operator).is_err());
    }
}
