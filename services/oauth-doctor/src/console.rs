//! Terminal operator: messages and prompts on stdout, answers from stdin

use std::io::{BufRead, Write};

use oauth_diagnosis::Operator;
use oauth_diagnosis::operator::strip_newline;

pub struct ConsoleOperator<R, W> {
    input: R,
    output: W,
}

impl ConsoleOperator<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Operator for ConsoleOperator<R, W> {
    fn inform(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }

    fn read_line(&mut self, prompt: &str) -> oauth_diagnosis::Result<String> {
        let io_err = |e: std::io::Error| oauth_diagnosis::Error::Operator(e.to_string());

        write!(self.output, "{prompt}").map_err(io_err)?;
        self.output.flush().map_err(io_err)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            return Err(oauth_diagnosis::Error::Operator("input closed".into()));
        }
        Ok(strip_newline(&line).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompts_and_strips_newlines() {
        let mut output = Vec::new();
        let mut console = ConsoleOperator::new(Cursor::new("first\r\nsecond\n"), &mut output);

        assert_eq!(console.read_line("New Client ID >> ").unwrap(), "first");
        assert_eq!(console.read_line("New Client Secret >> ").unwrap(), "second");
        console.inform("done");

        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown, "New Client ID >> New Client Secret >> done\n");
    }

    #[test]
    fn end_of_input_is_an_error() {
        let mut console = ConsoleOperator::new(Cursor::new(""), Vec::new());
        assert!(console.read_line("> ").is_err());
    }

    #[test]
    fn confirm_requires_exact_y() {
        let mut console = ConsoleOperator::new(Cursor::new("Y\ny\n"), Vec::new());
        assert!(console.confirm("? ").unwrap());
        assert!(!console.confirm("? ").unwrap());
    }
}
