use std::io::{BufRead, Write};

use prescription_analyzer_domain::services::reminder::{PromptRequest, ReminderPrompt};
use tracing::warn;

/// Asks reminder questions on a line-based terminal.
///
/// An empty line accepts the offered default; end of input dismisses the question.
pub struct StdinPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdinPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> ReminderPrompt for StdinPrompt<R, W> {
    fn ask(&mut self, request: &PromptRequest) -> Option<String> {
        let question = if request.default.is_empty() {
            format!("{} ", request.message)
        } else {
            format!("{} [{}] ", request.message, request.default)
        };
        if let Err(e) = self
            .output
            .write_all(question.as_bytes())
            .and_then(|_| self.output.flush())
        {
            warn!("Could not write prompt: {}", e);
            return None;
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim_end_matches(['\n', '\r']);
                if answer.is_empty() {
                    Some(request.default.clone())
                } else {
                    Some(answer.to_string())
                }
            }
            Err(e) => {
                warn!("Could not read answer: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prescription_analyzer_domain::entities::reminder::ReminderField;
    use std::io::Cursor;

    fn request(default: &str) -> PromptRequest {
        PromptRequest {
            step: ReminderField::ReminderTime,
            message: "What time?".to_string(),
            default: default.to_string(),
        }
    }

    #[test]
    fn test_answer_and_default() {
        let mut prompt = StdinPrompt::new(Cursor::new("21:30\n\n"), Vec::new());

        assert_eq!(prompt.ask(&request("09:00")).as_deref(), Some("21:30"));
        assert_eq!(prompt.ask(&request("09:00")).as_deref(), Some("09:00"));

        let (_, output) = prompt.into_inner();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "What time? [09:00] What time? [09:00] "
        );
    }

    #[test]
    fn test_end_of_input_dismisses() {
        let mut prompt = StdinPrompt::new(Cursor::new(""), Vec::new());
        assert_eq!(prompt.ask(&request("09:00")), None);
    }

    #[test]
    fn test_empty_line_without_default_is_empty() {
        let mut prompt = StdinPrompt::new(Cursor::new("\r\n"), Vec::new());
        assert_eq!(prompt.ask(&request("")).as_deref(), Some(""));
    }
}
