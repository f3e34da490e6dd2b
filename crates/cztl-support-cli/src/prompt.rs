use anyhow::Result;
use cztl_support::models::message::Message;
use cztl_support::quick_actions::QuickAction;

pub mod cliclack;

pub trait Prompt {
    fn render(&mut self, message: &Message);
    fn get_input(&mut self) -> Result<Input>;
    fn show_busy(&mut self);
    fn hide_busy(&mut self);
    fn close(&self);
    /// Offer the preset prompts; `/1`, `/2`, ... pick one
    fn show_quick_actions(&mut self, actions: &[QuickAction]);
    fn open_support(&mut self, url: &str);
    fn assistant_ready(&self) {
        println!("\n");
        println!("CZTL Support is ready. Ask about shipping, purity, storage or payments.");
        println!("\n");
    }
    // Used for testing. Allows us to downcast to any type.
    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any;
}

pub struct Input {
    pub input_type: InputType,
    pub content: Option<String>, // Optional content as sometimes the user may be issuing a command eg. (Exit)
}

impl Input {
    pub fn message<S: Into<String>>(text: S) -> Self {
        Self {
            input_type: InputType::Message,
            content: Some(text.into()),
        }
    }

    pub fn command(input_type: InputType) -> Self {
        Self {
            input_type,
            content: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    AskAgain,           // Ask the user for input again. Control flow command.
    Message,            // User sent a message
    QuickAction(usize), // User picked a quick action by its zero-based position
    Support,            // User wants the advanced support chat
    Exit,               // User wants to exit the session
}

pub enum Theme {
    Light,
    Dark,
}

/// Parse a line typed at the prompt into an input
///
/// Returns `None` for commands the prompt handles itself, like help or theme toggles.
pub fn parse_input(line: &str) -> Option<Input> {
    let text = line.trim();
    if text.eq_ignore_ascii_case("/exit") || text.eq_ignore_ascii_case("/quit") {
        return Some(Input::command(InputType::Exit));
    }
    if text.eq_ignore_ascii_case("/support") {
        return Some(Input::command(InputType::Support));
    }
    if let Some(number) = text.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
        if number >= 1 {
            return Some(Input::command(InputType::QuickAction(number - 1)));
        }
    }
    if text.starts_with('/') {
        return None;
    }
    Some(Input::message(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_input("/exit").unwrap().input_type, InputType::Exit);
        assert_eq!(parse_input(" /QUIT ").unwrap().input_type, InputType::Exit);
        assert_eq!(parse_input("/support").unwrap().input_type, InputType::Support);
        assert_eq!(
            parse_input("/2").unwrap().input_type,
            InputType::QuickAction(1)
        );
        assert!(parse_input("/0").is_none());
        assert!(parse_input("/?").is_none());
    }

    #[test]
    fn test_parse_message_keeps_text() {
        let input = parse_input("Where is my order?").unwrap();
        assert_eq!(input.input_type, InputType::Message);
        assert_eq!(input.content.as_deref(), Some("Where is my order?"));
    }
}
