use std::io::{self, Write};

use anyhow::Result;
use bat::WrappingMode;
use cliclack::{input, spinner};
use console::style;
use cztl_support::escalation::open_advanced_support;
use cztl_support::models::message::Message;
use cztl_support::models::role::Role;
use cztl_support::quick_actions::QuickAction;

use super::{parse_input, Input, InputType, Prompt, Theme};

pub struct CliclackPrompt {
    spinner: cliclack::ProgressBar,
    input_mode: InputMode,
    theme: Theme,
}

enum InputMode {
    Singleline,
    Multiline,
}

impl CliclackPrompt {
    pub fn new() -> Self {
        CliclackPrompt {
            spinner: spinner(),
            input_mode: InputMode::Singleline,
            theme: Theme::Dark,
        }
    }

    fn theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Light => "GitHub",
            Theme::Dark => "zenburn",
        }
    }
}

fn print_markdown(content: &str, theme: &str) {
    let printed = bat::PrettyPrinter::new()
        .input(bat::Input::from_bytes(content.as_bytes()))
        .theme(theme)
        .language("Markdown")
        .wrapping_mode(WrappingMode::Character)
        .print();
    if printed.is_err() {
        println!("{}", content);
    }
}

fn print_help() {
    println!("Commands:");
    println!("/exit - Exit the session");
    println!("/support - Open the advanced support chat in your browser");
    println!("/1, /2, /3 - Send a suggested question");
    println!("/m - Switch to multiline input mode");
    println!("/s - Switch to singleline input mode");
    println!("/t - Toggle Light/Dark theme");
    println!("/? - Display this help message");
}

impl Prompt for CliclackPrompt {
    fn render(&mut self, message: &Message) {
        match message.role {
            Role::User => {
                println!("{}", style(format!("You · {}", message.time_label())).dim());
            }
            Role::Model => {
                println!(
                    "{}",
                    style(format!("CZTL Assistant · {}", message.time_label())).dim()
                );
                print_markdown(&message.text, self.theme_name());
            }
            Role::System => {
                println!("{}", style(&message.text).green().italic());
                println!(
                    "{}",
                    style("Type /support to open advanced support in your browser.").dim()
                );
            }
        }

        println!();
        let _ = io::stdout().flush();
    }

    fn show_busy(&mut self) {
        self.spinner = spinner();
        self.spinner.start("awaiting reply");
    }

    fn hide_busy(&mut self) {
        self.spinner.stop("");
    }

    fn show_quick_actions(&mut self, actions: &[QuickAction]) {
        if actions.is_empty() {
            return;
        }
        println!("{}", style("Suggested questions:").dim());
        for (position, action) in actions.iter().enumerate() {
            println!("  /{} {}", position + 1, style(action.label).bold());
        }
        println!();
    }

    fn open_support(&mut self, url: &str) {
        if let Err(e) = open_advanced_support(url) {
            tracing::warn!("{}", e);
            println!("Open advanced support at {}", style(url).underlined());
        }
    }

    fn get_input(&mut self) -> Result<Input> {
        loop {
            let mut input = input("CZTL Support:         [Help: /?]").placeholder("");
            match self.input_mode {
                InputMode::Multiline => input = input.multiline(),
                InputMode::Singleline => (),
            }
            let message_text: String = input.interact()?;
            let command = message_text.trim();

            if command.eq_ignore_ascii_case("/m") {
                self.input_mode = InputMode::Multiline;
            } else if command.eq_ignore_ascii_case("/s") {
                self.input_mode = InputMode::Singleline;
            } else if command.eq_ignore_ascii_case("/t") {
                self.theme = match self.theme {
                    Theme::Light => {
                        println!("Switching to Dark theme");
                        Theme::Dark
                    }
                    Theme::Dark => {
                        println!("Switching to Light theme");
                        Theme::Light
                    }
                };
            } else if command.eq_ignore_ascii_case("/?") {
                print_help();
            } else {
                return Ok(parse_input(&message_text)
                    .unwrap_or_else(|| Input::command(InputType::AskAgain)));
            }
        }
    }

    fn close(&self) {
        // No cleanup required
    }

    #[cfg(test)]
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
