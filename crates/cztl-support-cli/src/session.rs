use anyhow::Result;
use cztl_support::orchestrator::{TurnOrchestrator, TurnOutcome};

use crate::prompt::{InputType, Prompt};

pub struct Session<'a> {
    orchestrator: TurnOrchestrator,
    prompt: Box<dyn Prompt + 'a>,
    support_url: String,
    rendered: usize,
}

impl<'a> Session<'a> {
    pub fn new(
        orchestrator: TurnOrchestrator,
        prompt: Box<dyn Prompt + 'a>,
        support_url: impl Into<String>,
    ) -> Self {
        Session {
            orchestrator,
            prompt,
            support_url: support_url.into(),
            rendered: 0,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        self.prompt.assistant_ready();
        self.render_new_messages();

        loop {
            self.prompt
                .show_quick_actions(&self.orchestrator.quick_actions());

            let input = self.prompt.get_input()?;
            let text = match input.input_type {
                InputType::Message => match input.content {
                    Some(content) => content,
                    None => continue,
                },
                InputType::QuickAction(position) => {
                    match self.orchestrator.quick_actions().get(position) {
                        Some(action) => action.prompt.to_string(),
                        None => continue,
                    }
                }
                InputType::Support => {
                    self.prompt.open_support(&self.support_url);
                    continue;
                }
                InputType::AskAgain => continue,
                InputType::Exit => break,
            };

            self.process_turn(&text).await;
        }

        self.prompt.close();
        Ok(())
    }

    /// Run a single turn without an interactive prompt
    pub async fn headless_start(&mut self, message: &str) -> Result<TurnOutcome> {
        // The greeting is skipped when there is nobody to greet
        self.rendered = self.orchestrator.store().len();
        let outcome = self.process_turn(message).await;
        self.prompt.close();
        Ok(outcome)
    }

    async fn process_turn(&mut self, text: &str) -> TurnOutcome {
        self.prompt.show_busy();
        let outcome = self.orchestrator.submit(text).await;
        self.prompt.hide_busy();

        if let TurnOutcome::Failed { error } = &outcome {
            tracing::warn!("No reply for this message: {}", error);
        }
        self.render_new_messages();
        outcome
    }

    fn render_new_messages(&mut self) {
        let messages = self.orchestrator.store().snapshot();
        for message in messages.iter().skip(self.rendered) {
            self.prompt.render(message);
        }
        self.rendered = messages.len();
    }
}
