use serde::Serialize;

/// Quick actions are offered until the transcript reaches this many messages
pub const QUICK_ACTION_LIMIT: usize = 4;

/// A preset prompt the customer can send with one click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub const QUICK_ACTIONS: [QuickAction; 3] = [
    QuickAction {
        id: "purity",
        label: "Product Purity",
        prompt: "Tell me about the purity of your Methylene Blue.",
    },
    QuickAction {
        id: "shipping",
        label: "Shipping Info",
        prompt: "How long does shipping take?",
    },
    QuickAction {
        id: "usage",
        label: "How to Use",
        prompt: "How do I use the Methylene Blue powder?",
    },
];

/// Quick actions to show for a transcript of `transcript_len` messages
pub fn available_quick_actions(transcript_len: usize) -> &'static [QuickAction] {
    if transcript_len < QUICK_ACTION_LIMIT {
        &QUICK_ACTIONS
    } else {
        &[]
    }
}

pub fn find_quick_action(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|action| action.id == id)
}
