//! These models represent the objects passed around the support assistant
//!
//! There are a few related formats we need to interact with:
//! - the transcript shown to the customer, which includes local advisories
//! - the history view sent to the completion provider, which never does
//! - the provider wire formats (gemini contents, openai messages)
//!
//! We always convert into the internal structs at the edges. The transcript
//! `Message` is the source of truth; `HistoryEntry` is derived from it per turn.
pub mod history;
pub mod message;
pub mod role;
