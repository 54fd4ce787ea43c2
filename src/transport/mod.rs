// ==========================================
// Chem Procure - Transport Layer
// ==========================================
// Responsibility: external delivery collaborators — the chat broadcast
// hub and the outbound automation webhook.
// Red line: the lifecycle engine never depends on this layer; requests
// flow the other way.
// ==========================================

pub mod hub;
pub mod webhook;

pub use hub::{ChatEvent, MessageHub};
pub use webhook::{AutomationWebhook, ForwardOutcome};
