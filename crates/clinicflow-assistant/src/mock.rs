//! Mock assistant for testing without the external webhook.

use crate::client::{Assistant, AssistantResult};

/// Deterministic assistant with canned replies keyed on message content.
pub struct MockAssistant;

impl MockAssistant {
    /// Pick a canned reply for a message (keyword matching).
    pub fn canned_reply(message: &str) -> String {
        let message_lower = message.to_lowercase();

        let patterns: [(&str, &str); 5] = [
            (
                "agenda",
                "Your agenda is managed in the schedule view; I can summarize any month for you.",
            ),
            (
                "appointment",
                "You can schedule, confirm, or cancel appointments from the agenda.",
            ),
            (
                "plan",
                "Loyalty plans bundle a number of consultations over a period; patients on a plan are billed at enrollment.",
            ),
            (
                "revenue",
                "Revenue and expenses are tracked in the cash flow; check the monthly summary.",
            ),
            (
                "patient",
                "Patient records hold contact details, restrictions, goals, and plan status.",
            ),
        ];

        for (pattern, reply) in patterns {
            if message_lower.contains(pattern) {
                return reply.to_string();
            }
        }

        "I can help with patients, appointments, plans, and cash flow. What do you need?".to_string()
    }
}

impl Assistant for MockAssistant {
    fn reply(&self, message: &str) -> AssistantResult<String> {
        Ok(Self::canned_reply(message))
    }
}
