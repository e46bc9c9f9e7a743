use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::application::GenerativeClient;
use crate::domain::{AdvisorError, Content, GenerateRequest};

/// Persona given to the provider for every chat turn.
pub const PERSONA_INSTRUCTION: &str = "\
You are the in-house AI interior design consultant for a boutique furniture store. \
Your tone is elegant and sophisticated, yet warm and helpful. \
You help customers choose furniture from our catalog.

Guidelines:
1. Suggest pieces based on the customer's room description, colour preferences or desired mood.
2. When asked about prices, give general ranges or point them to the product page.
3. Keep answers under 100 words unless the customer asks for more.
4. If a question has nothing to do with furniture or interior design, politely steer back to design.
5. Use bullet points when listing options.";

pub const EMPTY_REPLY_FALLBACK: &str =
    "I apologize, I couldn't generate a response at this moment.";

pub const CONNECTION_FALLBACK: &str = "I'm having trouble connecting to my design database right now. \
Please check your connection or API key configuration.";

/// Display text for a failed turn.
pub fn fallback_reply(err: &AdvisorError) -> &'static str {
    match err {
        AdvisorError::EmptyResponse | AdvisorError::InvalidInput(_) => EMPTY_REPLY_FALLBACK,
        _ => CONNECTION_FALLBACK,
    }
}

/// A multi-turn design-assistant conversation bound to one provider client.
///
/// The running history lives here and is resent with each turn. Sending takes
/// `&mut self`, so one session handles one turn at a time; sharing a session
/// between tasks needs the caller's own lock.
pub struct ConversationSession {
    client: Arc<dyn GenerativeClient>,
    history: Vec<Content>,
}

impl ConversationSession {
    /// Open a session, reporting why it could not be opened.
    pub fn open(client: Option<Arc<dyn GenerativeClient>>) -> Result<Self, AdvisorError> {
        let client = client.ok_or_else(|| AdvisorError::session("no provider client available"))?;

        if client.model().trim().is_empty() {
            return Err(AdvisorError::session("provider client has no model configured"));
        }

        debug!("Opened design chat session on model {}", client.model());

        Ok(Self {
            client,
            history: Vec::new(),
        })
    }

    /// Open a session, or `None` when the assistant is offline.
    pub fn create(client: Option<Arc<dyn GenerativeClient>>) -> Option<Self> {
        match Self::open(client) {
            Ok(session) => Some(session),
            Err(e) => {
                error!("Failed to create chat session: {e}");
                None
            }
        }
    }

    /// Submit one user turn and return the assistant's reply.
    ///
    /// History only grows when the turn succeeds, so a failed turn leaves the
    /// next one unaffected.
    pub async fn try_send(&mut self, text: &str) -> Result<String, AdvisorError> {
        if text.trim().is_empty() {
            return Err(AdvisorError::invalid_input("message is empty"));
        }

        let mut contents = self.history.clone();
        contents.push(Content::user_text(text));
        let request = GenerateRequest::new(contents).with_system_instruction(PERSONA_INSTRUCTION);

        let reply = self.client.generate(&request).await?;
        if reply.trim().is_empty() {
            return Err(AdvisorError::EmptyResponse);
        }

        self.history.push(Content::user_text(text));
        self.history.push(Content::model_text(reply.as_str()));
        debug!("Chat turn {} answered ({} chars)", self.turn_count(), reply.len());

        Ok(reply)
    }

    /// Submit one user turn. Never fails: errors become a fixed apology.
    pub async fn send(&mut self, text: &str) -> String {
        match self.try_send(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Error sending chat message: {e}");
                fallback_reply(&e).to_string()
            }
        }
    }

    /// Completed user/assistant exchanges so far.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    pub fn client(&self) -> &Arc<dyn GenerativeClient> {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockGenerativeClient;
    use crate::domain::ContentRole;

    fn session_with(mock: MockGenerativeClient) -> (ConversationSession, Arc<MockGenerativeClient>) {
        let mock = Arc::new(mock);
        let client: Arc<dyn GenerativeClient> = mock.clone();
        let session = ConversationSession::create(Some(client)).expect("session");
        (session, mock)
    }

    #[test]
    fn create_without_client_is_none() {
        assert!(ConversationSession::create(None).is_none());
        assert!(matches!(
            ConversationSession::open(None),
            Err(AdvisorError::SessionCreationFailed(_))
        ));
    }

    #[test]
    fn create_rejects_blank_model() {
        let client: Arc<dyn GenerativeClient> =
            Arc::new(MockGenerativeClient::new().with_model(""));
        assert!(ConversationSession::create(Some(client)).is_none());
    }

    #[test]
    fn session_stays_bound_to_its_client() {
        let mock = Arc::new(MockGenerativeClient::new());
        let client: Arc<dyn GenerativeClient> = mock.clone();
        let session = ConversationSession::create(Some(client.clone())).unwrap();
        assert!(Arc::ptr_eq(session.client(), &client));
    }

    #[tokio::test]
    async fn reply_is_returned_and_persona_sent() {
        let (mut session, mock) =
            session_with(MockGenerativeClient::new().with_reply("Try the marble coffee table."));

        let reply = session.send("Something for a modern living room?").await;
        assert_eq!(reply, "Try the marble coffee table.");

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].system_instruction.as_deref(),
            Some(PERSONA_INSTRUCTION)
        );
        assert_eq!(requests[0].text(), "Something for a modern living room?");
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_network() {
        let (mut session, mock) = session_with(MockGenerativeClient::new());

        let err = session.try_send("   ").await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)));
        assert_eq!(session.send("").await, EMPTY_REPLY_FALLBACK);
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn empty_reply_maps_to_fallback() {
        let (mut session, _mock) = session_with(MockGenerativeClient::new().with_reply(""));

        assert_eq!(session.send("hello").await, EMPTY_REPLY_FALLBACK);
        assert_eq!(session.turn_count(), 0);
    }

    #[tokio::test]
    async fn provider_failure_maps_to_connection_fallback() {
        let (mut session, _mock) = session_with(
            MockGenerativeClient::new().with_error(AdvisorError::transport("connection refused")),
        );

        let reply = session.send("hello").await;
        assert_eq!(reply, CONNECTION_FALLBACK);
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn failed_turn_does_not_affect_next_turn() {
        let (mut session, mock) = session_with(
            MockGenerativeClient::new()
                .with_error(AdvisorError::provider(503, "UNAVAILABLE"))
                .with_reply("Welcome back."),
        );

        assert_eq!(session.send("first").await, CONNECTION_FALLBACK);
        assert_eq!(session.send("second").await, "Welcome back.");

        // The failed turn was not added to history.
        let requests = mock.requests().await;
        assert_eq!(requests[1].contents.len(), 1);
        assert_eq!(requests[1].text(), "second");
    }

    #[tokio::test]
    async fn history_is_resent_in_order() {
        let (mut session, mock) = session_with(
            MockGenerativeClient::new()
                .with_reply("A walnut bed frame would suit.")
                .with_reply("Around 125,000."),
        );

        session.send("Bedroom ideas?").await;
        session.send("How much is it?").await;
        assert_eq!(session.turn_count(), 2);

        let requests = mock.requests().await;
        let roles: Vec<ContentRole> = requests[1].contents.iter().map(|c| c.role).collect();
        assert_eq!(
            roles,
            vec![ContentRole::User, ContentRole::Model, ContentRole::User]
        );
    }

    #[test]
    fn fallback_reply_classifies_errors() {
        assert_eq!(fallback_reply(&AdvisorError::EmptyResponse), EMPTY_REPLY_FALLBACK);
        assert_eq!(
            fallback_reply(&AdvisorError::malformed("bad json")),
            CONNECTION_FALLBACK
        );
    }
}
