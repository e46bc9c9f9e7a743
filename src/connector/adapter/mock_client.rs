use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::GenerativeClient;
use crate::domain::{AdvisorError, GenerateRequest};

const MOCK_MODEL: &str = "mock-generative";

/// Recorded requests kept per client; older ones are dropped first.
pub const MAX_RECORDED_REQUESTS: usize = 32;

const CANNED_CHAT_REPLY: &str = "For a calm, modern space I'd pair the Marble Coffee Table \
with the Bouclé Swivel Chair:\n- marble and steel keep it crisp\n- bouclé adds softness";

const CANNED_RECOMMENDATION: &str = r#"{"recommendedIds":["3","12"],"reasoning":"Neutral walls and clean lines suggest a modern palette; marble and bouclé add texture without clutter."}"#;

/// Scripted in-process [`GenerativeClient`].
///
/// Queued replies are returned in order; once the queue is empty a canned
/// reply is produced (a recommendation object for structured requests, chat
/// text otherwise). The most recent [`MAX_RECORDED_REQUESTS`] requests are
/// recorded.
pub struct MockGenerativeClient {
    model: String,
    replies: Mutex<VecDeque<Result<String, AdvisorError>>>,
    requests: Mutex<VecDeque<GenerateRequest>>,
}

impl MockGenerativeClient {
    pub fn new() -> Self {
        Self {
            model: MOCK_MODEL.to_string(),
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_reply(mut self, text: impl Into<String>) -> Self {
        self.replies.get_mut().push_back(Ok(text.into()));
        self
    }

    pub fn with_error(mut self, error: AdvisorError) -> Self {
        self.replies.get_mut().push_back(Err(error));
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().await.iter().cloned().collect()
    }

    fn canned_reply(request: &GenerateRequest) -> String {
        if request.response_format.is_some() {
            CANNED_RECOMMENDATION.to_string()
        } else {
            CANNED_CHAT_REPLY.to_string()
        }
    }
}

impl Default for MockGenerativeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerativeClient for MockGenerativeClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AdvisorError> {
        {
            let mut recorded = self.requests.lock().await;
            if recorded.len() == MAX_RECORDED_REQUESTS {
                recorded.pop_front();
            }
            recorded.push_back(request.clone());
        }

        let scripted = self.replies.lock().await.pop_front();
        debug!("Mock generation (scripted reply: {})", scripted.is_some());

        scripted.unwrap_or_else(|| Ok(Self::canned_reply(request)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
