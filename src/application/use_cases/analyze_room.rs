use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::application::GenerativeClient;
use crate::domain::{
    AdvisorError, CatalogProjection, Content, GenerateRequest, ImagePayload, Part, Product,
    RecommendationResult, ResponseFormat, DEFAULT_REASONING, MAX_RECOMMENDATIONS,
};

const ANALYSIS_PROMPT: &str = "\
Analyze this room photo.
Identify the style (Modern, Classic, Industrial, etc.) and the colour palette.
Select up to 3 products from the provided catalog that would best fit this specific room \
physically and aesthetically.
Explain your choices in the reasoning field.";

/// Shape the provider must reply with, in its schema dialect.
pub fn recommendation_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "recommendedIds": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            },
            "reasoning": { "type": "STRING" }
        }
    })
}

/// Reply as the provider sends it; every field may be missing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    #[serde(default)]
    recommended_ids: Option<Vec<String>>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Recommends catalog items for a photographed room.
///
/// Each call is a single provider round trip. Nothing is cached between calls,
/// and returned ids are not checked against the catalog.
pub struct RoomAnalyzer {
    client: Option<Arc<dyn GenerativeClient>>,
}

impl RoomAnalyzer {
    pub fn new(client: Option<Arc<dyn GenerativeClient>>) -> Self {
        Self { client }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Analyze a room photo. Never fails: every error becomes a well-formed
    /// fallback result.
    pub async fn analyze(&self, image: &str, catalog: &[Product]) -> RecommendationResult {
        match self.try_analyze(image, catalog).await {
            Ok(result) => result,
            Err(AdvisorError::ConfigurationAbsent) => RecommendationResult::unavailable(),
            Err(e) if e.is_bad_response() => {
                warn!("Room analysis got an unusable reply: {e}");
                RecommendationResult::failed()
            }
            Err(e) => {
                warn!("Room analysis failed: {e}");
                RecommendationResult::failed()
            }
        }
    }

    /// Analyze a room photo, reporting the failure kind.
    pub async fn try_analyze(
        &self,
        image: &str,
        catalog: &[Product],
    ) -> Result<RecommendationResult, AdvisorError> {
        let client = self.client.as_ref().ok_or(AdvisorError::ConfigurationAbsent)?;

        let payload = ImagePayload::from_encoded(image);
        if payload.is_empty() {
            return Err(AdvisorError::invalid_input("image payload is empty"));
        }

        let request = Self::build_request(&payload, catalog)?;
        info!(
            "Analyzing room photo ({} bytes, {}) against {} catalog items",
            payload.data().len(),
            payload.mime_type(),
            catalog.len()
        );

        let text = client.generate(&request).await?;
        if text.trim().is_empty() {
            return Err(AdvisorError::EmptyResponse);
        }
        debug!("Room analysis raw response: {text}");

        Self::parse_recommendation(&text)
    }

    /// Build the single outbound request for one photo.
    pub fn build_request(
        payload: &ImagePayload,
        catalog: &[Product],
    ) -> Result<GenerateRequest, AdvisorError> {
        let projection: Vec<CatalogProjection<'_>> =
            catalog.iter().map(Product::projection).collect();
        let catalog_json = serde_json::to_string(&projection)
            .map_err(|e| AdvisorError::invalid_input(format!("catalog not serializable: {e}")))?;

        let contents = vec![Content::user(vec![
            Part::InlineData {
                mime_type: payload.mime_type().to_string(),
                data: payload.data().to_string(),
            },
            Part::Text(ANALYSIS_PROMPT.to_string()),
        ])];

        Ok(GenerateRequest::new(contents)
            .with_system_instruction(format!(
                "You are an expert interior designer. You have access to this catalog: {catalog_json}."
            ))
            .with_response_format(ResponseFormat::json(recommendation_schema())))
    }

    /// Parse the model's reply into a result, filling defaults for missing fields.
    ///
    /// Only the outermost `{…}` span is parsed so stray prose or code fences
    /// around the object are tolerated.
    fn parse_recommendation(text: &str) -> Result<RecommendationResult, AdvisorError> {
        let (start, end) = match (text.find('{'), text.rfind('}')) {
            (Some(s), Some(e)) if s < e => (s, e),
            _ => return Err(AdvisorError::malformed("no JSON object in response")),
        };

        let raw: RawRecommendation = serde_json::from_str(&text[start..=end])
            .map_err(|e| AdvisorError::malformed(format!("unexpected response shape: {e}")))?;

        let mut ids = raw.recommended_ids.unwrap_or_default();
        if ids.len() > MAX_RECOMMENDATIONS {
            debug!(
                "Provider returned {} recommendations; keeping the first {MAX_RECOMMENDATIONS}",
                ids.len()
            );
            ids.truncate(MAX_RECOMMENDATIONS);
        }

        let reasoning = raw
            .reasoning
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REASONING.to_string());

        Ok(RecommendationResult::new(ids, reasoning))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::MockGenerativeClient;
    use crate::domain::{default_catalog, ANALYSIS_FAILED_REASONING, UNAVAILABLE_REASONING};

    fn analyzer_with(mock: MockGenerativeClient) -> (RoomAnalyzer, Arc<MockGenerativeClient>) {
        let mock = Arc::new(mock);
        let client: Arc<dyn GenerativeClient> = mock.clone();
        (RoomAnalyzer::new(Some(client)), mock)
    }

    #[tokio::test]
    async fn no_client_returns_unavailable_result() {
        let analyzer = RoomAnalyzer::new(None);
        let result = analyzer.analyze("abc", &default_catalog()).await;

        assert!(result.recommended_ids().is_empty());
        assert_eq!(result.reasoning(), UNAVAILABLE_REASONING);
        assert!(matches!(
            analyzer.try_analyze("abc", &[]).await,
            Err(AdvisorError::ConfigurationAbsent)
        ));
    }

    #[tokio::test]
    async fn successful_reply_is_returned_unchanged() {
        let (analyzer, _mock) = analyzer_with(MockGenerativeClient::new().with_reply(
            r#"{"recommendedIds":["3","7"],"reasoning":"Matches your modern palette."}"#,
        ));

        let result = analyzer.analyze("abc", &default_catalog()).await;
        assert_eq!(result.recommended_ids(), ["3", "7"]);
        assert_eq!(result.reasoning(), "Matches your modern palette.");
    }

    #[tokio::test]
    async fn missing_reasoning_gets_default() {
        let (analyzer, _mock) =
            analyzer_with(MockGenerativeClient::new().with_reply(r#"{"recommendedIds":["1"]}"#));

        let result = analyzer.analyze("abc", &default_catalog()).await;
        assert_eq!(result.recommended_ids(), ["1"]);
        assert_eq!(result.reasoning(), DEFAULT_REASONING);
    }

    #[tokio::test]
    async fn missing_ids_become_empty() {
        let (analyzer, _mock) = analyzer_with(
            MockGenerativeClient::new().with_reply(r#"{"recommendedIds":null,"reasoning":"Hmm."}"#),
        );

        let result = analyzer.analyze("abc", &default_catalog()).await;
        assert!(result.recommended_ids().is_empty());
        assert_eq!(result.reasoning(), "Hmm.");
    }

    #[tokio::test]
    async fn malformed_and_empty_replies_fail_softly() {
        for reply in ["", "not json", r#"{"recommendedIds": [1, 2]}"#, "[\"3\"]"] {
            let (analyzer, mock) =
                analyzer_with(MockGenerativeClient::new().with_reply(reply).with_reply(reply));

            let err = analyzer.try_analyze("abc", &[]).await.unwrap_err();
            assert!(err.is_bad_response(), "{reply:?} gave {err:?}");

            let result = analyzer.analyze("abc", &[]).await;
            assert_eq!(result, RecommendationResult::failed(), "{reply:?}");
            assert_eq!(mock.requests().await.len(), 2);
        }
    }

    #[tokio::test]
    async fn blank_image_is_rejected_without_network() {
        let (analyzer, mock) = analyzer_with(MockGenerativeClient::new());

        let err = analyzer
            .try_analyze("data:image/png;base64,", &default_catalog())
            .await
            .unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidInput(_)), "{err:?}");

        let result = analyzer.analyze("", &default_catalog()).await;
        assert_eq!(result, RecommendationResult::failed());
        assert!(mock.requests().await.is_empty());
    }

    #[tokio::test]
    async fn transport_error_yields_failed_result() {
        let (analyzer, _mock) = analyzer_with(
            MockGenerativeClient::new().with_error(AdvisorError::transport("timed out")),
        );

        let result = analyzer.analyze("abc", &default_catalog()).await;
        assert_eq!(result, RecommendationResult::failed());
        assert_eq!(result.reasoning(), ANALYSIS_FAILED_REASONING);
    }

    #[tokio::test]
    async fn extra_ids_are_truncated() {
        let (analyzer, _mock) = analyzer_with(MockGenerativeClient::new().with_reply(
            r#"{"recommendedIds":["1","2","3","4"],"reasoning":"Plenty."}"#,
        ));

        let result = analyzer.analyze("abc", &[]).await;
        assert_eq!(result.recommended_ids(), ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn unknown_ids_are_preserved() {
        let (analyzer, _mock) = analyzer_with(MockGenerativeClient::new().with_reply(
            r#"{"recommendedIds":["999"],"reasoning":"A piece we may not stock."}"#,
        ));

        let result = analyzer.analyze("abc", &default_catalog()).await;
        assert_eq!(result.recommended_ids(), ["999"]);
    }

    #[tokio::test]
    async fn reply_wrapped_in_code_fence_is_parsed() {
        let (analyzer, _mock) = analyzer_with(MockGenerativeClient::new().with_reply(
            "```json\n{\"recommendedIds\":[\"12\"],\"reasoning\":\"Soft texture.\"}\n```",
        ));

        let result = analyzer.analyze("abc", &[]).await;
        assert_eq!(result.recommended_ids(), ["12"]);
    }

    #[tokio::test]
    async fn data_url_prefix_is_stripped_before_sending() {
        let (analyzer, mock) = analyzer_with(MockGenerativeClient::new());

        analyzer
            .analyze("data:image/png;base64,iVBORw0KGgo=", &[])
            .await;
        analyzer.analyze("/9j/4AAQ", &[]).await;

        let requests = mock.requests().await;
        let inline: Vec<(String, String)> = requests
            .iter()
            .flat_map(|r| r.contents[0].parts.iter())
            .filter_map(|p| match p {
                Part::InlineData { mime_type, data } => Some((mime_type.clone(), data.clone())),
                Part::Text(_) => None,
            })
            .collect();
        assert_eq!(
            inline,
            vec![
                ("image/png".to_string(), "iVBORw0KGgo=".to_string()),
                ("image/jpeg".to_string(), "/9j/4AAQ".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn outbound_catalog_omits_price_image_and_rating() {
        let (analyzer, mock) = analyzer_with(MockGenerativeClient::new());
        let catalog = default_catalog();

        analyzer.analyze("abc", &catalog).await;

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        let outbound = serde_json::to_string(&requests[0]).unwrap();
        assert!(outbound.contains("Marble Coffee Table"));
        assert!(outbound.contains("Carrara marble"));
        for field in ["\\\"price\\\"", "\\\"image\\\"", "\\\"rating\\\"", "unsplash"] {
            assert!(!outbound.contains(field), "outbound request leaked {field}");
        }
    }

    #[test]
    fn request_carries_schema_constraint() {
        let payload = ImagePayload::from_encoded("abc");
        let request = RoomAnalyzer::build_request(&payload, &default_catalog()).unwrap();

        assert!(request.text().contains("up to 3 products"));
        let format = request.response_format.as_ref().expect("response format");
        assert_eq!(format.mime_type, "application/json");
        assert_eq!(format.schema, recommendation_schema());
    }

    #[test]
    fn parse_recommendation_rejects_missing_object() {
        let err = RoomAnalyzer::parse_recommendation("} nothing {").unwrap_err();
        assert!(matches!(err, AdvisorError::MalformedResponse(_)));
    }
}
