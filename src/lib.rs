pub mod application;
pub mod connector;
pub mod domain;

pub use application::{
    fallback_reply, recommendation_schema, ConversationSession, GenerativeClient, RoomAnalyzer,
    CONNECTION_FALLBACK, EMPTY_REPLY_FALLBACK, PERSONA_INSTRUCTION,
};

pub use connector::{ClientFactory, GeminiClient, MockGenerativeClient};

pub use domain::{
    default_catalog, find_products, AdvisorError, CatalogProjection, Category, ChatRole,
    ChatTurn, Content, ContentRole, GenerateRequest, ImagePayload, Part, Product,
    ProviderConfig, RecommendationResult, ResponseFormat, ANALYSIS_FAILED_REASONING,
    DEFAULT_REASONING, MAX_RECOMMENDATIONS, UNAVAILABLE_REASONING,
};
