pub mod automation;
pub mod chat;
pub mod edit;
pub mod events;
pub mod llm;
pub mod portfolio;
pub mod publish;
pub mod tools;
pub mod workspace;

// Re-export commonly used types for convenience.
pub use chat::{ChatSession, EditEngine, EngineReply};
pub use edit::{apply, EditOperation};
pub use portfolio::{Portfolio, PortfolioStore};
pub use publish::{PublishResult, Publisher};
pub use workspace::AppConfig;
