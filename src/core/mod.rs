pub mod providers;
pub mod search_console;
pub mod seo;
pub mod store;
pub mod verification;
pub mod workflow;

// Re-export commonly used types for convenience
pub use providers::google::{GoogleApiClient, GoogleAuthClient, GoogleError, TokenProvider};
pub use search_console::{SearchConsole, SearchConsoleClient};
pub use seo::SeoPath;
pub use store::{SqliteVerificationStore, VerificationRecord, VerificationStore};
pub use verification::{SiteVerificationClient, SiteVerifier, VerificationToken};
pub use workflow::{StepOutcome, VerificationSummary, VerificationWorkflow, WorkflowError};
