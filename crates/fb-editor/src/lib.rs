pub mod actions;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod state;

pub use actions::FormAction;
pub use config::EditorConfig;
pub use error::EditorError;
pub use history::{DEFAULT_HISTORY_LIMIT, History};
pub use session::EditorSession;
pub use state::{ActionContext, FormState, execute_action};
