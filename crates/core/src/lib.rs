pub mod error;
pub mod languages;
pub mod model;
pub mod page;
pub mod prompts;
pub mod reader;
pub mod settings;
pub mod task;

pub use error::{PosteaError, Result};
pub use languages::{LANGUAGES, LanguageOption, find_by_english, native_name, prompt_locale};
pub use model::{ModelEntry, ModelRef, ProviderSettings, SERVER_PROVIDER, available_models, resolve_selected_model};
pub use page::{
    LibrarySaveStatus, OperateResult, OperateResultCache, PageContent, PageDetail, PageItem, PageListQuery, PageSort,
    UpdatePageRequest,
};
pub use prompts::{BUILTIN_PROMPT_IDS, Prompt, is_builtin, system_prompts};
pub use reader::{ParsedArticle, ParserKind, normalize_for_dispatch, parse_document, parse_document_with_options};
#[doc(hidden)]
pub use reader::{ParseOptions, document::Document};
pub use settings::{DEFAULT_TARGET_LANGUAGE, PromptsSettings, SettingsStore};
pub use task::{TaskEvent, TaskId, TaskMessage, TaskPhase, TaskView};
