//! Gazette core: pure job state machine, stage mapping and article exploration.
mod article;
mod effect;
mod index;
mod job;
mod msg;
mod session;
mod stage;
mod state;
mod update;
mod upload;
mod view_model;

pub use article::{Article, KeywordSummary, ProcessResult, SearchHit};
pub use effect::Effect;
pub use index::ArticleIndex;
pub use job::{Job, JobId, JobStatus, JobStatusReport, SubmitReceipt, Ticket};
pub use msg::Msg;
pub use session::ExplorationSession;
pub use stage::{map_stage, Stage};
pub use state::{AppState, Failure, FailureKind, Pipeline};
pub use update::update;
pub use upload::{validate_upload, DocumentUpload, UploadError, MAX_UPLOAD_BYTES, PDF_CONTENT_TYPE};
pub use view_model::{
    AppViewModel, ArticleCardView, ArticleDetailView, ExplorationView, KeywordChipView,
    KeywordModalView, Phase, KEYWORD_CHIP_LIMIT,
};
