pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod usecase;

pub use config::{Config, Thresholds};
pub use error::BunkrError;
pub use model::bunk::{allowance_closed_form, TargetPercent};
pub use model::ledger::{ActionKind, AttendanceLedger};
pub use model::subject::Subject;
pub use repository::{default_data_dir, Entity, FileSubjectRepository, Repository};
pub use input::{parse_args, expand_key, parse_action, parse_target, ParsedInput};
pub use service::subject_service::SubjectService;
pub use service::dto::SubjectDto;
pub use usecase::overview::{Overview, OverviewUseCase};
