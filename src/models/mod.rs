pub mod user;
pub mod study_group;
pub mod member;
pub mod join_request;
pub mod activity_log;

pub use user::User;
pub use study_group::{GroupStatus, StudyGroup};
pub use member::{GroupMember, GroupRole};
pub use join_request::{JoinRequest, JoinRequestStatus};
pub use activity_log::ActivityLog;
