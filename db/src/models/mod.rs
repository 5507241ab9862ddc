pub mod application;
pub mod attendance_record;
pub mod job;
pub mod round;
pub mod round_session;
pub mod user;

pub use application::Entity as Application;
pub use attendance_record::Entity as AttendanceRecord;
pub use job::Entity as Job;
pub use round::Entity as Round;
pub use round_session::Entity as RoundSession;
pub use user::Entity as User;
