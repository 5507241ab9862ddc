pub mod m202608250001_create_users;
pub mod m202608250002_create_jobs;
pub mod m202608250003_create_rounds;
pub mod m202608250004_create_round_sessions;
pub mod m202608250005_create_applications;
pub mod m202608250006_create_attendance_records;
