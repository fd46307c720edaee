pub mod attendance;
pub mod backup_exchange;
pub mod core;
pub mod grades;
pub mod prefs;
pub mod stats;
pub mod students;
