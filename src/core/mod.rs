pub mod event_data;
pub mod locks;
pub mod log;
pub mod session;
pub mod view;

pub use session::AttendanceSession;
