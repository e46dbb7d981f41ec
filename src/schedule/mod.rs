pub mod normalize;

pub use normalize::{normalize_entry, normalize_schedule, ScheduleRow, MISSING_FIELD, UNKNOWN_UNIT};
