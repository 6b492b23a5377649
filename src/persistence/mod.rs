pub mod records;
pub mod report;
pub mod saved_base;

pub use records::ObservationRecord;
pub use report::RatingReport;
pub use saved_base::SavedBase;
