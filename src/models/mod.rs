pub mod movie;
pub mod search_record;

pub use movie::Movie;
pub use search_record::SearchRecord;
