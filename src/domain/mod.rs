pub mod leads;
pub mod posts;
pub mod properties;
