//! Domain aggregates and the pure view logic of the lead tracker.

pub mod datetime;
pub mod lead;
pub mod saved_list;
#[cfg(test)]
pub(crate) mod test_support;
pub mod types;
pub mod user;
pub mod view;
