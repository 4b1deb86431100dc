//! Screen controllers composed from the codec, query builder, mode resolver,
//! reconciliation and request lifecycle.

pub mod edit;
pub mod list;

pub use edit::{EditController, SubmitOutcome, MIN_CONTENT_LEN};
pub use list::{ListController, ListRecord, NextPage};
