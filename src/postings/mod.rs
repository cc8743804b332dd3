//! Posting lists: on-disk records, the skip-pointer doc-id list, and the
//! sorted-list set algebra that powers boolean retrieval.

pub mod algebra;
pub mod posting;
pub mod skiplist;

pub use posting::{Posting, PostingList};
pub use skiplist::DocIdList;
