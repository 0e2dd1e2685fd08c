//! Run artifacts on disk.
//!
//! Every file written by one run carries the same [`RunStamp`] suffix:
//! `data_{stamp}.json` (records as JSON lines), `embeddings_{stamp}.json`
//! and `INFO_{stamp}.txt`.

mod embeddings;
mod error;
mod info;
mod records;
mod stamp;

pub use embeddings::{load_embeddings, save_embeddings};
pub use error::PersistError;
pub use info::{CREATED_FIELD, ModelInfo, SUBREDDIT_FIELD, SavedRun, load_saved_run, write_model_info};
pub use records::{parse_records, read_records, save_data, write_records};
pub use stamp::{RunStamp, STAMP_FORMAT};
