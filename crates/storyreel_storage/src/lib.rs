//! Object storage for Storyreel.
//!
//! The pipeline persists synthesized audio and finished videos through the
//! [`ObjectStorage`] trait and only ever sees URLs coming back. [`LocalStorage`] keeps
//! objects in a directory and publishes them under `{base_url}/uploads/{name}`.
//!
//! # Example
//!
//! ```rust
//! use storyreel_storage::{LocalStorage, ObjectStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = LocalStorage::new("/tmp/storyreel-uploads", "http://localhost:8000")?;
//!
//! let url = storage.upload_bytes(b"ID3", "tts_demo.mp3").await?;
//! assert_eq!(url, "http://localhost:8000/uploads/tts_demo.mp3");
//!
//! assert!(storage.delete(&url).await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod local;
mod storage;

pub use local::LocalStorage;
pub use storage::ObjectStorage;
pub use storyreel_error::{StorageError, StorageErrorKind};
