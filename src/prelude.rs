//! A "prelude" for the crate's extension traits.
//!
//! ```
//! use cascade::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::ext::RequestExt;
