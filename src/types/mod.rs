//! Stream identity and record types shared by the client and the risk helpers.

mod record;
mod stream;

pub use record::*;
pub use stream::*;
