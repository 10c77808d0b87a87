pub mod invocation;

pub use invocation::{Attachment, Invocation};
