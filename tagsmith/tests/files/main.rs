#![allow(missing_docs)]

mod extract;
mod mpeg;
pub(crate) mod util;
