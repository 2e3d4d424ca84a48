//! Search pipeline: prompts → transport → extraction → parsing, wrapped by
//! the fallback policy in `pipeline`.

pub mod fallback;
pub mod parser;
pub mod pipeline;
pub mod prompts;
pub mod session;
