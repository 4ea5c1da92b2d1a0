//! Production implementations of the injection seams.

pub mod http;
pub mod process;

pub use http::ReqwestHttpClient;
pub use process::TokioProcessRunner;
