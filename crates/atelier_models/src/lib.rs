//! Generation endpoint clients for Atelier.
//!
//! The only backend today is the fal proxy exposed as two serverless
//! functions: one to submit a generation and one to ask about a queued job.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod fal;

pub use fal::{
    FalClient, FalPollRequest, FalStatusBody, FalSubmitRequest, FalSubmitRequestBuilder,
    parse_status_body, parse_submit_body, remote_error_message,
};
