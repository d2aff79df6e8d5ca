//! fal proxy integration.

mod client;
mod dto;

pub use client::FalClient;
pub use dto::{
    FalPollRequest, FalStatusBody, FalSubmitRequest, FalSubmitRequestBuilder, parse_status_body,
    parse_submit_body, remote_error_message,
};
