//! Data models for BOS requests and responses.
//!
//! This module contains the structures passed into and returned from
//! [`HttpClient`](crate::executor::HttpClient).

pub mod request;
pub mod response;

pub use request::{BosRequest, Headers, HttpMethod, Params, RequestBody};
pub use response::{BosResponse, ResponseBody};
