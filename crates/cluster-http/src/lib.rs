//! HTTP transport for cluster group operations.
//!
//! Each host exposes:
//!
//! | Operation | Request | Success |
//! |---|---|---|
//! | create | `POST /v1/group/` with `{"groupId": id}` | 201 |
//! | delete | `DELETE /v1/group/` with `{"groupId": id}` | 200 |
//! | verify | `GET /v1/group/{id}/` | 200 (404 means absent) |

mod client;
mod error;

pub use client::{DEFAULT_TIMEOUT, HttpGroupClient};
pub use error::HttpClientError;

pub type Result<T> = std::result::Result<T, HttpClientError>;
