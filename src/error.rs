//! Error types shared by the graph view and the concept API client.

use thiserror::Error;

/// Reasons the graph view could not be started.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GraphError {
	/// The concept list was empty, so there is nothing to lay out.
	#[error("no graph data available")]
	NoData,
	/// The drawing surface or its 2d context could not be obtained.
	#[error("canvas unavailable: {0}")]
	Canvas(String),
}

/// Failures talking to the concept service.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApiError {
	/// The request never produced a response.
	#[error("network request failed: {0}")]
	Network(String),
	/// The service answered with a non-success status code.
	#[error("unexpected response status {0}")]
	Status(u16),
	/// The body was not the JSON shape we expected.
	#[error("malformed payload: {0}")]
	Payload(String),
}

impl From<serde_json::Error> for ApiError {
	fn from(err: serde_json::Error) -> Self {
		Self::Payload(err.to_string())
	}
}
