//! Response shapes for typed execution.
//!
//! A [`ResultShape`] describes, at the type level, what a successful
//! response body decodes into. Each endpoint picks its shape statically:
//!
//! - [`Object<T>`] - a single JSON object decoded to `T`
//! - [`List<T>`] - a JSON array decoded to `Vec<T>`
//! - [`Void`] - the body is ignored; success depends only on the status

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::MgmtError;

/// Decodes a success response body into a statically known output.
///
/// Shapes are never instantiated; they only parameterize
/// [`PendingRequest`](crate::request::PendingRequest).
pub trait ResultShape {
    /// The decoded value returned by `execute()`.
    type Output;

    /// Decodes the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// Returns `MgmtError::ResponseDecoding` if the body doesn't match.
    fn decode(body: &[u8]) -> Result<Self::Output, MgmtError>;
}

/// A single JSON object mapped to `T`.
#[derive(Debug)]
pub struct Object<T>(PhantomData<fn() -> T>);

/// A JSON array mapped to an ordered `Vec<T>`.
#[derive(Debug)]
pub struct List<T>(PhantomData<fn() -> T>);

/// No content; the body is discarded.
#[derive(Debug)]
pub struct Void;

impl<T: DeserializeOwned> ResultShape for Object<T> {
    type Output = T;

    fn decode(body: &[u8]) -> Result<T, MgmtError> {
        let value: serde_json::Value = parse_json(body)?;
        if !value.is_object() {
            return Err(MgmtError::ResponseDecoding(format!(
                "expected a JSON object, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| MgmtError::ResponseDecoding(e.to_string()))
    }
}

impl<T: DeserializeOwned> ResultShape for List<T> {
    type Output = Vec<T>;

    fn decode(body: &[u8]) -> Result<Vec<T>, MgmtError> {
        let value: serde_json::Value = parse_json(body)?;
        if !value.is_array() {
            return Err(MgmtError::ResponseDecoding(format!(
                "expected a JSON array, got {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| MgmtError::ResponseDecoding(e.to_string()))
    }
}

impl ResultShape for Void {
    type Output = ();

    fn decode(_body: &[u8]) -> Result<(), MgmtError> {
        Ok(())
    }
}

fn parse_json(body: &[u8]) -> Result<serde_json::Value, MgmtError> {
    if body.is_empty() {
        return Err(MgmtError::ResponseDecoding(
            "response body is empty".to_string(),
        ));
    }
    serde_json::from_slice(body).map_err(|e| MgmtError::ResponseDecoding(e.to_string()))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
