//! A [`DocumentClient`](dynaquery_core::DocumentClient) for DynamoDB.
//!
//! [`AwsClient`] wraps a configured `aws_sdk_dynamodb::Client`. Loading SDK
//! configuration is left to the caller.

pub mod client;
pub mod convert;

pub use client::AwsClient;
