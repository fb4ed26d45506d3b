#![cfg(feature = "provider-api")]
//! HTTP contract tests for the API style transfer generator.

use httpmock::prelude::*;
use serde_json::json;
use tst_eval::{ApiStyleTransfer, ApiTransferError, StyleRewriter};

#[test]
fn posts_the_batch_with_generation_parameters() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .json_body(json!({
                "model": "styletransfer",
                "texts": ["the most serious scandal", "another line"],
                "max_length": 200,
                "num_beams": 4,
                "temperature": 1.0,
            }));
        then.status(200).json_body(json!({
            "generated_texts": ["one scandal", "another rewritten line"],
        }));
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None);
    let outputs = generator
        .transfer(&["the most serious scandal", "another line"])
        .expect("mocked success");

    mock.assert();
    assert_eq!(outputs, ["one scandal", "another rewritten line"]);
}

#[test]
fn builder_overrides_reach_the_request_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .json_body(json!({
                "model": "styletransfer",
                "texts": ["hello"],
                "max_length": 64,
                "num_beams": 1,
                "temperature": 0.5,
            }));
        then.status(200)
            .json_body(json!({ "generated_texts": ["hi"] }));
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None)
        .with_max_gen_length(64)
        .with_num_beams(1)
        .with_temperature(0.5);
    generator.transfer(&["hello"]).expect("mocked success");

    mock.assert();
}

#[test]
fn sends_the_api_key_as_a_bearer_token() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/generate")
            .header("authorization", "Bearer secret-token");
        then.status(200)
            .json_body(json!({ "generated_texts": ["hi"] }));
    });

    let generator = ApiStyleTransfer::new(
        server.url("/generate"),
        "styletransfer",
        Some("secret-token".to_string()),
    );
    generator.transfer(&["hello"]).expect("mocked success");

    mock.assert();
}

#[test]
fn empty_batches_are_rejected_without_a_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(200)
            .json_body(json!({ "generated_texts": [] }));
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None);
    assert_eq!(generator.transfer(&[]), Err(ApiTransferError::Empty));
    assert_eq!(
        generator.transfer(&["fine", "  "]),
        Err(ApiTransferError::Empty)
    );
    mock.assert_hits(0);
}

#[test]
fn generation_count_mismatch_is_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(200)
            .json_body(json!({ "generated_texts": ["only one"] }));
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None);
    let err = generator
        .transfer(&["first", "second"])
        .expect_err("short response");

    assert_eq!(
        err,
        ApiTransferError::GenerationCount {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn server_errors_surface_as_request_failures() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(503);
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None);
    let err = generator.transfer(&["hello"]).expect_err("server error");

    assert!(matches!(err, ApiTransferError::Request(_)));
}

#[test]
fn malformed_bodies_are_invalid_responses() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/generate");
        then.status(200).body("not json");
    });

    let generator = ApiStyleTransfer::new(server.url("/generate"), "styletransfer", None);
    let err = generator.transfer(&["hello"]).expect_err("malformed body");

    assert_eq!(err, ApiTransferError::InvalidResponse);
}
