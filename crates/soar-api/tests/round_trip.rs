//! End-to-end request, execution, and normalization against a mock panel.

use anyhow::{Result, anyhow};
use httpmock::prelude::*;
use serde_json::Value;
use soar_api::{
    BuildError, Executor, Failure, HEADER_REQUEST_ID, Method, NormalizeError, Normalizer,
    PercentDecodeField, Printable, ResponseBody, Shape, TWO_FACTOR_IMAGE_FIELD, USER_AGENT, build,
};
use soar_config::{EndpointCredentials, HttpOptions, Surface};
use soar_test_support::fixtures::{
    collection_envelope, error_envelope, single_envelope, two_factor_payload, user_attributes,
};

const REQUEST_ID: &str = "3f0c7a52-0d4b-4c55-9d0c-6f1f0e3f2a10";

fn credentials(base_url: &str, token: &str) -> EndpointCredentials {
    EndpointCredentials {
        surface: Surface::Application,
        base_url: base_url.to_string(),
        token: token.to_string(),
    }
}

fn executor() -> Result<Executor> {
    Ok(Executor::new(REQUEST_ID, None)?)
}

fn printed(printable: Printable) -> Result<Value> {
    match printable {
        Printable::Json(text) => Ok(serde_json::from_str(&text)?),
        Printable::Nothing => Err(anyhow!("expected printable output")),
    }
}

#[test]
fn collection_request_sends_auth_and_unwraps_payloads() -> Result<()> {
    let server = MockServer::start();
    let envelope = collection_envelope(
        "user",
        [user_attributes(1, "alice"), user_attributes(2, "bob")],
    );
    let mock = server.mock(move |when, then| {
        when.method(GET)
            .path("/api/application/users")
            .query_param("filter[email]", "alice@example.com")
            .header("authorization", "Bearer ptla_test")
            .header("accept", "application/json")
            .header("user-agent", USER_AGENT)
            .header(HEADER_REQUEST_ID, REQUEST_ID);
        then.status(200)
            .header("content-type", "application/json")
            .json_body(envelope);
    });

    let request = build(
        &credentials(&server.base_url(), "ptla_test"),
        Method::Get,
        "/api/application/users?filter[email]=alice%40example.com",
        None,
    )?;
    let body = executor()?.execute(request)?;
    mock.assert();

    let options = HttpOptions {
        parse_body: true,
        parse_indent: true,
    };
    let output = printed(Normalizer::new(options).normalize(&body, Shape::Collection)?)?;
    let usernames: Vec<&str> = output
        .as_array()
        .ok_or_else(|| anyhow!("expected array"))?
        .iter()
        .filter_map(|user| user["username"].as_str())
        .collect();
    assert_eq!(usernames, ["alice", "bob"]);
    Ok(())
}

#[test]
fn post_body_is_forwarded_with_content_type() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/application/users")
            .header("content-type", "application/json")
            .json_body(serde_json::json!({"username": "carol"}));
        then.status(201)
            .json_body(single_envelope("user", user_attributes(3, "carol")));
    });

    let request = build(
        &credentials(&server.base_url(), "ptla_test"),
        Method::Post,
        "/api/application/users",
        Some(br#"{"username":"carol"}"#.to_vec()),
    )?;
    let body = executor()?.execute(request)?;
    mock.assert();

    let output = printed(Normalizer::new(HttpOptions::default()).normalize(&body, Shape::Single)?)?;
    assert_eq!(output["object"], "user");
    assert_eq!(output["attributes"]["username"], "carol");
    Ok(())
}

#[test]
fn error_envelope_becomes_api_failure() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/application/users/999");
        then.status(404).json_body(error_envelope(
            "NotFoundHttpException",
            "404",
            "The requested resource could not be found on the server.",
        ));
    });

    let request = build(
        &credentials(&server.base_url(), "ptla_test"),
        Method::Get,
        "/api/application/users/999",
        None,
    )?;
    let failure = executor()?
        .execute(request)
        .expect_err("404 should fail");
    mock.assert();

    match failure {
        Failure::Api { status, errors } => {
            assert_eq!(status, 404);
            assert_eq!(
                errors.to_string(),
                "NotFoundHttpException (404): \
                 The requested resource could not be found on the server."
            );
        }
        Failure::Transport { .. } => return Err(anyhow!("expected API failure")),
    }
    Ok(())
}

#[test]
fn unreachable_host_is_transport_failure() -> Result<()> {
    let request = build(
        &credentials("http://127.0.0.1:1", "ptla_test"),
        Method::Get,
        "/api/application/users",
        None,
    )?;
    let failure = executor()?
        .execute(request)
        .expect_err("nothing listens on port 1");
    assert!(matches!(failure, Failure::Transport { ref url, .. } if url == "http://127.0.0.1:1/api/application/users"));
    Ok(())
}

#[test]
fn no_content_prints_nothing() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/application/users/5");
        then.status(204);
    });

    let request = build(
        &credentials(&server.base_url(), "ptla_test"),
        Method::Delete,
        "/api/application/users/5",
        None,
    )?;
    let body = executor()?.execute(request)?;
    mock.assert();

    assert_eq!(body, ResponseBody::NoContent);
    let printable = Normalizer::new(HttpOptions::default()).normalize(&body, Shape::Single)?;
    assert_eq!(printable, Printable::Nothing);
    Ok(())
}

#[test]
fn missing_credentials_are_rejected_before_any_request() {
    let err = build(
        &credentials("http://127.0.0.1:1", ""),
        Method::Get,
        "/api/application/users",
        None,
    )
    .expect_err("empty token");
    assert!(matches!(
        err,
        BuildError::MissingCredentials {
            surface: Surface::Application
        }
    ));
}

#[test]
fn two_factor_payload_is_decoded() -> Result<()> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/client/account/two-factor");
        then.status(200).json_body(two_factor_payload(
            "otpauth%3A%2F%2Ftotp%2FPanel%3Auser%40example.com%3Fsecret%3DJBSWY3DP%26issuer%3DPanel",
            "JBSWY3DP",
        ));
    });

    let creds = EndpointCredentials {
        surface: Surface::Client,
        base_url: server.base_url(),
        token: "ptlc_test".to_string(),
    };
    let request = build(&creds, Method::Get, "/api/client/account/two-factor", None)?;
    let body = executor()?.execute(request)?;
    mock.assert();

    let hook = PercentDecodeField::new(TWO_FACTOR_IMAGE_FIELD);
    let options = HttpOptions {
        parse_body: true,
        parse_indent: false,
    };
    let Printable::Json(text) = Normalizer::new(options)
        .with_hook(&hook)
        .normalize(&body, Shape::Data)?
    else {
        return Err(anyhow!("expected printable output"));
    };
    assert_eq!(
        text,
        r#"{"image_url_data":"otpauth://totp/Panel:user@example.com?secret=JBSWY3DP&issuer=Panel","secret":"JBSWY3DP"}"#
    );
    Ok(())
}

#[test]
fn malformed_two_factor_payload_is_decode_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/client/account/two-factor");
        then.status(200)
            .json_body(two_factor_payload("otpauth%ZZ", "JBSWY3DP"));
    });

    let creds = EndpointCredentials {
        surface: Surface::Client,
        base_url: server.base_url(),
        token: "ptlc_test".to_string(),
    };
    let request = build(&creds, Method::Get, "/api/client/account/two-factor", None)?;
    let body = executor()?.execute(request)?;

    let hook = PercentDecodeField::new(TWO_FACTOR_IMAGE_FIELD);
    let err = Normalizer::new(HttpOptions::default())
        .with_hook(&hook)
        .normalize(&body, Shape::Data)
        .expect_err("invalid escape");
    assert!(matches!(err, NormalizeError::Decode { .. }));
    Ok(())
}
