//! Single-key request dispatch.
//!
//! [`Dispatcher`] owns the immutable per-process state (identity marker, text
//! generator, generation timeout) and turns a raw body into a [`Reply`]:
//!
//! 1. parse the body ([`parse_body`])
//! 2. validate it into an [`Operation`]
//! 3. run the operation, awaiting the [`TextGenerator`] for `AI`
//! 4. wrap the outcome in an [`Envelope`]
//!
//! A `Dispatcher` is cheap to clone and is shared by every request handler.

use core::time::Duration;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    Envelope, Error, GenerationError, OperationOutput, Reply, Result, ops,
    request::{Operation, parse_body},
};

/// Opaque text-generation capability: given a prompt, return generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> core::result::Result<String, GenerationError>;
}

#[derive(Clone)]
pub struct Dispatcher {
    official_email: Arc<str>,
    generator: Arc<dyn TextGenerator>,
    generation_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        official_email: impl Into<Arc<str>>,
        generator: Arc<dyn TextGenerator>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            official_email: official_email.into(),
            generator,
            generation_timeout,
        }
    }

    pub fn official_email(&self) -> &str {
        &self.official_email
    }

    /// Liveness reply. Not subject to the single-key contract.
    pub fn health(&self) -> Reply {
        Reply::ok(Envelope::healthy(self.official_email()))
    }

    /// Parses, validates and runs `body`, always producing a reply.
    pub async fn handle(&self, body: &[u8]) -> Reply {
        let outcome = match parse_body(body) {
            Ok(value) => self.dispatch(&value).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(data) => Reply::ok(Envelope::success(self.official_email(), data)),
            Err(err) => {
                if err.is_client_error() {
                    tracing::debug!(error = %err, "rejected request");
                } else {
                    tracing::error!(error = %err, "request failed");
                }
                Reply::from_error(self.official_email(), &err)
            }
        }
    }

    /// Validates an already parsed body and runs the selected operation.
    pub async fn dispatch(&self, body: &Value) -> Result<OperationOutput> {
        let operation = Operation::try_from(body)?;
        tracing::debug!(operation = operation.key(), "dispatching");
        self.execute(operation).await
    }

    /// Runs a validated operation.
    pub async fn execute(&self, operation: Operation) -> Result<OperationOutput> {
        match operation {
            Operation::Fibonacci(n) => ops::fibonacci(n)
                .map(OperationOutput::Sequence)
                .ok_or(Error::InvalidFibonacci),
            // CPU-bound; must not run on an async worker.
            Operation::Prime(candidates) => {
                tokio::task::spawn_blocking(move || ops::primes(&candidates))
                    .await
                    .map(OperationOutput::Integers)
                    .map_err(Error::from)
            }
            Operation::Lcm(values) => ops::lcm_of(&values)
                .ok_or(Error::LcmExpectsIntegers)?
                .map(OperationOutput::Integer)
                .ok_or(Error::Overflow { operation: "lcm" }),
            Operation::Hcf(values) => ops::hcf_of(&values)
                .map(OperationOutput::Integer)
                .ok_or(Error::HcfExpectsIntegers),
            Operation::Ai(prompt) => self.summarize(&prompt).await.map(OperationOutput::Text),
        }
    }

    /// Sends `prompt` to the generator and keeps the first word of its answer.
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let text = tokio::time::timeout(self.generation_timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.generation_timeout))??;
        Ok(ops::first_word(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    const EMAIL: &str = "ops@example.com";

    struct Canned(&'static str);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> core::result::Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _prompt: &str) -> core::result::Result<String, GenerationError> {
            Err(GenerationError::UnexpectedShape)
        }
    }

    struct Stalled;

    #[async_trait]
    impl TextGenerator for Stalled {
        async fn generate(&self, _prompt: &str) -> core::result::Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok("late".to_string())
        }
    }

    fn dispatcher(generator: impl TextGenerator + 'static) -> Dispatcher {
        Dispatcher::new(EMAIL, Arc::new(generator), Duration::from_secs(5))
    }

    async fn reply(d: &Dispatcher, body: Value) -> Reply {
        d.handle(body.to_string().as_bytes()).await
    }

    #[tokio::test]
    async fn scenarios_from_the_contract() {
        let d = dispatcher(Canned("unused"));

        let r = reply(&d, json!({ "fibonacci": 5 })).await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(
            r.envelope,
            Envelope::success(EMAIL, OperationOutput::Sequence(vec![0, 1, 1, 2, 3]))
        );

        let r = reply(&d, json!({ "prime": [1, 2, 3, 4, 5, "x"] })).await;
        assert_eq!(r.envelope.data(), Some(&OperationOutput::Integers(vec![2, 3, 5])));

        let r = reply(&d, json!({ "lcm": [4, 6] })).await;
        assert_eq!(r.envelope.data(), Some(&OperationOutput::Integer(12)));

        let r = reply(&d, json!({ "hcf": [12, 18] })).await;
        assert_eq!(r.envelope.data(), Some(&OperationOutput::Integer(6)));

        let r = reply(&d, json!({ "fibonacci": -1 })).await;
        assert_eq!(r.status, StatusCode::BAD_REQUEST);
        assert_eq!(r.envelope, Envelope::failure(EMAIL, "Invalid fibonacci input"));
    }

    #[tokio::test]
    async fn key_count_and_unknown_key() {
        let d = dispatcher(Canned("unused"));

        for body in [json!({}), json!({ "lcm": [1], "hcf": [1] })] {
            let r = reply(&d, body).await;
            assert_eq!(r.status, StatusCode::BAD_REQUEST);
            assert_eq!(r.envelope.message(), Some("Exactly one key is required"));
        }

        let r = reply(&d, json!({ "factorial": 3 })).await;
        assert_eq!(r.status, StatusCode::BAD_REQUEST);
        assert_eq!(r.envelope.message(), Some("Invalid key"));
    }

    #[tokio::test]
    async fn malformed_and_empty_bodies() {
        let d = dispatcher(Canned("unused"));

        let r = d.handle(b"{\"fibonacci\":").await;
        assert_eq!(r.status, StatusCode::BAD_REQUEST);
        assert_eq!(r.envelope.message(), Some("Invalid JSON body"));

        let r = d.handle(b"").await;
        assert_eq!(r.envelope.message(), Some("Exactly one key is required"));
    }

    #[tokio::test]
    async fn lcm_overflow_is_internal() {
        let d = dispatcher(Canned("unused"));
        let r = reply(&d, json!({ "lcm": [i64::MAX, i64::MAX - 1] })).await;
        assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(r.envelope.message(), Some("Internal Server Error"));
    }

    #[tokio::test]
    async fn lcm_of_large_equal_values_fits() {
        let d = dispatcher(Canned("unused"));
        let big = 1_i64 << 62;
        let r = reply(&d, json!({ "lcm": [big, big] })).await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(
            r.envelope.data(),
            Some(&OperationOutput::Integer(4_611_686_018_427_387_904))
        );
    }

    #[tokio::test]
    async fn prime_filter_runs_off_the_async_workers() {
        let d = dispatcher(Canned("unused"));
        let out = d
            .execute(Operation::Prime(vec![2_147_483_647, 2_147_483_648, 1, 7]))
            .await
            .unwrap();
        assert_eq!(out, OperationOutput::Integers(vec![2_147_483_647, 7]));
    }

    #[tokio::test]
    async fn ai_returns_first_word() {
        let d = dispatcher(Canned("**Paris** is the capital of France."));
        let r = reply(&d, json!({ "AI": "What is the capital of France?" })).await;
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.envelope.data(), Some(&OperationOutput::Text("Paris".into())));
    }

    #[tokio::test]
    async fn ai_generator_failure_is_internal() {
        let d = dispatcher(Failing);
        let r = reply(&d, json!({ "AI": "anything" })).await;
        assert_eq!(r.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(r.envelope, Envelope::failure(EMAIL, "Internal Server Error"));
    }

    #[tokio::test(start_paused = true)]
    async fn ai_timeout_is_internal() {
        let d = dispatcher(Stalled);
        let err = d.execute(Operation::Ai("slow".into())).await.unwrap_err();
        assert!(matches!(err, Error::Generation(GenerationError::Timeout(_))));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let d = dispatcher(Canned("unused"));
        let body = json!({ "prime": [97, 98, 99, 101] });
        assert_eq!(reply(&d, body.clone()).await, reply(&d, body).await);
    }

    #[test]
    fn health_has_no_data() {
        let d = dispatcher(Canned("unused"));
        let r = d.health();
        assert_eq!(r.status, StatusCode::OK);
        assert_eq!(r.envelope, Envelope::healthy(EMAIL));
    }
}
