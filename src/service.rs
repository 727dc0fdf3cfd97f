//! The transport collaborator boundary and the shared flow-execution step.
//!
//! Adapters describe calls declaratively; this module is the only place that
//! actually talks to the network. Connection management, timeouts and
//! cancellation all belong to the client implementation behind [`ApiClient`].

use async_trait::async_trait;
use error_stack::{report, ResultExt};
use masking::{Maskable, PeekInterface};

use crate::driver::FlowIntegration;
use crate::errors::{CustomResult, PaymentError};
use crate::flow::FlowName;
use crate::request::{Method, Request, RequestContent, Response};

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("failed to construct the HTTP client")]
    ClientConstructionFailed,
    #[error("the request URL was malformed")]
    UrlEncodingFailed,
    #[error("the gateway did not answer in time")]
    RequestTimeout,
    #[error("failed to send the request to the gateway: {0}")]
    RequestNotSent(String),
    #[error("failed to read the gateway response body")]
    ResponseDecodingFailed,
}

/// The HTTP collaborator every gateway call goes through. Implemented over
/// reqwest in production and by canned-response mocks in tests.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn execute(&self, request: Request) -> CustomResult<Response, ApiClientError>;
}

pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> CustomResult<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .change_context(ApiClientError::ClientConstructionFailed)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ApiClient for ReqwestClient {
    async fn execute(&self, request: Request) -> CustomResult<Response, ApiClientError> {
        let url = reqwest::Url::parse(&request.url)
            .change_context(ApiClientError::UrlEncodingFailed)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => {
                let builder = self.client.post(url);
                match request.body {
                    Some(RequestContent::Json(payload)) => builder.json(&payload),
                    Some(RequestContent::FormUrlEncoded(payload)) => builder.form(&payload),
                    Some(RequestContent::RawBytes(bytes)) => builder.body(bytes),
                    None => builder,
                }
            }
        };
        for (name, value) in request.headers {
            let value = match &value {
                Maskable::Masked(secret) => secret.peek().clone(),
                Maskable::Normal(plain) => plain.clone(),
            };
            builder = builder.header(name.as_str(), value);
        }

        let response = builder.send().await.map_err(|error| {
            if error.is_timeout() {
                report!(ApiClientError::RequestTimeout)
            } else {
                report!(ApiClientError::RequestNotSent(error.to_string()))
            }
        })?;

        let status_code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .change_context(ApiClientError::ResponseDecodingFailed)?;
        Ok(Response { status_code, body })
    }
}

/// Runs one flow end to end: build the request from the adapter's hooks,
/// hand it to the transport, and let the adapter decode the answer.
///
/// Transport failures that carry no gateway payload classify as gateway
/// failures here; everything structured is the adapter's call.
pub async fn execute_flow<F, G>(
    adapter: &G,
    client: &dyn ApiClient,
    flow: FlowName,
    config: &G::Config,
    input: &<G as FlowIntegration<F>>::Input,
) -> CustomResult<<G as FlowIntegration<F>>::Output, PaymentError>
where
    G: FlowIntegration<F>,
{
    let request = adapter.build_request(config, input)?;
    tracing::info!(
        gateway = adapter.id(),
        %flow,
        method = %request.method,
        url = %request.url,
        "dispatching gateway call"
    );
    if let Some(body) = request.body.as_ref() {
        tracing::debug!(gateway = adapter.id(), %flow, body = %body.masked_value(), "gateway request body");
    }

    let response = client
        .execute(request)
        .await
        .change_context(PaymentError::gateway_failure())
        .attach_printable("transport failure while calling the gateway")?;
    tracing::info!(
        gateway = adapter.id(),
        %flow,
        status = response.status_code,
        "gateway answered"
    );

    if !response.is_success() {
        return Err(adapter.handle_error_response(&response));
    }
    adapter.handle_response(config, input, response)
}
