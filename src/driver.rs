//! The driver definition framework.
//!
//! A gateway adapter declares its shapes and per-flow wire behavior; this
//! module turns that declaration into a constructible, config-bound
//! [`Driver`] exposing the uniform `request`/`verify` contract. Config is
//! validated exactly once at construction and never mutated; every call
//! validates its own inputs and fails independently of other in-flight
//! calls, so one driver instance serves concurrent payments with no shared
//! mutable state.

use std::sync::Arc;

use async_trait::async_trait;
use error_stack::{Report, ResultExt};
use masking::Maskable;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{CustomResult, PaymentError, ValidationError};
use crate::flow::{FlowName, Purchase, Settle, Verify};
use crate::redirect::PaymentInfo;
use crate::request::{Method, Request, RequestBuilder, RequestContent, Response};
use crate::schema::{self, Schema};
use crate::service::{self, ApiClient};
use crate::types::{CallbackParams, Receipt};

/// What a gateway adapter declares about itself: its shapes, defaults, and
/// the lifecycle quirks the framework orchestrates around.
pub trait GatewayAdapter: Send + Sync + Sized {
    type Config: DeserializeOwned + Send + Sync;
    type RequestOptions: DeserializeOwned + Send + Sync;
    type VerifyOptions: DeserializeOwned + Send + Sync;

    fn id(&self) -> &'static str;

    fn config_schema(&self) -> Schema;
    fn request_schema(&self) -> Schema;
    fn verify_schema(&self) -> Schema;

    /// Documented defaults deep-merged under caller config, caller winning.
    fn default_config(&self) -> Value {
        Value::Object(serde_json::Map::new())
    }

    /// Pre-verification look at the raw callback. An error here
    /// short-circuits `verify` before any network I/O: a payment the
    /// gateway already reported failed is never confirmed.
    fn check_callback(&self, _params: &CallbackParams) -> CustomResult<(), PaymentError> {
        Ok(())
    }

    /// Whether a settlement round-trip must follow a successful
    /// verification.
    fn needs_settlement(&self) -> bool {
        false
    }
}

/// One flow's wire behavior: where to call, what to send, how to read the
/// answer. `execute_flow` composes these; adapter code never touches the
/// transport directly.
pub trait FlowIntegration<F>: GatewayAdapter {
    type Input: Send + Sync;
    type Output;

    /// Default bodies reject outright so gateways only spell out the flows
    /// they actually have; a flow left on the defaults is unreachable as
    /// long as the adapter's lifecycle declarations are honest.
    fn get_url(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<String, PaymentError> {
        Err(Report::new(PaymentError::gateway_failure())
            .attach_printable("flow is not supported by this gateway"))
    }

    fn get_method(&self) -> Method {
        Method::Post
    }

    fn get_headers(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<Vec<(String, Maskable<String>)>, PaymentError> {
        Ok(vec![(
            "Content-Type".to_string(),
            "application/json".to_string().into(),
        )])
    }

    fn get_request_body(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<Option<RequestContent>, PaymentError> {
        Ok(None)
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
        _response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        Err(Report::new(PaymentError::gateway_failure())
            .attach_printable("flow is not supported by this gateway"))
    }

    /// Non-2xx answers land here. Without structured error data there is
    /// nothing finer to say than "gateway failure".
    fn handle_error_response(&self, response: &Response) -> Report<PaymentError> {
        Report::new(PaymentError::GatewayFailure {
            code: Some(response.status_code.to_string()),
            message: None,
        })
        .attach_printable("gateway returned a non-success HTTP status")
    }

    fn build_request(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Request, PaymentError> {
        Ok(RequestBuilder::new()
            .method(self.get_method())
            .url(&self.get_url(config, input)?)
            .headers(self.get_headers(config, input)?)
            .set_optional_body(self.get_request_body(config, input)?)
            .build())
    }
}

/// Verification-side input: validated options plus the untouched callback.
pub struct VerifyInput<O> {
    pub options: O,
    pub params: CallbackParams,
}

fn validated<T: DeserializeOwned>(
    schema: &Schema,
    scope: &'static str,
    raw: &Value,
) -> CustomResult<T, PaymentError> {
    let normalized = schema
        .validate(raw)
        .map_err(|error| Report::new(PaymentError::Validation(error)))?;
    serde_json::from_value(normalized).change_context(PaymentError::Validation(
        ValidationError::single(scope, "normalized value did not match its declared shape"),
    ))
}

/// A config-bound gateway driver. Stateless between calls; cheap to share.
pub struct Driver<G: GatewayAdapter> {
    adapter: G,
    config: G::Config,
    client: Arc<dyn ApiClient>,
}

impl<G> std::fmt::Debug for Driver<G>
where
    G: GatewayAdapter + std::fmt::Debug,
    G::Config: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("adapter", &self.adapter)
            .field("config", &self.config)
            .field("client", &"<dyn ApiClient>")
            .finish()
    }
}

impl<G> Driver<G>
where
    G: GatewayAdapter
        + FlowIntegration<Purchase, Input = <G as GatewayAdapter>::RequestOptions, Output = PaymentInfo>
        + FlowIntegration<Verify, Input = VerifyInput<<G as GatewayAdapter>::VerifyOptions>, Output = Receipt>
        + FlowIntegration<Settle, Input = VerifyInput<<G as GatewayAdapter>::VerifyOptions>, Output = ()>,
{
    /// Merges gateway defaults under `raw_config`, validates the result and
    /// binds the adapter to it. Fails terminally on bad config — no network
    /// I/O has happened and the driver is never constructed.
    pub fn connect(
        adapter: G,
        raw_config: Value,
        client: Arc<dyn ApiClient>,
    ) -> CustomResult<Self, PaymentError> {
        let merged = schema::merge_defaults(adapter.default_config(), raw_config);
        let config = validated(&adapter.config_schema(), "config", &merged)?;
        tracing::debug!(gateway = adapter.id(), "gateway driver configured");
        Ok(Self {
            adapter,
            config,
            client,
        })
    }

    /// Opens a payment with the gateway and returns the redirect
    /// instruction for the payer's browser.
    pub async fn request(&self, raw_options: Value) -> CustomResult<PaymentInfo, PaymentError> {
        let options: G::RequestOptions =
            validated(&self.adapter.request_schema(), "options", &raw_options)?;
        service::execute_flow::<Purchase, G>(
            &self.adapter,
            self.client.as_ref(),
            FlowName::Purchase,
            &self.config,
            &options,
        )
        .await
    }

    /// Confirms a payment the payer was redirected back from and returns
    /// the normalized receipt. `params` is the raw callback data, passed
    /// through to the adapter unvalidated.
    pub async fn verify(
        &self,
        raw_options: Value,
        params: CallbackParams,
    ) -> CustomResult<Receipt, PaymentError> {
        let options: G::VerifyOptions =
            validated(&self.adapter.verify_schema(), "options", &raw_options)?;
        self.adapter.check_callback(&params)?;

        let input = VerifyInput { options, params };
        let receipt = service::execute_flow::<Verify, G>(
            &self.adapter,
            self.client.as_ref(),
            FlowName::Verify,
            &self.config,
            &input,
        )
        .await?;
        if self.adapter.needs_settlement() {
            service::execute_flow::<Settle, G>(
                &self.adapter,
                self.client.as_ref(),
                FlowName::Settle,
                &self.config,
                &input,
            )
            .await?;
        }
        Ok(receipt)
    }
}

/// The type-erased driver object handed out by the gateway registry.
#[async_trait]
pub trait PaymentDriver: Send + Sync {
    fn gateway(&self) -> &'static str;

    async fn request(&self, raw_options: Value) -> CustomResult<PaymentInfo, PaymentError>;

    async fn verify(
        &self,
        raw_options: Value,
        params: CallbackParams,
    ) -> CustomResult<Receipt, PaymentError>;
}

#[async_trait]
impl<G> PaymentDriver for Driver<G>
where
    G: GatewayAdapter
        + FlowIntegration<Purchase, Input = <G as GatewayAdapter>::RequestOptions, Output = PaymentInfo>
        + FlowIntegration<Verify, Input = VerifyInput<<G as GatewayAdapter>::VerifyOptions>, Output = Receipt>
        + FlowIntegration<Settle, Input = VerifyInput<<G as GatewayAdapter>::VerifyOptions>, Output = ()>
        + 'static,
{
    fn gateway(&self) -> &'static str {
        self.adapter.id()
    }

    async fn request(&self, raw_options: Value) -> CustomResult<PaymentInfo, PaymentError> {
        Driver::request(self, raw_options).await
    }

    async fn verify(
        &self,
        raw_options: Value,
        params: CallbackParams,
    ) -> CustomResult<Receipt, PaymentError> {
        Driver::verify(self, raw_options, params).await
    }
}
