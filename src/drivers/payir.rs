//! Pay.ir: REST+JSON on both phases, GET redirect with the token embedded
//! in the path, sandbox via a fixed test api key.

pub mod constants;
pub mod transformers;

use serde_json::{json, Value};

use crate::driver::{FlowIntegration, GatewayAdapter, VerifyInput};
use crate::errors::{CustomResult, PaymentError};
use crate::flow::{Purchase, Settle, Verify};
use crate::redirect::PaymentInfo;
use crate::request::{RequestContent, Response};
use crate::schema::{FieldKind, Schema};
use crate::types::{
    base_request_schema, base_verify_schema, callback_field, links_schema, CallbackParams,
    Receipt, VerifyOptions,
};
use transformers::{
    PayirConfig, PayirPurchaseRequest, PayirPurchaseResponse, PayirRequestOptions,
    PayirVerifyRequest, PayirVerifyResponse,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Payir;

impl Payir {
    pub fn new() -> Self {
        Self
    }
}

impl GatewayAdapter for Payir {
    type Config = PayirConfig;
    type RequestOptions = PayirRequestOptions;
    type VerifyOptions = VerifyOptions;

    fn id(&self) -> &'static str {
        "payir"
    }

    fn config_schema(&self) -> Schema {
        Schema::object()
            .field("apiKey", FieldKind::Text)
            .optional("sandbox", FieldKind::Boolean)
            .field("links", FieldKind::Object(links_schema()))
    }

    fn request_schema(&self) -> Schema {
        Schema::extending(&base_request_schema())
            .optional("mobile", FieldKind::Text)
            .optional("nationalCode", FieldKind::Text)
            .optional("validCardNumber", FieldKind::Text)
    }

    fn verify_schema(&self) -> Schema {
        base_verify_schema()
    }

    fn default_config(&self) -> Value {
        json!({
            "links": {
                "request": constants::links::REQUEST,
                "verify": constants::links::VERIFY,
                "payment": constants::links::PAYMENT,
            }
        })
    }

    fn check_callback(&self, params: &CallbackParams) -> CustomResult<(), PaymentError> {
        let status = callback_field(params, "status")?;
        if status != "1" {
            return Err(constants::STATUS_CODES.classify(&status).into());
        }
        Ok(())
    }
}

impl FlowIntegration<Purchase> for Payir {
    type Input = PayirRequestOptions;
    type Output = PaymentInfo;

    fn get_url(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<String, PaymentError> {
        Ok(config.links.request.clone())
    }

    fn get_request_body(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Option<RequestContent>, PaymentError> {
        let body = PayirPurchaseRequest::try_from((config, input))?;
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let body: PayirPurchaseResponse = response.parse_struct("PayirPurchaseResponse")?;
        transformers::purchase_payment_info(config, body)
    }
}

impl FlowIntegration<Verify> for Payir {
    type Input = VerifyInput<VerifyOptions>;
    type Output = Receipt;

    fn get_url(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<String, PaymentError> {
        Ok(config.links.verify.clone())
    }

    fn get_request_body(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Option<RequestContent>, PaymentError> {
        let token = callback_field(&input.params, "token")?;
        let body = PayirVerifyRequest::new(config, token);
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let body: PayirVerifyResponse = response.parse_struct("PayirVerifyResponse")?;
        transformers::verify_receipt(body)
    }
}

impl FlowIntegration<Settle> for Payir {
    type Input = VerifyInput<VerifyOptions>;
    type Output = ();
}
