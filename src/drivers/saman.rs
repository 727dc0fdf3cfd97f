//! Saman (SEP): REST token request, POST auto-submitting form redirect, and
//! a SOAP confirmation round-trip that reports the settled amount.

pub mod constants;
#[cfg(test)]
mod test;
pub mod transformers;

use serde_json::{json, Value};

use crate::driver::{FlowIntegration, GatewayAdapter, VerifyInput};
use crate::errors::{CustomResult, PaymentError};
use crate::flow::{Purchase, Settle, Verify};
use crate::redirect::PaymentInfo;
use crate::request::{Request, RequestContent, Response};
use crate::schema::{FieldKind, Schema};
use crate::soap;
use crate::types::{
    base_request_schema, base_verify_schema, callback_field, links_schema, CallbackParams,
    Receipt, VerifyOptions,
};
use transformers::{SamanConfig, SamanPurchaseRequest, SamanPurchaseResponse, SamanRequestOptions};

#[derive(Debug, Default, Clone, Copy)]
pub struct Saman;

impl Saman {
    pub fn new() -> Self {
        Self
    }
}

impl GatewayAdapter for Saman {
    type Config = SamanConfig;
    type RequestOptions = SamanRequestOptions;
    type VerifyOptions = VerifyOptions;

    fn id(&self) -> &'static str {
        "saman"
    }

    fn config_schema(&self) -> Schema {
        Schema::object()
            .field("merchantId", FieldKind::Text)
            .field("links", FieldKind::Object(links_schema()))
    }

    fn request_schema(&self) -> Schema {
        Schema::extending(&base_request_schema())
            .optional("mobile", FieldKind::Text)
            .optional("orderId", FieldKind::Text)
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
        let state = callback_field(params, "State")?;
        if state != "Success" {
            return Err(constants::CALLBACK_STATES.classify(&state).into());
        }
        Ok(())
    }
}

impl FlowIntegration<Purchase> for Saman {
    type Input = SamanRequestOptions;
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
        let body = SamanPurchaseRequest::try_from((config, input))?;
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let body: SamanPurchaseResponse = response.parse_struct("SamanPurchaseResponse")?;
        transformers::purchase_payment_info(config, body)
    }
}

impl FlowIntegration<Verify> for Saman {
    type Input = VerifyInput<VerifyOptions>;
    type Output = Receipt;

    fn build_request(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Request, PaymentError> {
        let ref_num = callback_field(&input.params, "RefNum")?;
        Ok(soap::request(
            &config.links.verify,
            constants::SOAP_NAMESPACE,
            "verifyTransaction",
            &transformers::verify_fields(config, &ref_num),
        ))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let result = soap::result_text(response.text()?, constants::VERIFY_RESULT_ELEMENT)?;
        transformers::verify_receipt(&result, &input.options, &input.params)
    }
}

impl FlowIntegration<Settle> for Saman {
    type Input = VerifyInput<VerifyOptions>;
    type Output = ();
}
