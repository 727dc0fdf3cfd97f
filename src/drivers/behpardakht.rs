//! Behpardakht Mellat: SOAP+XML on every phase, POST form redirect, and a
//! mandatory settlement round-trip after verification.

pub mod constants;
#[cfg(test)]
mod test;
pub mod transformers;

use serde_json::{json, Value};

use crate::driver::{FlowIntegration, GatewayAdapter, VerifyInput};
use crate::errors::{CustomResult, PaymentError};
use crate::flow::{Purchase, Settle, Verify};
use crate::redirect::PaymentInfo;
use crate::request::{Request, Response};
use crate::schema::{FieldKind, Schema};
use crate::soap;
use crate::types::{
    base_request_schema, base_verify_schema, callback_field, links_schema, CallbackParams,
    Receipt, VerifyOptions,
};
use transformers::{BehpardakhtConfig, BehpardakhtRequestOptions};

#[derive(Debug, Default, Clone, Copy)]
pub struct Behpardakht;

impl Behpardakht {
    pub fn new() -> Self {
        Self
    }
}

impl GatewayAdapter for Behpardakht {
    type Config = BehpardakhtConfig;
    type RequestOptions = BehpardakhtRequestOptions;
    type VerifyOptions = VerifyOptions;

    fn id(&self) -> &'static str {
        "behpardakht"
    }

    fn config_schema(&self) -> Schema {
        Schema::object()
            .field("terminalId", FieldKind::Integer)
            .field("username", FieldKind::Text)
            .field("password", FieldKind::Text)
            .field("links", FieldKind::Object(links_schema()))
    }

    fn request_schema(&self) -> Schema {
        Schema::extending(&base_request_schema())
            .optional("orderId", FieldKind::Integer)
            .optional("payerId", FieldKind::Text)
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
        let res_code = callback_field(params, "ResCode")?;
        if res_code != "0" {
            return Err(constants::RES_CODES.classify(&res_code).into());
        }
        Ok(())
    }

    fn needs_settlement(&self) -> bool {
        true
    }
}

impl FlowIntegration<Purchase> for Behpardakht {
    type Input = BehpardakhtRequestOptions;
    type Output = PaymentInfo;

    fn build_request(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Request, PaymentError> {
        Ok(soap::request(
            &config.links.request,
            constants::SOAP_NAMESPACE,
            "bpPayRequest",
            &transformers::purchase_fields(config, input),
        ))
    }

    fn handle_response(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let result = soap::result_text(response.text()?, constants::RESULT_ELEMENT)?;
        transformers::purchase_payment_info(config, &result)
    }
}

impl FlowIntegration<Verify> for Behpardakht {
    type Input = VerifyInput<VerifyOptions>;
    type Output = Receipt;

    fn build_request(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Request, PaymentError> {
        Ok(soap::request(
            &config.links.verify,
            constants::SOAP_NAMESPACE,
            "bpVerifyRequest",
            &transformers::confirmation_fields(config, &input.params)?,
        ))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let result = soap::result_text(response.text()?, constants::RESULT_ELEMENT)?;
        transformers::verify_receipt(&result, &input.params)
    }
}

impl FlowIntegration<Settle> for Behpardakht {
    type Input = VerifyInput<VerifyOptions>;
    type Output = ();

    fn build_request(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Request, PaymentError> {
        Ok(soap::request(
            &config.links.verify,
            constants::SOAP_NAMESPACE,
            "bpSettleRequest",
            &transformers::confirmation_fields(config, &input.params)?,
        ))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let result = soap::result_text(response.text()?, constants::RESULT_ELEMENT)?;
        transformers::check_settle_result(&result)
    }
}
