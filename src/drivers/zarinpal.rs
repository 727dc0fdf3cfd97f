//! Zarinpal: REST+JSON on both phases, GET redirect with the payment
//! authority embedded in the path.

pub mod constants;
#[cfg(test)]
mod test;
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
    ZarinpalConfig, ZarinpalEnvelope, ZarinpalPurchaseData, ZarinpalPurchaseRequest,
    ZarinpalRequestOptions, ZarinpalVerifyData, ZarinpalVerifyRequest,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Zarinpal;

impl Zarinpal {
    pub fn new() -> Self {
        Self
    }
}

impl GatewayAdapter for Zarinpal {
    type Config = ZarinpalConfig;
    type RequestOptions = ZarinpalRequestOptions;
    type VerifyOptions = VerifyOptions;

    fn id(&self) -> &'static str {
        "zarinpal"
    }

    fn config_schema(&self) -> Schema {
        Schema::object()
            .field("merchantId", FieldKind::Text)
            .optional("sandbox", FieldKind::Boolean)
            .field("links", FieldKind::Object(links_schema()))
    }

    fn request_schema(&self) -> Schema {
        // The gateway accepts merchant-defined fields on the purchase call,
        // so this is one of the shapes that passes extras through.
        Schema::extending(&base_request_schema())
            .optional("mobile", FieldKind::Text)
            .optional("email", FieldKind::Text)
            .passthrough()
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
        let status = callback_field(params, "Status")?;
        if status != "OK" {
            return Err(PaymentError::gateway_failure_with(
                status,
                "gateway reported the payment as not completed",
            )
            .into());
        }
        Ok(())
    }
}

impl FlowIntegration<Purchase> for Zarinpal {
    type Input = ZarinpalRequestOptions;
    type Output = PaymentInfo;

    fn get_url(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<String, PaymentError> {
        Ok(config.links().request)
    }

    fn get_request_body(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Option<RequestContent>, PaymentError> {
        let body = ZarinpalPurchaseRequest::try_from((config, input))?;
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let envelope: ZarinpalEnvelope<ZarinpalPurchaseData> =
            response.parse_struct("ZarinpalPurchaseResponse")?;
        transformers::purchase_payment_info(config, envelope)
    }
}

impl FlowIntegration<Verify> for Zarinpal {
    type Input = VerifyInput<VerifyOptions>;
    type Output = Receipt;

    fn get_url(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
    ) -> CustomResult<String, PaymentError> {
        Ok(config.links().verify)
    }

    fn get_request_body(
        &self,
        config: &Self::Config,
        input: &Self::Input,
    ) -> CustomResult<Option<RequestContent>, PaymentError> {
        let authority = callback_field(&input.params, "Authority")?;
        let body = ZarinpalVerifyRequest::new(config, &input.options, authority);
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let envelope: ZarinpalEnvelope<ZarinpalVerifyData> =
            response.parse_struct("ZarinpalVerifyResponse")?;
        transformers::verify_receipt(envelope)
    }
}

impl FlowIntegration<Settle> for Zarinpal {
    type Input = VerifyInput<VerifyOptions>;
    type Output = ();
}
