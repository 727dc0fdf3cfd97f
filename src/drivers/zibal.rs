//! Zibal: REST+JSON on both phases, GET redirect with the track id embedded
//! in the path.

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
    ZibalConfig, ZibalPurchaseRequest, ZibalPurchaseResponse, ZibalRequestOptions,
    ZibalVerifyRequest, ZibalVerifyResponse,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct Zibal;

impl Zibal {
    pub fn new() -> Self {
        Self
    }
}

impl GatewayAdapter for Zibal {
    type Config = ZibalConfig;
    type RequestOptions = ZibalRequestOptions;
    type VerifyOptions = VerifyOptions;

    fn id(&self) -> &'static str {
        "zibal"
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
        let success = callback_field(params, "success")?;
        if success != "1" {
            let status = callback_field(params, "status").unwrap_or_default();
            return Err(constants::CALLBACK_STATUSES.classify(&status).into());
        }
        Ok(())
    }
}

impl FlowIntegration<Purchase> for Zibal {
    type Input = ZibalRequestOptions;
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
        let body = ZibalPurchaseRequest::try_from((config, input))?;
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let body: ZibalPurchaseResponse = response.parse_struct("ZibalPurchaseResponse")?;
        transformers::purchase_payment_info(config, body)
    }
}

impl FlowIntegration<Verify> for Zibal {
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
        let track_id = callback_field(&input.params, "trackId")?;
        let body = ZibalVerifyRequest::new(config, track_id);
        Ok(Some(RequestContent::Json(Box::new(body))))
    }

    fn handle_response(
        &self,
        _config: &Self::Config,
        _input: &Self::Input,
        response: Response,
    ) -> CustomResult<Self::Output, PaymentError> {
        let body: ZibalVerifyResponse = response.parse_struct("ZibalVerifyResponse")?;
        transformers::verify_receipt(body)
    }
}

impl FlowIntegration<Settle> for Zibal {
    type Input = VerifyInput<VerifyOptions>;
    type Output = ();
}
