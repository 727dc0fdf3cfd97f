//! The redirect instruction handed back after a successful payment request.
//!
//! Gateways send payers to their hosted page three different ways: a GET
//! with an opaque token on a known path, a GET with query parameters, or a
//! POST the browser cannot make from a plain link. All three collapse into
//! one [`PaymentInfo`] value, so callers never branch on gateway identity.

use std::collections::HashMap;

use serde::Serialize;

use crate::request::Method;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentInfo {
    pub method: Method,
    pub url: String,
    /// Gateway-issued reference for this payment attempt, echoed back on the
    /// callback and used for support lookups.
    pub reference_id: String,
    /// Query parameters for GET redirects, form fields for POST redirects.
    pub params: HashMap<String, String>,
}

impl PaymentInfo {
    /// GET redirect with the gateway token embedded in the path.
    pub fn via_token(payment_base: &str, token: impl Into<String>) -> Self {
        let token = token.into();
        let url = format!("{}/{}", payment_base.trim_end_matches('/'), token);
        Self {
            method: Method::Get,
            url,
            reference_id: token,
            params: HashMap::new(),
        }
    }

    /// GET redirect carrying its data as URL query parameters.
    pub fn via_query(
        payment_url: &str,
        reference_id: impl Into<String>,
        params: HashMap<String, String>,
    ) -> Self {
        let url = match url::Url::parse(payment_url) {
            Ok(mut parsed) => {
                for (name, value) in &params {
                    parsed.query_pairs_mut().append_pair(name, value);
                }
                parsed.to_string()
            }
            // Config validation already vetted gateway URLs; keep the raw
            // string rather than panic if an override slipped through.
            Err(_) => payment_url.to_owned(),
        };
        Self {
            method: Method::Get,
            url,
            reference_id: reference_id.into(),
            params,
        }
    }

    /// POST redirect: the payer's browser must submit `fields` to the
    /// gateway as a form. Pair with [`Self::form_html`].
    pub fn via_form(
        payment_url: &str,
        reference_id: impl Into<String>,
        fields: HashMap<String, String>,
    ) -> Self {
        Self {
            method: Method::Post,
            url: payment_url.to_owned(),
            reference_id: reference_id.into(),
            params: fields,
        }
    }

    /// Renders a self-submitting hidden form for this instruction. The
    /// presentation layer emits this markup once per payment attempt, lets
    /// it submit, and discards it — it must never be replayed, since the
    /// submission is what opens the payment on the gateway side.
    pub fn form_html(&self) -> String {
        let mut html = String::from(
            "<form id=\"gateway-redirect\" style=\"display:none\" target=\"_self\"",
        );
        html.push_str(&format!(
            " method=\"{}\" action=\"{}\">",
            self.method,
            escape_html(&self.url)
        ));
        for (name, value) in &self.params {
            html.push_str(&format!(
                "<input type=\"hidden\" name=\"{}\" value=\"{}\">",
                escape_html(name),
                escape_html(value)
            ));
        }
        html.push_str("</form>");
        html.push_str("<script>document.getElementById(\"gateway-redirect\").submit();</script>");
        html
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for character in raw.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_redirects_join_paths_without_double_slashes() {
        let with_slash = PaymentInfo::via_token("https://gateway.test/start/", "A0001");
        let without = PaymentInfo::via_token("https://gateway.test/start", "A0001");
        assert_eq!(with_slash.url, "https://gateway.test/start/A0001");
        assert_eq!(without.url, with_slash.url);
        assert_eq!(with_slash.method, Method::Get);
        assert_eq!(with_slash.reference_id, "A0001");
    }

    #[test]
    fn query_redirects_encode_parameters() {
        let info = PaymentInfo::via_query(
            "https://gateway.test/pay",
            "ref-1",
            HashMap::from([("token".to_owned(), "a b&c".to_owned())]),
        );
        assert_eq!(info.method, Method::Get);
        assert!(info.url.starts_with("https://gateway.test/pay?token="));
        assert!(!info.url.contains(' '));
    }

    #[test]
    fn form_redirects_render_auto_submitting_markup() {
        let info = PaymentInfo::via_form(
            "https://gateway.test/startpay",
            "REF123",
            HashMap::from([("RefId".to_owned(), "REF123".to_owned())]),
        );
        assert_eq!(info.method, Method::Post);

        let html = info.form_html();
        assert!(html.contains("method=\"POST\""));
        assert!(html.contains("action=\"https://gateway.test/startpay\""));
        assert!(html.contains("name=\"RefId\" value=\"REF123\""));
        assert!(html.contains(".submit()"));
    }

    #[test]
    fn form_html_escapes_field_values() {
        let info = PaymentInfo::via_form(
            "https://gateway.test/startpay",
            "r",
            HashMap::from([("note".to_owned(), "<b>\"x\"</b>".to_owned())]),
        );
        let html = info.form_html();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;&quot;x&quot;&lt;/b&gt;"));
    }
}
