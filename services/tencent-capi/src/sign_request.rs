use crate::constants::*;
use crate::legacy::{self, ProtocolFields};
use crate::multipart::{random_boundary, MultipartForm};
use crate::params::{flatten, strip_nulls, FlatParams};
use crate::v3::{self, Payload, SigningContext};
use crate::{Config, Credential};
use bytes::Bytes;
use capisign_core::time::{now, DateTime};
use capisign_core::{Error, Result, SigningStage};
use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::{HeaderMap, HeaderValue, Method, Request, Uri};
use log::debug;
use serde_json::{Map, Value};

/// Per request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers, applied after the headers from config.
    pub headers: HeaderMap,
    /// Send the parameters as `multipart/form-data`, TC3 only.
    pub multipart: bool,
    /// Boundary of the multipart body, random if absent.
    pub boundary: Option<String>,
}

/// RequestSigner builds fully signed requests for Tencent Cloud API.
///
/// It never sends anything: the returned request is handed to whatever
/// transport the caller uses.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: Config,

    time: Option<DateTime>,
    nonce: Option<u16>,
}

impl RequestSigner {
    /// Create a new signer for given config.
    pub fn new(config: Config) -> Self {
        Self {
            config,

            time: None,
            nonce: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Specify the nonce used by the legacy signature.
    ///
    /// # Note
    ///
    /// We should always take a random nonce to sign requests.
    /// Only use this function for testing.
    pub fn with_nonce(mut self, nonce: u16) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Config of this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build a signed request calling `action` with `params`.
    pub fn sign(
        &self,
        action: &str,
        params: &Value,
        options: &RequestOptions,
        cred: &Credential,
    ) -> Result<Request<Bytes>> {
        let method = &self.config.req_method;
        if method != Method::GET && method != Method::POST {
            return Err(Error::request_invalid(format!(
                "method {method} is not supported, use GET or POST"
            )));
        }

        let params = if params.is_null() {
            Value::Object(Map::new())
        } else {
            strip_nulls(params)
        };
        let now = self.time.unwrap_or_else(now);

        let req = if self.config.sign_method.is_legacy() {
            self.build_legacy(action, &params, options, cred, now)?
        } else {
            self.build_v3(action, &params, options, cred, now)?
        };
        debug!(
            "signed {} request for action {action} with {}",
            req.method(),
            self.config.sign_method
        );
        Ok(req)
    }

    fn base_headers(&self, options: &RequestOptions) -> HeaderMap {
        let mut headers = self.config.headers.clone();
        // Replaces every value of a key present in both, keeps multi-valued headers whole.
        headers.extend(options.headers.clone());
        headers
    }

    fn build_legacy(
        &self,
        action: &str,
        params: &Value,
        options: &RequestOptions,
        cred: &Credential,
        now: DateTime,
    ) -> Result<Request<Bytes>> {
        if options.multipart {
            return Err(Error::signing(
                SigningStage::Payload,
                format!("multipart payload requires {TC3_ALGORITHM}"),
            ));
        }

        let config = &self.config;
        let fields = ProtocolFields {
            action,
            nonce: self.nonce.unwrap_or_else(legacy::random_nonce),
            timestamp: now.timestamp(),
            version: &config.version,
            region: config.region.as_deref(),
            language: config.language.as_deref(),
            sign_method: config.sign_method,
        };
        let params = fields.apply(&flatten(params), cred);
        let signed = legacy::sign(
            &config.req_method,
            &config.endpoint,
            &config.path,
            &params,
            cred,
            config.sign_method,
        )?;
        let encoded = form_encode(&signed);

        let mut headers = self.base_headers(options);
        let (uri, body) = if config.req_method == Method::GET {
            (format!("{}?{encoded}", config.url()), Bytes::new())
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
            (config.url(), Bytes::from(encoded))
        };

        build_request(config.req_method.clone(), uri.parse()?, headers, body)
    }

    fn build_v3(
        &self,
        action: &str,
        params: &Value,
        options: &RequestOptions,
        cred: &Credential,
        now: DateTime,
    ) -> Result<Request<Bytes>> {
        let config = &self.config;
        let timestamp = now.timestamp();

        let mut headers = self.base_headers(options);
        headers.insert(HOST, config.endpoint.parse()?);
        headers.insert(X_TC_ACTION, action.parse()?);
        headers.insert(X_TC_TIMESTAMP, HeaderValue::from(timestamp));
        headers.insert(X_TC_VERSION, config.version.parse()?);
        if let Some(token) = cred.token() {
            let mut value: HeaderValue = token.parse()?;
            value.set_sensitive(true);
            headers.insert(X_TC_TOKEN, value);
        }
        if let Some(region) = config.region.as_deref().filter(|v| !v.is_empty()) {
            headers.insert(X_TC_REGION, region.parse()?);
        }
        if let Some(language) = config.language.as_deref().filter(|v| !v.is_empty()) {
            headers.insert(X_TC_LANGUAGE, language.parse()?);
        }

        let mut url = config.url();
        let form;
        let (payload, body) = if config.req_method == Method::GET {
            if options.multipart {
                return Err(Error::signing(
                    SigningStage::Payload,
                    "multipart payload requires POST",
                ));
            }
            let query = form_encode(&flatten(params));
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
            (None, Bytes::new())
        } else if options.multipart {
            form = multipart_form(params, options.boundary.as_deref())?;
            headers.insert(CONTENT_TYPE, form.content_type().parse()?);
            (Some(&form), form.encode())
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
            (None, Bytes::from(serde_json::to_vec(params)?))
        };

        let uri: Uri = url.parse()?;
        let payload = match (payload, config.req_method == Method::GET) {
            (Some(form), _) => Payload::Multipart(form),
            (None, true) => Payload::Empty,
            (None, false) => Payload::Json(&body),
        };
        let ctx = SigningContext {
            service: config.service(),
            method: config.req_method.clone(),
            url: &uri,
            payload,
            timestamp,
        };

        let mut authorization: HeaderValue = v3::sign(&ctx, cred)?.parse()?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        build_request(config.req_method.clone(), uri, headers, body)
    }
}

fn form_encode(params: &FlatParams) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Build a multipart form from the top level members of params.
///
/// Nested members are sent as their JSON text.
fn multipart_form(params: &Value, boundary: Option<&str>) -> Result<MultipartForm> {
    let Value::Object(map) = params else {
        return Err(Error::request_invalid(
            "multipart payload requires a mapping of parameters",
        ));
    };

    let boundary = boundary.map_or_else(random_boundary, str::to_string);
    let form = map
        .iter()
        .fold(MultipartForm::with_boundary(&boundary), |form, (k, v)| match v {
            Value::String(v) => form.text(k, v.as_str()),
            v => form.text(k, v.to_string()),
        });
    Ok(form)
}

fn build_request(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Request<Bytes>> {
    let mut req = Request::builder().method(method).uri(uri).body(body)?;
    *req.headers_mut() = headers;
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipart::Part;
    use crate::SignatureMethod;
    use capisign_core::time::from_timestamp;
    use capisign_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const SECRET_ID: &str = "AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE";
    const SECRET_KEY: &str = "Gu5t9xGARNpq86cd98joQYCN3EXAMPLE";

    fn signer(config: Config) -> Result<RequestSigner> {
        Ok(RequestSigner::new(config)
            .with_time(from_timestamp(1577836800)?)
            .with_nonce(11886))
    }

    fn header<'a>(req: &'a Request<Bytes>, name: &str) -> Option<&'a str> {
        req.headers().get(name).and_then(|v| v.to_str().ok())
    }

    fn header_values<'a>(req: &'a Request<Bytes>, name: &str) -> Vec<&'a str> {
        req.headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    #[test]
    fn test_legacy_post() -> Result<()> {
        let signer = signer(Config::for_service("cvm").with_version("2017-03-12"))?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let req = signer.sign(
            "DescribeInstances",
            &json!({"Limit": 1, "Zone": null}),
            &RequestOptions::default(),
            &cred,
        )?;

        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.uri(), "https://cvm.tencentcloudapi.com/");
        assert_eq!(header(&req, "content-type"), Some(CONTENT_TYPE_FORM));

        let body: FlatParams = form_urlencoded::parse(req.body()).into_owned().collect();
        assert_eq!(body["Action"], "DescribeInstances");
        assert_eq!(body["Nonce"], "11886");
        assert_eq!(body["Timestamp"], "1577836800");
        assert_eq!(body["Version"], "2017-03-12");
        assert_eq!(body["Region"], "ap-guangzhou");
        assert_eq!(body["Language"], "en-US");
        assert_eq!(body["SignatureMethod"], "HmacSHA256");
        assert_eq!(body["SecretId"], SECRET_ID);
        assert_eq!(body["Limit"], "1");
        assert!(!body.contains_key("Zone"));

        let sign_str =
            legacy::string_to_sign(&Method::POST, "cvm.tencentcloudapi.com", "/", &body);
        assert_eq!(
            body["Signature"],
            legacy::signature(SECRET_KEY, &sign_str, SignatureMethod::HmacSha256)?
        );
        Ok(())
    }

    #[test]
    fn test_legacy_get() -> Result<()> {
        let signer = signer(
            Config::for_service("cvm")
                .with_req_method(Method::GET)
                .with_sign_method(SignatureMethod::HmacSha1),
        )?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let req = signer.sign(
            "DescribeZones",
            &json!({"Filters": [{"Name": "zone name", "Values": ["a&b"]}]}),
            &RequestOptions::default(),
            &cred,
        )?;

        assert_eq!(req.method(), Method::GET);
        assert!(req.body().is_empty());
        assert_eq!(req.uri().path(), "/");

        let query = req.uri().query().unwrap_or_default();
        let query: FlatParams = form_urlencoded::parse(query.as_bytes()).into_owned().collect();
        assert_eq!(query["Filters.0.Name"], "zone name");
        assert_eq!(query["Filters.0.Values.0"], "a&b");
        assert_eq!(query["SignatureMethod"], "HmacSHA1");

        let sign_str =
            legacy::string_to_sign(&Method::GET, "cvm.tencentcloudapi.com", "/", &query);
        assert_eq!(
            query["Signature"],
            legacy::signature(SECRET_KEY, &sign_str, SignatureMethod::HmacSha1)?
        );
        Ok(())
    }

    #[test]
    fn test_legacy_with_token_only_credential() -> Result<()> {
        let signer = signer(Config::for_service("cvm"))?;
        let cred = Credential {
            secret_id: None,
            secret_key: SECRET_KEY.to_string(),
            token: None,
        };

        let req = signer.sign("DescribeZones", &Value::Null, &RequestOptions::default(), &cred)?;
        let body: FlatParams = form_urlencoded::parse(req.body()).into_owned().collect();
        assert!(!body.contains_key("SecretId"));
        assert!(!body.contains_key("Token"));
        assert!(body.contains_key("Signature"));
        Ok(())
    }

    #[test]
    fn test_legacy_rejects_multipart() -> Result<()> {
        let signer = signer(Config::for_service("cvm"))?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let options = RequestOptions {
            multipart: true,
            ..Default::default()
        };

        let err = signer.sign("DescribeZones", &json!({}), &options, &cred).unwrap_err();
        assert_eq!(err.signing_stage(), Some(SigningStage::Payload));
        Ok(())
    }

    #[test]
    fn test_v3_post() -> Result<()> {
        let signer = signer(
            Config::for_service("cvm")
                .with_version("2017-03-12")
                .with_sign_method(SignatureMethod::Tc3HmacSha256),
        )?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY).with_token("session-token");

        let req = signer.sign(
            "DescribeInstances",
            &json!({"Limit": 1, "Offset": null}),
            &RequestOptions::default(),
            &cred,
        )?;

        assert_eq!(req.body().as_ref(), br#"{"Limit":1}"#);
        assert_eq!(header(&req, "host"), Some("cvm.tencentcloudapi.com"));
        assert_eq!(header(&req, "content-type"), Some("application/json"));
        assert_eq!(header(&req, "x-tc-action"), Some("DescribeInstances"));
        assert_eq!(header(&req, "x-tc-timestamp"), Some("1577836800"));
        assert_eq!(header(&req, "x-tc-version"), Some("2017-03-12"));
        assert_eq!(header(&req, "x-tc-region"), Some("ap-guangzhou"));
        assert_eq!(header(&req, "x-tc-language"), Some("en-US"));
        assert_eq!(header(&req, "x-tc-token"), Some("session-token"));
        assert!(req.headers()["x-tc-token"].is_sensitive());
        assert!(req.headers()[AUTHORIZATION].is_sensitive());
        assert_eq!(
            header(&req, "authorization"),
            Some(
                "TC3-HMAC-SHA256 Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/2020-01-01/cvm/tc3_request, \
                 SignedHeaders=content-type;host, \
                 Signature=d65018ed956f61ba3ebd1989215a3bcfd0b023ad9fe061ea5483d7b0230735bc"
            )
        );
        Ok(())
    }

    #[test]
    fn test_v3_get() -> Result<()> {
        let signer = signer(
            Config::for_service("cvm")
                .with_req_method(Method::GET)
                .with_sign_method(SignatureMethod::Tc3HmacSha256),
        )?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let req = signer.sign(
            "DescribeZones",
            &json!({"Limit": 10}),
            &RequestOptions::default(),
            &cred,
        )?;

        assert_eq!(req.uri(), "https://cvm.tencentcloudapi.com/?Limit=10");
        assert!(req.body().is_empty());
        assert_eq!(header(&req, "content-type"), Some(CONTENT_TYPE_FORM));

        let ctx = SigningContext {
            service: "cvm",
            method: Method::GET,
            url: req.uri(),
            payload: Payload::Empty,
            timestamp: 1577836800,
        };
        assert_eq!(header(&req, "authorization"), Some(v3::sign(&ctx, &cred)?.as_str()));
        Ok(())
    }

    #[test]
    fn test_v3_multipart() -> Result<()> {
        let signer =
            signer(Config::for_service("cvm").with_sign_method(SignatureMethod::Tc3HmacSha256))?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let options = RequestOptions {
            multipart: true,
            boundary: Some("XyZ".to_string()),
            ..Default::default()
        };

        let req = signer.sign("DescribeZones", &json!({"Limit": 1}), &options, &cred)?;

        assert_eq!(
            req.body().as_ref(),
            b"--XyZ\r\nContent-Disposition: form-data; name=\"Limit\"\r\n\r\n1\r\n--XyZ--\r\n"
        );
        assert_eq!(
            header(&req, "content-type"),
            Some("multipart/form-data; boundary=XyZ")
        );
        assert_eq!(
            header(&req, "authorization"),
            Some(
                "TC3-HMAC-SHA256 Credential=AKIDz8krbsJ5yKBZQpn74WFkmLPx3EXAMPLE/2020-01-01/cvm/tc3_request, \
                 SignedHeaders=content-type;host, \
                 Signature=aba4ae0670d5ef633b567026133219d458aae511b744bb95b7f5a0e95c84b02c"
            )
        );
        Ok(())
    }

    #[test]
    fn test_v3_rejects_missing_secret_id() -> Result<()> {
        let signer =
            signer(Config::for_service("cvm").with_sign_method(SignatureMethod::Tc3HmacSha256))?;
        let cred = Credential {
            secret_id: None,
            secret_key: SECRET_KEY.to_string(),
            token: Some("token".to_string()),
        };

        let err = signer
            .sign("DescribeZones", &json!({}), &RequestOptions::default(), &cred)
            .unwrap_err();
        assert_eq!(err.signing_stage(), Some(SigningStage::Credential));
        Ok(())
    }

    #[test]
    fn test_headers_merge_order() -> Result<()> {
        let mut config =
            Config::for_service("cvm").with_sign_method(SignatureMethod::Tc3HmacSha256);
        config
            .headers
            .insert("x-tc-traceid", HeaderValue::from_static("from-config"));
        config
            .headers
            .insert("x-custom", HeaderValue::from_static("from-config"));
        let signer = signer(config)?;

        let mut options = RequestOptions::default();
        options
            .headers
            .insert("x-custom", HeaderValue::from_static("from-options"));
        options
            .headers
            .insert("x-tc-action", HeaderValue::from_static("Spoofed"));

        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let req = signer.sign("DescribeZones", &json!({}), &options, &cred)?;

        assert_eq!(header(&req, "x-tc-traceid"), Some("from-config"));
        assert_eq!(header(&req, "x-custom"), Some("from-options"));
        assert_eq!(header(&req, "x-tc-action"), Some("DescribeZones"));
        Ok(())
    }

    #[test]
    fn test_headers_keep_every_value() -> Result<()> {
        let mut config = Config::for_service("cvm");
        config.headers.append("x-multi", HeaderValue::from_static("a"));
        config.headers.append("x-multi", HeaderValue::from_static("b"));
        config.headers.append("x-replaced", HeaderValue::from_static("from-config"));
        let signer = signer(config)?;

        let mut options = RequestOptions::default();
        options.headers.append("x-replaced", HeaderValue::from_static("c"));
        options.headers.append("x-replaced", HeaderValue::from_static("d"));

        let cred = Credential::new(SECRET_ID, SECRET_KEY);
        let req = signer.sign("DescribeZones", &json!({}), &options, &cred)?;

        assert_eq!(header_values(&req, "x-multi"), vec!["a", "b"]);
        assert_eq!(header_values(&req, "x-replaced"), vec!["c", "d"]);
        Ok(())
    }

    #[test]
    fn test_legacy_random_nonce_reaches_params() -> Result<()> {
        let signer = RequestSigner::new(Config::for_service("cvm"))
            .with_time(from_timestamp(1577836800)?);
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let req = signer.sign("DescribeZones", &json!({}), &RequestOptions::default(), &cred)?;
        let body: FlatParams = form_urlencoded::parse(req.body()).into_owned().collect();
        let nonce = body.get("Nonce").map(|v| v.parse::<u16>());
        assert!(matches!(nonce, Some(Ok(_))), "nonce must be a u16: {nonce:?}");

        let sign_str =
            legacy::string_to_sign(&Method::POST, "cvm.tencentcloudapi.com", "/", &body);
        assert_eq!(
            body["Signature"],
            legacy::signature(SECRET_KEY, &sign_str, SignatureMethod::HmacSha256)?
        );
        Ok(())
    }

    #[test]
    fn test_unsupported_method() -> Result<()> {
        let signer = signer(Config::for_service("cvm").with_req_method(Method::PUT))?;
        let cred = Credential::new(SECRET_ID, SECRET_KEY);

        let err = signer
            .sign("DescribeZones", &json!({}), &RequestOptions::default(), &cred)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
        Ok(())
    }

    #[test]
    fn test_multipart_form_from_params() -> Result<()> {
        let form = multipart_form(
            &json!({"Name": "site", "Count": 2, "Tags": ["a"]}),
            Some("b"),
        )?;
        let text = |name: &str| {
            form.parts().iter().find(|(k, _)| k == name).map(|(_, v)| v.clone())
        };

        assert_eq!(text("Name"), Some(Part::Text("site".to_string())));
        assert_eq!(text("Count"), Some(Part::Text("2".to_string())));
        assert_eq!(text("Tags"), Some(Part::Text(r#"["a"]"#.to_string())));

        assert!(multipart_form(&json!(["a"]), None).is_err());
        Ok(())
    }
}
