//! # Wire bodies for the cloud put endpoint.
//!
//! Two revisions are in the field. V1 wraps the parameters in a
//! named-method envelope; V2 sends the same parameters as a flat body:
//!
//! ```text
//! V1: {"method": "ci_put", "params": {"clientId": …, "accessKey": …, "codeLineData": {…}}}
//! V2: {"clientId": …, "accessKey": …, "codeLineData": {…}}
//! ```
//!
//! The revision is selected by the persisted protocol-version tag: an empty
//! tag means the installation predates the tag and speaks V1.

use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::scan::ScanRecord;

/// Method name of the V1 envelope.
const PUT_METHOD: &str = "ci_put";

/// Wire protocol revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireProtocol {
    /// Named-method envelope.
    V1,
    /// Flat parameter body.
    V2,
}

impl WireProtocol {
    /// Selects the revision from the persisted version tag.
    pub fn from_version_tag(tag: &str) -> Self {
        if tag.trim().is_empty() {
            WireProtocol::V1
        } else {
            WireProtocol::V2
        }
    }
}

/// Parameters common to both revisions.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PutParams<'a> {
    client_id: &'a str,
    access_key: &'a str,
    code_line_data: &'a ScanRecord,
}

/// Request body for the put endpoint, in either revision.
#[derive(Serialize)]
#[serde(untagged)]
pub(crate) enum PutBody<'a> {
    Envelope {
        method: &'static str,
        params: PutParams<'a>,
    },
    Flat(PutParams<'a>),
}

/// Builds the request body for the given revision.
pub(crate) fn put_body<'a>(
    protocol: WireProtocol,
    config: &'a ConnectionConfig,
    record: &'a ScanRecord,
) -> PutBody<'a> {
    let params = PutParams {
        client_id: &config.client_id,
        access_key: &config.access_key,
        code_line_data: record,
    };
    match protocol {
        WireProtocol::V1 => PutBody::Envelope {
            method: PUT_METHOD,
            params,
        },
        WireProtocol::V2 => PutBody::Flat(params),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::Verdict;

    fn config(version: &str) -> ConnectionConfig {
        ConnectionConfig {
            base_url: "https://cloud.example/put".into(),
            client_id: "CLIENT00XYZ".into(),
            access_key: "AK1234567".into(),
            protocol_version: version.into(),
        }
    }

    fn record() -> ScanRecord {
        ScanRecord::new("PZXXXGB", "L2", Verdict::Valid).with_surname("ERIKSSON")
    }

    #[test]
    fn test_empty_tag_selects_v1() {
        assert_eq!(WireProtocol::from_version_tag(""), WireProtocol::V1);
        assert_eq!(WireProtocol::from_version_tag("  "), WireProtocol::V1);
        assert_eq!(WireProtocol::from_version_tag("02"), WireProtocol::V2);
    }

    #[test]
    fn test_v1_wraps_params_in_named_method_envelope() {
        let cfg = config("");
        let rec = record();
        let body = put_body(cfg.protocol(), &cfg, &rec);
        let value = serde_json::to_value(&body).expect("serialize");

        assert_eq!(value["method"], "ci_put");
        assert_eq!(value["params"]["clientId"], "CLIENT00XYZ");
        assert_eq!(value["params"]["accessKey"], "AK1234567");
        assert_eq!(value["params"]["codeLineData"]["surname"], "ERIKSSON");
    }

    #[test]
    fn test_v2_sends_flat_body() {
        let cfg = config("02");
        let rec = record();
        let body = put_body(cfg.protocol(), &cfg, &rec);
        let value = serde_json::to_value(&body).expect("serialize");

        assert!(value.get("method").is_none());
        assert_eq!(value["clientId"], "CLIENT00XYZ");
        assert_eq!(value["codeLineData"]["line1"], "PZXXXGB");
    }
}
