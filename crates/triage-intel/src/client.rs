//! HTTP reputation client over three public intel sources.
//!
//! Each source is optional: without an API key it is skipped, and any
//! transport or decoding failure degrades to a null verdict for that source
//! only. One `check_address` call therefore always produces a report.

use crate::provider::{IntelError, IntelProvider};
use crate::report::{IntelReport, ScorePolicy, SourceFraction, SourceVerdict};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

const ABUSEIPDB_URL: &str = "https://api.abuseipdb.com/api/v2/check";
const VIRUSTOTAL_URL: &str = "https://www.virustotal.com/api/v3/ip_addresses";
const OTX_URL: &str = "https://otx.alienvault.com/api/v1/indicators/IPv4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// API keys for the reputation sources. `None` disables a source.
#[derive(Clone, Default)]
pub struct IntelApiKeys {
    /// AbuseIPDB API key.
    pub abuseipdb: Option<String>,
    /// VirusTotal API key.
    pub virustotal: Option<String>,
    /// AlienVault OTX API key.
    pub otx: Option<String>,
}

impl IntelApiKeys {
    /// No sources configured; every lookup yields empty verdicts.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether at least one source has a key.
    #[inline]
    #[must_use]
    pub fn any_configured(&self) -> bool {
        self.abuseipdb.is_some() || self.virustotal.is_some() || self.otx.is_some()
    }
}

impl std::fmt::Debug for IntelApiKeys {
    // Keys are secrets; log only which sources are enabled.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntelApiKeys")
            .field("abuseipdb", &self.abuseipdb.is_some())
            .field("virustotal", &self.virustotal.is_some())
            .field("otx", &self.otx.is_some())
            .finish()
    }
}

/// Reputation client querying AbuseIPDB, VirusTotal and OTX.
#[derive(Debug)]
pub struct HttpIntelClient {
    http: reqwest::Client,
    keys: IntelApiKeys,
    policy: Box<dyn ScorePolicy>,
}

impl HttpIntelClient {
    /// Build a client with the default [`SourceFraction`] scoring policy.
    ///
    /// # Errors
    /// - [`IntelError::Http`] if the underlying HTTP client cannot be built
    pub fn new(keys: IntelApiKeys) -> Result<Self, IntelError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            keys,
            policy: Box::new(SourceFraction::default()),
        })
    }

    /// Replace the aggregate scoring policy.
    #[must_use]
    pub fn with_policy(mut self, policy: Box<dyn ScorePolicy>) -> Self {
        self.policy = policy;
        self
    }

    async fn check_abuseipdb(&self, address: &str) -> Result<Option<SourceVerdict>, IntelError> {
        let Some(key) = &self.keys.abuseipdb else {
            debug!(source = "abuseipdb", "skipping unconfigured intel source");
            return Ok(None);
        };

        let response: AbuseIpDbResponse = self
            .http
            .get(ABUSEIPDB_URL)
            .header("Key", key.as_str())
            .query(&[("ipAddress", address), ("maxAgeInDays", "90")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let confidence = response.data.abuse_confidence_score;
        Ok(Some(SourceVerdict::new(
            confidence > 50,
            json!({ "confidence_score": confidence }),
        )))
    }

    async fn check_virustotal(&self, address: &str) -> Result<Option<SourceVerdict>, IntelError> {
        let Some(key) = &self.keys.virustotal else {
            debug!(source = "virustotal", "skipping unconfigured intel source");
            return Ok(None);
        };

        let response: VirusTotalResponse = self
            .http
            .get(format!("{VIRUSTOTAL_URL}/{address}"))
            .header("x-apikey", key.as_str())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let malicious = response.data.attributes.last_analysis_stats.malicious;
        Ok(Some(SourceVerdict::new(
            malicious > 0,
            json!({ "malicious_count": malicious }),
        )))
    }

    async fn check_otx(&self, address: &str) -> Result<Option<SourceVerdict>, IntelError> {
        let Some(key) = &self.keys.otx else {
            debug!(source = "otx", "skipping unconfigured intel source");
            return Ok(None);
        };

        let response: OtxResponse = self
            .http
            .get(format!("{OTX_URL}/{address}/general"))
            .header("X-OTX-API-KEY", key.as_str())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let pulses = response.pulse_info.count;
        Ok(Some(SourceVerdict::new(
            pulses > 0,
            json!({ "pulse_count": pulses }),
        )))
    }

    fn fold(source: &'static str, result: Result<Option<SourceVerdict>, IntelError>) -> Option<SourceVerdict> {
        match result {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(source, %error, "intel source lookup failed");
                None
            }
        }
    }
}

#[async_trait]
impl IntelProvider for HttpIntelClient {
    async fn check_address(&self, address: &str) -> Result<IntelReport, IntelError> {
        debug!(address, "running intel lookup");

        let mut sources = BTreeMap::new();
        sources.insert(
            "abuseipdb".to_string(),
            Self::fold("abuseipdb", self.check_abuseipdb(address).await),
        );
        sources.insert(
            "virustotal".to_string(),
            Self::fold("virustotal", self.check_virustotal(address).await),
        );
        sources.insert(
            "otx".to_string(),
            Self::fold("otx", self.check_otx(address).await),
        );

        let score = self.policy.score(&sources);
        Ok(IntelReport {
            address: address.to_string(),
            sources,
            score,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct AbuseIpDbResponse {
    #[serde(default)]
    data: AbuseIpDbData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AbuseIpDbData {
    #[serde(default)]
    abuse_confidence_score: i64,
}

#[derive(Debug, Default, Deserialize)]
struct VirusTotalResponse {
    #[serde(default)]
    data: VirusTotalData,
}

#[derive(Debug, Default, Deserialize)]
struct VirusTotalData {
    #[serde(default)]
    attributes: VirusTotalAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct VirusTotalAttributes {
    #[serde(default)]
    last_analysis_stats: AnalysisStats,
}

#[derive(Debug, Default, Deserialize)]
struct AnalysisStats {
    #[serde(default)]
    malicious: u64,
}

#[derive(Debug, Default, Deserialize)]
struct OtxResponse {
    #[serde(default)]
    pulse_info: PulseInfo,
}

#[derive(Debug, Default, Deserialize)]
struct PulseInfo {
    #[serde(default)]
    count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_client_checks_nothing() {
        let client = HttpIntelClient::new(IntelApiKeys::none()).unwrap();

        let report = client.check_address("10.0.0.5").await.unwrap();

        assert_eq!(report.address, "10.0.0.5");
        assert_eq!(report.score, 0.0);
        // All three sources are present but null: checked, nothing found.
        assert_eq!(report.sources.len(), 3);
        assert!(report.sources.values().all(Option::is_none));
    }

    #[test]
    fn api_keys_debug_redacts_secrets() {
        let keys = IntelApiKeys {
            abuseipdb: Some("super-secret".to_string()),
            ..IntelApiKeys::none()
        };
        let rendered = format!("{keys:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("abuseipdb: true"));
    }

    #[test]
    fn response_bodies_tolerate_missing_fields() {
        let abuse: AbuseIpDbResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(abuse.data.abuse_confidence_score, 0);

        let vt: VirusTotalResponse = serde_json::from_str(r#"{"data":{}}"#).unwrap();
        assert_eq!(vt.data.attributes.last_analysis_stats.malicious, 0);

        let otx: OtxResponse = serde_json::from_str(r#"{"pulse_info":{"count":2}}"#).unwrap();
        assert_eq!(otx.pulse_info.count, 2);
    }
}
