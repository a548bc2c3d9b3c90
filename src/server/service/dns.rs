//! DNS zone provisioning for donated domains.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::server::error::{provider::ProviderError, AppError};

const CLOUDFLARE_API: &str = "https://api.cloudflare.com/client/v4";

/// Zone created for a donated domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: String,
    /// Nameservers the domain owner must delegate to.
    pub nameservers: Vec<String>,
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Creates a zone for `hostname`.
    async fn create_zone(&self, hostname: &str) -> Result<Zone, AppError>;

    /// Whether delegation has completed and the zone is serving.
    async fn is_zone_active(&self, zone_id: &str) -> Result<bool, AppError>;

    /// Points the apex and wildcard of the zone at `target`.
    ///
    /// Safe to repeat: records already in place are left alone, so a check that failed
    /// halfway can simply run again.
    async fn point_to(&self, zone_id: &str, hostname: &str, target: &str) -> Result<(), AppError>;
}

/// Cloudflare v4 API client.
pub struct CloudflareDns {
    client: reqwest::Client,
    api_token: String,
    account_id: String,
    base_url: String,
}

#[derive(Deserialize)]
struct CfResponse<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CfMessage>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct CfMessage {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct CfZone {
    id: String,
    #[serde(default)]
    name_servers: Vec<String>,
    status: String,
}

#[derive(Deserialize)]
struct CfRecord {
    id: String,
    content: String,
}

#[derive(Serialize)]
struct CfAccount<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct CreateZoneRequest<'a> {
    name: &'a str,
    account: CfAccount<'a>,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    name: &'a str,
    content: &'a str,
    proxied: bool,
    ttl: u32,
}

impl CloudflareDns {
    pub fn new(client: reqwest::Client, api_token: String, account_id: String) -> Self {
        Self {
            client,
            api_token,
            account_id,
            base_url: CLOUDFLARE_API.to_string(),
        }
    }

    /// Unwraps the Cloudflare response envelope.
    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let status = response.status();
        let body: CfResponse<T> = response.json().await?;

        if !body.success {
            let reason = body
                .errors
                .iter()
                .map(|e| format!("{} ({})", e.message, e.code))
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ProviderError::Dns(format!("{}: {}", status, reason)).into());
        }

        body.result
            .ok_or_else(|| ProviderError::Dns("response without result".to_string()).into())
    }

    /// Creates the CNAME `name -> target`, or corrects an existing one.
    async fn ensure_cname(&self, zone_id: &str, name: &str, target: &str) -> Result<(), AppError> {
        let records_url = format!("{}/zones/{}/dns_records", self.base_url, zone_id);

        let response = self
            .client
            .get(&records_url)
            .bearer_auth(&self.api_token)
            .query(&[("type", "CNAME"), ("name", name)])
            .send()
            .await?;
        let existing: Vec<CfRecord> = Self::parse(response).await?;

        let record = CreateRecordRequest {
            kind: "CNAME",
            name,
            content: target,
            proxied: true,
            ttl: 1,
        };

        let request = match existing.first() {
            Some(found) if found.content == target => {
                tracing::debug!("Record {} already points at {}", name, target);
                return Ok(());
            }
            Some(found) => self.client.put(format!("{}/{}", records_url, found.id)),
            None => self.client.post(&records_url),
        };

        let response = request
            .bearer_auth(&self.api_token)
            .json(&record)
            .send()
            .await?;
        let _: serde_json::Value = Self::parse(response).await?;

        Ok(())
    }
}

#[async_trait]
impl DnsProvider for CloudflareDns {
    async fn create_zone(&self, hostname: &str) -> Result<Zone, AppError> {
        let response = self
            .client
            .post(format!("{}/zones", self.base_url))
            .bearer_auth(&self.api_token)
            .json(&CreateZoneRequest {
                name: hostname,
                account: CfAccount {
                    id: &self.account_id,
                },
                kind: "full",
            })
            .send()
            .await?;

        let zone: CfZone = Self::parse(response).await?;
        tracing::info!("Created zone {} for {}", zone.id, hostname);

        Ok(Zone {
            id: zone.id,
            nameservers: zone.name_servers,
        })
    }

    async fn is_zone_active(&self, zone_id: &str) -> Result<bool, AppError> {
        let response = self
            .client
            .get(format!("{}/zones/{}", self.base_url, zone_id))
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        let zone: CfZone = Self::parse(response).await?;

        Ok(zone.status == "active")
    }

    async fn point_to(&self, zone_id: &str, hostname: &str, target: &str) -> Result<(), AppError> {
        let wildcard = format!("*.{}", hostname);

        for name in [hostname, wildcard.as_str()] {
            self.ensure_cname(zone_id, name, target).await?;
        }

        Ok(())
    }
}

/// Scriptable provider that records calls.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct FakeDns {
    pub active: std::sync::Arc<std::sync::atomic::AtomicBool>,
    pub fail: std::sync::Arc<std::sync::atomic::AtomicBool>,
    pub zones: std::sync::Arc<std::sync::Mutex<Vec<String>>>,
    /// Records by name and target.
    pub records: std::sync::Arc<std::sync::Mutex<Vec<(String, String)>>>,
    /// Record name whose creation fails once.
    pub fail_record: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

#[cfg(test)]
impl FakeDns {
    pub fn set_active(&self, active: bool) {
        self.active
            .store(active, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Makes the next write of record `name` fail.
    pub fn fail_record_once(&self, name: &str) {
        *self.fail_record.lock().unwrap() = Some(name.to_string());
    }

    fn check_failure(&self) -> Result<(), AppError> {
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ProviderError::Dns("provider unavailable".to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl DnsProvider for FakeDns {
    async fn create_zone(&self, hostname: &str) -> Result<Zone, AppError> {
        self.check_failure()?;
        let mut zones = self.zones.lock().unwrap();
        zones.push(hostname.to_string());

        Ok(Zone {
            id: format!("zone-{}", zones.len()),
            nameservers: vec!["ada.ns.test".to_string(), "bob.ns.test".to_string()],
        })
    }

    async fn is_zone_active(&self, _zone_id: &str) -> Result<bool, AppError> {
        self.check_failure()?;
        Ok(self.active.load(std::sync::atomic::Ordering::SeqCst))
    }

    async fn point_to(&self, _zone_id: &str, hostname: &str, target: &str) -> Result<(), AppError> {
        self.check_failure()?;

        for name in [hostname.to_string(), format!("*.{}", hostname)] {
            let mut records = self.records.lock().unwrap();
            if records.iter().any(|(n, t)| *n == name && t == target) {
                continue;
            }

            let mut fail_record = self.fail_record.lock().unwrap();
            if fail_record.as_deref() == Some(name.as_str()) {
                *fail_record = None;
                return Err(ProviderError::Dns(format!("failed to create {}", name)).into());
            }

            records.push((name, target.to_string()));
        }

        Ok(())
    }
}
