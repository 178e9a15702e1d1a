//! etcd client provider
//!
//! Binds the etcd connection settings and hands out a client handle. No
//! connection is opened here: the handle carries the settings (and the TLS
//! material loaded during Init) for whatever client library consumes it.
//!
//! Dependents pick the view they need:
//!
//! | Asked for | Receives |
//! |-----------|----------|
//! | service `etcd`, type `etcd.Interface` | `Arc<EtcdProvider>` |
//! | service `etcd-client`, type `etcd.Client` | `Arc<EtcdClient>` |
//!
//! ```toml
//! [etcd]
//! endpoints = "10.0.0.1:2379,10.0.0.2:2379"  # env ETCD_ENDPOINTS
//! timeout = "3s"
//!
//! [etcd.tls]
//! cert_file = "/etc/etcd/client.pem"
//! cert_key_file = "/etc/etcd/client-key.pem"
//! ca_file = "/etc/etcd/ca.pem"
//! ```

use crate::constants::{
    ETCD_CLIENT_SERVICE, ETCD_CLIENT_TYPE, ETCD_DEFAULT_TIMEOUT, ETCD_INTERFACE_TYPE, ETCD_NAME,
    ETCD_SERVICE,
};
use async_trait::async_trait;
use hub_application::COMPONENTS;
use hub_domain::error::ComponentResult;
use hub_domain::ports::{Component, Construction, InitContext, Instance, ProvideRequest};
use hub_domain::value_objects::{CapabilityDescriptor, ConfigSchema, Field, Handle};
use serde::Deserialize;
use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client certificate files
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TlsFiles {
    /// PEM certificate
    pub cert_file: String,
    /// PEM private key
    pub cert_key_file: String,
    /// PEM certificate authority bundle
    pub ca_file: String,
}

impl TlsFiles {
    /// Whether a client certificate was configured
    pub fn is_configured(&self) -> bool {
        !self.cert_file.is_empty() || !self.cert_key_file.is_empty()
    }
}

/// etcd settings
#[derive(Clone, PartialEq, Deserialize)]
pub struct EtcdConfig {
    /// Comma-separated `host:port` list
    pub endpoints: String,
    /// Dial timeout
    pub timeout: Duration,
    /// Member list refresh period; zero disables it
    pub auto_sync_interval: Duration,
    /// Request size limit in bytes; zero keeps the client default
    pub max_call_send_msg_size: u64,
    /// Response size limit in bytes; zero keeps the client default
    pub max_call_recv_msg_size: u64,
    /// Refuse clusters older than the client's minimum version
    pub reject_old_cluster: bool,
    /// Send keepalive pings even without active streams
    pub permit_without_stream: bool,
    /// Base wait between retries; zero keeps the client default
    pub backoff_wait_between: Duration,
    /// Retry wait jitter as a fraction of the wait; zero keeps the client default
    pub backoff_jitter_fraction: f64,
    /// Client certificate files
    pub tls: TlsFiles,
    /// Block until the first connection is established
    pub sync_connect: bool,
    /// Authentication user; empty disables authentication
    pub username: String,
    /// Authentication password, redacted in debug output
    pub password: String,
}

impl fmt::Debug for EtcdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtcdConfig")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .field("tls", &self.tls)
            .field("sync_connect", &self.sync_connect)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .finish_non_exhaustive()
    }
}

fn etcd_schema() -> ConfigSchema {
    ConfigSchema::new()
        .field(Field::string("endpoints").env("ETCD_ENDPOINTS"))
        .field(Field::duration("timeout").default(ETCD_DEFAULT_TIMEOUT))
        .field(Field::duration("auto_sync_interval").env("ETCD_AUTO_SYNC_INTERVAL"))
        .field(Field::uint("max_call_send_msg_size").env("ETCD_MAX_CALL_SEND_MSG_SIZE"))
        .field(Field::uint("max_call_recv_msg_size").env("ETCD_MAX_CALL_RECV_MSG_SIZE"))
        .field(Field::bool("reject_old_cluster").env("ETCD_REJECT_OLD_CLUSTER"))
        .field(Field::bool("permit_without_stream").env("ETCD_PERMIT_WITHOUT_STREAM"))
        .field(Field::duration("backoff_wait_between").env("ETCD_BACKOFF_WAIT_BETWEEN"))
        .field(Field::float("backoff_jitter_fraction").env("ETCD_BACKOFF_JITTER_FRACTION"))
        .field(Field::nested(
            "tls",
            ConfigSchema::new()
                .field(Field::string("cert_file"))
                .field(Field::string("cert_key_file"))
                .field(Field::string("ca_file")),
        ))
        .field(Field::bool("sync_connect").default("true"))
        .field(Field::string("username"))
        .field(Field::string("password"))
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}

/// Connection settings derived from [`EtcdConfig`]
///
/// Zero-valued tuning knobs stay `None` so the client library keeps its own
/// defaults for them.
#[derive(Clone, PartialEq)]
pub struct ClientSettings {
    /// Trimmed, non-empty endpoints in configured order
    pub endpoints: Vec<String>,
    /// Dial timeout
    pub dial_timeout: Duration,
    /// Block until the first connection is established
    pub block_on_connect: bool,
    /// Member list refresh period
    pub auto_sync_interval: Option<Duration>,
    /// Request size limit in bytes
    pub max_call_send_msg_size: Option<u64>,
    /// Response size limit in bytes
    pub max_call_recv_msg_size: Option<u64>,
    /// Refuse clusters older than the client's minimum version
    pub reject_old_cluster: bool,
    /// Send keepalive pings even without active streams
    pub permit_without_stream: bool,
    /// Base wait between retries
    pub backoff_wait_between: Option<Duration>,
    /// Retry wait jitter as a fraction of the wait
    pub backoff_jitter_fraction: Option<f64>,
    /// Authentication user
    pub username: Option<String>,
    /// Authentication password
    pub password: Option<String>,
}

impl From<&EtcdConfig> for ClientSettings {
    fn from(config: &EtcdConfig) -> Self {
        let positive = |d: Duration| (!d.is_zero()).then_some(d);
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            endpoints: config
                .endpoints
                .split(',')
                .map(str::trim)
                .filter(|endpoint| !endpoint.is_empty())
                .map(str::to_string)
                .collect(),
            dial_timeout: config.timeout,
            block_on_connect: config.sync_connect,
            auto_sync_interval: positive(config.auto_sync_interval),
            max_call_send_msg_size: (config.max_call_send_msg_size > 0)
                .then_some(config.max_call_send_msg_size),
            max_call_recv_msg_size: (config.max_call_recv_msg_size > 0)
                .then_some(config.max_call_recv_msg_size),
            reject_old_cluster: config.reject_old_cluster,
            permit_without_stream: config.permit_without_stream,
            backoff_wait_between: positive(config.backoff_wait_between),
            backoff_jitter_fraction: (config.backoff_jitter_fraction > 0.0)
                .then_some(config.backoff_jitter_fraction),
            username: non_empty(&config.username),
            password: non_empty(&config.password),
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("endpoints", &self.endpoints)
            .field("dial_timeout", &self.dial_timeout)
            .field("block_on_connect", &self.block_on_connect)
            .field("username", &self.username)
            .field("password", &self.password.as_deref().map(redacted))
            .finish_non_exhaustive()
    }
}

/// PEM material read from [`TlsFiles`]
#[derive(Clone, PartialEq, Eq)]
pub struct TlsMaterial {
    /// Client certificate PEM
    pub certificate: Vec<u8>,
    /// Client private key PEM
    pub private_key: Vec<u8>,
    /// Certificate authority bundle PEM
    pub ca_bundle: Vec<u8>,
}

impl fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("certificate", &self.certificate.len())
            .field("private_key", &"***")
            .field("ca_bundle", &self.ca_bundle.len())
            .finish()
    }
}

impl TlsMaterial {
    async fn read(files: &TlsFiles) -> io::Result<Self> {
        Ok(Self {
            certificate: read_pem(&files.cert_file).await?,
            private_key: read_pem(&files.cert_key_file).await?,
            ca_bundle: read_pem(&files.ca_file).await?,
        })
    }
}

async fn read_pem(path: &str) -> io::Result<Vec<u8>> {
    if path.is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "file path is not set"));
    }
    tokio::fs::read(path)
        .await
        .map_err(|e| io::Error::new(e.kind(), format!("{path}: {e}")))
}

/// Handle to an etcd cluster
#[derive(Debug)]
pub struct EtcdClient {
    settings: ClientSettings,
    tls: OnceLock<TlsMaterial>,
}

impl EtcdClient {
    fn new(settings: ClientSettings, tls: Option<TlsMaterial>) -> Self {
        Self {
            settings,
            tls: tls.map_or_else(OnceLock::new, OnceLock::from),
        }
    }

    /// Connection settings
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// Cluster endpoints
    pub fn endpoints(&self) -> &[String] {
        &self.settings.endpoints
    }

    /// TLS material, once loaded
    pub fn tls(&self) -> Option<&TlsMaterial> {
        self.tls.get()
    }
}

/// The etcd component
#[derive(Debug)]
pub struct EtcdProvider {
    config: EtcdConfig,
    client: Arc<EtcdClient>,
}

impl EtcdProvider {
    /// Provider over bound settings
    pub fn new(config: EtcdConfig) -> Self {
        let client = Arc::new(EtcdClient::new(ClientSettings::from(&config), None));
        Self { config, client }
    }

    /// Bound settings
    pub fn config(&self) -> &EtcdConfig {
        &self.config
    }

    /// The shared client handle
    pub fn client(&self) -> Arc<EtcdClient> {
        Arc::clone(&self.client)
    }

    /// Dial timeout
    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// A fresh client handle with the same settings and TLS material
    pub fn connect(&self) -> Arc<EtcdClient> {
        Arc::new(EtcdClient::new(
            self.client.settings.clone(),
            self.client.tls().cloned(),
        ))
    }
}

#[async_trait]
impl Component for EtcdProvider {
    async fn init(&self, ctx: &InitContext<'_>) -> ComponentResult<()> {
        if self.client.endpoints().is_empty() {
            return Err(format!("{}.endpoints is empty", ctx.name()).into());
        }

        if self.config.tls.is_configured() {
            match TlsMaterial::read(&self.config.tls).await {
                Ok(material) => {
                    // Handed-out clients share this material, so a repeated Init keeps the first
                    if self.client.tls.set(material).is_err() {
                        warn!("etcd TLS material already loaded; keeping the first");
                    } else {
                        debug!("etcd TLS material loaded");
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    warn!(error = %e, "Failed to load etcd TLS files; continuing without TLS");
                }
                Err(e) => return Err(format!("failed to load etcd TLS files: {e}").into()),
            }
        }

        info!(
            endpoints = ?self.client.endpoints(),
            tls = self.client.tls().is_some(),
            "etcd client configured"
        );
        Ok(())
    }

    fn provide(self: Arc<Self>, request: &ProvideRequest<'_>) -> Option<Handle> {
        (request.is_type(ETCD_CLIENT_TYPE) || request.is_service(ETCD_CLIENT_SERVICE))
            .then(|| Handle::new(self.client()))
    }
}

fn etcd_factory(ctx: &Construction<'_>) -> ComponentResult<Instance> {
    let config: EtcdConfig = ctx.config()?;
    Ok(Instance::new(Arc::new(EtcdProvider::new(config))))
}

#[linkme::distributed_slice(COMPONENTS)]
static ETCD_PROVIDER: CapabilityDescriptor = CapabilityDescriptor {
    name: ETCD_NAME,
    description: "etcd client settings",
    services: &[ETCD_SERVICE, ETCD_CLIENT_SERVICE],
    types: &[ETCD_INTERFACE_TYPE, ETCD_CLIENT_TYPE],
    dependencies: &[],
    config: Some(etcd_schema),
    factory: etcd_factory,
};
