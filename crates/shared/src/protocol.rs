use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{ConnectionStatus, GpuEngine, GpuVendor, NetworkKind, NodeType, SetupPhase};

/// Channel every backend state update is pushed on.
pub const BACKEND_EVENT_CHANNEL: &str = "backend_state_update";

macro_rules! event_catalog {
    ($($variant:ident),+ $(,)?) => {
        /// Event tags the frontend knows how to reconcile.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum EventTag {
            $($variant),+
        }

        impl EventTag {
            pub const ALL: &'static [EventTag] = &[$(EventTag::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(EventTag::$variant => stringify!($variant)),+
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $(stringify!($variant) => Some(EventTag::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

event_catalog!(
    SetupProgressUpdate,
    NewBlockHeight,
    BaseNodeUpdate,
    WalletBalanceUpdate,
    WalletAddressUpdate,
    CpuMiningUpdate,
    GpuMiningUpdate,
    ConfigCoreLoaded,
    ConfigWalletLoaded,
    ConfigMiningLoaded,
    ConfigUILoaded,
    CriticalProblem,
    StuckOnOrphanChain,
    DisabledPhases,
    ConnectionStatus,
    MissingApplications,
    ConnectedPeersUpdate,
    NetworkStatus,
    NodeTypeUpdate,
    BackgroundNodeSyncUpdate,
    InitWalletScanningProgress,
    ExternalTariAddressChanged,
    SelectedTariAddressChanged,
    ExchangeIdChanged,
    GpuDevicesUpdate,
    DetectedDevices,
    DetectedAvailableGpuEngines,
    UnlockApp,
    UnlockWallet,
    UnlockMining,
    LockWallet,
    LockMining,
    RestartingPhases,
    AskForRestart,
    ShowReleaseNotes,
    ShouldShowExchangeMinerModal,
    ShowKeyringDialog,
    CreatePin,
    EnterPin,
    CloseSplashscreen,
    AirdropConfigLoaded,
    AirdropTokensUpdate,
);

impl std::fmt::Display for EventTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Envelope pushed by the backend. The tag stays a raw string so that
/// envelopes carrying tags unknown to this build still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEvent {
    pub event_type: String,
    #[serde(default)]
    pub payload: Value,
}

impl BackendEvent {
    pub fn new(tag: EventTag, payload: impl Serialize) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_type: tag.as_str().to_string(),
            payload: serde_json::to_value(payload)?,
        })
    }

    pub fn raw(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            event_type: event_type.into(),
            payload,
        }
    }

    pub fn tag(&self) -> Option<EventTag> {
        EventTag::from_tag(&self.event_type)
    }

    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupPhasePayload {
    pub phase: SetupPhase,
    pub is_complete: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub phase_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_params: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub progress: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeightPayload {
    pub block_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coinbase_reward: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseNodeStatusPayload {
    pub block_height: u64,
    #[serde(default)]
    pub block_time: u64,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default)]
    pub num_connections: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletBalancePayload {
    pub available_balance: u64,
    #[serde(default)]
    pub timelocked_balance: u64,
    #[serde(default)]
    pub pending_incoming_balance: u64,
    #[serde(default)]
    pub pending_outgoing_balance: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletAddressPayload {
    pub tari_address_base58: String,
    #[serde(default)]
    pub tari_address_emoji: String,
    #[serde(default)]
    pub is_tari_address_generated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuMiningStatus {
    pub is_mining: bool,
    #[serde(default)]
    pub hash_rate: f64,
    #[serde(default)]
    pub estimated_earnings: u64,
    #[serde(default)]
    pub is_connected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuMiningStatus {
    pub is_mining: bool,
    #[serde(default)]
    pub hash_rate: f64,
    #[serde(default)]
    pub estimated_earnings: u64,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigCorePayload {
    #[serde(default)]
    pub allow_telemetry: bool,
    #[serde(default)]
    pub allow_notifications: bool,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub network: NetworkKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_base_node_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_binaries_update_timestamp: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigWalletPayload {
    #[serde(default)]
    pub monero_address: String,
    #[serde(default)]
    pub keyring_accessed: bool,
    #[serde(default)]
    pub wallet_migration_nonce: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigMiningPayload {
    #[serde(default)]
    pub cpu_mining_enabled: bool,
    #[serde(default)]
    pub gpu_mining_enabled: bool,
    #[serde(default)]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_engine: Option<GpuEngine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigUiPayload {
    #[serde(default)]
    pub display_mode: String,
    #[serde(default)]
    pub application_language: String,
    #[serde(default)]
    pub has_system_language_been_proposed: bool,
    #[serde(default)]
    pub sharing_enabled: bool,
    #[serde(default)]
    pub visual_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalProblemPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectedPeersPayload {
    #[serde(default)]
    pub connected_peers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatusPayload {
    #[serde(default)]
    pub download_speed: f64,
    #[serde(default)]
    pub upload_speed: f64,
    #[serde(default)]
    pub latency: f64,
    #[serde(default)]
    pub is_too_low: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeTypePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_connection_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackgroundNodeSyncPayload {
    pub step: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_height: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletScanningPayload {
    pub scanned_height: u64,
    pub total_height: u64,
    #[serde(default)]
    pub progress: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuDevice {
    pub device_index: u32,
    pub name: String,
    #[serde(default)]
    pub vendor: GpuVendor,
    #[serde(default)]
    pub is_excluded: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedDevicesPayload {
    #[serde(default)]
    pub devices: Vec<GpuDevice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpuEnginesPayload {
    #[serde(default)]
    pub engines: Vec<GpuEngine>,
    #[serde(default)]
    pub selected_engine: GpuEngine,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReleaseNotesPayload {
    #[serde(default)]
    pub release_notes: String,
    #[serde(default)]
    pub is_app_update_available: bool,
    #[serde(default)]
    pub should_show_dialog: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirdropConfigPayload {
    pub airdrop_url: String,
    #[serde(default)]
    pub airdrop_api_url: String,
    #[serde(default)]
    pub airdrop_twitter_auth_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirdropTokensPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

pub type DisabledPhasesPayload = Vec<SetupPhase>;
pub type RestartingPhasesPayload = Vec<SetupPhase>;
pub type MissingApplicationsPayload = Vec<String>;
pub type ConnectionStatusPayload = ConnectionStatus;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn every_catalog_tag_round_trips_through_its_wire_name() {
        for tag in EventTag::ALL {
            assert_eq!(EventTag::from_tag(tag.as_str()), Some(*tag));
        }
        assert_eq!(EventTag::from_tag("SomeFutureEvent"), None);
        assert_eq!(EventTag::ConfigUILoaded.as_str(), "ConfigUILoaded");
    }

    #[test]
    fn envelope_with_unknown_tag_still_decodes() {
        let event: BackendEvent =
            serde_json::from_value(json!({"event_type": "SomeFutureEvent", "payload": {}}))
                .expect("envelope");
        assert_eq!(event.tag(), None);
        assert_eq!(event.payload, json!({}));
    }

    #[test]
    fn envelope_without_payload_defaults_to_null() {
        let event: BackendEvent =
            serde_json::from_value(json!({"event_type": "UnlockApp"})).expect("envelope");
        assert_eq!(event.tag(), Some(EventTag::UnlockApp));
        assert!(event.payload.is_null());
    }

    #[test]
    fn setup_payload_decodes_with_optional_fields_missing() {
        let event = BackendEvent::raw(
            "SetupProgressUpdate",
            json!({"phase": "Wallet", "is_complete": false, "title": "setting-up-wallet"}),
        );
        let payload: SetupPhasePayload = event.decode().expect("decode");
        assert_eq!(payload.phase, SetupPhase::Wallet);
        assert!(!payload.is_complete);
        assert!(payload.title_params.is_none());
        assert_eq!(payload.progress, 0.0);
    }
}
