//! Values held by the per-domain stores.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use shared::{
    domain::{ConnectionStatus, GpuEngine, NodeType, SetupPhase},
    protocol::{
        AirdropConfigPayload, BackgroundNodeSyncPayload, BaseNodeStatusPayload,
        ConfigCorePayload, ConfigMiningPayload, ConfigUiPayload, ConfigWalletPayload,
        CpuMiningStatus, CriticalProblemPayload, GpuDevice, GpuMiningStatus,
        NetworkStatusPayload, ReleaseNotesPayload, SetupPhasePayload, WalletAddressPayload,
        WalletBalancePayload, WalletScanningPayload,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MiningState {
    pub cpu: CpuMiningStatus,
    pub gpu: GpuMiningStatus,
    pub config: Option<ConfigMiningPayload>,
    pub gpu_devices: Vec<GpuDevice>,
    pub available_engines: Vec<GpuEngine>,
    pub selected_engine: Option<GpuEngine>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletState {
    pub balance: Option<WalletBalancePayload>,
    pub address: Option<WalletAddressPayload>,
    pub external_address: Option<WalletAddressPayload>,
    pub selected_address: Option<WalletAddressPayload>,
    pub scanning: Option<WalletScanningPayload>,
    pub config: Option<ConfigWalletPayload>,
    pub exchange_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeState {
    /// Highest block height accepted so far. Never moves backwards.
    pub block_height: Option<u64>,
    pub latest_coinbase_reward: Option<u64>,
    pub base_node: Option<BaseNodeStatusPayload>,
    pub connected_peers: Vec<String>,
    pub network: Option<NetworkStatusPayload>,
    pub node_type: Option<NodeType>,
    pub node_connection_address: Option<String>,
    pub background_sync: Option<BackgroundNodeSyncPayload>,
    pub is_stuck_on_orphan_chain: bool,
    pub core_config: Option<ConfigCorePayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UiDialog {
    AskForRestart,
    ReleaseNotes,
    ExchangeMiner,
    KeyringAccess,
    CreatePin,
    EnterPin,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub critical_problem: Option<CriticalProblemPayload>,
    pub missing_applications: Vec<String>,
    pub connection_status: ConnectionStatus,
    pub config: Option<ConfigUiPayload>,
    pub release_notes: Option<ReleaseNotesPayload>,
    pub active_dialog: Option<UiDialog>,
    pub is_splashscreen_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            critical_problem: None,
            missing_applications: Vec::new(),
            connection_status: ConnectionStatus::default(),
            config: None,
            release_notes: None,
            active_dialog: None,
            is_splashscreen_visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SetupState {
    /// Latest payload per phase; a new payload replaces the old one whole.
    pub phases: BTreeMap<SetupPhase, SetupPhasePayload>,
    pub disabled_phases: BTreeSet<SetupPhase>,
    pub restarting_phases: BTreeSet<SetupPhase>,
    pub app_unlocked: bool,
    pub wallet_unlocked: bool,
    pub mining_unlocked: bool,
    /// Set once the final active phase completes; stays set for the session.
    pub progress_retired: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AirdropState {
    pub config: Option<AirdropConfigPayload>,
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<i64>,
}
