//! Per-tag handlers. Each one decodes its payload and mutates the store that
//! owns the data; nothing here retains state of its own.

use std::collections::HashMap;

use shared::protocol::{
    AirdropConfigPayload, AirdropTokensPayload, BackendEvent, BackgroundNodeSyncPayload,
    BaseNodeStatusPayload, BlockHeightPayload, ConfigCorePayload, ConfigMiningPayload,
    ConfigUiPayload, ConfigWalletPayload, ConnectedPeersPayload, ConnectionStatusPayload,
    CpuMiningStatus, CriticalProblemPayload, DetectedDevicesPayload, DisabledPhasesPayload,
    EventTag, GpuDevice, GpuEnginesPayload, GpuMiningStatus, MissingApplicationsPayload,
    NetworkStatusPayload, NodeTypePayload, ReleaseNotesPayload, RestartingPhasesPayload,
    SetupPhasePayload, WalletAddressPayload, WalletBalancePayload, WalletScanningPayload,
};
use tracing::{debug, info};

use crate::{
    dispatcher::{block_height_advances, Handler, HandlerContext},
    error::DispatchError,
    state::UiDialog,
};

type HandlerResult = Result<(), DispatchError>;

pub(crate) fn handler_table() -> HashMap<EventTag, Handler> {
    EventTag::ALL
        .iter()
        .map(|tag| (*tag, handler_for(*tag)))
        .collect()
}

fn handler_for(tag: EventTag) -> Handler {
    match tag {
        EventTag::SetupProgressUpdate => on_setup_progress,
        EventTag::NewBlockHeight => on_new_block_height,
        EventTag::BaseNodeUpdate => on_base_node_update,
        EventTag::WalletBalanceUpdate => on_wallet_balance,
        EventTag::WalletAddressUpdate => on_wallet_address,
        EventTag::CpuMiningUpdate => on_cpu_mining,
        EventTag::GpuMiningUpdate => on_gpu_mining,
        EventTag::ConfigCoreLoaded => on_config_core,
        EventTag::ConfigWalletLoaded => on_config_wallet,
        EventTag::ConfigMiningLoaded => on_config_mining,
        EventTag::ConfigUILoaded => on_config_ui,
        EventTag::CriticalProblem => on_critical_problem,
        EventTag::StuckOnOrphanChain => on_stuck_on_orphan_chain,
        EventTag::DisabledPhases => on_disabled_phases,
        EventTag::ConnectionStatus => on_connection_status,
        EventTag::MissingApplications => on_missing_applications,
        EventTag::ConnectedPeersUpdate => on_connected_peers,
        EventTag::NetworkStatus => on_network_status,
        EventTag::NodeTypeUpdate => on_node_type,
        EventTag::BackgroundNodeSyncUpdate => on_background_sync,
        EventTag::InitWalletScanningProgress => on_wallet_scanning,
        EventTag::ExternalTariAddressChanged => on_external_address,
        EventTag::SelectedTariAddressChanged => on_selected_address,
        EventTag::ExchangeIdChanged => on_exchange_id,
        EventTag::GpuDevicesUpdate => on_gpu_devices,
        EventTag::DetectedDevices => on_detected_devices,
        EventTag::DetectedAvailableGpuEngines => on_gpu_engines,
        EventTag::UnlockApp => on_unlock_app,
        EventTag::UnlockWallet => on_unlock_wallet,
        EventTag::UnlockMining => on_unlock_mining,
        EventTag::LockWallet => on_lock_wallet,
        EventTag::LockMining => on_lock_mining,
        EventTag::RestartingPhases => on_restarting_phases,
        EventTag::AskForRestart => on_ask_for_restart,
        EventTag::ShowReleaseNotes => on_release_notes,
        EventTag::ShouldShowExchangeMinerModal => on_exchange_miner_modal,
        EventTag::ShowKeyringDialog => on_keyring_dialog,
        EventTag::CreatePin => on_create_pin,
        EventTag::EnterPin => on_enter_pin,
        EventTag::CloseSplashscreen => on_close_splashscreen,
        EventTag::AirdropConfigLoaded => on_airdrop_config,
        EventTag::AirdropTokensUpdate => on_airdrop_tokens,
    }
}

// setup

fn on_setup_progress(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: SetupPhasePayload = ctx.decode(EventTag::SetupProgressUpdate, event)?;
    debug!(
        phase = payload.phase.label(),
        is_complete = payload.is_complete,
        progress = payload.progress,
        "setup progress"
    );
    ctx.stores.setup.update(|setup| setup.apply_progress(payload));
    Ok(())
}

fn on_disabled_phases(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: DisabledPhasesPayload = ctx.decode(EventTag::DisabledPhases, event)?;
    ctx.stores
        .setup
        .update(|setup| setup.set_disabled_phases(payload));
    Ok(())
}

fn on_restarting_phases(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: RestartingPhasesPayload = ctx.decode(EventTag::RestartingPhases, event)?;
    info!(phases = ?payload, "backend restarting setup phases");
    ctx.stores
        .setup
        .update(|setup| setup.restarting_phases = payload.into_iter().collect());
    Ok(())
}

fn on_unlock_app(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores.setup.update(|setup| setup.app_unlocked = true);
    Ok(())
}

fn on_unlock_wallet(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores.setup.update(|setup| setup.wallet_unlocked = true);
    Ok(())
}

fn on_unlock_mining(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores.setup.update(|setup| setup.mining_unlocked = true);
    Ok(())
}

fn on_lock_wallet(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores.setup.update(|setup| setup.wallet_unlocked = false);
    Ok(())
}

fn on_lock_mining(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores.setup.update(|setup| setup.mining_unlocked = false);
    Ok(())
}

// node

fn on_new_block_height(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: BlockHeightPayload = ctx.decode(EventTag::NewBlockHeight, event)?;
    ctx.stores.node.update_if(|node| {
        if !block_height_advances(node.block_height, payload.block_height) {
            return false;
        }
        node.block_height = Some(payload.block_height);
        node.latest_coinbase_reward = payload.coinbase_reward;
        true
    });
    Ok(())
}

fn on_base_node_update(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: BaseNodeStatusPayload = ctx.decode(EventTag::BaseNodeUpdate, event)?;
    ctx.stores.node.update(|node| node.base_node = Some(payload));
    Ok(())
}

fn on_stuck_on_orphan_chain(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let stuck: bool = ctx.decode(EventTag::StuckOnOrphanChain, event)?;
    ctx.stores
        .node
        .update(|node| node.is_stuck_on_orphan_chain = stuck);
    Ok(())
}

fn on_connected_peers(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ConnectedPeersPayload = ctx.decode(EventTag::ConnectedPeersUpdate, event)?;
    ctx.stores
        .node
        .update(|node| node.connected_peers = payload.connected_peers);
    Ok(())
}

fn on_network_status(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: NetworkStatusPayload = ctx.decode(EventTag::NetworkStatus, event)?;
    ctx.stores.node.update(|node| node.network = Some(payload));
    Ok(())
}

fn on_node_type(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: NodeTypePayload = ctx.decode(EventTag::NodeTypeUpdate, event)?;
    ctx.stores.node.update(|node| {
        if let Some(node_type) = payload.node_type {
            node.node_type = Some(node_type);
        }
        if let Some(address) = payload.node_connection_address {
            node.node_connection_address = Some(address);
        }
    });
    Ok(())
}

fn on_background_sync(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: BackgroundNodeSyncPayload =
        ctx.decode(EventTag::BackgroundNodeSyncUpdate, event)?;
    ctx.stores
        .node
        .update(|node| node.background_sync = Some(payload));
    Ok(())
}

fn on_config_core(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ConfigCorePayload = ctx.decode(EventTag::ConfigCoreLoaded, event)?;
    ctx.stores.node.update(|node| {
        node.node_type = Some(payload.node_type);
        node.core_config = Some(payload);
    });
    Ok(())
}

// wallet

fn on_wallet_balance(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: WalletBalancePayload = ctx.decode(EventTag::WalletBalanceUpdate, event)?;
    ctx.stores.wallet.update(|wallet| wallet.balance = Some(payload));
    ctx.spawn_follow_up("refresh_transactions", |backend| async move {
        backend.refresh_transactions().await
    });
    Ok(())
}

fn on_wallet_address(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: WalletAddressPayload = ctx.decode(EventTag::WalletAddressUpdate, event)?;
    ctx.stores.wallet.update(|wallet| wallet.address = Some(payload));
    Ok(())
}

fn on_wallet_scanning(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: WalletScanningPayload =
        ctx.decode(EventTag::InitWalletScanningProgress, event)?;
    ctx.stores.wallet.update(|wallet| wallet.scanning = Some(payload));
    Ok(())
}

fn on_external_address(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: Option<WalletAddressPayload> =
        ctx.decode(EventTag::ExternalTariAddressChanged, event)?;
    ctx.stores
        .wallet
        .update(|wallet| wallet.external_address = payload);
    Ok(())
}

fn on_selected_address(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: WalletAddressPayload =
        ctx.decode(EventTag::SelectedTariAddressChanged, event)?;
    ctx.stores
        .wallet
        .update(|wallet| wallet.selected_address = Some(payload));
    Ok(())
}

fn on_exchange_id(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let exchange_id: String = ctx.decode(EventTag::ExchangeIdChanged, event)?;
    ctx.stores
        .wallet
        .update(|wallet| wallet.exchange_id = Some(exchange_id.clone()));
    ctx.spawn_follow_up("confirm_exchange_id", move |backend| async move {
        backend.confirm_exchange_id(&exchange_id).await
    });
    Ok(())
}

fn on_config_wallet(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ConfigWalletPayload = ctx.decode(EventTag::ConfigWalletLoaded, event)?;
    ctx.stores.wallet.update(|wallet| wallet.config = Some(payload));
    Ok(())
}

// mining

fn on_cpu_mining(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: CpuMiningStatus = ctx.decode(EventTag::CpuMiningUpdate, event)?;
    ctx.stores.mining.update(|mining| mining.cpu = payload);
    Ok(())
}

fn on_gpu_mining(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: GpuMiningStatus = ctx.decode(EventTag::GpuMiningUpdate, event)?;
    ctx.stores.mining.update(|mining| mining.gpu = payload);
    Ok(())
}

fn on_config_mining(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ConfigMiningPayload = ctx.decode(EventTag::ConfigMiningLoaded, event)?;
    ctx.stores.mining.update(|mining| {
        if payload.selected_engine.is_some() {
            mining.selected_engine = payload.selected_engine;
        }
        mining.config = Some(payload);
    });
    Ok(())
}

fn on_gpu_devices(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let devices: Vec<GpuDevice> = ctx.decode(EventTag::GpuDevicesUpdate, event)?;
    ctx.stores.mining.update(|mining| mining.gpu_devices = devices);
    Ok(())
}

fn on_detected_devices(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: DetectedDevicesPayload = ctx.decode(EventTag::DetectedDevices, event)?;
    ctx.stores
        .mining
        .update(|mining| mining.gpu_devices = payload.devices);
    Ok(())
}

fn on_gpu_engines(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: GpuEnginesPayload = ctx.decode(EventTag::DetectedAvailableGpuEngines, event)?;
    ctx.stores.mining.update(|mining| {
        mining.available_engines = payload.engines;
        mining.selected_engine = Some(payload.selected_engine);
    });
    Ok(())
}

// ui

fn on_critical_problem(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: CriticalProblemPayload = ctx.decode(EventTag::CriticalProblem, event)?;
    ctx.stores
        .ui
        .update(|ui| ui.critical_problem = Some(payload));
    Ok(())
}

fn on_missing_applications(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: MissingApplicationsPayload = ctx.decode(EventTag::MissingApplications, event)?;
    ctx.stores
        .ui
        .update(|ui| ui.missing_applications = payload);
    Ok(())
}

fn on_connection_status(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let status: ConnectionStatusPayload = ctx.decode(EventTag::ConnectionStatus, event)?;
    ctx.stores.ui.update(|ui| ui.connection_status = status);
    Ok(())
}

fn on_config_ui(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ConfigUiPayload = ctx.decode(EventTag::ConfigUILoaded, event)?;
    ctx.stores.ui.update(|ui| ui.config = Some(payload));
    Ok(())
}

fn on_release_notes(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: ReleaseNotesPayload = ctx.decode(EventTag::ShowReleaseNotes, event)?;
    ctx.stores.ui.update(|ui| {
        if payload.should_show_dialog {
            ui.active_dialog = Some(UiDialog::ReleaseNotes);
        }
        ui.release_notes = Some(payload);
    });
    Ok(())
}

fn open_dialog(ctx: &HandlerContext<'_>, dialog: UiDialog) -> HandlerResult {
    ctx.stores.ui.update(|ui| ui.active_dialog = Some(dialog));
    Ok(())
}

fn on_ask_for_restart(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    open_dialog(ctx, UiDialog::AskForRestart)
}

fn on_exchange_miner_modal(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    open_dialog(ctx, UiDialog::ExchangeMiner)
}

fn on_keyring_dialog(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    open_dialog(ctx, UiDialog::KeyringAccess)
}

fn on_create_pin(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    open_dialog(ctx, UiDialog::CreatePin)
}

fn on_enter_pin(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    open_dialog(ctx, UiDialog::EnterPin)
}

fn on_close_splashscreen(ctx: &HandlerContext<'_>, _event: &BackendEvent) -> HandlerResult {
    ctx.stores
        .ui
        .update(|ui| ui.is_splashscreen_visible = false);
    Ok(())
}

// airdrop

fn on_airdrop_config(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: AirdropConfigPayload = ctx.decode(EventTag::AirdropConfigLoaded, event)?;
    ctx.stores
        .airdrop
        .update(|airdrop| airdrop.config = Some(payload));
    Ok(())
}

fn on_airdrop_tokens(ctx: &HandlerContext<'_>, event: &BackendEvent) -> HandlerResult {
    let payload: AirdropTokensPayload = ctx.decode(EventTag::AirdropTokensUpdate, event)?;
    ctx.stores.airdrop.update(|airdrop| {
        airdrop.token = payload.token;
        airdrop.refresh_token = payload.refresh_token;
        airdrop.expires_at = payload.expires_at;
    });
    Ok(())
}
