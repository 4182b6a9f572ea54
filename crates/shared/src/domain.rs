use serde::{Deserialize, Serialize};

/// Initialization stages the backend walks through before mining is available.
///
/// Ordering follows the backend's startup sequence; `Ord` is relied on when
/// picking which phase to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SetupPhase {
    Core,
    Node,
    Hardware,
    Wallet,
    Mining,
}

impl SetupPhase {
    pub const ALL: [SetupPhase; 5] = [
        SetupPhase::Core,
        SetupPhase::Node,
        SetupPhase::Hardware,
        SetupPhase::Wallet,
        SetupPhase::Mining,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SetupPhase::Core => "core",
            SetupPhase::Node => "node",
            SetupPhase::Hardware => "hardware",
            SetupPhase::Wallet => "wallet",
            SetupPhase::Mining => "mining",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    Connected,
    #[default]
    Disconnected,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NodeType {
    #[default]
    Local,
    Remote,
    RemoteUntilLocal,
    LocalAfterRemote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    #[default]
    Mainnet,
    Nextnet,
    Esmeralda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GpuEngine {
    #[default]
    OpenCl,
    Cuda,
    Metal,
}
