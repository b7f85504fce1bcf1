use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub mouse_enabled: bool,
    /// Address the whole virtual desktop instead of the primary monitor only.
    pub virtual_desk: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: true,
            virtual_desk: true,
        }
    }
}
