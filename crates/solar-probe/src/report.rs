use serde::Serialize;
use solar_protocol::Setting;
use solar_provider::{PluginMetadata, Provider, UiList};
use solar_types::Activity;

/// `describe` 子命令的输出
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    pub metadata: PluginMetadata,
    pub locale: String,
    pub default_setting: Setting,
    pub effective_setting: Setting,
    pub default_activity: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog: Option<UiList>,
}

impl Description {
    pub fn of(provider: &dyn Provider, effective_setting: &Setting) -> Self {
        Self {
            metadata: *provider.metadata(),
            locale: provider.locale().to_string(),
            default_setting: provider.default_provider_setting(),
            effective_setting: effective_setting.clone(),
            default_activity: provider.default_activity(),
            dialog: provider.provider_dialog(),
        }
    }
}
