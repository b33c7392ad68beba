use crate::data::ProviderData;
use crate::i18n::ResourceBundle;
use crate::metadata::PluginMetadata;
use crate::property::ProviderProperty;
use crate::table::Table;
use crate::ui::UiList;
use async_trait::async_trait;
use solar_core::Result;
use solar_protocol::Setting;
use solar_types::{Activity, Variables};

/// Host 与插件之间的契约
///
/// Host 保证同一实例上的调用不会并发。
#[async_trait]
pub trait Provider: Send + Sync {
    fn metadata(&self) -> &'static PluginMetadata;

    /// 当前语言下的插件字符串表
    fn plugin_resource_bundle(&self) -> &ResourceBundle;

    fn locale(&self) -> &str;

    fn set_locale(&mut self, locale: &str) -> Result<()>;

    fn provider_data(&self) -> Option<&ProviderData>;

    fn set_provider_data(&mut self, data: ProviderData);

    /// 默认调度窗口
    fn default_activity(&self) -> Activity;

    /// 配置表单；None 表示无需额外配置
    fn provider_dialog(&self) -> Option<UiList>;

    fn supported_properties(&self) -> Result<Option<Vec<ProviderProperty>>>;

    fn default_tables(&self) -> Result<Option<Vec<Table>>>;

    fn default_provider_setting(&self) -> Setting;

    /// 测试连接，成功返回空字符串
    async fn test_provider_connection(&self, setting: &Setting) -> Result<String>;

    /// Provider 创建后执行一次
    async fn do_on_first_run(&mut self) -> Result<()>;

    /// 每个调度周期执行一次，把读数写入 `variables`
    async fn do_activity_work(&self, variables: &mut Variables) -> Result<bool>;
}
