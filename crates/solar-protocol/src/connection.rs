use crate::setting::Setting;
use async_trait::async_trait;
use solar_core::Result;

/// 统一连接接口
///
/// 每次调用获取一个连接，用完必须 `close`；实现方在 `Drop` 时也应释放底层资源。
#[async_trait]
pub trait Connection: Send {
    /// 建立连接
    async fn connect(&mut self) -> Result<()>;

    /// 关闭连接，重复调用无副作用
    async fn close(&mut self) -> Result<()>;

    fn is_connected(&self) -> bool;
}

/// 连接工厂，由 Host 注入 Provider，测试时可替换为假连接
pub trait ConnectionFactory<C: ?Sized>: Send + Sync {
    fn create_connection(&self, setting: &Setting) -> Result<Box<C>>;
}

/// 闭包也可作为工厂
impl<C, F> ConnectionFactory<C> for F
where
    C: ?Sized,
    F: Fn(&Setting) -> Result<Box<C>> + Send + Sync,
{
    fn create_connection(&self, setting: &Setting) -> Result<Box<C>> {
        self(setting)
    }
}
