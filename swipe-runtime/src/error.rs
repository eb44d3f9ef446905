//! # Error 模块
//!
//! 定义 swipe-runtime 中使用的错误类型。
//!
//! 手势与命令处理本身不会失败（无效输入被记录后丢弃），
//! 错误只出现在配置加载/验证以及解析宿主层的文本输入时。

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 读取或写入配置文件失败
    #[error("配置 IO 错误 ({path}): {message}")]
    Io { path: String, message: String },

    /// JSON 解析失败
    #[error("配置文件解析失败: {0}")]
    Parse(String),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialization(String),

    /// 配置值无效
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// 宿主输入解析错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// 无法识别的手势阶段
    #[error("未知的手势阶段 '{0}'")]
    UnknownPhase(String),

    /// 无法识别的宿主命令
    #[error("未知的宿主命令 '{0}'")]
    UnknownCommand(String),
}

/// swipe-runtime 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SwipeError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 输入错误
    #[error("输入错误: {0}")]
    Input(#[from] InputError),
}

/// Result 类型别名
pub type SwipeResult<T> = Result<T, SwipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let err: SwipeError = InputError::UnknownPhase("hover".to_string()).into();
        assert_eq!(err.to_string(), "输入错误: 未知的手势阶段 'hover'");

        let err: SwipeError = ConfigError::Validation("window_capacity 必须大于 0".to_string()).into();
        assert!(matches!(err, SwipeError::Config(ConfigError::Validation(_))));
    }
}
