//! # Config 模块
//!
//! 集中管理滑动交互的所有可调参数。
//!
//! ## 配置优先级
//!
//! 1. 宿主层覆盖（如命令行参数，最高）
//! 2. 配置文件 (JSON)
//! 3. 默认值（最低）
//!
//! 所有字段都有默认值，配置文件只需要写出想要修改的部分。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::transform::Vec2;

/// 滑动配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwipeConfig {
    /// 拖拽解释参数
    #[serde(default)]
    pub tuning: SwipeTuning,

    /// 动画参数
    #[serde(default)]
    pub animation: AnimationConfig,

    /// 卡组布局参数
    #[serde(default)]
    pub deck: DeckConfig,
}

/// 拖拽解释参数
///
/// 决定拖拽过程中卡片的旋转、缩放、覆盖层表现，以及松手时的判定阈值。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeTuning {
    /// 判定为滑出所需的水平位移。越大越需要拖得更远
    #[serde(default = "default_action_margin")]
    pub action_margin: f32,

    /// 缩小速度。越大缩得越慢
    #[serde(default = "default_scale_strength")]
    pub scale_strength: f32,

    /// 缩放下限。越大缩得越少
    #[serde(default = "default_scale_max")]
    pub scale_max: f32,

    /// 旋转强度上限
    #[serde(default = "default_rotation_max")]
    pub rotation_max: f32,

    /// 旋转强度的除数。越大旋转越弱
    #[serde(default = "default_rotation_strength")]
    pub rotation_strength: f32,

    /// 旋转强度为 1 时的角度（弧度）
    #[serde(default = "default_rotation_angle")]
    pub rotation_angle: f32,

    /// 覆盖层最大透明度
    #[serde(default = "default_max_overlay_alpha")]
    pub max_overlay_alpha: f32,

    /// 覆盖层透明度从 0 增长到 1 对应的水平位移
    #[serde(default = "default_overlay_distance")]
    pub overlay_distance: f32,
}

/// 动画参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// 回弹与滑出动画时长（秒）
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f32,

    /// 滑出时卡片相对静止中心的水平终点距离
    #[serde(default = "default_exit_distance")]
    pub exit_distance: f32,
}

/// 卡组布局参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// 同时实例化的卡片数量上限
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    /// 宿主画布宽度
    #[serde(default = "default_frame_width")]
    pub frame_width: f32,

    /// 宿主画布高度
    #[serde(default = "default_frame_height")]
    pub frame_height: f32,

    /// 卡片宽度
    #[serde(default = "default_card_width")]
    pub card_width: f32,

    /// 卡片高度
    #[serde(default = "default_card_height")]
    pub card_height: f32,
}

impl Default for SwipeTuning {
    fn default() -> Self {
        Self {
            action_margin: default_action_margin(),
            scale_strength: default_scale_strength(),
            scale_max: default_scale_max(),
            rotation_max: default_rotation_max(),
            rotation_strength: default_rotation_strength(),
            rotation_angle: default_rotation_angle(),
            max_overlay_alpha: default_max_overlay_alpha(),
            overlay_distance: default_overlay_distance(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            exit_distance: default_exit_distance(),
        }
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
            frame_width: default_frame_width(),
            frame_height: default_frame_height(),
            card_width: default_card_width(),
            card_height: default_card_height(),
        }
    }
}

impl DeckConfig {
    /// 卡片静止时的中心点（画布中心）
    pub fn rest_center(&self) -> Vec2 {
        Vec2::new(self.frame_width / 2.0, self.frame_height / 2.0)
    }

    /// 卡片尺寸
    pub fn card_size(&self) -> Vec2 {
        Vec2::new(self.card_width, self.card_height)
    }
}

// 默认值函数
fn default_action_margin() -> f32 {
    120.0
}

fn default_scale_strength() -> f32 {
    4.0
}

fn default_scale_max() -> f32 {
    0.93
}

fn default_rotation_max() -> f32 {
    1.0
}

fn default_rotation_strength() -> f32 {
    320.0
}

fn default_rotation_angle() -> f32 {
    std::f32::consts::FRAC_PI_8
}

fn default_max_overlay_alpha() -> f32 {
    0.4
}

fn default_overlay_distance() -> f32 {
    100.0
}

fn default_duration_secs() -> f32 {
    0.3
}

fn default_exit_distance() -> f32 {
    600.0
}

fn default_window_capacity() -> usize {
    2
}

fn default_frame_width() -> f32 {
    375.0
}

fn default_frame_height() -> f32 {
    667.0
}

fn default_card_width() -> f32 {
    290.0
}

fn default_card_height() -> f32 {
    386.0
}

impl SwipeConfig {
    /// 加载配置文件
    ///
    /// 文件不存在时返回默认配置并打印警告；文件存在但无法读取或解析时返回错误。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_json(&content)?;
        info!(path = %path.display(), "配置文件加载成功");
        Ok(config)
    }

    /// 从 JSON 文本解析并验证配置
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialization(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tuning = &self.tuning;

        if tuning.action_margin < 0.0 {
            return Err(ConfigError::Validation(
                "action_margin 不能为负数".to_string(),
            ));
        }

        if tuning.scale_strength <= 0.0 || tuning.rotation_strength <= 0.0 {
            return Err(ConfigError::Validation(
                "scale_strength 与 rotation_strength 必须大于 0".to_string(),
            ));
        }

        if tuning.overlay_distance <= 0.0 {
            return Err(ConfigError::Validation(
                "overlay_distance 必须大于 0".to_string(),
            ));
        }

        if tuning.scale_max <= 0.0 || tuning.scale_max > 1.0 {
            return Err(ConfigError::Validation(
                "scale_max 必须在 (0.0, 1.0] 之间".to_string(),
            ));
        }

        if !tuning.rotation_max.is_finite() || tuning.rotation_max < 0.0 {
            return Err(ConfigError::Validation(
                "rotation_max 必须是非负有限数".to_string(),
            ));
        }

        if !tuning.rotation_angle.is_finite() {
            return Err(ConfigError::Validation(
                "rotation_angle 必须是有限数".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&tuning.max_overlay_alpha) {
            return Err(ConfigError::Validation(
                "max_overlay_alpha 必须在 0.0 - 1.0 之间".to_string(),
            ));
        }

        if self.animation.duration_secs < 0.0 {
            return Err(ConfigError::Validation(
                "duration_secs 不能为负数".to_string(),
            ));
        }

        // 为负时向右滑出的卡片会飞向左边
        if !self.animation.exit_distance.is_finite() || self.animation.exit_distance <= 0.0 {
            return Err(ConfigError::Validation(
                "exit_distance 必须大于 0".to_string(),
            ));
        }

        if self.deck.window_capacity == 0 {
            return Err(ConfigError::Validation(
                "window_capacity 必须大于 0".to_string(),
            ));
        }

        if self.deck.card_width <= 0.0 || self.deck.card_height <= 0.0 {
            return Err(ConfigError::Validation("卡片尺寸必须大于 0".to_string()));
        }

        Ok(())
    }
}
