//! # Script 模块
//!
//! 会话脚本：一行一个步骤，描述用户对卡组做了什么。
//!
//! ```text
//! # 注释
//! drag 180 20        拖拽到 (180, 20) 后松手
//! cancel -60 0       拖拽到 (-60, 0) 后被系统取消
//! right              点击"喜欢"按钮
//! left               点击"跳过"按钮
//! raw began 0 0      原始手势（阶段名由宿主平台决定）
//! wait 500           等待 500 毫秒
//! ```

use anyhow::{Context, Result, bail};
use swipe_runtime::HostCommand;

/// 默认会话：把参考卡组完整滑一遍
pub const DEFAULT_SCRIPT: &str = "\
# 向右拖过阈值
drag 180 20
# 拖得不够远，回弹
drag 90 -15
# 被系统取消，回弹
cancel -200 0
drag -160 40
right
left
right
";

/// 脚本步骤
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// 完整拖拽并松手
    Drag { dx: f32, dy: f32 },
    /// 拖拽后被取消
    Cancel { dx: f32, dy: f32 },
    /// 宿主命令
    Command(HostCommand),
    /// 原始手势事件
    Raw { phase: String, dx: f32, dy: f32 },
    /// 等待（毫秒）
    Wait(u64),
}

/// 解析会话脚本
pub fn parse_script(text: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let step = parse_line(line).with_context(|| format!("第 {} 行：{}", index + 1, line))?;
        steps.push(step);
    }

    Ok(steps)
}

fn parse_line(line: &str) -> Result<Step> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    match tokens.as_slice() {
        ["drag", dx, dy] => Ok(Step::Drag {
            dx: parse_offset(dx)?,
            dy: parse_offset(dy)?,
        }),
        ["cancel", dx, dy] => Ok(Step::Cancel {
            dx: parse_offset(dx)?,
            dy: parse_offset(dy)?,
        }),
        ["raw", phase, dx, dy] => Ok(Step::Raw {
            phase: phase.to_string(),
            dx: parse_offset(dx)?,
            dy: parse_offset(dy)?,
        }),
        ["wait", ms] => Ok(Step::Wait(
            ms.parse().with_context(|| format!("无效的等待时长 '{ms}'"))?,
        )),
        [command] => Ok(Step::Command(command.parse()?)),
        _ => bail!("无法识别的步骤"),
    }
}

fn parse_offset(token: &str) -> Result<f32> {
    token
        .parse()
        .with_context(|| format!("无效的位移 '{token}'"))
}
