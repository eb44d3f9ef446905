//! # Swipe Host
//!
//! 无界面的卡片滑动宿主：用脚本模拟用户拖拽和按钮操作，
//! 在终端输出每张卡片的判定。
//!
//! ## 用法
//!
//! ```bash
//! cargo run -p host-cli
//! cargo run -p host-cli -- --cards a,b,c --capacity 3
//! cargo run -p host-cli -- --script session.txt --json
//! cargo run -p host-cli -- --config swipe.json --verbose
//! ```

mod script;
mod session;
mod surface;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use swipe_runtime::SwipeConfig;
use tracing::{Level, info};

use script::{DEFAULT_SCRIPT, parse_script};
use session::Session;

/// 参考卡组
const DEFAULT_CARDS: [&str; 5] = ["first", "second", "third", "fourth", "last"];

#[derive(Parser)]
#[command(name = "swipe-host")]
#[command(about = "无界面卡片滑动宿主 - 用脚本驱动一叠卡片")]
#[command(version)]
struct Cli {
    /// 配置文件（默认：swipe.json，不存在时使用默认配置）
    #[arg(short, long, default_value = "swipe.json")]
    config: PathBuf,

    /// 卡片标签，逗号分隔
    #[arg(long, value_delimiter = ',')]
    cards: Vec<String>,

    /// 覆盖可见窗口容量
    #[arg(long)]
    capacity: Option<usize>,

    /// 会话脚本（默认使用内置脚本）
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// 每帧时长（毫秒）
    #[arg(long, default_value = "16")]
    tick_ms: u64,

    /// 以 JSON 输出判定历史
    #[arg(long)]
    json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let mut config = SwipeConfig::load(&cli.config)
        .with_context(|| format!("无法加载配置文件 {}", cli.config.display()))?;
    if let Some(capacity) = cli.capacity {
        config.deck.window_capacity = capacity;
    }
    config.validate().context("配置无效")?;

    let script_text = match &cli.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("无法读取会话脚本 {}", path.display()))?,
        None => DEFAULT_SCRIPT.to_string(),
    };
    let steps = parse_script(&script_text)?;

    let cards = if cli.cards.is_empty() {
        DEFAULT_CARDS.iter().map(|s| s.to_string()).collect()
    } else {
        cli.cards
    };
    info!(cards = cards.len(), steps = steps.len(), "开始会话");

    let mut session = Session::new(config, cards, cli.tick_ms)?;
    session.run(&steps);

    let history = session.history();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(history.records())?);
    } else {
        println!(
            "✅ 共滑出 {} 张，剩余 {} 张",
            history.len(),
            session.stack().remaining()
        );
    }

    Ok(())
}
