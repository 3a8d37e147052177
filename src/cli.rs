//! 命令行参数
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "prompt-image-batch",
    about = "根据表格中的提示词批量生成图片，可选打包发送邮件"
)]
pub struct CliOptions {
    /// 提示词表格（xlsx / xls / ods），需包含 `Prompt` 列
    pub input: PathBuf,

    #[clap(long, short, env = "PROMPT_IMAGE_CONFIG")]
    /// 配置文件路径，默认读取当前目录下的 config.toml（如果存在）
    /// Env: PROMPT_IMAGE_CONFIG
    pub config: Option<PathBuf>,

    #[clap(long, help = "生成结束后打包并发送邮件")]
    pub send: bool,

    #[clap(long, help = "输出 debug 日志", env = "PROMPT_IMAGE_DEBUG")]
    /// Env: PROMPT_IMAGE_DEBUG
    pub debug: bool,
}
